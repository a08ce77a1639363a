// SPDX-FileCopyrightText: 2026 Adjutant Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes, such as value ranges and non-empty identifiers.

use crate::diagnostic::ConfigError;
use crate::model::AdjutantConfig;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &AdjutantConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.agent.owner_user_id.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "agent.owner_user_id must not be empty".to_string(),
        });
    }

    if !(0.0..=2.0).contains(&config.model.temperature) {
        errors.push(ConfigError::Validation {
            message: format!(
                "model.temperature must be within 0.0..=2.0, got {}",
                config.model.temperature
            ),
        });
    }

    if config.model.timeout_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "model.timeout_secs must be at least 1".to_string(),
        });
    }

    if config.memory.token_overlap_weight < 0.0 {
        errors.push(ConfigError::Validation {
            message: format!(
                "memory.token_overlap_weight must be non-negative, got {}",
                config.memory.token_overlap_weight
            ),
        });
    }

    if config.memory.category_bonus < 0.0 {
        errors.push(ConfigError::Validation {
            message: format!(
                "memory.category_bonus must be non-negative, got {}",
                config.memory.category_bonus
            ),
        });
    }

    if !(0.0..=1.0).contains(&config.memory.confidence_floor) {
        errors.push(ConfigError::Validation {
            message: format!(
                "memory.confidence_floor must be within 0.0..=1.0, got {}",
                config.memory.confidence_floor
            ),
        });
    }

    if !(0.0..=1.0).contains(&config.memory.default_confidence) {
        errors.push(ConfigError::Validation {
            message: format!(
                "memory.default_confidence must be within 0.0..=1.0, got {}",
                config.memory.default_confidence
            ),
        });
    }

    if config.memory.retrieval_limit == 0 {
        errors.push(ConfigError::Validation {
            message: "memory.retrieval_limit must be at least 1".to_string(),
        });
    }

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.database_path must not be empty".to_string(),
        });
    }

    if config.gateway.host.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "gateway.host must not be empty".to_string(),
        });
    }

    if config.gateway.port == 0 {
        errors.push(ConfigError::Validation {
            message: "gateway.port must not be 0".to_string(),
        });
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = AdjutantConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn out_of_range_temperature_is_rejected() {
        let mut config = AdjutantConfig::default();
        config.model.temperature = 3.5;
        let errors = validate_config(&config).expect_err("should reject");
        assert!(
            errors
                .iter()
                .any(|e| e.to_string().contains("model.temperature"))
        );
    }

    #[test]
    fn zero_port_is_rejected() {
        let mut config = AdjutantConfig::default();
        config.gateway.port = 0;
        let errors = validate_config(&config).expect_err("should reject");
        assert!(errors.iter().any(|e| e.to_string().contains("gateway.port")));
    }

    #[test]
    fn all_failures_are_collected_not_just_the_first() {
        let mut config = AdjutantConfig::default();
        config.model.temperature = -1.0;
        config.memory.retrieval_limit = 0;
        config.storage.database_path = "  ".to_string();
        let errors = validate_config(&config).expect_err("should reject");
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn confidence_bounds_are_enforced() {
        let mut config = AdjutantConfig::default();
        config.memory.confidence_floor = 1.5;
        config.memory.default_confidence = -0.1;
        let errors = validate_config(&config).expect_err("should reject");
        assert_eq!(errors.len(), 2);
    }
}
