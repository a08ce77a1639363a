// SPDX-FileCopyrightText: 2026 Adjutant Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Figment-to-miette error bridge.
//!
//! Converts Figment deserialization errors and post-deserialization
//! validation failures into miette diagnostics so startup failures render
//! with codes and help text instead of a bare panic message.

use miette::Diagnostic;
use thiserror::Error;

/// A configuration error with diagnostic information.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    /// Figment failed to parse or merge the configuration sources.
    #[error("{message}")]
    #[diagnostic(
        code(adjutant::config::parse),
        help("check adjutant.toml and ADJUTANT_* environment overrides")
    )]
    Parse {
        /// Figment's description of the failure, including the offending key.
        message: String,
    },

    /// A semantic constraint on a parsed value failed.
    #[error("validation error: {message}")]
    #[diagnostic(code(adjutant::config::validation))]
    Validation { message: String },
}

/// Flatten a Figment error (which may aggregate several failures) into one
/// `ConfigError` per underlying failure.
pub fn figment_to_config_errors(err: figment::Error) -> Vec<ConfigError> {
    err.into_iter()
        .map(|e| ConfigError::Parse {
            message: e.to_string(),
        })
        .collect()
}

/// Render a list of `ConfigError`s to stderr using miette's graphical handler.
pub fn render_errors(errors: &[ConfigError]) {
    use miette::GraphicalReportHandler;

    let handler = GraphicalReportHandler::new();
    for error in errors {
        let mut buf = String::new();
        let diagnostic: &dyn Diagnostic = error;
        if handler.render_report(&mut buf, diagnostic).is_ok() {
            eprint!("{buf}");
        } else {
            eprintln!("Error: {error}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn figment_errors_flatten_to_parse_variants() {
        let err = crate::loader::load_config_from_str("[agent]\nnaem = \"x\"\n")
            .expect_err("unknown key should fail");
        let errors = figment_to_config_errors(err);
        assert!(!errors.is_empty());
        for error in &errors {
            assert!(matches!(error, ConfigError::Parse { .. }));
        }
    }

    #[test]
    fn validation_variant_formats_message() {
        let error = ConfigError::Validation {
            message: "gateway.port must not be 0".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "validation error: gateway.port must not be 0"
        );
    }

    #[test]
    fn render_errors_does_not_panic() {
        let errors = vec![
            ConfigError::Parse {
                message: "unknown field `naem`".to_string(),
            },
            ConfigError::Validation {
                message: "model.temperature out of range".to_string(),
            },
        ];
        render_errors(&errors);
    }
}
