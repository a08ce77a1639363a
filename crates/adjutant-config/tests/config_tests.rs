// SPDX-FileCopyrightText: 2026 Adjutant Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the Adjutant configuration system.

use adjutant_config::{load_and_validate_str, load_config_from_str};

/// Valid TOML with all known fields deserializes successfully.
#[test]
fn valid_toml_deserializes_into_adjutant_config() {
    let toml = r#"
[agent]
name = "test-agent"
owner_user_id = "alice"
log_level = "debug"

[model]
model = "gemini-1.5-pro"
api_key = "key-123"
temperature = 0.4
timeout_secs = 15
max_retries = 2

[memory]
token_overlap_weight = 0.2
category_bonus = 0.5
confidence_floor = 0.6
retrieval_limit = 8
default_confidence = 0.4

[google]
access_token = "ya29.token"

[storage]
database_path = "/tmp/test.db"

[gateway]
host = "0.0.0.0"
port = 9090
auth_token = "gw-token"
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.agent.name, "test-agent");
    assert_eq!(config.agent.owner_user_id, "alice");
    assert_eq!(config.agent.log_level, "debug");
    assert_eq!(config.model.model, "gemini-1.5-pro");
    assert_eq!(config.model.api_key.as_deref(), Some("key-123"));
    assert_eq!(config.model.temperature, 0.4);
    assert_eq!(config.model.timeout_secs, 15);
    assert_eq!(config.model.max_retries, 2);
    assert_eq!(config.memory.token_overlap_weight, 0.2);
    assert_eq!(config.memory.category_bonus, 0.5);
    assert_eq!(config.memory.confidence_floor, 0.6);
    assert_eq!(config.memory.retrieval_limit, 8);
    assert_eq!(config.memory.default_confidence, 0.4);
    assert_eq!(config.google.access_token.as_deref(), Some("ya29.token"));
    assert_eq!(config.storage.database_path, "/tmp/test.db");
    assert_eq!(config.gateway.host, "0.0.0.0");
    assert_eq!(config.gateway.port, 9090);
    assert_eq!(config.gateway.auth_token.as_deref(), Some("gw-token"));
}

/// Missing optional sections use defaults without error.
#[test]
fn missing_optional_sections_use_defaults() {
    let config = load_config_from_str("").expect("empty TOML should use defaults");

    assert_eq!(config.agent.name, "adjutant");
    assert_eq!(config.agent.owner_user_id, "owner");
    assert_eq!(config.agent.log_level, "info");
    assert_eq!(config.model.model, "gemini-pro");
    assert!(config.model.api_key.is_none());
    assert_eq!(config.model.temperature, 0.7);
    assert_eq!(config.model.timeout_secs, 30);
    assert_eq!(config.model.max_retries, 1);
    assert_eq!(config.memory.token_overlap_weight, 0.1);
    assert_eq!(config.memory.category_bonus, 0.3);
    assert_eq!(config.memory.confidence_floor, 0.7);
    assert_eq!(config.memory.retrieval_limit, 5);
    assert_eq!(config.memory.default_confidence, 0.5);
    assert!(config.google.access_token.is_none());
    assert_eq!(config.storage.database_path, "adjutant.db");
    assert_eq!(config.gateway.host, "127.0.0.1");
    assert_eq!(config.gateway.port, 8080);
    assert!(config.gateway.auth_token.is_none());
}

/// Unknown field in [agent] section is rejected.
#[test]
fn unknown_field_in_agent_produces_error() {
    let toml = r#"
[agent]
naem = "test"
"#;

    let err = load_config_from_str(toml).expect_err("should reject unknown field");
    let err_str = format!("{err}");
    // Figment wraps serde's deny_unknown_fields error
    assert!(
        err_str.contains("unknown field") || err_str.contains("naem"),
        "error should mention unknown field or the bad key, got: {err_str}"
    );
}

/// Unknown top-level section is rejected.
#[test]
fn unknown_section_produces_error() {
    let toml = r#"
[telemetry]
enabled = true
"#;

    let err = load_config_from_str(toml).expect_err("should reject unknown section");
    let err_str = format!("{err}");
    assert!(
        err_str.contains("unknown field") || err_str.contains("telemetry"),
        "error should mention unknown section, got: {err_str}"
    );
}

/// Partial sections keep defaults for unset fields.
#[test]
fn partial_section_keeps_other_defaults() {
    let toml = r#"
[memory]
retrieval_limit = 3
"#;

    let config = load_config_from_str(toml).expect("partial section should deserialize");
    assert_eq!(config.memory.retrieval_limit, 3);
    assert_eq!(config.memory.token_overlap_weight, 0.1);
    assert_eq!(config.memory.confidence_floor, 0.7);
}

/// Semantic validation runs after deserialization and collects errors.
#[test]
fn validation_rejects_semantic_errors() {
    let toml = r#"
[model]
temperature = 9.0

[gateway]
port = 0
"#;

    let errors = load_and_validate_str(toml).expect_err("should fail validation");
    assert_eq!(errors.len(), 2);
    let rendered: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
    assert!(rendered.iter().any(|m| m.contains("model.temperature")));
    assert!(rendered.iter().any(|m| m.contains("gateway.port")));
}

/// A valid config string passes the full load-and-validate path.
#[test]
fn load_and_validate_str_accepts_good_config() {
    let config = load_and_validate_str("[agent]\nname = \"aide\"\n").expect("should validate");
    assert_eq!(config.agent.name, "aide");
}
