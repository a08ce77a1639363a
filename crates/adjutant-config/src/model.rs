// SPDX-FileCopyrightText: 2026 Adjutant Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Adjutant agent.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Adjutant configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AdjutantConfig {
    /// Agent identity and behavior settings.
    #[serde(default)]
    pub agent: AgentConfig,

    /// Language model API settings.
    #[serde(default)]
    pub model: ModelConfig,

    /// Memory retrieval tuning.
    #[serde(default)]
    pub memory: MemoryConfig,

    /// Google API settings shared by the mail and calendar capabilities.
    #[serde(default)]
    pub google: GoogleConfig,

    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// HTTP gateway settings.
    #[serde(default)]
    pub gateway: GatewayConfig,
}

/// Agent identity and behavior configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    /// Display name of the agent.
    #[serde(default = "default_agent_name")]
    pub name: String,

    /// The single principal every store and capability call is scoped to.
    #[serde(default = "default_owner_user_id")]
    pub owner_user_id: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            owner_user_id: default_owner_user_id(),
            log_level: default_log_level(),
        }
    }
}

fn default_agent_name() -> String {
    "adjutant".to_string()
}

fn default_owner_user_id() -> String {
    "owner".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Language model API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ModelConfig {
    /// Model identifier sent to the generation API.
    #[serde(default = "default_model_name")]
    pub model: String,

    /// API key. Required to serve; empty by default so tests never need one.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Sampling temperature for response generation.
    #[serde(default = "default_temperature")]
    pub temperature: f64,

    /// Per-request timeout in seconds.
    #[serde(default = "default_model_timeout_secs")]
    pub timeout_secs: u64,

    /// Retries after the first attempt for transient API failures.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            model: default_model_name(),
            api_key: None,
            temperature: default_temperature(),
            timeout_secs: default_model_timeout_secs(),
            max_retries: default_max_retries(),
        }
    }
}

fn default_model_name() -> String {
    "gemini-pro".to_string()
}

fn default_temperature() -> f64 {
    0.7
}

fn default_model_timeout_secs() -> u64 {
    30
}

fn default_max_retries() -> u32 {
    1
}

/// Memory retrieval tuning.
///
/// The retrieval score of a fact is
/// `confidence + token_overlap_weight * overlap + category_bonus` and facts
/// below every threshold are dropped. Keeping the coefficients in config
/// lets deployments tune recall without a rebuild.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MemoryConfig {
    /// Relevance contributed by each context token found in a fact.
    #[serde(default = "default_token_overlap_weight")]
    pub token_overlap_weight: f64,

    /// Bonus applied when the fact category matches the context topic.
    #[serde(default = "default_category_bonus")]
    pub category_bonus: f64,

    /// Facts above this confidence are retrieved even with zero overlap.
    #[serde(default = "default_confidence_floor")]
    pub confidence_floor: f64,

    /// Maximum facts returned per retrieval.
    #[serde(default = "default_retrieval_limit")]
    pub retrieval_limit: usize,

    /// Confidence assigned to extracted facts that carry none.
    #[serde(default = "default_default_confidence")]
    pub default_confidence: f64,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            token_overlap_weight: default_token_overlap_weight(),
            category_bonus: default_category_bonus(),
            confidence_floor: default_confidence_floor(),
            retrieval_limit: default_retrieval_limit(),
            default_confidence: default_default_confidence(),
        }
    }
}

fn default_token_overlap_weight() -> f64 {
    0.1
}

fn default_category_bonus() -> f64 {
    0.3
}

fn default_confidence_floor() -> f64 {
    0.7
}

fn default_retrieval_limit() -> usize {
    5
}

fn default_default_confidence() -> f64 {
    0.5
}

/// Google API configuration shared by the mail and calendar capabilities.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GoogleConfig {
    /// OAuth bearer access token. Obtaining and refreshing it is out of scope;
    /// the agent consumes whatever token is configured.
    #[serde(default)]
    pub access_token: Option<String>,
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// SQLite database file path. `:memory:` is accepted for ephemeral runs.
    #[serde(default = "default_database_path")]
    pub database_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
        }
    }
}

fn default_database_path() -> String {
    "adjutant.db".to_string()
}

/// HTTP gateway configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    /// Bind address for the HTTP listener.
    #[serde(default = "default_gateway_host")]
    pub host: String,

    /// Bind port for the HTTP listener.
    #[serde(default = "default_gateway_port")]
    pub port: u16,

    /// Bearer token required on API routes. Auth is fail-closed: an empty
    /// token rejects every API request.
    #[serde(default)]
    pub auth_token: Option<String>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: default_gateway_host(),
            port: default_gateway_port(),
            auth_token: None,
        }
    }
}

fn default_gateway_host() -> String {
    "127.0.0.1".to_string()
}

fn default_gateway_port() -> u16 {
    8080
}
