// SPDX-FileCopyrightText: 2026 Adjutant Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Adjutant agent.

use thiserror::Error;

/// The primary error type used across all Adjutant crates.
#[derive(Debug, Error)]
pub enum AdjutantError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage backend errors (database connection, query failure, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Language model invocation errors (API failure, malformed response, timeouts).
    #[error("model error: {message}")]
    Model {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A capability action failed while executing (API failure, bad response).
    #[error("tool error: {message}")]
    Tool {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The routed action does not exist on the named capability.
    #[error("tool not found: {capability}/{action}")]
    ToolNotFound { capability: String, action: String },

    /// Internal or unexpected errors. Never shown to the end user.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AdjutantError {
    /// Builds a model error from a plain message with no underlying cause.
    pub fn model(message: impl Into<String>) -> Self {
        AdjutantError::Model {
            message: message.into(),
            source: None,
        }
    }

    /// Builds a tool error from a plain message with no underlying cause.
    pub fn tool(message: impl Into<String>) -> Self {
        AdjutantError::Tool {
            message: message.into(),
            source: None,
        }
    }
}
