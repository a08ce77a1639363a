// SPDX-FileCopyrightText: 2026 Adjutant Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./adjutant.toml` > `~/.config/adjutant/adjutant.toml` > `/etc/adjutant/adjutant.toml`
//! with environment variable overrides via `ADJUTANT_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::AdjutantConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/adjutant/adjutant.toml` (system-wide)
/// 3. `~/.config/adjutant/adjutant.toml` (user XDG config)
/// 4. `./adjutant.toml` (local directory)
/// 5. `ADJUTANT_*` environment variables
pub fn load_config() -> Result<AdjutantConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(AdjutantConfig::default()))
        .merge(Toml::file("/etc/adjutant/adjutant.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("adjutant/adjutant.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("adjutant.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
///
/// Used for testing and explicit config specification.
pub fn load_config_from_str(toml_content: &str) -> Result<AdjutantConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(AdjutantConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<AdjutantConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(AdjutantConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` so keys that themselves
/// contain underscores stay intact. `ADJUTANT_GOOGLE_ACCESS_TOKEN` must map
/// to `google.access_token`, not `google.access.token`.
fn env_provider() -> Env {
    Env::prefixed("ADJUTANT_").map(|key| {
        // `key` is the lowercased env var name with prefix stripped.
        // Example: ADJUTANT_GATEWAY_AUTH_TOKEN -> "gateway_auth_token"
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("agent_", "agent.", 1)
            .replacen("model_", "model.", 1)
            .replacen("memory_", "memory.", 1)
            .replacen("google_", "google.", 1)
            .replacen("storage_", "storage.", 1)
            .replacen("gateway_", "gateway.", 1);
        mapped.into()
    })
}
