// SPDX-FileCopyrightText: 2026 Adjutant Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `adjutant serve` command implementation.
//!
//! Wires the SQLite stores, the Google capabilities, the Gemini model, and
//! the message pipeline together, then starts the HTTP gateway.

use std::collections::HashMap;
use std::sync::Arc;

use adjutant_agent::Orchestrator;
use adjutant_calendar::CalendarCapability;
use adjutant_config::model::AdjutantConfig;
use adjutant_core::CapabilityAdapter;
use adjutant_core::error::AdjutantError;
use adjutant_gateway::{AuthConfig, GatewayState, ServerConfig, start_server};
use adjutant_gemini::GeminiModel;
use adjutant_mail::MailCapability;
use adjutant_memory::{FactStore, MemoryExtractor};
use adjutant_router::IntentRouter;
use adjutant_storage::ConversationStore;
use tracing::{error, info, warn};

/// Runs the `adjutant serve` command.
///
/// Opens the database, registers the configured capabilities, builds the
/// orchestrator, and serves the gateway until the process is stopped.
pub async fn run_serve(config: AdjutantConfig) -> Result<(), AdjutantError> {
    // Initialize tracing subscriber.
    init_tracing(&config.agent.log_level);

    info!("starting adjutant serve");

    // Each store opens its own connection to the same database file.
    let conversations = {
        let conn = open_database(&config.storage.database_path).await?;
        let store = Arc::new(ConversationStore::new(conn));
        store.init_schema().await?;
        store
    };
    let facts = {
        let conn = open_database(&config.storage.database_path).await?;
        let store = Arc::new(FactStore::new(conn));
        store.init_schema().await?;
        store
    };
    info!(
        path = config.storage.database_path.as_str(),
        "storage initialized"
    );

    let capabilities = build_capabilities(&config)?;
    let registry: HashMap<String, Arc<dyn CapabilityAdapter>> = capabilities
        .iter()
        .map(|adapter| (adapter.name().to_string(), Arc::clone(adapter)))
        .collect();

    // Initialize the Gemini model adapter.
    let model = Arc::new(GeminiModel::new(&config.model).map_err(|e| {
        error!(error = %e, "failed to initialize Gemini model");
        eprintln!(
            "error: Gemini API key required. Set via: config or ADJUTANT_MODEL_API_KEY env var"
        );
        e
    })?);

    let extractor = Arc::new(MemoryExtractor::new()?);
    let router = IntentRouter::new();

    let orchestrator = Arc::new(Orchestrator::new(
        facts.clone(),
        extractor,
        router,
        capabilities,
        model,
        config.memory.clone(),
    ));

    if config.gateway.auth_token.is_none() {
        warn!("gateway.auth_token not configured; every API request will be rejected");
    }

    let state = GatewayState {
        orchestrator,
        conversations,
        facts,
        capabilities: Arc::new(registry),
        owner_user_id: config.agent.owner_user_id.clone(),
        service_name: config.agent.name.clone(),
        auth: AuthConfig {
            auth_token: config.gateway.auth_token.clone(),
        },
    };

    let server_config = ServerConfig {
        host: config.gateway.host.clone(),
        port: config.gateway.port,
        auth_token: config.gateway.auth_token.clone(),
    };

    start_server(&server_config, state).await?;

    info!("adjutant serve shutdown complete");
    Ok(())
}

/// Opens a SQLite connection to the configured database path.
async fn open_database(path: &str) -> Result<tokio_rusqlite::Connection, AdjutantError> {
    tokio_rusqlite::Connection::open(path)
        .await
        .map_err(|e| AdjutantError::Storage {
            source: Box::new(e),
        })
}

/// Builds the capability registry from configuration.
///
/// Both Google capabilities share one access token; with no token configured
/// the agent still serves chat, it just cannot reach mail or calendar.
fn build_capabilities(
    config: &AdjutantConfig,
) -> Result<Vec<Arc<dyn CapabilityAdapter>>, AdjutantError> {
    let mut capabilities: Vec<Arc<dyn CapabilityAdapter>> = Vec::new();

    if let Some(ref access_token) = config.google.access_token {
        capabilities.push(Arc::new(MailCapability::new(access_token)?));
        capabilities.push(Arc::new(CalendarCapability::new(access_token)?));
        info!("mail and calendar capabilities registered");
    } else {
        info!("mail and calendar capabilities skipped (no google.access_token configured)");
    }

    Ok(capabilities)
}

/// Initializes the tracing subscriber with the given log level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("adjutant={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_access_token_means_no_capabilities() {
        let config = AdjutantConfig::default();
        let capabilities = build_capabilities(&config).unwrap();
        assert!(capabilities.is_empty());
    }

    #[test]
    fn access_token_registers_mail_and_calendar() {
        let mut config = AdjutantConfig::default();
        config.google.access_token = Some("ya29.token".to_string());

        let capabilities = build_capabilities(&config).unwrap();
        let names: Vec<&str> = capabilities.iter().map(|c| c.name()).collect();
        assert_eq!(names, vec!["mail", "calendar"]);
    }
}
