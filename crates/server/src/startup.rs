use std::{net::SocketAddr, path::PathBuf, sync::Arc};

use axum::Router;
use migration::{Migrator, MigratorTrait};
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use common::env::ensure_env;
use configs::AppConfig;
use service::ai::{AnthropicClient, AssistService};
use service::storage::LocalObjectStore;
use service::uploads::UploadPolicy;

use crate::errors::StartupError;
use crate::routes;
use crate::state::ServerState;

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

fn bind_addr(cfg: &AppConfig) -> Result<SocketAddr, StartupError> {
    format!("{}:{}", cfg.server.host, cfg.server.port)
        .parse()
        .map_err(|e| StartupError::InvalidConfig(format!("server address: {e}")))
}

/// Connect the database, apply migrations and wire storage and the LLM client.
pub async fn build_state(cfg: &AppConfig) -> Result<ServerState, StartupError> {
    ensure_env(&cfg.storage.root).await.map_err(|e| StartupError::Runtime(e.to_string()))?;

    let db = models::db::connect_with_config(&cfg.database)
        .await
        .map_err(|e| StartupError::Database(e.to_string()))?;
    Migrator::up(&db, None).await.map_err(|e| StartupError::Database(e.to_string()))?;
    info!(event = "migrations_applied", "database schema up to date");

    if cfg.ai.api_key.trim().is_empty() {
        warn!(event = "llm_key_missing", "LLM_API_KEY not set; assistant endpoints will return fallbacks");
    }
    let llm = AnthropicClient::new(&cfg.ai).map_err(|e| StartupError::Runtime(e.to_string()))?;

    Ok(ServerState {
        db,
        storage: Arc::new(LocalObjectStore::new(&cfg.storage.root, cfg.storage.public_base_url.clone())),
        storage_dir: PathBuf::from(&cfg.storage.root),
        uploads: UploadPolicy::from(&cfg.storage),
        assist: AssistService::new(Arc::new(llm), cfg.ai.max_tokens),
    })
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(event = "signal_error", error = %e, "cannot listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    info!(event = "shutdown_signal", "received Ctrl+C, draining connections");
}

/// Build the app from a validated config and serve until Ctrl+C.
pub async fn run(cfg: AppConfig) -> Result<(), StartupError> {
    let state = build_state(&cfg).await?;
    let app: Router = routes::build_router(state, build_cors());

    let addr = bind_addr(&cfg)?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| StartupError::Runtime(format!("bind {addr}: {e}")))?;
    info!(%addr, event = "listening", "bucks server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| StartupError::Runtime(e.to_string()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn builds_state_against_memory_sqlite() {
        let root = std::env::temp_dir().join(format!("bucks-startup-{}", uuid::Uuid::new_v4()));
        let mut cfg = AppConfig::default();
        cfg.database.url = "sqlite::memory:".into();
        cfg.storage.root = root.to_string_lossy().to_string();
        let state = build_state(&cfg).await.unwrap();
        assert!(root.is_dir());
        assert_eq!(state.uploads.max_bytes, 5 * 1024 * 1024);
        assert_eq!(bind_addr(&cfg).unwrap().port(), 8080);
    }
}
