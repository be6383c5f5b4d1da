#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use migration::{Migrator, MigratorTrait};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use uuid::Uuid;

use server::routes;
use server::state::ServerState;
use service::ai::{AssistService, Prompt, TextGenerator};
use service::errors::ServiceError;
use service::storage::LocalObjectStore;
use service::uploads::UploadPolicy;

/// LLM stand-in returning a fixed reply, or failing when `reply` is `None`.
pub struct StubLlm {
    pub reply: Option<String>,
}

#[async_trait]
impl TextGenerator for StubLlm {
    async fn generate(&self, _prompt: &Prompt) -> Result<String, ServiceError> {
        self.reply.clone().ok_or_else(|| ServiceError::Upstream("stub offline".into()))
    }
}

pub fn stub(reply: &str) -> Arc<StubLlm> {
    Arc::new(StubLlm { reply: Some(reply.to_string()) })
}

pub fn offline() -> Arc<StubLlm> {
    Arc::new(StubLlm { reply: None })
}

/// In-memory SQLite, migrated, with a throwaway storage directory.
pub async fn test_state(llm: Arc<dyn TextGenerator>) -> anyhow::Result<ServerState> {
    let db = models::db::connect_in_memory().await?;
    Migrator::up(&db, None).await?;
    let storage_dir: PathBuf = std::env::temp_dir().join(format!("bucks-test-{}", Uuid::new_v4()));
    tokio::fs::create_dir_all(&storage_dir).await?;
    Ok(ServerState {
        db,
        storage: Arc::new(LocalObjectStore::new(&storage_dir, "/storage")),
        storage_dir,
        uploads: UploadPolicy::default(),
        assist: AssistService::new(llm, 256),
    })
}

pub async fn test_router(llm: Arc<dyn TextGenerator>) -> anyhow::Result<Router> {
    Ok(routes::build_router(test_state(llm).await?, CorsLayer::very_permissive()))
}

pub struct TestApp {
    pub base_url: String,
}

pub async fn start_server(llm: Arc<dyn TextGenerator>) -> anyhow::Result<TestApp> {
    let app = test_router(llm).await?;
    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await { eprintln!("server error: {}", e); }
    });
    Ok(TestApp { base_url: format!("http://{}:{}", addr.ip(), addr.port()) })
}
