mod config;
mod context;
mod db;
mod documents;
mod errors;
mod generation;
mod llm_client;
mod models;
mod pipelines;
mod routes;
mod state;
mod store;

#[cfg(test)]
mod testing;

use anyhow::Result;
use aws_config::Region;
use aws_sdk_s3::config::Credentials;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use std::sync::Arc;

use crate::config::{Config, ObjectStoreSettings};
use crate::db::create_pool;
use crate::documents::s3::S3DocumentFetcher;
use crate::generation::generator::SchemaGenerator;
use crate::llm_client::GeminiClient;
use crate::pipelines::Pipelines;
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::memory::MemoryStore;
use crate::store::postgres::PgDocumentStore;
use crate::store::DocumentStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting coach API v{}", env!("CARGO_PKG_VERSION"));

    // Document store: PostgreSQL when configured, otherwise process memory
    let store: Arc<dyn DocumentStore> = match &config.database_url {
        Some(url) => Arc::new(PgDocumentStore::new(create_pool(url).await?)),
        None => {
            warn!("DATABASE_URL not set; using the in-memory document store");
            Arc::new(MemoryStore::new())
        }
    };

    // Initialize S3 / MinIO
    let s3 = build_s3_client(&config.object_store).await;
    info!("S3 client initialized");

    // Initialize generation client
    let llm = GeminiClient::new(&config.generation)?;
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    let pipelines = Pipelines::new(
        store,
        SchemaGenerator::new(Arc::new(llm)),
        Arc::new(S3DocumentFetcher::new(s3)),
        config.object_store.document_url_root.clone(),
    );

    let state = AppState {
        pipelines: Arc::new(pipelines),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Constructs an S3 client configured for MinIO (local) or AWS (production).
async fn build_s3_client(settings: &ObjectStoreSettings) -> aws_sdk_s3::Client {
    let credentials = Credentials::new(
        &settings.access_key_id,
        &settings.secret_access_key,
        None,
        None,
        "coach-static",
    );

    let sdk_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(Region::new(settings.region.clone()))
        .credentials_provider(credentials)
        .endpoint_url(&settings.endpoint)
        .load()
        .await;

    let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
        .force_path_style(true)
        .build();

    aws_sdk_s3::Client::from_conf(s3_config)
}
