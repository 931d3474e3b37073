//! ER Scanner - entity-relationship inference service
//!
//! Reverse-engineers the relationship graph of a relational database:
//! - Declared foreign keys from the catalog (strict)
//! - Columns named like another table's primary key (inferred)
//! - Value overlap across sampled rows of allow-listed tables (inferred)
//!
//! The latest scan is served as a schema document, a node/edge graph, and
//! Mermaid ER diagrams (whole schema or chunked per domain).

mod catalog;
mod config;
mod db;
mod dialect;
mod domains;
mod error;
mod inference;
mod introspection;
mod models;
mod render;
mod routes;
mod snapshot;
mod state;

use crate::catalog::PostgresCatalog;
use crate::config::Settings;
use crate::routes::create_router;
use crate::state::AppState;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    info!("Starting ER Scanner...");

    let settings = Settings::load()?;
    info!(
        "Configuration loaded: schema {}, {} configured tables, sampling {}",
        settings.scan.owner,
        settings.scan.tables.len(),
        if settings.scan.samples_rows() { "on" } else { "off" }
    );

    if let Err(e) = settings.scan.validate() {
        warn!("Scan configuration is not usable yet: {}", e);
    }

    let pool = db::create_pool(&settings.database)?;
    db::verify_pool(&pool).await?;

    let catalog = Arc::new(PostgresCatalog::new(pool, settings.scan.owner.clone()));
    let state = Arc::new(AppState::new(catalog, settings.scan.clone()));

    let app = create_router(state, &settings);

    let addr = SocketAddr::from((settings.server.host, settings.server.port));

    info!("Server listening on http://{}", addr);
    info!("API Endpoints:");
    info!("   POST /schema/scan                - Scan configured tables");
    info!("   GET  /schema/json                - Schema document");
    info!("   GET  /schema/graph               - Node/edge graph document");
    info!("   GET  /schema/er-mermaid          - Whole-schema ER diagram");
    info!("   GET  /schema/er-mermaid-domains  - ER diagrams per domain chunk");

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Initialize tracing with structured logging
fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,er_scanner=debug,tower_http=debug"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_level(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true)
                .compact(),
        )
        .init();
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            info!("Received terminate signal, initiating graceful shutdown...");
        },
    }
}
