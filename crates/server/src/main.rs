// crates/server/src/main.rs
//! Phasewire server binary.
//!
//! Opens the SQLite store (running migrations on the way up), then serves the
//! REST API and the per-project SSE streams until shutdown.

use std::net::SocketAddr;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use phasewire_db::Database;
use phasewire_server::{create_app, AppState};

/// Default port for the server.
const DEFAULT_PORT: u16 = 47310;

/// Get the server port from environment or use default.
fn get_port() -> u16 {
    std::env::var("PHASEWIRE_PORT")
        .ok()
        .or_else(|| std::env::var("PORT").ok())
        .and_then(|p| p.parse().ok())
        .unwrap_or(DEFAULT_PORT)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let db = Database::open_default().await?;
    tracing::info!(path = %db.db_path().display(), "store ready");

    let state = AppState::new(db);
    let app = create_app(state);

    let addr = SocketAddr::from(([127, 0, 0, 1], get_port()));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("listening on http://{addr}");

    axum::serve(listener, app).await?;
    Ok(())
}
