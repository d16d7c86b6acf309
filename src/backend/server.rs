use std::sync::{Arc, RwLock};

use anyhow::Result;
use axum::Router;
use tower_http::trace::TraceLayer;

use super::routes::{self, SharedState};
use super::state::BackendState;

pub fn app(shared_state: SharedState) -> Router {
    Router::new()
        .merge(routes::router())
        .layer(TraceLayer::new_for_http())
        .with_state(shared_state)
}

/// Run the reference backend until the process is stopped.
pub async fn serve(host: &str, port: u16) -> Result<()> {
    let shared_state = Arc::new(RwLock::new(BackendState::new()));
    let app = app(Arc::clone(&shared_state));

    let listener = tokio::net::TcpListener::bind(format!("{}:{}", host, port)).await?;

    tracing::debug!("Server started. Listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
