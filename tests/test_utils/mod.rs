//! Test utilities for integration tests
//!
//! Each test binary includes this module but only uses part of it.
#![allow(dead_code)]
use std::sync::{Arc, RwLock};

use axum::{Router, body::Body};

use kisspush::backend::{BackendState, SharedState, app};
use kisspush::client::{ApiVariant, ChannelSubscriptionClient};

/// Creates a test application router backed by fresh in-memory state.
pub fn test_app() -> Router {
    app(test_state())
}

pub fn test_state() -> SharedState {
    Arc::new(RwLock::new(BackendState::new()))
}

/// Serves a fresh backend on an ephemeral local port and returns its base
/// URL. The server task lives until the test's runtime shuts down.
pub async fn spawn_backend() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, test_app()).await.unwrap();
    });
    format!("http://{}/", addr)
}

/// A client for a freshly spawned backend with `reg_id` already set.
pub async fn test_client(variant: ApiVariant, reg_id: &str) -> ChannelSubscriptionClient {
    let url = spawn_backend().await;
    let client = ChannelSubscriptionClient::new(&url)
        .unwrap()
        .with_variant(variant);
    client.set_registration_id(reg_id);
    client
}

pub async fn body_to_string(body: Body) -> String {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}
