//! Path-based API: everything is addressed through the URL

use axum::{
    Form, Json, Router,
    extract::{Path, State},
    routing::{get, put},
};
use serde_json::Value;

use super::{SharedState, read, write};
use crate::backend::public::{self, ApiError, PostChannelForm};
use crate::backend::state::StoredMessage;
use crate::client::PostedMessage;

async fn list_channel(
    State(state): State<SharedState>,
    Path(channel): Path<String>,
) -> Json<Vec<StoredMessage>> {
    Json(read(&state).recent_messages(&channel))
}

async fn post_channel(
    State(state): State<SharedState>,
    Path(channel): Path<String>,
    Form(form): Form<PostChannelForm>,
) -> Result<Json<PostedMessage>, ApiError> {
    let message = public::required(form.message, "message")?;
    let delay_while_idle = public::flag(form.delay_while_idle.as_deref(), true);
    let posted = write(&state).post(&channel, &message, form.collapse_key, delay_while_idle);
    tracing::debug!(
        "Queued message {} on {} for {} clients",
        posted.message_id,
        channel,
        posted.clients
    );
    Ok(Json(posted))
}

// Register a device. The reply is plain text.
async fn register(State(state): State<SharedState>, Path(reg_id): Path<String>) -> String {
    if write(&state).register(&reg_id) {
        tracing::info!("Registered {}", reg_id);
    }
    String::from("Registration received")
}

async fn list_subscriptions(
    State(state): State<SharedState>,
    Path(reg_id): Path<String>,
) -> Json<Vec<String>> {
    Json(read(&state).subscriptions(&reg_id))
}

async fn subscribe(
    State(state): State<SharedState>,
    Path((reg_id, alias)): Path<(String, String)>,
) -> Json<Value> {
    let created = write(&state).subscribe(&reg_id, &alias);
    Json(serde_json::json!({ "success": true, "created": created }))
}

async fn unsubscribe(
    State(state): State<SharedState>,
    Path((reg_id, alias)): Path<(String, String)>,
) -> Json<Value> {
    let removed = write(&state).unsubscribe(&reg_id, &alias);
    Json(serde_json::json!({ "success": true, "removed": removed }))
}

/// Create the path-based router
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/channel/{channel}", get(list_channel).post(post_channel))
        .route("/user/{reg_id}", put(register))
        .route("/user/{reg_id}/subscription", get(list_subscriptions))
        .route("/user/{reg_id}/subscription/", get(list_subscriptions))
        .route(
            "/user/{reg_id}/subscription/{alias}",
            put(subscribe).delete(unsubscribe),
        )
}
