//! Query-param API: the registration id travels as a query or form field

use axum::{
    Form, Json, Router,
    extract::{Query, State},
    routing::post,
};
use serde_json::Value;

use super::{SharedState, read, write};
use crate::backend::public::{self, AliasForm, AliasQuery, ApiError, RegisterForm, SendForm};
use crate::client::PostedMessage;

// Register a device. The reply is plain text.
async fn register(
    State(state): State<SharedState>,
    Form(form): Form<RegisterForm>,
) -> Result<String, ApiError> {
    let reg_id = public::required(form.reg_id, "reg_id")?;
    if write(&state).register(&reg_id) {
        tracing::info!("Registered {}", reg_id);
    }
    Ok(String::from("Registration received"))
}

async fn list_aliases(
    State(state): State<SharedState>,
    Query(query): Query<AliasQuery>,
) -> Result<Json<Vec<String>>, ApiError> {
    let reg_id = public::required(query.reg_id, "reg_id")?;
    Ok(Json(read(&state).subscriptions(&reg_id)))
}

async fn add_alias(
    State(state): State<SharedState>,
    Form(form): Form<AliasForm>,
) -> Result<Json<Value>, ApiError> {
    let reg_id = public::required(form.reg_id, "reg_id")?;
    let alias = public::required(form.alias, "alias")?;
    let created = write(&state).subscribe(&reg_id, &alias);
    Ok(Json(serde_json::json!({ "success": true, "created": created })))
}

// Queue a message for every device subscribed to the `to` alias
async fn send(
    State(state): State<SharedState>,
    Form(form): Form<SendForm>,
) -> Result<Json<PostedMessage>, ApiError> {
    let msg = public::required(form.msg, "msg")?;
    let to = public::required(form.to, "to")?;
    // Unlike the path API, `/send` defaults to delivering right away
    let delay_while_idle = public::flag(form.delay_while_idle.as_deref(), false);
    let posted = write(&state).post(&to, &msg, form.collapse_key, delay_while_idle);
    tracing::debug!(
        "Queued message {} on {} for {} clients",
        posted.message_id,
        to,
        posted.clients
    );
    Ok(Json(posted))
}

/// Create the query-param router
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/register", post(register))
        .route("/alias", post(add_alias).get(list_aliases))
        .route("/send", post(send))
}
