//! HTTP surface over [`MessageStore`].
//!
//! Handlers translate requests into store calls and serialize the result.
//! The only state is the shared store behind a read/write lock, so every
//! mutation is serialized while page reads may run side by side.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Path, Request, State};
use axum::http::Method;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use parley_common::api::{EditRequest, SendRequest, StatusResponse};
use parley_common::{Cursor, MessageId, Page};
use serde::de::DeserializeOwned;
use tokio::sync::RwLock;
use tower_http::cors::{Any, CorsLayer};

use crate::error::ServiceError;
use crate::store::MessageStore;

#[derive(Debug, Default)]
pub struct AppState {
    store: RwLock<MessageStore>,
}

impl AppState {
    pub fn new(store: MessageStore) -> Self {
        Self {
            store: RwLock::new(store),
        }
    }
}

type SharedState = Arc<AppState>;

// ─── Handlers ───────────────────────────────────────────────────────────────

async fn ping_handler() -> Json<StatusResponse> {
    Json(StatusResponse::new("pong"))
}

async fn reset_handler(State(state): State<SharedState>) -> Json<StatusResponse> {
    state.store.write().await.reset();
    tracing::info!("message store reset");
    Json(StatusResponse::new("reset"))
}

async fn send_path_handler(
    State(state): State<SharedState>,
    Path((user, message)): Path<(String, String)>,
) -> Result<Json<Page>, ServiceError> {
    send(&state, user, message).await.map(Json)
}

async fn send_json_handler(
    State(state): State<SharedState>,
    body: Bytes,
) -> Result<Json<Page>, ServiceError> {
    let req: SendRequest =
        parse_body(&body)?.ok_or(ServiceError::InvalidInput("user is required"))?;
    send(&state, req.user, req.message).await.map(Json)
}

/// Append, then answer with the newest page taken under the same lock so
/// the sender sees their message in its final position.
async fn send(state: &AppState, user: String, message: String) -> Result<Page, ServiceError> {
    if user.trim().is_empty() {
        return Err(ServiceError::InvalidInput("user is required"));
    }
    let mut store = state.store.write().await;
    let appended = store.append(user, message);
    tracing::info!(id = appended.id, author = %appended.author, "message appended");
    Ok(store.page(&Cursor::Empty))
}

async fn newest_handler(State(state): State<SharedState>) -> Json<Page> {
    Json(state.store.read().await.page(&Cursor::Empty))
}

async fn page_handler(
    State(state): State<SharedState>,
    Path(token): Path<String>,
) -> Json<Page> {
    let cursor = Cursor::decode(&token);
    Json(state.store.read().await.page(&cursor))
}

/// Whole-store dump. Compiled only with the `dev` feature.
#[cfg(feature = "dev")]
async fn all_handler(
    State(state): State<SharedState>,
) -> Json<parley_common::api::AllMessagesResponse> {
    Json(parley_common::api::AllMessagesResponse {
        messages: state.store.read().await.all(),
        pagination_token: parley_common::cursor::DEBUG_TOKEN.to_string(),
    })
}

async fn delete_handler(
    State(state): State<SharedState>,
    Path(raw_id): Path<String>,
) -> Result<Json<StatusResponse>, ServiceError> {
    let id = parse_id(&raw_id)?;
    if !state.store.write().await.delete_by_id(id) {
        return Err(ServiceError::NotFound(id));
    }
    tracing::info!(id, "message deleted");
    Ok(Json(StatusResponse::new("Message deleted successfully.")))
}

async fn edit_handler(
    State(state): State<SharedState>,
    Path(raw_id): Path<String>,
    body: Bytes,
) -> Result<Json<StatusResponse>, ServiceError> {
    let id = parse_id(&raw_id)?;
    let req: EditRequest = parse_body(&body)?.unwrap_or_default();
    let new_body = req
        .new_message
        .filter(|m| !m.is_empty())
        .ok_or(ServiceError::InvalidInput("No new message provided."))?;

    if !state.store.write().await.edit_by_id(id, new_body) {
        return Err(ServiceError::NotFound(id));
    }
    tracing::info!(id, "message edited");
    Ok(Json(StatusResponse::new("Message updated successfully.")))
}

// ─── Helpers ────────────────────────────────────────────────────────────────

fn parse_id(raw: &str) -> Result<MessageId, ServiceError> {
    raw.parse()
        .map_err(|_| ServiceError::Malformed(format!("invalid message id '{raw}'")))
}

/// Empty (or whitespace-only) bodies parse to `None`.
fn parse_body<T: DeserializeOwned>(body: &Bytes) -> Result<Option<T>, ServiceError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    serde_json::from_slice(body)
        .map(Some)
        .map_err(|e| ServiceError::Malformed(e.to_string()))
}

async fn log_request(req: Request, next: Next) -> Response {
    tracing::debug!(method = %req.method(), uri = %req.uri(), "request");
    next.run(req).await
}

// ─── Router ─────────────────────────────────────────────────────────────────

pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    let app = Router::new()
        .route("/ping", get(ping_handler))
        .route("/reset", get(reset_handler).post(reset_handler))
        .route("/message", post(send_json_handler))
        .route("/message/{user}/{message}", get(send_path_handler))
        .route("/message/update/{id}", put(edit_handler))
        .route("/chat", get(newest_handler))
        .route("/chat/", get(newest_handler))
        .route("/messages/get", get(newest_handler))
        .route("/messages/get/", get(newest_handler))
        .route("/messages/get/{token}", get(page_handler))
        .route("/messages/delete/{id}", delete(delete_handler));

    #[cfg(feature = "dev")]
    let app = app.route("/messages/getall", get(all_handler));

    app.layer(middleware::from_fn(log_request))
        .layer(cors)
        .with_state(state)
}
