use axum::extract::rejection::JsonRejection;
use axum::extract::{ConnectInfo, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::{routing::{get, post}, Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::{net::SocketAddr, sync::Arc};

use crate::models::{GenerationError, LanguageModel};
use crate::session::SessionStore;
use crate::ui::INDEX_HTML;

#[derive(Clone)]
pub struct AppState {
    pub store: SessionStore,
    pub model: Arc<dyn LanguageModel>,
}

impl AppState {
    pub fn new(store: SessionStore, model: Arc<dyn LanguageModel>) -> Self {
        Self { store, model }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    Generation(#[from] GenerationError),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Generation(_) => StatusCode::BAD_GATEWAY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: Option<String>,
    pub session_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub response: String,
}

#[derive(Debug, Deserialize)]
pub struct ClearRequest {
    pub session_id: Option<String>,
}

/// Requester key: explicit session id when supplied, else the peer address.
fn requester_key(session_id: Option<&str>, addr: SocketAddr) -> String {
    match session_id.map(str::trim) {
        Some(id) if !id.is_empty() => id.to_string(),
        _ => addr.ip().to_string(),
    }
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn chat(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    body: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, ApiError> {
    // a body axum cannot parse still gets the `{"error": ...}` envelope
    let Json(body) = body.map_err(|e| ApiError::Validation(e.body_text()))?;
    let message = body.message.as_deref().map(str::trim).unwrap_or("");
    if message.is_empty() {
        return Err(ApiError::Validation("message is required".into()));
    }
    let key = requester_key(body.session_id.as_deref(), addr);

    // Generate on a snapshot; the session is only touched once the call succeeds,
    // so a failed turn leaves no partial state behind.
    let context = state.store.snapshot(&key).await;
    let reply = state.model.generate(&context, message).await?;
    state.store.append_exchange(&key, message, &reply).await;

    Ok(Json(ChatResponse { response: reply }))
}

async fn clear(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    body: Option<Json<ClearRequest>>,
) -> Json<serde_json::Value> {
    let session_id = body.as_ref().and_then(|b| b.session_id.clone());
    let key = requester_key(session_id.as_deref(), addr);
    let existed = state.store.clear(&key).await;
    tracing::debug!(%key, existed, "session cleared");
    Json(json!({ "status": "cleared" }))
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/chat", post(chat))
        .route("/clear", post(clear))
        .with_state(state)
}

pub async fn serve(addr: SocketAddr, state: AppState) -> anyhow::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "listening");
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;
    Ok(())
}
