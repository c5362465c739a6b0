//! HTTP request handlers and router for the gateway API.
//!
//! Each handler scopes a fresh request ID so every log line and the
//! response envelope's `trace_id` tie back to the same inbound call.
//! Malformed request bodies never reach the service layer; they map to the
//! parameter-invalid envelope code directly.

use crate::api::models::{ApiResponse, ChatCompletionCall, ChatRequest};
use crate::core::config::GatewayConfig;
use crate::core::logging::{generate_request_id, get_request_id, REQUEST_ID};
use crate::core::ServiceError;
use crate::services::ChatService;
use axum::{
    extract::{rejection::JsonRejection, State},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: GatewayConfig,
    pub chat_service: ChatService,
}

/// Build the gateway router with all endpoints and layers.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/chat/sendMsg", post(send_msg))
        .route("/chatGPT/sendMsg", post(send_chat_msg))
        .route("/health", get(health))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Handle legacy completion-style chat requests.
pub async fn send_msg(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Response {
    let request_id = generate_request_id();
    REQUEST_ID
        .scope(request_id, async move {
            let Json(req) = match payload {
                Ok(json) => json,
                Err(rejection) => return reject(rejection),
            };

            let user_id = req.user_id;
            match state.chat_service.send_msg(req).await {
                Ok(reply) => Json(ApiResponse::ok(reply, get_request_id())).into_response(),
                Err(err) => fail(user_id, err),
            }
        })
        .await
}

/// Handle chat-style requests, including the continuation protocol.
pub async fn send_chat_msg(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ChatCompletionCall>, JsonRejection>,
) -> Response {
    let request_id = generate_request_id();
    REQUEST_ID
        .scope(request_id, async move {
            let Json(req) = match payload {
                Ok(json) => json,
                Err(rejection) => return reject(rejection),
            };

            let user_id = req.user_id;
            match state.chat_service.send_chat_msg(req).await {
                Ok(response) => Json(ApiResponse::ok(response, get_request_id())).into_response(),
                Err(err) => fail(user_id, err),
            }
        })
        .await
}

/// Liveness probe reporting the credential pool size.
pub async fn health(State(state): State<Arc<AppState>>) -> Response {
    Json(serde_json::json!({
        "status": "ok",
        "credentials": state.chat_service.pool_size(),
    }))
    .into_response()
}

fn reject(rejection: JsonRejection) -> Response {
    tracing::warn!(error = %rejection, "malformed request body");
    ServiceError::InvalidParams.into_response()
}

fn fail(user_id: i64, err: ServiceError) -> Response {
    match &err {
        ServiceError::InvalidParams => {
            tracing::warn!(user_id, "request rejected: empty message content");
        }
        other => {
            tracing::error!(user_id, error = %other, "chat request failed");
        }
    }
    err.into_response()
}
