//! HTTP request handlers

use super::types::{ChatRequest, ChatResponse, ErrorResponse, InfoResponse};
use super::AppState;
use crate::db::Requisition;
use crate::runtime::{RequisitionStore, RuntimeError};
use axum::{
    extract::{rejection::JsonRejection, ConnectInfo, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use std::net::SocketAddr;

/// Header a client can set to pick its own session
pub const SESSION_KEY_HEADER: &str = "x-session-key";

const GENERIC_FAILURE: &str = "An unexpected server error occurred. Please try again later.";
const BAD_CHAT_BODY: &str = "Request must be JSON with a 'message' key";

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/chat", post(chat).fallback(catch_all))
        .route("/forms", get(list_forms).fallback(catch_all))
        .fallback(catch_all)
        .with_state(state)
}

// ============================================================
// Chat
// ============================================================

async fn chat(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    body: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, AppError> {
    let Json(req) = body.map_err(|e| {
        tracing::debug!(error = %e, "Rejected chat body");
        AppError::BadRequest(BAD_CHAT_BODY.to_string())
    })?;

    let key = session_key(addr, &headers);
    let reply = state
        .runtime
        .handle_message(&key, &req.message)
        .await
        .map_err(AppError::Chat)?;

    Ok(Json(ChatResponse { reply }))
}

/// Explicit session header if given, else client address plus user agent
fn session_key(addr: SocketAddr, headers: &HeaderMap) -> String {
    let explicit = headers
        .get(SESSION_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty());
    if let Some(key) = explicit {
        return key.to_string();
    }

    let user_agent = headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    format!("{}{user_agent}", addr.ip())
}

// ============================================================
// Saved forms
// ============================================================

async fn list_forms(State(state): State<AppState>) -> Result<Json<Vec<Requisition>>, AppError> {
    let forms = state
        .runtime
        .store()
        .list()
        .await
        .map_err(|e| AppError::Internal(format!("Could not retrieve forms: {e}")))?;
    Ok(Json(forms))
}

async fn catch_all() -> Json<InfoResponse> {
    Json(InfoResponse {
        message: "API is running. Use /chat or /forms endpoints.",
    })
}

// ============================================================
// Error Handling
// ============================================================

#[derive(Debug)]
enum AppError {
    BadRequest(String),
    /// Conversation failed; the client gets a generic reply
    Chat(RuntimeError),
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, Json(ErrorResponse::new(msg))).into_response()
            }
            AppError::Chat(e) => {
                tracing::error!(error = %e, "Chat message failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "reply": GENERIC_FAILURE })),
                )
                    .into_response()
            }
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "Request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse::new(msg)),
                )
                    .into_response()
            }
        }
    }
}
