//! API request and response types

use serde::{Deserialize, Serialize};

/// Request to send a chat message
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

/// Reply to a chat message
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub reply: String,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

/// Informational response for unknown paths
#[derive(Debug, Serialize)]
pub struct InfoResponse {
    pub message: &'static str,
}
