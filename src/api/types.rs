// src/api/types.rs — Wire types for the widget-facing API

use serde::{Deserialize, Serialize};

use crate::provider::Turn;

/// Request body for POST /chat. Field names match the widget's JSON
/// (camelCase). `message` and `sessionId` are validated in the handler
/// so their absence yields a descriptive 400 rather than a decode error.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequestBody {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub session_id: Option<String>,
    /// Client-held transcript, honored only when server-side sessions
    /// are disabled.
    #[serde(default)]
    pub conversation_history: Option<Vec<Turn>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponseBody {
    pub response: String,
    pub provider: String,
    pub tokens_used: u32,
    pub session_id: String,
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
