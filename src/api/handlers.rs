// src/api/handlers.rs

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use crate::api::{types::*, ApiState};

/// POST /chat — Run a message through the provider fallback chain.
///
/// Missing session id is the only client error; an empty message gets
/// the system prompt-back response and exhausted providers get canned
/// text, so a well-formed request never sees a failure status.
pub async fn chat(
    State(state): State<ApiState>,
    Json(body): Json<ChatRequestBody>,
) -> Result<Json<ChatResponseBody>, (StatusCode, Json<ErrorResponse>)> {
    let session_id = body
        .session_id
        .filter(|id| !id.trim().is_empty())
        .ok_or((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "Session ID is required".into(),
            }),
        ))?;

    let outcome = state
        .orchestrator
        .handle(&session_id, &body.message, body.conversation_history)
        .await;

    Ok(Json(ChatResponseBody {
        response: outcome.response,
        provider: outcome.provider,
        tokens_used: outcome.tokens_used,
        session_id,
    }))
}

/// GET /health — Deployment monitoring: per-provider credential status
/// plus the live session count.
pub async fn health(State(state): State<ApiState>) -> Json<serde_json::Value> {
    let mut body = serde_json::Map::new();
    body.insert("status".into(), "healthy".into());
    for provider in state.orchestrator.providers() {
        body.insert(
            format!("{}_configured", provider.label().to_lowercase()),
            provider.is_configured().into(),
        );
    }
    body.insert(
        "active_sessions".into(),
        state.orchestrator.active_sessions().into(),
    );
    Json(serde_json::Value::Object(body))
}

/// GET / — Service banner.
pub async fn root() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "message": "chat-relay",
        "status": "running",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// GET /stats — Provider availability and session stats in one place.
pub async fn stats(State(state): State<ApiState>) -> Json<serde_json::Value> {
    let providers: Vec<serde_json::Value> = state
        .orchestrator
        .providers()
        .iter()
        .map(|p| {
            serde_json::json!({
                "label": p.label(),
                "configured": p.is_configured(),
            })
        })
        .collect();

    Json(serde_json::json!({
        "providers": providers,
        "active_sessions": state.orchestrator.active_sessions(),
    }))
}
