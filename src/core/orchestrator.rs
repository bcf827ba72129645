// src/core/orchestrator.rs — Per-request fallback orchestration
//
// Validate, try providers in order, record the exchange, degrade to
// canned text when every provider fails. A well-formed request never
// produces an error: availability over freshness is the contract the
// widget relies on.

use std::sync::Arc;

use crate::core::canned::CannedResponses;
use crate::core::session::SessionStore;
use crate::provider::fallback::FallbackChain;
use crate::provider::{ChatProvider, Turn};

/// Provider label on the empty-message short-circuit.
pub const SYSTEM_LABEL: &str = "system";
/// Provider label when all providers failed and canned text is served.
pub const FALLBACK_LABEL: &str = "fallback";

pub const EMPTY_MESSAGE_REPLY: &str = "Please enter a question!";

/// Outcome of one chat request. Infallible by design: every failure
/// mode inside degrades to a response the widget can render.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatOutcome {
    pub response: String,
    pub provider: String,
    pub tokens_used: u32,
}

pub struct Orchestrator {
    chain: FallbackChain,
    /// `None` when sessions are disabled; the client-supplied history
    /// compatibility path is used instead.
    sessions: Option<Arc<SessionStore>>,
    system_prompt: String,
    canned: CannedResponses,
}

impl Orchestrator {
    pub fn new(
        chain: FallbackChain,
        sessions: Option<Arc<SessionStore>>,
        system_prompt: String,
        canned: CannedResponses,
    ) -> Self {
        Self {
            chain,
            sessions,
            system_prompt,
            canned,
        }
    }

    pub fn providers(&self) -> &[Arc<dyn ChatProvider>] {
        self.chain.providers()
    }

    pub fn active_sessions(&self) -> usize {
        self.sessions.as_ref().map_or(0, |s| s.count())
    }

    /// Handle one chat request end to end.
    ///
    /// `supplied_history` is the widget's own transcript, honored only
    /// when the session store is disabled.
    pub async fn handle(
        &self,
        session_id: &str,
        message: &str,
        supplied_history: Option<Vec<Turn>>,
    ) -> ChatOutcome {
        let message = message.trim();
        if message.is_empty() {
            return ChatOutcome {
                response: EMPTY_MESSAGE_REPLY.into(),
                provider: SYSTEM_LABEL.into(),
                tokens_used: 0,
            };
        }

        let history = match &self.sessions {
            Some(store) => store.get_or_create(session_id),
            None => supplied_history.unwrap_or_default(),
        };

        match self.chain.chat(&self.system_prompt, &history, message).await {
            Ok((reply, label)) => {
                if let Some(store) = &self.sessions {
                    store.record_exchange(session_id, message, &reply.content);
                }
                tracing::info!(
                    provider = %label,
                    tokens = reply.total_tokens,
                    "chat served by provider"
                );
                ChatOutcome {
                    response: reply.content,
                    provider: label,
                    tokens_used: reply.total_tokens,
                }
            }
            Err(e) => {
                // Exhaustion is the only error the chain returns; the
                // per-provider causes were already logged as warnings.
                tracing::warn!("serving canned fallback: {e}");
                ChatOutcome {
                    response: self.canned.select(message).to_string(),
                    provider: FALLBACK_LABEL.into(),
                    tokens_used: 0,
                }
            }
        }
    }
}
