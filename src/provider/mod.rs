// src/provider/mod.rs — Provider gateway layer

pub mod fallback;
pub mod openai_compat;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::infra::errors::RelayError;

/// Core trait every chat provider implements. The orchestrator only ever
/// sees this interface, so adding a provider is a configuration change.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Attribution label returned to the client on success, e.g. "Groq".
    fn label(&self) -> &str;

    /// Whether a credential is present. Unconfigured providers are
    /// skipped by the fallback chain without a network call.
    fn is_configured(&self) -> bool;

    /// Issue one chat-completion call. The message sequence is always
    /// system prompt, stored history in order, then the new user turn.
    async fn chat(
        &self,
        system_prompt: &str,
        history: &[Turn],
        user_text: &str,
    ) -> Result<ChatReply, RelayError>;
}

/// One message in a conversation. Matches the widget's wire shape
/// (`{role, content}`) as well as the providers'.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub content: String,
}

impl Turn {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// Normalized success payload from a provider.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatReply {
    pub content: String,
    /// `usage.total_tokens` as reported by the provider, 0 when omitted.
    pub total_tokens: u32,
}
