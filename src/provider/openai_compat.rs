// src/provider/openai_compat.rs — Generic OpenAI-compatible provider
//
// Both default providers (Groq, OpenRouter) speak the same
// `/chat/completions` wire format, so one implementation covers every
// configured endpoint.

use async_trait::async_trait;
use std::time::Duration;

use super::{ChatProvider, ChatReply, Role, Turn};
use crate::infra::config::ProviderConfig;
use crate::infra::errors::RelayError;

pub struct OpenAiCompatProvider {
    label: String,
    base_url: String,
    model: String,
    api_key: Option<String>,
    max_tokens: u32,
    temperature: f32,
    client: reqwest::Client,
}

impl OpenAiCompatProvider {
    /// Build a provider from config, resolving the credential from the
    /// environment once at startup.
    pub fn from_config(config: &ProviderConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_default();

        Self {
            label: config.label.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key: config.api_key(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            client,
        }
    }

    fn provider_err(&self, message: impl Into<String>) -> RelayError {
        RelayError::Provider {
            provider: self.label.clone(),
            message: message.into(),
        }
    }
}

/// Assemble the outbound message array: system prompt anchors position
/// zero, stored history follows in order, the new user turn comes last.
fn build_messages(system_prompt: &str, history: &[Turn], user_text: &str) -> Vec<serde_json::Value> {
    let mut msgs = Vec::with_capacity(history.len() + 2);
    msgs.push(serde_json::json!({"role": "system", "content": system_prompt}));
    for turn in history {
        msgs.push(serde_json::json!({
            "role": match turn.role {
                Role::System => "system",
                Role::User => "user",
                Role::Assistant => "assistant",
            },
            "content": turn.content,
        }));
    }
    msgs.push(serde_json::json!({"role": "user", "content": user_text}));
    msgs
}

/// Extract the first completion's text and the total token count from an
/// OpenAI-style response body. Missing content is a protocol error;
/// missing usage just means 0 tokens reported.
fn parse_reply(label: &str, body: &serde_json::Value) -> Result<ChatReply, RelayError> {
    let content = body["choices"][0]["message"]["content"]
        .as_str()
        .ok_or_else(|| RelayError::Provider {
            provider: label.to_string(),
            message: "response has no choices[0].message.content".into(),
        })?
        .to_string();

    let total_tokens = body["usage"]["total_tokens"].as_u64().unwrap_or(0) as u32;

    Ok(ChatReply {
        content,
        total_tokens,
    })
}

#[async_trait]
impl ChatProvider for OpenAiCompatProvider {
    fn label(&self) -> &str {
        &self.label
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    async fn chat(
        &self,
        system_prompt: &str,
        history: &[Turn],
        user_text: &str,
    ) -> Result<ChatReply, RelayError> {
        let api_key = self.api_key.as_ref().ok_or(RelayError::NotConfigured {
            provider: self.label.clone(),
        })?;

        let body = serde_json::json!({
            "model": self.model,
            "messages": build_messages(system_prompt, history, user_text),
            "max_tokens": self.max_tokens,
            "temperature": self.temperature,
        });

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {api_key}"))
            .json(&body)
            .send()
            .await
            .map_err(|e| self.provider_err(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response.text().await.unwrap_or_default();
            return Err(self.provider_err(format!("HTTP {status}: {error_body}")));
        }

        let resp: serde_json::Value = response
            .json()
            .await
            .map_err(|e| self.provider_err(format!("malformed response body: {e}")))?;

        parse_reply(&self.label, &resp)
    }
}
