// src/provider/fallback.rs — Ordered fallback chain over providers
//
// Every request walks the full priority order from the top: there is no
// cooldown or circuit breaker, so a downed primary costs its timeout on
// each request until it recovers. Accepted tradeoff at this traffic
// volume; it keeps recovery instant and the chain stateless.

use std::sync::Arc;

use super::{ChatProvider, ChatReply, Turn};
use crate::infra::errors::RelayError;

pub struct FallbackChain {
    providers: Vec<Arc<dyn ChatProvider>>,
}

impl FallbackChain {
    pub fn new(providers: Vec<Arc<dyn ChatProvider>>) -> Self {
        Self { providers }
    }

    /// The configured providers in priority order, exposed for health
    /// reporting.
    pub fn providers(&self) -> &[Arc<dyn ChatProvider>] {
        &self.providers
    }

    /// Try each provider in order and short-circuit on the first
    /// success, returning the reply and the winning provider's label.
    /// Unconfigured providers are skipped without a network call. A
    /// failure is never retried on the same provider; the next distinct
    /// provider is the retry.
    pub async fn chat(
        &self,
        system_prompt: &str,
        history: &[Turn],
        user_text: &str,
    ) -> Result<(ChatReply, String), RelayError> {
        for provider in &self.providers {
            if !provider.is_configured() {
                tracing::debug!(provider = %provider.label(), "skipping unconfigured provider");
                continue;
            }

            match provider.chat(system_prompt, history, user_text).await {
                Ok(reply) => return Ok((reply, provider.label().to_string())),
                Err(e) => {
                    tracing::warn!(
                        provider = %provider.label(),
                        "provider failed, trying next: {e}"
                    );
                    continue;
                }
            }
        }

        Err(RelayError::AllProvidersExhausted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Scripted provider for chain tests: fixed outcome, counts calls.
    struct StubProvider {
        label: String,
        configured: bool,
        reply: Option<ChatReply>,
        calls: AtomicUsize,
    }

    impl StubProvider {
        fn succeeding(label: &str, content: &str, tokens: u32) -> Self {
            Self {
                label: label.into(),
                configured: true,
                reply: Some(ChatReply {
                    content: content.into(),
                    total_tokens: tokens,
                }),
                calls: AtomicUsize::new(0),
            }
        }

        fn failing(label: &str) -> Self {
            Self {
                label: label.into(),
                configured: true,
                reply: None,
                calls: AtomicUsize::new(0),
            }
        }

        fn unconfigured(label: &str) -> Self {
            Self {
                label: label.into(),
                configured: false,
                reply: None,
                calls: AtomicUsize::new(0),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ChatProvider for StubProvider {
        fn label(&self) -> &str {
            &self.label
        }

        fn is_configured(&self) -> bool {
            self.configured
        }

        async fn chat(
            &self,
            _system_prompt: &str,
            _history: &[Turn],
            _user_text: &str,
        ) -> Result<ChatReply, RelayError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.reply {
                Some(r) => Ok(r.clone()),
                None => Err(RelayError::Provider {
                    provider: self.label.clone(),
                    message: "stubbed failure".into(),
                }),
            }
        }
    }

    #[tokio::test]
    async fn test_primary_success_short_circuits() {
        let primary = Arc::new(StubProvider::succeeding("Primary", "from primary", 10));
        let secondary = Arc::new(StubProvider::succeeding("Secondary", "from secondary", 20));
        let chain = FallbackChain::new(vec![primary.clone(), secondary.clone()]);

        let (reply, label) = chain.chat("p", &[], "hi").await.unwrap();
        assert_eq!(label, "Primary");
        assert_eq!(reply.content, "from primary");
        assert_eq!(primary.call_count(), 1);
        assert_eq!(secondary.call_count(), 0);
    }

    #[tokio::test]
    async fn test_failure_falls_through_to_secondary() {
        let primary = Arc::new(StubProvider::failing("Primary"));
        let secondary = Arc::new(StubProvider::succeeding("Secondary", "rescued", 42));
        let chain = FallbackChain::new(vec![primary.clone(), secondary.clone()]);

        let (reply, label) = chain.chat("p", &[], "hi").await.unwrap();
        assert_eq!(label, "Secondary");
        assert_eq!(reply.total_tokens, 42);
        assert_eq!(primary.call_count(), 1);
        assert_eq!(secondary.call_count(), 1);
    }

    #[tokio::test]
    async fn test_unconfigured_primary_skipped_without_call() {
        let primary = Arc::new(StubProvider::unconfigured("Primary"));
        let secondary = Arc::new(StubProvider::succeeding("Secondary", "ok", 1));
        let chain = FallbackChain::new(vec![primary.clone(), secondary.clone()]);

        let (_, label) = chain.chat("p", &[], "hi").await.unwrap();
        assert_eq!(label, "Secondary");
        assert_eq!(primary.call_count(), 0);
    }

    #[tokio::test]
    async fn test_all_exhausted() {
        let primary = Arc::new(StubProvider::failing("Primary"));
        let secondary = Arc::new(StubProvider::unconfigured("Secondary"));
        let chain = FallbackChain::new(vec![primary.clone(), secondary.clone()]);

        let err = chain.chat("p", &[], "hi").await.unwrap_err();
        assert!(matches!(err, RelayError::AllProvidersExhausted));
        assert_eq!(primary.call_count(), 1);
        assert_eq!(secondary.call_count(), 0);
    }

    #[tokio::test]
    async fn test_no_sticky_failure_between_requests() {
        // A failure on one request never pins the provider down: the
        // next request starts from the top of the order again.
        let primary = Arc::new(StubProvider::failing("Primary"));
        let secondary = Arc::new(StubProvider::succeeding("Secondary", "ok", 1));
        let chain = FallbackChain::new(vec![primary.clone(), secondary.clone()]);

        chain.chat("p", &[], "one").await.unwrap();
        chain.chat("p", &[], "two").await.unwrap();
        assert_eq!(primary.call_count(), 2);
        assert_eq!(secondary.call_count(), 2);
    }

    #[tokio::test]
    async fn test_empty_chain_exhausted() {
        let chain = FallbackChain::new(vec![]);
        let err = chain.chat("p", &[], "hi").await.unwrap_err();
        assert!(matches!(err, RelayError::AllProvidersExhausted));
    }
}
