// src/infra/errors.rs — Error types for chat-relay

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RelayError {
    /// A single provider attempt failed: transport error, timeout,
    /// non-2xx status, or malformed payload. The orchestrator treats
    /// every cause identically and moves to the next provider.
    #[error("Provider '{provider}' error: {message}")]
    Provider { provider: String, message: String },

    /// The provider has no credential set, so no call was attempted.
    #[error("Provider '{provider}' has no credential configured")]
    NotConfigured { provider: String },

    #[error("All providers exhausted")]
    AllProvidersExhausted,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
