// src/infra/config.rs — Configuration loading (TOML + environment credentials)
//
// The binary runs with no config file at all: defaults reproduce the
// two-provider setup (Groq primary, OpenRouter fallback) with credentials
// read from GROQ_API_KEY / OPENROUTER_API_KEY. A TOML file overrides any
// section, including the ordered provider list itself.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::core::canned::CannedResponses;

/// Default persona text. Product content, not behavior — override with
/// `system_prompt` in the config file.
const DEFAULT_SYSTEM_PROMPT: &str = "You are \"Portfolio Assistant\", the friendly AI assistant \
for this portfolio site. Answer questions about the site owner's projects, skills, and \
professional background. Keep responses brief (2-4 bullet points). Be warm and professional.";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    // Scalar first so TOML serialization keeps it ahead of the tables.
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default)]
    pub canned: CannedResponses,

    /// Ordered provider list: first entry is the primary, the rest are
    /// fallbacks, tried in array order on every request.
    #[serde(default = "default_providers")]
    pub providers: Vec<ProviderConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            system_prompt: default_system_prompt(),
            server: ServerConfig::default(),
            session: SessionConfig::default(),
            canned: CannedResponses::default(),
            providers: default_providers(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,

    /// Exact origins allowed for CORS. Empty list means any origin,
    /// matching the widget's permissive dev setup.
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            allowed_origins: Vec::new(),
        }
    }
}

fn default_port() -> u16 {
    std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8000)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// When disabled, the server is stateless and uses the
    /// client-supplied conversation history instead.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Idle time after which a session is evicted.
    #[serde(default = "default_session_timeout")]
    pub timeout_minutes: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            timeout_minutes: default_session_timeout(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_session_timeout() -> u64 {
    60
}

/// One external chat-completion endpoint (OpenAI-compatible wire format).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Attribution label returned to the client, e.g. "Groq".
    pub label: String,
    /// Base URL up to but not including `/chat/completions`.
    pub base_url: String,
    pub model: String,
    /// Name of the environment variable holding the bearer token.
    /// An unset or empty variable disables the provider.
    pub api_key_env: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

impl ProviderConfig {
    /// Resolve the credential from the environment. `None` means the
    /// provider is disabled and must be skipped without a network call.
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty())
    }
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_tokens() -> u32 {
    1000
}

fn default_temperature() -> f32 {
    0.5
}

fn default_providers() -> Vec<ProviderConfig> {
    vec![
        ProviderConfig {
            label: "Groq".into(),
            base_url: "https://api.groq.com/openai/v1".into(),
            model: "llama-3.3-70b-versatile".into(),
            api_key_env: "GROQ_API_KEY".into(),
            timeout_secs: default_timeout_secs(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
        },
        ProviderConfig {
            label: "OpenRouter".into(),
            base_url: "https://openrouter.ai/api/v1".into(),
            model: "qwen/qwen-2.5-72b-instruct:free".into(),
            api_key_env: "OPENROUTER_API_KEY".into(),
            timeout_secs: default_timeout_secs(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
        },
    ]
}

fn default_system_prompt() -> String {
    DEFAULT_SYSTEM_PROMPT.into()
}

impl Config {
    /// Load config from an optional file path, falling back to defaults.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(p) => Self::load_from(p),
            None => Ok(Self::default()),
        }
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_reasonable() {
        let c = Config::default();
        assert!(c.session.enabled);
        assert_eq!(c.session.timeout_minutes, 60);
        assert_eq!(c.providers.len(), 2);
        assert_eq!(c.providers[0].label, "Groq");
        assert_eq!(c.providers[1].label, "OpenRouter");
        assert!(c.server.allowed_origins.is_empty());
        assert!(c.system_prompt.contains("Portfolio Assistant"));
    }

    #[test]
    fn test_provider_defaults() {
        let p = &Config::default().providers[0];
        assert_eq!(p.timeout_secs, 30);
        assert_eq!(p.max_tokens, 1000);
        assert!((p.temperature - 0.5).abs() < 0.001);
    }

    #[test]
    fn test_parse_minimal_toml() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.providers.len(), 2);
        assert_eq!(config.session.timeout_minutes, 60);
    }

    #[test]
    fn test_parse_full_toml() {
        let toml_str = r#"
system_prompt = "You are a test assistant."

[server]
port = 9090
allowed_origins = ["https://example.com"]

[session]
enabled = false
timeout_minutes = 5

[[providers]]
label = "Primary"
base_url = "https://primary.example/v1"
model = "model-a"
api_key_env = "PRIMARY_KEY"
timeout_secs = 10
max_tokens = 256
temperature = 0.7

[[providers]]
label = "Secondary"
base_url = "https://secondary.example/v1"
model = "model-b"
api_key_env = "SECONDARY_KEY"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.server.allowed_origins, vec!["https://example.com"]);
        assert!(!config.session.enabled);
        assert_eq!(config.session.timeout_minutes, 5);
        assert_eq!(config.providers.len(), 2);
        assert_eq!(config.providers[0].label, "Primary");
        assert_eq!(config.providers[0].timeout_secs, 10);
        assert_eq!(config.providers[0].max_tokens, 256);
        // Per-provider defaults fill unspecified fields
        assert_eq!(config.providers[1].timeout_secs, 30);
        assert_eq!(config.providers[1].max_tokens, 1000);
        assert_eq!(config.system_prompt, "You are a test assistant.");
    }

    #[test]
    fn test_api_key_from_env() {
        let p = ProviderConfig {
            label: "EnvTest".into(),
            base_url: "https://x.example".into(),
            model: "m".into(),
            api_key_env: "CHAT_RELAY_TEST_KEY_PRESENT".into(),
            timeout_secs: 30,
            max_tokens: 100,
            temperature: 0.5,
        };
        std::env::set_var("CHAT_RELAY_TEST_KEY_PRESENT", "sk-test");
        assert_eq!(p.api_key(), Some("sk-test".into()));
    }

    #[test]
    fn test_api_key_absent_or_blank() {
        let mut p = ProviderConfig {
            label: "EnvTest".into(),
            base_url: "https://x.example".into(),
            model: "m".into(),
            api_key_env: "CHAT_RELAY_TEST_KEY_ABSENT".into(),
            timeout_secs: 30,
            max_tokens: 100,
            temperature: 0.5,
        };
        std::env::remove_var("CHAT_RELAY_TEST_KEY_ABSENT");
        assert_eq!(p.api_key(), None);

        p.api_key_env = "CHAT_RELAY_TEST_KEY_BLANK".into();
        std::env::set_var("CHAT_RELAY_TEST_KEY_BLANK", "  ");
        assert_eq!(p.api_key(), None);
    }

    #[test]
    fn test_serialize_roundtrip() {
        let config = Config::default();
        let serialized = toml::to_string(&config).unwrap();
        let deserialized: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(deserialized.providers.len(), config.providers.len());
        assert_eq!(deserialized.session.timeout_minutes, config.session.timeout_minutes);
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = Config::load_from(Path::new("/nonexistent/chat-relay.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[server]\nport = 4321\n").unwrap();
        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.server.port, 4321);
        assert_eq!(config.providers.len(), 2);
    }
}
