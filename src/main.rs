// src/main.rs — chat-relay entry point

use clap::Parser;
use std::path::Path;
use std::sync::Arc;

use chat_relay::api::{self, ApiState};
use chat_relay::core::orchestrator::Orchestrator;
use chat_relay::core::session::SessionStore;
use chat_relay::infra::config::Config;
use chat_relay::infra::logger;
use chat_relay::provider::fallback::FallbackChain;
use chat_relay::provider::openai_compat::OpenAiCompatProvider;
use chat_relay::provider::ChatProvider;

#[derive(Parser)]
#[command(name = "chat-relay", version, about = "LLM proxy for a portfolio chat widget")]
struct Cli {
    /// Path to a TOML config file; defaults are used when omitted
    #[arg(short, long)]
    config: Option<String>,

    /// Override the listen port
    #[arg(short, long)]
    port: Option<u16>,

    /// Log level when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Respects RUST_LOG when set
    logger::init_logging(&cli.log_level);

    if let Err(e) = run(cli).await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = Config::load(cli.config.as_deref().map(Path::new))?;
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    let providers: Vec<Arc<dyn ChatProvider>> = config
        .providers
        .iter()
        .map(|p| Arc::new(OpenAiCompatProvider::from_config(p)) as Arc<dyn ChatProvider>)
        .collect();

    for provider in &providers {
        tracing::info!(
            provider = %provider.label(),
            configured = provider.is_configured(),
            "provider registered"
        );
    }

    let sessions = config.session.enabled.then(|| {
        Arc::new(SessionStore::with_timeout_minutes(
            config.session.timeout_minutes,
        ))
    });
    if sessions.is_none() {
        tracing::info!("session store disabled, using client-supplied history");
    }

    let orchestrator = Arc::new(Orchestrator::new(
        FallbackChain::new(providers),
        sessions,
        config.system_prompt.clone(),
        config.canned.clone(),
    ));

    api::start_server(&config.server, ApiState { orchestrator }).await
}
