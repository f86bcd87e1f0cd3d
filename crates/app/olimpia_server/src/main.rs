//! OlimpIA chat relay server binary.
//!
//! Loads the grounding document, builds the responder and serves the HTTP API
//! until Ctrl-C.

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use olimpia_core::grounding;
use olimpia_core::llm::{GroqChatModel, ProviderConfig, config as llm_config};
use olimpia_core::responder::ChatResponder;
use tracing::{error, info, warn};
use url::Url;

const DEFAULT_GROUNDING_URL: &str = "https://fsn-5-grupo-02-autopecas.vercel.app/";

/// CLI arguments for the relay server.
#[derive(Parser, Debug)]
#[command(name = "olimpia_server", about = "OlimpIA grounded chat relay", version)]
struct Args {
    /// Address to listen on.
    #[arg(long, env = "BIND_ADDR", default_value = "127.0.0.1:5000")]
    bind_addr: String,

    /// Groq API key.
    #[arg(long, env = "GROQ_API_KEY", hide_env_values = true)]
    groq_api_key: String,

    /// Chat model identifier.
    #[arg(long, env = "GROQ_MODEL", default_value = llm_config::DEFAULT_MODEL)]
    model: String,

    /// OpenAI-compatible API root.
    #[arg(long, env = "GROQ_BASE_URL", default_value = llm_config::DEFAULT_BASE_URL)]
    groq_base_url: String,

    /// Page(s) whose text grounds every answer. Comma-separated in the env var.
    #[arg(
        long = "grounding-url",
        env = "GROUNDING_URL",
        value_delimiter = ',',
        default_value = DEFAULT_GROUNDING_URL
    )]
    grounding_urls: Vec<Url>,

    /// Timeout for outbound HTTP calls, in seconds.
    #[arg(long, env = "HTTP_TIMEOUT_SECS", default_value_t = 30)]
    http_timeout_secs: u64,

    /// Answer every chat with a fixed placeholder instead of calling the model.
    #[arg(long, env = "PLACEHOLDER_REPLY", default_value_t = false)]
    placeholder_reply: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| {
                    tracing_subscriber::EnvFilter::new("info,olimpia_api=debug,olimpia_core=debug")
                }),
        )
        .init();

    let args = Args::parse();

    info!(
        bind_addr = %args.bind_addr,
        model = %args.model,
        sources = args.grounding_urls.len(),
        "starting olimpia_server"
    );

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(args.http_timeout_secs))
        .build()?;

    let document = grounding::load(&client, &args.grounding_urls)
        .await
        .inspect_err(|e| error!(error = %e, "could not load grounding document"))?;

    let model = GroqChatModel::new(
        client,
        ProviderConfig {
            api_key: args.groq_api_key,
            model: args.model,
            base_url: args.groq_base_url,
        },
    )?;

    if args.placeholder_reply {
        warn!("placeholder mode: /chat will not call the model");
    }

    let state = olimpia_api::AppState {
        config: olimpia_api::config::ApiConfig {
            bind_addr: args.bind_addr,
            placeholder_reply: args.placeholder_reply,
        },
        responder: Arc::new(ChatResponder::new(Arc::new(model), document)),
    };

    let listener = tokio::net::TcpListener::bind(&state.config.bind_addr).await?;
    let local_addr = listener.local_addr()?;
    let app = olimpia_api::router(state);

    info!(addr = %local_addr, "REST API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
