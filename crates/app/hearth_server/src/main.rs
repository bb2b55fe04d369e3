//! Hearth smart home assistant server binary.
//!
//! Serves the chat relay, preference and login-ledger API plus the static
//! front end.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use hearth_api::AppState;
use hearth_api::config::ApiConfig;
use hearth_core::gemini::{DEFAULT_BASE_URL, DEFAULT_MODEL, GeminiClient, GeminiConfig};
use hearth_core::password::{DEFAULT_BCRYPT_COST, check_cost};
use tracing::info;

/// CLI arguments for the server.
#[derive(Parser, Debug)]
#[command(name = "hearth_server", about = "Hearth smart home assistant server")]
struct Args {
    /// Interface to bind.
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    host: String,

    /// Port to listen on (0 = ephemeral).
    #[arg(long, env = "PORT", default_value_t = 3001)]
    port: u16,

    /// Google Generative Language API key.
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    gemini_api_key: String,

    /// Model used for chat replies.
    #[arg(long, env = "GEMINI_MODEL", default_value = DEFAULT_MODEL)]
    gemini_model: String,

    /// Base URL of the Generative Language API.
    #[arg(long, env = "GEMINI_BASE_URL", default_value = DEFAULT_BASE_URL)]
    gemini_base_url: String,

    /// Upstream request timeout in seconds. Unset waits indefinitely.
    #[arg(long, env = "UPSTREAM_TIMEOUT_SECS")]
    upstream_timeout_secs: Option<u64>,

    /// Directory of static files; `/` serves `Log_in.html` from it.
    #[arg(long, env = "STATIC_DIR", default_value = "public")]
    static_dir: PathBuf,

    /// bcrypt cost for captured login passwords.
    #[arg(long, env = "BCRYPT_COST", default_value_t = DEFAULT_BCRYPT_COST)]
    bcrypt_cost: u32,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| {
                    tracing_subscriber::EnvFilter::new("info,hearth_api=debug,hearth_core=debug")
                }),
        )
        .init();

    let args = Args::parse();

    if args.gemini_api_key.trim().is_empty() {
        return Err("GEMINI_API_KEY must not be empty".into());
    }
    let bcrypt_cost = check_cost(args.bcrypt_cost)?;

    let gemini = GeminiConfig {
        api_key: args.gemini_api_key,
        model: args.gemini_model,
        base_url: args.gemini_base_url,
        timeout: args.upstream_timeout_secs.map(Duration::from_secs),
    };
    let config = ApiConfig {
        bind_addr: format!("{}:{}", args.host, args.port),
        static_dir: args.static_dir,
        bcrypt_cost,
        gemini: gemini.clone(),
    };

    let client = GeminiClient::new(gemini)?;
    let model_name = client.config().model.clone();
    let state = AppState::new(config.clone(), Arc::new(client));
    let prefs = state.preferences.get();
    let app = hearth_api::router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    let local_addr = listener.local_addr()?;

    info!(
        addr = %local_addr,
        model = %model_name,
        static_dir = %config.static_dir.display(),
        "hearth server started"
    );
    info!(
        devices = %prefs.common_devices.join(", "),
        temperature = %prefs.preferred_temperature,
        "preferences loaded"
    );
    info!(
        all = %format!("GET http://{local_addr}/api/login-records"),
        recent = %format!("GET http://{local_addr}/api/login-records/recent"),
        stats = %format!("GET http://{local_addr}/api/login-stats"),
        "login tracking active"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutdown signal received");
        })
        .await?;

    Ok(())
}
