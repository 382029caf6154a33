//! LLM Platform web frontend.
//!
//! This is the application entry point. It initializes tracing, loads configuration
//! from a TOML file plus environment overrides, loads templates, sets up the Axum
//! router and starts the HTTP server.

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use llm_platform::config::{AppConfig, LoggingConfig, DEFAULT_CONFIG_PATH, DEFAULT_LOG_FILTER};
use llm_platform::http::start_server;
use llm_platform::routes::create_router;
use llm_platform::state::AppState;
use llm_platform::templates::init_templates;

/// LLM Platform: landing page and health probes
#[derive(Parser, Debug)]
#[command(name = "llm-platform", version, about)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, env = "CONFIG_PATH", default_value = DEFAULT_CONFIG_PATH)]
    config: String,

    /// Log level filter (e.g., "llm_platform=debug,tower_http=info")
    #[arg(short, long)]
    log_level: Option<String>,
}

fn init_tracing(log_filter: &str, logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::new(log_filter);
    let registry = tracing_subscriber::registry().with(filter);

    if logging.is_json() {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Configuration is loaded before tracing so the log format can come from it
    let mut config = AppConfig::load(&args.config)?;
    config.apply_env_overrides();

    // Initialize tracing with priority: CLI > env > default
    let log_filter = args
        .log_level
        .or_else(|| std::env::var("RUST_LOG").ok())
        .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());
    init_tracing(&log_filter, &config.logging);

    tracing::info!(
        path = %args.config,
        environment = %config.app.environment,
        version = %config.app.version,
        "Loaded configuration"
    );

    let tera = init_templates(&config.ui)?;
    tracing::info!(templates_dir = %config.ui.templates_dir, "Initialized templates");

    let http_config = config.http.clone();
    let state = AppState::new(config, tera);
    let app = create_router(state);

    start_server(app, &http_config).await?;

    Ok(())
}
