//! WebSearch-RS: fallback-chain web search with readable page extraction
//!
//! This is the main entry point for the application.

use anyhow::{bail, Context, Result};
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;
use websearch_rs::{
    config::{self, Settings},
    network::HttpClient,
    web::{create_router, AppState},
};

/// What the command line asked for
enum Command {
    Serve { config: Option<PathBuf> },
    Help,
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let config_path = match parse_args(std::env::args().skip(1))? {
        Command::Serve { config } => config,
        Command::Help => {
            print_usage();
            return Ok(());
        }
        Command::Version => {
            println!("websearch-rs {}", websearch_rs::VERSION);
            return Ok(());
        }
    };

    // Load configuration
    let settings = config::load(config_path.as_deref())?;

    // Initialize logging
    init_tracing(&settings);

    info!("Starting WebSearch-RS v{}", websearch_rs::VERSION);
    info!(
        "Loaded configuration for instance: {} (providers: {})",
        settings.general.instance_name,
        settings.search.providers.join(", ")
    );

    // Initialize HTTP client
    let client = HttpClient::with_settings(&settings.outgoing)?;
    info!("HTTP client initialized");

    // Create application state
    let state = AppState::new(settings.clone(), client)?;
    info!(
        "Application state initialized with {} engines",
        state.search.registry().len()
    );

    // Create router
    let app = create_router(state);

    // Bind address
    let addr = SocketAddr::new(
        settings
            .server
            .bind_address
            .parse()
            .with_context(|| format!("invalid bind address {}", settings.server.bind_address))?,
        settings.server.port,
    );

    info!("Starting server on http://{}", addr);

    // Start server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Install the fmt subscriber; `RUST_LOG` wins over the settings
fn init_tracing(settings: &Settings) {
    let default_level = if settings.general.debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Command> {
    let mut config = None;
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => return Ok(Command::Help),
            "-V" | "--version" => return Ok(Command::Version),
            "-c" | "--config" => match args.next() {
                Some(path) => config = Some(PathBuf::from(path)),
                None => bail!("{} requires a file argument", arg),
            },
            other => bail!("unexpected argument: {} (see --help)", other),
        }
    }
    Ok(Command::Serve { config })
}

/// Print usage information
fn print_usage() {
    println!(
        r#"
WebSearch-RS v{}
Fallback-chain web search with readable page extraction

USAGE:
    websearch-rs [OPTIONS]

OPTIONS:
    -c, --config <FILE>    Path to configuration file
    -h, --help             Print help information
    -V, --version          Print version information

ENVIRONMENT VARIABLES:
    WEBSEARCH_SETTINGS_PATH  Path to settings.yml
    WEBSEARCH_DEBUG          Enable debug logging (true/false)
    WEBSEARCH_PORT           Server port
    WEBSEARCH_BIND_ADDRESS   Bind address
    WEBSEARCH_PROXY          Outbound proxy for every request
    WEBSEARCH_PROVIDERS      Comma-separated fallback chain
    RUST_LOG                 Log filter, overrides the debug setting
"#,
        websearch_rs::VERSION
    );
}
