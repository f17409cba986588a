//! Telemetry sink entry point.

use clap::{Parser, Subcommand};
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use telemetry_sink::api::{bind_listener, create_router_with_limit, serve, AppState};
use telemetry_sink::config::{Config, VERBOSE_LOG_FILTER};
use telemetry_sink::metrics;

/// In-memory sensor telemetry sink with a live dashboard.
#[derive(Parser, Debug)]
#[command(name = "telemetry-sink")]
#[command(about = "Accepts sensor reading batches over HTTP and serves them back live")]
#[command(version)]
struct Args {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,

    /// HTTP listen port (overrides PORT).
    #[arg(short, long)]
    port: Option<u16>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP server (default).
    Serve {
        /// HTTP listen port (overrides PORT).
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Check configuration validity.
    CheckConfig,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Load configuration first so VERBOSE and RUST_LOG shape the filter
    let config = Config::load();

    // Initialize logging
    let filter = match &config {
        Ok(c) => EnvFilter::new(c.log_filter(args.verbose)),
        Err(_) if args.verbose => EnvFilter::new(VERBOSE_LOG_FILTER),
        Err(_) => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    match args.command {
        Some(Command::CheckConfig) => cmd_check_config(config),
        Some(Command::Serve { port }) => cmd_serve(config, port.or(args.port)).await,
        None => cmd_serve(config, args.port).await,
    }
}

/// Check configuration validity.
fn cmd_check_config(config: telemetry_sink::Result<Config>) -> anyhow::Result<()> {
    println!("======================================================================");
    println!("TELEMETRY SINK - CONFIGURATION CHECK");
    println!("======================================================================");

    print!("Loading configuration... ");
    let config = match config {
        Ok(c) => {
            println!("OK");
            c
        }
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Configuration load failed"));
        }
    };

    print!("Validating configuration... ");
    match config.validate().map_err(anyhow::Error::msg).and_then(|()| {
        config.bind_addr().map_err(anyhow::Error::from)
    }) {
        Ok(addr) => {
            println!("OK");
            println!("----------------------------------------------------------------------");
            println!("Configuration Summary:");
            println!("  Listen Address: {}", addr);
            println!("  Max Body: {} bytes", config.max_body_bytes);
            println!("  Log Filter: {}", config.log_filter(false));
            println!("  Verbose: {}", config.verbose);
            println!("======================================================================");
            println!("CONFIGURATION CHECK PASSED");
            println!("======================================================================");
            Ok(())
        }
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            Err(anyhow::anyhow!("Configuration validation failed"))
        }
    }
}

/// Run the HTTP server until a shutdown signal arrives.
async fn cmd_serve(
    config: telemetry_sink::Result<Config>,
    port_override: Option<u16>,
) -> anyhow::Result<()> {
    let mut config = config.map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;

    if let Some(port) = port_override {
        config.port = port;
    }

    if let Err(e) = config.validate() {
        error!("Invalid configuration: {}", e);
        return Err(anyhow::anyhow!("Configuration validation failed: {}", e));
    }

    let mut app_state = AppState::new();
    match metrics::install_prometheus() {
        Ok(handle) => app_state = app_state.with_prometheus(handle),
        Err(e) => warn!("Prometheus recorder unavailable, /metrics disabled: {}", e),
    }

    let listener = bind_listener(config.bind_addr()?).await?;
    info!("Readings are held in memory only and are lost on restart");

    let router = create_router_with_limit(app_state, config.max_body_bytes);
    serve(listener, router).await?;

    Ok(())
}
