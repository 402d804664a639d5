//! tonepickerd: the Tonepicker daemon.
//!
//! Serves [`ToneRewriteService`](tonepicker::ToneRewriteService) over HTTP.

use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;
use tracing::{info, warn};

use tonepicker::server::config::{API_KEY_ENV_VAR, Config, Secrets};
use tonepicker::server::{AppState, serve};

/// Tonepicker daemon, serving tone rewrites over HTTP.
#[derive(Parser)]
#[command(name = "tonepickerd")]
#[command(version = tonepicker::PKG_VERSION)]
#[command(long_version = tonepicker::version_string())]
#[command(about = "Tonepicker tone rewriting daemon")]
struct Args {
    /// Path to configuration file.
    #[arg(short, long)]
    config: Option<std::path::PathBuf>,

    /// Address to bind to, overriding the config file.
    #[arg(short, long)]
    address: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    // Load configuration
    let config = Config::load(args.config.as_deref())?;
    let secrets = Secrets::load()?;

    let api_key = secrets.api_key();
    if api_key.is_none() {
        // Not fatal: requests fail individually until a key is provided.
        warn!(env = API_KEY_ENV_VAR, "no API key configured; rewrites will fail");
    }

    let service = config.build_service(api_key)?;

    // Parse address
    let address = args.address.as_deref().unwrap_or(&config.server.address);
    let addr: SocketAddr = address.parse().map_err(|e| {
        tonepicker::TonepickerError::Configuration(format!("Invalid address: {e}"))
    })?;

    info!(
        version = tonepicker::version_string(),
        %addr,
        model = %service.model(),
        "tonepickerd starting"
    );

    serve(addr, AppState::new(Arc::new(service))).await?;

    Ok(())
}
