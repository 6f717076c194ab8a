//! Google Docs MCP Server - Standalone Binary
//!
//! Settings come from `~/.docs-mcp/config.toml`, then `DOCS_MCP_*` /
//! `GOOGLE_ACCESS_TOKEN` environment variables, then these flags.

use bridge_config::Settings;
use clap::Parser;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Port to listen on (0 for random)
    #[arg(short, long)]
    port: Option<u16>,

    /// Host to bind to
    #[arg(short = 'H', long)]
    host: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    bridge_config::load_env_file();
    let mut settings = Settings::load()?;
    if let Some(port) = args.port {
        settings.port = port;
    }
    if let Some(host) = args.host {
        settings.host = host;
    }
    if let Some(level) = args.log_level {
        settings.log_level = level;
    }

    // RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(settings.log_level.to_lowercase()))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    if settings.access_token.is_none() {
        tracing::info!("No GOOGLE_ACCESS_TOKEN configured; waiting for Authorization headers");
    }

    let host = settings.host.clone();
    let handle = docs_mcp::start_server_on(&host, settings.port, settings).await?;

    println!("Google Docs MCP server running at {}", handle.url());
    println!("Press Ctrl+C to stop");

    tokio::signal::ctrl_c().await?;

    handle.stop();
    Ok(())
}
