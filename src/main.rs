//! Contentstack MCP Server binary.

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use rmcp::{transport::stdio, ServiceExt};
use tracing_subscriber::EnvFilter;

use contentstack_mcp::config::{ConfigOverrides, Settings, DEFAULT_CONFIG_FILE};
use contentstack_mcp::debug::DebugLogger;
use contentstack_mcp::{ContentstackServer, ToolDispatcher};

#[derive(Parser, Debug)]
#[command(name = "contentstack-mcp")]
#[command(author, version, about = "Contentstack MCP Server", long_about = None)]
struct Args {
    /// Path to configuration file [default: contentstack.json, skipped if absent]
    #[arg(short, long)]
    config: Option<String>,

    /// Default region (NA, EU, AZURE_NA, AZURE_EU, GCP_NA, GCP_EU); overrides CONTENTSTACK_REGION
    #[arg(short, long)]
    region: Option<String>,

    /// Enable debug mode (logs all tool calls)
    #[arg(short, long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // stdout carries the MCP stream; logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let config_path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_FILE);
    let settings = Settings::load_from(args.config.as_deref())
        .with_context(|| format!("Failed to load config file {}", config_path))?;
    let debug_enabled = args.debug || settings.debug;
    let debug = Arc::new(DebugLogger::new(debug_enabled));

    let defaults = ConfigOverrides {
        region: args.region.clone(),
        ..ConfigOverrides::default()
    };
    let dispatcher = ToolDispatcher::new(defaults, ConfigOverrides::from(&settings))?;

    if debug_enabled {
        debug.log("Contentstack MCP Server starting...");
        debug.log(&format!("Config file: {}", config_path));
        debug.log(&format!("Region: {}", dispatcher.client_config(None).region));
        if let Some(path) = debug.trace_path() {
            eprintln!("[DEBUG] Trace file: {}", path.display());
        }
    }

    let server = ContentstackServer::new(dispatcher, debug.clone());

    tracing::info!("Starting Contentstack MCP server on stdio transport");
    let service = server.serve(stdio()).await?;

    service.waiting().await?;

    if debug_enabled {
        debug.log("MCP server shutting down");
    }

    Ok(())
}
