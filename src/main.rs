use std::sync::Arc;

use anyhow::Result;
use rmcp::{ServiceExt, transport::stdio};
use tracing_subscriber::{self, EnvFilter};

use nih_reporter::{Config, EnvSecretProvider, GrantSearchTool, Server};

#[tokio::main]
async fn main() -> Result<()> {
    // Logging to stderr only (stdout is reserved for MCP protocol)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::DEBUG.into()))
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    tracing::info!("Starting NIH RePORTER MCP Server");

    let config = Config::from_env()?;
    let tool = GrantSearchTool::from_config(&config, Arc::new(EnvSecretProvider))?;

    let service = Server::new(tool).serve(stdio()).await?;
    service.waiting().await?;

    tracing::info!("NIH RePORTER MCP Server stopped");
    Ok(())
}
