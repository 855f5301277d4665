//! sonarcloud-mcp: MCP server exposing SonarCloud issue search and
//! summarization.

mod server;
mod tools;
mod types;

use anyhow::Result;
use clap::{ArgAction, Parser};
use rmcp::ServiceExt;
use tracing_subscriber::EnvFilter;

use crate::server::SonarCloudMcpServer;

#[derive(Parser)]
#[command(version, about = "MCP server for SonarCloud issue search and summarization")]
struct Cli {
  /// Sets the level of verbosity (can be used multiple times)
  #[arg(
    short = 'v',
    long = "verbose",
    action = ArgAction::Count,
    long_help = "Sets the level of verbosity for tracing and logging output.\n\n\
             -v: Show info level messages\n\
             -vv: Show debug level messages\n\
             -vvv: Show trace level messages"
  )]
  verbose: u8,
}

#[tokio::main]
async fn main() -> Result<()> {
  let cli = Cli::parse();

  // Tracing to stderr — stdout is reserved for MCP JSON-RPC protocol.
  let level = match cli.verbose {
    0 => tracing::Level::WARN,
    1 => tracing::Level::INFO,
    2 => tracing::Level::DEBUG,
    _ => tracing::Level::TRACE,
  };

  tracing_subscriber::fmt()
    .with_writer(std::io::stderr)
    .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
    .init();

  let server = SonarCloudMcpServer::new();

  // Start MCP server on stdio
  let service = server.serve(rmcp::transport::io::stdio()).await?;
  service.waiting().await?;

  Ok(())
}
