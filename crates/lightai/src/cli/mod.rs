//! LightAI cli definition and entrypoint.
mod repl;
pub mod ux;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use lightai_core::config::Config;
use lightai_core::responder::Responder;
use tracing::info;

use crate::log::{LogTarget, setup_logging};
use crate::server;

/// LightAI - answers locally, or asks a remote model when told to.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Chat in the terminal instead of serving HTTP.
    #[arg(short = 'c', long = "cli")]
    interactive: bool,

    /// Port for the HTTP server, overrides the PORT environment variable.
    #[arg(short, long)]
    port: Option<u16>,

    /// Show verbose logs.
    #[arg(short, long)]
    verbose: bool,
}

/// Runs the main CLI application.
pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    let log_target = if cli.interactive {
        LogTarget::File
    } else {
        LogTarget::Stderr
    };
    setup_logging(log_target, cli.verbose).context("Failed to set up logging")?;

    let config = Config::from_env()
        .context("Failed to load configuration")?
        .with_port_override(cli.port);
    let responder = Responder::from_config(&config).context("Failed to set up remote provider")?;
    info!(
        remote_available = responder.remote_available(),
        use_remote = config.use_remote,
        "Responder ready"
    );

    let responder = Arc::new(responder);
    if cli.interactive {
        repl::run(responder).await
    } else {
        server::serve(config.port, responder).await
    }
}
