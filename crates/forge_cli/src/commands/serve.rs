//! Serve command - Run the build API.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use forge_server::ServerConfig;

#[derive(Args)]
pub struct ServeArgs {
    /// YAML configuration file
    #[arg(short, long, env = "FORGE_CONFIG")]
    config: Option<PathBuf>,

    /// Address to listen on, overrides the configuration
    #[arg(short, long)]
    bind: Option<String>,

    /// Print the effective configuration and exit
    #[arg(long)]
    print_config: bool,
}

pub async fn execute(args: ServeArgs) -> Result<()> {
    let mut config = ServerConfig::load(args.config.as_deref())
        .context("Failed to load server configuration")?;
    if let Some(bind) = args.bind {
        config.server.bind = bind;
        config.validate()?;
    }

    if args.print_config {
        print!("{}", config.to_yaml()?);
        return Ok(());
    }

    info!("Starting pageforge server on {}", config.server.bind);
    forge_server::serve(config).await?;
    Ok(())
}
