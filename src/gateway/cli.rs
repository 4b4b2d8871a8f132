use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::GatewayConfig;
use crate::gateway::Gateway;
use crate::utils::logging::init_logging;

/// CLI for gateway control.
#[derive(Parser)]
#[clap(name = "votebridge", version)]
pub struct Cli {
    /// Path to the gateway config file
    #[clap(long, default_value = "./votebridge.toml")]
    pub config: PathBuf,

    #[clap(subcommand)]
    pub cmd: Cmd,
}

#[derive(Subcommand)]
pub enum Cmd {
    /// Write a starter config file and exit
    Init,
    /// Run the gateway
    Run {
        /// HTTP bind address override (host:port)
        #[clap(long)]
        listen: Option<String>,
    },
}

pub async fn run_cli() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    match cli.cmd {
        Cmd::Init => {
            if cli.config.exists() {
                anyhow::bail!("{} already exists, not overwriting", cli.config.display());
            }
            std::fs::write(&cli.config, GatewayConfig::sample())?;
            println!("wrote starter config to {}", cli.config.display());
            Ok(())
        }
        Cmd::Run { listen } => {
            let mut cfg = GatewayConfig::load(&cli.config)?;
            if let Some(listen) = listen {
                cfg.listen_addr = listen;
            }

            let gateway = Gateway::new(cfg);
            let svc = gateway.start().await?;
            // Wait for Ctrl+C
            tokio::signal::ctrl_c().await?;
            println!("Shutting down gateway...");
            svc.shutdown().await?;
            println!("Gateway stopped");
            Ok(())
        }
    }
}
