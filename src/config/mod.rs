//! Gateway configuration, loaded from a TOML file.
//!
//! Only connection parameters live here; all voting state belongs to the
//! contract. Address and key shapes are validated when the chain client is
//! built, not at parse time.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Gas attached to every contract write.
pub const DEFAULT_GAS_LIMIT: u64 = 300_000;

fn default_listen_addr() -> String {
    "0.0.0.0:3000".to_string()
}

fn default_gas_limit() -> u64 {
    DEFAULT_GAS_LIMIT
}

#[derive(Debug, Clone, Deserialize)]
pub struct GatewayConfig {
    /// HTTP bind address (host:port)
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// JSON-RPC endpoint of the Ethereum-compatible node
    pub rpc_url: String,

    /// Address of the deployed voting contract (0x-prefixed hex)
    pub contract_address: String,

    /// Private key of the owner account, used to sign owner-only writes
    pub owner_private_key: String,

    #[serde(default = "default_gas_limit")]
    pub gas_limit: u64,
}

impl GatewayConfig {
    /// Load the gateway config from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = fs::read_to_string(path.as_ref())
            .with_context(|| format!("failed to read config file {}", path.as_ref().display()))?;
        let cfg: GatewayConfig = toml::from_str(&data).context("failed to parse config file")?;
        Ok(cfg)
    }

    /// Starter config written by the `init` subcommand.
    pub fn sample() -> &'static str {
        concat!(
            "# votebridge gateway configuration\n",
            "listen_addr = \"0.0.0.0:3000\"\n",
            "rpc_url = \"http://127.0.0.1:8545\"\n",
            "contract_address = \"0x0000000000000000000000000000000000000000\"\n",
            "owner_private_key = \"<hex private key of the contract owner>\"\n",
            "gas_limit = 300000\n",
        )
    }
}
