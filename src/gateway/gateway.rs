//! Gateway assembly: connect the chain client, start the API server, hand
//! back a ServiceHandle for graceful shutdown.

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::chain::ChainClient;
use crate::config::GatewayConfig;
use crate::gateway::service_handle::ServiceHandle;
use crate::rpc::{ApiServer, VotingChain};

pub struct Gateway {
    cfg: GatewayConfig,
}

impl Gateway {
    pub fn new(cfg: GatewayConfig) -> Self {
        Self { cfg }
    }

    /// Connect upstream and spawn the API server.
    pub async fn start(self) -> Result<ServiceHandle> {
        let client = ChainClient::connect(&self.cfg).await?;
        let owner = client.owner_account();
        let chain: Arc<dyn VotingChain> = Arc::new(client);

        let addr: SocketAddr = self
            .cfg
            .listen_addr
            .parse()
            .with_context(|| format!("invalid listen address {}", self.cfg.listen_addr))?;

        let (mut svc_handle, shutdown_rx) = ServiceHandle::new();
        let server = ApiServer::new(addr, chain.clone());
        let h: JoinHandle<anyhow::Result<()>> = tokio::spawn(async move {
            if let Err(e) = server.start(shutdown_rx).await {
                error!("API server failed: {e:?}");
                return Err(e);
            }
            Ok(())
        });
        svc_handle.attach(h);

        info!(
            "gateway started: listening on {}, contract {}, owner {}",
            addr,
            chain.contract_address(),
            owner
        );
        info!("health check: http://{addr}/health");
        Ok(svc_handle)
    }
}
