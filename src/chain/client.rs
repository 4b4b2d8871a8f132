use alloy::network::{EthereumWallet, TransactionBuilder};
use alloy::primitives::{Address, Bytes, B256, U256};
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::rpc::types::TransactionRequest;
use alloy::signers::local::PrivateKeySigner;
use alloy::sol_types::SolCall;
use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::info;

use crate::chain::contract::Voting;
use crate::config::GatewayConfig;
use crate::rpc::handlers::{CandidateSummary, VotingChain};
use crate::utils::errors::GatewayError;

/// Chain client backed by two providers over the same RPC endpoint.
///
/// Owner-only writes go through a wallet-equipped provider and are signed
/// locally with the configured key. Voter writes are sent as
/// `eth_sendTransaction` with `from = voter`, so signing is delegated to the
/// node's managed accounts. Reads use the plain provider.
pub struct ChainClient {
    address: Address,
    owner: Address,
    gas_limit: u64,
    node: DynProvider,
    reader: Voting::VotingInstance<DynProvider>,
    owner_writer: Voting::VotingInstance<DynProvider>,
}

impl ChainClient {
    /// Connect to the RPC endpoint and bind the contract at the configured
    /// address. Fails on a malformed address or key, or an unreachable node.
    pub async fn connect(cfg: &GatewayConfig) -> Result<Self> {
        let address: Address = cfg
            .contract_address
            .parse()
            .context("invalid contract address in config")?;
        let signer: PrivateKeySigner = cfg
            .owner_private_key
            .trim_start_matches("0x")
            .parse()
            .context("invalid owner private key in config")?;
        let owner = signer.address();

        let node = ProviderBuilder::new()
            .connect(&cfg.rpc_url)
            .await
            .with_context(|| format!("failed to connect to RPC endpoint {}", cfg.rpc_url))?
            .erased();
        let signed = ProviderBuilder::new()
            .wallet(EthereumWallet::from(signer))
            .connect(&cfg.rpc_url)
            .await
            .with_context(|| format!("failed to connect to RPC endpoint {}", cfg.rpc_url))?
            .erased();

        info!(contract = %address, owner = %owner, rpc = %cfg.rpc_url, "chain client connected");

        Ok(Self {
            address,
            owner,
            gas_limit: cfg.gas_limit,
            node: node.clone(),
            reader: Voting::new(address, node),
            owner_writer: Voting::new(address, signed),
        })
    }

    /// Owner account derived from the configured signing key.
    pub fn owner_account(&self) -> Address {
        self.owner
    }
}

fn upstream(err: impl std::fmt::Display) -> GatewayError {
    GatewayError::upstream(err)
}

#[async_trait]
impl VotingChain for ChainClient {
    fn contract_address(&self) -> Address {
        self.address
    }

    async fn add_candidate(&self, name: &str) -> Result<B256, GatewayError> {
        let pending = self
            .owner_writer
            .addCandidate(name.to_string())
            .gas(self.gas_limit)
            .send()
            .await
            .map_err(upstream)?;
        pending.watch().await.map_err(upstream)
    }

    async fn candidates(&self) -> Result<Vec<CandidateSummary>, GatewayError> {
        let rows = self.reader.getCandidates().call().await.map_err(upstream)?;
        Ok(rows
            .into_iter()
            .map(|c| CandidateSummary {
                name: c.name,
                // counts beyond u64 are not reachable in practice; saturate
                vote_count: c.voteCount.try_into().unwrap_or(u64::MAX),
            })
            .collect())
    }

    async fn candidate_count(&self) -> Result<u64, GatewayError> {
        let count = self
            .reader
            .getCandidateCount()
            .call()
            .await
            .map_err(upstream)?;
        Ok(count.try_into().unwrap_or(u64::MAX))
    }

    async fn voting_ended(&self) -> Result<bool, GatewayError> {
        self.reader.getVotingStatus().call().await.map_err(upstream)
    }

    async fn winner(&self) -> Result<String, GatewayError> {
        self.reader.getWinner().call().await.map_err(upstream)
    }

    async fn contract_owner(&self) -> Result<Address, GatewayError> {
        self.reader.owner().call().await.map_err(upstream)
    }

    async fn voted_in_current_round(&self, voter: Address) -> Result<bool, GatewayError> {
        let last = self
            .reader
            .lastVotingRound(voter)
            .call()
            .await
            .map_err(upstream)?;
        let current = self
            .reader
            .getCurrentVotingRound()
            .call()
            .await
            .map_err(upstream)?;
        Ok(last == current)
    }

    async fn cast_vote(&self, voter: Address, index: u64) -> Result<B256, GatewayError> {
        let input = Voting::voteCall {
            candidateIndex: U256::from(index),
        }
        .abi_encode();
        let tx = TransactionRequest::default()
            .with_from(voter)
            .with_to(self.address)
            .with_gas_limit(self.gas_limit)
            .with_input(Bytes::from(input));
        let pending = self.node.send_transaction(tx).await.map_err(upstream)?;
        pending.watch().await.map_err(upstream)
    }

    async fn end_voting(&self) -> Result<B256, GatewayError> {
        let pending = self
            .owner_writer
            .endVoting()
            .gas(self.gas_limit)
            .send()
            .await
            .map_err(upstream)?;
        pending.watch().await.map_err(upstream)
    }

    async fn start_voting(&self) -> Result<B256, GatewayError> {
        let pending = self
            .owner_writer
            .startVoting()
            .gas(self.gas_limit)
            .send()
            .await
            .map_err(upstream)?;
        pending.watch().await.map_err(upstream)
    }

    async fn reset_voting(&self) -> Result<B256, GatewayError> {
        let pending = self
            .owner_writer
            .resetVoting()
            .gas(self.gas_limit)
            .send()
            .await
            .map_err(upstream)?;
        pending.watch().await.map_err(upstream)
    }
}
