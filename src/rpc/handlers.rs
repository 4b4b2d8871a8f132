use alloy::primitives::{Address, B256};
use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, warn};

use crate::utils::errors::{GatewayError, Result};

/// Trait describing the contract surface the HTTP handlers require.
/// Implemented by `chain::ChainClient`; tests substitute a mock.
#[async_trait]
pub trait VotingChain: Send + Sync + 'static {
    /// Address the contract is deployed at (for status reporting)
    fn contract_address(&self) -> Address;

    /// Owner-only write: append a candidate with zero votes
    async fn add_candidate(&self, name: &str) -> Result<B256>;

    /// Ordered candidate list as stored on-chain
    async fn candidates(&self) -> Result<Vec<CandidateSummary>>;

    async fn candidate_count(&self) -> Result<u64>;

    /// True once the current round has been ended
    async fn voting_ended(&self) -> Result<bool>;

    async fn winner(&self) -> Result<String>;

    async fn contract_owner(&self) -> Result<Address>;

    /// Whether `voter` already voted in the current round
    async fn voted_in_current_round(&self, voter: Address) -> Result<bool>;

    /// Send `vote(index)` from the voter's account
    async fn cast_vote(&self, voter: Address, index: u64) -> Result<B256>;

    async fn end_voting(&self) -> Result<B256>;
    async fn start_voting(&self) -> Result<B256>;
    async fn reset_voting(&self) -> Result<B256>;
}

/// One candidate row as read from the contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateSummary {
    pub name: String,
    pub vote_count: u64,
}

// ---------------------------------------------------------------------------
// Request / response bodies
// ---------------------------------------------------------------------------
//
// Request fields are kept as loose JSON values so that shape errors surface
// as 400s with the documented messages rather than as deserializer
// rejections.

#[derive(Debug, Default, Deserialize)]
pub struct AddCandidateRequest {
    #[serde(default)]
    pub name: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteRequest {
    #[serde(default)]
    pub address: Option<Value>,
    #[serde(default)]
    pub candidate_index: Option<Value>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddCandidateResponse {
    pub success: bool,
    pub message: String,
    pub transaction_hash: String,
    pub candidate_name: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateEntry {
    pub index: usize,
    pub name: String,
    pub vote_count: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidatesResponse {
    pub success: bool,
    pub candidates: Vec<CandidateEntry>,
    pub total_candidates: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteResponse {
    pub success: bool,
    pub message: String,
    pub transaction_hash: String,
    pub candidate_index: u64,
    pub voter_address: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WinnerResponse {
    pub success: bool,
    pub winner: String,
    pub voting_ended: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EndVotingResponse {
    pub success: bool,
    pub message: String,
    pub winner: String,
    pub transaction_hash: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LifecycleResponse {
    pub success: bool,
    pub message: String,
    pub transaction_hash: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub success: bool,
    pub voting_ended: bool,
    pub candidate_count: u64,
    pub contract_address: String,
    pub owner: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub contract_address: String,
}

// ---------------------------------------------------------------------------
// Input validation
// ---------------------------------------------------------------------------

fn require_name(raw: Option<&Value>) -> Result<String> {
    let name = raw.and_then(Value::as_str).map(str::trim).unwrap_or("");
    if name.is_empty() {
        return Err(GatewayError::bad_request(
            "Candidate name is required and must be a non-empty string",
        ));
    }
    Ok(name.to_string())
}

fn require_address(raw: Option<&Value>) -> Result<Address> {
    raw.and_then(Value::as_str)
        .and_then(|s| s.parse::<Address>().ok())
        .ok_or_else(|| GatewayError::bad_request("Valid Ethereum address is required"))
}

/// Accepts a JSON number or a numeric string, rejects negatives and
/// non-numerics with the documented messages. Deliberately stricter than
/// parseInt-style coercion: fractional numbers and strings with trailing
/// garbage ("2abc") are rejected, not truncated.
fn require_candidate_index(raw: Option<&Value>) -> Result<u64> {
    let value = match raw {
        None | Some(Value::Null) => {
            return Err(GatewayError::bad_request("Candidate index is required"))
        }
        Some(v) => v,
    };
    let parsed = match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| {
        GatewayError::bad_request("Candidate index must be a valid non-negative number")
    })
}

// ---------------------------------------------------------------------------
// Handler logic
// ---------------------------------------------------------------------------

/// Endpoint logic, one method per route. HTTP plumbing lives in
/// `rpc::server`; everything here is testable against a mock chain.
pub struct VotingApi {
    chain: Arc<dyn VotingChain>,
}

impl VotingApi {
    pub fn new(chain: Arc<dyn VotingChain>) -> Self {
        Self { chain }
    }

    pub async fn add_candidate(
        &self,
        req: AddCandidateRequest,
    ) -> Result<AddCandidateResponse> {
        let name = require_name(req.name.as_ref())?;
        info!(candidate = %name, "adding candidate");

        let hash = self.chain.add_candidate(&name).await?;
        info!(tx = %hash, "candidate added");

        Ok(AddCandidateResponse {
            success: true,
            message: "Candidate added successfully".to_string(),
            transaction_hash: hash.to_string(),
            candidate_name: name,
        })
    }

    pub async fn list_candidates(&self) -> Result<CandidatesResponse> {
        let rows = self.chain.candidates().await?;
        info!("found {} candidates", rows.len());

        let candidates: Vec<CandidateEntry> = rows
            .into_iter()
            .enumerate()
            .map(|(index, c)| CandidateEntry {
                index,
                name: c.name,
                vote_count: c.vote_count,
            })
            .collect();
        let total_candidates = candidates.len();

        Ok(CandidatesResponse {
            success: true,
            candidates,
            total_candidates,
        })
    }

    pub async fn cast_vote(&self, req: VoteRequest) -> Result<VoteResponse> {
        let voter = require_address(req.address.as_ref())?;
        let index = require_candidate_index(req.candidate_index.as_ref())?;
        info!(voter = %voter, index, "casting vote");

        if self.chain.voting_ended().await? {
            return Err(GatewayError::bad_request("Voting has ended"));
        }

        // The contract enforces this too; we pre-check to avoid burning gas.
        // If the check itself fails upstream, proceed with the vote and let
        // the contract be the judge.
        match self.chain.voted_in_current_round(voter).await {
            Ok(true) => {
                return Err(GatewayError::bad_request(
                    "You have already voted in this round",
                ))
            }
            Ok(false) => {}
            Err(e) => warn!("voting round check failed, proceeding with vote: {e}"),
        }

        if index >= self.chain.candidate_count().await? {
            return Err(GatewayError::bad_request("Invalid candidate index"));
        }

        let hash = self.chain.cast_vote(voter, index).await?;
        info!(tx = %hash, "vote cast");

        Ok(VoteResponse {
            success: true,
            message: "Vote cast successfully".to_string(),
            transaction_hash: hash.to_string(),
            candidate_index: index,
            voter_address: voter.to_string(),
        })
    }

    pub async fn winner(&self) -> Result<WinnerResponse> {
        if !self.chain.voting_ended().await? {
            return Err(GatewayError::bad_request("Voting has not ended yet"));
        }

        let winner = self.chain.winner().await?;
        info!(winner = %winner, "winner fetched");

        Ok(WinnerResponse {
            success: true,
            winner,
            voting_ended: true,
        })
    }

    pub async fn end_voting(&self) -> Result<EndVotingResponse> {
        if self.chain.voting_ended().await? {
            return Err(GatewayError::bad_request("Voting has already ended"));
        }

        let hash = self.chain.end_voting().await?;
        let winner = self.chain.winner().await?;
        info!(tx = %hash, winner = %winner, "voting ended");

        Ok(EndVotingResponse {
            success: true,
            message: "Voting ended successfully".to_string(),
            winner,
            transaction_hash: hash.to_string(),
        })
    }

    pub async fn start_voting(&self) -> Result<LifecycleResponse> {
        if !self.chain.voting_ended().await? {
            return Err(GatewayError::bad_request("Voting is already active"));
        }

        let hash = self.chain.start_voting().await?;
        info!(tx = %hash, "voting started");

        Ok(LifecycleResponse {
            success: true,
            message: "Voting started successfully".to_string(),
            transaction_hash: hash.to_string(),
        })
    }

    pub async fn reset_voting(&self) -> Result<LifecycleResponse> {
        let hash = self.chain.reset_voting().await?;
        info!(tx = %hash, "voting reset");

        Ok(LifecycleResponse {
            success: true,
            message: "Voting reset successfully - all vote counts cleared and voting restarted"
                .to_string(),
            transaction_hash: hash.to_string(),
        })
    }

    pub async fn status(&self) -> Result<StatusResponse> {
        let voting_ended = self.chain.voting_ended().await?;
        let candidate_count = self.chain.candidate_count().await?;
        let owner = self.chain.contract_owner().await?;

        Ok(StatusResponse {
            success: true,
            voting_ended,
            candidate_count,
            contract_address: self.chain.contract_address().to_string(),
            owner: owner.to_string(),
        })
    }

    pub fn health(&self) -> HealthResponse {
        HealthResponse {
            status: "OK".to_string(),
            timestamp: Utc::now().to_rfc3339(),
            contract_address: self.chain.contract_address().to_string(),
        }
    }
}
