//! Endpoint tests: router + handlers against a mock chain.

use alloy::primitives::{Address, B256};
use async_trait::async_trait;
use axum::body::Body;
use axum::http::header::CONTENT_TYPE;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use crate::rpc::handlers::CandidateSummary;
use crate::rpc::server::router;
use crate::rpc::{VotingApi, VotingChain};
use crate::utils::errors::GatewayError;

const VOTER: &str = "0x13922310EEB17f2d210818919D7B9548339F43b6";

fn tx_hash() -> B256 {
    B256::repeat_byte(0x11)
}

fn contract_address() -> Address {
    Address::repeat_byte(0x42)
}

fn owner_address() -> Address {
    Address::repeat_byte(0x99)
}

/// Canned chain backend. Flags select the scenario under test.
struct MockChain {
    ended: bool,
    already_voted: bool,
    round_check_fails: bool,
    reads_fail: bool,
    candidates: Vec<CandidateSummary>,
    winner: &'static str,
}

impl Default for MockChain {
    fn default() -> Self {
        Self {
            ended: false,
            already_voted: false,
            round_check_fails: false,
            reads_fail: false,
            candidates: vec![
                CandidateSummary {
                    name: "Alice".to_string(),
                    vote_count: 2,
                },
                CandidateSummary {
                    name: "Bob".to_string(),
                    vote_count: 1,
                },
                CandidateSummary {
                    name: "Carol".to_string(),
                    vote_count: 0,
                },
            ],
            winner: "Alice",
        }
    }
}

#[async_trait]
impl VotingChain for MockChain {
    fn contract_address(&self) -> Address {
        contract_address()
    }

    async fn add_candidate(&self, _name: &str) -> Result<B256, GatewayError> {
        Ok(tx_hash())
    }

    async fn candidates(&self) -> Result<Vec<CandidateSummary>, GatewayError> {
        if self.reads_fail {
            return Err(GatewayError::upstream("connection refused"));
        }
        Ok(self.candidates.clone())
    }

    async fn candidate_count(&self) -> Result<u64, GatewayError> {
        Ok(self.candidates.len() as u64)
    }

    async fn voting_ended(&self) -> Result<bool, GatewayError> {
        if self.reads_fail {
            return Err(GatewayError::upstream("connection refused"));
        }
        Ok(self.ended)
    }

    async fn winner(&self) -> Result<String, GatewayError> {
        Ok(self.winner.to_string())
    }

    async fn contract_owner(&self) -> Result<Address, GatewayError> {
        Ok(owner_address())
    }

    async fn voted_in_current_round(&self, _voter: Address) -> Result<bool, GatewayError> {
        if self.round_check_fails {
            return Err(GatewayError::upstream("lastVotingRound reverted"));
        }
        Ok(self.already_voted)
    }

    async fn cast_vote(&self, _voter: Address, _index: u64) -> Result<B256, GatewayError> {
        Ok(tx_hash())
    }

    async fn end_voting(&self) -> Result<B256, GatewayError> {
        Ok(tx_hash())
    }

    async fn start_voting(&self) -> Result<B256, GatewayError> {
        Ok(tx_hash())
    }

    async fn reset_voting(&self) -> Result<B256, GatewayError> {
        Ok(tx_hash())
    }
}

fn app(chain: MockChain) -> Router {
    router(Arc::new(VotingApi::new(Arc::new(chain))))
}

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(b) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(b.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

#[tokio::test]
async fn health_reports_contract_address() {
    let (status, body) = send(app(MockChain::default()), Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "OK");
    assert_eq!(body["contractAddress"], contract_address().to_string());
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn status_reports_chain_state() {
    let (status, body) = send(app(MockChain::default()), Method::GET, "/api/status", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["votingEnded"], false);
    assert_eq!(body["candidateCount"], 3);
    assert_eq!(body["contractAddress"], contract_address().to_string());
    assert_eq!(body["owner"], owner_address().to_string());
}

#[tokio::test]
async fn unknown_route_is_404() {
    let (status, body) = send(app(MockChain::default()), Method::GET, "/api/nope", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Endpoint not found");
}

#[tokio::test]
async fn add_candidate_requires_a_name() {
    let (status, body) = send(
        app(MockChain::default()),
        Method::POST,
        "/api/candidates",
        Some(json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"],
        "Candidate name is required and must be a non-empty string"
    );

    let (status, _) = send(
        app(MockChain::default()),
        Method::POST,
        "/api/candidates",
        Some(json!({ "name": "   " })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn add_candidate_trims_name_and_echoes_tx_hash() {
    let (status, body) = send(
        app(MockChain::default()),
        Method::POST,
        "/api/candidates",
        Some(json!({ "name": "  Dave  " })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["candidateName"], "Dave");
    assert_eq!(body["transactionHash"], tx_hash().to_string());
}

#[tokio::test]
async fn candidates_are_listed_in_contract_order() {
    let (status, body) = send(
        app(MockChain::default()),
        Method::GET,
        "/api/candidates",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalCandidates"], 3);
    assert_eq!(body["candidates"][0]["index"], 0);
    assert_eq!(body["candidates"][0]["name"], "Alice");
    assert_eq!(body["candidates"][0]["voteCount"], 2);
    assert_eq!(body["candidates"][2]["name"], "Carol");
}

#[tokio::test]
async fn vote_rejects_malformed_address() {
    let (status, body) = send(
        app(MockChain::default()),
        Method::POST,
        "/api/vote",
        Some(json!({ "address": "0x1234", "candidateIndex": 0 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Valid Ethereum address is required");

    let (status, _) = send(
        app(MockChain::default()),
        Method::POST,
        "/api/vote",
        Some(json!({ "candidateIndex": 0 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn vote_rejects_missing_or_negative_index() {
    let (status, body) = send(
        app(MockChain::default()),
        Method::POST,
        "/api/vote",
        Some(json!({ "address": VOTER })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Candidate index is required");

    let (status, body) = send(
        app(MockChain::default()),
        Method::POST,
        "/api/vote",
        Some(json!({ "address": VOTER, "candidateIndex": -1 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"],
        "Candidate index must be a valid non-negative number"
    );
}

#[tokio::test]
async fn vote_rejected_after_voting_ended() {
    let chain = MockChain {
        ended: true,
        ..Default::default()
    };
    let (status, body) = send(
        app(chain),
        Method::POST,
        "/api/vote",
        Some(json!({ "address": VOTER, "candidateIndex": 0 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Voting has ended");
}

#[tokio::test]
async fn vote_rejected_when_already_voted_this_round() {
    let chain = MockChain {
        already_voted: true,
        ..Default::default()
    };
    let (status, body) = send(
        app(chain),
        Method::POST,
        "/api/vote",
        Some(json!({ "address": VOTER, "candidateIndex": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "You have already voted in this round");
}

#[tokio::test]
async fn vote_rejects_out_of_range_index() {
    let (status, body) = send(
        app(MockChain::default()),
        Method::POST,
        "/api/vote",
        Some(json!({ "address": VOTER, "candidateIndex": 3 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid candidate index");
}

#[tokio::test]
async fn vote_succeeds_and_echoes_details() {
    let (status, body) = send(
        app(MockChain::default()),
        Method::POST,
        "/api/vote",
        Some(json!({ "address": VOTER, "candidateIndex": "2" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["candidateIndex"], 2);
    assert_eq!(body["transactionHash"], tx_hash().to_string());
    // address is echoed in checksummed form
    assert_eq!(
        body["voterAddress"],
        VOTER.parse::<Address>().unwrap().to_string()
    );
}

#[tokio::test]
async fn vote_proceeds_when_round_check_fails_upstream() {
    let chain = MockChain {
        round_check_fails: true,
        ..Default::default()
    };
    let (status, body) = send(
        app(chain),
        Method::POST,
        "/api/vote",
        Some(json!({ "address": VOTER, "candidateIndex": 0 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
}

#[tokio::test]
async fn winner_unavailable_while_voting_active() {
    let (status, body) = send(app(MockChain::default()), Method::GET, "/api/winner", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Voting has not ended yet");
}

#[tokio::test]
async fn winner_returned_after_voting_ended() {
    let chain = MockChain {
        ended: true,
        ..Default::default()
    };
    let (status, body) = send(app(chain), Method::GET, "/api/winner", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["winner"], "Alice");
    assert_eq!(body["votingEnded"], true);
}

#[tokio::test]
async fn end_voting_rejected_when_already_ended() {
    let chain = MockChain {
        ended: true,
        ..Default::default()
    };
    let (status, body) = send(app(chain), Method::POST, "/api/end-voting", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Voting has already ended");
}

#[tokio::test]
async fn end_voting_reports_winner_and_tx() {
    let (status, body) = send(
        app(MockChain::default()),
        Method::POST,
        "/api/end-voting",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["winner"], "Alice");
    assert_eq!(body["transactionHash"], tx_hash().to_string());
}

#[tokio::test]
async fn start_voting_rejected_while_active() {
    let (status, body) = send(
        app(MockChain::default()),
        Method::POST,
        "/api/start-voting",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Voting is already active");
}

#[tokio::test]
async fn start_voting_succeeds_after_end() {
    let chain = MockChain {
        ended: true,
        ..Default::default()
    };
    let (status, body) = send(app(chain), Method::POST, "/api/start-voting", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Voting started successfully");
    assert_eq!(body["transactionHash"], tx_hash().to_string());
}

#[tokio::test]
async fn upstream_failure_surfaces_as_500_with_message() {
    let chain = MockChain {
        reads_fail: true,
        ..Default::default()
    };
    let (status, body) = send(app(chain), Method::GET, "/api/candidates", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Internal server error");
    assert_eq!(body["message"], "connection refused");
}

#[tokio::test]
async fn upstream_failure_on_a_gating_read_is_500_not_400() {
    // the voting-ended read fails before any validation-gated 400 can fire
    let chain = MockChain {
        reads_fail: true,
        ..Default::default()
    };
    let (status, body) = send(
        app(chain),
        Method::POST,
        "/api/vote",
        Some(json!({ "address": VOTER, "candidateIndex": 0 })),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Internal server error");
    assert_eq!(body["message"], "connection refused");
}

#[tokio::test]
async fn reset_voting_is_unconditional() {
    for ended in [false, true] {
        let chain = MockChain {
            ended,
            ..Default::default()
        };
        let (status, body) = send(app(chain), Method::POST, "/api/reset-voting", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["transactionHash"], tx_hash().to_string());
    }
}
