//! HTTP API module
//!
//! - REST endpoints under /api (candidates, vote, winner, lifecycle, status)
//! - Diagnostic endpoint: /health
//! - 404 fallback for unknown routes
//!
//! Handlers depend on the `VotingChain` trait only; wire in the real
//! `chain::ChainClient` (or a mock in tests) through `ApiServer::new()`.

pub mod handlers;
pub mod server;

pub use handlers::{VotingApi, VotingChain};
pub use server::ApiServer;
