//! Votebridge: HTTP gateway over an on-chain voting contract.
//!
//! The gateway owns no durable state of its own. Candidates, vote counts,
//! the voting-round counter and the owner account all live inside the
//! deployed contract; every endpoint validates its input, issues the
//! required JSON-RPC calls, and shapes the result into a JSON response.
//! Transaction ordering and conflict resolution are the chain's problem,
//! not ours.

pub mod chain;
pub mod config;
pub mod gateway;
pub mod rpc;
pub mod utils;
