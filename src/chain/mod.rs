//! Chain access layer.
//!
//! - `contract`: the fixed voting contract ABI as `sol!` bindings
//! - `client`: JSON-RPC client implementing the `VotingChain` trait; owner
//!   writes are signed locally, voter writes are delegated to the node's
//!   managed accounts via `eth_sendTransaction`

pub mod client;
pub mod contract;

pub use client::ChainClient;
