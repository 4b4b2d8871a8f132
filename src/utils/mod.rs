//! Shared utilities: unified error type and logging setup.

pub mod errors;
pub mod logging;

pub use errors::GatewayError;
