//! Gateway wiring: CLI entry point, service assembly, graceful shutdown.

pub mod cli;
#[allow(clippy::module_inception)]
pub mod gateway;
pub mod service_handle;

pub use gateway::Gateway;
pub use service_handle::ServiceHandle;
