//! Domain Provisioner Core Library
//!
//! Business logic for giving a hosted site its own domain:
//! - Candidate generation and availability checks
//! - Registrar identity, DNS zone/records, registration and tunnel ingress
//! - The provisioning orchestrator with its per-site concurrency guard
//! - Background DNS propagation monitoring and the startup recovery scan
//!
//! Storage, messaging and process control sit behind traits so the host
//! application decides how sites are persisted and how people are reached.

pub mod error;
pub mod services;
pub mod traits;
pub mod types;

#[cfg(test)]
mod test_utils;

// Re-export common types
pub use error::{CoreError, CoreResult};
pub use services::{
    AvailabilityService, ProvisioningService, RecoveryService, ServiceContext,
    generate_candidates,
};
pub use traits::{
    CommandTunnelSupervisor, Messenger, NetworkReachabilityProbe, OperatorAlerter,
    ReachabilityProbe, SiteStore, TunnelSupervisor,
};
