//! Collaborator trait definitions

mod messenger;
mod reachability;
mod site_store;
mod tunnel_supervisor;

pub use messenger::{Messenger, OperatorAlerter};
pub use reachability::{NetworkReachabilityProbe, ReachabilityProbe};
pub use site_store::SiteStore;
pub use tunnel_supervisor::{CommandTunnelSupervisor, TunnelSupervisor};

// Re-export provider 库的 trait
pub use domain_provisioner_provider::{DnsZoneProvider, Registrar};
