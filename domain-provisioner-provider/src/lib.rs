//! # domain-provisioner-provider
//!
//! Typed clients for the two remote services a custom-domain provisioning run
//! talks to: the DNS/CDN provider that hosts the zone and the registrar that
//! sells the name.
//!
//! ## Supported Services
//!
//! | Service | Trait | Feature Flag | Auth Method |
//! |---------|-------|-------------|-------------|
//! | [Cloudflare](https://www.cloudflare.com/) | [`DnsZoneProvider`] | `cloudflare` | Bearer Token |
//! | [ResellerClub](https://www.resellerclub.com/) | [`Registrar`] | `resellerclub` | `auth-userid` + `api-key` |
//!
//! ## Feature Flags
//!
//! - **`all-providers`** *(default)*: enable both clients.
//! - **`rustls`** *(default)* / **`native-tls`**: TLS backend for `reqwest`.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::time::Duration;
//!
//! use domain_provisioner_provider::{
//!     CloudflareProvider, DnsZoneProvider, Registrar, ResellerClubRegistrar,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let registrar = ResellerClubRegistrar::new(
//!         "123456".to_string(),
//!         "api-key".to_string(),
//!         Duration::from_secs(5),
//!     );
//!     let tlds = vec!["in".to_string(), "com".to_string()];
//!     for result in registrar.check_availability("sharmadhaba", &tlds).await? {
//!         println!("{} available={}", result.domain, result.available);
//!     }
//!
//!     let cloudflare = CloudflareProvider::new("token".to_string(), "account".to_string());
//!     let zone = cloudflare.add_zone("sharmadhaba.in").await?;
//!     println!("nameservers: {:?}", zone.name_servers);
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Every operation returns [`Result<T, ProviderError>`](ProviderError).
//! [`ProviderError::is_conflict`] flags the "already there" outcomes
//! (`ZoneExists`, `RecordExists`, `DomainExists`) that provisioning treats as
//! success. Nothing is retried inside this crate.

mod error;
mod http_client;
mod providers;
mod traits;
mod types;
mod utils;

// Re-export error types
pub use error::{ProviderError, Result};

// Re-export public traits only (internal traits are not exported)
pub use traits::{DnsZoneProvider, Registrar};

// Re-export types
pub use types::{
    CnameRecordRequest, DnsRecord, DomainAvailability, NewContact, NewCustomer, PhoneNumber,
    PostalAddress, RegistrationReceipt, RegistrationRequest, Zone, ZoneStatus,
};

pub use providers::common::{DEFAULT_REQUEST_TIMEOUT_SECS, normalize_domain_name};
pub use utils::log_sanitizer;

// Re-export concrete providers (behind feature flags)
#[cfg(feature = "cloudflare")]
pub use providers::CloudflareProvider;

#[cfg(feature = "resellerclub")]
pub use providers::ResellerClubRegistrar;
