//! Remote service implementations

/// Shared utilities used by provider implementations.
pub mod common;

#[cfg(feature = "cloudflare")]
mod cloudflare;
#[cfg(feature = "resellerclub")]
mod resellerclub;

#[cfg(feature = "cloudflare")]
pub use cloudflare::CloudflareProvider;
#[cfg(feature = "resellerclub")]
pub use resellerclub::ResellerClubRegistrar;
