//! Cloudflare DNS/CDN Provider

mod error;
mod http;
mod provider;
mod types;

use std::time::Duration;

use reqwest::Client;

use crate::providers::common::{DEFAULT_REQUEST_TIMEOUT_SECS, create_http_client, trim_base_url};

pub(crate) use types::{CloudflareDnsRecord, CloudflareResponse, CloudflareZone};

pub(crate) const CF_API_BASE: &str = "https://api.cloudflare.com/client/v4";
/// Cloudflare Zones API 单页最大记录数
pub(crate) const MAX_PAGE_SIZE_ZONES: u32 = 50;

/// Cloudflare DNS/CDN Provider
pub struct CloudflareProvider {
    pub(crate) client: Client,
    pub(crate) api_token: String,
    pub(crate) account_id: String,
    pub(crate) api_base: String,
}

impl CloudflareProvider {
    /// Create a provider for the given API token and account (zones are created in it).
    pub fn new(api_token: String, account_id: String) -> Self {
        Self {
            client: create_http_client(Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS)),
            api_token,
            account_id,
            api_base: CF_API_BASE.to_string(),
        }
    }

    /// Point the provider at a different API base (mock servers, API gateways).
    #[must_use]
    pub fn with_base_url(mut self, base: &str) -> Self {
        self.api_base = trim_base_url(base);
        self
    }
}
