//! ResellerClub Registrar
//!
//! HTTP API authenticated with an `auth-userid` / `api-key` pair sent as request
//! parameters. GETs carry parameters in the query string, POSTs as a form body.

mod error;
mod http;
mod provider;
mod types;

use std::time::Duration;

use reqwest::Client;

use crate::providers::common::{create_http_client, trim_base_url};

pub(crate) const RC_API_BASE: &str = "https://httpapi.com/api";

/// ResellerClub domain registrar
pub struct ResellerClubRegistrar {
    pub(crate) client: Client,
    pub(crate) auth_user_id: String,
    pub(crate) api_key: String,
    pub(crate) api_base: String,
}

impl ResellerClubRegistrar {
    /// Create a registrar client. `request_timeout` bounds every call, including
    /// availability checks.
    pub fn new(auth_user_id: String, api_key: String, request_timeout: Duration) -> Self {
        Self {
            client: create_http_client(request_timeout),
            auth_user_id,
            api_key,
            api_base: RC_API_BASE.to_string(),
        }
    }

    /// Point the registrar at a different API base (`https://test.httpapi.com/api`, mocks).
    #[must_use]
    pub fn with_base_url(mut self, base: &str) -> Self {
        self.api_base = trim_base_url(base);
        self
    }
}
