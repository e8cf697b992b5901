//! Propagation checks

use std::time::Duration;

use async_trait::async_trait;
use hickory_resolver::{
    TokioResolver,
    config::{ResolverConfig, ResolverOpts},
    name_server::TokioConnectionProvider,
};
use reqwest::Client;

/// DNS resolution and HTTPS reachability probe used by the propagation monitor.
#[async_trait]
pub trait ReachabilityProbe: Send + Sync {
    /// The domain resolves to at least one address.
    async fn resolves(&self, domain: &str) -> bool;

    /// `https://<domain>` answers with a non-5xx status.
    async fn reachable(&self, domain: &str) -> bool;
}

/// Public-resolver DNS lookup plus an HTTPS `HEAD` request.
pub struct NetworkReachabilityProbe {
    client: Client,
    timeout: Duration,
}

impl NetworkReachabilityProbe {
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()
            .unwrap_or_else(|e| {
                log::warn!("Failed to build probe HTTP client, using defaults: {e}");
                Client::new()
            });
        Self { client, timeout }
    }

    /// 每次检查新建 resolver，避免缓存上一次的 NXDOMAIN
    fn resolver(&self) -> TokioResolver {
        let mut opts = ResolverOpts::default();
        opts.timeout = self.timeout;
        TokioResolver::builder_with_config(
            ResolverConfig::cloudflare(),
            TokioConnectionProvider::default(),
        )
        .with_options(opts)
        .build()
    }
}

#[async_trait]
impl ReachabilityProbe for NetworkReachabilityProbe {
    async fn resolves(&self, domain: &str) -> bool {
        match self.resolver().lookup_ip(domain).await {
            Ok(lookup) => lookup.iter().next().is_some(),
            Err(e) => {
                log::debug!("[probe] {domain} does not resolve yet: {e}");
                false
            }
        }
    }

    async fn reachable(&self, domain: &str) -> bool {
        let url = format!("https://{domain}");
        match self.client.head(&url).send().await {
            Ok(resp) => {
                let status = resp.status().as_u16();
                log::debug!("[probe] HEAD {url} -> {status}");
                status < 500
            }
            Err(e) => {
                log::debug!("[probe] HEAD {url} failed: {e}");
                false
            }
        }
    }
}
