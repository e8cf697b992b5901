//! Site record persistence trait

use async_trait::async_trait;

use crate::error::CoreResult;
use crate::types::SiteRecord;

/// Site record store
///
/// Platform implementation:
/// - App: `JsonFileSiteStore` (JSON file, `tokio::fs`)
#[async_trait]
pub trait SiteStore: Send + Sync {
    /// Get a site by slug
    ///
    /// # Arguments
    /// * `slug` - Site slug
    async fn find_by_slug(&self, slug: &str) -> CoreResult<Option<SiteRecord>>;

    /// Save site (new or update)
    ///
    /// # Arguments
    /// * `site` - Site data
    async fn save(&self, site: &SiteRecord) -> CoreResult<()>;

    /// Sites that paid but never finished provisioning
    /// (see [`SiteRecord::awaiting_provisioning`]).
    async fn find_awaiting_provisioning(&self) -> CoreResult<Vec<SiteRecord>>;
}
