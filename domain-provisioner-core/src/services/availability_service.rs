//! 域名可用性检查

use std::sync::Arc;

use futures::future::join_all;
use tokio::time::{sleep, timeout};

use crate::traits::Registrar;
use crate::types::{AvailabilitySettings, DomainAvailability};

use super::candidate_service::generate_candidates;

/// 域名可用性服务
///
/// Checks candidates in small concurrent batches with a pause between batches.
/// A failed or timed-out check counts as "not available" and is never retried.
pub struct AvailabilityService {
    registrar: Arc<dyn Registrar>,
    settings: AvailabilitySettings,
}

impl AvailabilityService {
    #[must_use]
    pub fn new(registrar: Arc<dyn Registrar>, settings: AvailabilitySettings) -> Self {
        Self {
            registrar,
            settings,
        }
    }

    /// Generate candidates for a business and return up to `wanted` free domains.
    pub async fn suggest(
        &self,
        business_name: &str,
        city: Option<&str>,
        wanted: usize,
    ) -> Vec<DomainAvailability> {
        let candidates = generate_candidates(business_name, city);
        log::debug!(
            "Checking {} candidates for '{business_name}'",
            candidates.len()
        );
        self.find_available(&candidates, wanted).await
    }

    /// Available domains in candidate order, then TLD preference order.
    ///
    /// Returns as soon as `wanted` domains are found or the list is exhausted.
    pub async fn find_available(
        &self,
        candidates: &[String],
        wanted: usize,
    ) -> Vec<DomainAvailability> {
        let mut found = Vec::new();
        if wanted == 0 {
            return found;
        }

        let batch_size = self.settings.batch_size.max(1);
        for (index, batch) in candidates.chunks(batch_size).enumerate() {
            if index > 0 {
                sleep(self.settings.batch_delay()).await;
            }

            let results = join_all(batch.iter().map(|label| self.check_label(label))).await;
            for domain in results.into_iter().flatten() {
                found.push(domain);
                if found.len() >= wanted {
                    return found;
                }
            }
        }
        found
    }

    /// Free domains for one label across all configured TLDs.
    async fn check_label(&self, label: &str) -> Vec<DomainAvailability> {
        let check = self.registrar.check_availability(label, &self.settings.tlds);
        match timeout(self.settings.check_timeout(), check).await {
            Ok(Ok(results)) => results.into_iter().filter(|r| r.available).collect(),
            Ok(Err(e)) => {
                log::warn!("Availability check for '{label}' failed, treating as taken: {e}");
                Vec::new()
            }
            Err(_) => {
                log::warn!("Availability check for '{label}' timed out, treating as taken");
                Vec::new()
            }
        }
    }
}
