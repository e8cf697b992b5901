//! DNS 托管区域与记录管理

use std::sync::Arc;

use domain_provisioner_provider::{ProviderError, normalize_domain_name};

use crate::error::{CoreError, CoreResult};
use crate::traits::DnsZoneProvider;
use crate::types::{CnameRecordRequest, ProvisioningStep, Zone};

/// Cloudflare "automatic" TTL
const AUTO_TTL: u32 = 1;

/// DNS 区域服务
///
/// Both operations tolerate "already exists" so a crashed run can be repeated.
pub struct ZoneService {
    provider: Arc<dyn DnsZoneProvider>,
}

impl ZoneService {
    #[must_use]
    pub fn new(provider: Arc<dyn DnsZoneProvider>) -> Self {
        Self { provider }
    }

    /// Create the zone, or look up the existing one.
    pub async fn ensure_zone(&self, domain: &str) -> CoreResult<Zone> {
        let zone = match self.provider.add_zone(domain).await {
            Ok(zone) => {
                log::info!("Zone created for {domain}: {}", zone.id);
                zone
            }
            Err(ProviderError::ZoneExists { .. }) => {
                log::info!("Zone for {domain} already exists, looking it up");
                self.provider.find_zone(domain).await?.ok_or_else(|| {
                    CoreError::StepFailed {
                        step: ProvisioningStep::Zone,
                        detail: format!("zone for {domain} reported as existing but not found"),
                    }
                })?
            }
            Err(e) => return Err(e.into()),
        };

        if zone.name_servers.is_empty() {
            return Err(CoreError::StepFailed {
                step: ProvisioningStep::Zone,
                detail: format!("zone {} has no nameservers", zone.id),
            });
        }
        Ok(zone)
    }

    /// Proxied CNAMEs for the apex and `www` pointing at `target`.
    ///
    /// Returns the number of records actually created.
    pub async fn ensure_cname_records(
        &self,
        zone_id: &str,
        domain: &str,
        target: &str,
    ) -> CoreResult<usize> {
        let apex = normalize_domain_name(domain);
        let mut created = 0;

        for name in [apex.clone(), format!("www.{apex}")] {
            let req = CnameRecordRequest {
                zone_id: zone_id.to_string(),
                name: name.clone(),
                target: target.to_string(),
                proxied: true,
                ttl: AUTO_TTL,
            };
            match self.provider.create_cname_record(&req).await {
                Ok(record) => {
                    log::info!("CNAME {name} -> {target} created ({})", record.id);
                    created += 1;
                }
                Err(ProviderError::RecordExists { .. }) => {
                    log::info!("CNAME {name} already exists");
                }
                Err(e) => return Err(e.into()),
            }
        }
        Ok(created)
    }
}
