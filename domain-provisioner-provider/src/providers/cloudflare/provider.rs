//! Cloudflare DnsZoneProvider trait 实现

use async_trait::async_trait;

use crate::error::Result;
use crate::providers::common::normalize_domain_name;
use crate::traits::{DnsZoneProvider, ErrorContext};
use crate::types::{CnameRecordRequest, DnsRecord, Zone, ZoneStatus};

use super::types::{AccountRef, CreateRecordBody, CreateZoneBody};
use super::{CloudflareDnsRecord, CloudflareProvider, CloudflareZone, MAX_PAGE_SIZE_ZONES};

impl CloudflareProvider {
    /// 将 Cloudflare zone 转换为 Zone
    /// Cloudflare 状态：active, pending, initializing, moved
    pub(crate) fn zone_to_model(zone: CloudflareZone) -> Zone {
        let status = match zone.status.as_str() {
            "active" => ZoneStatus::Active,
            "pending" | "initializing" => ZoneStatus::Pending,
            "moved" | "deactivated" => ZoneStatus::Moved,
            _ => ZoneStatus::Unknown,
        };

        Zone {
            id: zone.id,
            name: zone.name,
            status,
            name_servers: zone.name_servers,
        }
    }

    fn record_to_model(record: CloudflareDnsRecord, zone_id: &str) -> DnsRecord {
        DnsRecord {
            id: record.id,
            zone_id: zone_id.to_string(),
            name: record.name,
            content: record.content,
            proxied: record.proxied,
            ttl: record.ttl,
        }
    }
}

#[async_trait]
impl DnsZoneProvider for CloudflareProvider {
    async fn add_zone(&self, domain: &str) -> Result<Zone> {
        let domain = normalize_domain_name(domain);
        let body = CreateZoneBody {
            name: &domain,
            account: AccountRef {
                id: &self.account_id,
            },
            zone_type: "full",
        };

        let zone: CloudflareZone = self
            .post("/zones", &body, ErrorContext::for_domain(&domain))
            .await?;
        log::info!("[cloudflare] Zone created: {} ({})", zone.name, zone.id);
        Ok(Self::zone_to_model(zone))
    }

    async fn find_zone(&self, domain: &str) -> Result<Option<Zone>> {
        let domain = normalize_domain_name(domain);
        let path = format!(
            "/zones?name={}&per_page={MAX_PAGE_SIZE_ZONES}",
            urlencoding::encode(&domain)
        );

        let zones: Vec<CloudflareZone> = self.get(&path, ErrorContext::for_domain(&domain)).await?;
        Ok(zones
            .into_iter()
            .find(|z| normalize_domain_name(&z.name) == domain)
            .map(Self::zone_to_model))
    }

    async fn create_cname_record(&self, req: &CnameRecordRequest) -> Result<DnsRecord> {
        let body = CreateRecordBody {
            record_type: "CNAME",
            name: &req.name,
            content: &req.target,
            ttl: req.ttl,
            proxied: req.proxied,
        };

        let record: CloudflareDnsRecord = self
            .post(
                &format!("/zones/{}/dns_records", req.zone_id),
                &body,
                ErrorContext::for_record(&req.name),
            )
            .await?;

        Ok(Self::record_to_model(record, &req.zone_id))
    }
}
