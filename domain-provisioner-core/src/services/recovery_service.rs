//! 启动恢复扫描
//!
//! A site left with a pending domain by a crash or restart is re-run once at
//! startup. Runs are sequential so a backlog does not hammer the registrar.

use std::sync::Arc;
use std::time::Duration;

use crate::error::CoreResult;
use crate::types::{RecoveryReport, TriggerOutcome};

use super::ServiceContext;
use super::provisioning_service::ProvisioningService;

/// 恢复服务
pub struct RecoveryService {
    ctx: Arc<ServiceContext>,
    provisioning: Arc<ProvisioningService>,
}

impl RecoveryService {
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>, provisioning: Arc<ProvisioningService>) -> Self {
        Self { ctx, provisioning }
    }

    /// Wait `delay`, then re-run provisioning for every site still awaiting it.
    ///
    /// Individual failures are counted, not propagated; only a failed store
    /// query aborts the scan.
    pub async fn run(&self, delay: Duration) -> CoreResult<RecoveryReport> {
        tokio::time::sleep(delay).await;

        let sites = self.ctx.site_store.find_awaiting_provisioning().await?;
        let mut report = RecoveryReport::default();
        if sites.is_empty() {
            log::info!("Recovery scan: no sites awaiting provisioning");
            return Ok(report);
        }
        log::info!("Recovery scan: {} site(s) awaiting provisioning", sites.len());

        for site in sites {
            report.attempted += 1;
            match self
                .provisioning
                .trigger_provisioning(&site.slug, None)
                .await
            {
                Ok(TriggerOutcome::Provisioned { domain }) => {
                    log::info!("Recovered {domain} for {}", site.slug);
                    report.succeeded += 1;
                }
                Ok(outcome) => {
                    log::info!("Recovery of {} skipped: {outcome:?}", site.slug);
                    report.skipped += 1;
                }
                Err(e) => {
                    log::warn!("Recovery of {} failed: {e}", site.slug);
                    report.failed += 1;
                }
            }
        }

        log::info!(
            "Recovery scan done: {} succeeded, {} failed, {} skipped",
            report.succeeded,
            report.failed,
            report.skipped
        );
        Ok(report)
    }
}
