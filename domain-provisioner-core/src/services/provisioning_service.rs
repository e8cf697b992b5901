//! 域名配置编排
//!
//! One run walks zone → records → identity → registration → tunnel → persist,
//! then hands the domain to the propagation monitor. Every step is safe to
//! repeat, so a crashed run is resumed by running it again from the top.

use std::sync::Arc;

use domain_provisioner_provider::normalize_domain_name;

use crate::error::{CoreError, CoreResult};
use crate::types::{
    MonitorSettings, Plan, ProvisioningStep, RegistrantProfile, SiteRecord, TriggerOutcome,
    TunnelSettings,
};

use super::identity_service::IdentityService;
use super::messages;
use super::propagation_monitor::{MonitorJob, PropagationMonitor};
use super::provisioning_guard::ProvisioningGuard;
use super::registration_service::RegistrationService;
use super::tunnel_service::TunnelIngressService;
use super::zone_service::ZoneService;
use super::ServiceContext;

/// Error from a single step.
struct StepError {
    step: ProvisioningStep,
    error: CoreError,
}

trait AtStep<T> {
    fn at(self, step: ProvisioningStep) -> Result<T, StepError>;
}

impl<T> AtStep<T> for CoreResult<T> {
    fn at(self, step: ProvisioningStep) -> Result<T, StepError> {
        self.map_err(|error| StepError { step, error })
    }
}

/// 域名配置服务
pub struct ProvisioningService {
    ctx: Arc<ServiceContext>,
    zones: ZoneService,
    identity: IdentityService,
    registration: RegistrationService,
    tunnel: TunnelIngressService,
    monitor: PropagationMonitor,
    guard: ProvisioningGuard,
    tunnel_hostname: String,
}

impl ProvisioningService {
    #[must_use]
    pub fn new(
        ctx: Arc<ServiceContext>,
        tunnel: TunnelSettings,
        monitor: MonitorSettings,
        profile: RegistrantProfile,
    ) -> Self {
        Self {
            zones: ZoneService::new(Arc::clone(&ctx.dns_provider)),
            identity: IdentityService::new(Arc::clone(&ctx.registrar), profile.clone()),
            registration: RegistrationService::new(Arc::clone(&ctx.registrar), profile),
            tunnel_hostname: tunnel.tunnel_hostname.clone(),
            tunnel: TunnelIngressService::new(Arc::clone(&ctx.tunnel_supervisor), tunnel),
            monitor: PropagationMonitor::new(Arc::clone(&ctx), monitor),
            guard: ProvisioningGuard::new(),
            ctx,
        }
    }

    pub fn guard(&self) -> &ProvisioningGuard {
        &self.guard
    }

    pub fn monitor(&self) -> &PropagationMonitor {
        &self.monitor
    }

    /// Provision the site's pending domain unless a run for it is in flight.
    ///
    /// Returns once the domain is configured everywhere; DNS propagation is
    /// watched in the background.
    pub async fn trigger_provisioning(
        &self,
        slug: &str,
        payment_reference: Option<&str>,
    ) -> CoreResult<TriggerOutcome> {
        let Some(_token) = self.guard.try_acquire(slug) else {
            log::info!("Provisioning for {slug} already running, ignoring trigger");
            return Ok(TriggerOutcome::AlreadyRunning);
        };

        let mut site = self
            .ctx
            .site_store
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| CoreError::SiteNotFound(slug.to_string()))?;

        let domain = match requested_domain(&site) {
            Ok(domain) => domain,
            Err(CoreError::NoPendingDomain(_)) => {
                log::info!("Site {slug} has no pending domain, nothing to provision");
                return Ok(TriggerOutcome::Skipped);
            }
            Err(e) => return Err(e),
        };

        if site.custom() == Some(domain.as_str()) {
            log::info!("{domain} is already live for {slug}, clearing pending domain");
            site.pending_domain = None;
            self.ctx.site_store.save(&site).await?;
            return Ok(TriggerOutcome::AlreadyLive { domain });
        }

        if site.plan != Plan::Premium {
            site.plan = Plan::Premium;
            self.ctx.site_store.save(&site).await?;
        }

        log::info!(
            "Provisioning {domain} for {slug} (payment {})",
            payment_reference.unwrap_or("-")
        );
        match self.run_pipeline(&mut site, &domain).await {
            Ok(()) => Ok(TriggerOutcome::Provisioned { domain }),
            Err(StepError { step, error }) => {
                self.report_failure(&site, &domain, step, payment_reference, &error)
                    .await;
                let detail = match error {
                    CoreError::StepFailed { detail, .. } => detail,
                    other => other.to_string(),
                };
                Err(CoreError::StepFailed { step, detail })
            }
        }
    }

    async fn run_pipeline(&self, site: &mut SiteRecord, domain: &str) -> Result<(), StepError> {
        let zone = self
            .zones
            .ensure_zone(domain)
            .await
            .at(ProvisioningStep::Zone)?;
        self.progress(site, ProvisioningStep::Zone, domain).await;

        self.zones
            .ensure_cname_records(&zone.id, domain, &self.tunnel_hostname)
            .await
            .at(ProvisioningStep::DnsRecord)?;
        self.progress(site, ProvisioningStep::DnsRecord, domain)
            .await;

        let identity = self
            .identity
            .resolve(site)
            .await
            .at(ProvisioningStep::Identity)?;
        self.progress(site, ProvisioningStep::Identity, domain).await;

        let registration = self
            .registration
            .register(domain, &identity, &zone.name_servers)
            .await
            .at(ProvisioningStep::Registration)?;
        log::debug!("Registration of {domain}: {registration:?}");
        self.progress(site, ProvisioningStep::Registration, domain)
            .await;

        let tunnel = self
            .tunnel
            .ensure_ingress(domain)
            .await
            .at(ProvisioningStep::Tunnel)?;
        log::debug!("Tunnel update for {domain}: {tunnel:?}");
        self.progress(site, ProvisioningStep::Tunnel, domain).await;

        site.custom_domain = Some(domain.to_string());
        site.pending_domain = None;
        site.plan = Plan::Premium;
        self.ctx
            .site_store
            .save(site)
            .await
            .at(ProvisioningStep::Persist)?;
        log::info!("{domain} provisioned for {}", site.slug);

        self.monitor.launch(MonitorJob {
            slug: site.slug.clone(),
            domain: domain.to_string(),
            contact: site.owner_contact.clone(),
            business_name: site.business_name.clone(),
        });
        Ok(())
    }

    async fn progress(&self, site: &SiteRecord, step: ProvisioningStep, domain: &str) {
        self.ctx
            .notify(&site.owner_contact, &messages::progress(step, domain))
            .await;
    }

    async fn report_failure(
        &self,
        site: &SiteRecord,
        domain: &str,
        step: ProvisioningStep,
        payment_reference: Option<&str>,
        error: &CoreError,
    ) {
        if error.is_expected() {
            log::warn!("Provisioning {domain} for {} failed at {step}: {error}", site.slug);
        } else {
            log::error!("Provisioning {domain} for {} failed at {step}: {error}", site.slug);
        }

        self.ctx
            .alert_operator(&messages::failure_alert(
                &site.slug,
                domain,
                step,
                payment_reference,
                &error.to_string(),
            ))
            .await;
        self.ctx
            .notify(&site.owner_contact, &messages::failure_notice(domain))
            .await;
    }
}

fn requested_domain(site: &SiteRecord) -> CoreResult<String> {
    site.pending()
        .map(normalize_domain_name)
        .ok_or_else(|| CoreError::NoPendingDomain(site.slug.clone()))
}
