//! Application bootstrap for the domain provisioner.
//!
//! Provides `ProvisionerApp` (service container), `ProvisionerAppBuilder`
//! (collaborator injection), the TOML configuration and the concrete adapters
//! used by the daemon binary.

pub mod adapters;
pub mod config;
pub mod logging;

use std::sync::Arc;
use std::time::Duration;

use domain_provisioner_core::error::{CoreError, CoreResult};
use domain_provisioner_core::services::{
    AvailabilityService, ProvisioningService, RecoveryService, ServiceContext,
};
use domain_provisioner_core::traits::{
    CommandTunnelSupervisor, DnsZoneProvider, Messenger, NetworkReachabilityProbe,
    OperatorAlerter, ReachabilityProbe, Registrar, SiteStore, TunnelSupervisor,
};
use domain_provisioner_core::types::{
    AvailabilitySettings, MonitorSettings, RecoveryReport, RecoverySettings, RegistrantProfile,
    TunnelSettings,
};
use domain_provisioner_provider::{CloudflareProvider, ResellerClubRegistrar};

use adapters::{JsonFileSiteStore, TelegramAlerter, WhatsAppMessenger};
use config::AppConfig;

const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(10);

/// Application state shared by every entry point.
pub struct ProvisionerApp {
    /// Service context (holds all collaborators)
    pub ctx: Arc<ServiceContext>,
    /// Orchestrator; the payment handler calls `trigger_provisioning` on it
    pub provisioning: Arc<ProvisioningService>,
    /// Domain suggestions for the onboarding flow
    pub availability: AvailabilityService,
    /// Startup recovery scan
    pub recovery: RecoveryService,
    recovery_settings: RecoverySettings,
}

impl ProvisionerApp {
    /// Run the startup recovery scan if enabled.
    ///
    /// Returns `None` when disabled or when the store could not be queried.
    pub async fn run_startup_recovery(&self) -> Option<RecoveryReport> {
        if !self.recovery_settings.enabled {
            log::info!("Startup recovery disabled");
            return None;
        }
        match self
            .recovery
            .run(self.recovery_settings.startup_delay())
            .await
        {
            Ok(report) => Some(report),
            Err(e) => {
                log::error!("Startup recovery failed: {e}");
                None
            }
        }
    }

    /// Abort background propagation monitors. Returns how many were running.
    pub async fn shutdown(&self) -> usize {
        self.provisioning.monitor().tasks().shutdown().await
    }
}

/// Builder for constructing `ProvisionerApp`.
///
/// # Required collaborators
/// - `site_store`, `messenger`, `alerter`, `dns_provider`, `registrar`
///
/// # Optional
/// - `tunnel_supervisor`: defaults to running the tunnel settings' restart command
/// - `reachability`: defaults to `NetworkReachabilityProbe` with a 10 s timeout
pub struct ProvisionerAppBuilder {
    site_store: Option<Arc<dyn SiteStore>>,
    messenger: Option<Arc<dyn Messenger>>,
    alerter: Option<Arc<dyn OperatorAlerter>>,
    dns_provider: Option<Arc<dyn DnsZoneProvider>>,
    registrar: Option<Arc<dyn Registrar>>,
    tunnel_supervisor: Option<Arc<dyn TunnelSupervisor>>,
    reachability: Option<Arc<dyn ReachabilityProbe>>,
    tunnel: TunnelSettings,
    monitor: MonitorSettings,
    availability: AvailabilitySettings,
    registrant: RegistrantProfile,
    recovery: RecoverySettings,
}

impl ProvisionerAppBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            site_store: None,
            messenger: None,
            alerter: None,
            dns_provider: None,
            registrar: None,
            tunnel_supervisor: None,
            reachability: None,
            tunnel: TunnelSettings::default(),
            monitor: MonitorSettings::default(),
            availability: AvailabilitySettings::default(),
            registrant: RegistrantProfile::default(),
            recovery: RecoverySettings::default(),
        }
    }

    /// Wire the production adapters described by `config`.
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        let mut cloudflare = CloudflareProvider::new(
            config.cloudflare.api_token.clone(),
            config.cloudflare.account_id.clone(),
        );
        if let Some(ref base) = config.cloudflare.base_url {
            cloudflare = cloudflare.with_base_url(base);
        }

        let mut registrar = ResellerClubRegistrar::new(
            config.registrar.auth_user_id.clone(),
            config.registrar.api_key.clone(),
            Duration::from_secs(config.registrar.request_timeout_secs),
        );
        if let Some(ref base) = config.registrar.base_url {
            registrar = registrar.with_base_url(base);
        }

        Self::new()
            .site_store(Arc::new(JsonFileSiteStore::new(config.store.path.clone())))
            .messenger(Arc::new(WhatsAppMessenger::new(
                config.whatsapp.access_token.clone(),
                config.whatsapp.phone_number_id.clone(),
                &config.whatsapp.api_base,
            )))
            .alerter(Arc::new(TelegramAlerter::new(
                config.telegram.bot_token.clone(),
                config.telegram.chat_id.clone(),
                &config.telegram.api_base,
            )))
            .dns_provider(Arc::new(cloudflare))
            .registrar(Arc::new(registrar))
            .reachability(Arc::new(NetworkReachabilityProbe::new(Duration::from_secs(
                config.probe.timeout_secs,
            ))))
            .tunnel_settings(config.tunnel.clone())
            .monitor_settings(config.monitor.clone())
            .availability_settings(config.availability.clone())
            .registrant_profile(config.registrant.clone())
            .recovery_settings(config.recovery.clone())
    }

    #[must_use]
    pub fn site_store(mut self, store: Arc<dyn SiteStore>) -> Self {
        self.site_store = Some(store);
        self
    }

    #[must_use]
    pub fn messenger(mut self, messenger: Arc<dyn Messenger>) -> Self {
        self.messenger = Some(messenger);
        self
    }

    #[must_use]
    pub fn alerter(mut self, alerter: Arc<dyn OperatorAlerter>) -> Self {
        self.alerter = Some(alerter);
        self
    }

    #[must_use]
    pub fn dns_provider(mut self, provider: Arc<dyn DnsZoneProvider>) -> Self {
        self.dns_provider = Some(provider);
        self
    }

    #[must_use]
    pub fn registrar(mut self, registrar: Arc<dyn Registrar>) -> Self {
        self.registrar = Some(registrar);
        self
    }

    #[must_use]
    pub fn tunnel_supervisor(mut self, supervisor: Arc<dyn TunnelSupervisor>) -> Self {
        self.tunnel_supervisor = Some(supervisor);
        self
    }

    #[must_use]
    pub fn reachability(mut self, probe: Arc<dyn ReachabilityProbe>) -> Self {
        self.reachability = Some(probe);
        self
    }

    #[must_use]
    pub fn tunnel_settings(mut self, settings: TunnelSettings) -> Self {
        self.tunnel = settings;
        self
    }

    #[must_use]
    pub fn monitor_settings(mut self, settings: MonitorSettings) -> Self {
        self.monitor = settings;
        self
    }

    #[must_use]
    pub fn availability_settings(mut self, settings: AvailabilitySettings) -> Self {
        self.availability = settings;
        self
    }

    #[must_use]
    pub fn registrant_profile(mut self, profile: RegistrantProfile) -> Self {
        self.registrant = profile;
        self
    }

    #[must_use]
    pub fn recovery_settings(mut self, settings: RecoverySettings) -> Self {
        self.recovery = settings;
        self
    }

    /// Build the `ProvisionerApp`.
    ///
    /// # Errors
    /// Returns `CoreError::ValidationError` if required collaborators are missing.
    pub fn build(self) -> CoreResult<ProvisionerApp> {
        let site_store = required(self.site_store, "site_store")?;
        let messenger = required(self.messenger, "messenger")?;
        let alerter = required(self.alerter, "alerter")?;
        let dns_provider = required(self.dns_provider, "dns_provider")?;
        let registrar = required(self.registrar, "registrar")?;
        let tunnel_supervisor: Arc<dyn TunnelSupervisor> = match self.tunnel_supervisor {
            Some(supervisor) => supervisor,
            None => Arc::new(CommandTunnelSupervisor::new(
                self.tunnel.restart_command.clone(),
            )),
        };
        let reachability: Arc<dyn ReachabilityProbe> = match self.reachability {
            Some(probe) => probe,
            None => Arc::new(NetworkReachabilityProbe::new(DEFAULT_PROBE_TIMEOUT)),
        };

        let ctx = Arc::new(ServiceContext::new(
            site_store,
            messenger,
            alerter,
            dns_provider,
            Arc::clone(&registrar),
            tunnel_supervisor,
            reachability,
        ));

        let provisioning = Arc::new(ProvisioningService::new(
            Arc::clone(&ctx),
            self.tunnel,
            self.monitor,
            self.registrant,
        ));
        let availability = AvailabilityService::new(registrar, self.availability);
        let recovery = RecoveryService::new(Arc::clone(&ctx), Arc::clone(&provisioning));

        Ok(ProvisionerApp {
            ctx,
            provisioning,
            availability,
            recovery,
            recovery_settings: self.recovery,
        })
    }
}

impl Default for ProvisionerAppBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn required<T: ?Sized>(value: Option<Arc<T>>, name: &str) -> CoreResult<Arc<T>> {
    value.ok_or_else(|| CoreError::ValidationError(format!("{name} is required")))
}
