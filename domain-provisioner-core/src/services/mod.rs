//! 业务逻辑服务层

mod availability_service;
mod candidate_service;
mod identity_service;
mod messages;
mod propagation_monitor;
mod provisioning_guard;
mod provisioning_service;
mod recovery_service;
mod registration_service;
mod tunnel_service;
mod zone_service;

pub use availability_service::AvailabilityService;
pub use candidate_service::generate_candidates;
pub use identity_service::IdentityService;
pub use propagation_monitor::{MonitorJob, MonitorTasks, PropagationMonitor};
pub use provisioning_guard::{GuardToken, ProvisioningGuard};
pub use provisioning_service::ProvisioningService;
pub use recovery_service::RecoveryService;
pub use registration_service::RegistrationService;
pub use tunnel_service::{TunnelIngressService, insert_ingress_rules};
pub use zone_service::ZoneService;

use std::sync::Arc;

use crate::traits::{
    DnsZoneProvider, Messenger, OperatorAlerter, ReachabilityProbe, Registrar, SiteStore,
    TunnelSupervisor,
};

/// 服务上下文 - 持有所有依赖
///
/// 宿主应用创建此上下文，并注入各外部协作者的实现。
pub struct ServiceContext {
    /// 站点记录存储
    pub site_store: Arc<dyn SiteStore>,
    /// 用户消息通道
    pub messenger: Arc<dyn Messenger>,
    /// 运维告警通道
    pub alerter: Arc<dyn OperatorAlerter>,
    /// DNS/CDN 提供商
    pub dns_provider: Arc<dyn DnsZoneProvider>,
    /// 域名注册商
    pub registrar: Arc<dyn Registrar>,
    /// 隧道进程管理
    pub tunnel_supervisor: Arc<dyn TunnelSupervisor>,
    /// 传播检查
    pub reachability: Arc<dyn ReachabilityProbe>,
}

impl ServiceContext {
    /// 创建服务上下文
    #[must_use]
    pub fn new(
        site_store: Arc<dyn SiteStore>,
        messenger: Arc<dyn Messenger>,
        alerter: Arc<dyn OperatorAlerter>,
        dns_provider: Arc<dyn DnsZoneProvider>,
        registrar: Arc<dyn Registrar>,
        tunnel_supervisor: Arc<dyn TunnelSupervisor>,
        reachability: Arc<dyn ReachabilityProbe>,
    ) -> Self {
        Self {
            site_store,
            messenger,
            alerter,
            dns_provider,
            registrar,
            tunnel_supervisor,
            reachability,
        }
    }

    /// 发送用户消息；失败只记录日志
    pub async fn notify(&self, contact: &str, text: &str) {
        if let Err(e) = self.messenger.send(contact, text).await {
            log::warn!("Failed to message {contact}: {e}");
        }
    }

    /// 发送运维告警；失败只记录日志
    pub async fn alert_operator(&self, text: &str) {
        if let Err(e) = self.alerter.alert(text).await {
            log::error!("Failed to deliver operator alert: {e}");
        }
    }
}
