//! 配置流程相关类型定义

use std::fmt;
use std::time::Duration;

use serde::Serialize;

/// Pipeline steps in execution order.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ProvisioningStep {
    /// Hosted zone at the DNS/CDN provider
    Zone,
    /// Proxied CNAME records for apex and `www`
    DnsRecord,
    /// Registrar customer and contact
    Identity,
    /// Domain registration
    Registration,
    /// Tunnel ingress rules
    Tunnel,
    /// Writing the result back to the site record
    Persist,
}

impl ProvisioningStep {
    /// Steps that report progress to the owner, in order.
    pub const REPORTED: [Self; 5] = [
        Self::Zone,
        Self::DnsRecord,
        Self::Identity,
        Self::Registration,
        Self::Tunnel,
    ];

    /// 1-based position among the reported steps
    pub fn ordinal(self) -> Option<usize> {
        Self::REPORTED
            .iter()
            .position(|s| *s == self)
            .map(|i| i + 1)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Zone => "DNS zone",
            Self::DnsRecord => "DNS records",
            Self::Identity => "registrar identity",
            Self::Registration => "domain registration",
            Self::Tunnel => "tunnel ingress",
            Self::Persist => "site record update",
        }
    }
}

impl fmt::Display for ProvisioningStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// 触发结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriggerOutcome {
    /// Pipeline completed; the propagation monitor is running.
    Provisioned { domain: String },
    /// Another run for the same slug is in flight.
    AlreadyRunning,
    /// Nothing to provision (no pending domain).
    Skipped,
    /// The pending domain was already the site's custom domain.
    AlreadyLive { domain: String },
}

/// 注册商身份
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrarIdentity {
    pub customer_id: String,
    pub contact_id: String,
}

/// 注册结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationOutcome {
    /// New registration order
    Registered { order_id: Option<String> },
    /// An earlier run already registered the domain under this account
    AlreadyRegistered { order_id: String },
}

/// 隧道配置更新结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TunnelUpdate {
    /// Rules for the domain were already present
    Unchanged,
    /// Rules inserted; `restarted` is false when the restart failed
    Updated { restarted: bool },
}

/// 传播监控结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorOutcome {
    /// DNS resolved and HTTPS answered after `elapsed`
    Live { elapsed: Duration },
    /// Schedule exhausted without success
    GaveUp { elapsed: Duration },
}

/// 启动恢复扫描结果
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecoveryReport {
    /// 扫描到的待恢复站点数
    pub attempted: usize,
    /// 完成配置
    pub succeeded: usize,
    /// 配置失败
    pub failed: usize,
    /// 已在运行 / 无需处理
    pub skipped: usize,
}
