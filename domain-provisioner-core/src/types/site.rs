//! 站点记录类型定义

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 站点套餐
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Plan {
    /// 免费（共享子域名）
    #[default]
    Free,
    /// 付费（自定义域名）
    Premium,
}

/// 站点记录
///
/// Owned by the host application's store. Provisioning reads it, and writes back
/// `plan`, `pending_domain`, `custom_domain` and `domain_live_at`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SiteRecord {
    /// 站点标识（不可变）
    pub slug: String,
    /// 商家名称
    pub business_name: String,
    /// 店主联系方式（WhatsApp 号码）
    pub owner_contact: String,
    /// 店主邮箱
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_email: Option<String>,
    /// 所在城市
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    /// 套餐
    #[serde(default)]
    pub plan: Plan,
    /// 已申请但尚未上线的域名
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pending_domain: Option<String>,
    /// 已完成配置的域名
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_domain: Option<String>,
    /// 传播监控首次确认可访问的时间
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain_live_at: Option<DateTime<Utc>>,
}

impl SiteRecord {
    /// Create a free-plan site with no domain state.
    pub fn new(
        slug: impl Into<String>,
        business_name: impl Into<String>,
        owner_contact: impl Into<String>,
    ) -> Self {
        Self {
            slug: slug.into(),
            business_name: business_name.into(),
            owner_contact: owner_contact.into(),
            owner_email: None,
            city: None,
            plan: Plan::Free,
            pending_domain: None,
            custom_domain: None,
            domain_live_at: None,
        }
    }

    /// 非空的 pending 域名
    pub fn pending(&self) -> Option<&str> {
        self.pending_domain.as_deref().filter(|d| !d.trim().is_empty())
    }

    /// 非空的自定义域名
    pub fn custom(&self) -> Option<&str> {
        self.custom_domain.as_deref().filter(|d| !d.trim().is_empty())
    }

    /// Paid, requested a domain, and never finished provisioning it.
    pub fn awaiting_provisioning(&self) -> bool {
        self.plan == Plan::Premium && self.pending().is_some() && self.custom().is_none()
    }
}
