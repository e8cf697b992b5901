use async_trait::async_trait;

use crate::error::{ProviderError, Result};
use crate::types::{
    CnameRecordRequest, DnsRecord, DomainAvailability, NewContact, NewCustomer,
    RegistrationReceipt, RegistrationRequest, Zone,
};

/// 原始 API 错误（内部使用）
#[derive(Debug, Clone)]
pub(crate) struct RawApiError {
    /// 错误码（各 Provider 格式不同）
    pub code: Option<String>,
    /// 原始错误消息
    pub message: String,
}

impl RawApiError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
        }
    }

    pub fn with_code(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
            message: message.into(),
        }
    }
}

/// 错误上下文信息（内部使用）
/// 用于在映射错误时提供额外信息
#[derive(Debug, Clone, Default)]
pub(crate) struct ErrorContext {
    /// 记录名称（用于 `RecordExists`）
    pub record_name: Option<String>,
    /// 域名（用于 `ZoneExists` / `DomainExists` / `DomainNotFound`）
    pub domain: Option<String>,
}

impl ErrorContext {
    pub fn for_domain(domain: &str) -> Self {
        Self {
            domain: Some(domain.to_string()),
            ..Self::default()
        }
    }

    pub fn for_record(record_name: &str) -> Self {
        Self {
            record_name: Some(record_name.to_string()),
            ..Self::default()
        }
    }

    pub(crate) fn domain_or_unknown(&self) -> String {
        self.domain.clone().unwrap_or_else(|| "<unknown>".to_string())
    }
}

/// Provider 错误映射 Trait（内部使用）
/// 各 Provider 实现此 trait 以将原始 API 错误映射到统一错误类型
pub(crate) trait ProviderErrorMapper {
    /// 返回 Provider 标识符
    fn provider_name(&self) -> &'static str;

    /// 将原始 API 错误映射到统一错误类型
    fn map_error(&self, raw: RawApiError, context: ErrorContext) -> ProviderError;

    /// 快捷方法：解析错误
    fn parse_error(&self, detail: impl ToString) -> ProviderError {
        ProviderError::ParseError {
            provider: self.provider_name().to_string(),
            detail: detail.to_string(),
        }
    }

    /// 快捷方法：未知错误（fallback）
    fn unknown_error(&self, raw: RawApiError) -> ProviderError {
        ProviderError::Unknown {
            provider: self.provider_name().to_string(),
            raw_code: raw.code,
            raw_message: raw.message,
        }
    }
}

/// DNS/CDN 提供商 Trait
///
/// Only the operations provisioning needs: one zone per domain and proxied
/// CNAME records inside it.
#[async_trait]
pub trait DnsZoneProvider: Send + Sync {
    /// 创建托管区域
    ///
    /// Returns [`ProviderError::ZoneExists`] when the zone is already hosted.
    async fn add_zone(&self, domain: &str) -> Result<Zone>;

    /// 按名称查找托管区域
    async fn find_zone(&self, domain: &str) -> Result<Option<Zone>>;

    /// 创建 CNAME 记录
    ///
    /// Returns [`ProviderError::RecordExists`] when a record with that name exists.
    async fn create_cname_record(&self, req: &CnameRecordRequest) -> Result<DnsRecord>;
}

/// 域名注册商 Trait
#[async_trait]
pub trait Registrar: Send + Sync {
    /// 查询 `label` 在各 TLD 下是否可注册
    async fn check_availability(
        &self,
        label: &str,
        tlds: &[String],
    ) -> Result<Vec<DomainAvailability>>;

    /// 按邮箱查找客户，返回客户 ID
    async fn find_customer(&self, email: &str) -> Result<Option<String>>;

    /// 创建客户，返回客户 ID
    async fn create_customer(&self, customer: &NewCustomer) -> Result<String>;

    /// 创建联系人，返回联系人 ID
    async fn create_contact(&self, contact: &NewContact) -> Result<String>;

    /// 注册域名
    ///
    /// Returns [`ProviderError::DomainExists`] when the registrar already holds the name.
    async fn register_domain(&self, req: &RegistrationRequest) -> Result<RegistrationReceipt>;

    /// 查询已注册域名的订单 ID
    async fn find_order_id(&self, domain: &str) -> Result<Option<String>>;

    /// 修改域名的 NS 记录
    async fn modify_nameservers(&self, order_id: &str, nameservers: &[String]) -> Result<()>;
}
