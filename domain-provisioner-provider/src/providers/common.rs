//! Provider 公共工具函数

use std::time::Duration;

use reqwest::Client;

// ============ HTTP Client ============

/// 默认连接超时（秒）
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
/// 默认请求超时（秒）
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// 创建带超时配置的 HTTP Client
pub fn create_http_client(request_timeout: Duration) -> Client {
    Client::builder()
        .connect_timeout(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS))
        .timeout(request_timeout)
        .build()
        .unwrap_or_else(|e| {
            log::warn!("Failed to build configured HTTP client, using defaults: {e}");
            Client::new()
        })
}

// ============ 域名名称处理 ============

/// 去掉域名末尾的点并转小写
pub fn normalize_domain_name(name: &str) -> String {
    name.trim().trim_end_matches('.').to_ascii_lowercase()
}

/// 去掉 API base 末尾的斜杠
pub fn trim_base_url(base: &str) -> String {
    base.trim_end_matches('/').to_string()
}
