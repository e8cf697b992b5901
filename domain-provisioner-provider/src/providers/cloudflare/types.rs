//! Cloudflare API 类型定义

use serde::{Deserialize, Serialize};

/// Cloudflare API 通用响应
#[derive(Debug, Deserialize)]
pub struct CloudflareResponse<T> {
    pub success: bool,
    pub result: Option<T>,
    #[serde(default)]
    pub errors: Vec<CloudflareError>,
}

#[derive(Debug, Deserialize)]
pub struct CloudflareError {
    pub code: i32,
    pub message: String,
}

/// Cloudflare Zone 结构
#[derive(Debug, Deserialize)]
pub struct CloudflareZone {
    pub id: String,
    pub name: String,
    pub status: String,
    #[serde(default)]
    pub name_servers: Vec<String>,
}

/// Cloudflare DNS Record 结构（响应）
#[derive(Debug, Deserialize)]
pub struct CloudflareDnsRecord {
    pub id: String,
    pub name: String,
    pub content: String,
    pub ttl: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proxied: Option<bool>,
}

/// 创建 Zone 请求体
#[derive(Debug, Serialize)]
pub struct CreateZoneBody<'a> {
    pub name: &'a str,
    pub account: AccountRef<'a>,
    #[serde(rename = "type")]
    pub zone_type: &'static str,
}

#[derive(Debug, Serialize)]
pub struct AccountRef<'a> {
    pub id: &'a str,
}

/// 创建 DNS 记录请求体
#[derive(Debug, Serialize)]
pub struct CreateRecordBody<'a> {
    #[serde(rename = "type")]
    pub record_type: &'static str,
    pub name: &'a str,
    pub content: &'a str,
    pub ttl: u32,
    pub proxied: bool,
}
