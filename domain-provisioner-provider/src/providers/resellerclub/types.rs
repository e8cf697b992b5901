//! ResellerClub API 类型定义

use std::collections::HashMap;

use serde::Deserialize;
use serde_json::Value;

/// `domains/available.json` 中单个域名的结果
#[derive(Debug, Deserialize)]
pub struct AvailabilityEntry {
    pub status: String,
}

/// `domains/available.json` 响应：`{ "foo.in": { "status": "available" }, ... }`
pub type AvailabilityResponse = HashMap<String, AvailabilityEntry>;

/// `customers/search.json` 响应
///
/// 结果以 `"1"`, `"2"` ... 为键平铺在顶层。
#[derive(Debug, Deserialize)]
pub struct CustomerSearchResponse {
    #[serde(default)]
    pub recsindb: Value,
    #[serde(flatten)]
    pub rows: HashMap<String, Value>,
}

impl CustomerSearchResponse {
    /// 命中的记录总数
    pub fn total(&self) -> u64 {
        match &self.recsindb {
            Value::String(s) => s.parse().unwrap_or(0),
            Value::Number(n) => n.as_u64().unwrap_or(0),
            _ => 0,
        }
    }

    /// 第一条记录的客户 ID
    pub fn first_customer_id(&self) -> Option<String> {
        self.rows
            .get("1")
            .and_then(|row| row.get("customer.customerid"))
            .and_then(value_to_id)
    }
}

/// `domains/register.json` / `domains/modify-ns.json` 响应
#[derive(Debug, Deserialize)]
pub struct ActionResponse {
    #[serde(default)]
    pub entityid: Option<Value>,
    #[serde(default)]
    pub actionstatus: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub actionstatusdesc: Option<String>,
}

impl ActionResponse {
    pub fn status(&self) -> String {
        self.actionstatus
            .clone()
            .or_else(|| self.status.clone())
            .unwrap_or_else(|| "Unknown".to_string())
    }

    /// `Failed` / `Error` action statuses are failures even inside a 200 response
    pub fn is_failed(&self) -> bool {
        let status = self.status().to_ascii_lowercase();
        status == "failed" || status == "error"
    }
}

/// 将数字或字符串形式的 ID 统一为字符串
pub fn value_to_id(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// 识别错误信封 `{"status": "ERROR", "message": "..."}`，返回消息
pub fn error_message(value: &Value) -> Option<String> {
    let obj = value.as_object()?;
    let is_error = obj
        .get("status")
        .and_then(Value::as_str)
        .is_some_and(|s| s.eq_ignore_ascii_case("error"));
    if !is_error {
        return None;
    }
    Some(
        obj.get("message")
            .or_else(|| obj.get("error"))
            .and_then(Value::as_str)
            .unwrap_or("Unknown error")
            .to_string(),
    )
}
