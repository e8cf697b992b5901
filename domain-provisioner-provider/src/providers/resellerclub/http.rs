//! ResellerClub HTTP 请求方法

use reqwest::RequestBuilder;
use serde_json::Value;

use crate::error::Result;
use crate::http_client::HttpUtils;
use crate::traits::{ErrorContext, ProviderErrorMapper, RawApiError};
use crate::utils::log_sanitizer::truncate_for_log;

use super::ResellerClubRegistrar;
use super::types::error_message;

/// 请求参数（键可重复，如 `tlds` / `ns`）
pub(crate) type Params<'a> = Vec<(&'a str, String)>;

impl ResellerClubRegistrar {
    fn with_auth<'a>(&self, mut params: Params<'a>) -> Params<'a> {
        params.push(("auth-userid", self.auth_user_id.clone()));
        params.push(("api-key", self.api_key.clone()));
        params
    }

    /// 执行 GET 请求，参数放在查询串
    pub(crate) async fn get(
        &self,
        path: &str,
        params: Params<'_>,
        context: ErrorContext,
    ) -> Result<Value> {
        let url = format!("{}{path}", self.api_base);
        let builder = self.client.get(&url).query(&self.with_auth(params));
        self.send(builder, "GET", &url, context).await
    }

    /// 执行 POST 请求，参数以表单提交
    pub(crate) async fn post(
        &self,
        path: &str,
        params: Params<'_>,
        context: ErrorContext,
    ) -> Result<Value> {
        let url = format!("{}{path}", self.api_base);
        let builder = self.client.post(&url).form(&self.with_auth(params));
        self.send(builder, "POST", &url, context).await
    }

    /// 发送请求，识别错误信封
    async fn send(
        &self,
        builder: RequestBuilder,
        method: &str,
        url: &str,
        context: ErrorContext,
    ) -> Result<Value> {
        let (status, response_text) =
            HttpUtils::execute_request(builder, self.provider_name(), method, url).await?;

        let value: Value = match HttpUtils::parse_json(&response_text, self.provider_name()) {
            Ok(v) => v,
            Err(e) if (200..300).contains(&status) => return Err(e),
            Err(_) => {
                return Err(self.map_error(
                    RawApiError::with_code(
                        status.to_string(),
                        format!("HTTP {status}: {}", truncate_for_log(&response_text)),
                    ),
                    context,
                ));
            }
        };

        if let Some(message) = error_message(&value) {
            let err = self.map_error(RawApiError::new(message), context);
            if err.is_expected() {
                log::warn!("API 错误: {err}");
            } else {
                log::error!("API 错误: {err}");
            }
            return Err(err);
        }

        if !(200..300).contains(&status) {
            return Err(self.map_error(
                RawApiError::with_code(status.to_string(), truncate_for_log(&response_text)),
                context,
            ));
        }

        Ok(value)
    }
}
