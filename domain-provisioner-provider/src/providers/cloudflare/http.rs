//! Cloudflare HTTP 请求方法

use reqwest::RequestBuilder;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::Result;
use crate::http_client::HttpUtils;
use crate::traits::{ErrorContext, ProviderErrorMapper, RawApiError};

use super::{CloudflareProvider, CloudflareResponse};

impl CloudflareProvider {
    /// 执行 GET 请求
    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        context: ErrorContext,
    ) -> Result<T> {
        let url = format!("{}{path}", self.api_base);
        let builder = self.client.get(&url).bearer_auth(&self.api_token);
        self.send(builder, "GET", &url, context).await
    }

    /// 执行 POST 请求
    pub(crate) async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
        context: ErrorContext,
    ) -> Result<T> {
        let url = format!("{}{path}", self.api_base);
        if log::log_enabled!(log::Level::Debug) {
            let body_json = serde_json::to_string(body)
                .unwrap_or_else(|_| "<unserializable body>".to_string());
            log::debug!("[cloudflare] Request Body: {body_json}");
        }
        let builder = self
            .client
            .post(&url)
            .bearer_auth(&self.api_token)
            .json(body);
        self.send(builder, "POST", &url, context).await
    }

    /// 发送请求并解包 Cloudflare 响应信封
    async fn send<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        method: &str,
        url: &str,
        context: ErrorContext,
    ) -> Result<T> {
        let (status, response_text) =
            HttpUtils::execute_request(builder, self.provider_name(), method, url).await?;

        let cf_response: CloudflareResponse<T> =
            match HttpUtils::parse_json(&response_text, self.provider_name()) {
                Ok(parsed) => parsed,
                Err(e) if (200..300).contains(&status) => return Err(e),
                // 非 2xx 且不是 JSON（网关错误页等）
                Err(_) => {
                    return Err(self.map_error(
                        RawApiError::with_code(status.to_string(), format!("HTTP {status}")),
                        context,
                    ));
                }
            };

        if !cf_response.success {
            let (code, message) = cf_response
                .errors
                .first()
                .map(|e| (e.code.to_string(), e.message.clone()))
                .unwrap_or_else(|| (String::new(), "Unknown error".to_string()));
            let err = self.map_error(RawApiError::with_code(code, message), context);
            if err.is_expected() {
                log::warn!("API 错误: {err}");
            } else {
                log::error!("API 错误: {err}");
            }
            return Err(err);
        }

        cf_response
            .result
            .ok_or_else(|| self.parse_error("响应中缺少 result 字段"))
    }
}
