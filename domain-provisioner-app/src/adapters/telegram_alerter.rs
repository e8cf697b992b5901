//! Telegram bot operator alerts

use async_trait::async_trait;
use domain_provisioner_core::error::{CoreError, CoreResult};
use domain_provisioner_core::traits::OperatorAlerter;
use serde::Deserialize;
use serde_json::json;

use super::messaging_client;

#[derive(Deserialize)]
struct BotResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

pub struct TelegramAlerter {
    client: reqwest::Client,
    bot_token: String,
    chat_id: String,
    api_base: String,
}

impl TelegramAlerter {
    #[must_use]
    pub fn new(bot_token: String, chat_id: String, api_base: &str) -> Self {
        Self {
            client: messaging_client(),
            bot_token,
            chat_id,
            api_base: api_base.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl OperatorAlerter for TelegramAlerter {
    async fn alert(&self, text: &str) -> CoreResult<()> {
        let url = format!("{}/bot{}/sendMessage", self.api_base, self.bot_token);
        let response = self
            .client
            .post(&url)
            .json(&json!({
                "chat_id": self.chat_id,
                "text": text,
                "disable_web_page_preview": true,
            }))
            .send()
            .await
            .map_err(|e| {
                // the URL carries the bot token
                CoreError::MessagingError(format!("Telegram request failed: {}", e.without_url()))
            })?;

        let status = response.status();
        let body: BotResponse = response.json().await.map_err(|e| {
            CoreError::MessagingError(format!(
                "Telegram returned {status} with unreadable body: {}",
                e.without_url()
            ))
        })?;
        if !body.ok {
            return Err(CoreError::MessagingError(format!(
                "Telegram rejected alert: {}",
                body.description.unwrap_or_else(|| status.to_string())
            )));
        }
        Ok(())
    }
}
