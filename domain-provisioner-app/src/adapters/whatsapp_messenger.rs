//! WhatsApp Cloud API messenger

use async_trait::async_trait;
use domain_provisioner_core::error::{CoreError, CoreResult};
use domain_provisioner_core::traits::Messenger;
use serde_json::{Value, json};

use super::messaging_client;

/// Longest button label WhatsApp accepts on a CTA message.
const MAX_BUTTON_LABEL: usize = 20;

pub struct WhatsAppMessenger {
    client: reqwest::Client,
    access_token: String,
    phone_number_id: String,
    api_base: String,
}

impl WhatsAppMessenger {
    #[must_use]
    pub fn new(access_token: String, phone_number_id: String, api_base: &str) -> Self {
        Self {
            client: messaging_client(),
            access_token,
            phone_number_id,
            api_base: api_base.trim_end_matches('/').to_string(),
        }
    }

    /// Digits only, as the Cloud API expects (`+91 98765 43210` → `919876543210`)
    fn recipient(contact: &str) -> CoreResult<String> {
        let digits: String = contact.chars().filter(char::is_ascii_digit).collect();
        if digits.is_empty() {
            return Err(CoreError::ValidationError(format!(
                "Not a WhatsApp number: {contact}"
            )));
        }
        Ok(digits)
    }

    async fn post(&self, payload: &Value) -> CoreResult<()> {
        let url = format!("{}/{}/messages", self.api_base, self.phone_number_id);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.access_token)
            .json(payload)
            .send()
            .await
            .map_err(|e| CoreError::MessagingError(format!("WhatsApp request failed: {e}")))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.text().await.unwrap_or_default();
        let detail = serde_json::from_str::<Value>(&body)
            .ok()
            .and_then(|v| {
                v.pointer("/error/message")
                    .and_then(Value::as_str)
                    .map(str::to_string)
            })
            .unwrap_or(body);
        Err(CoreError::MessagingError(format!(
            "WhatsApp API returned {status}: {detail}"
        )))
    }
}

#[async_trait]
impl Messenger for WhatsAppMessenger {
    async fn send(&self, contact: &str, text: &str) -> CoreResult<()> {
        let payload = json!({
            "messaging_product": "whatsapp",
            "to": Self::recipient(contact)?,
            "type": "text",
            "text": { "body": text, "preview_url": true },
        });
        self.post(&payload).await
    }

    async fn send_call_to_action(
        &self,
        contact: &str,
        body: &str,
        url: &str,
        button_label: &str,
    ) -> CoreResult<()> {
        let label: String = button_label.chars().take(MAX_BUTTON_LABEL).collect();
        let payload = json!({
            "messaging_product": "whatsapp",
            "to": Self::recipient(contact)?,
            "type": "interactive",
            "interactive": {
                "type": "cta_url",
                "body": { "text": body },
                "action": {
                    "name": "cta_url",
                    "parameters": { "display_text": label, "url": url },
                },
            },
        });
        self.post(&payload).await
    }
}
