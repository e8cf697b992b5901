//! Concrete collaborators for the provisioning core

mod json_site_store;
mod telegram_alerter;
mod whatsapp_messenger;

pub use json_site_store::JsonFileSiteStore;
pub use telegram_alerter::TelegramAlerter;
pub use whatsapp_messenger::WhatsAppMessenger;

use std::time::Duration;

const MESSAGING_TIMEOUT: Duration = Duration::from_secs(15);

/// HTTP client for the messaging adapters
fn messaging_client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(MESSAGING_TIMEOUT)
        .build()
        .unwrap_or_else(|e| {
            tracing::warn!("Failed to build messaging HTTP client, using defaults: {e}");
            reqwest::Client::new()
        })
}
