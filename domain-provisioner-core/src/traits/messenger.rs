//! Outbound notification traits

use async_trait::async_trait;

use crate::error::CoreResult;

/// User-facing messaging channel (the site owner's chat).
#[async_trait]
pub trait Messenger: Send + Sync {
    /// Send a plain text message.
    async fn send(&self, contact: &str, text: &str) -> CoreResult<()>;

    /// Send a message with a single link button.
    async fn send_call_to_action(
        &self,
        contact: &str,
        body: &str,
        url: &str,
        button_label: &str,
    ) -> CoreResult<()>;
}

/// Operator alert channel, separate from the user-facing one.
#[async_trait]
pub trait OperatorAlerter: Send + Sync {
    async fn alert(&self, text: &str) -> CoreResult<()>;
}
