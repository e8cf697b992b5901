//! Tunnel daemon restart

use async_trait::async_trait;
use tokio::process::Command;

use crate::error::{CoreError, CoreResult};

/// Restarts the reverse-tunnel daemon so new ingress rules take effect.
#[async_trait]
pub trait TunnelSupervisor: Send + Sync {
    async fn restart(&self) -> CoreResult<()>;
}

/// Runs a restart command such as `systemctl restart cloudflared`.
pub struct CommandTunnelSupervisor {
    command: Vec<String>,
}

impl CommandTunnelSupervisor {
    /// `command[0]` is the program, the rest are its arguments.
    #[must_use]
    pub fn new(command: Vec<String>) -> Self {
        Self { command }
    }
}

#[async_trait]
impl TunnelSupervisor for CommandTunnelSupervisor {
    async fn restart(&self) -> CoreResult<()> {
        let Some((program, args)) = self.command.split_first() else {
            return Err(CoreError::ValidationError(
                "tunnel restart command is empty".to_string(),
            ));
        };

        log::info!("[tunnel] Restarting: {}", self.command.join(" "));
        let output = Command::new(program)
            .args(args)
            .output()
            .await
            .map_err(|e| CoreError::TunnelConfig(format!("failed to run {program}: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(CoreError::TunnelConfig(format!(
                "{program} exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }
        Ok(())
    }
}
