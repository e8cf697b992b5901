//! Application configuration
//!
//! Loaded from a TOML file; credentials can be supplied or overridden from the
//! environment so the file itself can be committed without secrets.

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use domain_provisioner_core::types::{
    AvailabilitySettings, MonitorSettings, RecoverySettings, RegistrantProfile, TunnelSettings,
};
use serde::Deserialize;

/// Environment variable naming the config file.
pub const CONFIG_PATH_ENV: &str = "DOMAIN_PROVISIONER_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "provisioner.toml";
const REDACTED: &str = "[REDACTED]";
/// Longest single wait between propagation polls (one week)
const MAX_SCHEDULE_MINUTES: u64 = 7 * 24 * 60;

#[derive(Clone, Default, Deserialize)]
#[serde(default)]
pub struct CloudflareConfig {
    pub api_token: String,
    pub account_id: String,
    /// API base override (tests, proxies)
    pub base_url: Option<String>,
}

#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct RegistrarConfig {
    pub auth_user_id: String,
    pub api_key: String,
    pub base_url: Option<String>,
    pub request_timeout_secs: u64,
}

impl fmt::Debug for CloudflareConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CloudflareConfig")
            .field("api_token", &REDACTED)
            .field("account_id", &self.account_id)
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl fmt::Debug for RegistrarConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistrarConfig")
            .field("auth_user_id", &self.auth_user_id)
            .field("api_key", &REDACTED)
            .field("base_url", &self.base_url)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

impl Default for RegistrarConfig {
    fn default() -> Self {
        Self {
            auth_user_id: String::new(),
            api_key: String::new(),
            base_url: None,
            request_timeout_secs: 30,
        }
    }
}

#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct WhatsAppConfig {
    pub access_token: String,
    pub phone_number_id: String,
    pub api_base: String,
}

impl fmt::Debug for WhatsAppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WhatsAppConfig")
            .field("access_token", &REDACTED)
            .field("phone_number_id", &self.phone_number_id)
            .field("api_base", &self.api_base)
            .finish()
    }
}

impl Default for WhatsAppConfig {
    fn default() -> Self {
        Self {
            access_token: String::new(),
            phone_number_id: String::new(),
            api_base: "https://graph.facebook.com/v21.0".to_string(),
        }
    }
}

#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct TelegramConfig {
    pub bot_token: String,
    pub chat_id: String,
    pub api_base: String,
}

impl fmt::Debug for TelegramConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TelegramConfig")
            .field("bot_token", &REDACTED)
            .field("chat_id", &self.chat_id)
            .field("api_base", &self.api_base)
            .finish()
    }
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            bot_token: String::new(),
            chat_id: String::new(),
            api_base: "https://api.telegram.org".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// JSON file holding all site records
    pub path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data/sites.json"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// Timeout for each DNS lookup and HTTPS request of a propagation poll
    pub timeout_secs: u64,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self { timeout_secs: 10 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is unset
    pub level: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

/// Secrets are redacted from `Debug` output.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub cloudflare: CloudflareConfig,
    pub registrar: RegistrarConfig,
    pub availability: AvailabilitySettings,
    pub registrant: RegistrantProfile,
    pub tunnel: TunnelSettings,
    pub monitor: MonitorSettings,
    pub recovery: RecoverySettings,
    pub probe: ProbeConfig,
    pub whatsapp: WhatsAppConfig,
    pub telegram: TelegramConfig,
    pub store: StoreConfig,
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Config file path from `DOMAIN_PROVISIONER_CONFIG`, else `provisioner.toml`.
    pub fn default_path() -> PathBuf {
        std::env::var_os(CONFIG_PATH_ENV)
            .map_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from)
    }

    /// Read, apply environment overrides and validate.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let mut config = Self::from_toml_str(&content)
            .with_context(|| format!("invalid config file {}", path.display()))?;
        config.apply_env_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Replace credentials with non-empty values returned by `lookup`.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let overrides: [(&str, &mut String); 6] = [
            ("CLOUDFLARE_API_TOKEN", &mut self.cloudflare.api_token),
            ("CLOUDFLARE_ACCOUNT_ID", &mut self.cloudflare.account_id),
            ("REGISTRAR_AUTH_USER_ID", &mut self.registrar.auth_user_id),
            ("REGISTRAR_API_KEY", &mut self.registrar.api_key),
            ("WHATSAPP_ACCESS_TOKEN", &mut self.whatsapp.access_token),
            ("TELEGRAM_BOT_TOKEN", &mut self.telegram.bot_token),
        ];
        for (key, slot) in overrides {
            if let Some(value) = lookup(key).filter(|v| !v.trim().is_empty()) {
                *slot = value;
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        let required = [
            ("cloudflare.api_token", &self.cloudflare.api_token),
            ("cloudflare.account_id", &self.cloudflare.account_id),
            ("registrar.auth_user_id", &self.registrar.auth_user_id),
            ("registrar.api_key", &self.registrar.api_key),
            ("tunnel.tunnel_hostname", &self.tunnel.tunnel_hostname),
            ("whatsapp.access_token", &self.whatsapp.access_token),
            ("whatsapp.phone_number_id", &self.whatsapp.phone_number_id),
            ("telegram.bot_token", &self.telegram.bot_token),
            ("telegram.chat_id", &self.telegram.chat_id),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                bail!("{name} must not be empty");
            }
        }

        let schedule = &self.monitor.schedule_minutes;
        if schedule.is_empty() {
            bail!("monitor.schedule_minutes must not be empty");
        }
        if schedule.contains(&0) {
            bail!("monitor.schedule_minutes entries must be positive");
        }
        if schedule.iter().any(|&m| m > MAX_SCHEDULE_MINUTES) {
            bail!("monitor.schedule_minutes entries must not exceed {MAX_SCHEDULE_MINUTES}");
        }
        if self.monitor.progress_window_minutes > MAX_SCHEDULE_MINUTES {
            bail!("monitor.progress_window_minutes must not exceed {MAX_SCHEDULE_MINUTES}");
        }
        if schedule.windows(2).any(|w| w[1] < w[0]) {
            bail!("monitor.schedule_minutes must not decrease");
        }

        if self.availability.tlds.is_empty() || self.availability.batch_size == 0 {
            bail!("availability needs at least one TLD and a positive batch_size");
        }
        if self.tunnel.restart_command.is_empty() {
            bail!("tunnel.restart_command must not be empty");
        }
        Ok(())
    }
}
