//! Service settings
//!
//! Plain structs with defaults; the host application embeds them in its own
//! configuration file.

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

/// Tunnel ingress settings
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TunnelSettings {
    /// Tunnel daemon configuration file edited in place
    pub config_path: PathBuf,
    /// Copy of the configuration read by the service manager
    pub mirror_path: Option<PathBuf>,
    /// Stable tunnel hostname the CNAME records point at
    pub tunnel_hostname: String,
    /// Local origin the new ingress rules route to
    pub service_url: String,
    /// Program and arguments that restart the tunnel daemon
    pub restart_command: Vec<String>,
}

impl Default for TunnelSettings {
    fn default() -> Self {
        Self {
            config_path: PathBuf::from("/root/.cloudflared/config.yml"),
            mirror_path: Some(PathBuf::from("/etc/cloudflared/config.yml")),
            tunnel_hostname: String::new(),
            service_url: "http://localhost:3000".to_string(),
            restart_command: vec![
                "systemctl".to_string(),
                "restart".to_string(),
                "cloudflared".to_string(),
            ],
        }
    }
}

/// Propagation monitor settings
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct MonitorSettings {
    /// Delays between polls, in minutes
    pub schedule_minutes: Vec<u64>,
    /// Polls before this many minutes send a "still propagating" update
    pub progress_window_minutes: u64,
}

impl Default for MonitorSettings {
    fn default() -> Self {
        Self {
            schedule_minutes: vec![2, 5, 10, 20, 40, 60],
            progress_window_minutes: 10,
        }
    }
}

impl MonitorSettings {
    pub fn schedule(&self) -> Vec<Duration> {
        self.schedule_minutes
            .iter()
            .map(|m| Duration::from_secs(m.saturating_mul(60)))
            .collect()
    }

    pub fn progress_window(&self) -> Duration {
        Duration::from_secs(self.progress_window_minutes.saturating_mul(60))
    }
}

/// Availability checker settings
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AvailabilitySettings {
    /// TLDs in order of preference
    pub tlds: Vec<String>,
    /// Candidates checked concurrently per batch
    pub batch_size: usize,
    /// Pause between batches, in milliseconds
    pub batch_delay_ms: u64,
    /// Per-candidate timeout, in seconds
    pub check_timeout_secs: u64,
}

impl Default for AvailabilitySettings {
    fn default() -> Self {
        Self {
            tlds: vec!["in".to_string(), "com".to_string(), "co.in".to_string()],
            batch_size: 3,
            batch_delay_ms: 1000,
            check_timeout_secs: 5,
        }
    }
}

impl AvailabilitySettings {
    pub fn batch_delay(&self) -> Duration {
        Duration::from_millis(self.batch_delay_ms)
    }

    pub fn check_timeout(&self) -> Duration {
        Duration::from_secs(self.check_timeout_secs)
    }
}

/// Registrant data not carried by the site record
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RegistrantProfile {
    /// Country calling code used when the owner's number has none
    pub default_country_code: String,
    pub address_line: String,
    pub city: String,
    pub state: String,
    /// ISO 3166-1 alpha-2
    pub country: String,
    pub zipcode: String,
    /// Domain used for `<slug>@<domain>` when the owner has no email
    pub fallback_email_domain: String,
    pub registration_years: u32,
    pub protect_privacy: bool,
}

impl Default for RegistrantProfile {
    fn default() -> Self {
        Self {
            default_country_code: "91".to_string(),
            address_line: "Not provided".to_string(),
            city: "Mumbai".to_string(),
            state: "Maharashtra".to_string(),
            country: "IN".to_string(),
            zipcode: "400001".to_string(),
            fallback_email_domain: "example.com".to_string(),
            registration_years: 1,
            protect_privacy: false,
        }
    }
}

/// Startup recovery settings
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RecoverySettings {
    pub enabled: bool,
    /// Delay after boot before scanning, in seconds
    pub startup_delay_secs: u64,
}

impl Default for RecoverySettings {
    fn default() -> Self {
        Self {
            enabled: true,
            startup_delay_secs: 10,
        }
    }
}

impl RecoverySettings {
    pub fn startup_delay(&self) -> Duration {
        Duration::from_secs(self.startup_delay_secs)
    }
}
