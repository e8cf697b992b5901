//! 隧道 ingress 规则更新

use std::path::Path;
use std::sync::Arc;

use domain_provisioner_provider::normalize_domain_name;
use tokio::fs;
use tokio::sync::Mutex;

use crate::error::{CoreError, CoreResult};
use crate::traits::TunnelSupervisor;
use crate::types::{TunnelSettings, TunnelUpdate};

/// `- service: http_status:404` style fallback rule (no hostname).
fn is_catch_all(line: &str) -> bool {
    line.trim_start().starts_with("- service:")
}

fn indent_of(line: &str) -> &str {
    &line[..line.len() - line.trim_start().len()]
}

/// Index just past the last non-blank line belonging to the `ingress:` key at `key`.
fn ingress_block_end(lines: &[&str], key: usize) -> usize {
    let mut end = key + 1;
    for (i, line) in lines.iter().enumerate().skip(key + 1) {
        if line.trim().is_empty() || line.trim_start().starts_with('#') {
            continue;
        }
        // 顶层键结束 ingress 块；顶格的 "- " 仍属于列表
        if indent_of(line).is_empty() && !line.starts_with('-') {
            break;
        }
        end = i + 1;
    }
    end
}

fn hostname_of(line: &str) -> Option<&str> {
    let rest = line.trim_start();
    let rest = rest.strip_prefix("- ").unwrap_or(rest);
    let value = rest.strip_prefix("hostname:")?;
    Some(value.trim().trim_matches(|c| c == '"' || c == '\''))
}

/// Add apex and `www` ingress rules for `domain` before the catch-all rule.
///
/// Returns `None` when the configuration already routes the apex hostname.
/// Without a catch-all the rules go at the end of the `ingress:` block, or
/// under a new `ingress:` key at the end of the file when there is none.
pub fn insert_ingress_rules(config: &str, domain: &str, service_url: &str) -> Option<String> {
    let domain = normalize_domain_name(domain);
    if config
        .lines()
        .filter_map(hostname_of)
        .any(|h| h.eq_ignore_ascii_case(&domain))
    {
        return None;
    }

    let lines: Vec<&str> = config.lines().collect();
    let rules = |indent: &str| {
        vec![
            format!("{indent}- hostname: {domain}"),
            format!("{indent}  service: {service_url}"),
            format!("{indent}- hostname: www.{domain}"),
            format!("{indent}  service: {service_url}"),
        ]
    };

    let mut out: Vec<String> = Vec::with_capacity(lines.len() + 5);
    if let Some(idx) = lines.iter().position(|l| is_catch_all(l)) {
        let indent = indent_of(lines[idx]);
        out.extend(lines[..idx].iter().map(ToString::to_string));
        out.extend(rules(indent));
        out.extend(lines[idx..].iter().map(ToString::to_string));
    } else if let Some(key) = lines.iter().position(|l| l.starts_with("ingress:")) {
        let end = ingress_block_end(&lines, key);
        let indent = lines[key + 1..end]
            .iter()
            .find(|l| l.trim_start().starts_with("- "))
            .map_or("  ", |l| indent_of(l));
        out.extend(lines[..end].iter().map(ToString::to_string));
        out.extend(rules(indent));
        out.extend(lines[end..].iter().map(ToString::to_string));
    } else {
        out.extend(lines.iter().map(ToString::to_string));
        out.push("ingress:".to_string());
        out.extend(rules("  "));
    }

    let mut updated = out.join("\n");
    updated.push('\n');
    Some(updated)
}

/// 隧道 ingress 服务
pub struct TunnelIngressService {
    supervisor: Arc<dyn TunnelSupervisor>,
    settings: TunnelSettings,
    /// 串行化配置文件的读-改-写
    edit_lock: Mutex<()>,
}

impl TunnelIngressService {
    #[must_use]
    pub fn new(supervisor: Arc<dyn TunnelSupervisor>, settings: TunnelSettings) -> Self {
        Self {
            supervisor,
            settings,
            edit_lock: Mutex::new(()),
        }
    }

    /// Route `domain` and `www.<domain>` to the local site and restart the tunnel.
    ///
    /// File errors are returned; a failed restart is only logged.
    pub async fn ensure_ingress(&self, domain: &str) -> CoreResult<TunnelUpdate> {
        let updated = {
            let _edit = self.edit_lock.lock().await;
            let path = &self.settings.config_path;
            let config = fs::read_to_string(path).await.map_err(|e| {
                CoreError::TunnelConfig(format!("failed to read {}: {e}", path.display()))
            })?;

            match insert_ingress_rules(&config, domain, &self.settings.service_url) {
                Some(updated) => {
                    fs::write(path, &updated).await.map_err(|e| {
                        CoreError::TunnelConfig(format!("failed to write {}: {e}", path.display()))
                    })?;
                    self.mirror(&updated).await;
                    true
                }
                None => {
                    log::info!("[tunnel] Ingress for {domain} already present");
                    self.mirror(&config).await;
                    false
                }
            }
        };

        if !updated {
            return Ok(TunnelUpdate::Unchanged);
        }

        log::info!("[tunnel] Ingress rules added for {domain}");
        let restarted = match self.supervisor.restart().await {
            Ok(()) => true,
            Err(e) => {
                log::warn!("[tunnel] Restart after adding {domain} failed: {e}");
                false
            }
        };
        Ok(TunnelUpdate::Updated { restarted })
    }

    /// Copy the configuration to the service-manager path if it differs.
    async fn mirror(&self, content: &str) {
        let Some(mirror) = self.settings.mirror_path.as_deref() else {
            return;
        };
        if read_if_exists(mirror).await.as_deref() == Some(content) {
            return;
        }
        if let Err(e) = fs::write(mirror, content).await {
            log::warn!("[tunnel] Failed to mirror config to {}: {e}", mirror.display());
        }
    }
}

async fn read_if_exists(path: &Path) -> Option<String> {
    fs::read_to_string(path).await.ok()
}
