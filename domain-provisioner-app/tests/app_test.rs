#![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]
//! Integration tests for `ProvisionerAppBuilder` and the startup recovery path.

use std::sync::Arc;

use domain_provisioner_app::ProvisionerAppBuilder;
use domain_provisioner_app::adapters::JsonFileSiteStore;
use domain_provisioner_app::config::AppConfig;
use domain_provisioner_core::error::CoreError;
use domain_provisioner_core::traits::SiteStore;
use domain_provisioner_core::types::{Plan, RecoveryReport, SiteRecord};
use serde_json::json;
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TUNNEL_CONFIG: &str = "tunnel: 6ff42ae2\ningress:\n  - hostname: kaarigar.in\n    service: http://localhost:3000\n  - service: http_status:404\n";

struct Servers {
    cloudflare: MockServer,
    registrar: MockServer,
    whatsapp: MockServer,
    telegram: MockServer,
}

async fn start_servers() -> Servers {
    let cloudflare = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/zones"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true, "errors": [], "messages": [],
            "result": {
                "id": "zone-1",
                "name": "sharmadhaba.in",
                "status": "pending",
                "name_servers": ["ada.ns.cloudflare.com", "bob.ns.cloudflare.com"]
            }
        })))
        .mount(&cloudflare)
        .await;
    Mock::given(method("POST"))
        .and(path("/zones/zone-1/dns_records"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true, "errors": [], "messages": [],
            "result": {
                "id": "rec-1",
                "name": "sharmadhaba.in",
                "content": "6ff42ae2.cfargotunnel.com",
                "ttl": 1,
                "proxied": true
            }
        })))
        .mount(&cloudflare)
        .await;

    let registrar = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/customers/search.json"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "recsonpage": "0", "recsindb": "0" })),
        )
        .mount(&registrar)
        .await;
    Mock::given(method("POST"))
        .and(path("/customers/v2/signup.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string("2871234"))
        .mount(&registrar)
        .await;
    Mock::given(method("POST"))
        .and(path("/contacts/add.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string("55501"))
        .mount(&registrar)
        .await;
    Mock::given(method("POST"))
        .and(path("/domains/register.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "entityid": "88123",
            "actionstatus": "Success",
            "status": "Success"
        })))
        .mount(&registrar)
        .await;

    let whatsapp = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path_regex(r"^/1098/messages$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&whatsapp)
        .await;

    let telegram = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
        .mount(&telegram)
        .await;

    Servers {
        cloudflare,
        registrar,
        whatsapp,
        telegram,
    }
}

fn config(servers: &Servers, dir: &tempfile::TempDir) -> AppConfig {
    let tunnel_path = dir.path().join("config.yml");
    std::fs::write(&tunnel_path, TUNNEL_CONFIG).unwrap();

    let toml = format!(
        r#"
[cloudflare]
api_token = "cf-token"
account_id = "acc-1"
base_url = "{cloudflare}"

[registrar]
auth_user_id = "900100"
api_key = "rc-key"
base_url = "{registrar}"

[tunnel]
config_path = "{tunnel}"
mirror_path = "{mirror}"
tunnel_hostname = "6ff42ae2.cfargotunnel.com"
restart_command = ["true"]

[recovery]
startup_delay_secs = 0

[whatsapp]
access_token = "wa-token"
phone_number_id = "1098"
api_base = "{whatsapp}"

[telegram]
bot_token = "tg-token"
chat_id = "-100200"
api_base = "{telegram}"

[store]
path = "{store}"
"#,
        cloudflare = servers.cloudflare.uri(),
        registrar = servers.registrar.uri(),
        whatsapp = servers.whatsapp.uri(),
        telegram = servers.telegram.uri(),
        tunnel = tunnel_path.display(),
        mirror = dir.path().join("mirror.yml").display(),
        store = dir.path().join("sites.json").display(),
    );
    let config = AppConfig::from_toml_str(&toml).unwrap();
    config.validate().unwrap();
    config
}

fn paid_site() -> SiteRecord {
    let mut site = SiteRecord::new("sharma-dhaba", "Sharma Dhaba", "+919876543210");
    site.city = Some("Jaipur".to_string());
    site.plan = Plan::Premium;
    site.pending_domain = Some("sharmadhaba.in".to_string());
    site
}

#[test]
fn build_requires_collaborators() {
    let result = ProvisionerAppBuilder::new()
        .site_store(Arc::new(JsonFileSiteStore::new("unused.json")))
        .build();
    assert!(matches!(result, Err(CoreError::ValidationError(ref msg)) if msg.contains("messenger")));
}

#[cfg(unix)]
#[tokio::test]
async fn startup_recovery_finishes_interrupted_site() {
    let servers = start_servers().await;
    let dir = tempfile::tempdir().unwrap();
    let config = config(&servers, &dir);

    // a previous process took payment and crashed before provisioning
    JsonFileSiteStore::new(&config.store.path)
        .save(&paid_site())
        .await
        .unwrap();

    let app = ProvisionerAppBuilder::from_config(&config).build().unwrap();
    let report = app.run_startup_recovery().await.unwrap();

    assert_eq!(
        report,
        RecoveryReport {
            attempted: 1,
            succeeded: 1,
            failed: 0,
            skipped: 0,
        }
    );

    let stored = JsonFileSiteStore::new(&config.store.path)
        .find_by_slug("sharma-dhaba")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.custom_domain.as_deref(), Some("sharmadhaba.in"));
    assert!(stored.pending_domain.is_none());

    let tunnel = std::fs::read_to_string(&config.tunnel.config_path).unwrap();
    assert!(tunnel.contains("hostname: sharmadhaba.in"));
    assert!(tunnel.contains("hostname: www.sharmadhaba.in"));

    assert_eq!(servers.cloudflare.received_requests().await.unwrap().len(), 3);
    let progress = servers.whatsapp.received_requests().await.unwrap().len();
    assert_eq!(progress, 5);
    assert!(servers.telegram.received_requests().await.unwrap().is_empty());

    assert_eq!(app.shutdown().await, 1);
}

#[tokio::test]
async fn disabled_recovery_does_nothing() {
    let servers = start_servers().await;
    let dir = tempfile::tempdir().unwrap();
    let mut config = config(&servers, &dir);
    config.recovery.enabled = false;

    let app = ProvisionerAppBuilder::from_config(&config).build().unwrap();
    assert!(app.run_startup_recovery().await.is_none());
    assert!(servers.registrar.received_requests().await.unwrap().is_empty());
}
