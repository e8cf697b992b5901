//! 测试辅助模块
//!
//! 提供各协作者的 mock 实现和便捷的测试工厂方法。

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use domain_provisioner_provider::{ProviderError, Result as ProviderResult};
use tokio::sync::RwLock;

use crate::error::{CoreError, CoreResult};
use crate::services::ServiceContext;
use crate::traits::{
    DnsZoneProvider, Messenger, OperatorAlerter, ReachabilityProbe, Registrar, SiteStore,
    TunnelSupervisor,
};
use crate::types::{
    CnameRecordRequest, DnsRecord, DomainAvailability, NewContact, NewCustomer, Plan,
    RegistrationReceipt, RegistrationRequest, SiteRecord, Zone, ZoneStatus,
};

const MOCK: &str = "mock";

fn mock_nameservers() -> Vec<String> {
    vec![
        "ada.ns.cloudflare.com".to_string(),
        "bob.ns.cloudflare.com".to_string(),
    ]
}

/// 测试用站点：免费套餐，已申请 `sharmadhaba.in`
pub fn sample_site() -> SiteRecord {
    SiteRecord {
        slug: "sharma-dhaba".to_string(),
        business_name: "Sharma Dhaba".to_string(),
        owner_contact: "+919876543210".to_string(),
        owner_email: None,
        city: Some("Jaipur".to_string()),
        plan: Plan::Free,
        pending_domain: Some("sharmadhaba.in".to_string()),
        custom_domain: None,
        domain_live_at: None,
    }
}

// ===== MockSiteStore =====

pub struct MockSiteStore {
    sites: RwLock<HashMap<String, SiteRecord>>,
    /// 如果 Some，save 时返回此错误
    save_error: RwLock<Option<String>>,
    /// 如果 Some，find_awaiting_provisioning 时返回此错误
    query_error: RwLock<Option<String>>,
}

impl MockSiteStore {
    pub fn new() -> Self {
        Self {
            sites: RwLock::new(HashMap::new()),
            save_error: RwLock::new(None),
            query_error: RwLock::new(None),
        }
    }

    pub async fn insert(&self, site: SiteRecord) {
        self.sites.write().await.insert(site.slug.clone(), site);
    }

    pub async fn get(&self, slug: &str) -> Option<SiteRecord> {
        self.sites.read().await.get(slug).cloned()
    }

    pub async fn set_save_error(&self, err: Option<String>) {
        *self.save_error.write().await = err;
    }

    pub async fn set_query_error(&self, err: Option<String>) {
        *self.query_error.write().await = err;
    }
}

#[async_trait]
impl SiteStore for MockSiteStore {
    async fn find_by_slug(&self, slug: &str) -> CoreResult<Option<SiteRecord>> {
        Ok(self.get(slug).await)
    }

    async fn save(&self, site: &SiteRecord) -> CoreResult<()> {
        if let Some(ref msg) = *self.save_error.read().await {
            return Err(CoreError::StorageError(msg.clone()));
        }
        self.insert(site.clone()).await;
        Ok(())
    }

    async fn find_awaiting_provisioning(&self) -> CoreResult<Vec<SiteRecord>> {
        if let Some(ref msg) = *self.query_error.read().await {
            return Err(CoreError::StorageError(msg.clone()));
        }
        Ok(self
            .sites
            .read()
            .await
            .values()
            .filter(|s| s.awaiting_provisioning())
            .cloned()
            .collect())
    }
}

// ===== MockMessenger / MockAlerter =====

/// 已发送的用户消息
#[derive(Debug, Clone)]
pub struct SentMessage {
    pub contact: String,
    pub text: String,
    /// 行动按钮链接（仅 call-to-action 消息）
    pub url: Option<String>,
}

pub struct MockMessenger {
    sent: RwLock<Vec<SentMessage>>,
    fail: RwLock<bool>,
}

impl MockMessenger {
    pub fn new() -> Self {
        Self {
            sent: RwLock::new(Vec::new()),
            fail: RwLock::new(false),
        }
    }

    pub async fn messages(&self) -> Vec<SentMessage> {
        self.sent.read().await.clone()
    }

    pub async fn set_fail(&self, fail: bool) {
        *self.fail.write().await = fail;
    }

    async fn record(&self, contact: &str, text: &str, url: Option<&str>) -> CoreResult<()> {
        if *self.fail.read().await {
            return Err(CoreError::MessagingError("mock messenger down".to_string()));
        }
        self.sent.write().await.push(SentMessage {
            contact: contact.to_string(),
            text: text.to_string(),
            url: url.map(str::to_string),
        });
        Ok(())
    }
}

#[async_trait]
impl Messenger for MockMessenger {
    async fn send(&self, contact: &str, text: &str) -> CoreResult<()> {
        self.record(contact, text, None).await
    }

    async fn send_call_to_action(
        &self,
        contact: &str,
        body: &str,
        url: &str,
        _button_label: &str,
    ) -> CoreResult<()> {
        self.record(contact, body, Some(url)).await
    }
}

pub struct MockAlerter {
    alerts: RwLock<Vec<String>>,
}

impl MockAlerter {
    pub fn new() -> Self {
        Self {
            alerts: RwLock::new(Vec::new()),
        }
    }

    pub async fn alerts(&self) -> Vec<String> {
        self.alerts.read().await.clone()
    }
}

#[async_trait]
impl OperatorAlerter for MockAlerter {
    async fn alert(&self, text: &str) -> CoreResult<()> {
        self.alerts.write().await.push(text.to_string());
        Ok(())
    }
}

// ===== MockDnsZoneProvider =====

pub struct MockDnsZoneProvider {
    zones: RwLock<HashMap<String, Zone>>,
    records: RwLock<Vec<DnsRecord>>,
    add_zone_error: RwLock<Option<ProviderError>>,
    add_zone_delay: RwLock<Option<Duration>>,
    add_zone_calls: RwLock<usize>,
    next_id: AtomicUsize,
}

impl MockDnsZoneProvider {
    pub fn new() -> Self {
        Self {
            zones: RwLock::new(HashMap::new()),
            records: RwLock::new(Vec::new()),
            add_zone_error: RwLock::new(None),
            add_zone_delay: RwLock::new(None),
            add_zone_calls: RwLock::new(0),
            next_id: AtomicUsize::new(1),
        }
    }

    fn next_id(&self, prefix: &str) -> String {
        format!("{prefix}-{}", self.next_id.fetch_add(1, Ordering::SeqCst))
    }

    fn new_zone(&self, domain: &str) -> Zone {
        Zone {
            id: self.next_id("zone"),
            name: domain.to_string(),
            status: ZoneStatus::Pending,
            name_servers: mock_nameservers(),
        }
    }

    /// 预置一个已存在的 zone（模拟上次运行留下的状态）
    pub async fn preload_zone(&self, domain: &str) -> Zone {
        let zone = self.new_zone(domain);
        self.zones
            .write()
            .await
            .insert(domain.to_string(), zone.clone());
        zone
    }

    /// 预置 apex 与 www 两条 CNAME
    pub async fn preload_record(&self, zone_id: &str, domain: &str, target: &str) {
        let mut records = self.records.write().await;
        for name in [domain.to_string(), format!("www.{domain}")] {
            records.push(DnsRecord {
                id: self.next_id("rec"),
                zone_id: zone_id.to_string(),
                name,
                content: target.to_string(),
                proxied: Some(true),
                ttl: 1,
            });
        }
    }

    pub async fn fail_add_zone(&self, err: ProviderError) {
        *self.add_zone_error.write().await = Some(err);
    }

    pub async fn set_add_zone_delay(&self, delay: Duration) {
        *self.add_zone_delay.write().await = Some(delay);
    }

    pub async fn zone(&self, domain: &str) -> Option<Zone> {
        self.zones.read().await.get(domain).cloned()
    }

    pub async fn zone_count(&self) -> usize {
        self.zones.read().await.len()
    }

    pub async fn records(&self) -> Vec<DnsRecord> {
        self.records.read().await.clone()
    }

    pub async fn add_zone_calls(&self) -> usize {
        *self.add_zone_calls.read().await
    }
}

#[async_trait]
impl DnsZoneProvider for MockDnsZoneProvider {
    async fn add_zone(&self, domain: &str) -> ProviderResult<Zone> {
        *self.add_zone_calls.write().await += 1;
        let delay = *self.add_zone_delay.read().await;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(err) = self.add_zone_error.read().await.clone() {
            return Err(err);
        }

        let mut zones = self.zones.write().await;
        if zones.contains_key(domain) {
            return Err(ProviderError::ZoneExists {
                provider: MOCK.to_string(),
                domain: domain.to_string(),
                raw_message: Some("A zone with this name already exists.".to_string()),
            });
        }
        let zone = self.new_zone(domain);
        zones.insert(domain.to_string(), zone.clone());
        Ok(zone)
    }

    async fn find_zone(&self, domain: &str) -> ProviderResult<Option<Zone>> {
        Ok(self.zone(domain).await)
    }

    async fn create_cname_record(&self, req: &CnameRecordRequest) -> ProviderResult<DnsRecord> {
        let mut records = self.records.write().await;
        if records
            .iter()
            .any(|r| r.zone_id == req.zone_id && r.name == req.name)
        {
            return Err(ProviderError::RecordExists {
                provider: MOCK.to_string(),
                record_name: req.name.clone(),
                raw_message: None,
            });
        }
        let record = DnsRecord {
            id: self.next_id("rec"),
            zone_id: req.zone_id.clone(),
            name: req.name.clone(),
            content: req.target.clone(),
            proxied: Some(req.proxied),
            ttl: req.ttl,
        };
        records.push(record.clone());
        Ok(record)
    }
}

// ===== MockRegistrar =====

pub struct MockRegistrar {
    /// label -> 可注册的 TLD
    available: RwLock<HashMap<String, HashSet<String>>>,
    failing_labels: RwLock<HashSet<String>>,
    availability_delays: RwLock<HashMap<String, Duration>>,
    availability_calls: RwLock<Vec<String>>,
    /// email -> customer id
    customers: RwLock<HashMap<String, String>>,
    customer_error: RwLock<Option<String>>,
    created_customers: RwLock<Vec<NewCustomer>>,
    created_contacts: RwLock<Vec<NewContact>>,
    /// domain -> order id
    registrations: RwLock<HashMap<String, String>>,
    /// 其他账户持有的域名
    foreign_registrations: RwLock<HashSet<String>>,
    registration_error: RwLock<Option<String>>,
    registration_requests: RwLock<Vec<RegistrationRequest>>,
    nameserver_updates: RwLock<Vec<(String, Vec<String>)>>,
    fail_modify_nameservers: RwLock<bool>,
    next_id: AtomicUsize,
}

impl MockRegistrar {
    pub fn new() -> Self {
        Self {
            available: RwLock::new(HashMap::new()),
            failing_labels: RwLock::new(HashSet::new()),
            availability_delays: RwLock::new(HashMap::new()),
            availability_calls: RwLock::new(Vec::new()),
            customers: RwLock::new(HashMap::new()),
            customer_error: RwLock::new(None),
            created_customers: RwLock::new(Vec::new()),
            created_contacts: RwLock::new(Vec::new()),
            registrations: RwLock::new(HashMap::new()),
            foreign_registrations: RwLock::new(HashSet::new()),
            registration_error: RwLock::new(None),
            registration_requests: RwLock::new(Vec::new()),
            nameserver_updates: RwLock::new(Vec::new()),
            fail_modify_nameservers: RwLock::new(false),
            next_id: AtomicUsize::new(1),
        }
    }

    fn next_id(&self, prefix: &str) -> String {
        format!("{prefix}-{}", self.next_id.fetch_add(1, Ordering::SeqCst))
    }

    pub async fn set_available(&self, label: &str, tlds: &[&str]) {
        self.available
            .write()
            .await
            .entry(label.to_string())
            .or_default()
            .extend(tlds.iter().map(|t| (*t).to_string()));
    }

    pub async fn fail_availability_for(&self, label: &str) {
        self.failing_labels.write().await.insert(label.to_string());
    }

    pub async fn set_availability_delay(&self, label: &str, delay: Duration) {
        self.availability_delays
            .write()
            .await
            .insert(label.to_string(), delay);
    }

    /// 每次 check_availability 调用的 label
    pub async fn availability_calls(&self) -> Vec<String> {
        self.availability_calls.read().await.clone()
    }

    pub async fn add_customer(&self, email: &str, customer_id: &str) {
        self.customers
            .write()
            .await
            .insert(email.to_string(), customer_id.to_string());
    }

    pub async fn fail_customer_creation(&self, message: &str) {
        *self.customer_error.write().await = Some(message.to_string());
    }

    pub async fn created_customers(&self) -> Vec<NewCustomer> {
        self.created_customers.read().await.clone()
    }

    pub async fn created_contacts(&self) -> Vec<NewContact> {
        self.created_contacts.read().await.clone()
    }

    /// 预置已注册域名（模拟上次运行已完成注册）
    pub async fn preload_registration(&self, domain: &str, order_id: &str) {
        self.registrations
            .write()
            .await
            .insert(domain.to_string(), order_id.to_string());
    }

    /// Domain taken by someone else: registration conflicts, no order here
    pub async fn register_elsewhere(&self, domain: &str) {
        self.foreign_registrations
            .write()
            .await
            .insert(domain.to_string());
    }

    pub async fn fail_registration(&self, message: &str) {
        *self.registration_error.write().await = Some(message.to_string());
    }

    pub async fn registration_requests(&self) -> Vec<RegistrationRequest> {
        self.registration_requests.read().await.clone()
    }

    pub async fn fail_modify_nameservers(&self) {
        *self.fail_modify_nameservers.write().await = true;
    }

    pub async fn nameserver_updates(&self) -> Vec<(String, Vec<String>)> {
        self.nameserver_updates.read().await.clone()
    }
}

#[async_trait]
impl Registrar for MockRegistrar {
    async fn check_availability(
        &self,
        label: &str,
        tlds: &[String],
    ) -> ProviderResult<Vec<DomainAvailability>> {
        self.availability_calls
            .write()
            .await
            .push(label.to_string());
        let delay = self.availability_delays.read().await.get(label).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.failing_labels.read().await.contains(label) {
            return Err(ProviderError::NetworkError {
                provider: MOCK.to_string(),
                detail: "connection reset".to_string(),
            });
        }

        let available = self.available.read().await;
        let free = available.get(label);
        Ok(tlds
            .iter()
            .map(|tld| {
                let is_free = free.is_some_and(|set| set.contains(tld));
                DomainAvailability {
                    domain: format!("{label}.{tld}"),
                    available: is_free,
                    status: if is_free { "available" } else { "regthroughothers" }.to_string(),
                }
            })
            .collect())
    }

    async fn find_customer(&self, email: &str) -> ProviderResult<Option<String>> {
        Ok(self.customers.read().await.get(email).cloned())
    }

    async fn create_customer(&self, customer: &NewCustomer) -> ProviderResult<String> {
        if let Some(msg) = self.customer_error.read().await.clone() {
            return Err(ProviderError::InvalidParameter {
                provider: MOCK.to_string(),
                param: "request".to_string(),
                detail: msg,
            });
        }
        let id = self.next_id("cust");
        self.add_customer(&customer.email, &id).await;
        self.created_customers.write().await.push(customer.clone());
        Ok(id)
    }

    async fn create_contact(&self, contact: &NewContact) -> ProviderResult<String> {
        self.created_contacts.write().await.push(contact.clone());
        Ok(self.next_id("contact"))
    }

    async fn register_domain(&self, req: &RegistrationRequest) -> ProviderResult<RegistrationReceipt> {
        self.registration_requests.write().await.push(req.clone());
        if let Some(msg) = self.registration_error.read().await.clone() {
            return Err(ProviderError::Unknown {
                provider: MOCK.to_string(),
                raw_code: None,
                raw_message: msg,
            });
        }

        let mut registrations = self.registrations.write().await;
        if registrations.contains_key(&req.domain)
            || self.foreign_registrations.read().await.contains(&req.domain)
        {
            return Err(ProviderError::DomainExists {
                provider: MOCK.to_string(),
                domain: req.domain.clone(),
                raw_message: Some("Domain already exists in our database".to_string()),
            });
        }
        let order_id = self.next_id("order");
        registrations.insert(req.domain.clone(), order_id.clone());
        Ok(RegistrationReceipt {
            order_id: Some(order_id),
            status: "Success".to_string(),
            description: None,
        })
    }

    async fn find_order_id(&self, domain: &str) -> ProviderResult<Option<String>> {
        Ok(self.registrations.read().await.get(domain).cloned())
    }

    async fn modify_nameservers(&self, order_id: &str, nameservers: &[String]) -> ProviderResult<()> {
        if *self.fail_modify_nameservers.read().await {
            return Err(ProviderError::Unknown {
                provider: MOCK.to_string(),
                raw_code: None,
                raw_message: "modify-ns rejected".to_string(),
            });
        }
        self.nameserver_updates
            .write()
            .await
            .push((order_id.to_string(), nameservers.to_vec()));
        Ok(())
    }
}

// ===== MockTunnelSupervisor =====

pub struct MockTunnelSupervisor {
    fail: RwLock<bool>,
    restarts: RwLock<usize>,
}

impl MockTunnelSupervisor {
    pub fn new() -> Self {
        Self {
            fail: RwLock::new(false),
            restarts: RwLock::new(0),
        }
    }

    pub async fn set_fail(&self, fail: bool) {
        *self.fail.write().await = fail;
    }

    /// 重启尝试次数（含失败）
    pub async fn restart_count(&self) -> usize {
        *self.restarts.read().await
    }
}

#[async_trait]
impl TunnelSupervisor for MockTunnelSupervisor {
    async fn restart(&self) -> CoreResult<()> {
        *self.restarts.write().await += 1;
        if *self.fail.read().await {
            return Err(CoreError::TunnelConfig(
                "restart exited with status 1".to_string(),
            ));
        }
        Ok(())
    }
}

// ===== MockReachabilityProbe =====

/// 默认永远不可达
pub struct MockReachabilityProbe {
    /// 第 n 次轮询起 DNS 解析且 HTTPS 可达
    succeed_on: RwLock<Option<usize>>,
    /// 只解析、不可达
    resolves_only: RwLock<bool>,
    polls: RwLock<usize>,
}

impl MockReachabilityProbe {
    pub fn new() -> Self {
        Self {
            succeed_on: RwLock::new(None),
            resolves_only: RwLock::new(false),
            polls: RwLock::new(0),
        }
    }

    pub async fn succeed_on_poll(&self, n: usize) {
        *self.succeed_on.write().await = Some(n);
    }

    pub async fn set_resolves_only(&self, resolves_only: bool) {
        *self.resolves_only.write().await = resolves_only;
    }

    pub async fn polls(&self) -> usize {
        *self.polls.read().await
    }

    async fn live_now(&self) -> bool {
        let polls = *self.polls.read().await;
        self.succeed_on.read().await.is_some_and(|n| polls >= n)
    }
}

#[async_trait]
impl ReachabilityProbe for MockReachabilityProbe {
    async fn resolves(&self, _domain: &str) -> bool {
        *self.polls.write().await += 1;
        *self.resolves_only.read().await || self.live_now().await
    }

    async fn reachable(&self, _domain: &str) -> bool {
        !*self.resolves_only.read().await && self.live_now().await
    }
}

// ===== TestHarness =====

/// 全部协作者均为 mock 的服务上下文
pub struct TestHarness {
    pub ctx: Arc<ServiceContext>,
    pub store: Arc<MockSiteStore>,
    pub messenger: Arc<MockMessenger>,
    pub alerter: Arc<MockAlerter>,
    pub dns: Arc<MockDnsZoneProvider>,
    pub registrar: Arc<MockRegistrar>,
    pub tunnel: Arc<MockTunnelSupervisor>,
    pub probe: Arc<MockReachabilityProbe>,
}

impl TestHarness {
    pub fn new() -> Self {
        let store = Arc::new(MockSiteStore::new());
        let messenger = Arc::new(MockMessenger::new());
        let alerter = Arc::new(MockAlerter::new());
        let dns = Arc::new(MockDnsZoneProvider::new());
        let registrar = Arc::new(MockRegistrar::new());
        let tunnel = Arc::new(MockTunnelSupervisor::new());
        let probe = Arc::new(MockReachabilityProbe::new());

        let ctx = Arc::new(ServiceContext::new(
            store.clone(),
            messenger.clone(),
            alerter.clone(),
            dns.clone(),
            registrar.clone(),
            tunnel.clone(),
            probe.clone(),
        ));

        Self {
            ctx,
            store,
            messenger,
            alerter,
            dns,
            registrar,
            tunnel,
            probe,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn store_lists_only_paid_pending_sites() {
        let store = MockSiteStore::new();
        store.insert(sample_site()).await;
        let mut paid = sample_site();
        paid.slug = "paid".to_string();
        paid.plan = Plan::Premium;
        store.insert(paid).await;

        let awaiting = store.find_awaiting_provisioning().await.unwrap();
        assert_eq!(awaiting.len(), 1);
        assert_eq!(awaiting[0].slug, "paid");
    }

    #[tokio::test]
    async fn probe_goes_live_on_configured_poll() {
        let probe = MockReachabilityProbe::new();
        probe.succeed_on_poll(2).await;

        assert!(!probe.resolves("x.in").await);
        assert!(probe.resolves("x.in").await && probe.reachable("x.in").await);
        assert_eq!(probe.polls().await, 2);
    }
}
