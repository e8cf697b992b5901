//! ResellerClub Registrar trait 实现

use async_trait::async_trait;

use crate::error::{ProviderError, Result};
use crate::providers::common::normalize_domain_name;
use crate::traits::{ErrorContext, ProviderErrorMapper, RawApiError, Registrar};
use crate::types::{
    DomainAvailability, NewContact, NewCustomer, PostalAddress, RegistrationReceipt,
    RegistrationRequest,
};

use super::ResellerClubRegistrar;
use super::http::Params;
use super::types::{ActionResponse, AvailabilityResponse, CustomerSearchResponse, value_to_id};

fn address_params(address: &PostalAddress) -> Params<'static> {
    vec![
        ("address-line-1", address.line1.clone()),
        ("city", address.city.clone()),
        ("state", address.state.clone()),
        ("country", address.country.clone()),
        ("zipcode", address.zipcode.clone()),
    ]
}

impl ResellerClubRegistrar {
    /// 解析返回纯 ID（数字或字符串）的响应
    fn id_from(&self, value: &serde_json::Value, what: &str) -> Result<String> {
        value_to_id(value).ok_or_else(|| self.parse_error(format!("{what}: 响应中缺少 ID")))
    }
}

#[async_trait]
impl Registrar for ResellerClubRegistrar {
    async fn check_availability(
        &self,
        label: &str,
        tlds: &[String],
    ) -> Result<Vec<DomainAvailability>> {
        let mut params: Params<'_> = vec![("domain-name", label.to_string())];
        params.extend(tlds.iter().map(|tld| ("tlds", tld.clone())));

        let value = self
            .get("/domains/available.json", params, ErrorContext::default())
            .await?;
        let response: AvailabilityResponse =
            serde_json::from_value(value).map_err(|e| self.parse_error(e))?;

        // 保持调用方给出的 TLD 顺序；缺失的条目视为不可用
        Ok(tlds
            .iter()
            .map(|tld| {
                let domain = format!("{label}.{tld}");
                let status = response
                    .get(&domain)
                    .map_or_else(|| "unknown".to_string(), |e| e.status.clone());
                DomainAvailability {
                    available: status.eq_ignore_ascii_case("available"),
                    domain,
                    status,
                }
            })
            .collect())
    }

    async fn find_customer(&self, email: &str) -> Result<Option<String>> {
        let params: Params<'_> = vec![
            ("no-of-records", "10".to_string()),
            ("page-no", "1".to_string()),
            ("username", email.to_string()),
        ];
        let value = self
            .get("/customers/search.json", params, ErrorContext::default())
            .await?;
        let response: CustomerSearchResponse =
            serde_json::from_value(value).map_err(|e| self.parse_error(e))?;

        if response.total() == 0 {
            return Ok(None);
        }
        Ok(response.first_customer_id())
    }

    async fn create_customer(&self, customer: &NewCustomer) -> Result<String> {
        let mut params: Params<'_> = vec![
            ("username", customer.email.clone()),
            ("passwd", customer.password.clone()),
            ("name", customer.name.clone()),
            ("company", customer.company.clone()),
            ("phone-cc", customer.phone.country_code.clone()),
            ("phone", customer.phone.number.clone()),
            ("lang-pref", "en".to_string()),
        ];
        params.extend(address_params(&customer.address));

        let value = self
            .post("/customers/v2/signup.json", params, ErrorContext::default())
            .await?;
        let id = self.id_from(&value, "customers/v2/signup")?;
        log::info!("[resellerclub] Customer created: {id}");
        Ok(id)
    }

    async fn create_contact(&self, contact: &NewContact) -> Result<String> {
        let mut params: Params<'_> = vec![
            ("name", contact.name.clone()),
            ("company", contact.company.clone()),
            ("email", contact.email.clone()),
            ("phone-cc", contact.phone.country_code.clone()),
            ("phone", contact.phone.number.clone()),
            ("customer-id", contact.customer_id.clone()),
            ("type", "Contact".to_string()),
        ];
        params.extend(address_params(&contact.address));

        let value = self
            .post("/contacts/add.json", params, ErrorContext::default())
            .await?;
        let id = self.id_from(&value, "contacts/add")?;
        log::info!("[resellerclub] Contact created: {id}");
        Ok(id)
    }

    async fn register_domain(&self, req: &RegistrationRequest) -> Result<RegistrationReceipt> {
        let domain = normalize_domain_name(&req.domain);
        let mut params: Params<'_> = vec![
            ("domain-name", domain.clone()),
            ("years", req.years.to_string()),
        ];
        params.extend(req.nameservers.iter().map(|ns| ("ns", ns.clone())));
        params.extend([
            ("customer-id", req.customer_id.clone()),
            ("reg-contact-id", req.contact_id.clone()),
            ("admin-contact-id", req.contact_id.clone()),
            ("tech-contact-id", req.contact_id.clone()),
            ("billing-contact-id", req.contact_id.clone()),
            ("invoice-option", "NoInvoice".to_string()),
            ("protect-privacy", req.protect_privacy.to_string()),
        ]);

        let value = self
            .post(
                "/domains/register.json",
                params,
                ErrorContext::for_domain(&domain),
            )
            .await?;
        let response: ActionResponse =
            serde_json::from_value(value).map_err(|e| self.parse_error(e))?;

        if response.is_failed() {
            return Err(self.unknown_error(RawApiError::new(
                response
                    .actionstatusdesc
                    .clone()
                    .unwrap_or_else(|| format!("Registration of {domain} failed")),
            )));
        }

        let receipt = RegistrationReceipt {
            order_id: response.entityid.as_ref().and_then(value_to_id),
            status: response.status(),
            description: response.actionstatusdesc,
        };
        log::info!(
            "[resellerclub] Domain registered: {domain} (order {:?}, {})",
            receipt.order_id,
            receipt.status
        );
        Ok(receipt)
    }

    async fn find_order_id(&self, domain: &str) -> Result<Option<String>> {
        let domain = normalize_domain_name(domain);
        let params: Params<'_> = vec![("domain-name", domain.clone())];

        match self
            .get(
                "/domains/orderid.json",
                params,
                ErrorContext::for_domain(&domain),
            )
            .await
        {
            Ok(value) => Ok(value_to_id(&value)),
            Err(ProviderError::DomainNotFound { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn modify_nameservers(&self, order_id: &str, nameservers: &[String]) -> Result<()> {
        let mut params: Params<'_> = vec![("order-id", order_id.to_string())];
        params.extend(nameservers.iter().map(|ns| ("ns", ns.clone())));

        let value = self
            .post("/domains/modify-ns.json", params, ErrorContext::default())
            .await?;
        let response: ActionResponse =
            serde_json::from_value(value).map_err(|e| self.parse_error(e))?;

        if response.is_failed() {
            return Err(self.unknown_error(RawApiError::new(
                response
                    .actionstatusdesc
                    .unwrap_or_else(|| format!("modify-ns failed for order {order_id}")),
            )));
        }

        log::info!("[resellerclub] Nameservers updated for order {order_id}");
        Ok(())
    }
}
