//! 注册商身份（客户 / 联系人）解析

use std::sync::Arc;

use rand::Rng;
use rand::seq::SliceRandom;

use crate::error::{CoreError, CoreResult};
use crate::traits::Registrar;
use crate::types::{
    NewContact, NewCustomer, PhoneNumber, PostalAddress, RegistrantProfile, RegistrarIdentity,
    SiteRecord,
};

const PASSWORD_LEN: usize = 14;
const LOWER: &[u8] = b"abcdefghijkmnopqrstuvwxyz";
const UPPER: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ";
const DIGITS: &[u8] = b"23456789";
const SYMBOLS: &[u8] = b"!@#$%*";

/// Random registrar account password with at least one character of each class.
pub(crate) fn generate_password() -> String {
    let mut rng = rand::rng();
    let classes = [LOWER, UPPER, DIGITS, SYMBOLS];
    let all: Vec<u8> = classes.concat();

    let mut chars: Vec<u8> = classes
        .iter()
        .map(|class| class[rng.random_range(0..class.len())])
        .collect();
    while chars.len() < PASSWORD_LEN {
        chars.push(all[rng.random_range(0..all.len())]);
    }
    chars.shuffle(&mut rng);
    chars.into_iter().map(char::from).collect()
}

/// 注册商身份服务
pub struct IdentityService {
    registrar: Arc<dyn Registrar>,
    profile: RegistrantProfile,
}

impl IdentityService {
    #[must_use]
    pub fn new(registrar: Arc<dyn Registrar>, profile: RegistrantProfile) -> Self {
        Self { registrar, profile }
    }

    /// Customer and contact for a site's owner.
    pub async fn resolve(&self, site: &SiteRecord) -> CoreResult<RegistrarIdentity> {
        let email = self.owner_email(site);
        let phone = PhoneNumber::parse(&site.owner_contact, &self.profile.default_country_code)
            .ok_or_else(|| {
                CoreError::ValidationError(format!(
                    "owner contact '{}' is not a usable phone number",
                    site.owner_contact
                ))
            })?;

        let customer_id = self
            .get_or_create_customer(&email, &site.business_name, &phone)
            .await?;
        let contact_id = self
            .get_or_create_contact(&customer_id, &site.business_name, &email, &phone)
            .await?;

        Ok(RegistrarIdentity {
            customer_id,
            contact_id,
        })
    }

    /// Existing customer for `email`, or a new one with a generated password.
    pub async fn get_or_create_customer(
        &self,
        email: &str,
        name: &str,
        phone: &PhoneNumber,
    ) -> CoreResult<String> {
        if let Some(id) = self.registrar.find_customer(email).await? {
            log::info!("Reusing registrar customer {id} for {email}");
            return Ok(id);
        }

        let id = self
            .registrar
            .create_customer(&NewCustomer {
                email: email.to_string(),
                password: generate_password(),
                name: name.to_string(),
                company: name.to_string(),
                phone: phone.clone(),
                address: self.address(),
            })
            .await?;
        log::info!("Created registrar customer {id} for {email}");
        Ok(id)
    }

    /// Always creates a contact; the registrar offers no contact search.
    pub async fn get_or_create_contact(
        &self,
        customer_id: &str,
        name: &str,
        email: &str,
        phone: &PhoneNumber,
    ) -> CoreResult<String> {
        let id = self
            .registrar
            .create_contact(&NewContact {
                customer_id: customer_id.to_string(),
                name: name.to_string(),
                company: name.to_string(),
                email: email.to_string(),
                phone: phone.clone(),
                address: self.address(),
            })
            .await?;
        Ok(id)
    }

    fn owner_email(&self, site: &SiteRecord) -> String {
        site.owner_email
            .as_deref()
            .map(str::trim)
            .filter(|e| e.contains('@'))
            .map_or_else(
                || format!("{}@{}", site.slug, self.profile.fallback_email_domain),
                ToString::to_string,
            )
    }

    fn address(&self) -> PostalAddress {
        PostalAddress {
            line1: self.profile.address_line.clone(),
            city: self.profile.city.clone(),
            state: self.profile.state.clone(),
            country: self.profile.country.clone(),
            zipcode: self.profile.zipcode.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{MockRegistrar, sample_site};

    fn service(registrar: Arc<MockRegistrar>) -> IdentityService {
        IdentityService::new(registrar, RegistrantProfile::default())
    }

    #[test]
    fn password_has_every_class() {
        for _ in 0..50 {
            let p = generate_password();
            assert_eq!(p.len(), PASSWORD_LEN);
            assert!(p.bytes().any(|b| LOWER.contains(&b)));
            assert!(p.bytes().any(|b| UPPER.contains(&b)));
            assert!(p.bytes().any(|b| DIGITS.contains(&b)));
            assert!(p.bytes().any(|b| SYMBOLS.contains(&b)));
        }
    }

    #[tokio::test]
    async fn reuses_existing_customer() {
        let registrar = Arc::new(MockRegistrar::new());
        registrar.add_customer("owner@sharmadhaba.in", "cust-7").await;
        let mut site = sample_site();
        site.owner_email = Some("owner@sharmadhaba.in".to_string());

        let identity = service(registrar.clone()).resolve(&site).await.unwrap();

        assert_eq!(identity.customer_id, "cust-7");
        assert_eq!(registrar.created_customers().await.len(), 0);
        assert_eq!(registrar.created_contacts().await.len(), 1);
    }

    #[tokio::test]
    async fn creates_customer_with_fallback_email() {
        let registrar = Arc::new(MockRegistrar::new());
        let site = sample_site();

        let identity = service(registrar.clone()).resolve(&site).await.unwrap();

        let customers = registrar.created_customers().await;
        assert_eq!(customers.len(), 1);
        assert_eq!(customers[0].email, "sharma-dhaba@example.com");
        assert_eq!(customers[0].phone.country_code, "91");
        assert_eq!(customers[0].phone.number, "9876543210");
        assert!(!customers[0].password.is_empty());
        assert_eq!(
            registrar.created_contacts().await[0].customer_id,
            identity.customer_id
        );
    }

    #[tokio::test]
    async fn rerun_creates_a_second_contact() {
        let registrar = Arc::new(MockRegistrar::new());
        let site = sample_site();
        let svc = service(registrar.clone());

        let first = svc.resolve(&site).await.unwrap();
        let second = svc.resolve(&site).await.unwrap();

        assert_eq!(first.customer_id, second.customer_id);
        assert_ne!(first.contact_id, second.contact_id);
        assert_eq!(registrar.created_customers().await.len(), 1);
    }

    #[tokio::test]
    async fn unusable_phone_is_validation_error() {
        let registrar = Arc::new(MockRegistrar::new());
        let mut site = sample_site();
        site.owner_contact = "call me".to_string();

        let err = service(registrar).resolve(&site).await.unwrap_err();
        assert!(matches!(err, CoreError::ValidationError(_)));
    }

    #[tokio::test]
    async fn customer_creation_failure_is_terminal() {
        let registrar = Arc::new(MockRegistrar::new());
        registrar.fail_customer_creation("Invalid Phone Number").await;

        let err = service(registrar.clone())
            .resolve(&sample_site())
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Provider(_)));
        assert!(registrar.created_contacts().await.is_empty());
    }
}
