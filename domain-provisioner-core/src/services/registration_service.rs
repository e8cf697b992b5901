//! 域名注册

use std::sync::Arc;

use domain_provisioner_provider::ProviderError;

use crate::error::{CoreError, CoreResult};
use crate::traits::Registrar;
use crate::types::{
    ProvisioningStep, RegistrantProfile, RegistrarIdentity, RegistrationOutcome,
    RegistrationRequest,
};

/// 域名注册服务
pub struct RegistrationService {
    registrar: Arc<dyn Registrar>,
    profile: RegistrantProfile,
}

impl RegistrationService {
    #[must_use]
    pub fn new(registrar: Arc<dyn Registrar>, profile: RegistrantProfile) -> Self {
        Self { registrar, profile }
    }

    /// Register `domain` delegated to `nameservers`.
    ///
    /// "Already registered" counts as success only when this account holds an
    /// order for the domain; that order then gets the nameservers pushed to it
    /// on a best-effort basis.
    pub async fn register(
        &self,
        domain: &str,
        identity: &RegistrarIdentity,
        nameservers: &[String],
    ) -> CoreResult<RegistrationOutcome> {
        let req = RegistrationRequest {
            domain: domain.to_string(),
            years: self.profile.registration_years,
            nameservers: nameservers.to_vec(),
            customer_id: identity.customer_id.clone(),
            contact_id: identity.contact_id.clone(),
            protect_privacy: self.profile.protect_privacy,
        };

        match self.registrar.register_domain(&req).await {
            Ok(receipt) => {
                log::info!(
                    "Registered {domain}: order {:?} ({})",
                    receipt.order_id,
                    receipt.status
                );
                Ok(RegistrationOutcome::Registered {
                    order_id: receipt.order_id,
                })
            }
            Err(ProviderError::DomainExists { .. }) => {
                log::info!("{domain} is already registered, syncing nameservers");
                let order_id = self.sync_nameservers(domain, nameservers).await?;
                Ok(RegistrationOutcome::AlreadyRegistered { order_id })
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn sync_nameservers(&self, domain: &str, nameservers: &[String]) -> CoreResult<String> {
        // 无订单 = 域名被他人持有
        let order_id = self
            .registrar
            .find_order_id(domain)
            .await?
            .ok_or_else(|| CoreError::StepFailed {
                step: ProvisioningStep::Registration,
                detail: format!("{domain} is registered outside this account"),
            })?;

        if let Err(e) = self
            .registrar
            .modify_nameservers(&order_id, nameservers)
            .await
        {
            log::warn!("Nameserver update for {domain} (order {order_id}) failed: {e}");
        }
        Ok(order_id)
    }
}
