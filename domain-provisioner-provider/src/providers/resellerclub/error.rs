//! ResellerClub error mapping
//!
//! The API answers failures with `{"status": "ERROR", "message": "..."}` and no
//! stable error codes, so classification goes by message text. HTTP status
//! codes are only present for non-JSON failures.

use crate::error::ProviderError;
use crate::traits::{ErrorContext, ProviderErrorMapper, RawApiError};

use super::ResellerClubRegistrar;

impl ProviderErrorMapper for ResellerClubRegistrar {
    fn provider_name(&self) -> &'static str {
        "resellerclub"
    }

    fn map_error(&self, raw: RawApiError, context: ErrorContext) -> ProviderError {
        let message = raw.message.to_ascii_lowercase();

        match raw.code.as_deref() {
            Some("401") => {
                return ProviderError::InvalidCredentials {
                    provider: self.provider_name().to_string(),
                    raw_message: Some(raw.message),
                };
            }
            Some("403") => {
                return ProviderError::PermissionDenied {
                    provider: self.provider_name().to_string(),
                    raw_message: Some(raw.message),
                };
            }
            _ => {}
        }

        // "Domain already exists in our database" (an order under this reseller).
        // "x.in is already registered" names a foreign owner and stays unknown.
        if context.domain.is_some() && message.contains("already exists in our database") {
            return ProviderError::DomainExists {
                provider: self.provider_name().to_string(),
                domain: context.domain_or_unknown(),
                raw_message: Some(raw.message),
            };
        }

        // "Authentication Failed", "Invalid auth-userid or api-key"
        if message.contains("authenticat") || message.contains("api-key") {
            return ProviderError::InvalidCredentials {
                provider: self.provider_name().to_string(),
                raw_message: Some(raw.message),
            };
        }

        // IP not whitelisted, reseller not allowed for this product
        if message.contains("access denied")
            || message.contains("not authorized")
            || message.contains("whitelist")
        {
            return ProviderError::PermissionDenied {
                provider: self.provider_name().to_string(),
                raw_message: Some(raw.message),
            };
        }

        // "Website doesn't exist for x.in", "No Entity found"
        if message.contains("doesn't exist")
            || message.contains("does not exist")
            || message.contains("no entity found")
        {
            return ProviderError::DomainNotFound {
                provider: self.provider_name().to_string(),
                domain: context.domain_or_unknown(),
                raw_message: Some(raw.message),
            };
        }

        // "Invalid Phone Number", "Required parameter missing: zipcode"
        if message.starts_with("invalid") || message.contains("required parameter") {
            return ProviderError::InvalidParameter {
                provider: self.provider_name().to_string(),
                param: "request".to_string(),
                detail: raw.message,
            };
        }

        self.unknown_error(raw)
    }
}
