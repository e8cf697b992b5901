//! Cloudflare error mapping

use crate::error::ProviderError;
use crate::traits::{ErrorContext, ProviderErrorMapper, RawApiError};

use super::CloudflareProvider;

/// Cloudflare error code mapping
/// Reference: <https://api.cloudflare.com/#getting-started-responses>
impl ProviderErrorMapper for CloudflareProvider {
    fn provider_name(&self) -> &'static str {
        "cloudflare"
    }

    fn map_error(&self, raw: RawApiError, context: ErrorContext) -> ProviderError {
        match raw.code.as_deref() {
            // Authentication error
            // 6003: Invalid request headers
            // 6111: Invalid format for Authorization header
            // 9109: Unauthorized to access requested resource
            // 10000: Authentication error
            // 401: HTTP status fallback
            Some("6003" | "6111" | "9109" | "10000" | "401") => {
                ProviderError::InvalidCredentials {
                    provider: self.provider_name().to_string(),
                    raw_message: Some(raw.message),
                }
            }

            // 403: token lacks Zone:Edit / DNS:Edit
            Some("403") => ProviderError::PermissionDenied {
                provider: self.provider_name().to_string(),
                raw_message: Some(raw.message),
            },

            // Zone already hosted
            // 1061: <domain> already exists
            Some("1061") => ProviderError::ZoneExists {
                provider: self.provider_name().to_string(),
                domain: context.domain_or_unknown(),
                raw_message: Some(raw.message),
            },

            // Invalid zone name
            // 1049: <domain> is not a registered domain
            // 1099: Zone name is invalid
            Some("1049" | "1099") => ProviderError::InvalidParameter {
                provider: self.provider_name().to_string(),
                param: "name".to_string(),
                detail: raw.message,
            },

            // Invalid record parameter
            // 1004: DNS Validation Error
            // 9000: Invalid or missing name
            // 9021: Invalid TTL
            // 9041: This DNS record cannot be proxied
            Some(code @ ("1004" | "9000" | "9021" | "9041")) => {
                let param = match code {
                    "9000" => "name",
                    "9021" => "ttl",
                    "9041" => "proxied",
                    _ => "general",
                };
                ProviderError::InvalidParameter {
                    provider: self.provider_name().to_string(),
                    param: param.to_string(),
                    detail: raw.message,
                }
            }

            // record already exists
            // 81053: An A AAAA or CNAME record already exists with that host
            // 81054: A CNAME record with that host already exists
            // 81057: The record already exists
            // 81058: A record with those settings already exists
            Some("81053" | "81054" | "81055" | "81056" | "81057" | "81058") => {
                ProviderError::RecordExists {
                    provider: self.provider_name().to_string(),
                    record_name: context
                        .record_name
                        .unwrap_or_else(|| "<unknown>".to_string()),
                    raw_message: Some(raw.message),
                }
            }

            // Zone does not exist
            // 7000: No route for that URI
            // 7003: Could not route to /path
            Some("7000" | "7003") => ProviderError::DomainNotFound {
                provider: self.provider_name().to_string(),
                domain: context.domain_or_unknown(),
                raw_message: Some(raw.message),
            },

            // 未收录的错误码：按消息兜底识别 "already exists"
            _ if raw.message.to_ascii_lowercase().contains("already exists") => {
                match context.record_name {
                    Some(record_name) => ProviderError::RecordExists {
                        provider: self.provider_name().to_string(),
                        record_name,
                        raw_message: Some(raw.message),
                    },
                    None => ProviderError::ZoneExists {
                        provider: self.provider_name().to_string(),
                        domain: context.domain_or_unknown(),
                        raw_message: Some(raw.message),
                    },
                }
            }

            _ => self.unknown_error(raw),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> CloudflareProvider {
        CloudflareProvider::new(String::new(), String::new())
    }

    #[test]
    fn auth_error_10000() {
        let err = provider().map_error(
            RawApiError::with_code("10000", "auth error"),
            ErrorContext::default(),
        );
        assert!(matches!(err, ProviderError::InvalidCredentials { .. }));
    }

    #[test]
    fn zone_exists_1061_carries_domain() {
        let err = provider().map_error(
            RawApiError::with_code("1061", "sharmadhaba.in already exists"),
            ErrorContext::for_domain("sharmadhaba.in"),
        );
        assert!(matches!(
            err,
            ProviderError::ZoneExists { ref domain, .. } if domain == "sharmadhaba.in"
        ));
        assert!(err.is_conflict());
    }

    #[test]
    fn record_exists_81053() {
        let err = provider().map_error(
            RawApiError::with_code("81053", "A/AAAA/CNAME already exists"),
            ErrorContext::for_record("www.sharmadhaba.in"),
        );
        assert!(matches!(
            err,
            ProviderError::RecordExists { ref record_name, .. } if record_name == "www.sharmadhaba.in"
        ));
    }

    #[test]
    fn unregistered_domain_is_invalid_parameter() {
        let err = provider().map_error(
            RawApiError::with_code("1049", "not a registered domain"),
            ErrorContext::for_domain("nope.in"),
        );
        assert!(matches!(
            err,
            ProviderError::InvalidParameter { ref param, .. } if param == "name"
        ));
    }

    #[test]
    fn unknown_code_with_exists_message_maps_by_context() {
        let zone_err = provider().map_error(
            RawApiError::with_code("99999", "Zone already exists"),
            ErrorContext::for_domain("x.in"),
        );
        assert!(matches!(zone_err, ProviderError::ZoneExists { .. }));

        let record_err = provider().map_error(
            RawApiError::with_code("99999", "Record already exists"),
            ErrorContext::for_record("x.in"),
        );
        assert!(matches!(record_err, ProviderError::RecordExists { .. }));
    }

    #[test]
    fn fallback_unknown_code() {
        let err = provider().map_error(
            RawApiError::with_code("12345", "strange"),
            ErrorContext::default(),
        );
        assert!(matches!(
            err,
            ProviderError::Unknown { ref raw_code, .. } if raw_code.as_deref() == Some("12345")
        ));
    }

    #[test]
    fn forbidden_status_is_permission_denied() {
        let err = provider().map_error(
            RawApiError::with_code("403", "HTTP 403"),
            ErrorContext::default(),
        );
        assert!(matches!(err, ProviderError::PermissionDenied { .. }));
    }
}
