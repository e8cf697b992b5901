use serde::{Deserialize, Serialize};

// ============ DNS zone ============

/// Lifecycle status of a hosted zone at the DNS/CDN provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ZoneStatus {
    /// Nameservers are delegated and the zone is serving.
    Active,
    /// Zone created, waiting for the registrar delegation to be observed.
    Pending,
    /// Zone moved away or deactivated.
    Moved,
    /// Status string not recognised.
    Unknown,
}

/// A hosted zone and its authoritative nameservers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Zone {
    /// Provider-specific zone identifier.
    pub id: String,
    /// Apex domain of the zone.
    pub name: String,
    /// Current zone status.
    pub status: ZoneStatus,
    /// Nameservers the registrar must delegate to.
    pub name_servers: Vec<String>,
}

// ============ DNS records ============

/// Request to create a CNAME record inside a zone.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CnameRecordRequest {
    /// Zone to create the record in.
    pub zone_id: String,
    /// Fully qualified record name (`example.in`, `www.example.in`).
    pub name: String,
    /// CNAME target hostname.
    pub target: String,
    /// Route traffic through the provider's proxy (TLS terminates there).
    pub proxied: bool,
    /// TTL in seconds; `1` means "automatic" at Cloudflare.
    pub ttl: u32,
}

/// A DNS record as reported by the provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DnsRecord {
    /// Record identifier.
    pub id: String,
    /// Zone identifier the record belongs to.
    pub zone_id: String,
    /// Fully qualified record name.
    pub name: String,
    /// Record content (the CNAME target).
    pub content: String,
    /// Whether the record is proxied.
    pub proxied: Option<bool>,
    /// TTL in seconds.
    pub ttl: u32,
}

// ============ Registrar ============

/// Availability of one fully qualified domain at the registrar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainAvailability {
    /// Fully qualified domain name.
    pub domain: String,
    /// `true` if the registrar reports the name as free.
    pub available: bool,
    /// Raw registrar status string (`available`, `regthroughus`, ...).
    pub status: String,
}

/// Phone number split the way the registrar expects it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhoneNumber {
    /// Country calling code without `+`.
    pub country_code: String,
    /// Subscriber number.
    pub number: String,
}

impl PhoneNumber {
    /// Number of digits in a national subscriber number.
    const NATIONAL_DIGITS: usize = 10;

    /// Parse a free-form phone number (`+91 98765-43210`, `919876543210`).
    ///
    /// Digits beyond the last ten are taken as the country code; a bare ten-digit
    /// number gets `default_country_code`.
    pub fn parse(raw: &str, default_country_code: &str) -> Option<Self> {
        let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
        if digits.len() < Self::NATIONAL_DIGITS {
            return None;
        }
        let split = digits.len() - Self::NATIONAL_DIGITS;
        let (cc, number) = digits.split_at(split);
        Some(Self {
            country_code: if cc.is_empty() {
                default_country_code.to_string()
            } else {
                cc.to_string()
            },
            number: number.to_string(),
        })
    }
}

/// Postal address sent with customer and contact records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostalAddress {
    /// Street line.
    pub line1: String,
    /// City.
    pub city: String,
    /// State or province.
    pub state: String,
    /// ISO 3166-1 alpha-2 country code.
    pub country: String,
    /// Postal code.
    pub zipcode: String,
}

/// Request to create a registrar customer account.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCustomer {
    /// Login email, also the search key for later lookups.
    pub email: String,
    /// Account password.
    pub password: String,
    /// Customer display name.
    pub name: String,
    /// Company name.
    pub company: String,
    /// Contact phone.
    pub phone: PhoneNumber,
    /// Postal address.
    pub address: PostalAddress,
}

/// Request to create a contact record owned by a customer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewContact {
    /// Owning customer.
    pub customer_id: String,
    /// Contact name.
    pub name: String,
    /// Company name.
    pub company: String,
    /// Contact email.
    pub email: String,
    /// Contact phone.
    pub phone: PhoneNumber,
    /// Postal address.
    pub address: PostalAddress,
}

/// Request to register a domain.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationRequest {
    /// Domain to register.
    pub domain: String,
    /// Registration term in years.
    pub years: u32,
    /// Nameservers to delegate to at registration time.
    pub nameservers: Vec<String>,
    /// Registrar customer.
    pub customer_id: String,
    /// Contact used for registrant/admin/tech/billing roles.
    pub contact_id: String,
    /// Enable WHOIS privacy protection.
    pub protect_privacy: bool,
}

/// Successful registration response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationReceipt {
    /// Registrar order id (`entityid`).
    pub order_id: Option<String>,
    /// Action status reported by the registrar.
    pub status: String,
    /// Human-readable action description, if any.
    pub description: Option<String>,
}
