//! 类型定义模块

mod provisioning;
mod settings;
mod site;

pub use provisioning::{
    MonitorOutcome, ProvisioningStep, RecoveryReport, RegistrarIdentity, RegistrationOutcome,
    TriggerOutcome, TunnelUpdate,
};
pub use settings::{
    AvailabilitySettings, MonitorSettings, RecoverySettings, RegistrantProfile, TunnelSettings,
};
pub use site::{Plan, SiteRecord};

// Re-export provider 库的公共类型
pub use domain_provisioner_provider::{
    CnameRecordRequest, DnsRecord, DomainAvailability, NewContact, NewCustomer, PhoneNumber,
    PostalAddress, RegistrationReceipt, RegistrationRequest, Zone, ZoneStatus,
};
