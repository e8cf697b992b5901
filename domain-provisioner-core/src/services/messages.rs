//! User-facing messages and operator alert texts

use std::time::Duration;

use crate::types::ProvisioningStep;

const SHARE_BASE: &str = "https://wa.me/?text=";

fn minutes(d: Duration) -> u64 {
    d.as_secs() / 60
}

pub(crate) fn progress(step: ProvisioningStep, domain: &str) -> String {
    let total = ProvisioningStep::REPORTED.len();
    let n = step.ordinal().unwrap_or(total);
    let text = match step {
        ProvisioningStep::Zone => format!("Setting up DNS hosting for {domain}"),
        ProvisioningStep::DnsRecord => format!("Pointing {domain} at your website"),
        ProvisioningStep::Identity => "Preparing your domain registration".to_string(),
        ProvisioningStep::Registration => format!("{domain} is now registered for you"),
        ProvisioningStep::Tunnel | ProvisioningStep::Persist => {
            format!("Connecting {domain} to your website")
        }
    };
    format!("⏳ ({n}/{total}) {text}")
}

pub(crate) fn still_propagating(domain: &str, elapsed: Duration) -> String {
    format!(
        "🌐 Still connecting {domain} ({} min so far). This is normal, hang tight.",
        minutes(elapsed)
    )
}

pub(crate) fn live(business_name: &str, domain: &str) -> String {
    format!("🎉 {business_name} is live at https://{domain}\nShare it with your customers!")
}

/// `wa.me` link that opens a pre-filled share message.
pub(crate) fn share_link(business_name: &str, domain: &str) -> String {
    let text = format!("Visit {business_name} online: https://{domain}");
    format!("{SHARE_BASE}{}", urlencoding::encode(&text))
}

pub(crate) const SHARE_BUTTON: &str = "Share";

pub(crate) fn gave_up(domain: &str) -> String {
    format!(
        "⏳ {domain} is taking longer than usual. It may take 1-2 hours; \
         our team is on it and will fix it for you."
    )
}

pub(crate) fn failure_notice(domain: &str) -> String {
    format!("⚠️ We hit a snag while setting up {domain}. Our team has been notified and will sort it out.")
}

pub(crate) fn failure_alert(
    slug: &str,
    domain: &str,
    step: ProvisioningStep,
    payment_reference: Option<&str>,
    detail: &str,
) -> String {
    format!(
        "🚨 Provisioning failed\nsite: {slug}\ndomain: {domain}\nstep: {step}\npayment: {}\nerror: {detail}",
        payment_reference.unwrap_or("-")
    )
}

pub(crate) fn live_alert(slug: &str, domain: &str, elapsed: Duration) -> String {
    format!(
        "ℹ️ {domain} ({slug}) is live after {} min",
        minutes(elapsed)
    )
}

pub(crate) fn gave_up_alert(slug: &str, domain: &str, elapsed: Duration) -> String {
    format!(
        "🚨 ACTION NEEDED: {domain} ({slug}) still not reachable after {} min. \
         Check registrar nameservers, the DNS zone and the tunnel ingress.",
        minutes(elapsed)
    )
}
