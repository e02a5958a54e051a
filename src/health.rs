//! Post-apply interface checks.
//!
//! After `netplan apply` the interface is queried again to confirm it picked
//! up the requested configuration.

use crate::system::{current_ipv4, AddressDecision, CommandRunner};

/// Outcome of checking an interface against the configuration just applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// The interface carries the expected address.
    Healthy,
    /// The interface is up but not (yet) as requested.
    Degraded(String),
    /// The interface has no IPv4 address at all.
    Down(String),
}

/// Compare the live address of `interface` with `decision`.
pub async fn check_interface<R: CommandRunner + ?Sized>(
    runner: &R,
    interface: &str,
    decision: &AddressDecision,
) -> HealthStatus {
    let live = current_ipv4(runner, interface).await;

    match (decision, live) {
        (AddressDecision::Dhcp, Some(_)) => HealthStatus::Healthy,
        (AddressDecision::Dhcp, None) => {
            HealthStatus::Degraded(format!("{} has no DHCP lease yet", interface))
        }
        (AddressDecision::Static(expected), Some(live)) if live == expected.address => {
            HealthStatus::Healthy
        }
        (AddressDecision::Static(expected), Some(live)) => HealthStatus::Degraded(format!(
            "{} has {} instead of {}",
            interface, live, expected.address
        )),
        (AddressDecision::Static(_), None) => {
            HealthStatus::Down(format!("{} has no IPv4 address", interface))
        }
    }
}
