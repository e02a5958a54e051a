//! Network interface detection via iproute2.

use tracing::{debug, warn};

use crate::error::Result;
use crate::system::CommandRunner;

/// Name of the loopback interface, never offered for configuration.
const LOOPBACK: &str = "lo";

/// Information about a network interface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceInfo {
    pub name: String,
    /// IPv4 address in CIDR form; `None` when the interface has none.
    pub ipv4_address: Option<String>,
}

impl InterfaceInfo {
    /// Address for display, `N/A` when absent.
    pub fn address_display(&self) -> &str {
        self.ipv4_address.as_deref().unwrap_or("N/A")
    }
}

/// List non-loopback interfaces in the order `ip -br addr` reports them.
pub async fn list_interfaces<R: CommandRunner + ?Sized>(runner: &R) -> Result<Vec<InterfaceInfo>> {
    let output = runner.run("ip", &["-br", "addr"]).await?;
    let interfaces = parse_brief_addresses(&output);
    debug!(count = interfaces.len(), "interfaces detected");
    Ok(interfaces)
}

/// Whether the host has at least two non-loopback interfaces.
pub fn has_multiple_interfaces(interfaces: &[InterfaceInfo]) -> bool {
    interfaces.len() >= 2
}

/// Query the current IPv4 address (CIDR) of `interface`.
///
/// A failing query is treated the same as an interface without an address.
pub async fn current_ipv4<R: CommandRunner + ?Sized>(runner: &R, interface: &str) -> Option<String> {
    match runner
        .run("ip", &["-4", "addr", "show", "dev", interface])
        .await
    {
        Ok(output) => parse_inet_address(&output),
        Err(e) => {
            warn!(interface, error = %e, "could not query current address");
            None
        }
    }
}

/// Parse `ip -br addr` output.
///
/// Format: `enp0s3           UP             192.168.1.10/24 fe80::a00:27ff:fe4e:66a1/64`
fn parse_brief_addresses(output: &str) -> Vec<InterfaceInfo> {
    output
        .lines()
        .filter_map(|line| {
            let parts: Vec<&str> = line.split_whitespace().collect();
            let name = *parts.first()?;
            if name == LOOPBACK {
                return None;
            }

            // The first dotted token after the state column is the IPv4 address.
            let ipv4_address = parts
                .iter()
                .skip(2)
                .find(|p| p.contains('.'))
                .map(|p| p.to_string());

            Some(InterfaceInfo {
                name: name.to_string(),
                ipv4_address,
            })
        })
        .collect()
}

/// Parse `ip -4 addr show dev X` output for the first `inet` address.
fn parse_inet_address(output: &str) -> Option<String> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| line.starts_with("inet "))
        .find_map(|line| line.split_whitespace().nth(1))
        .map(str::to_string)
}
