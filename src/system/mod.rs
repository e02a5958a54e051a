//! System interaction modules for interfaces, netplan, and nftables.

pub mod command;
pub mod firewall;
pub mod netplan;
pub mod network;

pub use command::{CommandRunner, SystemRunner};
pub use firewall::Firewall;
pub use netplan::{AddressDecision, NetplanFile, StaticAddress};
pub use network::{current_ipv4, has_multiple_interfaces, list_interfaces, InterfaceInfo};
