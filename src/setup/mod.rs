//! Concrete network and firewall configurators wired to the real system.

pub mod firewall;
pub mod network;

pub use firewall::NftSetup;
pub use network::NetplanSetup;
