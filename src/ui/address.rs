//! IPv4 address negotiation: DHCP or static, keep or replace.
//!
//! Validation here is intentionally shallow. An address only has to look like
//! CIDR (`.` and `/` present); `netplan generate` rejects anything worse.

use crate::error::Result;
use crate::system::{AddressDecision, StaticAddress};
use crate::ui::prompt::{ask_yes_no, Prompt};

/// Walk the user through choosing the interface's IPv4 configuration.
///
/// `current` is the address the interface holds right now, if any.
pub async fn negotiate_address<P: Prompt + ?Sized>(
    prompt: &mut P,
    current: Option<&str>,
) -> Result<AddressDecision> {
    if ask_yes_no(prompt, "Use DHCP for this interface?").await? {
        return Ok(AddressDecision::Dhcp);
    }

    let mut address = StaticAddress::new(ask_ip_address(prompt, current).await?);
    address.gateway = ask_gateway(prompt).await?;
    address.nameservers = ask_nameservers(prompt).await?;

    Ok(AddressDecision::Static(address))
}

/// Offer to keep `current`, otherwise read a new CIDR address.
pub async fn ask_ip_address<P: Prompt + ?Sized>(
    prompt: &mut P,
    current: Option<&str>,
) -> Result<String> {
    if let Some(current) = current {
        println!("Current IPv4 on this interface: {}", current);
        if ask_yes_no(prompt, "Do you want to keep this IP?").await? {
            return Ok(current.to_string());
        }
    }

    loop {
        let new_ip = prompt
            .ask("Enter new IPv4 address with CIDR (e.g. 192.168.1.50/24): ")
            .await?;
        if looks_like_cidr(&new_ip) {
            return Ok(new_ip);
        }
        println!("Please enter a valid IP with CIDR, for example 192.168.1.50/24.");
    }
}

async fn ask_gateway<P: Prompt + ?Sized>(prompt: &mut P) -> Result<Option<String>> {
    loop {
        let gateway = prompt
            .ask("Default gateway (e.g. 192.168.1.1, blank to skip): ")
            .await?;
        if gateway.is_empty() {
            return Ok(None);
        }
        if looks_like_host(&gateway) {
            return Ok(Some(gateway));
        }
        println!("Please enter a plain IPv4 address without a prefix, for example 192.168.1.1.");
    }
}

async fn ask_nameservers<P: Prompt + ?Sized>(prompt: &mut P) -> Result<Vec<String>> {
    loop {
        let answer = prompt
            .ask("DNS servers, comma separated (e.g. 1.1.1.1,8.8.8.8, blank to skip): ")
            .await?;
        let servers: Vec<String> = answer
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        if servers.iter().all(|s| looks_like_host(s)) {
            return Ok(servers);
        }
        println!("Please enter IPv4 addresses separated by commas.");
    }
}

fn looks_like_cidr(value: &str) -> bool {
    value.contains('.') && value.contains('/')
}

fn looks_like_host(value: &str) -> bool {
    value.contains('.') && !value.contains('/') && !value.contains(char::is_whitespace)
}
