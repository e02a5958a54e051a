//! Numbered interface listing and selection.

use crate::error::{AdminError, Result};
use crate::system::InterfaceInfo;
use crate::ui::prompt::Prompt;
use crate::ui::theme::styles;

/// Print the 1-based interface listing shown before selection.
pub fn print_interfaces(interfaces: &[InterfaceInfo]) {
    println!("Current network interfaces and IP addresses:\n");
    for line in format_listing(interfaces) {
        println!("{}", line);
    }
    if interfaces.is_empty() {
        println!("{}", styles::warning("No non-loopback interfaces found."));
    }
    println!();
}

fn format_listing(interfaces: &[InterfaceInfo]) -> Vec<String> {
    interfaces
        .iter()
        .enumerate()
        .map(|(i, iface)| format!("{}) {:<10}  {}", i + 1, iface.name, iface.address_display()))
        .collect()
}

/// Ask for an interface number until a valid one is entered.
///
/// Returns the chosen interface's name. Fails immediately when there is nothing to choose.
pub async fn choose_interface<P: Prompt + ?Sized>(
    prompt: &mut P,
    interfaces: &[InterfaceInfo],
) -> Result<String> {
    if interfaces.is_empty() {
        return Err(AdminError::NoInterfaces);
    }

    loop {
        let answer = prompt
            .ask("Enter the number of the adapter you want to configure: ")
            .await?;

        match parse_choice(&answer, interfaces.len()) {
            Choice::Valid(index) => return Ok(interfaces[index].name.clone()),
            Choice::NotANumber => println!("Please enter a valid number."),
            Choice::OutOfRange => println!("Number out of range, try again."),
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Choice {
    /// Zero-based index into the listing.
    Valid(usize),
    NotANumber,
    OutOfRange,
}

fn parse_choice(answer: &str, count: usize) -> Choice {
    if answer.is_empty() || !answer.chars().all(|c| c.is_ascii_digit()) {
        return Choice::NotANumber;
    }
    match answer.parse::<usize>() {
        Ok(n) if (1..=count).contains(&n) => Choice::Valid(n - 1),
        // digits-only input that overflows is simply too large
        _ => Choice::OutOfRange,
    }
}
