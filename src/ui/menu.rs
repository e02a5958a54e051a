//! Main menu for interactive mode.

use crate::error::Result;
use crate::ui::prompt::Prompt;
use crate::ui::theme::{styles, symbols};

/// Menu entries, numbered 1 to 4 on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuItem {
    Network,
    Firewall,
    Both,
    Exit,
}

impl MenuItem {
    pub const ALL: [MenuItem; 4] = [
        MenuItem::Network,
        MenuItem::Firewall,
        MenuItem::Both,
        MenuItem::Exit,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            MenuItem::Network => "Network configuration (netplan)",
            MenuItem::Firewall => "Firewall (nftables)",
            MenuItem::Both => "Both (Network then Firewall)",
            MenuItem::Exit => "Exit",
        }
    }

    fn from_choice(choice: &str) -> Option<Self> {
        match choice {
            "1" => Some(MenuItem::Network),
            "2" => Some(MenuItem::Firewall),
            "3" => Some(MenuItem::Both),
            "4" => Some(MenuItem::Exit),
            _ => None,
        }
    }
}

/// Print the menu.
pub fn render_main_menu() {
    println!(
        "\n{}\n",
        styles::header(&format!("{} Admin Helper: Network + Firewall", symbols::APP_ICON))
    );
    println!("What do you want to configure?");
    for (i, item) in MenuItem::ALL.iter().enumerate() {
        println!("  {}) {}", i + 1, item.label());
    }
    println!();
}

/// Read a menu choice, re-prompting until it is one of 1-4.
pub async fn read_menu_choice<P: Prompt + ?Sized>(prompt: &mut P) -> Result<MenuItem> {
    loop {
        let choice = prompt.ask("Enter your choice (1/2/3/4): ").await?;
        match MenuItem::from_choice(&choice) {
            Some(item) => return Ok(item),
            None => println!("Invalid choice, please enter 1, 2, 3, or 4."),
        }
    }
}
