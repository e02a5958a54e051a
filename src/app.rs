//! Top-level dispatch between network and firewall configuration.
//!
//! The concrete configurators are injected, so the dispatch logic runs
//! against fakes in tests.

use std::path::Path;

use async_trait::async_trait;
use clap::ValueEnum;

use crate::error::Result;
use crate::ui::menu::{read_menu_choice, render_main_menu, MenuItem};
use crate::ui::prompt::Prompt;

/// What to configure when a mode is given on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// Network interface configuration (netplan)
    Network,
    /// Firewall ruleset (nftables)
    Firewall,
    /// Network, then firewall
    Both,
}

impl Mode {
    fn includes_network(self) -> bool {
        matches!(self, Mode::Network | Mode::Both)
    }

    fn includes_firewall(self) -> bool {
        matches!(self, Mode::Firewall | Mode::Both)
    }
}

/// Capability: interactively configure a network interface.
#[async_trait]
pub trait NetworkConfigurator: Send {
    async fn configure_network(&mut self, prompt: &mut dyn Prompt) -> Result<()>;
}

/// Capability: apply a firewall ruleset, asking for the file when `rules` is `None`.
#[async_trait]
pub trait FirewallConfigurator: Send {
    async fn configure_firewall(
        &mut self,
        prompt: &mut dyn Prompt,
        rules: Option<&Path>,
    ) -> Result<()>;
}

/// Application state.
pub struct App<P, N, F> {
    prompt: P,
    network: N,
    firewall: F,
}

impl<P, N, F> App<P, N, F>
where
    P: Prompt,
    N: NetworkConfigurator,
    F: FirewallConfigurator,
{
    pub fn new(prompt: P, network: N, firewall: F) -> Self {
        Self {
            prompt,
            network,
            firewall,
        }
    }

    /// Run the requested mode, or the interactive menu when no mode was given.
    pub async fn run(&mut self, mode: Option<Mode>, rules: Option<&Path>) -> Result<()> {
        match mode {
            Some(mode) => self.run_mode(mode, rules).await,
            None => self.run_interactive(rules).await,
        }
    }

    async fn run_mode(&mut self, mode: Mode, rules: Option<&Path>) -> Result<()> {
        if mode.includes_network() {
            self.network.configure_network(&mut self.prompt).await?;
        }
        if mode.includes_firewall() {
            self.firewall
                .configure_firewall(&mut self.prompt, rules)
                .await?;
        }
        Ok(())
    }

    /// Show the menu until the user picks Exit.
    async fn run_interactive(&mut self, rules: Option<&Path>) -> Result<()> {
        loop {
            render_main_menu();
            let mode = match read_menu_choice(&mut self.prompt).await? {
                MenuItem::Network => Mode::Network,
                MenuItem::Firewall => Mode::Firewall,
                MenuItem::Both => Mode::Both,
                MenuItem::Exit => return Ok(()),
            };
            self.run_mode(mode, rules).await?;
        }
    }
}
