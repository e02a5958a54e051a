//! Interactive firewall configuration: pick a rules file, check it, apply it.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::warn;

use crate::app::FirewallConfigurator;
use crate::config::Config;
use crate::error::{AdminError, Result};
use crate::system::firewall::ensure_rules_file;
use crate::system::{CommandRunner, Firewall};
use crate::ui::prompt::{confirm, Prompt};
use crate::ui::theme::styles;

/// Applies nftables rules files and remembers the last one used.
pub struct NftSetup<R> {
    runner: R,
    config: Config,
    /// Where to persist `config`; `None` keeps it in memory only.
    config_path: Option<PathBuf>,
}

impl<R: CommandRunner> NftSetup<R> {
    pub fn new(runner: R, config: Config, config_path: Option<PathBuf>) -> Self {
        Self {
            runner,
            config,
            config_path,
        }
    }

    /// Ask for a rules path; blank input takes the last path used, if any.
    async fn ask_rules_path(&self, prompt: &mut dyn Prompt) -> Result<PathBuf> {
        let last = self.config.last_rules_path.as_deref();
        let question = match last {
            Some(last) => format!(
                "Enter full path to nftables rules file [{}]: ",
                last.display()
            ),
            None => "Enter full path to nftables rules file (e.g. /home/admin/rules.nft): ".into(),
        };

        loop {
            let answer = prompt.ask(&question).await?;
            match (answer.is_empty(), last) {
                (false, _) => return Ok(PathBuf::from(answer)),
                (true, Some(last)) => return Ok(last.to_path_buf()),
                (true, None) => println!("Please enter a path."),
            }
        }
    }

    fn remember(&mut self, rules: &Path) {
        self.config.last_rules_path = Some(rules.to_path_buf());
        if let Some(path) = &self.config_path {
            self.config.save_to(path);
        }
    }
}

#[async_trait]
impl<R: CommandRunner> FirewallConfigurator for NftSetup<R> {
    async fn configure_firewall(
        &mut self,
        prompt: &mut dyn Prompt,
        rules: Option<&Path>,
    ) -> Result<()> {
        println!("\n{}\n", styles::header("Firewall (nftables) Configuration"));

        let rules = match rules {
            Some(rules) => {
                println!(
                    "Using nftables rules file path from CLI argument: {}",
                    rules.display()
                );
                rules.to_path_buf()
            }
            None => self.ask_rules_path(prompt).await?,
        };

        match ensure_rules_file(&rules) {
            Ok(()) => {}
            Err(AdminError::RulesFileNotFound(path)) => {
                println!(
                    "{}",
                    styles::error(&format!(
                        "File '{}' not found. Aborting firewall configuration.",
                        path.display()
                    ))
                );
                return Ok(());
            }
            Err(e) => return Err(e),
        }

        println!("\nYou entered rules file: {}", rules.display());
        let question = format!(
            "Do you want to apply nftables rules from this file using 'nft -f {}'?",
            rules.display()
        );
        if !confirm(prompt, &question).await? {
            println!("Aborting firewall configuration by user choice.");
            return Ok(());
        }

        let firewall = Firewall::new(&self.runner);
        if let Err(e) = firewall.check(&rules).await {
            println!(
                "{}",
                styles::error(&format!("Rules file failed the nft syntax check: {}", e))
            );
            return Ok(());
        }

        println!("\nApplying nftables rules from {}...\n", rules.display());
        if let Err(e) = firewall.apply(&rules).await {
            warn!(error = %e, "nft apply failed");
            println!(
                "{}",
                styles::error(&format!("Error applying nftables rules: {}", e))
            );
            return Ok(());
        }
        println!("{}", styles::success("nftables rules applied successfully."));
        self.remember(&rules);

        if confirm(prompt, "Do you want to display the current nftables ruleset?").await? {
            match Firewall::new(&self.runner).list_ruleset().await {
                Ok(ruleset) => {
                    println!("\n{}\n", styles::header("Current nftables ruleset"));
                    println!("{}", ruleset);
                }
                Err(e) => println!(
                    "{}",
                    styles::error(&format!("Error listing nftables ruleset: {}", e))
                ),
            }
        }

        Ok(())
    }
}
