//! nftables ruleset management via the `nft` utility.

use std::path::Path;

use tracing::info;

use crate::error::{AdminError, Result};
use crate::system::CommandRunner;

/// Fail with `RulesFileNotFound` unless `rules` names a regular file.
pub fn ensure_rules_file(rules: &Path) -> Result<()> {
    if rules.is_file() {
        Ok(())
    } else {
        Err(AdminError::RulesFileNotFound(rules.to_path_buf()))
    }
}

/// Loads and inspects nftables rulesets.
pub struct Firewall<'a, R: CommandRunner + ?Sized> {
    runner: &'a R,
}

impl<'a, R: CommandRunner + ?Sized> Firewall<'a, R> {
    pub fn new(runner: &'a R) -> Self {
        Self { runner }
    }

    /// Parse and evaluate a rules file without committing it (`nft -c -f`).
    pub async fn check(&self, rules: &Path) -> Result<()> {
        let rules = rules.to_string_lossy().into_owned();
        self.runner.run("nft", &["-c", "-f", rules.as_str()]).await?;
        Ok(())
    }

    /// Load a rules file into the kernel (`nft -f`).
    pub async fn apply(&self, rules: &Path) -> Result<()> {
        let rules = rules.to_string_lossy().into_owned();
        self.runner.run("nft", &["-f", rules.as_str()]).await?;
        info!(rules = %rules, "nftables rules applied");
        Ok(())
    }

    /// The active ruleset as printed by `nft list ruleset`.
    pub async fn list_ruleset(&self) -> Result<String> {
        self.runner.run("nft", &["list", "ruleset"]).await
    }
}
