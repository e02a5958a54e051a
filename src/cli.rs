//! Command-line arguments.

use std::path::PathBuf;

use clap::Parser;

use crate::app::Mode;

#[derive(Parser, Debug)]
#[command(name = "adminhelper", version)]
#[command(about = "Network + firewall admin helper: netplan interface setup and nftables rulesets")]
pub struct Cli {
    /// What to configure: network, firewall, or both (network then firewall).
    /// If omitted, an interactive menu is shown.
    #[arg(long, value_enum)]
    pub mode: Option<Mode>,

    /// Path to nftables rules file (used when mode=firewall or mode=both).
    /// If omitted, the path is asked interactively.
    #[arg(long, value_name = "PATH")]
    pub rules: Option<PathBuf>,

    /// Config file to use instead of ~/.config/adminhelper/config.json
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long)]
    pub verbose: bool,
}
