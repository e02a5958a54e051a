//! adminhelper - network and firewall admin helper for Linux
//!
//! Lists interfaces and writes a netplan file for the one the user picks,
//! and applies nftables rulesets with `nft -f`.

mod app;
mod cli;
mod config;
mod error;
mod health;
mod setup;
mod system;
mod ui;

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use app::App;
use cli::Cli;
use config::Config;
use setup::{NetplanSetup, NftSetup};
use system::{NetplanFile, SystemRunner};
use ui::prompt::Console;
use ui::theme::styles;

/// Exit status for failures, including a missing root privilege.
const EXIT_FAILURE: u8 = 1;

/// Exit status after Ctrl-C, following the shell's 128 + SIGINT convention.
const EXIT_INTERRUPTED: u8 = 130;

/// How a run ended when it did not fail.
enum Outcome {
    Completed,
    Interrupted,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // Check for root privileges
    if !is_root() {
        print_root_required();
        return ExitCode::from(EXIT_FAILURE);
    }

    let result = run(cli);
    match &result {
        Ok(Outcome::Completed) => {}
        Ok(Outcome::Interrupted) => eprintln!("\nInterrupted."),
        Err(e) => eprintln!("{}", styles::error(&format!("Error: {:#}", e))),
    }
    ExitCode::from(exit_status(&result))
}

fn exit_status(result: &Result<Outcome>) -> u8 {
    match result {
        Ok(Outcome::Completed) => 0,
        Ok(Outcome::Interrupted) => EXIT_INTERRUPTED,
        Err(_) => EXIT_FAILURE,
    }
}

fn is_root() -> bool {
    unsafe { libc::geteuid() == 0 }
}

fn print_root_required() {
    eprintln!("\n{}", styles::rule(60));
    eprintln!(
        "{}",
        styles::error("This program must be run with root privileges")
    );
    eprintln!("{}", styles::rule(60));
    eprintln!("\nUsage:");
    eprintln!("  sudo adminhelper");
    eprintln!("  sudo adminhelper --mode network");
    eprintln!("  sudo adminhelper --mode firewall --rules rules.nft");
    eprintln!("\n{}\n", styles::rule(60));
}

/// Log to stderr so diagnostics never interleave with prompts on stdout.
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("adminhelper=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<Outcome> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    let outcome = runtime.block_on(run_app(cli));

    // A pending stdin read keeps a blocking thread alive; don't wait for it.
    runtime.shutdown_background();

    outcome
}

async fn run_app(cli: Cli) -> Result<Outcome> {
    let config_path = cli.config.clone().or_else(Config::path);
    let config = config_path
        .as_deref()
        .map(Config::load_from)
        .unwrap_or_default();

    let network = NetplanSetup::new(
        SystemRunner,
        NetplanFile::new(config.netplan_file.clone()),
        config.netplan_renderer.clone(),
    );
    let firewall = NftSetup::new(SystemRunner, config, config_path);
    let mut app = App::new(Console::new(), network, firewall);

    tokio::select! {
        result = app.run(cli.mode, cli.rules.as_deref()) => {
            result.context("Configuration did not complete")?;
            Ok(Outcome::Completed)
        }
        signal = tokio::signal::ctrl_c() => {
            signal.context("Failed to listen for Ctrl-C")?;
            Ok(Outcome::Interrupted)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_status() {
        assert_eq!(exit_status(&Ok(Outcome::Completed)), 0);
        assert_eq!(exit_status(&Ok(Outcome::Interrupted)), 130);
        assert_eq!(
            exit_status(&Err(anyhow::anyhow!("netplan apply failed"))),
            1
        );
    }
}
