//! Interactive network configuration: list, select, negotiate, render, apply.

use std::path::Path;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::app::NetworkConfigurator;
use crate::error::{AdminError, Result};
use crate::health::{check_interface, HealthStatus};
use crate::system::{
    current_ipv4, has_multiple_interfaces, list_interfaces, netplan, CommandRunner,
    InterfaceInfo, NetplanFile,
};
use crate::ui::address::negotiate_address;
use crate::ui::interface_select::{choose_interface, print_interfaces};
use crate::ui::prompt::{ask_yes_no, confirm, Prompt};
use crate::ui::theme::styles;

/// Configures one interface through a netplan file.
pub struct NetplanSetup<R> {
    runner: R,
    file: NetplanFile,
    renderer: String,
}

impl<R: CommandRunner> NetplanSetup<R> {
    pub fn new(runner: R, file: NetplanFile, renderer: impl Into<String>) -> Self {
        Self {
            runner,
            file,
            renderer: renderer.into(),
        }
    }

    /// List interfaces, offering a retry when the listing command fails.
    ///
    /// `None` means the user gave up.
    async fn discover(&self, prompt: &mut dyn Prompt) -> Result<Option<Vec<InterfaceInfo>>> {
        loop {
            match list_interfaces(&self.runner).await {
                Ok(interfaces) => return Ok(Some(interfaces)),
                Err(e) => {
                    warn!(error = %e, "interface listing failed");
                    println!("{}", styles::error(&format!("Could not list interfaces: {}", e)));
                    if !ask_yes_no(prompt, "Retry?").await? {
                        return Ok(None);
                    }
                }
            }
        }
    }

    /// Write, validate, and apply the rendered file.
    ///
    /// Returns false when the configuration was rolled back or not applied.
    async fn write_and_apply(&self, yaml: &str) -> Result<bool> {
        let backup = match self.file.write(yaml) {
            Ok(backup) => backup,
            Err(e) => {
                println!(
                    "{}",
                    styles::error(&format!(
                        "Could not write {}: {}",
                        self.file.path().display(),
                        e
                    ))
                );
                return Ok(false);
            }
        };

        if let Err(e) = netplan::generate(&self.runner).await {
            println!("{}", styles::error(&format!("netplan rejected the configuration: {}", e)));
            self.roll_back(backup.as_deref());
            return Ok(false);
        }

        println!("\nApplying netplan configuration...\n");
        if let Err(e) = netplan::apply(&self.runner).await {
            println!("{}", styles::error(&format!("Error applying netplan: {}", e)));
            self.roll_back(backup.as_deref());
            return Ok(false);
        }

        println!("{}", styles::success("Netplan configuration applied."));
        if let Err(e) = self.file.prune_backups(backup.as_deref()) {
            warn!(error = %e, "could not prune old netplan backups");
        }
        if let Some(backup) = backup {
            println!(
                "{}",
                styles::hint(&format!("Previous file saved as {}", backup.display()))
            );
        }
        Ok(true)
    }

    /// Put the previous netplan file back after a failed generate or apply.
    fn roll_back(&self, backup: Option<&Path>) {
        match self.file.restore(backup) {
            Ok(()) => println!("Previous netplan configuration restored."),
            Err(e) => println!(
                "{}",
                styles::error(&format!("Could not restore previous configuration: {}", e))
            ),
        }
    }
}

#[async_trait]
impl<R: CommandRunner> NetworkConfigurator for NetplanSetup<R> {
    async fn configure_network(&mut self, prompt: &mut dyn Prompt) -> Result<()> {
        println!("\n{}\n", styles::header("Network (netplan) Configuration"));

        let Some(interfaces) = self.discover(prompt).await? else {
            println!("Aborting network configuration.");
            return Ok(());
        };

        print_interfaces(&interfaces);
        if !interfaces.is_empty() && !has_multiple_interfaces(&interfaces) {
            println!(
                "{}",
                styles::warning(
                    "This is the only network interface; a wrong setting can cut off remote access."
                )
            );
        }

        let interface = match choose_interface(prompt, &interfaces).await {
            Ok(name) => name,
            Err(AdminError::NoInterfaces) => {
                println!("No interfaces to choose from. Aborting network configuration.");
                return Ok(());
            }
            Err(e) => return Err(e),
        };

        let current = current_ipv4(&self.runner, &interface).await;
        let decision = negotiate_address(prompt, current.as_deref()).await?;
        let yaml = netplan::render(&interface, &decision, &self.renderer)?;

        let path = self.file.path().to_path_buf();
        println!("\nNetplan configuration for {}:\n", path.display());
        println!("{}", yaml);

        if !confirm(
            prompt,
            &format!("Write this to {} and run 'netplan apply'?", path.display()),
        )
        .await?
        {
            println!("Aborting network configuration by user choice.");
            return Ok(());
        }

        if !self.write_and_apply(&yaml).await? {
            return Ok(());
        }
        info!(interface = %interface, ?decision, "network configured");

        match check_interface(&self.runner, &interface, &decision).await {
            HealthStatus::Healthy => println!(
                "{}",
                styles::success(&format!("{} is configured as requested.", interface))
            ),
            HealthStatus::Degraded(msg) => println!("{}", styles::warning(&msg)),
            HealthStatus::Down(msg) => println!("{}", styles::error(&msg)),
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::system::command::fake::FakeRunner;
    use crate::ui::prompt::scripted::ScriptedPrompt;

    const LIST: &str = "ip -br addr";
    const SHOW: &str = "ip -4 addr show dev enp0s3";
    const LISTING: &str = "lo UNKNOWN 127.0.0.1/8\nenp0s3 UP 192.168.1.10/24\nenp0s8 DOWN";

    fn netplan_file(name: &str) -> NetplanFile {
        let dir = std::env::temp_dir().join(format!(
            "adminhelper-setup-{}-{}",
            std::process::id(),
            name
        ));
        let _ = fs::remove_dir_all(&dir);
        NetplanFile::new(dir.join("99-adminhelper.yaml"))
    }

    fn cleanup(file: &NetplanFile) {
        let _ = fs::remove_dir_all(file.path().parent().unwrap());
    }

    #[tokio::test]
    async fn test_static_keep_current_applies() {
        let runner = FakeRunner::new()
            .ok(LIST, LISTING)
            .ok(SHOW, "    inet 192.168.1.10/24 brd 192.168.1.255 scope global enp0s3")
            .ok("netplan generate", "")
            .ok("netplan apply", "");
        let file = netplan_file("keep");
        let mut setup = NetplanSetup::new(runner, file.clone(), "networkd");
        // adapter 1, no DHCP, keep address, no gateway, no DNS, confirm
        let mut prompt = ScriptedPrompt::new(&["1", "n", "y", "", "", "y"]);

        setup.configure_network(&mut prompt).await.unwrap();

        let written = fs::read_to_string(file.path()).unwrap();
        assert!(written.contains("enp0s3"));
        assert!(written.contains("192.168.1.10/24"));
        assert!(written.contains("dhcp4: false"));
        assert_eq!(
            setup.runner.calls(),
            vec![LIST, SHOW, "netplan generate", "netplan apply", SHOW]
        );
        cleanup(&file);
    }

    #[tokio::test]
    async fn test_declined_confirmation_writes_nothing() {
        let runner = FakeRunner::new().ok(LIST, LISTING).ok("ip -4 addr show dev enp0s8", "");
        let file = netplan_file("decline");
        let mut setup = NetplanSetup::new(runner, file.clone(), "networkd");
        let mut prompt = ScriptedPrompt::new(&["2", "y", "n"]);

        setup.configure_network(&mut prompt).await.unwrap();

        assert!(!file.path().exists());
        assert!(!setup.runner.calls().iter().any(|c| c.starts_with("netplan")));
    }

    #[tokio::test]
    async fn test_rejected_config_is_rolled_back() {
        let runner = FakeRunner::new()
            .ok(LIST, LISTING)
            .ok(SHOW, "")
            .fail("netplan generate", "Invalid YAML");
        let file = netplan_file("rollback");
        let mut setup = NetplanSetup::new(runner, file.clone(), "networkd");
        let mut prompt = ScriptedPrompt::new(&["1", "n", "10.0.0.5/24", "", "", "y"]);

        setup.configure_network(&mut prompt).await.unwrap();

        assert!(!file.path().exists());
        assert!(!setup.runner.calls().contains(&"netplan apply".to_string()));
        cleanup(&file);
    }

    #[tokio::test]
    async fn test_failed_apply_restores_previous_file() {
        let runner = FakeRunner::new()
            .ok(LIST, LISTING)
            .ok(SHOW, "")
            .ok("netplan generate", "")
            .fail("netplan apply", "Failed to apply");
        let file = netplan_file("apply-fails");
        fs::create_dir_all(file.path().parent().unwrap()).unwrap();
        fs::write(file.path(), "OLD").unwrap();
        let mut setup = NetplanSetup::new(runner, file.clone(), "networkd");
        let mut prompt = ScriptedPrompt::new(&["1", "n", "10.0.0.5/24", "", "", "y"]);

        setup.configure_network(&mut prompt).await.unwrap();

        assert_eq!(fs::read_to_string(file.path()).unwrap(), "OLD");
        let entries: Vec<_> = fs::read_dir(file.path().parent().unwrap())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(entries, vec!["99-adminhelper.yaml"]);
        assert_eq!(
            setup.runner.calls(),
            vec![LIST, SHOW, "netplan generate", "netplan apply"]
        );
        cleanup(&file);
    }

    #[tokio::test]
    async fn test_successful_apply_prunes_older_backups() {
        let runner = FakeRunner::new()
            .ok(LIST, LISTING)
            .ok(SHOW, "")
            .ok("netplan generate", "")
            .ok("netplan apply", "");
        let file = netplan_file("prune");
        let dir = file.path().parent().unwrap().to_path_buf();
        fs::create_dir_all(&dir).unwrap();
        fs::write(file.path(), "OLD").unwrap();
        let stale = dir.join("99-adminhelper.yaml.bak-20200101-000000");
        fs::write(&stale, "OLDER").unwrap();
        let mut setup = NetplanSetup::new(runner, file.clone(), "networkd");
        let mut prompt = ScriptedPrompt::new(&["1", "n", "10.0.0.5/24", "", "", "y"]);

        setup.configure_network(&mut prompt).await.unwrap();

        assert!(!stale.exists());
        let backups: Vec<_> = fs::read_dir(&dir)
            .unwrap()
            .map(|e| e.unwrap().path())
            .filter(|p| p.to_string_lossy().contains(".bak-"))
            .collect();
        assert_eq!(backups.len(), 1);
        assert_eq!(fs::read_to_string(&backups[0]).unwrap(), "OLD");
        cleanup(&file);
    }

    #[tokio::test]
    async fn test_listing_failure_can_be_abandoned() {
        let runner = FakeRunner::new().fail(LIST, "exit status: 1");
        let mut setup = NetplanSetup::new(runner, netplan_file("abandon"), "networkd");
        let mut prompt = ScriptedPrompt::new(&["y", "n"]);

        setup.configure_network(&mut prompt).await.unwrap();

        assert_eq!(setup.runner.calls(), vec![LIST, LIST]);
        assert_eq!(prompt.remaining(), 0);
    }

    #[tokio::test]
    async fn test_no_interfaces_aborts_gracefully() {
        let runner = FakeRunner::new().ok(LIST, "lo UNKNOWN 127.0.0.1/8");
        let mut setup = NetplanSetup::new(runner, netplan_file("empty"), "networkd");
        let mut prompt = ScriptedPrompt::new(&[]);

        setup.configure_network(&mut prompt).await.unwrap();
        assert_eq!(setup.runner.calls(), vec![LIST]);
    }
}
