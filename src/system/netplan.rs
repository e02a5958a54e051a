//! Netplan document rendering and application.
//!
//! The generated file only describes the one interface being configured.
//! Netplan merges it with the other files under `/etc/netplan/`, and files
//! sorting later win, hence the `99-` prefix on the default path.

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::{AdminError, Result};
use crate::system::CommandRunner;

/// Default location of the generated netplan file.
pub const DEFAULT_NETPLAN_FILE: &str = "/etc/netplan/99-adminhelper.yaml";

/// Default netplan backend.
pub const DEFAULT_RENDERER: &str = "networkd";

/// Desired IPv4 configuration for an interface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddressDecision {
    Dhcp,
    Static(StaticAddress),
}

/// A static IPv4 assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticAddress {
    /// Address in CIDR form, e.g. `192.168.1.50/24`.
    pub address: String,
    pub gateway: Option<String>,
    pub nameservers: Vec<String>,
}

impl StaticAddress {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            gateway: None,
            nameservers: Vec::new(),
        }
    }
}

#[derive(Serialize)]
struct NetplanDocument<'a> {
    network: NetworkSection<'a>,
}

#[derive(Serialize)]
struct NetworkSection<'a> {
    version: u8,
    renderer: &'a str,
    ethernets: BTreeMap<&'a str, EthernetSection<'a>>,
}

#[derive(Serialize)]
struct EthernetSection<'a> {
    dhcp4: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    addresses: Vec<&'a str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    routes: Vec<RouteSection<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    nameservers: Option<NameserverSection<'a>>,
}

#[derive(Serialize)]
struct RouteSection<'a> {
    to: &'a str,
    via: &'a str,
}

#[derive(Serialize)]
struct NameserverSection<'a> {
    addresses: Vec<&'a str>,
}

/// Render the netplan YAML for a single interface.
pub fn render(interface: &str, decision: &AddressDecision, renderer: &str) -> Result<String> {
    let ethernet = match decision {
        AddressDecision::Dhcp => EthernetSection {
            dhcp4: true,
            addresses: Vec::new(),
            routes: Vec::new(),
            nameservers: None,
        },
        AddressDecision::Static(addr) => EthernetSection {
            dhcp4: false,
            addresses: vec![addr.address.as_str()],
            routes: addr
                .gateway
                .as_deref()
                .map(|via| RouteSection { to: "default", via })
                .into_iter()
                .collect(),
            nameservers: (!addr.nameservers.is_empty()).then(|| NameserverSection {
                addresses: addr.nameservers.iter().map(String::as_str).collect(),
            }),
        },
    };

    let document = NetplanDocument {
        network: NetworkSection {
            version: 2,
            renderer,
            ethernets: BTreeMap::from([(interface, ethernet)]),
        },
    };

    serde_yaml::to_string(&document).map_err(|e| AdminError::Render(e.to_string()))
}

/// The netplan file this tool owns.
#[derive(Debug, Clone)]
pub struct NetplanFile {
    path: PathBuf,
}

impl NetplanFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write `contents`, first copying any existing file to a timestamped backup.
    ///
    /// The new contents land in a sibling temp file that is renamed over the
    /// target, so a failed write leaves the previous file untouched.
    /// Returns the backup path when there was something to back up.
    pub fn write(&self, contents: &str) -> Result<Option<PathBuf>> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let backup = if self.path.exists() {
            let backup = self.backup_path();
            fs::copy(&self.path, &backup)?;
            debug!(backup = %backup.display(), "backed up netplan file");
            Some(backup)
        } else {
            None
        };

        let tmp = self.temp_path();
        if let Err(e) = write_private(&tmp, contents).and_then(|()| fs::rename(&tmp, &self.path)) {
            let _ = fs::remove_file(&tmp);
            if let Some(backup) = &backup {
                let _ = fs::remove_file(backup);
            }
            return Err(e.into());
        }
        info!(path = %self.path.display(), "wrote netplan file");

        Ok(backup)
    }

    /// Undo a `write`: put the backup back, or remove the file if there was none.
    pub fn restore(&self, backup: Option<&Path>) -> Result<()> {
        match backup {
            Some(backup) => {
                fs::rename(backup, &self.path)?;
                info!(path = %self.path.display(), "restored previous netplan file");
            }
            None => {
                fs::remove_file(&self.path)?;
                info!(path = %self.path.display(), "removed generated netplan file");
            }
        }
        Ok(())
    }

    /// Delete every backup of this file except `keep`.
    ///
    /// Returns how many backups were removed.
    pub fn prune_backups(&self, keep: Option<&Path>) -> Result<usize> {
        let (Some(dir), Some(name)) = (self.path.parent(), self.path.file_name()) else {
            return Ok(0);
        };
        let prefix = format!("{}.bak-", name.to_string_lossy());

        let mut removed = 0;
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            let is_backup = path
                .file_name()
                .is_some_and(|n| n.to_string_lossy().starts_with(&prefix));
            if !is_backup || Some(path.as_path()) == keep {
                continue;
            }
            match fs::remove_file(&path) {
                Ok(()) => removed += 1,
                Err(e) => warn!(path = %path.display(), error = %e, "could not remove old backup"),
            }
        }
        Ok(removed)
    }

    fn backup_path(&self) -> PathBuf {
        let stamp = chrono::Local::now().format("%Y%m%d-%H%M%S");
        let mut name = self.path.as_os_str().to_os_string();
        name.push(format!(".bak-{}", stamp));
        PathBuf::from(name)
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = OsString::from(".");
        name.push(self.path.file_name().unwrap_or_default());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

// netplan warns about world-readable configuration files
fn write_private(path: &Path, contents: &str) -> io::Result<()> {
    let mut file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    file.set_permissions(fs::Permissions::from_mode(0o600))?;
    file.write_all(contents.as_bytes())?;
    file.sync_all()
}

/// Validate all netplan files by generating backend configuration.
pub async fn generate<R: CommandRunner + ?Sized>(runner: &R) -> Result<()> {
    runner.run("netplan", &["generate"]).await.map(|_| ())
}

/// Apply the netplan configuration to the running system.
pub async fn apply<R: CommandRunner + ?Sized>(runner: &R) -> Result<()> {
    runner.run("netplan", &["apply"]).await.map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::command::fake::FakeRunner;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("adminhelper-test-{}-{}", std::process::id(), name))
            .join("99-adminhelper.yaml")
    }

    #[test]
    fn test_render_dhcp() {
        let yaml = render("enp0s3", &AddressDecision::Dhcp, "networkd").unwrap();
        let value: serde_yaml::Value = serde_yaml::from_str(&yaml).unwrap();

        assert_eq!(value["network"]["version"].as_u64(), Some(2));
        assert_eq!(value["network"]["renderer"].as_str(), Some("networkd"));
        let eth = &value["network"]["ethernets"]["enp0s3"];
        assert_eq!(eth["dhcp4"].as_bool(), Some(true));
        assert!(eth.get("addresses").is_none());
    }

    #[test]
    fn test_render_static_with_gateway_and_dns() {
        let decision = AddressDecision::Static(StaticAddress {
            address: "192.168.1.50/24".into(),
            gateway: Some("192.168.1.1".into()),
            nameservers: vec!["1.1.1.1".into(), "8.8.8.8".into()],
        });
        let yaml = render("enp0s3", &decision, "NetworkManager").unwrap();
        let value: serde_yaml::Value = serde_yaml::from_str(&yaml).unwrap();
        let eth = &value["network"]["ethernets"]["enp0s3"];

        assert_eq!(eth["dhcp4"].as_bool(), Some(false));
        assert_eq!(eth["addresses"][0].as_str(), Some("192.168.1.50/24"));
        assert_eq!(eth["routes"][0]["to"].as_str(), Some("default"));
        assert_eq!(eth["routes"][0]["via"].as_str(), Some("192.168.1.1"));
        assert_eq!(eth["nameservers"]["addresses"][1].as_str(), Some("8.8.8.8"));
    }

    #[test]
    fn test_render_static_address_only() {
        let decision = AddressDecision::Static(StaticAddress::new("10.0.0.5/24"));
        let yaml = render("eth0", &decision, DEFAULT_RENDERER).unwrap();
        assert!(yaml.contains("10.0.0.5/24"));
        assert!(!yaml.contains("routes"));
        assert!(!yaml.contains("nameservers"));
    }

    #[test]
    fn test_write_backs_up_and_restores() {
        let file = NetplanFile::new(temp_path("restore"));
        let _ = fs::remove_dir_all(file.path().parent().unwrap());

        assert_eq!(file.write("first").unwrap(), None);
        let mode = fs::metadata(file.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);

        let backup = file.write("second").unwrap().expect("backup created");
        assert_eq!(fs::read_to_string(&backup).unwrap(), "first");
        assert_eq!(fs::read_to_string(file.path()).unwrap(), "second");

        file.restore(Some(&backup)).unwrap();
        assert_eq!(fs::read_to_string(file.path()).unwrap(), "first");
        assert!(!backup.exists());

        file.restore(None).unwrap();
        assert!(!file.path().exists());

        let _ = fs::remove_dir_all(file.path().parent().unwrap());
    }

    #[test]
    fn test_failed_write_keeps_previous_file() {
        let file = NetplanFile::new(temp_path("failed-write"));
        let dir = file.path().parent().unwrap().to_path_buf();
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        fs::write(file.path(), "OLD").unwrap();
        // a directory where the temp file should go makes the write fail
        fs::create_dir(file.temp_path()).unwrap();

        assert!(matches!(file.write("NEW"), Err(AdminError::Io(_))));

        assert_eq!(fs::read_to_string(file.path()).unwrap(), "OLD");
        let names: Vec<_> = fs::read_dir(&dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert!(!names.iter().any(|n| n.contains(".bak-")), "{:?}", names);

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_prune_backups_keeps_latest() {
        let file = NetplanFile::new(temp_path("prune"));
        let dir = file.path().parent().unwrap().to_path_buf();
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        let old = dir.join("99-adminhelper.yaml.bak-20200101-000000");
        let latest = dir.join("99-adminhelper.yaml.bak-20260101-000000");
        let unrelated = dir.join("01-other.yaml.bak-20200101-000000");
        for path in [&old, &latest, &unrelated] {
            fs::write(path, "x").unwrap();
        }

        assert_eq!(file.prune_backups(Some(&latest)).unwrap(), 1);
        assert!(!old.exists());
        assert!(latest.exists());
        assert!(unrelated.exists());

        let _ = fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn test_generate_and_apply_commands() {
        let runner = FakeRunner::new()
            .ok("netplan generate", "")
            .ok("netplan apply", "");
        generate(&runner).await.unwrap();
        apply(&runner).await.unwrap();
        assert_eq!(runner.calls(), vec!["netplan generate", "netplan apply"]);
    }
}
