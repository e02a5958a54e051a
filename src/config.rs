//! User preferences persistence.
//!
//! Saves/loads a small JSON config to `~/.config/adminhelper/config.json`.
//! Failures are logged at debug level and otherwise ignored; every field has a default.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::system::netplan::{DEFAULT_NETPLAN_FILE, DEFAULT_RENDERER};

/// Persisted user preferences.
///
/// Every field has a serde default so that adding new fields later
/// doesn't break old config files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Netplan file written for network configuration.
    #[serde(default = "default_netplan_file")]
    pub netplan_file: PathBuf,

    /// Netplan backend (`networkd` or `NetworkManager`).
    #[serde(default = "default_renderer")]
    pub netplan_renderer: String,

    /// Rules file applied most recently, offered as the default next time.
    #[serde(default)]
    pub last_rules_path: Option<PathBuf>,
}

fn default_netplan_file() -> PathBuf {
    PathBuf::from(DEFAULT_NETPLAN_FILE)
}

fn default_renderer() -> String {
    DEFAULT_RENDERER.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            netplan_file: default_netplan_file(),
            netplan_renderer: default_renderer(),
            last_rules_path: None,
        }
    }
}

impl Config {
    /// Config file path: `~/.config/adminhelper/config.json`.
    ///
    /// Returns `None` if the home/config directory can't be determined.
    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("adminhelper").join("config.json"))
    }

    /// Load config from `path`, falling back to defaults on any error.
    pub fn load_from(path: &Path) -> Self {
        let Ok(contents) = fs::read_to_string(path) else {
            debug!(path = %path.display(), "no config file, using defaults");
            return Self::default();
        };

        serde_json::from_str(&contents).unwrap_or_else(|e| {
            debug!(path = %path.display(), error = %e, "invalid config file, using defaults");
            Self::default()
        })
    }

    /// Save config to `path`. Creates parent directories if needed.
    /// Never panics; this is best-effort.
    pub fn save_to(&self, path: &Path) {
        if let Some(parent) = path.parent() {
            let _ = fs::create_dir_all(parent);
        }

        let Ok(json) = serde_json::to_string_pretty(self) else {
            return;
        };

        if let Err(e) = fs::write(path, json) {
            debug!(path = %path.display(), error = %e, "could not save config");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_config(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("adminhelper-config-{}-{}", std::process::id(), name))
            .join("config.json")
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let config = Config::load_from(Path::new("/nonexistent/adminhelper/config.json"));
        assert_eq!(config, Config::default());
        assert_eq!(config.netplan_file, PathBuf::from("/etc/netplan/99-adminhelper.yaml"));
        assert_eq!(config.netplan_renderer, "networkd");
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let path = temp_config("partial");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, r#"{"last_rules_path": "/etc/nftables.conf"}"#).unwrap();

        let config = Config::load_from(&path);
        assert_eq!(config.last_rules_path, Some(PathBuf::from("/etc/nftables.conf")));
        assert_eq!(config.netplan_renderer, "networkd");

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_garbage_file_gives_defaults() {
        let path = temp_config("garbage");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "not json").unwrap();

        assert_eq!(Config::load_from(&path), Config::default());

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_save_then_load() {
        let path = temp_config("save");
        let config = Config {
            netplan_renderer: "NetworkManager".into(),
            last_rules_path: Some(PathBuf::from("/root/rules.nft")),
            ..Config::default()
        };

        config.save_to(&path);
        assert_eq!(Config::load_from(&path), config);

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }
}
