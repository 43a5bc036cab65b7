use crate::error::{VlanError, VlanResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_CONFIG_PATH: &str = "/etc/vlanwarden/config.yaml";
pub const DEFAULT_NETWORK_SCRIPTS_DIR: &str = "/etc/sysconfig/network-scripts";
pub const DEFAULT_IFCONFIG: &str = "/sbin/ifconfig";
pub const DEFAULT_BRCTL: &str = "/sbin/brctl";
pub const DEFAULT_IFUP: &str = "ifup";
pub const DEFAULT_IFDOWN: &str = "ifdown";
pub const DEFAULT_COMMAND_TIMEOUT_SECS: u64 = 30;

/// Settings for the VLAN manager. Every field has a default so a partial
/// YAML file (or none at all) is valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManagerConfig {
    pub network_scripts_dir: PathBuf,
    pub ifconfig: String,
    pub brctl: String,
    pub ifup: String,
    pub ifdown: String,
    pub command_timeout_secs: u64,
}

impl ManagerConfig {
    pub fn from_yaml(yaml: &str) -> anyhow::Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Loads `path` if given, otherwise the system-wide file when present,
    /// otherwise the defaults.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_PATH);
                if default_path.exists() {
                    Self::from_file(default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn validate(&self) -> VlanResult<()> {
        if self.command_timeout_secs == 0 {
            return Err(VlanError::validation(
                "command_timeout_secs must be greater than zero",
            ));
        }

        for (field, value) in [
            ("ifconfig", &self.ifconfig),
            ("brctl", &self.brctl),
            ("ifup", &self.ifup),
            ("ifdown", &self.ifdown),
        ] {
            if value.trim().is_empty() {
                return Err(VlanError::validation(format!("{} must not be empty", field)));
            }
        }

        if self.network_scripts_dir.as_os_str().is_empty() {
            return Err(VlanError::validation(
                "network_scripts_dir must not be empty",
            ));
        }

        Ok(())
    }

    pub fn command_timeout(&self) -> Duration {
        Duration::from_secs(self.command_timeout_secs)
    }
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            network_scripts_dir: PathBuf::from(DEFAULT_NETWORK_SCRIPTS_DIR),
            ifconfig: DEFAULT_IFCONFIG.to_string(),
            brctl: DEFAULT_BRCTL.to_string(),
            ifup: DEFAULT_IFUP.to_string(),
            ifdown: DEFAULT_IFDOWN.to_string(),
            command_timeout_secs: DEFAULT_COMMAND_TIMEOUT_SECS,
        }
    }
}
