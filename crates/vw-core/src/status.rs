use crate::types::VlanBinding;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Observed state of one bridge + VLAN sub-interface pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VlanStatus {
    pub binding: VlanBinding,
    pub bridge: InterfaceStatus,
    pub vlan: InterfaceStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfaceStatus {
    pub name: String,
    pub exists: bool,
    pub config_path: PathBuf,
    pub config_present: bool,
}

impl InterfaceStatus {
    /// Device and configuration file agree with each other.
    pub fn is_consistent(&self) -> bool {
        self.exists == self.config_present
    }
}

impl VlanStatus {
    pub fn is_provisioned(&self) -> bool {
        self.bridge.exists && self.vlan.exists
    }

    pub fn display(&self) {
        println!("📊 VLAN {} on {}\n", self.binding.tag, self.binding.vlan_interface);

        for (label, iface) in [("🌉 Bridge", &self.bridge), ("🏷️  VLAN", &self.vlan)] {
            let state = if iface.exists { "present" } else { "absent" };
            let config = if iface.config_present { "present" } else { "missing" };
            println!("{}: {} [{}]", label, iface.name, state);
            println!("    Config: {} ({})", iface.config_path.display(), config);
            if !iface.is_consistent() {
                println!("    ⚠️  Device and configuration file disagree");
            }
        }
    }
}
