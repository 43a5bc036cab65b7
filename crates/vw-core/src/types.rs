use crate::error::{VlanError, VlanResult};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

/// Lowest usable 802.1Q tag.
pub const MIN_VLAN_TAG: u16 = 1;

/// Highest usable 802.1Q tag (4095 is reserved).
pub const MAX_VLAN_TAG: u16 = 4094;

/// Kernel IFNAMSIZ minus the trailing NUL.
pub const MAX_IFNAME_LEN: usize = 15;

static IFNAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_.:-]+$").expect("Invalid regex pattern"));

/// An 802.1Q tag in the range [1, 4094].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u16")]
pub struct VlanTag(u16);

impl VlanTag {
    /// Accepts any integer so that negative or oversized values are
    /// reported as out of range instead of being truncated by the caller.
    pub fn new(tag: impl Into<i64>) -> VlanResult<Self> {
        let tag = tag.into();
        u16::try_from(tag)
            .ok()
            .filter(|t| (MIN_VLAN_TAG..=MAX_VLAN_TAG).contains(t))
            .map(Self)
            .ok_or_else(|| VlanError::validation(format!("VLAN tag out of range ({}).", tag)))
    }

    pub fn get(self) -> u16 {
        self.0
    }
}

impl TryFrom<i64> for VlanTag {
    type Error = VlanError;

    fn try_from(tag: i64) -> Result<Self, Self::Error> {
        Self::new(tag)
    }
}

impl From<VlanTag> for u16 {
    fn from(tag: VlanTag) -> Self {
        tag.0
    }
}

impl fmt::Display for VlanTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Checks that `name` is usable both as a kernel interface name and as a
/// filename inside the network-scripts directory.
pub fn validate_interface_name(name: &str) -> VlanResult<()> {
    if name.is_empty() {
        return Err(VlanError::validation("Interface name must not be empty"));
    }

    if name.len() > MAX_IFNAME_LEN {
        return Err(VlanError::validation(format!(
            "Interface name '{}' is longer than {} characters",
            name, MAX_IFNAME_LEN
        )));
    }

    if name == "." || name == ".." || !IFNAME_RE.is_match(name) {
        return Err(VlanError::validation(format!(
            "Interface name '{}' contains invalid characters",
            name
        )));
    }

    Ok(())
}

/// The (tag, parent interface, bridge) triple every operation works on.
///
/// Construction validates all three parts, so holding a `VlanBinding` means
/// no OS state has to be touched to discover bad input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VlanBinding {
    pub tag: VlanTag,
    pub vlan_interface: String,
    pub bridge_interface: String,
}

impl VlanBinding {
    pub fn new(
        tag: impl Into<i64>,
        vlan_interface: &str,
        bridge_interface: &str,
    ) -> VlanResult<Self> {
        let tag = VlanTag::new(tag)?;
        validate_interface_name(vlan_interface)?;
        validate_interface_name(bridge_interface)?;

        let binding = Self {
            tag,
            vlan_interface: vlan_interface.to_string(),
            bridge_interface: bridge_interface.to_string(),
        };
        validate_interface_name(&binding.vlan_device())?;

        Ok(binding)
    }

    /// `<interface>.<tag>`: the sub-interface name and its config filename.
    pub fn vlan_device(&self) -> String {
        format!("{}.{}", self.vlan_interface, self.tag)
    }

    pub fn vlan_filename(&self) -> String {
        self.vlan_device()
    }

    /// Bridge configuration files are named after the bridge itself.
    pub fn bridge_filename(&self) -> String {
        self.bridge_interface.clone()
    }
}

impl fmt::Display for VlanBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "tag={}, interface={}, bridge={}",
            self.tag, self.vlan_interface, self.bridge_interface
        )
    }
}
