use vw_core::VlanTag;

/// First line of every generated file. Existing hosts match on it, so it
/// must not change.
pub const HEADER: &str = "# Autogenerated by Abiquo AIM";

/// Stanza for the `<device>.<tag>` sub-interface.
pub fn render_vlan(device: &str, tag: VlanTag) -> String {
    let mut config = String::new();

    config.push_str(HEADER);
    config.push_str("\n\n");
    config.push_str(&format!("auto {}.{}\n", device, tag));
    config.push_str(&format!("iface {}.{} inet manual\n", device, tag));

    config
}

/// Stanza for a bridge whose only port is `<vlan_if>.<tag>`.
pub fn render_bridge(bridge: &str, vlan_if: &str, tag: VlanTag, stp: bool) -> String {
    let mut config = String::new();

    config.push_str(HEADER);
    config.push_str("\n\n");
    config.push_str(&format!("auto {}\n", bridge));
    config.push_str(&format!("iface {} inet manual\n", bridge));
    config.push_str(&format!("    bridge_ports {}.{}\n", vlan_if, tag));
    config.push_str(&format!("    bridge_stp {}\n", if stp { "on" } else { "off" }));

    config
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tag(n: u16) -> VlanTag {
        VlanTag::new(n).unwrap()
    }

    #[test]
    fn test_vlan_stanza_is_byte_exact() {
        assert_eq!(
            render_vlan("eth0", tag(100)),
            "# Autogenerated by Abiquo AIM\n\nauto eth0.100\niface eth0.100 inet manual\n"
        );
    }

    #[test]
    fn test_bridge_stanza_is_byte_exact() {
        assert_eq!(
            render_bridge("br100", "eth0", tag(100), true),
            "# Autogenerated by Abiquo AIM\n\n\
             auto br100\n\
             iface br100 inet manual\n    \
             bridge_ports eth0.100\n    \
             bridge_stp on\n"
        );
    }

    #[test]
    fn test_bridge_stanza_can_disable_stp() {
        assert!(render_bridge("br7", "bond0", tag(7), false).ends_with("    bridge_stp off\n"));
    }
}
