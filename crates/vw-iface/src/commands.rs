//! Command builders for interface operations

use vw_core::{CommandLine, ManagerConfig};

/// Tool paths used to build commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tools {
    pub ifconfig: String,
    pub brctl: String,
    pub ifup: String,
    pub ifdown: String,
}

impl Tools {
    pub fn from_config(config: &ManagerConfig) -> Self {
        Self {
            ifconfig: config.ifconfig.clone(),
            brctl: config.brctl.clone(),
            ifup: config.ifup.clone(),
            ifdown: config.ifdown.clone(),
        }
    }

    /// `<ifconfig> -a <interface>`: exits 0 when the interface exists.
    pub fn probe_cmd(&self, interface: &str) -> CommandLine {
        CommandLine::new(&self.ifconfig).arg("-a").arg(interface)
    }

    /// `<ifconfig> <interface> up`
    pub fn link_up_cmd(&self, interface: &str) -> CommandLine {
        CommandLine::new(&self.ifconfig).arg(interface).arg("up")
    }

    /// `ifup <filename>`
    pub fn ifup_cmd(&self, filename: &str) -> CommandLine {
        CommandLine::new(&self.ifup).arg(filename)
    }

    /// `ifdown <filename>`
    pub fn ifdown_cmd(&self, filename: &str) -> CommandLine {
        CommandLine::new(&self.ifdown).arg(filename)
    }

    /// `<brctl> delbr <bridge>`
    pub fn delbr_cmd(&self, bridge: &str) -> CommandLine {
        CommandLine::new(&self.brctl).arg("delbr").arg(bridge)
    }

    /// Tools checked before the manager starts, each invoked bare.
    pub fn required(&self) -> [&str; 2] {
        [&self.ifconfig, &self.brctl]
    }
}

impl Default for Tools {
    fn default() -> Self {
        Self::from_config(&ManagerConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probe_cmd() {
        let cmd = Tools::default().probe_cmd("eth0.100");
        assert_eq!(cmd.program, "/sbin/ifconfig");
        assert_eq!(cmd.args, vec!["-a", "eth0.100"]);
    }

    #[test]
    fn test_link_up_cmd() {
        assert_eq!(Tools::default().link_up_cmd("br100").to_string(), "/sbin/ifconfig br100 up");
    }

    #[test]
    fn test_ifup_ifdown_cmd() {
        let tools = Tools::default();
        assert_eq!(tools.ifup_cmd("br100").to_string(), "ifup br100");
        assert_eq!(tools.ifdown_cmd("eth0.100").to_string(), "ifdown eth0.100");
    }

    #[test]
    fn test_delbr_cmd() {
        assert_eq!(Tools::default().delbr_cmd("br100").to_string(), "/sbin/brctl delbr br100");
    }

    #[test]
    fn test_tools_follow_config() {
        let config = ManagerConfig {
            ifconfig: "/usr/sbin/ifconfig".into(),
            brctl: "/usr/sbin/brctl".into(),
            ..Default::default()
        };
        let tools = Tools::from_config(&config);
        assert_eq!(tools.required(), ["/usr/sbin/ifconfig", "/usr/sbin/brctl"]);
    }

    #[test]
    fn test_names_stay_single_arguments() {
        let cmd = Tools::default().ifup_cmd("br0; reboot");
        assert_eq!(cmd.args, vec!["br0; reboot"]);
    }
}
