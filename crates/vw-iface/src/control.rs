use crate::commands::Tools;
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use vw_core::{CommandLine, CommandRunner, EXIT_COMMAND_NOT_FOUND, VlanError, VlanResult};

/// Queries and mutates interface state through external tools.
///
/// There is no cached view of the host: every call re-runs the tool and
/// trusts its exit status alone.
pub struct InterfaceControl {
    runner: Arc<dyn CommandRunner>,
    tools: Tools,
}

impl InterfaceControl {
    pub fn new(runner: Arc<dyn CommandRunner>, tools: Tools) -> Self {
        Self { runner, tools }
    }

    pub fn tools(&self) -> &Tools {
        &self.tools
    }

    async fn status(&self, cmd: &CommandLine) -> VlanResult<i32> {
        self.runner.run(cmd).await
    }

    /// Returns true when `<ifconfig> -a <interface>` succeeds.
    pub async fn exists(&self, interface: &str) -> VlanResult<bool> {
        let cmd = self.tools.probe_cmd(interface);
        let exists = self.status(&cmd).await? == 0;
        debug!(interface, exists, "Probed interface");
        Ok(exists)
    }

    /// A bridge is just a named interface here.
    pub async fn bridge_exists(&self, bridge: &str) -> VlanResult<bool> {
        self.exists(bridge).await
    }

    /// Brings up the interface described by `filename`.
    pub async fn if_up(&self, filename: &str) -> VlanResult<()> {
        let cmd = self.tools.ifup_cmd(filename);
        self.expect_success(&cmd, format!("Unable to bring up {}", filename))
            .await?;
        info!(interface = filename, "Interface brought up");
        Ok(())
    }

    /// Brings down the interface described by `filename`.
    pub async fn if_down(&self, filename: &str) -> VlanResult<()> {
        let cmd = self.tools.ifdown_cmd(filename);
        self.expect_success(&cmd, format!("Unable to tear down {}", filename))
            .await?;
        info!(interface = filename, "Interface brought down");
        Ok(())
    }

    /// Re-activates an interface that already exists without going through
    /// its configuration file.
    pub async fn link_up(&self, interface: &str) -> VlanResult<()> {
        let cmd = self.tools.link_up_cmd(interface);
        self.expect_success(&cmd, format!("Unable to set {} up", interface))
            .await?;
        info!(interface, "Link set up");
        Ok(())
    }

    /// Removes a bridge device with `brctl delbr`.
    pub async fn delete_bridge(&self, bridge: &str) -> VlanResult<()> {
        let cmd = self.tools.delbr_cmd(bridge);
        self.expect_success(&cmd, format!("Unable to delete bridge {}", bridge))
            .await?;
        info!(bridge, "Bridge device deleted");
        Ok(())
    }

    /// Verifies the required tools can be invoked. Only "command not found"
    /// (127) counts as missing; any other status means the tool ran.
    pub async fn check_tools(&self) -> VlanResult<()> {
        let mut missing = Vec::new();

        for tool in self.tools.required() {
            let code = self.status(&CommandLine::new(tool)).await?;
            if code == EXIT_COMMAND_NOT_FOUND {
                warn!(tool, "Required command not found");
                missing.push(tool.to_string());
            }
        }

        if missing.is_empty() {
            debug!("All required commands are available");
            return Ok(());
        }

        let err = VlanError::tooling(missing);
        error!(error = %err, "Pre-flight check failed");
        Err(err)
    }

    async fn expect_success(&self, cmd: &CommandLine, message: String) -> VlanResult<()> {
        let code = self.status(cmd).await?;
        if code != 0 {
            warn!(command = %cmd, exit_code = code, "Command failed");
            return Err(VlanError::activation(message, cmd.to_string(), code));
        }
        Ok(())
    }
}
