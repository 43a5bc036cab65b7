//! VlanManager - bridge and VLAN sub-interface lifecycle
//!
//! Create flow:
//! 1. Bridge: re-activate when present, otherwise write its file and `ifup`
//! 2. VLAN sub-interface: no-op when present, otherwise write its file and `ifup`
//!
//! Delete flow:
//! 1. Bridge: `ifdown`, remove its file, `brctl delbr` if the device survived
//! 2. VLAN sub-interface: `ifdown`, remove its file
//!
//! Neither flow rolls back earlier steps when a later one fails.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info, instrument, warn};

use vw_core::{
    CommandRunner, InterfaceStatus, ManagerConfig, Service, SystemRunner, VlanBinding,
    VlanError, VlanResult, VlanStatus,
};
use vw_ifcfg::NetworkScripts;
use vw_iface::{InterfaceControl, Tools};

pub struct VlanManager {
    scripts: NetworkScripts,
    iface: InterfaceControl,
    runner: Arc<dyn CommandRunner>,
    /// Rebuild the runner on `initialize` so a new timeout takes effect.
    owns_runner: bool,
    create_lock: Mutex<()>,
    delete_lock: Mutex<()>,
}

impl VlanManager {
    /// Builds a manager that runs real processes.
    pub fn new(config: &ManagerConfig) -> VlanResult<Self> {
        config.validate()?;
        let runner: Arc<dyn CommandRunner> =
            Arc::new(SystemRunner::new(config.command_timeout()));
        let mut manager = Self::with_runner(config, runner)?;
        manager.owns_runner = true;
        Ok(manager)
    }

    /// Builds a manager on top of a caller-supplied command runner.
    pub fn with_runner(config: &ManagerConfig, runner: Arc<dyn CommandRunner>) -> VlanResult<Self> {
        config.validate()?;
        Ok(Self {
            scripts: NetworkScripts::new(&config.network_scripts_dir),
            iface: InterfaceControl::new(runner.clone(), Tools::from_config(config)),
            runner,
            owns_runner: false,
            create_lock: Mutex::new(()),
            delete_lock: Mutex::new(()),
        })
    }

    pub fn scripts(&self) -> &NetworkScripts {
        &self.scripts
    }

    fn binding(tag: i32, vlan_interface: &str, bridge_interface: &str) -> VlanResult<VlanBinding> {
        VlanBinding::new(tag, vlan_interface, bridge_interface).inspect_err(|e| {
            warn!(tag, vlan_interface, bridge_interface, error = %e, "Rejected VLAN request");
        })
    }

    /// Ensures the bridge and the `<vlan_interface>.<tag>` sub-interface
    /// exist and are up.
    ///
    /// Input is validated before any command runs. A failure on the
    /// sub-interface leaves an already created bridge in place.
    #[instrument(skip(self))]
    pub async fn create_vlan(
        &self,
        tag: i32,
        vlan_interface: &str,
        bridge_interface: &str,
    ) -> VlanResult<()> {
        let binding = Self::binding(tag, vlan_interface, bridge_interface)?;
        let _guard = self.create_lock.lock().await;

        if let Err(e) = self.create_bridge_interface(&binding).await {
            let err = e.context(format!(
                "Error creating bridge interface {}",
                binding.bridge_interface
            ));
            error!(error = %err, "VLAN creation failed");
            return Err(err);
        }

        if let Err(e) = self.create_vlan_interface(&binding).await {
            let err = e.context(format!(
                "Error creating VLAN with tag {} and interface {}",
                binding.tag, binding.vlan_interface
            ));
            error!(error = %err, "VLAN creation failed");
            return Err(err);
        }

        info!(tag, vlan_interface, bridge_interface, "VLAN created");
        Ok(())
    }

    async fn create_bridge_interface(&self, binding: &VlanBinding) -> VlanResult<()> {
        let bridge = &binding.bridge_interface;

        if self.iface.bridge_exists(bridge).await? {
            info!(bridge = %bridge, "Bridge interface already exists, re-activating");
            return self.iface.link_up(bridge).await;
        }

        self.scripts.write_bridge(binding)?;
        self.iface
            .if_up(&binding.bridge_filename())
            .await
            .inspect_err(|_| warn!(bridge = %bridge, "Unable to bring up the bridge"))
    }

    async fn create_vlan_interface(&self, binding: &VlanBinding) -> VlanResult<()> {
        let device = binding.vlan_device();

        if self.iface.exists(&device).await? {
            info!(
                tag = binding.tag.get(),
                interface = %binding.vlan_interface,
                "VLAN interface already exists"
            );
            return Ok(());
        }

        self.scripts.write_vlan(binding)?;
        self.iface
            .if_up(&binding.vlan_filename())
            .await
            .inspect_err(|_| warn!(device = %device, "Unable to bring up the VLAN interface"))
    }

    /// Tears down the bridge, then the `<vlan_interface>.<tag>`
    /// sub-interface. Missing interfaces are skipped.
    #[instrument(skip(self))]
    pub async fn delete_vlan(
        &self,
        tag: i32,
        vlan_interface: &str,
        bridge_interface: &str,
    ) -> VlanResult<()> {
        let binding = Self::binding(tag, vlan_interface, bridge_interface)?;
        let _guard = self.delete_lock.lock().await;

        if let Err(e) = self.delete_bridge_interface(&binding).await {
            let err = e.context(format!(
                "Error deleting bridge interface {}",
                binding.bridge_interface
            ));
            error!(error = %err, "VLAN deletion failed");
            return Err(err);
        }

        if let Err(e) = self.delete_vlan_interface(&binding).await {
            let err = e.context(format!(
                "Error deleting VLAN interface {}",
                binding.vlan_interface
            ));
            error!(error = %err, "VLAN deletion failed");
            return Err(err);
        }

        info!(tag, vlan_interface, bridge_interface, "VLAN deleted");
        Ok(())
    }

    async fn delete_bridge_interface(&self, binding: &VlanBinding) -> VlanResult<()> {
        let bridge = &binding.bridge_interface;

        if !self.iface.bridge_exists(bridge).await? {
            info!(bridge = %bridge, "Bridge interface does not exist");
            return Ok(());
        }

        let filename = binding.bridge_filename();
        self.iface
            .if_down(&filename)
            .await
            .inspect_err(|_| warn!(bridge = %bridge, "Unable to tear down the bridge"))?;
        self.remove_config(&filename).await?;

        // ifdown does not always destroy the device
        match self.iface.bridge_exists(bridge).await {
            Ok(false) => {}
            Ok(true) => {
                if let Err(e) = self.iface.delete_bridge(bridge).await {
                    self.report_inconsistency(bridge, &e);
                }
            }
            Err(e) => self.report_inconsistency(bridge, &e),
        }

        Ok(())
    }

    async fn delete_vlan_interface(&self, binding: &VlanBinding) -> VlanResult<()> {
        let device = binding.vlan_device();

        if !self.iface.exists(&device).await? {
            info!(
                tag = binding.tag.get(),
                interface = %binding.vlan_interface,
                "VLAN interface does not exist"
            );
            return Ok(());
        }

        let filename = binding.vlan_filename();
        self.iface
            .if_down(&filename)
            .await
            .inspect_err(|_| warn!(device = %device, "Unable to tear down the VLAN interface"))?;
        self.remove_config(&filename).await
    }

    /// Removes a configuration file. On failure the interface is brought
    /// back up so it is not left down without a way to restore it, and the
    /// removal error is returned regardless of how that went.
    async fn remove_config(&self, filename: &str) -> VlanResult<()> {
        if let Err(e) = self.scripts.remove(filename) {
            warn!(interface = filename, error = %e, "Unable to remove configuration, re-activating interface");
            if let Err(up) = self.iface.if_up(filename).await {
                warn!(interface = filename, error = %up, "Re-activation after failed removal also failed");
            }
            return Err(e.into());
        }
        Ok(())
    }

    fn report_inconsistency(&self, bridge: &str, cause: &VlanError) {
        let err = VlanError::consistency(format!(
            "The {} cannot be destroyed. This can create consistency problems",
            bridge
        ));
        warn!(bridge, cause = %cause, "{}", err);
    }

    /// Fails with an aggregated `Tooling` error when `ifconfig` or `brctl`
    /// cannot be invoked.
    pub async fn check_vlan_configuration(&self) -> VlanResult<()> {
        self.iface.check_tools().await
    }

    /// Re-queries the host and the network-scripts directory. Takes no lock.
    pub async fn status(
        &self,
        tag: i32,
        vlan_interface: &str,
        bridge_interface: &str,
    ) -> VlanResult<VlanStatus> {
        let binding = Self::binding(tag, vlan_interface, bridge_interface)?;

        let bridge_file = binding.bridge_filename();
        let bridge = InterfaceStatus {
            name: binding.bridge_interface.clone(),
            exists: self.iface.bridge_exists(&binding.bridge_interface).await?,
            config_path: self.scripts.path(&bridge_file),
            config_present: self.scripts.contains(&bridge_file),
        };

        let vlan_file = binding.vlan_filename();
        let vlan = InterfaceStatus {
            name: binding.vlan_device(),
            exists: self.iface.exists(&binding.vlan_device()).await?,
            config_path: self.scripts.path(&vlan_file),
            config_present: self.scripts.contains(&vlan_file),
        };

        Ok(VlanStatus {
            binding,
            bridge,
            vlan,
        })
    }
}

#[async_trait]
impl Service for VlanManager {
    fn name(&self) -> &str {
        "VLAN"
    }

    async fn initialize(&mut self, config: &ManagerConfig) -> VlanResult<()> {
        config.validate()?;

        if self.owns_runner {
            self.runner = Arc::new(SystemRunner::new(config.command_timeout()));
        }
        self.scripts = NetworkScripts::new(&config.network_scripts_dir);
        self.iface = InterfaceControl::new(self.runner.clone(), Tools::from_config(config));

        info!(
            network_scripts_dir = %config.network_scripts_dir.display(),
            ifconfig = %config.ifconfig,
            brctl = %config.brctl,
            "VLAN service initialized"
        );
        Ok(())
    }

    async fn start(&self) -> VlanResult<()> {
        self.check_vlan_configuration().await?;
        info!("VLAN service started");
        Ok(())
    }
}
