//! In-memory host used to drive the manager without touching the network.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use vw_core::{CommandLine, CommandRunner, ManagerConfig, VlanResult};
use vw_manager::VlanManager;

#[derive(Default)]
struct HostState {
    devices: HashSet<String>,
    up: HashSet<String>,
    /// Rendered command -> forced exit status.
    failures: HashMap<String, i32>,
    /// Devices that survive `ifdown`.
    persistent: HashSet<String>,
    missing_tools: HashSet<String>,
    log: Vec<String>,
    in_flight: usize,
    max_in_flight: usize,
}

/// Simulates `ifconfig`, `brctl`, `ifup` and `ifdown` against an interface
/// table, recording every command it receives.
#[derive(Default)]
pub struct FakeHost {
    state: Mutex<HostState>,
    delay: Option<Duration>,
}

#[allow(dead_code)]
impl FakeHost {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Every command takes `delay` to complete.
    pub fn with_delay(delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            delay: Some(delay),
            ..Default::default()
        })
    }

    pub fn add_device(&self, name: &str) {
        let mut state = self.state.lock().unwrap();
        state.devices.insert(name.to_string());
        state.up.insert(name.to_string());
    }

    pub fn fail(&self, command: &str, code: i32) {
        self.state
            .lock()
            .unwrap()
            .failures
            .insert(command.to_string(), code);
    }

    pub fn keep_after_ifdown(&self, name: &str) {
        self.state.lock().unwrap().persistent.insert(name.to_string());
    }

    pub fn remove_tool(&self, program: &str) {
        self.state
            .lock()
            .unwrap()
            .missing_tools
            .insert(program.to_string());
    }

    pub fn exists(&self, name: &str) -> bool {
        self.state.lock().unwrap().devices.contains(name)
    }

    pub fn is_up(&self, name: &str) -> bool {
        self.state.lock().unwrap().up.contains(name)
    }

    pub fn commands(&self) -> Vec<String> {
        self.state.lock().unwrap().log.clone()
    }

    pub fn clear_commands(&self) {
        self.state.lock().unwrap().log.clear();
    }

    pub fn max_in_flight(&self) -> usize {
        self.state.lock().unwrap().max_in_flight
    }

    fn execute(state: &mut HostState, cmd: &CommandLine) -> i32 {
        let rendered = cmd.to_string();
        state.log.push(rendered.clone());

        if state.missing_tools.contains(&cmd.program) {
            return 127;
        }
        if let Some(code) = state.failures.get(&rendered) {
            return *code;
        }

        let args: Vec<&str> = cmd.args.iter().map(String::as_str).collect();
        match (cmd.program.as_str(), args.as_slice()) {
            (_, []) if cmd.program.ends_with("brctl") => 1,
            (_, []) => 0,
            (_, ["-a", name]) => {
                if state.devices.contains(*name) {
                    0
                } else {
                    1
                }
            }
            (_, [name, "up"]) => {
                if state.devices.contains(*name) {
                    state.up.insert(name.to_string());
                    0
                } else {
                    1
                }
            }
            (_, ["delbr", name]) => {
                if state.devices.remove(*name) {
                    state.up.remove(*name);
                    0
                } else {
                    1
                }
            }
            ("ifup", [name]) => {
                state.devices.insert(name.to_string());
                state.up.insert(name.to_string());
                0
            }
            ("ifdown", [name]) => {
                state.up.remove(*name);
                if !state.persistent.contains(*name) {
                    state.devices.remove(*name);
                }
                0
            }
            _ => 2,
        }
    }
}

#[async_trait]
impl CommandRunner for FakeHost {
    async fn run(&self, cmd: &CommandLine) -> VlanResult<i32> {
        if let Some(delay) = self.delay {
            {
                let mut state = self.state.lock().unwrap();
                state.in_flight += 1;
                state.max_in_flight = state.max_in_flight.max(state.in_flight);
            }
            tokio::time::sleep(delay).await;
            self.state.lock().unwrap().in_flight -= 1;
        }

        let mut state = self.state.lock().unwrap();
        Ok(Self::execute(&mut state, cmd))
    }
}

pub fn config(dir: &Path) -> ManagerConfig {
    ManagerConfig {
        network_scripts_dir: dir.to_path_buf(),
        ..Default::default()
    }
}

pub fn manager(dir: &Path, host: &Arc<FakeHost>) -> VlanManager {
    VlanManager::with_runner(&config(dir), host.clone()).unwrap()
}
