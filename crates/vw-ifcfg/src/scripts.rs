use crate::render::{render_bridge, render_vlan};
use nix::unistd::{AccessFlags, access};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};
use vw_core::{VlanBinding, VlanError};

#[derive(Debug, Error)]
pub enum IfcfgError {
    #[error("Directory '{}' is not accessible", .dir.display())]
    NotAccessible { dir: PathBuf },

    #[error("Failed to write '{}': {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to remove '{}': {source}", .path.display())]
    Remove {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl From<IfcfgError> for VlanError {
    fn from(err: IfcfgError) -> Self {
        let message = err.to_string();
        let source = match err {
            IfcfgError::NotAccessible { .. } => None,
            IfcfgError::Write { source, .. } | IfcfgError::Remove { source, .. } => Some(source),
        };
        VlanError::configuration(message, source)
    }
}

/// The directory holding generated interface configuration files.
#[derive(Debug, Clone)]
pub struct NetworkScripts {
    dir: PathBuf,
}

impl NetworkScripts {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path(&self, filename: &str) -> PathBuf {
        self.dir.join(filename)
    }

    /// The process can list, create and delete entries in the directory.
    pub fn is_accessible(&self) -> bool {
        access(
            &self.dir,
            AccessFlags::R_OK | AccessFlags::W_OK | AccessFlags::X_OK,
        )
        .is_ok()
    }

    pub fn contains(&self, filename: &str) -> bool {
        self.path(filename).is_file()
    }

    /// Truncates and writes `filename`. Fails without touching anything when
    /// the directory is not accessible.
    pub fn write(&self, filename: &str, content: &str) -> Result<PathBuf, IfcfgError> {
        if !self.is_accessible() {
            warn!(dir = %self.dir.display(), "Unable to write configuration, directory is not accessible");
            return Err(IfcfgError::NotAccessible {
                dir: self.dir.clone(),
            });
        }

        let path = self.path(filename);
        std::fs::write(&path, content).map_err(|source| {
            warn!(path = %path.display(), error = %source, "Unable to write configuration");
            IfcfgError::Write {
                path: path.clone(),
                source,
            }
        })?;

        debug!(path = %path.display(), bytes = content.len(), "Configuration written");
        Ok(path)
    }

    /// Unlinks `filename`. A missing file is a failure: the interface it
    /// belongs to was not brought up from this directory.
    pub fn remove(&self, filename: &str) -> Result<(), IfcfgError> {
        let path = self.path(filename);

        if !self.is_accessible() {
            warn!(
                path = %path.display(),
                dir = %self.dir.display(),
                "Unable to remove configuration, directory is not accessible"
            );
            return Err(IfcfgError::NotAccessible {
                dir: self.dir.clone(),
            });
        }

        match std::fs::remove_file(&path) {
            Ok(()) => {
                info!(path = %path.display(), "Configuration removed");
                Ok(())
            }
            Err(source) => {
                warn!(path = %path.display(), error = %source, "Unable to remove configuration");
                Err(IfcfgError::Remove { path, source })
            }
        }
    }

    pub fn write_vlan(&self, binding: &VlanBinding) -> Result<PathBuf, IfcfgError> {
        let content = render_vlan(&binding.vlan_interface, binding.tag);
        let path = self.write(&binding.vlan_filename(), &content)?;
        info!(path = %path.display(), "The VLAN configuration has been written");
        Ok(path)
    }

    pub fn write_bridge(&self, binding: &VlanBinding) -> Result<PathBuf, IfcfgError> {
        let content = render_bridge(
            &binding.bridge_interface,
            &binding.vlan_interface,
            binding.tag,
            true,
        );
        let path = self.write(&binding.bridge_filename(), &content)?;
        info!(path = %path.display(), "The bridge configuration has been written");
        Ok(path)
    }
}
