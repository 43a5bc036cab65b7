//! Error taxonomy for VLAN lifecycle operations.
//!
//! Every variant carries a human-readable `message`. Callers that only want
//! to report the failure use [`VlanError::message`]; callers that need to
//! react to the kind of failure match on the variant.

use std::fmt;
use std::io;
use thiserror::Error;

/// Result alias used across the workspace.
pub type VlanResult<T> = Result<T, VlanError>;

#[derive(Debug, Error)]
pub enum VlanError {
    /// A tag or interface name was rejected before anything was touched.
    #[error("{message}")]
    Validation { message: String },

    /// A configuration file could not be written or removed.
    #[error("{message}")]
    Configuration {
        message: String,
        #[source]
        source: Option<io::Error>,
    },

    /// `ifup`, `ifdown` or a link re-activation returned non-zero.
    #[error("{message}")]
    Activation {
        message: String,
        command: String,
        exit_code: i32,
    },

    /// The OS state diverged from the configuration files. Logged, never
    /// returned by the delete path.
    #[error("{message}")]
    Consistency { message: String },

    /// Required external tools are not invocable.
    #[error("{message}")]
    Tooling { message: String, missing: Vec<String> },

    /// A command could not be executed at all (spawn failure, timeout).
    #[error("{message}")]
    Command {
        message: String,
        command: String,
        #[source]
        source: Option<io::Error>,
    },
}

impl VlanError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>, source: Option<io::Error>) -> Self {
        Self::Configuration {
            message: message.into(),
            source,
        }
    }

    pub fn activation(
        message: impl Into<String>,
        command: impl Into<String>,
        exit_code: i32,
    ) -> Self {
        Self::Activation {
            message: message.into(),
            command: command.into(),
            exit_code,
        }
    }

    pub fn consistency(message: impl Into<String>) -> Self {
        Self::Consistency {
            message: message.into(),
        }
    }

    /// Builds the aggregated pre-flight error naming every missing tool.
    pub fn tooling(missing: Vec<String>) -> Self {
        let mut message = String::from("Failed to check the command/s:");
        for tool in &missing {
            message.push(' ');
            message.push_str(tool);
        }
        Self::Tooling { message, missing }
    }

    pub fn command(
        message: impl Into<String>,
        command: impl Into<String>,
        source: Option<io::Error>,
    ) -> Self {
        Self::Command {
            message: message.into(),
            command: command.into(),
            source,
        }
    }

    /// The description carried by every variant.
    pub fn message(&self) -> &str {
        match self {
            VlanError::Validation { message }
            | VlanError::Configuration { message, .. }
            | VlanError::Activation { message, .. }
            | VlanError::Consistency { message }
            | VlanError::Tooling { message, .. }
            | VlanError::Command { message, .. } => message,
        }
    }

    /// Prefixes the message with an operation-level description, keeping
    /// the variant so callers can still match on the kind.
    pub fn context(mut self, context: impl fmt::Display) -> Self {
        match &mut self {
            VlanError::Validation { message }
            | VlanError::Configuration { message, .. }
            | VlanError::Activation { message, .. }
            | VlanError::Consistency { message }
            | VlanError::Tooling { message, .. }
            | VlanError::Command { message, .. } => {
                *message = format!("{}: {}", context, message);
            }
        }
        self
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, VlanError::Validation { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_context_prefixes_message_and_keeps_kind() {
        let err = VlanError::activation("Unable to bring up br100", "ifup br100", 1)
            .context("Error creating bridge interface br100");

        assert_eq!(
            err.to_string(),
            "Error creating bridge interface br100: Unable to bring up br100"
        );
        match err {
            VlanError::Activation { exit_code, command, .. } => {
                assert_eq!(exit_code, 1);
                assert_eq!(command, "ifup br100");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_tooling_names_every_missing_tool() {
        let err = VlanError::tooling(vec!["/sbin/ifconfig".into(), "/sbin/brctl".into()]);
        assert_eq!(
            err.message(),
            "Failed to check the command/s: /sbin/ifconfig /sbin/brctl"
        );
    }

    #[test]
    fn test_configuration_exposes_io_source() {
        let io = io::Error::new(io::ErrorKind::PermissionDenied, "denied");
        let err = VlanError::configuration("cannot write", Some(io));
        assert!(err.source().is_some());
        assert!(!err.is_validation());
    }
}
