//! VLAN manager: creates and tears down bridge + VLAN sub-interface pairs
//! through generated configuration files and external tools.
//!
//! Create operations are serialized against each other and delete
//! operations against each other, each by its own lock. A create and a
//! delete may still interleave.

pub mod manager;

pub use manager::VlanManager;
