pub mod commands;
pub mod control;

pub use commands::*;
pub use control::*;

// Interface queries and activation through ifconfig, ifup/ifdown and brctl
