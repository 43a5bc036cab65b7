pub mod config;
pub mod error;
pub mod exec;
pub mod service;
pub mod status;
pub mod types;

pub use config::*;
pub use error::*;
pub use exec::*;
pub use service::*;
pub use status::*;
pub use types::*;

// Domain types, errors, configuration and command execution shared by the
// vlanwarden crates
