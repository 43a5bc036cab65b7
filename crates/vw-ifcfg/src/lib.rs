pub mod render;
pub mod scripts;

pub use render::*;
pub use scripts::*;

// Interface configuration files (ifupdown stanzas) for VLANs and bridges
