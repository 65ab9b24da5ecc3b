pub mod capability;
pub mod registry;

pub use capability::Capability;
pub use registry::CapabilitySet;
