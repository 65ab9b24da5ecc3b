//! Word Runtime Engine - Core Library
//!
//! Public API surface for the WRE core: the word store, the frame protocol,
//! threaded dispatch over handler blocks and the intrinsic I/O bridge.

pub mod bytecode;
pub mod capability;
pub mod config;
pub mod error;
pub mod intrinsic;
pub mod loader;
pub mod vm;

// Re-export commonly used types
pub use bytecode::{Block, Callee, Label, Op, Program, Reg, Transfer};
pub use capability::{Capability, CapabilitySet};
pub use config::{StackGrowth, WreConfig};
pub use error::{WreError, WreResult};
pub use intrinsic::{Console, Intrinsic, StreamConsole};
pub use loader::{ImageLoader, ImageWriter, LoadedImage};
pub use vm::{Machine, ReturnStatus, Word};
