//! Capability identifiers
//!
//! The optional intrinsic families a build may carry. Output of integers and
//! booleans needs no capability; everything else is opt-in.

use std::fmt;

/// Capability identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// VM strings: print-string, read-string
    Strings,
    /// Float marshaling through the scratch cell: print-float, read-float
    Floats,
    /// Blocking reads from the input stream
    Input,
}

impl Capability {
    pub const ALL: [Capability; 3] = [Capability::Strings, Capability::Floats, Capability::Input];

    /// Stable one-byte id used by the program image
    pub fn id(self) -> u8 {
        match self {
            Capability::Strings => 0x01,
            Capability::Floats => 0x02,
            Capability::Input => 0x04,
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Capability::Strings => write!(f, "strings"),
            Capability::Floats => write!(f, "floats"),
            Capability::Input => write!(f, "input"),
        }
    }
}
