//! Intrinsic I/O Bridge
//!
//! Native routines called through the same frame protocol as VM routines.
//! Each one marshals between word representations and the host console.

pub mod bridge;
pub mod console;

use std::fmt;

use crate::capability::Capability;

pub use bridge::{format_float, invoke, InputError};
pub use console::{Console, StreamConsole};

/// Native routine ids. Id values are part of the program image format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Intrinsic {
    PrintInteger,
    PrintBool,
    PrintString,
    PrintFloat,
    ReadInteger,
    ReadFloat,
    ReadString,
    ReadBool,
}

impl Intrinsic {
    pub const ALL: [Intrinsic; 8] = [
        Intrinsic::PrintInteger,
        Intrinsic::PrintBool,
        Intrinsic::PrintString,
        Intrinsic::PrintFloat,
        Intrinsic::ReadInteger,
        Intrinsic::ReadFloat,
        Intrinsic::ReadString,
        Intrinsic::ReadBool,
    ];

    pub fn id(self) -> u8 {
        match self {
            Intrinsic::PrintInteger => 0x01,
            Intrinsic::PrintBool => 0x02,
            Intrinsic::PrintString => 0x03,
            Intrinsic::PrintFloat => 0x04,
            Intrinsic::ReadInteger => 0x10,
            Intrinsic::ReadFloat => 0x11,
            Intrinsic::ReadString => 0x12,
            Intrinsic::ReadBool => 0x13,
        }
    }

    pub fn from_u8(byte: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|i| i.id() == byte)
    }

    pub fn name(self) -> &'static str {
        match self {
            Intrinsic::PrintInteger => "print-integer",
            Intrinsic::PrintBool => "print-boolean",
            Intrinsic::PrintString => "print-string",
            Intrinsic::PrintFloat => "print-float",
            Intrinsic::ReadInteger => "read-integer",
            Intrinsic::ReadFloat => "read-float",
            Intrinsic::ReadString => "read-string",
            Intrinsic::ReadBool => "read-boolean",
        }
    }

    /// Capabilities that must be granted before the intrinsic may run
    pub fn required_capabilities(self) -> &'static [Capability] {
        match self {
            Intrinsic::PrintInteger | Intrinsic::PrintBool => &[],
            Intrinsic::PrintString => &[Capability::Strings],
            Intrinsic::PrintFloat => &[Capability::Floats],
            Intrinsic::ReadInteger | Intrinsic::ReadBool => &[Capability::Input],
            Intrinsic::ReadFloat => &[Capability::Input, Capability::Floats],
            Intrinsic::ReadString => &[Capability::Input, Capability::Strings],
        }
    }
}

impl fmt::Display for Intrinsic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
