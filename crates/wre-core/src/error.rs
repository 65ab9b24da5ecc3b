//! WRE Error Types
//!
//! Defines all fatal error conditions produced by the Word Runtime Engine.
//! Recoverable input conditions live in `intrinsic::InputError` and never
//! surface here.

use std::fmt;
use std::io;

use thiserror::Error;

use crate::intrinsic::Intrinsic;
use crate::vm::frame::CallPhase;

/// Addressable space an index was checked against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Space {
    Register,
    Memory,
    Stack,
}

impl fmt::Display for Space {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Space::Register => write!(f, "register"),
            Space::Memory => write!(f, "memory"),
            Space::Stack => write!(f, "stack"),
        }
    }
}

#[derive(Debug, Error)]
pub enum WreError {
    // Image errors
    #[error("invalid program image magic number")]
    InvalidMagicNumber,
    #[error("incompatible program image version {0}")]
    InvalidImageVersion(u8),
    #[error("invalid {kind} tag: 0x{tag:02X}")]
    InvalidTag { kind: &'static str, tag: u8 },
    #[error("program image is too short")]
    ImageTooShort,
    #[error("reference to unknown label {0}")]
    UnknownLabel(u32),

    // Store errors
    #[error("{space} index out of bounds: {index}")]
    Bounds { space: Space, index: i64 },
    #[error("{space} capacity {capacity} exceeds the addressable word range")]
    CapacityTooLarge { space: Space, capacity: usize },
    #[error("string at address {address} has no terminator before the end of memory")]
    UnterminatedString { address: i64 },

    // Execution errors
    #[error("invalid jump target: {0}")]
    InvalidLabel(i64),
    #[error("division by zero")]
    DivisionByZero,
    #[error("frame protocol violation: {from:?} cannot move to {to:?}")]
    FrameProtocol { from: CallPhase, to: CallPhase },
    #[error("unbalanced frame at fp {fp}: routine left sp at {sp}")]
    UnbalancedFrame { fp: i32, sp: i32 },
    #[error("machine halted before the call returned")]
    Halted,
    #[error("step limit of {0} exceeded")]
    StepLimitExceeded(u64),

    // Capability errors
    #[error("capability denied for intrinsic {0}")]
    CapabilityDenied(Intrinsic),

    // IO boundary
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

impl WreError {
    /// Shorthand for an out-of-range index
    pub fn bounds(space: Space, index: impl Into<i64>) -> Self {
        WreError::Bounds { space, index: index.into() }
    }
}

pub type WreResult<T> = Result<T, WreError>;
