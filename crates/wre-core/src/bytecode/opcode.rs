//! Program Image Opcodes
//!
//! Tag bytes for ops and transfers in the program image.
//! This file contains no execution semantics.
//! Opcode values are an eternal contract.

/// Image opcodes (v1)
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpCode {
    // Register operations
    LoadImm   = 0x01,
    Move      = 0x02,
    LoadLabel = 0x03,

    // Memory access
    Load       = 0x10,
    Store      = 0x11,
    LoadFrame  = 0x12,
    StoreFrame = 0x13,
    Push       = 0x14,
    Pop        = 0x15,

    // Arithmetic
    Binary = 0x20,
    Unary  = 0x21,

    // Call status
    LoadStatus = 0x30,

    // Control transfer
    Jump         = 0x40,
    Branch       = 0x41,
    JumpRegister = 0x42,
    Call         = 0x43,
    Return       = 0x44,

    // System
    Halt = 0xFF,
}

impl OpCode {
    /// Convert raw byte to opcode
    pub fn from_u8(byte: u8) -> Option<Self> {
        match byte {
            0x01 => Some(OpCode::LoadImm),
            0x02 => Some(OpCode::Move),
            0x03 => Some(OpCode::LoadLabel),

            0x10 => Some(OpCode::Load),
            0x11 => Some(OpCode::Store),
            0x12 => Some(OpCode::LoadFrame),
            0x13 => Some(OpCode::StoreFrame),
            0x14 => Some(OpCode::Push),
            0x15 => Some(OpCode::Pop),

            0x20 => Some(OpCode::Binary),
            0x21 => Some(OpCode::Unary),

            0x30 => Some(OpCode::LoadStatus),

            0x40 => Some(OpCode::Jump),
            0x41 => Some(OpCode::Branch),
            0x42 => Some(OpCode::JumpRegister),
            0x43 => Some(OpCode::Call),
            0x44 => Some(OpCode::Return),

            0xFF => Some(OpCode::Halt),

            _ => None,
        }
    }

    /// Whether this opcode ends a block
    pub fn is_transfer(self) -> bool {
        (self as u8) >= 0x40
    }
}
