//! Instruction Representation
//!
//! Straight-line ops and the explicit transfers that end every block.

use std::fmt;

use crate::error::{WreError, WreResult};
use crate::intrinsic::Intrinsic;
use crate::vm::value::{bool_to_word, Word};
use super::opcode::OpCode;

/// Register index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Reg(pub u16);

impl Reg {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for Reg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "R[{}]", self.0)
    }
}

/// Block address. Stored in registers and memory as a word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Label(pub u32);

impl Label {
    pub fn to_word(self) -> Word {
        self.0 as Word
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "L{}", self.0)
    }
}

/// Memory operand
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Address {
    Absolute(Word),
    /// Address held in a register
    Register(Reg),
}

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add = 0x00,
    Sub = 0x01,
    Mul = 0x02,
    Div = 0x03,
    Rem = 0x04,
    And = 0x05,
    Or  = 0x06,
    Eq  = 0x10,
    Ne  = 0x11,
    Lt  = 0x12,
    Le  = 0x13,
    Gt  = 0x14,
    Ge  = 0x15,
}

impl BinOp {
    pub const ALL: [BinOp; 13] = [
        BinOp::Add, BinOp::Sub, BinOp::Mul, BinOp::Div, BinOp::Rem, BinOp::And, BinOp::Or,
        BinOp::Eq, BinOp::Ne, BinOp::Lt, BinOp::Le, BinOp::Gt, BinOp::Ge,
    ];

    pub fn from_u8(byte: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|op| *op as u8 == byte)
    }

    /// Wrapping 32-bit arithmetic; comparisons yield 1 or 0
    pub fn apply(self, lhs: Word, rhs: Word) -> WreResult<Word> {
        Ok(match self {
            BinOp::Add => lhs.wrapping_add(rhs),
            BinOp::Sub => lhs.wrapping_sub(rhs),
            BinOp::Mul => lhs.wrapping_mul(rhs),
            BinOp::Div => {
                if rhs == 0 {
                    return Err(WreError::DivisionByZero);
                }
                lhs.wrapping_div(rhs)
            }
            BinOp::Rem => {
                if rhs == 0 {
                    return Err(WreError::DivisionByZero);
                }
                lhs.wrapping_rem(rhs)
            }
            BinOp::And => lhs & rhs,
            BinOp::Or => lhs | rhs,
            BinOp::Eq => bool_to_word(lhs == rhs),
            BinOp::Ne => bool_to_word(lhs != rhs),
            BinOp::Lt => bool_to_word(lhs < rhs),
            BinOp::Le => bool_to_word(lhs <= rhs),
            BinOp::Gt => bool_to_word(lhs > rhs),
            BinOp::Ge => bool_to_word(lhs >= rhs),
        })
    }
}

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnOp {
    Neg = 0x00,
    /// Bitwise complement
    Not = 0x01,
}

impl UnOp {
    pub fn from_u8(byte: u8) -> Option<Self> {
        match byte {
            0x00 => Some(UnOp::Neg),
            0x01 => Some(UnOp::Not),
            _ => None,
        }
    }

    pub fn apply(self, value: Word) -> Word {
        match self {
            UnOp::Neg => value.wrapping_neg(),
            UnOp::Not => !value,
        }
    }
}

/// Straight-line operation inside a block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    LoadImm { dst: Reg, value: Word },
    Move { dst: Reg, src: Reg },
    /// Load a block address, e.g. to build a return address for `JumpRegister`
    LoadLabel { dst: Reg, label: Label },
    Load { dst: Reg, addr: Address },
    Store { addr: Address, src: Reg },
    LoadFrame { dst: Reg, offset: Word },
    StoreFrame { offset: Word, src: Reg },
    Binary { op: BinOp, dst: Reg, lhs: Reg, rhs: Reg },
    Unary { op: UnOp, dst: Reg, src: Reg },
    Push { src: Reg },
    Pop { dst: Reg },
    /// Status code of the most recent completed call
    LoadStatus { dst: Reg },
}

impl Op {
    pub fn opcode(&self) -> OpCode {
        match self {
            Op::LoadImm { .. } => OpCode::LoadImm,
            Op::Move { .. } => OpCode::Move,
            Op::LoadLabel { .. } => OpCode::LoadLabel,
            Op::Load { .. } => OpCode::Load,
            Op::Store { .. } => OpCode::Store,
            Op::LoadFrame { .. } => OpCode::LoadFrame,
            Op::StoreFrame { .. } => OpCode::StoreFrame,
            Op::Binary { .. } => OpCode::Binary,
            Op::Unary { .. } => OpCode::Unary,
            Op::Push { .. } => OpCode::Push,
            Op::Pop { .. } => OpCode::Pop,
            Op::LoadStatus { .. } => OpCode::LoadStatus,
        }
    }
}

/// Target of a call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Callee {
    Routine(Label),
    Intrinsic(Intrinsic),
}

/// The single exit of a block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transfer {
    Jump(Label),
    Branch { cond: Reg, if_zero: Label, otherwise: Label },
    /// Indirect jump to the label held in a register
    JumpRegister(Reg),
    /// Enter a frame for `callee`; its exit dispatches to `resume`
    Call { callee: Callee, arg: Reg, resume: Label },
    /// Exit the active frame, handing back `value` (zero when absent)
    Return { value: Option<Reg> },
    Halt,
}

impl Transfer {
    pub fn opcode(&self) -> OpCode {
        match self {
            Transfer::Jump(_) => OpCode::Jump,
            Transfer::Branch { .. } => OpCode::Branch,
            Transfer::JumpRegister(_) => OpCode::JumpRegister,
            Transfer::Call { .. } => OpCode::Call,
            Transfer::Return { .. } => OpCode::Return,
            Transfer::Halt => OpCode::Halt,
        }
    }

    /// Labels named directly by this transfer
    pub fn static_targets(&self) -> Vec<Label> {
        match *self {
            Transfer::Jump(target) => vec![target],
            Transfer::Branch { if_zero, otherwise, .. } => vec![if_zero, otherwise],
            Transfer::Call { callee: Callee::Routine(routine), resume, .. } => vec![routine, resume],
            Transfer::Call { resume, .. } => vec![resume],
            Transfer::JumpRegister(_) | Transfer::Return { .. } | Transfer::Halt => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binop_tags_decode() {
        for byte in 0..=0xFFu8 {
            if let Some(op) = BinOp::from_u8(byte) {
                assert_eq!(op as u8, byte);
            }
        }
        assert_eq!(BinOp::from_u8(0x12), Some(BinOp::Lt));
    }

    #[test]
    fn arithmetic_wraps_and_traps_on_zero() {
        assert_eq!(BinOp::Add.apply(Word::MAX, 1).unwrap(), Word::MIN);
        assert_eq!(BinOp::Div.apply(Word::MIN, -1).unwrap(), Word::MIN);
        assert!(matches!(BinOp::Rem.apply(1, 0), Err(WreError::DivisionByZero)));
        assert_eq!(BinOp::Le.apply(2, 2).unwrap(), 1);
        assert_eq!(UnOp::Not.apply(0), -1);
    }

    #[test]
    fn transfer_opcodes_end_blocks() {
        assert!(Transfer::Halt.opcode().is_transfer());
        assert!(!Op::Pop { dst: Reg(0) }.opcode().is_transfer());
    }
}
