//! Program Image Loader
//!
//! Loads and validates WRE program images.
//! This layer performs structural validation only; register indices and
//! dynamic jump targets are checked when they execute.

use crate::bytecode::{
    Address, BinOp, Block, Callee, DataCell, Label, Op, OpCode, Program, Reg, Transfer, UnOp,
};
use crate::capability::CapabilitySet;
use crate::error::{WreError, WreResult};
use crate::intrinsic::Intrinsic;
use crate::vm::value::Word;

/// Image magic: "WRE1"
pub const IMAGE_MAGIC: u32 = 0x5752_4531;

/// Supported image version
pub const IMAGE_VERSION: u8 = 1;

/// Header size: magic, version, capabilities, reserved, entry, data and block counts
const MIN_IMAGE_SIZE: usize = 20;

pub(crate) const ADDRESS_ABSOLUTE: u8 = 0x00;
pub(crate) const ADDRESS_REGISTER: u8 = 0x01;
pub(crate) const CALLEE_ROUTINE: u8 = 0x00;
pub(crate) const CALLEE_INTRINSIC: u8 = 0x01;

/// Loaded program bundle
#[derive(Debug)]
pub struct LoadedImage {
    pub program: Program,
    /// Capabilities the image declares it needs
    pub required: CapabilitySet,
}

/// Program image loader
pub struct ImageLoader;

impl ImageLoader {
    /// Load a program from raw bytes
    pub fn load(bytes: &[u8]) -> WreResult<LoadedImage> {
        if bytes.len() < MIN_IMAGE_SIZE {
            return Err(WreError::ImageTooShort);
        }

        let mut cursor = 0;

        // Magic
        let magic = Self::read_u32(bytes, &mut cursor)?;
        if magic != IMAGE_MAGIC {
            return Err(WreError::InvalidMagicNumber);
        }

        // Version
        let version = Self::read_u8(bytes, &mut cursor)?;
        if version != IMAGE_VERSION {
            return Err(WreError::InvalidImageVersion(version));
        }

        let required = CapabilitySet::from_bits(Self::read_u8(bytes, &mut cursor)?);

        // Reserved
        Self::read_u16(bytes, &mut cursor)?;

        let entry = Label(Self::read_u32(bytes, &mut cursor)?);

        // Data segment
        let data_count = Self::read_u32(bytes, &mut cursor)? as usize;
        let mut data = Vec::with_capacity(data_count.min(bytes.len() / 8));
        for _ in 0..data_count {
            let address = Self::read_i32(bytes, &mut cursor)?;
            let value = Self::read_i32(bytes, &mut cursor)?;
            data.push(DataCell { address, value });
        }

        // Blocks
        let block_count = Self::read_u32(bytes, &mut cursor)? as usize;
        let mut blocks = Vec::with_capacity(block_count.min(bytes.len()));
        for _ in 0..block_count {
            blocks.push(Self::read_block(bytes, &mut cursor)?);
        }

        let program = Program::new(entry, blocks)?.with_data(data);
        Ok(LoadedImage { program, required })
    }

    fn read_block(bytes: &[u8], cursor: &mut usize) -> WreResult<Block> {
        let op_count = Self::read_u32(bytes, cursor)? as usize;
        let mut ops = Vec::with_capacity(op_count.min(bytes.len()));
        for _ in 0..op_count {
            ops.push(Self::read_op(bytes, cursor)?);
        }
        let transfer = Self::read_transfer(bytes, cursor)?;
        Ok(Block::new(ops, transfer))
    }

    fn read_op(bytes: &[u8], cursor: &mut usize) -> WreResult<Op> {
        let tag = Self::read_u8(bytes, cursor)?;
        let opcode = OpCode::from_u8(tag)
            .filter(|op| !op.is_transfer())
            .ok_or(WreError::InvalidTag { kind: "op", tag })?;

        Ok(match opcode {
            OpCode::LoadImm => Op::LoadImm {
                dst: Self::read_reg(bytes, cursor)?,
                value: Self::read_i32(bytes, cursor)?,
            },
            OpCode::Move => Op::Move {
                dst: Self::read_reg(bytes, cursor)?,
                src: Self::read_reg(bytes, cursor)?,
            },
            OpCode::LoadLabel => Op::LoadLabel {
                dst: Self::read_reg(bytes, cursor)?,
                label: Label(Self::read_u32(bytes, cursor)?),
            },
            OpCode::Load => Op::Load {
                dst: Self::read_reg(bytes, cursor)?,
                addr: Self::read_address(bytes, cursor)?,
            },
            OpCode::Store => Op::Store {
                addr: Self::read_address(bytes, cursor)?,
                src: Self::read_reg(bytes, cursor)?,
            },
            OpCode::LoadFrame => Op::LoadFrame {
                dst: Self::read_reg(bytes, cursor)?,
                offset: Self::read_i32(bytes, cursor)?,
            },
            OpCode::StoreFrame => Op::StoreFrame {
                offset: Self::read_i32(bytes, cursor)?,
                src: Self::read_reg(bytes, cursor)?,
            },
            OpCode::Push => Op::Push { src: Self::read_reg(bytes, cursor)? },
            OpCode::Pop => Op::Pop { dst: Self::read_reg(bytes, cursor)? },
            OpCode::Binary => {
                let tag = Self::read_u8(bytes, cursor)?;
                let op = BinOp::from_u8(tag).ok_or(WreError::InvalidTag { kind: "binary op", tag })?;
                Op::Binary {
                    op,
                    dst: Self::read_reg(bytes, cursor)?,
                    lhs: Self::read_reg(bytes, cursor)?,
                    rhs: Self::read_reg(bytes, cursor)?,
                }
            }
            OpCode::Unary => {
                let tag = Self::read_u8(bytes, cursor)?;
                let op = UnOp::from_u8(tag).ok_or(WreError::InvalidTag { kind: "unary op", tag })?;
                Op::Unary {
                    op,
                    dst: Self::read_reg(bytes, cursor)?,
                    src: Self::read_reg(bytes, cursor)?,
                }
            }
            OpCode::LoadStatus => Op::LoadStatus { dst: Self::read_reg(bytes, cursor)? },

            // filtered above
            OpCode::Jump
            | OpCode::Branch
            | OpCode::JumpRegister
            | OpCode::Call
            | OpCode::Return
            | OpCode::Halt => return Err(WreError::InvalidTag { kind: "op", tag }),
        })
    }

    fn read_transfer(bytes: &[u8], cursor: &mut usize) -> WreResult<Transfer> {
        let tag = Self::read_u8(bytes, cursor)?;
        let opcode = OpCode::from_u8(tag)
            .filter(|op| op.is_transfer())
            .ok_or(WreError::InvalidTag { kind: "transfer", tag })?;

        Ok(match opcode {
            OpCode::Jump => Transfer::Jump(Label(Self::read_u32(bytes, cursor)?)),
            OpCode::Branch => Transfer::Branch {
                cond: Self::read_reg(bytes, cursor)?,
                if_zero: Label(Self::read_u32(bytes, cursor)?),
                otherwise: Label(Self::read_u32(bytes, cursor)?),
            },
            OpCode::JumpRegister => Transfer::JumpRegister(Self::read_reg(bytes, cursor)?),
            OpCode::Call => Transfer::Call {
                callee: Self::read_callee(bytes, cursor)?,
                arg: Self::read_reg(bytes, cursor)?,
                resume: Label(Self::read_u32(bytes, cursor)?),
            },
            OpCode::Return => {
                let value = match Self::read_u8(bytes, cursor)? {
                    0x00 => None,
                    0x01 => Some(Self::read_reg(bytes, cursor)?),
                    tag => return Err(WreError::InvalidTag { kind: "return value", tag }),
                };
                Transfer::Return { value }
            }
            OpCode::Halt => Transfer::Halt,
            _ => return Err(WreError::InvalidTag { kind: "transfer", tag }),
        })
    }

    fn read_address(bytes: &[u8], cursor: &mut usize) -> WreResult<Address> {
        match Self::read_u8(bytes, cursor)? {
            ADDRESS_ABSOLUTE => Ok(Address::Absolute(Self::read_i32(bytes, cursor)?)),
            ADDRESS_REGISTER => Ok(Address::Register(Self::read_reg(bytes, cursor)?)),
            tag => Err(WreError::InvalidTag { kind: "address", tag }),
        }
    }

    fn read_callee(bytes: &[u8], cursor: &mut usize) -> WreResult<Callee> {
        match Self::read_u8(bytes, cursor)? {
            CALLEE_ROUTINE => Ok(Callee::Routine(Label(Self::read_u32(bytes, cursor)?))),
            CALLEE_INTRINSIC => {
                let tag = Self::read_u8(bytes, cursor)?;
                Intrinsic::from_u8(tag)
                    .map(Callee::Intrinsic)
                    .ok_or(WreError::InvalidTag { kind: "intrinsic", tag })
            }
            tag => Err(WreError::InvalidTag { kind: "callee", tag }),
        }
    }

    fn read_reg(bytes: &[u8], cursor: &mut usize) -> WreResult<Reg> {
        Ok(Reg(Self::read_u16(bytes, cursor)?))
    }

    fn take<'a, const N: usize>(bytes: &'a [u8], cursor: &mut usize) -> WreResult<[u8; N]> {
        let end = cursor.checked_add(N).ok_or(WreError::ImageTooShort)?;
        let slice: &'a [u8] = bytes.get(*cursor..end).ok_or(WreError::ImageTooShort)?;
        *cursor = end;
        let mut out = [0u8; N];
        out.copy_from_slice(slice);
        Ok(out)
    }

    fn read_u8(bytes: &[u8], cursor: &mut usize) -> WreResult<u8> {
        Ok(Self::take::<1>(bytes, cursor)?[0])
    }

    fn read_u16(bytes: &[u8], cursor: &mut usize) -> WreResult<u16> {
        Ok(u16::from_be_bytes(Self::take(bytes, cursor)?))
    }

    fn read_u32(bytes: &[u8], cursor: &mut usize) -> WreResult<u32> {
        Ok(u32::from_be_bytes(Self::take(bytes, cursor)?))
    }

    fn read_i32(bytes: &[u8], cursor: &mut usize) -> WreResult<Word> {
        Ok(i32::from_be_bytes(Self::take(bytes, cursor)?))
    }
}
