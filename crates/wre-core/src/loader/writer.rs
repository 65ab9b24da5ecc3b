//! Program Image Writer
//!
//! Encodes a `Program` in the format `ImageLoader` reads.

use crate::bytecode::{Address, Callee, Op, Program, Reg, Transfer};
use crate::vm::value::Word;
use super::loader::{
    ADDRESS_ABSOLUTE, ADDRESS_REGISTER, CALLEE_INTRINSIC, CALLEE_ROUTINE, IMAGE_MAGIC, IMAGE_VERSION,
};

/// Program image writer
pub struct ImageWriter {
    buf: Vec<u8>,
}

impl ImageWriter {
    /// Encode `program`, declaring the capabilities its intrinsic calls need
    pub fn encode(program: &Program) -> Vec<u8> {
        let mut w = ImageWriter { buf: Vec::new() };

        w.u32(IMAGE_MAGIC);
        w.u8(IMAGE_VERSION);
        w.u8(program.required_capabilities().bits());
        w.u16(0);
        w.u32(program.entry().0);

        w.u32(program.data().len() as u32);
        for cell in program.data() {
            w.i32(cell.address);
            w.i32(cell.value);
        }

        w.u32(program.blocks().len() as u32);
        for block in program.blocks() {
            w.u32(block.ops.len() as u32);
            for op in &block.ops {
                w.op(op);
            }
            w.transfer(&block.transfer);
        }

        w.buf
    }

    fn op(&mut self, op: &Op) {
        self.u8(op.opcode() as u8);
        match *op {
            Op::LoadImm { dst, value } => {
                self.reg(dst);
                self.i32(value);
            }
            Op::Move { dst, src } => {
                self.reg(dst);
                self.reg(src);
            }
            Op::LoadLabel { dst, label } => {
                self.reg(dst);
                self.u32(label.0);
            }
            Op::Load { dst, addr } => {
                self.reg(dst);
                self.address(addr);
            }
            Op::Store { addr, src } => {
                self.address(addr);
                self.reg(src);
            }
            Op::LoadFrame { dst, offset } => {
                self.reg(dst);
                self.i32(offset);
            }
            Op::StoreFrame { offset, src } => {
                self.i32(offset);
                self.reg(src);
            }
            Op::Binary { op, dst, lhs, rhs } => {
                self.u8(op as u8);
                self.reg(dst);
                self.reg(lhs);
                self.reg(rhs);
            }
            Op::Unary { op, dst, src } => {
                self.u8(op as u8);
                self.reg(dst);
                self.reg(src);
            }
            Op::Push { src } => self.reg(src),
            Op::Pop { dst } | Op::LoadStatus { dst } => self.reg(dst),
        }
    }

    fn transfer(&mut self, transfer: &Transfer) {
        self.u8(transfer.opcode() as u8);
        match *transfer {
            Transfer::Jump(target) => self.u32(target.0),
            Transfer::Branch { cond, if_zero, otherwise } => {
                self.reg(cond);
                self.u32(if_zero.0);
                self.u32(otherwise.0);
            }
            Transfer::JumpRegister(reg) => self.reg(reg),
            Transfer::Call { callee, arg, resume } => {
                match callee {
                    Callee::Routine(label) => {
                        self.u8(CALLEE_ROUTINE);
                        self.u32(label.0);
                    }
                    Callee::Intrinsic(intrinsic) => {
                        self.u8(CALLEE_INTRINSIC);
                        self.u8(intrinsic.id());
                    }
                }
                self.reg(arg);
                self.u32(resume.0);
            }
            Transfer::Return { value: None } => self.u8(0x00),
            Transfer::Return { value: Some(reg) } => {
                self.u8(0x01);
                self.reg(reg);
            }
            Transfer::Halt => {}
        }
    }

    fn address(&mut self, addr: Address) {
        match addr {
            Address::Absolute(address) => {
                self.u8(ADDRESS_ABSOLUTE);
                self.i32(address);
            }
            Address::Register(reg) => {
                self.u8(ADDRESS_REGISTER);
                self.reg(reg);
            }
        }
    }

    fn reg(&mut self, reg: Reg) {
        self.u16(reg.0);
    }

    fn u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    fn u16(&mut self, v: u16) {
        self.buf.extend_from_slice(&v.to_be_bytes());
    }

    fn u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_be_bytes());
    }

    fn i32(&mut self, v: Word) {
        self.buf.extend_from_slice(&v.to_be_bytes());
    }
}
