pub mod instruction;
pub mod opcode;
pub mod program;

pub use instruction::{Address, BinOp, Callee, Label, Op, Reg, Transfer, UnOp};
pub use opcode::OpCode;
pub use program::{Block, DataCell, Program};
