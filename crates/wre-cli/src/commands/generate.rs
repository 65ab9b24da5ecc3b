use std::fs;

use anyhow::{Context, Result};

use wre_core::bytecode::BinOp;
use wre_core::{Block, Callee, ImageWriter, Intrinsic, Label, Op, Program, Reg, Transfer};

const PROMPT: i32 = 100;
const GREETING: i32 = 120;
const NAME: i32 = 200;

/// Asks for a name and a number, greets, then prints the number's square
fn sample_program() -> Result<Program> {
    let call = |intrinsic, arg: u16, resume: u32| Transfer::Call {
        callee: Callee::Intrinsic(intrinsic),
        arg: Reg(arg),
        resume: Label(resume),
    };

    let blocks = vec![
        // L0
        Block::new(vec![Op::LoadImm { dst: Reg(1), value: PROMPT }], call(Intrinsic::PrintString, 1, 1)),
        // L1
        Block::new(vec![Op::LoadImm { dst: Reg(1), value: NAME }], call(Intrinsic::ReadString, 1, 2)),
        // L2
        Block::new(vec![Op::LoadImm { dst: Reg(1), value: GREETING }], call(Intrinsic::PrintString, 1, 3)),
        // L3
        Block::new(vec![Op::LoadImm { dst: Reg(1), value: NAME }], call(Intrinsic::PrintString, 1, 4)),
        // L4
        Block::new(vec![], call(Intrinsic::ReadInteger, 1, 5)),
        // L5: bad number -> L7
        Block::new(
            vec![Op::LoadStatus { dst: Reg(2) }],
            Transfer::Branch { cond: Reg(2), if_zero: Label(6), otherwise: Label(7) },
        ),
        // L6: square it through the routine at L8
        Block::new(
            vec![Op::Move { dst: Reg(3), src: Reg(0) }],
            Transfer::Call { callee: Callee::Routine(Label(8)), arg: Reg(3), resume: Label(9) },
        ),
        // L7
        Block::new(vec![Op::LoadImm { dst: Reg(1), value: 0 }], call(Intrinsic::PrintBool, 1, 10)),
        // L8: routine
        Block::new(
            vec![
                Op::LoadFrame { dst: Reg(4), offset: 0 },
                Op::Binary { op: BinOp::Mul, dst: Reg(4), lhs: Reg(4), rhs: Reg(4) },
            ],
            Transfer::Return { value: Some(Reg(4)) },
        ),
        // L9
        Block::new(vec![], call(Intrinsic::PrintInteger, 0, 10)),
        // L10
        Block::new(vec![], Transfer::Halt),
    ];

    Ok(Program::new(Label(0), blocks)?
        .with_string(PROMPT, b"name? ")
        .with_string(GREETING, b"hello, "))
}

pub fn write_sample(path: &str) -> Result<()> {
    let program = sample_program()?;
    fs::write(path, ImageWriter::encode(&program)).with_context(|| format!("failed to write {path}"))?;
    println!("wrote sample program image to {}", path);
    Ok(())
}
