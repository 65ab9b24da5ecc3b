#![allow(dead_code)]

use std::io::Cursor;

use wre_core::{Block, Label, Machine, Program, StreamConsole, Transfer, WreConfig};

pub type TestConsole = StreamConsole<Cursor<Vec<u8>>, Vec<u8>>;

pub fn console(input: &str) -> TestConsole {
    StreamConsole::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
}

/// Program with a single halting block, for host-driven calls
pub fn idle_program() -> Program {
    Program::new(Label(0), vec![Block::new(vec![], Transfer::Halt)]).expect("valid program")
}

pub fn machine(config: WreConfig, program: Program, input: &str) -> Machine<TestConsole> {
    Machine::new(config, program, console(input)).expect("machine construction failed")
}

pub fn output(machine: Machine<TestConsole>) -> String {
    String::from_utf8(machine.into_console().into_writer()).expect("utf8 output")
}
