//! Virtual Machine Core
//!
//! Threaded dispatch over labelled handler blocks. The loop only carries the
//! label of the next block, and every block leaves through its transfer.

use std::rc::Rc;

use tracing::{debug, trace};

use crate::bytecode::{Address, Callee, Label, Op, Program, Reg, Transfer};
use crate::config::WreConfig;
use crate::error::{WreError, WreResult};
use crate::intrinsic::{self, Console};
use super::frame::{self, CallRecord, Completion};
use super::store::WordStore;
use super::value::Word;

/// Return address of calls made by the host. Never a block label.
pub const HOST_RETURN: Word = -1;

/// Where control goes after a block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Next(Label),
    ReturnToHost,
    Halt,
}

/// Word Runtime Engine machine
#[derive(Debug)]
pub struct Machine<C> {
    config: WreConfig,
    program: Rc<Program>,
    store: WordStore,
    console: C,

    last_call: Option<CallRecord>,
    host_calls: usize,
    steps: u64,
    halted: bool,
}

impl<C: Console> Machine<C> {
    /// Create a machine and seed memory from the program's data segment
    pub fn new(config: WreConfig, program: Program, console: C) -> WreResult<Self> {
        let mut machine = Machine {
            store: WordStore::new(&config)?,
            program: Rc::new(program),
            console,
            last_call: None,
            host_calls: 0,
            steps: 0,
            halted: false,
            config,
        };
        machine.seed()?;
        Ok(machine)
    }

    fn seed(&mut self) -> WreResult<()> {
        for cell in self.program.data() {
            self.store.store(cell.address, cell.value)?;
        }
        Ok(())
    }

    /// Execute from the entry label until halt or error
    pub fn run(&mut self) -> WreResult<()> {
        if self.halted {
            return Ok(());
        }
        let result = self.drive(self.program.entry());
        self.console.flush()?;
        match result? {
            Flow::ReturnToHost => Err(WreError::InvalidLabel(HOST_RETURN as i64)),
            _ => Ok(()),
        }
    }

    /// Call a routine or intrinsic from the host through the frame protocol
    /// and run until it returns
    pub fn call(&mut self, callee: Callee, argument: Word) -> WreResult<CallRecord> {
        self.host_calls += 1;
        let result = match self.invoke(callee, argument, HOST_RETURN) {
            Ok(Flow::Next(label)) => self.drive(label),
            other => other,
        };
        self.host_calls -= 1;
        self.console.flush()?;
        match result? {
            Flow::ReturnToHost => self.last_call.clone().ok_or(WreError::Halted),
            _ => Err(WreError::Halted),
        }
    }

    /// Dispatch blocks until the machine halts or control returns to the host
    fn drive(&mut self, start: Label) -> WreResult<Flow> {
        let mut flow = Flow::Next(start);
        while let Flow::Next(label) = flow {
            flow = self.step(label)?;
        }
        Ok(flow)
    }

    /// Run one handler block (dispatch only)
    fn step(&mut self, label: Label) -> WreResult<Flow> {
        self.steps += 1;
        if let Some(limit) = self.config.max_steps {
            if self.steps > limit {
                return Err(WreError::StepLimitExceeded(limit));
            }
        }
        trace!(target: "wre::dispatch", %label, sp = self.store.sp(), fp = self.store.fp(), "dispatch");

        let program = Rc::clone(&self.program);
        let block = program.block(label)?;
        for op in &block.ops {
            self.execute(*op)?;
        }
        self.transfer(block.transfer)
    }

    fn execute(&mut self, op: Op) -> WreResult<()> {
        match op {
            Op::LoadImm { dst, value } => self.set(dst, value),
            Op::Move { dst, src } => {
                let value = self.get(src)?;
                self.set(dst, value)
            }
            Op::LoadLabel { dst, label } => self.set(dst, label.to_word()),

            // Memory
            Op::Load { dst, addr } => {
                let address = self.address(addr)?;
                let value = self.store.load(address)?;
                self.set(dst, value)
            }
            Op::Store { addr, src } => {
                let address = self.address(addr)?;
                let value = self.get(src)?;
                self.store.store(address, value)
            }
            Op::LoadFrame { dst, offset } => {
                let value = self.store.frame_load(offset)?;
                self.set(dst, value)
            }
            Op::StoreFrame { offset, src } => {
                let value = self.get(src)?;
                self.store.frame_store(offset, value)
            }
            Op::Push { src } => {
                let value = self.get(src)?;
                self.store.push(value)
            }
            Op::Pop { dst } => {
                let value = self.store.pop()?;
                self.set(dst, value)
            }

            // Arithmetic
            Op::Binary { op, dst, lhs, rhs } => {
                let value = op.apply(self.get(lhs)?, self.get(rhs)?)?;
                self.set(dst, value)
            }
            Op::Unary { op, dst, src } => {
                let value = op.apply(self.get(src)?);
                self.set(dst, value)
            }

            Op::LoadStatus { dst } => {
                let code = self.last_call.as_ref().map_or(0, |call| call.status.code());
                self.set(dst, code)
            }
        }
    }

    fn transfer(&mut self, transfer: Transfer) -> WreResult<Flow> {
        match transfer {
            Transfer::Jump(target) => Ok(Flow::Next(target)),
            Transfer::Branch { cond, if_zero, otherwise } => {
                let target = if self.get(cond)? == 0 { if_zero } else { otherwise };
                Ok(Flow::Next(target))
            }
            Transfer::JumpRegister(reg) => {
                let target = self.program.resolve(self.get(reg)?)?;
                Ok(Flow::Next(target))
            }
            Transfer::Call { callee, arg, resume } => {
                let argument = self.get(arg)?;
                self.invoke(callee, argument, resume.to_word())
            }
            Transfer::Return { value } => {
                let mut record = CallRecord::active(&self.store)?;
                let completion = match value {
                    Some(reg) => Completion::value(self.get(reg)?),
                    None => Completion::unit(),
                };
                record.stage(completion)?;
                self.finish(record)
            }
            Transfer::Halt => {
                self.halted = true;
                Ok(Flow::Halt)
            }
        }
    }

    /// Enter a frame for `callee`. Routines continue at their label;
    /// intrinsics run inline and exit straight to the return address.
    fn invoke(&mut self, callee: Callee, argument: Word, return_address: Word) -> WreResult<Flow> {
        match callee {
            Callee::Routine(label) => {
                self.program.block(label)?;
            }
            Callee::Intrinsic(intrinsic) => self.config.capabilities.check(intrinsic)?,
        }

        let mut record = frame::enter(&mut self.store, argument, return_address)?;
        match callee {
            Callee::Routine(label) => Ok(Flow::Next(label)),
            Callee::Intrinsic(intrinsic) => {
                debug!(target: "wre::dispatch", %intrinsic, argument, "intrinsic call");
                let completion = intrinsic::invoke(intrinsic, &mut self.store, &mut self.console)?;
                record.stage(completion)?;
                self.finish(record)
            }
        }
    }

    /// Exit the active frame and jump to the return address it holds
    fn finish(&mut self, mut record: CallRecord) -> WreResult<Flow> {
        let return_address = frame::exit(&mut self.store, &mut record)?;
        self.last_call = Some(record);
        // The sentinel only names the host while a host call is in flight
        if return_address == HOST_RETURN && self.host_calls > 0 {
            return Ok(Flow::ReturnToHost);
        }
        Ok(Flow::Next(self.program.resolve(return_address)?))
    }

    fn get(&self, reg: Reg) -> WreResult<Word> {
        self.store.register(reg.index())
    }

    fn set(&mut self, reg: Reg, value: Word) -> WreResult<()> {
        self.store.set_register(reg.index(), value)
    }

    fn address(&self, addr: Address) -> WreResult<Word> {
        match addr {
            Address::Absolute(address) => Ok(address),
            Address::Register(reg) => self.get(reg),
        }
    }

    /// Return to the freshly loaded state: store zeroed and reseeded
    pub fn reset(&mut self) -> WreResult<()> {
        self.store.reset();
        self.last_call = None;
        self.host_calls = 0;
        self.steps = 0;
        self.halted = false;
        self.seed()
    }

    pub fn store(&self) -> &WordStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut WordStore {
        &mut self.store
    }

    pub fn console(&self) -> &C {
        &self.console
    }

    pub fn into_console(self) -> C {
        self.console
    }

    pub fn program(&self) -> &Program {
        &self.program
    }

    pub fn config(&self) -> &WreConfig {
        &self.config
    }

    /// Record of the most recently completed call
    pub fn last_call(&self) -> Option<&CallRecord> {
        self.last_call.as_ref()
    }

    /// Blocks dispatched so far
    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn is_halted(&self) -> bool {
        self.halted
    }
}
