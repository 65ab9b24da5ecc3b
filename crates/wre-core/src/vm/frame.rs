//! Frame Protocol
//!
//! Layout and lifecycle of one activation record. While a body runs, relative
//! to FP: `M[FP]` holds the argument, `M[FP-1]` the caller's FP and `M[FP-2]`
//! the return address. The offsets are the same for both growth directions.

use tracing::debug;

use crate::config::StackGrowth;
use crate::error::{WreError, WreResult};
use super::store::WordStore;
use super::value::Word;

pub const ARGUMENT_OFFSET: Word = 0;
pub const SAVED_FP_OFFSET: Word = -1;
pub const RETURN_ADDRESS_OFFSET: Word = -2;

/// Words occupied by one frame
pub const FRAME_WORDS: usize = 3;

/// Register that receives the return value on exit
pub const VALUE_REGISTER: usize = 0;

/// Lifecycle of a single call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallPhase {
    Idle,
    ArgsPushed,
    ReturnAddrPushed,
    OldFpPushed,
    InBody,
    ValueStaged,
    FpRestored,
    StackUnwound,
    Dispatched,
}

impl CallPhase {
    /// The only phase this one may move to
    pub fn next(self) -> Option<CallPhase> {
        use CallPhase::*;
        match self {
            Idle => Some(ArgsPushed),
            ArgsPushed => Some(ReturnAddrPushed),
            ReturnAddrPushed => Some(OldFpPushed),
            OldFpPushed => Some(InBody),
            InBody => Some(ValueStaged),
            ValueStaged => Some(FpRestored),
            FpRestored => Some(StackUnwound),
            StackUnwound => Some(Dispatched),
            Dispatched => None,
        }
    }
}

/// Outcome tag of a call, distinct from its value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReturnStatus {
    #[default]
    Ok,
    /// A read intrinsic could not parse its token
    InputFormat,
    /// A read intrinsic found no further input
    EndOfInput,
}

impl ReturnStatus {
    /// Word form loaded by `Op::LoadStatus`
    pub fn code(self) -> Word {
        match self {
            ReturnStatus::Ok => 0,
            ReturnStatus::InputFormat => 1,
            ReturnStatus::EndOfInput => 2,
        }
    }
}

/// Value and status handed back by a routine body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Completion {
    pub value: Word,
    pub status: ReturnStatus,
}

impl Completion {
    /// No meaningful result; the value is zero
    pub fn unit() -> Self {
        Self::default()
    }

    pub fn value(value: Word) -> Self {
        Completion { value, status: ReturnStatus::Ok }
    }

    pub fn failed(status: ReturnStatus) -> Self {
        Completion { value: 0, status }
    }
}

/// Named call/return fields of one call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallRecord {
    pub argument: Word,
    pub return_address: Word,
    pub return_value: Word,
    pub status: ReturnStatus,
    phase: CallPhase,
}

impl CallRecord {
    fn new(argument: Word, return_address: Word) -> Self {
        CallRecord {
            argument,
            return_address,
            return_value: 0,
            status: ReturnStatus::Ok,
            phase: CallPhase::Idle,
        }
    }

    /// Record of the routine whose frame is active in `store`
    pub fn active(store: &WordStore) -> WreResult<Self> {
        let mut record = Self::new(
            store.frame_load(ARGUMENT_OFFSET)?,
            store.frame_load(RETURN_ADDRESS_OFFSET)?,
        );
        record.phase = CallPhase::InBody;
        Ok(record)
    }

    pub fn phase(&self) -> CallPhase {
        self.phase
    }

    fn advance(&mut self, to: CallPhase) -> WreResult<()> {
        if self.phase.next() != Some(to) {
            return Err(WreError::FrameProtocol { from: self.phase, to });
        }
        self.phase = to;
        Ok(())
    }

    /// Stage the body's result for the exit sequence
    pub fn stage(&mut self, completion: Completion) -> WreResult<()> {
        self.advance(CallPhase::ValueStaged)?;
        self.return_value = completion.value;
        self.status = completion.status;
        Ok(())
    }
}

/// SP a frame based at `fp` must leave behind when its body finishes
fn balanced_sp(growth: StackGrowth, fp: Word) -> Word {
    let base = fp + RETURN_ADDRESS_OFFSET;
    match growth {
        StackGrowth::Upward => base + FRAME_WORDS as Word,
        StackGrowth::Downward => base - 1,
    }
}

/// Caller side: lay down the frame and point FP at its argument cell
pub fn enter(store: &mut WordStore, argument: Word, return_address: Word) -> WreResult<CallRecord> {
    let mut record = CallRecord::new(argument, return_address);
    let caller_fp = store.fp();

    // the argument always occupies the highest of the three cells
    let fp = store.reserve(FRAME_WORDS)? + (FRAME_WORDS as Word - 1);

    store.store(fp + ARGUMENT_OFFSET, argument)?;
    record.advance(CallPhase::ArgsPushed)?;
    store.store(fp + RETURN_ADDRESS_OFFSET, return_address)?;
    record.advance(CallPhase::ReturnAddrPushed)?;
    store.store(fp + SAVED_FP_OFFSET, caller_fp)?;
    record.advance(CallPhase::OldFpPushed)?;

    store.set_fp(fp);
    record.advance(CallPhase::InBody)?;

    debug!(target: "wre::frame", fp, sp = store.sp(), argument, return_address, "frame entered");
    Ok(record)
}

/// Callee side: hand the value over, restore the caller's frame and yield
/// the return address to dispatch to
pub fn exit(store: &mut WordStore, record: &mut CallRecord) -> WreResult<Word> {
    if record.phase != CallPhase::ValueStaged {
        return Err(WreError::FrameProtocol { from: record.phase, to: CallPhase::FpRestored });
    }
    let fp = store.fp();
    if store.sp() != balanced_sp(store.stack_growth(), fp) {
        return Err(WreError::UnbalancedFrame { fp, sp: store.sp() });
    }
    let return_address = store.frame_load(RETURN_ADDRESS_OFFSET)?;
    let caller_fp = store.frame_load(SAVED_FP_OFFSET)?;

    store.set_register(VALUE_REGISTER, record.return_value)?;

    record.advance(CallPhase::FpRestored)?;
    store.set_fp(caller_fp);

    // argument slot, then return address and saved FP
    store.release(1)?;
    store.release(2)?;
    record.advance(CallPhase::StackUnwound)?;

    record.return_address = return_address;
    record.advance(CallPhase::Dispatched)?;

    debug!(target: "wre::frame", fp = caller_fp, sp = store.sp(), value = record.return_value, "frame exited");
    Ok(return_address)
}
