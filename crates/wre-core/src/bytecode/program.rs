//! Program
//!
//! Handler blocks addressed by label plus the data segment that seeds memory.

use crate::capability::CapabilitySet;
use crate::error::{WreError, WreResult};
use crate::vm::value::Word;
use super::instruction::{Callee, Label, Op, Transfer};

/// One labelled handler: straight-line ops and exactly one transfer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub ops: Vec<Op>,
    pub transfer: Transfer,
}

impl Block {
    pub fn new(ops: Vec<Op>, transfer: Transfer) -> Self {
        Block { ops, transfer }
    }
}

/// Memory cell written before execution starts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataCell {
    pub address: Word,
    pub value: Word,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    entry: Label,
    data: Vec<DataCell>,
    blocks: Vec<Block>,
}

impl Program {
    /// Build a program; every statically named label must exist
    pub fn new(entry: Label, blocks: Vec<Block>) -> WreResult<Self> {
        let program = Program { entry, data: Vec::new(), blocks };
        program.validate()?;
        Ok(program)
    }

    pub fn with_data(mut self, data: impl IntoIterator<Item = DataCell>) -> Self {
        self.data.extend(data);
        self
    }

    /// Seed a VM string (cells plus terminator) at `address`
    pub fn with_string(self, address: Word, bytes: &[u8]) -> Self {
        let cells = bytes
            .iter()
            .map(|&b| b as Word)
            .chain(std::iter::once(0))
            .enumerate()
            .map(|(i, value)| DataCell { address: address + i as Word, value });
        self.with_data(cells)
    }

    pub fn entry(&self) -> Label {
        self.entry
    }

    pub fn data(&self) -> &[DataCell] {
        &self.data
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn block(&self, label: Label) -> WreResult<&Block> {
        self.blocks
            .get(label.0 as usize)
            .ok_or(WreError::UnknownLabel(label.0))
    }

    /// Interpret a word as a block address
    pub fn resolve(&self, word: Word) -> WreResult<Label> {
        if word < 0 || word as usize >= self.blocks.len() {
            return Err(WreError::InvalidLabel(word as i64));
        }
        Ok(Label(word as u32))
    }

    /// Capabilities needed by every intrinsic the program calls
    pub fn required_capabilities(&self) -> CapabilitySet {
        let mut set = CapabilitySet::none();
        for block in &self.blocks {
            if let Transfer::Call { callee: Callee::Intrinsic(intrinsic), .. } = block.transfer {
                for capability in intrinsic.required_capabilities() {
                    set.grant(*capability);
                }
            }
        }
        set
    }

    fn validate(&self) -> WreResult<()> {
        self.block(self.entry)?;
        for block in &self.blocks {
            for op in &block.ops {
                if let Op::LoadLabel { label, .. } = op {
                    self.block(*label)?;
                }
            }
            for target in block.transfer.static_targets() {
                self.block(target)?;
            }
        }
        Ok(())
    }
}
