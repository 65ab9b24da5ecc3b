//! Word Store
//!
//! The sole state substrate of the machine: register file, memory array,
//! SP/FP and the float scratch cell.

use crate::config::{StackGrowth, WreConfig};
use crate::error::{Space, WreError, WreResult};
use super::memory::{Memory, RegisterFile};
use super::stack::StackCursor;
use super::value::Word;

#[derive(Debug, Clone)]
pub struct WordStore {
    registers: RegisterFile,
    memory: Memory,
    stack: StackCursor,
    fp: Word,
    float_scratch: f32,
}

impl WordStore {
    /// Allocate the store; capacities must fit in a `Word`
    pub fn new(config: &WreConfig) -> WreResult<Self> {
        for (space, capacity) in [(Space::Register, config.register_count), (Space::Memory, config.memory_size)] {
            if capacity > Word::MAX as usize {
                return Err(WreError::CapacityTooLarge { space, capacity });
            }
        }
        let stack = StackCursor::new(config.stack_growth, config.memory_size);
        Ok(WordStore {
            registers: RegisterFile::new(config.register_count),
            memory: Memory::new(config.memory_size),
            fp: stack.initial(),
            stack,
            float_scratch: 0.0,
        })
    }

    // Registers

    pub fn register(&self, index: usize) -> WreResult<Word> {
        self.registers.load(index)
    }

    pub fn set_register(&mut self, index: usize, value: Word) -> WreResult<()> {
        self.registers.store(index, value)
    }

    // Memory

    pub fn load(&self, address: Word) -> WreResult<Word> {
        self.memory.load(address)
    }

    pub fn store(&mut self, address: Word, value: Word) -> WreResult<()> {
        self.memory.store(address, value)
    }

    /// Address `offset` cells away from FP
    pub fn frame_address(&self, offset: Word) -> WreResult<Word> {
        self.fp
            .checked_add(offset)
            .ok_or_else(|| WreError::bounds(Space::Memory, self.fp as i64 + offset as i64))
    }

    pub fn frame_load(&self, offset: Word) -> WreResult<Word> {
        self.load(self.frame_address(offset)?)
    }

    pub fn frame_store(&mut self, offset: Word, value: Word) -> WreResult<()> {
        let address = self.frame_address(offset)?;
        self.store(address, value)
    }

    pub fn read_string(&self, address: Word) -> WreResult<Vec<u8>> {
        self.memory.read_string(address)
    }

    pub fn write_string(&mut self, address: Word, bytes: &[u8]) -> WreResult<usize> {
        self.memory.write_string(address, bytes)
    }

    // Stack

    pub fn push(&mut self, value: Word) -> WreResult<()> {
        let slot = self.stack.push_slot()?;
        self.memory.store(slot, value)
    }

    pub fn pop(&mut self) -> WreResult<Word> {
        let slot = self.stack.pop_slot()?;
        self.memory.load(slot)
    }

    /// Claim `count` contiguous stack words; returns the lowest address
    pub fn reserve(&mut self, count: usize) -> WreResult<Word> {
        self.stack.reserve(count)
    }

    /// Discard `count` stack words without reading them
    pub fn release(&mut self, count: usize) -> WreResult<()> {
        self.stack.release(count).map(|_| ())
    }

    pub fn sp(&self) -> Word {
        self.stack.sp()
    }

    pub fn stack_depth(&self) -> usize {
        self.stack.depth()
    }

    pub fn stack_growth(&self) -> StackGrowth {
        self.stack.growth()
    }

    pub fn fp(&self) -> Word {
        self.fp
    }

    pub fn set_fp(&mut self, fp: Word) {
        self.fp = fp;
    }

    // Float scratch cell

    pub fn stage_float(&mut self, value: f32) {
        self.float_scratch = value;
    }

    pub fn float_scratch(&self) -> f32 {
        self.float_scratch
    }

    /// Zero every register and cell and return SP/FP to their initial values
    pub fn reset(&mut self) {
        self.registers.clear();
        self.memory.clear();
        self.stack.clear();
        self.fp = self.stack.initial();
        self.float_scratch = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_pointers_follow_growth() {
        let up = WordStore::new(&WreConfig::compact()).unwrap();
        assert_eq!((up.sp(), up.fp()), (0, 0));

        let down = WordStore::new(&WreConfig::compact().with_stack_growth(StackGrowth::Downward)).unwrap();
        assert_eq!((down.sp(), down.fp()), (99, 99));
    }

    #[test]
    fn capacities_beyond_word_range_are_rejected() {
        let config = WreConfig { memory_size: Word::MAX as usize + 1, ..WreConfig::compact() };
        assert!(matches!(
            WordStore::new(&config),
            Err(WreError::CapacityTooLarge { space: Space::Memory, .. })
        ));
        let config = WreConfig { memory_size: 10, ..WreConfig::compact() }.with_stack_growth(StackGrowth::Downward);
        assert_eq!(WordStore::new(&config).unwrap().sp(), 9);
    }

    #[test]
    fn push_pop_through_memory() {
        let mut store = WordStore::new(&WreConfig::compact()).unwrap();
        store.push(7).unwrap();
        store.push(-3).unwrap();
        assert_eq!(store.load(1).unwrap(), -3);
        assert_eq!(store.pop().unwrap(), -3);
        assert_eq!(store.pop().unwrap(), 7);
        assert!(store.pop().is_err());
        assert_eq!(store.sp(), 0);
    }

    #[test]
    fn frame_relative_access() {
        let mut store = WordStore::new(&WreConfig::compact()).unwrap();
        store.set_fp(10);
        store.frame_store(-2, 5).unwrap();
        assert_eq!(store.load(8).unwrap(), 5);
        assert_eq!(store.frame_load(-2).unwrap(), 5);
        store.set_fp(1);
        assert!(store.frame_load(-2).is_err());
    }

    #[test]
    fn reset_restores_pristine_state() {
        let mut store = WordStore::new(&WreConfig::compact()).unwrap();
        store.set_register(3, 1).unwrap();
        store.push(1).unwrap();
        store.stage_float(2.5);
        store.reset();
        assert_eq!(store.register(3).unwrap(), 0);
        assert_eq!(store.sp(), 0);
        assert_eq!(store.float_scratch(), 0.0);
    }
}
