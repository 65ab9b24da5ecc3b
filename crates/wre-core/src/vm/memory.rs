//! VM Memory Model
//!
//! Register file and flat memory array. Both are fixed-size and index-checked;
//! an out-of-range index is reported and leaves the array untouched.

use crate::error::{Space, WreError, WreResult};
use super::value::Word;

/// Fixed-capacity register file
#[derive(Debug, Clone)]
pub struct RegisterFile {
    values: Vec<Word>,
}

impl RegisterFile {
    pub fn new(size: usize) -> Self {
        RegisterFile { values: vec![0; size] }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn load(&self, index: usize) -> WreResult<Word> {
        self.values
            .get(index)
            .copied()
            .ok_or_else(|| WreError::bounds(Space::Register, index as i64))
    }

    pub fn store(&mut self, index: usize, value: Word) -> WreResult<()> {
        let slot = self
            .values
            .get_mut(index)
            .ok_or_else(|| WreError::bounds(Space::Register, index as i64))?;
        *slot = value;
        Ok(())
    }

    pub fn clear(&mut self) {
        self.values.fill(0);
    }
}

/// Fixed-capacity word memory: call stack, VM strings and data cells
#[derive(Debug, Clone)]
pub struct Memory {
    cells: Vec<Word>,
}

impl Memory {
    pub fn new(size: usize) -> Self {
        Memory { cells: vec![0; size] }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Translate an address into a cell index
    fn index(&self, address: i64) -> WreResult<usize> {
        if address < 0 || address >= self.cells.len() as i64 {
            return Err(WreError::bounds(Space::Memory, address));
        }
        Ok(address as usize)
    }

    pub fn load(&self, address: Word) -> WreResult<Word> {
        let i = self.index(address as i64)?;
        Ok(self.cells[i])
    }

    pub fn store(&mut self, address: Word, value: Word) -> WreResult<()> {
        let i = self.index(address as i64)?;
        self.cells[i] = value;
        Ok(())
    }

    /// Bytes of the VM string starting at `address`, terminator excluded.
    /// Each cell contributes its low byte.
    pub fn read_string(&self, address: Word) -> WreResult<Vec<u8>> {
        let start = self.index(address as i64)?;
        match self.cells[start..].iter().position(|&c| c == 0) {
            Some(len) => Ok(self.cells[start..start + len].iter().map(|&c| c as u8).collect()),
            None => Err(WreError::UnterminatedString { address: address as i64 }),
        }
    }

    /// Write `bytes` plus a zero terminator starting at `address`.
    /// Returns the number of cells written. Nothing is written unless the
    /// whole string fits.
    pub fn write_string(&mut self, address: Word, bytes: &[u8]) -> WreResult<usize> {
        let start = self.index(address as i64)?;
        let written = bytes.len() + 1;
        self.index(address as i64 + bytes.len() as i64)?;

        for (cell, &b) in self.cells[start..].iter_mut().zip(bytes) {
            *cell = b as Word;
        }
        self.cells[start + bytes.len()] = 0;
        Ok(written)
    }

    pub fn cells(&self) -> &[Word] {
        &self.cells
    }

    pub fn clear(&mut self) {
        self.cells.fill(0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_out_of_range_is_reported() {
        let mut regs = RegisterFile::new(4);
        assert!(regs.store(3, 9).is_ok());
        assert!(matches!(
            regs.store(4, 9),
            Err(WreError::Bounds { space: Space::Register, index: 4 })
        ));
        assert_eq!(regs.load(3).unwrap(), 9);
    }

    #[test]
    fn negative_address_is_out_of_bounds() {
        let mem = Memory::new(8);
        assert!(matches!(
            mem.load(-1),
            Err(WreError::Bounds { space: Space::Memory, index: -1 })
        ));
    }

    #[test]
    fn string_without_terminator_is_rejected() {
        let mut mem = Memory::new(4);
        for a in 0..4 {
            mem.store(a, b'x' as Word).unwrap();
        }
        assert!(matches!(
            mem.read_string(1),
            Err(WreError::UnterminatedString { address: 1 })
        ));
    }

    #[test]
    fn write_string_is_all_or_nothing() {
        let mut mem = Memory::new(4);
        assert!(mem.write_string(1, b"abc").is_err());
        assert!(mem.cells().iter().all(|&c| c == 0));

        assert_eq!(mem.write_string(1, b"ab").unwrap(), 3);
        assert_eq!(mem.read_string(1).unwrap(), b"ab");
    }
}
