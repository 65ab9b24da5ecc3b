//! VM Stack Cursor
//!
//! Tracks SP over the memory array for either growth direction.
//! Only computes slots; cell contents live in `Memory`.

use crate::config::StackGrowth;
use crate::error::{Space, WreError, WreResult};
use super::value::Word;

/// Stack pointer with its configured bound and direction
#[derive(Debug, Clone)]
pub struct StackCursor {
    sp: Word,
    initial: Word,
    growth: StackGrowth,
    capacity: usize,
}

impl StackCursor {
    /// Create a cursor over `capacity` memory cells
    pub fn new(growth: StackGrowth, capacity: usize) -> Self {
        let initial = match growth {
            StackGrowth::Upward => 0,
            StackGrowth::Downward => capacity as Word - 1,
        };
        StackCursor { sp: initial, initial, growth, capacity }
    }

    /// Next free slot
    pub fn sp(&self) -> Word {
        self.sp
    }

    pub fn initial(&self) -> Word {
        self.initial
    }

    pub fn growth(&self) -> StackGrowth {
        self.growth
    }

    /// Number of words currently on the stack
    pub fn depth(&self) -> usize {
        (self.sp - self.initial).unsigned_abs() as usize
    }

    fn in_memory(&self, slot: i64) -> bool {
        slot >= 0 && slot < self.capacity as i64
    }

    /// Claim `count` slots and return the lowest address of the claimed run
    pub fn reserve(&mut self, count: usize) -> WreResult<Word> {
        let count = count as i64;
        let sp = self.sp as i64;
        let (low, high, next) = match self.growth {
            StackGrowth::Upward => (sp, sp + count - 1, sp + count),
            StackGrowth::Downward => (sp - count + 1, sp, sp - count),
        };
        if count > 0 && !(self.in_memory(low) && self.in_memory(high)) {
            let overflow = match self.growth {
                StackGrowth::Upward => high,
                StackGrowth::Downward => low,
            };
            return Err(WreError::bounds(Space::Stack, overflow));
        }
        self.sp = next as Word;
        Ok(low as Word)
    }

    /// Slot for a single push
    pub fn push_slot(&mut self) -> WreResult<Word> {
        self.reserve(1)
    }

    /// Discard `count` words, returning the slot of the last one discarded
    pub fn release(&mut self, count: usize) -> WreResult<Word> {
        if count > self.depth() {
            return Err(WreError::bounds(Space::Stack, self.beyond_bottom()));
        }
        let count = count as Word;
        self.sp = match self.growth {
            StackGrowth::Upward => self.sp - count,
            StackGrowth::Downward => self.sp + count,
        };
        Ok(self.sp)
    }

    /// Slot of the word a pop would return
    pub fn pop_slot(&mut self) -> WreResult<Word> {
        self.release(1)
    }

    fn beyond_bottom(&self) -> i64 {
        match self.growth {
            StackGrowth::Upward => self.initial as i64 - 1,
            StackGrowth::Downward => self.initial as i64 + 1,
        }
    }

    /// Clear stack
    pub fn clear(&mut self) {
        self.sp = self.initial;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upward_push_and_pop() {
        let mut s = StackCursor::new(StackGrowth::Upward, 4);
        assert_eq!(s.push_slot().unwrap(), 0);
        assert_eq!(s.push_slot().unwrap(), 1);
        assert_eq!(s.sp(), 2);
        assert_eq!(s.pop_slot().unwrap(), 1);
        assert_eq!(s.depth(), 1);
    }

    #[test]
    fn downward_push_and_pop() {
        let mut s = StackCursor::new(StackGrowth::Downward, 4);
        assert_eq!(s.sp(), 3);
        assert_eq!(s.push_slot().unwrap(), 3);
        assert_eq!(s.push_slot().unwrap(), 2);
        assert_eq!(s.pop_slot().unwrap(), 2);
        assert_eq!(s.sp(), 2);
    }

    #[test]
    fn reserve_reports_lowest_slot() {
        let mut up = StackCursor::new(StackGrowth::Upward, 10);
        assert_eq!(up.reserve(3).unwrap(), 0);
        assert_eq!(up.sp(), 3);

        let mut down = StackCursor::new(StackGrowth::Downward, 10);
        assert_eq!(down.reserve(3).unwrap(), 7);
        assert_eq!(down.sp(), 6);
    }

    #[test]
    fn overflow_leaves_sp_unchanged() {
        let mut s = StackCursor::new(StackGrowth::Upward, 2);
        assert!(s.reserve(3).is_err());
        assert_eq!(s.sp(), 0);

        let mut d = StackCursor::new(StackGrowth::Downward, 2);
        d.push_slot().unwrap();
        d.push_slot().unwrap();
        assert!(matches!(
            d.push_slot(),
            Err(WreError::Bounds { space: Space::Stack, index: -1 })
        ));
        assert_eq!(d.sp(), -1);
    }

    #[test]
    fn pop_never_crosses_the_bottom() {
        let mut s = StackCursor::new(StackGrowth::Upward, 4);
        assert!(s.pop_slot().is_err());
        assert_eq!(s.sp(), 0);

        let mut d = StackCursor::new(StackGrowth::Downward, 4);
        assert!(d.release(2).is_err());
        assert_eq!(d.sp(), 3);
    }
}
