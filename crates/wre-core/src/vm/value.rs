//! Word Representation
//!
//! Every register and memory cell holds one `Word`. Characters, booleans,
//! addresses and labels are all words; floats travel as their bit pattern.

/// The value unit of the register file and the memory array
pub type Word = i32;

/// Reinterpret a float's bits as a word
pub fn float_to_word(value: f32) -> Word {
    value.to_bits() as Word
}

/// Reinterpret a word's bits as a float
pub fn word_to_float(word: Word) -> f32 {
    f32::from_bits(word as u32)
}

/// Canonical boolean word: 1 for true, 0 for false
pub fn bool_to_word(value: bool) -> Word {
    value as Word
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn float_bits_survive_a_word() {
        for v in [0.0f32, -0.0, 3.5, -1.25e-7, f32::MAX, f32::INFINITY] {
            assert_eq!(word_to_float(float_to_word(v)).to_bits(), v.to_bits());
        }
    }
}
