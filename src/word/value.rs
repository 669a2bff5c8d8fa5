//! The 15-bit AGC word.
//!
//! Every register and memory cell in the simulator holds a [`Word`]. The
//! constructor masks its input, so no value outside `0..=0x7FFF` can ever be
//! stored.

use std::fmt;
use serde::{Serialize, Deserialize};

/// Mask selecting the 15 bits of a word.
pub const WORD_MASK: u16 = 0x7FFF;

/// The sign bit (bit 15 in AGC numbering, bit 14 here).
pub const SIGN_BIT: u16 = 0x4000;

/// Negative zero: every bit set.
pub const NEG_ZERO: u16 = 0x7FFF;

/// A 15-bit one's-complement word.
///
/// Two bit patterns denote zero: `0o00000` (positive zero) and `0o77777`
/// (negative zero). Equality is bitwise, so the two zeros compare unequal;
/// use [`Word::is_zero`] for the numeric test.
///
/// Deserialization goes through [`Word::new`], so out-of-range input is masked.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "u16", into = "u16")]
pub struct Word(u16);

impl Word {
    /// Positive zero.
    pub const ZERO: Word = Word(0);

    /// Negative zero.
    pub const NEG_ZERO: Word = Word(NEG_ZERO);

    /// Positive one.
    pub const ONE: Word = Word(1);

    /// Create a word, masking the value to 15 bits.
    #[inline]
    pub const fn new(value: u16) -> Self {
        Self(value & WORD_MASK)
    }

    /// Create a word from any wider integer, keeping the low 15 bits.
    #[inline]
    pub const fn from_u32(value: u32) -> Self {
        Self((value & WORD_MASK as u32) as u16)
    }

    /// The raw 15-bit pattern.
    #[inline]
    pub const fn raw(self) -> u16 {
        self.0
    }

    /// True for both `+0` and `-0`.
    #[inline]
    pub const fn is_zero(self) -> bool {
        self.0 == 0 || self.0 == NEG_ZERO
    }

    /// True when the sign bit is set, regardless of magnitude.
    #[inline]
    pub const fn is_negative(self) -> bool {
        self.0 & SIGN_BIT != 0
    }

    /// Interpret the word as a signed integer (`-16383..=16383`).
    pub fn to_i16(self) -> i16 {
        if self.is_negative() {
            -((!self.0 & WORD_MASK) as i16)
        } else {
            self.0 as i16
        }
    }
}

impl From<u16> for Word {
    fn from(value: u16) -> Self {
        Word::new(value)
    }
}

impl From<Word> for u16 {
    fn from(word: Word) -> Self {
        word.0
    }
}

impl fmt::Debug for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Word({:05o} = {})", self.0, self.to_i16())
    }
}

/// AGC listings are octal, so words display as five octal digits.
impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:05o}", self.0)
    }
}

impl fmt::Octal for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Octal::fmt(&self.0, f)
    }
}
