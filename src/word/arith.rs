//! One's-complement word arithmetic.
//!
//! Provides masking, end-around-carry addition, subtraction, complement and
//! the sign/zero tests used by every instruction handler.

use crate::word::{Word, WORD_MASK};

/// Normalize any wider integer into the word domain.
#[inline]
pub fn mask(value: u32) -> Word {
    Word::from_u32(value)
}

/// One's-complement addition with end-around carry.
///
/// The carry out of bit 15 is folded back into bit 1 until none remains.
/// A negative-zero result is always collapsed to positive zero.
pub fn add(a: Word, b: Word) -> Word {
    let sum = a.raw() as u32 + b.raw() as u32;
    let mut result = sum & WORD_MASK as u32;
    let mut carry = sum >> 15;

    while carry != 0 {
        let sum = result + carry;
        result = sum & WORD_MASK as u32;
        carry = sum >> 15;
    }

    let result = Word::from_u32(result);
    if result == Word::NEG_ZERO {
        Word::ZERO
    } else {
        result
    }
}

/// One's-complement subtraction: `a + !b`.
///
/// Because this goes through [`add`], a negative-zero difference is
/// normalized to positive zero as well, so `subtract(a, a)` is always `+0`.
#[inline]
pub fn subtract(a: Word, b: Word) -> Word {
    add(a, complement(b))
}

/// One's-complement negation: bitwise NOT within 15 bits.
#[inline]
pub fn complement(value: Word) -> Word {
    Word::new(!value.raw())
}

/// `0` for either zero, `-1` when the sign bit is set, `+1` otherwise.
pub fn sign(value: Word) -> i8 {
    if value.is_zero() {
        0
    } else if value.is_negative() {
        -1
    } else {
        1
    }
}

/// True when the sign bit is set, irrespective of magnitude.
#[inline]
pub fn is_negative(value: Word) -> bool {
    value.is_negative()
}

/// True for `+0` and `-0`.
#[inline]
pub fn is_zero(value: Word) -> bool {
    value.is_zero()
}

/// Rotate right by one bit within 15 bits; bit 1 wraps into the top bit.
pub fn cycle_right(value: Word) -> Word {
    let raw = value.raw();
    Word::new((raw >> 1) | ((raw & 1) << 14))
}

/// Logical shift right by one bit.
#[inline]
pub fn shift_right(value: Word) -> Word {
    Word::new(value.raw() >> 1)
}

/// Logical shift left by one bit, dropping whatever leaves bit 15.
#[inline]
pub fn shift_left(value: Word) -> Word {
    Word::new(value.raw() << 1)
}

/// Add the low and high words of two double-precision values.
///
/// The low-word carry is taken from the raw (unfolded) sum of the low words
/// and added into the high-word sum. Returns `(high, low)`.
pub fn double_add(high_a: Word, low_a: Word, high_b: Word, low_b: Word) -> (Word, Word) {
    let carry = if low_a.raw() as u32 + low_b.raw() as u32 > WORD_MASK as u32 { 1 } else { 0 };
    let low = add(low_a, low_b);
    let high = add(add(high_a, high_b), Word::new(carry));
    (high, low)
}

/// Subtract two double-precision values, borrowing when `low_a < low_b`.
/// Returns `(high, low)`.
pub fn double_subtract(high_a: Word, low_a: Word, high_b: Word, low_b: Word) -> (Word, Word) {
    let borrow = if low_a.raw() < low_b.raw() { 1 } else { 0 };
    let low = subtract(low_a, low_b);
    let high = subtract(subtract(high_a, high_b), Word::new(borrow));
    (high, low)
}
