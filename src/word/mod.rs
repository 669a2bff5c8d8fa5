//! One's-complement word primitives.
//!
//! This module provides the core types for working with AGC words:
//! - [`Word`] - A 15-bit one's-complement value (14 magnitude bits plus sign)
//! - [`arith`] - End-around-carry addition, subtraction, complement and sign tests

mod value;
pub mod arith;

pub use value::{Word, WORD_MASK, SIGN_BIT, NEG_ZERO};
pub use arith::{add, subtract, complement, sign, is_negative, is_zero};
