//! CPU emulation for the AGC.
//!
//! This module implements the modeled Block II machine:
//! - 36864 words of fixed and 2048 words of erasable memory
//! - A, L, Q and Z registers plus a cycle counter
//! - a base instruction table and a one-shot extended table
//! - interrupt enable/pending flags

pub mod memory;
pub mod registers;
pub mod interrupt;
pub mod decode;
pub mod execute;

pub use memory::{Memory, MemoryError, FIXED_SIZE, ERASABLE_SIZE};
pub use registers::Registers;
pub use interrupt::InterruptFlags;
pub use decode::{Instruction, Opcode, OperandKind, Table, DecodeError};
pub use execute::{Agc, CpuError, Mode, Snapshot};
