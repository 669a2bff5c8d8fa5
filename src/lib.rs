//! # AGC Simulator
//!
//! An instruction-level simulator of a Block II-style Apollo Guidance
//! Computer.
//!
//! The machine works on 15-bit one's-complement words with end-around carry
//! and two representations of zero. Instructions are dispatched one at a time
//! by mnemonic; EXTEND routes the following instruction through a separate
//! table. Each instruction charges a fixed number of abstract machine cycles.

pub mod word;
pub mod cpu;
pub mod io;

#[cfg(feature = "wasm")]
pub mod wasm;

// Re-export commonly used types
pub use word::{Word, WORD_MASK, SIGN_BIT, NEG_ZERO};
pub use cpu::{Agc, CpuError, Mode, Snapshot, Memory, MemoryError, Registers, InterruptFlags, Instruction, Opcode};
pub use io::{Dsky, InterfaceCounters, Peripherals, COUNTER_COUNT};
