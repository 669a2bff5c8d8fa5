//! AGC central registers.
//!
//! The modeled register file:
//! - A: accumulator
//! - L: lower accumulator (high word of products, division remainder,
//!   partner of double-word exchanges)
//! - Q: return-address register
//! - Z: program counter
//!
//! plus the one-shot EXTEND flag and the machine cycle counter.

use crate::word::{arith, Word};
use serde::{Serialize, Deserialize};

/// The AGC register file.
#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Registers {
    /// A: accumulator
    pub a: Word,

    /// L: extension register
    pub l: Word,

    /// Q: auxiliary register
    pub q: Word,

    /// Z: program counter, changed only by control-flow instructions
    pub pc: Word,

    /// Set by EXTEND; routes the next dispatch to the extended table.
    pub extended_mode: bool,

    /// Operand given to EXTEND, if any. Recorded but not consumed.
    pub extended_address: Option<u16>,

    /// Abstract machine cycles consumed since construction or reset.
    cycles: u64,
}

impl Registers {
    /// Create a new register file with all values zeroed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset all registers, the EXTEND state and the cycle counter.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Cycles consumed so far.
    #[inline]
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Charge `cost` machine cycles. The counter never decreases.
    #[inline]
    pub fn charge(&mut self, cost: u8) {
        self.cycles = self.cycles.saturating_add(cost as u64);
    }

    /// Enter extended mode for the next dispatch.
    pub fn enter_extended(&mut self, address: Option<u16>) {
        self.extended_mode = true;
        self.extended_address = address;
    }

    /// Leave extended mode and forget the pending address.
    pub fn leave_extended(&mut self) {
        self.extended_mode = false;
        self.extended_address = None;
    }

    /// Step the program counter by one with one's-complement addition.
    pub fn skip(&mut self) {
        self.pc = arith::add(self.pc, Word::ONE);
    }

    /// Set the program counter to an absolute address.
    pub fn jump(&mut self, addr: Word) {
        self.pc = addr;
    }
}
