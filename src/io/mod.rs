//! Peripheral stubs.
//!
//! Two devices hang off the machine, independent of registers and memory:
//! - [`Dsky`] - a FIFO of words standing in for the display/keyboard
//! - [`InterfaceCounters`] - a small indexed bank of counter cells
//!
//! Both are permissive: nothing here ever returns an error.

pub mod dsky;
pub mod counters;

pub use dsky::Dsky;
pub use counters::{InterfaceCounters, COUNTER_COUNT};

use serde::{Serialize, Deserialize};

/// All peripherals attached to one machine.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Peripherals {
    pub dsky: Dsky,
    pub counters: InterfaceCounters,
}

impl Peripherals {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty the DSKY queue and zero every counter.
    pub fn reset(&mut self) {
        self.dsky.clear();
        self.counters.clear();
    }
}
