//! Interface counter bank.

use crate::word::Word;
use serde::{Serialize, Deserialize};

/// Number of interface counters.
pub const COUNTER_COUNT: usize = 10;

/// A fixed bank of counter cells addressed by index.
///
/// Out-of-range reads yield `None` and out-of-range writes are dropped.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfaceCounters {
    cells: [Word; COUNTER_COUNT],
}

impl InterfaceCounters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read counter `index`, or `None` when out of range.
    pub fn read(&self, index: usize) -> Option<Word> {
        self.cells.get(index).copied()
    }

    /// Write counter `index`; ignored when out of range.
    pub fn write(&mut self, index: usize, value: Word) {
        if let Some(cell) = self.cells.get_mut(index) {
            *cell = value;
        }
    }

    /// All counters in index order.
    pub fn as_slice(&self) -> &[Word] {
        &self.cells
    }

    pub fn clear(&mut self) {
        self.cells = [Word::ZERO; COUNTER_COUNT];
    }
}
