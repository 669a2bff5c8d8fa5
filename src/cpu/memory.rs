//! AGC memory subsystem.
//!
//! The Block II AGC had 36K words of fixed (rope) memory and 2K words of
//! erasable (core) memory. Only erasable memory is reachable from the
//! instruction set modeled here; fixed memory is allocated so a future
//! loader has somewhere to put a program.

use crate::word::Word;
use serde::{Serialize, Deserialize};
use thiserror::Error;

/// Words of fixed memory.
pub const FIXED_SIZE: usize = 36_864;

/// Words of erasable memory.
pub const ERASABLE_SIZE: usize = 2048;

/// Fixed and erasable stores.
///
/// Deserialization rejects stores whose lengths differ from
/// [`FIXED_SIZE`] and [`ERASABLE_SIZE`].
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawMemory")]
pub struct Memory {
    fixed: Vec<Word>,
    erasable: Vec<Word>,
}

/// Unchecked wire shape of [`Memory`].
#[derive(Deserialize)]
struct RawMemory {
    fixed: Vec<Word>,
    erasable: Vec<Word>,
}

impl TryFrom<RawMemory> for Memory {
    type Error = MemoryError;

    fn try_from(raw: RawMemory) -> Result<Self, Self::Error> {
        if raw.fixed.len() != FIXED_SIZE {
            return Err(MemoryError::SizeMismatch {
                store: "fixed",
                len: raw.fixed.len(),
                expected: FIXED_SIZE,
            });
        }
        if raw.erasable.len() != ERASABLE_SIZE {
            return Err(MemoryError::SizeMismatch {
                store: "erasable",
                len: raw.erasable.len(),
                expected: ERASABLE_SIZE,
            });
        }
        Ok(Self { fixed: raw.fixed, erasable: raw.erasable })
    }
}

impl Memory {
    /// Create a new memory with all cells zeroed.
    pub fn new() -> Self {
        Self {
            fixed: vec![Word::ZERO; FIXED_SIZE],
            erasable: vec![Word::ZERO; ERASABLE_SIZE],
        }
    }

    /// Check that `addr` names an erasable cell.
    #[inline]
    pub fn check(&self, addr: usize) -> Result<usize, MemoryError> {
        if addr >= ERASABLE_SIZE {
            return Err(MemoryError::AddressOutOfRange { address: addr, size: ERASABLE_SIZE });
        }
        Ok(addr)
    }

    /// Address of the high-order partner of a double-word operand.
    ///
    /// Wraps from the last erasable cell back to cell 0.
    #[inline]
    pub fn partner(addr: usize) -> usize {
        (addr + 1) % ERASABLE_SIZE
    }

    /// Read an erasable cell.
    #[inline]
    pub fn read(&self, addr: usize) -> Result<Word, MemoryError> {
        let index = self.check(addr)?;
        Ok(self.erasable[index])
    }

    /// Write an erasable cell.
    #[inline]
    pub fn write(&mut self, addr: usize, value: Word) -> Result<(), MemoryError> {
        let index = self.check(addr)?;
        self.erasable[index] = value;
        Ok(())
    }

    /// Read the pair `(M[addr], M[(addr + 1) mod 2048])`.
    ///
    /// Only `addr` is range-checked; the partner wraps.
    pub fn read_double(&self, addr: usize) -> Result<(Word, Word), MemoryError> {
        let index = self.check(addr)?;
        Ok((self.erasable[index], self.erasable[Self::partner(index)]))
    }

    /// Write the pair `(M[addr], M[(addr + 1) mod 2048])`.
    pub fn write_double(&mut self, addr: usize, first: Word, second: Word) -> Result<(), MemoryError> {
        let index = self.check(addr)?;
        self.erasable[index] = first;
        self.erasable[Self::partner(index)] = second;
        Ok(())
    }

    /// Read a fixed-memory cell. No instruction uses this yet.
    pub fn read_fixed(&self, addr: usize) -> Result<Word, MemoryError> {
        self.fixed
            .get(addr)
            .copied()
            .ok_or(MemoryError::AddressOutOfRange { address: addr, size: FIXED_SIZE })
    }

    /// The whole erasable store.
    pub fn erasable(&self) -> &[Word] {
        &self.erasable
    }

    /// The whole fixed store.
    pub fn fixed(&self) -> &[Word] {
        &self.fixed
    }

    /// Clear both stores to zeros.
    pub fn clear(&mut self) {
        self.fixed.fill(Word::ZERO);
        self.erasable.fill(Word::ZERO);
    }

    /// Non-zero erasable cells as `(address, value)` pairs (for debugging).
    pub fn dump_nonzero(&self) -> Vec<(usize, Word)> {
        self.erasable
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.raw() != 0)
            .map(|(i, cell)| (i, *cell))
            .collect()
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Memory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Only count non-zero cells
        f.debug_struct("Memory")
            .field("non_zero_erasable", &self.dump_nonzero().len())
            .field("erasable_size", &ERASABLE_SIZE)
            .field("fixed_size", &FIXED_SIZE)
            .finish()
    }
}

/// Errors that can occur during memory operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MemoryError {
    /// Address is outside the addressed store.
    #[error("memory address {address:#o} out of range (store holds {size} words)")]
    AddressOutOfRange { address: usize, size: usize },

    /// A loaded store has the wrong number of words.
    #[error("{store} store holds {len} words, expected {expected}")]
    SizeMismatch { store: &'static str, len: usize, expected: usize },
}
