//! Interrupt enable and pending flags.
//!
//! No vectored dispatch is modeled. A supervising loop is expected to poll
//! [`InterruptFlags::should_service`] between instructions and redirect the
//! program counter itself.

use crate::word::Word;
use serde::{Serialize, Deserialize};

/// Interrupt state set by RELINT/INHINT/EDRUPT/RESUME/INT and by the
/// divide-by-zero fallback of DV.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterruptFlags {
    /// Interrupts are allowed (cleared by INHINT, set by RELINT).
    pub enabled: bool,
    /// An interrupt has been requested and not yet resumed from.
    pub pending: bool,
    /// Placeholder for a future vector address; always zero.
    pub vector: Word,
}

impl InterruptFlags {
    pub fn new() -> Self {
        Self {
            enabled: true,
            pending: false,
            vector: Word::ZERO,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Request an interrupt.
    #[inline]
    pub fn raise(&mut self) {
        self.pending = true;
    }

    /// True when an interrupt is pending and interrupts are enabled.
    pub fn should_service(&self) -> bool {
        self.enabled && self.pending
    }
}

impl Default for InterruptFlags {
    fn default() -> Self {
        Self::new()
    }
}
