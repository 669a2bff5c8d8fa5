//! DSKY input/output queue.

use std::collections::VecDeque;
use crate::word::Word;
use serde::{Serialize, Deserialize};

/// First-in, first-out buffer of words exchanged with the DSKY.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dsky {
    buffer: VecDeque<Word>,
}

impl Dsky {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a word to the back of the queue.
    pub fn input(&mut self, value: Word) {
        self.buffer.push_back(value);
    }

    /// Pop the front of the queue, or `None` when it is empty.
    pub fn output(&mut self) -> Option<Word> {
        self.buffer.pop_front()
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Queued words, front first.
    pub fn iter(&self) -> impl Iterator<Item = &Word> {
        self.buffer.iter()
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }
}
