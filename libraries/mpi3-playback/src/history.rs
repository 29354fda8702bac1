//! Shuffle history tracking
//!
//! Maintains a bounded history of queue positions left by shuffle draws, so
//! "previous" under shuffle walks back through what was actually played.

use std::collections::VecDeque;

/// Shuffle history with bounded size
///
/// Ring buffer of queue indices. Oldest entries are discarded when full.
#[derive(Debug, Clone)]
pub struct ShuffleHistory {
    /// History buffer (most recent = back)
    indices: VecDeque<usize>,

    /// Maximum history size
    max_size: usize,
}

impl ShuffleHistory {
    /// Create new history with specified maximum size
    pub fn new(max_size: usize) -> Self {
        Self {
            indices: VecDeque::with_capacity(max_size),
            max_size,
        }
    }

    /// Record a queue index
    ///
    /// If history is full, the oldest index is discarded
    pub fn push(&mut self, index: usize) {
        if self.max_size == 0 {
            return;
        }
        if self.indices.len() >= self.max_size {
            self.indices.pop_front();
        }
        self.indices.push_back(index);
    }

    /// Pop the most recent index
    pub fn pop(&mut self) -> Option<usize> {
        self.indices.pop_back()
    }

    /// Most recent index without removing it
    pub fn peek(&self) -> Option<usize> {
        self.indices.back().copied()
    }

    /// Number of recorded indices
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Check if history is empty
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Clear all history
    pub fn clear(&mut self) {
        self.indices.clear();
    }

    /// Get maximum history size
    pub fn max_size(&self) -> usize {
        self.max_size
    }
}

impl Default for ShuffleHistory {
    fn default() -> Self {
        Self::new(50)
    }
}
