//! Fixed-capacity checkpoint history
//!
//! A ring buffer with a write cursor. Once full, every push overwrites the
//! oldest slot, so the retained set is always the most recent `capacity`
//! checkpoints.

use super::entities::Checkpoint;

#[derive(Debug, Clone)]
pub struct CheckpointRing {
    slots: Vec<Option<Checkpoint>>,
    /// Next slot to write.
    cursor: usize,
    len: usize,
}

impl CheckpointRing {
    /// Create an empty ring. A capacity of zero is raised to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            slots: vec![None; capacity],
            cursor: 0,
            len: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Append a checkpoint, returning the one it evicted, if any.
    pub fn push(&mut self, checkpoint: Checkpoint) -> Option<Checkpoint> {
        let evicted = self.slots[self.cursor].replace(checkpoint);
        self.cursor = (self.cursor + 1) % self.capacity();
        if self.len < self.capacity() {
            self.len += 1;
        }
        evicted
    }

    /// Most recently pushed checkpoint.
    pub fn latest(&self) -> Option<&Checkpoint> {
        if self.len == 0 {
            return None;
        }
        let idx = (self.cursor + self.capacity() - 1) % self.capacity();
        self.slots[idx].as_ref()
    }

    /// Retained checkpoints, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Checkpoint> + '_ {
        let capacity = self.capacity();
        let start = (self.cursor + capacity - self.len) % capacity;
        (0..self.len).filter_map(move |i| self.slots[(start + i) % capacity].as_ref())
    }

    pub fn to_vec(&self) -> Vec<Checkpoint> {
        self.iter().cloned().collect()
    }
}
