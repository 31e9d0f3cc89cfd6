//! Frozen per-scan list of corpse candidates.
//!
//! The scan builds a new snapshot and swaps it in; the render pass clones
//! the `Arc` once and iterates that for the whole frame.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;

use crate::host::EntityView;

/// Entities that passed the corpse filter during one scan.
/// Immutable once published.
#[derive(Debug, Clone)]
pub struct FrameSnapshot {
    pub generation: u64,
    pub scanned_at: Option<Instant>,
    pub candidates: Vec<EntityView>,
}

impl FrameSnapshot {
    pub fn empty(generation: u64) -> Self {
        Self {
            generation,
            scanned_at: None,
            candidates: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

/// Holder of the current snapshot; the lock is held only for the swap or clone
#[derive(Debug)]
pub struct SnapshotCell {
    current: Mutex<Arc<FrameSnapshot>>,
}

impl Default for SnapshotCell {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotCell {
    pub fn new() -> Self {
        Self {
            current: Mutex::new(Arc::new(FrameSnapshot::empty(0))),
        }
    }

    /// Replace the current snapshot, returning the previous one
    pub fn publish(&self, snapshot: FrameSnapshot) -> Arc<FrameSnapshot> {
        let next = Arc::new(snapshot);
        let mut guard = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *guard, next)
    }

    pub fn current(&self) -> Arc<FrameSnapshot> {
        Arc::clone(&self.current.lock().unwrap_or_else(PoisonError::into_inner))
    }

    pub fn clear(&self, generation: u64) {
        self.publish(FrameSnapshot::empty(generation));
    }
}
