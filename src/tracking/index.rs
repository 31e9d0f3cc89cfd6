//! Live monster index fed by entity add/remove notifications.
//!
//! For hosts that announce entities as they stream in and out instead of
//! offering a full enumeration. The index only remembers which addresses
//! are monsters; their state (dead, hostile, position) is always read
//! through the host's per-address lookup, so a monster added alive is seen
//! dead as soon as it dies.

use std::sync::{Arc, PoisonError, RwLock};

use ahash::AHashSet;

use crate::core::types::{EntityAddress, EntityCategory};
use crate::host::{EntitySource, EntityView};

#[derive(Debug, Default)]
pub struct EntityIndex {
    monsters: RwLock<AHashSet<EntityAddress>>,
}

impl EntityIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track a newly streamed-in entity. Non-monsters and null addresses are ignored.
    pub fn on_added(&self, view: &EntityView) -> bool {
        if view.category != EntityCategory::Monster || view.address.0 == 0 {
            return false;
        }
        self.monsters
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(view.address)
    }

    pub fn on_removed(&self, address: EntityAddress) -> bool {
        self.monsters
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&address)
    }

    pub fn contains(&self, address: EntityAddress) -> bool {
        self.monsters
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(&address)
    }

    /// Tracked addresses in ascending order
    pub fn addresses(&self) -> Vec<EntityAddress> {
        let mut addresses: Vec<EntityAddress> = self
            .monsters
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .copied()
            .collect();
        addresses.sort_unstable();
        addresses
    }

    pub fn clear(&self) {
        self.monsters.write().unwrap_or_else(PoisonError::into_inner).clear();
    }

    pub fn len(&self) -> usize {
        self.monsters.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Entity source restricted to the indexed monsters, resolving each one
/// through `live` on every read
#[derive(Debug, Clone)]
pub struct IndexedSource<S> {
    index: Arc<EntityIndex>,
    live: S,
}

impl<S: EntitySource> IndexedSource<S> {
    pub fn new(index: Arc<EntityIndex>, live: S) -> Self {
        Self { index, live }
    }
}

impl<S: EntitySource> EntitySource for IndexedSource<S> {
    fn live_entities(&self) -> Vec<EntityView> {
        self.index
            .addresses()
            .into_iter()
            .filter_map(|address| self.live.entity(address))
            .collect()
    }

    fn entity(&self, address: EntityAddress) -> Option<EntityView> {
        if self.index.contains(address) {
            self.live.entity(address)
        } else {
            None
        }
    }
}
