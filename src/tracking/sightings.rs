//! Recently seen unknown corpse types
//!
//! A bounded FIFO of distinct metadata paths the user has not put on the
//! allow list yet, offered in the editor for promotion.

use std::collections::VecDeque;

use ahash::AHashSet;

use crate::core::types::MetadataPath;

pub const DEFAULT_CAPACITY: usize = 10;

/// Bounded FIFO plus membership set.
///
/// Every mutation touches both structures, so a path is in the queue
/// exactly when it is in the set.
#[derive(Debug, Clone)]
pub struct RecentSightings {
    capacity: usize,
    order: VecDeque<MetadataPath>,
    members: AHashSet<MetadataPath>,
}

impl Default for RecentSightings {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl RecentSightings {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            order: VecDeque::with_capacity(capacity + 1),
            members: AHashSet::with_capacity(capacity + 1),
        }
    }

    /// Record a corpse type unless it is already known or already listed.
    /// Returns true when a new entry was added.
    pub fn record_if_unknown(&mut self, id: &MetadataPath, is_known: bool) -> bool {
        if is_known || id.is_empty() || self.members.contains(id) {
            return false;
        }
        self.order.push_back(id.clone());
        self.members.insert(id.clone());
        self.evict_overflow();
        true
    }

    /// Look up an entry the user wants to move to the allow list.
    ///
    /// The entry stays listed; the editor decides whether to `remove` it.
    pub fn promote(&self, id: &MetadataPath) -> Option<MetadataPath> {
        self.members
            .contains(id)
            .then(|| self.order.iter().find(|entry| *entry == id).cloned())
            .flatten()
    }

    pub fn remove(&mut self, id: &MetadataPath) -> bool {
        if !self.members.remove(id) {
            return false;
        }
        self.order.retain(|entry| entry != id);
        true
    }

    pub fn clear(&mut self) {
        self.order.clear();
        self.members.clear();
    }

    /// Change the bound, evicting the oldest entries when shrinking
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity.max(1);
        self.evict_overflow();
    }

    fn evict_overflow(&mut self) {
        while self.order.len() > self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.members.remove(&oldest);
            }
        }
    }

    pub fn contains(&self, id: &MetadataPath) -> bool {
        self.members.contains(id)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Oldest first
    pub fn iter(&self) -> impl Iterator<Item = &MetadataPath> {
        self.order.iter()
    }

    /// Most recently seen first, as shown in the editor
    pub fn newest_first(&self) -> Vec<MetadataPath> {
        self.order.iter().rev().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(names: &[&str]) -> Vec<MetadataPath> {
        names.iter().map(|n| MetadataPath::from(*n)).collect()
    }

    #[test]
    fn test_capacity_five_evicts_oldest() {
        let mut recent = RecentSightings::new(5);
        for id in ids(&["A", "B", "C", "D", "E", "F"]) {
            assert!(recent.record_if_unknown(&id, false));
        }
        let listed: Vec<_> = recent.iter().cloned().collect();
        assert_eq!(listed, ids(&["B", "C", "D", "E", "F"]));
        assert!(!recent.contains(&"A".into()));
    }

    #[test]
    fn test_known_is_ignored() {
        let mut recent = RecentSightings::new(5);
        assert!(!recent.record_if_unknown(&"A".into(), true));
        assert!(recent.is_empty());
    }

    #[test]
    fn test_repeat_sighting_does_not_reorder() {
        let mut recent = RecentSightings::new(5);
        recent.record_if_unknown(&"A".into(), false);
        recent.record_if_unknown(&"B".into(), false);
        assert!(!recent.record_if_unknown(&"a".into(), false));
        let listed: Vec<_> = recent.iter().cloned().collect();
        assert_eq!(listed, ids(&["A", "B"]));
    }

    #[test]
    fn test_empty_id_not_recorded() {
        let mut recent = RecentSightings::new(5);
        assert!(!recent.record_if_unknown(&MetadataPath::default(), false));
        assert!(recent.is_empty());
    }

    #[test]
    fn test_newest_first() {
        let mut recent = RecentSightings::new(5);
        for id in ids(&["A", "B", "C"]) {
            recent.record_if_unknown(&id, false);
        }
        assert_eq!(recent.newest_first(), ids(&["C", "B", "A"]));
    }

    #[test]
    fn test_promote_keeps_entry() {
        let mut recent = RecentSightings::new(5);
        recent.record_if_unknown(&"Metadata/Monsters/A".into(), false);
        let promoted = recent.promote(&"metadata/monsters/a".into());
        assert_eq!(promoted.map(|p| p.to_string()), Some("Metadata/Monsters/A".to_string()));
        assert!(recent.contains(&"Metadata/Monsters/A".into()));
        assert!(recent.promote(&"Missing".into()).is_none());
    }

    #[test]
    fn test_remove_keeps_structures_consistent() {
        let mut recent = RecentSightings::new(5);
        for id in ids(&["A", "B", "C"]) {
            recent.record_if_unknown(&id, false);
        }
        assert!(recent.remove(&"b".into()));
        assert!(!recent.remove(&"B".into()));
        assert_eq!(recent.len(), 2);
        assert!(!recent.contains(&"B".into()));
        assert!(recent.record_if_unknown(&"B".into(), false));
    }

    #[test]
    fn test_clear_then_record_again() {
        let mut recent = RecentSightings::new(5);
        recent.record_if_unknown(&"A".into(), false);
        recent.clear();
        assert!(recent.is_empty());
        assert!(!recent.contains(&"A".into()));
        assert!(recent.record_if_unknown(&"A".into(), false));
    }

    #[test]
    fn test_shrinking_capacity_evicts_from_head() {
        let mut recent = RecentSightings::new(10);
        for id in ids(&["A", "B", "C", "D", "E", "F", "G"]) {
            recent.record_if_unknown(&id, false);
        }
        recent.set_capacity(5);
        let listed: Vec<_> = recent.iter().cloned().collect();
        assert_eq!(listed, ids(&["C", "D", "E", "F", "G"]));
        assert_eq!(recent.capacity(), 5);
    }
}
