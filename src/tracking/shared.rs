//! State shared between the scan task and the render/editor pass.
//!
//! Each structure sits behind its own mutex, locked only for a single
//! insert, evict, lookup or swap. The epoch lock orders scan commits
//! against area resets so a scan started before a reset cannot write
//! anything after it.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use crate::core::config::OverlaySettings;
use crate::core::types::MetadataPath;
use crate::host::EntityView;
use crate::tracking::allow_list::AllowList;
use crate::tracking::cache::BoundedCache;
use crate::tracking::names::{self, NamePreferences};
use crate::tracking::sightings::RecentSightings;
use crate::tracking::snapshot::{FrameSnapshot, SnapshotCell};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Result of one scan, waiting to be committed
#[derive(Debug, Clone)]
pub struct ScanBatch {
    pub generation: u64,
    pub scanned_at: Instant,
    pub candidates: Vec<EntityView>,
}

/// What a commit changed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommitReport {
    pub published: bool,
    pub candidates: usize,
    pub new_sightings: usize,
}

#[derive(Debug)]
pub struct TrackingState {
    epoch: Mutex<u64>,
    allow_list: Mutex<AllowList>,
    sightings: Mutex<RecentSightings>,
    display_names: Mutex<BoundedCache<String>>,
    render_names: Mutex<BoundedCache<String>>,
    snapshot: SnapshotCell,
}

impl TrackingState {
    pub fn new(settings: &OverlaySettings) -> Self {
        Self {
            epoch: Mutex::new(0),
            allow_list: Mutex::new(AllowList::from_source(&settings.spectre_list_source)),
            sightings: Mutex::new(RecentSightings::new(settings.max_recent_corpses)),
            display_names: Mutex::new(BoundedCache::new(settings.name_cache_capacity)),
            render_names: Mutex::new(BoundedCache::new(settings.name_cache_capacity)),
            snapshot: SnapshotCell::new(),
        }
    }

    pub fn shared(settings: &OverlaySettings) -> Arc<Self> {
        Arc::new(Self::new(settings))
    }

    pub fn generation(&self) -> u64 {
        *lock(&self.epoch)
    }

    /// Drop every transient structure (area change / unload).
    /// Scans started before this call are discarded when they try to commit.
    pub fn reset(&self) -> u64 {
        let mut epoch = lock(&self.epoch);
        *epoch += 1;
        lock(&self.sightings).clear();
        lock(&self.display_names).clear();
        lock(&self.render_names).clear();
        self.snapshot.clear(*epoch);
        *epoch
    }

    /// Bring derived state in line with settings; cheap when nothing changed
    pub fn sync_settings(&self, settings: &OverlaySettings) {
        lock(&self.allow_list).refresh(&settings.spectre_list_source);
        {
            let mut sightings = lock(&self.sightings);
            if sightings.capacity() != settings.max_recent_corpses {
                sightings.set_capacity(settings.max_recent_corpses);
            }
        }
        for cache in [&self.display_names, &self.render_names] {
            let mut cache = lock(cache);
            if cache.capacity() != settings.name_cache_capacity {
                cache.set_capacity(settings.name_cache_capacity);
            }
        }
    }

    pub fn is_known(&self, id: &MetadataPath) -> bool {
        lock(&self.allow_list).contains(id)
    }

    pub fn allow_list_len(&self) -> usize {
        lock(&self.allow_list).len()
    }

    /// Publish a scan: record unknown sightings, cache render names and swap
    /// the snapshot. A batch from an older generation is dropped untouched.
    pub fn commit(&self, batch: ScanBatch) -> CommitReport {
        let epoch = lock(&self.epoch);
        if batch.generation != *epoch {
            tracing::debug!(
                "Dropping stale scan (generation {} < {})",
                batch.generation,
                *epoch
            );
            return CommitReport::default();
        }

        let mut new_sightings = 0;
        for candidate in batch
            .candidates
            .iter()
            .filter(|c| c.is_hostile && c.is_targetable)
        {
            let is_known = self.is_known(&candidate.metadata);
            if lock(&self.sightings).record_if_unknown(&candidate.metadata, is_known) {
                new_sightings += 1;
            }
        }

        for candidate in batch.candidates.iter().filter(|c| !c.render_name.is_empty()) {
            lock(&self.render_names).insert(candidate.metadata.clone(), candidate.render_name.clone());
        }

        let candidates = batch.candidates.len();
        self.snapshot.publish(FrameSnapshot {
            generation: batch.generation,
            scanned_at: Some(batch.scanned_at),
            candidates: batch.candidates,
        });
        drop(epoch);

        CommitReport {
            published: true,
            candidates,
            new_sightings,
        }
    }

    pub fn current_snapshot(&self) -> Arc<FrameSnapshot> {
        self.snapshot.current()
    }

    /// Recent unknown corpse types, most recently seen first
    pub fn recent_sightings(&self) -> Vec<MetadataPath> {
        lock(&self.sightings).newest_first()
    }

    pub fn sighting_count(&self) -> usize {
        lock(&self.sightings).len()
    }

    pub fn promote_sighting(&self, id: &MetadataPath) -> Option<MetadataPath> {
        lock(&self.sightings).promote(id)
    }

    pub fn remove_sighting(&self, id: &MetadataPath) -> bool {
        lock(&self.sightings).remove(id)
    }

    /// Last render name observed for this type during a scan
    pub fn cached_render_name(&self, id: &MetadataPath) -> Option<String> {
        lock(&self.render_names).get(id).cloned()
    }

    pub fn display_name(&self, id: &MetadataPath, observed_render_name: &str, prefs: NamePreferences) -> String {
        names::resolve_display_name(&mut lock(&self.display_names), id, observed_render_name, prefs)
    }

    pub fn display_name_count(&self) -> usize {
        lock(&self.display_names).len()
    }

    pub fn render_name_count(&self) -> usize {
        lock(&self.render_names).len()
    }
}
