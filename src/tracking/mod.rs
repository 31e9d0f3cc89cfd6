//! Corpse tracking pipeline: allow list, recent sightings, name caches,
//! the periodic scan and the snapshot it publishes.

pub mod allow_list;
pub mod cache;
pub mod index;
pub mod names;
pub mod scanner;
pub mod shared;
pub mod sightings;
pub mod snapshot;

pub use allow_list::{parse_entries, serialize_entries, AllowList};
pub use cache::BoundedCache;
pub use index::{EntityIndex, IndexedSource};
pub use names::{resolve_color, resolve_display_name, NamePreferences};
pub use scanner::{is_corpse_candidate, scan_once, spawn_scan_task, ScanGate, ScanParams, ScanTask};
pub use shared::{CommitReport, ScanBatch, TrackingState};
pub use sightings::RecentSightings;
pub use snapshot::{FrameSnapshot, SnapshotCell};
