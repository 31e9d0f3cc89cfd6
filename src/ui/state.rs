//! Editor state and the edits it applies to settings

use crate::core::config::OverlaySettings;
use crate::core::types::MetadataPath;
use crate::tracking::shared::TrackingState;
use crate::ui::list::SpectreList;

/// One user edit collected while drawing, applied after the frame's widgets
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorAction {
    /// Delete an allow-list entry
    Delete(String),
    /// Add whatever is in the input buffer
    AddTyped,
    /// Move a recently seen corpse type onto the allow list
    Promote(MetadataPath),
}

/// Editor window state
#[derive(Debug, Default)]
pub struct EditorState {
    /// Text input buffer for new entries
    pub new_entry: String,
}

impl EditorState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply an edit; any structural change rewrites `spectre_list_source`
    /// and refreshes the tracking allow list. Returns true if the list changed.
    ///
    /// A promoted sighting is dropped from the recent list even if it was
    /// already on the allow list.
    pub fn apply(&mut self, action: EditorAction, settings: &mut OverlaySettings, tracking: &TrackingState) -> bool {
        let mut list = SpectreList::from_source(&settings.spectre_list_source);
        let changed = match action {
            EditorAction::Delete(entry) => list.remove(&entry),
            EditorAction::AddTyped => {
                let added = list.add(&self.new_entry);
                if added {
                    self.new_entry.clear();
                }
                added
            }
            EditorAction::Promote(id) => {
                let added = match tracking.promote_sighting(&id) {
                    Some(entry) => list.add_path(&entry),
                    None => list.add_path(&id),
                };
                tracking.remove_sighting(&id);
                added
            }
        };

        if changed {
            settings.spectre_list_source = list.serialize();
            tracking.sync_settings(settings);
            tracing::info!("Spectre list now has {} entries", list.len());
        }
        changed
    }
}
