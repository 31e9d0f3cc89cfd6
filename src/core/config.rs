//! Overlay settings with documented defaults and ranges
//!
//! Every tunable the overlay reads lives here. Settings are persisted as
//! TOML; the host owns the file location and decides when to save.

use std::collections::BTreeMap;
use std::fs;
use std::ops::RangeInclusive;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::{OverlayError, Result};
use crate::core::types::MetadataPath;
use crate::render::colors::{self, Color};

pub const MAX_RECENT_CORPSES_RANGE: RangeInclusive<usize> = 5..=15;
pub const NAME_CACHE_CAPACITY_RANGE: RangeInclusive<usize> = 16..=10_000;
pub const SCAN_INTERVAL_MS_RANGE: RangeInclusive<u64> = 100..=1000;
pub const HIGHLIGHT_RADIUS_RANGE: RangeInclusive<i32> = 5..=50;
pub const HIGHLIGHT_SEGMENTS_RANGE: RangeInclusive<i32> = 3..=40;
pub const HIGHLIGHT_Z_OFFSET_RANGE: RangeInclusive<i32> = -50..=50;
pub const TEXT_Z_OFFSET_RANGE: RangeInclusive<i32> = -360..=360;
pub const DRAW_DISTANCE_RANGE: RangeInclusive<i32> = 0..=2000;

/// Allow list shipped with a fresh install
pub const DEFAULT_SPECTRE_LIST: &str = "Metadata/Monsters/KaomWarrior/KaomWarrior7,\n\
                                        Metadata/Monsters/WickerMan/WickerMan,\n\
                                        Metadata/Monsters/Miner/MinerLantern";

/// Persisted overlay configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlaySettings {
    /// Master switch; when off the overlay neither scans nor draws
    pub enabled: bool,

    /// Label every nearby corpse with its full metadata path,
    /// whether or not it is on the allow list
    pub show_all_corpses: bool,

    /// Prefer the in-game render name over the trailing metadata segment
    pub use_render_names: bool,

    /// Allow list text, entries separated by `,`, `\n` or `\r`
    pub spectre_list_source: String,

    /// Number of unknown corpse types kept in the "Recently Seen" list
    pub max_recent_corpses: usize,

    /// Upper bound on cached display names and observed render names
    pub name_cache_capacity: usize,

    /// Milliseconds between entity scans
    ///
    /// Scanning walks every live entity, so it runs on its own cadence
    /// instead of once per rendered frame.
    pub scan_interval_ms: u64,

    // === HIGHLIGHT ===
    /// Draw a circle outline under each labelled corpse
    pub highlight_corpse: bool,
    pub highlight_color: Color,
    /// Circle radius in screen pixels
    pub highlight_radius: i32,
    /// Number of line segments approximating the circle
    pub highlight_segments: i32,
    /// World-space height added before projecting the circle center
    pub highlight_z_offset: i32,

    // === LABEL ===
    pub text_color: Color,
    pub background_color: Color,
    /// World-space height added before projecting the label anchor
    pub text_z_offset: i32,

    /// Maximum world distance between player and corpse
    pub draw_distance: i32,

    // === EDITOR ===
    /// egui key name toggling the editor window (e.g. "F7")
    pub editor_hotkey: String,
    pub show_editor: bool,

    /// Per-spectre label color overrides keyed by lower-cased metadata path
    ///
    /// Entries are not removed when the spectre leaves the allow list, so a
    /// re-added spectre keeps its color.
    pub spectre_colors: BTreeMap<String, Color>,
}

impl Default for OverlaySettings {
    fn default() -> Self {
        Self {
            enabled: true,
            show_all_corpses: false,
            use_render_names: true,
            spectre_list_source: DEFAULT_SPECTRE_LIST.to_string(),
            max_recent_corpses: 10,
            name_cache_capacity: 1000,
            scan_interval_ms: 250,

            highlight_corpse: true,
            highlight_color: colors::HIGHLIGHT,
            highlight_radius: 12,
            highlight_segments: 12,
            highlight_z_offset: 0,

            text_color: colors::TEXT,
            background_color: colors::LABEL_BACKGROUND,
            text_z_offset: 20,

            draw_distance: 1050,

            editor_hotkey: "F7".to_string(),
            show_editor: false,
            spectre_colors: BTreeMap::new(),
        }
    }
}

impl OverlaySettings {
    /// Create settings with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate every ranged value
    pub fn validate(&self) -> std::result::Result<(), String> {
        fn check<T: PartialOrd + std::fmt::Debug>(
            name: &str,
            value: T,
            range: &RangeInclusive<T>,
        ) -> std::result::Result<(), String> {
            if range.contains(&value) {
                Ok(())
            } else {
                Err(format!(
                    "{} ({:?}) must be within {:?}..={:?}",
                    name,
                    value,
                    range.start(),
                    range.end()
                ))
            }
        }

        check("max_recent_corpses", self.max_recent_corpses, &MAX_RECENT_CORPSES_RANGE)?;
        check("name_cache_capacity", self.name_cache_capacity, &NAME_CACHE_CAPACITY_RANGE)?;
        check("scan_interval_ms", self.scan_interval_ms, &SCAN_INTERVAL_MS_RANGE)?;
        check("highlight_radius", self.highlight_radius, &HIGHLIGHT_RADIUS_RANGE)?;
        check("highlight_segments", self.highlight_segments, &HIGHLIGHT_SEGMENTS_RANGE)?;
        check("highlight_z_offset", self.highlight_z_offset, &HIGHLIGHT_Z_OFFSET_RANGE)?;
        check("text_z_offset", self.text_z_offset, &TEXT_Z_OFFSET_RANGE)?;
        check("draw_distance", self.draw_distance, &DRAW_DISTANCE_RANGE)?;
        Ok(())
    }

    /// Copy with every ranged value clamped into its range and color keys normalized
    pub fn sanitized(mut self) -> Self {
        self.clamp_ranges();
        self.normalize_color_keys();
        self
    }

    /// Clamp every ranged value in place. Returns true if anything changed.
    pub fn clamp_ranges(&mut self) -> bool {
        let mut changed = false;
        changed |= clamp_in_place(&mut self.max_recent_corpses, &MAX_RECENT_CORPSES_RANGE);
        changed |= clamp_in_place(&mut self.name_cache_capacity, &NAME_CACHE_CAPACITY_RANGE);
        changed |= clamp_in_place(&mut self.scan_interval_ms, &SCAN_INTERVAL_MS_RANGE);
        changed |= clamp_in_place(&mut self.highlight_radius, &HIGHLIGHT_RADIUS_RANGE);
        changed |= clamp_in_place(&mut self.highlight_segments, &HIGHLIGHT_SEGMENTS_RANGE);
        changed |= clamp_in_place(&mut self.highlight_z_offset, &HIGHLIGHT_Z_OFFSET_RANGE);
        changed |= clamp_in_place(&mut self.text_z_offset, &TEXT_Z_OFFSET_RANGE);
        changed |= clamp_in_place(&mut self.draw_distance, &DRAW_DISTANCE_RANGE);
        changed
    }

    /// Re-key color overrides by their lower-cased path. When two keys differ
    /// only in case the first in key order wins.
    pub fn normalize_color_keys(&mut self) {
        if self.spectre_colors.keys().all(|key| !key.bytes().any(|b| b.is_ascii_uppercase())) {
            return;
        }
        let mut normalized = BTreeMap::new();
        for (key, color) in std::mem::take(&mut self.spectre_colors) {
            normalized.entry(key.to_ascii_lowercase()).or_insert(color);
        }
        self.spectre_colors = normalized;
    }

    /// Squared draw distance, compared against squared world distances
    pub fn draw_distance_sq(&self) -> f32 {
        let distance = self.draw_distance.max(0) as f32;
        distance * distance
    }

    /// Color override for a spectre, if one was ever assigned
    pub fn spectre_color(&self, id: &MetadataPath) -> Option<Color> {
        self.spectre_colors.get(&id.canonical_key()).copied()
    }

    /// Color override for a spectre, inserting the label color the first time
    pub fn spectre_color_mut(&mut self, id: &MetadataPath) -> &mut Color {
        let default = self.text_color;
        self.spectre_colors.entry(id.canonical_key()).or_insert(default)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let settings: OverlaySettings = toml::from_str(content)?;
        Ok(settings.sanitized())
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

fn clamp_to<T: PartialOrd + Copy>(value: T, range: &RangeInclusive<T>) -> T {
    if value < *range.start() {
        *range.start()
    } else if value > *range.end() {
        *range.end()
    } else {
        value
    }
}

fn clamp_in_place<T: PartialOrd + Copy>(value: &mut T, range: &RangeInclusive<T>) -> bool {
    let clamped = clamp_to(*value, range);
    let changed = clamped != *value;
    *value = clamped;
    changed
}

/// Load settings from a TOML file, falling back to defaults when it does not exist
pub fn load_settings(path: &Path) -> Result<OverlaySettings> {
    if !path.exists() {
        tracing::info!("No settings at {}, using defaults", path.display());
        return Ok(OverlaySettings::default());
    }
    let content = fs::read_to_string(path)?;
    let settings = OverlaySettings::from_toml_str(&content)?;
    tracing::info!("Loaded settings from {}", path.display());
    Ok(settings)
}

/// Write settings to a TOML file, refusing values outside their ranges
pub fn save_settings(path: &Path, settings: &OverlaySettings) -> Result<()> {
    settings.validate().map_err(OverlayError::InvalidSetting)?;
    let payload = settings.to_toml_string()?;
    fs::write(path, payload)?;
    tracing::debug!("Saved settings to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = OverlaySettings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.max_recent_corpses, 10);
        assert_eq!(settings.scan_interval_ms, 250);
        assert_eq!(settings.name_cache_capacity, 1000);
        assert_eq!(settings.draw_distance, 1050);
        assert!(settings.use_render_names);
        assert!(!settings.show_all_corpses);
    }

    #[test]
    fn test_validate_rejects_out_of_range() {
        let settings = OverlaySettings {
            max_recent_corpses: 40,
            ..OverlaySettings::default()
        };
        let err = settings.validate().unwrap_err();
        assert!(err.contains("max_recent_corpses"));
    }

    #[test]
    fn test_sanitized_clamps() {
        let settings = OverlaySettings {
            scan_interval_ms: 5,
            draw_distance: 9000,
            highlight_segments: 1,
            ..OverlaySettings::default()
        }
        .sanitized();
        assert_eq!(settings.scan_interval_ms, 100);
        assert_eq!(settings.draw_distance, 2000);
        assert_eq!(settings.highlight_segments, 3);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_toml_roundtrip_keeps_colors() {
        let mut settings = OverlaySettings::default();
        *settings.spectre_color_mut(&MetadataPath::from("Metadata/Monsters/WickerMan/WickerMan")) =
            Color::rgb(10, 20, 30);
        let text = settings.to_toml_string().expect("encode");
        let parsed = OverlaySettings::from_toml_str(&text).expect("decode");
        assert_eq!(parsed, settings);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let parsed = OverlaySettings::from_toml_str("show_all_corpses = true\n").expect("decode");
        assert!(parsed.show_all_corpses);
        assert_eq!(parsed.spectre_list_source, DEFAULT_SPECTRE_LIST);
    }

    #[test]
    fn test_spectre_color_lookup_ignores_case() {
        let mut settings = OverlaySettings::default();
        *settings.spectre_color_mut(&MetadataPath::from("Metadata/Monsters/A/A")) = Color::rgb(1, 2, 3);
        assert_eq!(
            settings.spectre_color(&MetadataPath::from("metadata/monsters/a/a")),
            Some(Color::rgb(1, 2, 3))
        );
        assert_eq!(settings.spectre_color(&MetadataPath::from("Metadata/Monsters/B/B")), None);
    }

    #[test]
    fn test_persisted_color_keys_match_any_case() {
        let parsed = OverlaySettings::from_toml_str(
            "[spectre_colors]\n\"Metadata/Monsters/A/A\" = [1, 2, 3, 255]\n\"metadata/monsters/a/a\" = [9, 9, 9, 255]\n",
        )
        .expect("decode");
        assert_eq!(parsed.spectre_colors.len(), 1);
        assert_eq!(
            parsed.spectre_color(&MetadataPath::from("Metadata/Monsters/A/A")),
            Some(Color::rgb(1, 2, 3))
        );
        assert_eq!(
            parsed.spectre_color(&MetadataPath::from("METADATA/MONSTERS/A/A")),
            Some(Color::rgb(1, 2, 3))
        );
    }

    #[test]
    fn test_clamp_ranges_in_place() {
        let mut settings = OverlaySettings::default();
        assert!(!settings.clamp_ranges());
        settings.scan_interval_ms = 0;
        settings.name_cache_capacity = 0;
        assert!(settings.clamp_ranges());
        assert_eq!(settings.scan_interval_ms, 100);
        assert_eq!(settings.name_cache_capacity, 16);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_spectre_color_mut_defaults_to_text_color() {
        let mut settings = OverlaySettings::default();
        let color = *settings.spectre_color_mut(&MetadataPath::from("Metadata/Monsters/A/A"));
        assert_eq!(color, settings.text_color);
        assert_eq!(settings.spectre_colors.len(), 1);
    }

    #[test]
    fn test_draw_distance_sq() {
        let settings = OverlaySettings {
            draw_distance: 10,
            ..OverlaySettings::default()
        };
        assert_eq!(settings.draw_distance_sq(), 100.0);
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let settings = load_settings(&dir.path().join("missing.toml")).expect("load");
        assert_eq!(settings, OverlaySettings::default());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("settings.toml");
        let settings = OverlaySettings {
            highlight_radius: 30,
            ..OverlaySettings::default()
        };
        save_settings(&path, &settings).expect("save");
        assert_eq!(load_settings(&path).expect("load"), settings);
    }

    #[test]
    fn test_save_rejects_invalid() {
        let dir = tempfile::tempdir().expect("tempdir");
        let settings = OverlaySettings {
            highlight_radius: 500,
            ..OverlaySettings::default()
        };
        let result = save_settings(&dir.path().join("settings.toml"), &settings);
        assert!(matches!(result, Err(OverlayError::InvalidSetting(_))));
    }
}
