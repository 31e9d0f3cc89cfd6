//! Display name and color resolution for labelled corpses

use crate::core::config::OverlaySettings;
use crate::core::types::MetadataPath;
use crate::render::colors::Color;
use crate::tracking::cache::BoundedCache;

/// Label preferences read from settings once per pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NamePreferences {
    pub use_render_names: bool,
    pub show_all: bool,
}

impl NamePreferences {
    pub fn from_settings(settings: &OverlaySettings) -> Self {
        Self {
            use_render_names: settings.use_render_names,
            show_all: settings.show_all_corpses,
        }
    }
}

/// Uncached label choice between the render name and the trailing path segment
pub fn choose_display_name(id: &MetadataPath, observed_render_name: &str, use_render_names: bool) -> String {
    let metadata_name = id.display_suffix();
    let (preferred, fallback) = if use_render_names {
        (observed_render_name, metadata_name)
    } else {
        (metadata_name, observed_render_name)
    };
    if preferred.is_empty() {
        fallback.to_string()
    } else {
        preferred.to_string()
    }
}

/// Label text for a corpse.
///
/// Show-all mode labels with the full path and skips the cache. Otherwise
/// a cached label wins even if `use_render_names` changed since it was
/// stored; caches are dropped on area change.
pub fn resolve_display_name(
    cache: &mut BoundedCache<String>,
    id: &MetadataPath,
    observed_render_name: &str,
    prefs: NamePreferences,
) -> String {
    if prefs.show_all {
        return id.to_string();
    }
    cache.get_or_insert_with(id, || {
        choose_display_name(id, observed_render_name, prefs.use_render_names)
    })
}

/// Per-spectre color override, or `default`
pub fn resolve_color(settings: &OverlaySettings, id: &MetadataPath, default: Color) -> Color {
    settings.spectre_color(id).unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PREFER_RENDER: NamePreferences = NamePreferences {
        use_render_names: true,
        show_all: false,
    };
    const PREFER_METADATA: NamePreferences = NamePreferences {
        use_render_names: false,
        show_all: false,
    };

    #[test]
    fn test_metadata_suffix_without_render_name() {
        let mut cache = BoundedCache::new(10);
        let id = MetadataPath::from("Metadata/Monsters/Miner/MinerLantern");
        assert_eq!(resolve_display_name(&mut cache, &id, "", PREFER_METADATA), "MinerLantern");
    }

    #[test]
    fn test_render_name_preferred() {
        let mut cache = BoundedCache::new(10);
        let id = MetadataPath::from("Metadata/Monsters/WickerMan/WickerMan");
        assert_eq!(
            resolve_display_name(&mut cache, &id, "Wicker Man", PREFER_RENDER),
            "Wicker Man"
        );
    }

    #[test]
    fn test_falls_back_when_preferred_empty() {
        let id = MetadataPath::from("Metadata/Monsters/WickerMan/WickerMan");
        assert_eq!(choose_display_name(&id, "", true), "WickerMan");
        let trailing = MetadataPath::from("Metadata/Monsters/");
        assert_eq!(choose_display_name(&trailing, "Ghost", false), "Ghost");
    }

    #[test]
    fn test_show_all_returns_full_path_and_bypasses_cache() {
        let mut cache = BoundedCache::new(10);
        let id = MetadataPath::from("Metadata/Monsters/WickerMan/WickerMan");
        let prefs = NamePreferences {
            use_render_names: true,
            show_all: true,
        };
        assert_eq!(
            resolve_display_name(&mut cache, &id, "Wicker Man", prefs),
            "Metadata/Monsters/WickerMan/WickerMan"
        );
        assert!(cache.is_empty());
    }

    #[test]
    fn test_cached_name_survives_preference_change() {
        let mut cache = BoundedCache::new(10);
        let id = MetadataPath::from("Metadata/Monsters/WickerMan/WickerMan");
        resolve_display_name(&mut cache, &id, "Wicker Man", PREFER_RENDER);
        assert_eq!(
            resolve_display_name(&mut cache, &id, "Wicker Man", PREFER_METADATA),
            "Wicker Man"
        );
    }

    #[test]
    fn test_resolve_color_override_and_default() {
        let mut settings = OverlaySettings::default();
        let id = MetadataPath::from("Metadata/Monsters/A/A");
        let fallback = Color::rgb(9, 9, 9);
        assert_eq!(resolve_color(&settings, &id, fallback), fallback);
        *settings.spectre_color_mut(&id) = Color::rgb(1, 1, 1);
        assert_eq!(resolve_color(&settings, &id, fallback), Color::rgb(1, 1, 1));
    }
}
