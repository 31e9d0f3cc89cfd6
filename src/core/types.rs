//! Core type definitions used throughout the codebase

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Path marker every monster metadata identifier contains
pub const MONSTER_PATH_MARKER: &str = "/Monsters/";

/// Metadata path naming an entity's type, e.g. `Metadata/Monsters/WickerMan/WickerMan`.
///
/// Equality and hashing ignore ASCII case, so the same path read with
/// different casing maps to one allow-list entry, one sighting and one
/// cache slot. The original spelling is kept for display. Only ASCII
/// letters are folded; metadata paths are ASCII in practice.
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetadataPath(Arc<str>);

impl MetadataPath {
    pub fn new(path: impl Into<Arc<str>>) -> Self {
        Self(path.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether this path lives under the monster metadata tree
    pub fn is_monster_path(&self) -> bool {
        contains_ignore_ascii_case(&self.0, MONSTER_PATH_MARKER)
    }

    /// Trailing path segment (`MinerLantern` for `Metadata/Monsters/Miner/MinerLantern`).
    /// The whole path when there is no separator.
    pub fn display_suffix(&self) -> &str {
        match self.0.rfind('/') {
            Some(idx) => &self.0[idx + 1..],
            None => &self.0,
        }
    }

    /// Lower-cased form used as a persisted map key
    pub fn canonical_key(&self) -> String {
        self.0.to_ascii_lowercase()
    }
}

impl PartialEq for MetadataPath {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }
}

impl Eq for MetadataPath {}

impl Hash for MetadataPath {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for byte in self.0.bytes() {
            state.write_u8(byte.to_ascii_lowercase());
        }
        state.write_u8(0xff);
    }
}

impl fmt::Debug for MetadataPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MetadataPath({:?})", &*self.0)
    }
}

impl fmt::Display for MetadataPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MetadataPath {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for MetadataPath {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

fn contains_ignore_ascii_case(haystack: &str, needle: &str) -> bool {
    let needle = needle.as_bytes();
    if needle.is_empty() {
        return true;
    }
    haystack
        .as_bytes()
        .windows(needle.len())
        .any(|window| window.eq_ignore_ascii_case(needle))
}

/// Identity of a live entity instance inside the host process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityAddress(pub u64);

/// Coarse entity category reported by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityCategory {
    Monster,
    Player,
    Npc,
    Chest,
    Other,
}

#[cfg(test)]
mod tests {
    use super::*;
    use ahash::AHashSet;

    #[test]
    fn test_metadata_path_case_insensitive_equality() {
        let a = MetadataPath::from("Metadata/Monsters/WickerMan/WickerMan");
        let b = MetadataPath::from("metadata/monsters/wickerman/wickerman");
        assert_eq!(a, b);
        assert_ne!(a, MetadataPath::from("Metadata/Monsters/Other/Other"));
    }

    #[test]
    fn test_metadata_path_case_insensitive_hash() {
        let mut set = AHashSet::new();
        set.insert(MetadataPath::from("Metadata/Monsters/WickerMan/WickerMan"));
        assert!(set.contains(&MetadataPath::from("METADATA/MONSTERS/WICKERMAN/WICKERMAN")));
    }

    #[test]
    fn test_display_suffix() {
        let path = MetadataPath::from("Metadata/Monsters/Miner/MinerLantern");
        assert_eq!(path.display_suffix(), "MinerLantern");
        assert_eq!(MetadataPath::from("NoSeparator").display_suffix(), "NoSeparator");
        assert_eq!(MetadataPath::from("Trailing/").display_suffix(), "");
    }

    #[test]
    fn test_monster_path_marker() {
        assert!(MetadataPath::from("Metadata/Monsters/KaomWarrior/KaomWarrior7").is_monster_path());
        assert!(MetadataPath::from("metadata/monsters/x").is_monster_path());
        assert!(!MetadataPath::from("Metadata/Chests/Chest1").is_monster_path());
        assert!(!MetadataPath::default().is_monster_path());
    }

    #[test]
    fn test_metadata_path_serializes_as_plain_string() {
        #[derive(Serialize, Deserialize)]
        struct Entry {
            path: MetadataPath,
        }

        let text = toml::to_string(&Entry {
            path: "Metadata/Monsters/A/A".into(),
        })
        .expect("encode");
        assert_eq!(text.trim(), "path = \"Metadata/Monsters/A/A\"");
        let entry: Entry = toml::from_str(&text).expect("decode");
        assert_eq!(entry.path.as_str(), "Metadata/Monsters/A/A");
    }

    #[test]
    fn test_only_ascii_letters_fold() {
        assert_eq!(MetadataPath::from("Metadata/Monsters/É"), MetadataPath::from("metadata/monsters/É"));
        assert_ne!(MetadataPath::from("Metadata/Monsters/É"), MetadataPath::from("Metadata/Monsters/é"));
    }
}
