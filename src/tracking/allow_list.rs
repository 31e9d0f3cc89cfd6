//! User-maintained allow list of spectre metadata paths.
//!
//! The persisted form is free text; the matcher keeps a parsed set and only
//! rebuilds it when the text changes.

use ahash::AHashSet;

use crate::core::types::MetadataPath;

const DELIMITERS: [char; 3] = [',', '\n', '\r'];
const SEPARATOR: &str = ",\n";

/// Trimmed, non-empty tokens of an allow-list text, in order
pub fn split_entries(text: &str) -> impl Iterator<Item = &str> {
    text.split(&DELIMITERS[..])
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Ordered entries with case-insensitive duplicates removed (first spelling wins)
pub fn parse_entries(text: &str) -> Vec<String> {
    let mut seen = AHashSet::new();
    split_entries(text)
        .filter(|token| seen.insert(MetadataPath::from(*token)))
        .map(str::to_string)
        .collect()
}

/// Canonical persisted form: entries joined by `",\n"`
pub fn serialize_entries<S: AsRef<str>>(entries: &[S]) -> String {
    entries
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(SEPARATOR)
}

/// Parsed allow list cached against the text it was built from
#[derive(Debug, Default, Clone)]
pub struct AllowList {
    source: String,
    entries: AHashSet<MetadataPath>,
    rebuilds: u64,
}

impl AllowList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_source(source: &str) -> Self {
        let mut list = Self::new();
        list.refresh(source);
        list
    }

    /// Rebuild the set if `source` differs from the text it was last built from.
    /// Returns true when a rebuild happened.
    pub fn refresh(&mut self, source: &str) -> bool {
        if self.rebuilds > 0 && self.source == source {
            return false;
        }
        self.source.clear();
        self.source.push_str(source);
        self.entries = split_entries(source).map(MetadataPath::from).collect();
        self.rebuilds += 1;
        true
    }

    pub fn contains(&self, id: &MetadataPath) -> bool {
        !id.is_empty() && self.entries.contains(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// How many times the set has been rebuilt
    pub fn rebuild_count(&self) -> u64 {
        self.rebuilds
    }

    pub fn iter(&self) -> impl Iterator<Item = &MetadataPath> {
        self.entries.iter()
    }
}
