//! Editable allow list backing the editor window

use crate::core::types::MetadataPath;
use crate::tracking::allow_list::{parse_entries, serialize_entries};

/// Ordered allow-list entries as the user sees them
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpectreList {
    entries: Vec<String>,
}

impl SpectreList {
    pub fn from_source(source: &str) -> Self {
        Self {
            entries: parse_entries(source),
        }
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        let id = id.trim();
        self.entries.iter().any(|entry| entry.eq_ignore_ascii_case(id))
    }

    /// Append a trimmed entry unless it is blank or already listed (any case)
    pub fn add(&mut self, raw: &str) -> bool {
        let entry = raw.trim();
        if entry.is_empty() || self.contains(entry) {
            return false;
        }
        self.entries.push(entry.to_string());
        true
    }

    pub fn add_path(&mut self, id: &MetadataPath) -> bool {
        self.add(id.as_str())
    }

    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| !entry.eq_ignore_ascii_case(id.trim()));
        self.entries.len() != before
    }

    /// Canonical persisted text (`entry1,\nentry2,...`)
    pub fn serialize(&self) -> String {
        serialize_entries(&self.entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_trims_and_rejects_duplicates() {
        let mut list = SpectreList::from_source("Metadata/Monsters/A/A");
        assert!(!list.add("  metadata/monsters/a/a  "));
        assert!(!list.add("   "));
        assert!(list.add("  Metadata/Monsters/B/B "));
        assert_eq!(list.entries(), &["Metadata/Monsters/A/A".to_string(), "Metadata/Monsters/B/B".to_string()]);
    }

    #[test]
    fn test_remove_ignores_case() {
        let mut list = SpectreList::from_source("A,\nB,\nC");
        assert!(list.remove("b"));
        assert!(!list.remove("b"));
        assert_eq!(list.serialize(), "A,\nC");
    }

    #[test]
    fn test_serialize_roundtrip() {
        let list = SpectreList::from_source(" A ,\r\n,B\n\nC,");
        assert_eq!(list.serialize(), "A,\nB,\nC");
        assert_eq!(SpectreList::from_source(&list.serialize()), list);
    }
}
