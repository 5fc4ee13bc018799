pub mod files;
pub mod mime;
pub mod rules;
pub mod uri;

use std::collections::HashMap;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

pub use files::{FileRecord, FileRegistry, Fingerprint};
pub use rules::{RuleCatalog, RuleRecord};

/// A record identified by a string key.
pub trait Keyed {
    fn key(&self) -> &str;
}

/// Insertion-ordered set of records, unique by key.
///
/// Serializes as a JSON object in insertion order so that repeated
/// conversions of the same input produce identical output.
#[derive(Debug, Clone)]
pub struct KeyedRecords<T> {
    entries: Vec<T>,
    index: HashMap<String, usize>,
}

impl<T> Default for KeyedRecords<T> {
    fn default() -> Self {
        KeyedRecords {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<T: Keyed> KeyedRecords<T> {
    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    #[cfg(test)]
    pub fn get(&self, key: &str) -> Option<&T> {
        self.index.get(key).map(|&i| &self.entries[i])
    }

    /// Insert `record` unless its key is already present. The first record
    /// for a key wins; returns whether the record was inserted.
    pub fn insert_if_absent(&mut self, record: T) -> bool {
        if self.index.contains_key(record.key()) {
            return false;
        }
        self.index
            .insert(record.key().to_string(), self.entries.len());
        self.entries.push(record);
        true
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T: Keyed + Serialize> Serialize for KeyedRecords<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for entry in &self.entries {
            map.serialize_entry(entry.key(), entry)?;
        }
        map.end()
    }
}
