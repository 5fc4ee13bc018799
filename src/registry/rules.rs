use tracing::debug;

use super::{Keyed, KeyedRecords};

/// Metadata for one defect class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleRecord {
    pub id: String,
    pub display_name: String,
}

impl Keyed for RuleRecord {
    fn key(&self) -> &str {
        &self.id
    }
}

/// Rules seen during a run, deduplicated by id.
#[derive(Debug, Clone, Default)]
pub struct RuleCatalog {
    records: KeyedRecords<RuleRecord>,
}

impl RuleCatalog {
    /// Register a rule. A later registration under an existing id is ignored,
    /// including its display name.
    pub fn register(&mut self, id: &str, display_name: &str) -> bool {
        if self.records.contains(id) {
            return false;
        }
        debug!("New rule: {}", id);
        self.records.insert_if_absent(RuleRecord {
            id: id.to_string(),
            display_name: display_name.to_string(),
        })
    }

    #[cfg(test)]
    pub fn get(&self, id: &str) -> Option<&RuleRecord> {
        self.records.get(id)
    }

    pub fn into_records(self) -> KeyedRecords<RuleRecord> {
        self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
