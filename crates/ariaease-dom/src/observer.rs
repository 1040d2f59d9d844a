//! Mutation Observation
//!
//! Records every attribute write made through the DOM surface, including
//! writes that store an unchanged value.

use crate::NodeId;

/// Attribute mutation record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationRecord {
    pub target: NodeId,
    pub attribute_name: String,
    pub old_value: Option<String>,
    /// None when the attribute was removed
    pub new_value: Option<String>,
}

impl MutationRecord {
    /// Write stored the value that was already present
    pub fn is_redundant(&self) -> bool {
        self.old_value == self.new_value
    }
}

/// Append-only mutation log
#[derive(Debug, Default)]
pub struct MutationLog {
    records: Vec<MutationRecord>,
}

impl MutationLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: MutationRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[MutationRecord] {
        &self.records
    }

    pub fn take_records(&mut self) -> Vec<MutationRecord> {
        std::mem::take(&mut self.records)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
