use super::{normalize_role, RecordSource};
use crate::error::{ResumeError, Result};
use crate::model::ResumeRecord;

/// Fixed records keyed by role. No persistence.
#[derive(Debug, Default)]
pub struct InMemorySource {
    records: Vec<(String, ResumeRecord)>,
}

impl InMemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces the record served for `role`.
    pub fn insert(&mut self, role: &str, record: ResumeRecord) {
        let role = normalize_role(role);
        match self.records.iter_mut().find(|(r, _)| *r == role) {
            Some((_, existing)) => *existing = record,
            None => self.records.push((role, record)),
        }
    }

    pub fn with_record(mut self, role: &str, record: ResumeRecord) -> Self {
        self.insert(role, record);
        self
    }
}

impl RecordSource for InMemorySource {
    fn roles(&self) -> Vec<String> {
        self.records.iter().map(|(role, _)| role.clone()).collect()
    }

    fn get_record(&self, role: &str) -> Result<ResumeRecord> {
        let role = normalize_role(role);
        self.records
            .iter()
            .find(|(r, _)| *r == role)
            .map(|(_, record)| record.clone())
            .ok_or(ResumeError::NotFound(role))
    }
}
