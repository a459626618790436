use std::collections::HashSet;

use crate::domain::ReviewRecord;

/// Deduplicating accumulator for one harvest run.
///
/// Records are keyed by `id` and kept in the order they were first seen.
/// A later record with an id already present is dropped whole; fields are
/// never merged. The empty id is an ordinary key.
#[derive(Debug, Default)]
pub struct ReviewCollection {
    seen: HashSet<String>,
    records: Vec<ReviewRecord>,
}

impl ReviewCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record unless its id was already seen.
    ///
    /// Returns true if the record was added.
    pub fn insert(&mut self, record: ReviewRecord) -> bool {
        if self.seen.contains(&record.id) {
            return false;
        }
        self.seen.insert(record.id.clone());
        self.records.push(record);
        true
    }

    /// Insert every record in order, returning how many were new
    pub fn extend<I>(&mut self, records: I) -> usize
    where
        I: IntoIterator<Item = ReviewRecord>,
    {
        let mut added = 0;
        for record in records {
            if self.insert(record) {
                added += 1;
            }
        }
        added
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ReviewRecord> {
        self.records.iter()
    }

    /// Consume the collection, yielding records in first-seen order
    pub fn into_records(self) -> Vec<ReviewRecord> {
        self.records
    }
}
