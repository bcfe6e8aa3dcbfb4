//! Deduplicating, capped merge of candidate streams

use std::collections::HashMap;

use crate::types::{CandidateRecord, Suggestion};

/// Key under which two candidates count as the same suggestion
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DedupKey {
    Text(String),
    Tokens(Vec<String>),
}

impl DedupKey {
    pub fn of(record: &CandidateRecord, by_tokens: bool) -> Self {
        if by_tokens {
            DedupKey::Tokens(record.tokens().to_vec())
        } else {
            DedupKey::Text(record.text().to_string())
        }
    }
}

/// Merges candidates into at most `max_size` distinct entries, in
/// first-seen order.
///
/// A duplicate keeps the first record's tokens and text and unions its
/// provenance into it. Once the cap is reached, merging stops outright:
/// later candidates, duplicate or not, are not looked at.
#[derive(Debug, Clone)]
pub struct Aggregator {
    max_size: usize,
    dedup_by_tokens: bool,
    index: HashMap<DedupKey, usize>,
    records: Vec<CandidateRecord>,
}

impl Aggregator {
    pub fn new(max_size: usize, dedup_by_tokens: bool) -> Self {
        Self {
            max_size,
            dedup_by_tokens,
            index: HashMap::new(),
            records: Vec::new(),
        }
    }

    /// Merge `incoming`, returning how many new distinct entries were admitted.
    ///
    /// Iteration stops as soon as the cap is reached, so a lazy source is not
    /// pulled further than needed.
    pub fn merge<I>(&mut self, incoming: I) -> usize
    where
        I: IntoIterator<Item = CandidateRecord>,
    {
        let mut admitted = 0;
        for record in incoming {
            if self.is_full() {
                break;
            }
            let key = DedupKey::of(&record, self.dedup_by_tokens);
            match self.index.get(&key) {
                Some(&pos) => self.records[pos].absorb(&record),
                None => {
                    self.index.insert(key, self.records.len());
                    self.records.push(record);
                    admitted += 1;
                }
            }
        }
        admitted
    }

    pub fn is_full(&self) -> bool {
        self.records.len() >= self.max_size
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[CandidateRecord] {
        &self.records
    }

    pub fn into_suggestions(self) -> Vec<Suggestion> {
        self.records
            .into_iter()
            .map(CandidateRecord::into_suggestion)
            .collect()
    }
}
