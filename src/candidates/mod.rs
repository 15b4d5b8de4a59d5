//! Read-only store of passage-answer candidates, keyed by example id.


use std::collections::BTreeMap;
use std::io::BufRead;

use serde::Deserialize;

use crate::records::reader::{ReadError, read_jsonl};
use crate::records::PassageCandidate;

/// One line of the candidates JSONL split. Annotation files carry more
/// fields than these; the rest are ignored.
#[derive(Debug, Deserialize)]
struct CandidateLine {
    example_id: i64,
    passage_answer_candidates: Vec<PassageCandidate>,
}

/// Maps each example id to its ordered list of passage-answer candidates.
///
/// Candidate ordinals are list positions; the Span Scorer reports the index
/// of the first candidate containing the winning span. Loaded once from the
/// annotation source and never mutated afterwards.
#[derive(Debug, Clone, Default)]
pub struct CandidateStore {
    candidates: BTreeMap<i64, Vec<PassageCandidate>>,
}

impl CandidateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the store from a JSONL reader where each line carries an
    /// `example_id` and its `passage_answer_candidates`.
    pub fn from_jsonl<R: BufRead>(reader: R) -> Result<Self, ReadError> {
        let lines: Vec<CandidateLine> = read_jsonl(reader)?;
        let mut store = Self::new();
        for line in lines {
            store.insert(line.example_id, line.passage_answer_candidates);
        }
        Ok(store)
    }

    /// Registers the candidate list for one example. A repeated example id
    /// replaces the previous list.
    pub fn insert(&mut self, example_id: i64, candidates: Vec<PassageCandidate>) {
        self.candidates.insert(example_id, candidates);
    }

    pub fn get(&self, example_id: i64) -> Option<&[PassageCandidate]> {
        self.candidates.get(&example_id).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Iterates `(example_id, candidates)` in ascending example-id order.
    pub fn iter(&self) -> impl Iterator<Item = (i64, &[PassageCandidate])> {
        self.candidates.iter().map(|(id, c)| (*id, c.as_slice()))
    }

    /// Consumes the store in ascending example-id order.
    pub fn into_iter_sorted(self) -> impl Iterator<Item = (i64, Vec<PassageCandidate>)> {
        self.candidates.into_iter()
    }
}
