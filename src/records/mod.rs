//! Input record types shared across the pipeline.
//!
//! These are the already-parsed shapes handed to the core by its
//! collaborators: passage-answer candidates from the dataset annotations,
//! tokenized feature windows from the featurization step, and raw logit
//! records from the model. All three are immutable once constructed.

pub mod language;
pub mod reader;


pub use language::{Language, UnknownLanguageId};
pub use reader::{ReadError, read_features, read_results};

use serde::{Deserialize, Serialize};

/// A pre-defined byte range within an example's passage text. A predicted
/// answer span must fall inside a candidate to be attributed to that passage.
///
/// `plaintext_end_byte` is inclusive in containment checks, per the dataset
/// convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassageCandidate {
    pub plaintext_start_byte: i64,
    pub plaintext_end_byte: i64,
}

impl PassageCandidate {
    /// Whether the byte range `[start, end]` falls inside this candidate.
    pub fn contains(&self, start: i64, end: i64) -> bool {
        self.plaintext_start_byte <= start && self.plaintext_end_byte >= end
    }
}

/// One tokenized, length-bounded window derived from an example. An example
/// may be split into several overlapping windows when its passage exceeds
/// the model's sequence length.
///
/// `wp_start_offset[i]`/`wp_end_offset[i]` map token position `i` back to
/// byte offsets in the original passage; [`SENTINEL_OFFSET`] marks positions
/// (separators, padding) that can never anchor an answer.
///
/// [`SENTINEL_OFFSET`]: crate::constants::SENTINEL_OFFSET
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    pub unique_id: i64,
    /// Id of the owning example.
    pub example_index: i64,
    pub language_id: i64,
    pub wp_start_offset: Vec<i64>,
    pub wp_end_offset: Vec<i64>,
}

/// The model's output for one [`Feature`], matched up by `unique_id`.
/// Logit arrays are indexed by token position, same length and indexing as
/// the feature's offset arrays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawResult {
    pub unique_id: i64,
    pub start_logits: Vec<f32>,
    pub end_logits: Vec<f32>,
    pub answer_type_logits: Vec<f32>,
}

/// A contiguous byte range in an example's passage proposed as an answer.
/// Half-open: `end_byte_offset` is one past the last answer byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub start_byte_offset: i64,
    pub end_byte_offset: i64,
}
