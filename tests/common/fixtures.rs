//! Test fixtures for integration tests.

use tydi_postproc::{Feature, PassageCandidate, RawResult};

pub const DEFAULT_LANGUAGE_ID: i64 = 0;

pub fn candidate(start: i64, end: i64) -> PassageCandidate {
    PassageCandidate {
        plaintext_start_byte: start,
        plaintext_end_byte: end,
    }
}

#[derive(Default)]
pub struct FeatureBuilder {
    unique_id: Option<i64>,
    example_index: Option<i64>,
    language_id: Option<i64>,
    wp_start_offset: Option<Vec<i64>>,
    wp_end_offset: Option<Vec<i64>>,
}

impl FeatureBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn unique_id(mut self, id: i64) -> Self {
        self.unique_id = Some(id);
        self
    }

    pub fn example_index(mut self, id: i64) -> Self {
        self.example_index = Some(id);
        self
    }

    pub fn language_id(mut self, id: i64) -> Self {
        self.language_id = Some(id);
        self
    }

    pub fn offsets(mut self, starts: Vec<i64>, ends: Vec<i64>) -> Self {
        self.wp_start_offset = Some(starts);
        self.wp_end_offset = Some(ends);
        self
    }

    /// Offsets for `n` content tokens of 5 bytes each, preceded by a
    /// sentinel CLS position.
    pub fn with_content_tokens(self, n: usize) -> Self {
        let mut starts = vec![-1];
        let mut ends = vec![-1];
        for i in 0..n as i64 {
            starts.push(i * 5);
            ends.push(i * 5 + 4);
        }
        self.offsets(starts, ends)
    }

    pub fn build(self) -> Feature {
        let unique_id = self.unique_id.unwrap_or(0);
        Feature {
            unique_id,
            example_index: self.example_index.unwrap_or(unique_id),
            language_id: self.language_id.unwrap_or(DEFAULT_LANGUAGE_ID),
            wp_start_offset: self.wp_start_offset.unwrap_or_else(|| vec![-1, 0]),
            wp_end_offset: self.wp_end_offset.unwrap_or_else(|| vec![-1, 4]),
        }
    }
}

#[derive(Default)]
pub struct ResultBuilder {
    unique_id: Option<i64>,
    start_logits: Option<Vec<f32>>,
    end_logits: Option<Vec<f32>>,
    answer_type_logits: Option<Vec<f32>>,
}

impl ResultBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn unique_id(mut self, id: i64) -> Self {
        self.unique_id = Some(id);
        self
    }

    pub fn logits(mut self, starts: Vec<f32>, ends: Vec<f32>) -> Self {
        self.start_logits = Some(starts);
        self.end_logits = Some(ends);
        self
    }

    /// Logits that make token `peak` the clear best start and end position.
    pub fn with_peak_at(self, positions: usize, peak: usize) -> Self {
        let mut starts = vec![0.0; positions];
        let mut ends = vec![0.0; positions];
        starts[peak] = 10.0;
        ends[peak] = 10.0;
        self.logits(starts, ends)
    }

    pub fn build(self) -> RawResult {
        RawResult {
            unique_id: self.unique_id.unwrap_or(0),
            start_logits: self.start_logits.unwrap_or_else(|| vec![0.0, 1.0]),
            end_logits: self.end_logits.unwrap_or_else(|| vec![0.0, 1.0]),
            answer_type_logits: self.answer_type_logits.unwrap_or_else(|| vec![0.0]),
        }
    }
}

/// JSONL line for one example's candidate list, as the annotation split
/// stores it.
pub fn candidates_jsonl_line(example_id: i64, candidates: &[PassageCandidate]) -> String {
    let entries: Vec<String> = candidates
        .iter()
        .map(|c| {
            format!(
                r#"{{"plaintext_start_byte": {}, "plaintext_end_byte": {}}}"#,
                c.plaintext_start_byte, c.plaintext_end_byte
            )
        })
        .collect();
    format!(
        r#"{{"example_id": {}, "passage_answer_candidates": [{}]}}"#,
        example_id,
        entries.join(", ")
    )
}
