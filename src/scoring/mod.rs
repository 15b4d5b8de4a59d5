//! Beam-search span selection over one example's raw logits.
//!
//! For each feature/result pair the scorer ranks the top `candidate_beam`
//! start and end token positions, enumerates their Cartesian product under
//! validity constraints, and calibrates each surviving span's score against
//! the model's position-0 (CLS) "no valid span" baseline. The best span
//! across all of the example's windows is translated to byte offsets and
//! resolved to the first passage candidate containing it.

pub mod error;

#[cfg(test)]
mod tests;

pub use error::ScoringError;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::constants::{DEFAULT_CANDIDATE_BEAM, DEFAULT_MAX_ANSWER_LENGTH, SENTINEL_OFFSET};
use crate::join::EvalExample;
use crate::records::{Language, Span};

/// Tunables for span selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoringOptions {
    /// Number of top start/end token positions kept per feature window.
    pub candidate_beam: usize,
    /// Inclusive cap on answer span length, in tokens.
    pub max_answer_length: usize,
}

impl Default for ScoringOptions {
    fn default() -> Self {
        Self {
            candidate_beam: DEFAULT_CANDIDATE_BEAM,
            max_answer_length: DEFAULT_MAX_ANSWER_LENGTH,
        }
    }
}

/// Yes/no answer classification. Always [`YesNoAnswer::None`] here; yes/no
/// classification happens outside this crate, but the field is part of the
/// prediction contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum YesNoAnswer {
    None,
}

/// The final prediction for one example, in the exact shape the evaluation
/// script consumes. Field names and nesting are a compatibility contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictedLabel {
    pub example_id: i64,
    pub language: Language,
    /// Ordinal of the chosen candidate in the example's candidate list.
    pub passage_answer_index: usize,
    pub passage_answer_score: f32,
    pub minimal_answer: Span,
    pub minimal_answer_score: f32,
    pub yes_no_answer: YesNoAnswer,
}

/// Scorer output for one example: the predicted label plus the raw scores
/// it was derived from.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreSummary {
    pub predicted_label: PredictedLabel,
    /// Uncalibrated `start + end` logit sum of the winning span.
    pub minimal_span_score: f32,
    /// `start_logits[0] + end_logits[0]` of the winning span's window.
    pub cls_token_score: f32,
    /// Answer-type logits of the winning span's result.
    pub answer_type_logits: Vec<f32>,
}

/// One surviving span from the beam enumeration, before global selection.
struct SpanCandidate<'a> {
    rank_score: f32,
    minimal_span_score: f32,
    cls_token_score: f32,
    answer_type_logits: &'a [f32],
    language: Language,
    start_offset: i64,
    end_offset: i64,
}

/// Indexes of the `beam` largest logits, position 0 excluded.
///
/// Position 0 is the classification anchor and is never a span endpoint;
/// its score enters the ranking only as the CLS baseline. The sort is
/// stable, so equal logits keep ascending-index order.
fn best_indexes(logits: &[f32], beam: usize) -> Vec<usize> {
    let mut indexed: Vec<(usize, f32)> = logits
        .iter()
        .enumerate()
        .skip(1)
        .map(|(i, &score)| (i, score))
        .collect();
    indexed.sort_by(|a, b| b.1.total_cmp(&a.1));
    indexed.truncate(beam);
    indexed.into_iter().map(|(i, _)| i).collect()
}

/// Selects the best valid answer span for one example and resolves it to a
/// passage candidate.
///
/// Returns `Ok(None)` (with a warning) when the example cannot contribute a
/// prediction: no results, feature/result count mismatch, a result without
/// its feature, malformed logit/offset arrays, or no span surviving the
/// validity filters. Ties on the calibrated score keep the first span
/// encountered.
pub fn score(
    example: &EvalExample,
    options: &ScoringOptions,
) -> Result<Option<ScoreSummary>, ScoringError> {
    if example.results.is_empty() {
        warn!(example_id = example.example_id, "example has no results");
        return Ok(None);
    }
    if example.features.len() != example.results.len() {
        warn!(
            example_id = example.example_id,
            features = example.features.len(),
            results = example.results.len(),
            "feature/result count mismatch"
        );
        return Ok(None);
    }

    let mut best: Option<SpanCandidate<'_>> = None;

    for (key, result) in &example.results {
        let Some(feature) = example.features.get(key) else {
            warn!(
                example_id = example.example_id,
                key, "no feature found for result"
            );
            return Ok(None);
        };

        let positions = result.start_logits.len();
        if positions == 0
            || result.end_logits.len() != positions
            || feature.wp_start_offset.len() != positions
            || feature.wp_end_offset.len() != positions
        {
            warn!(
                example_id = example.example_id,
                key, "logit/offset array length mismatch"
            );
            return Ok(None);
        }

        let language = Language::from_id(feature.language_id)?;
        let start_indexes = best_indexes(&result.start_logits, options.candidate_beam);
        let end_indexes = best_indexes(&result.end_logits, options.candidate_beam);
        let cls_token_score = result.start_logits[0] + result.end_logits[0];

        for &start_index in &start_indexes {
            for &end_index in &end_indexes {
                if end_index < start_index {
                    continue;
                }
                if feature.wp_start_offset[start_index] == SENTINEL_OFFSET {
                    continue;
                }
                if feature.wp_end_offset[end_index] == SENTINEL_OFFSET {
                    continue;
                }
                let length = end_index - start_index + 1;
                if length > options.max_answer_length {
                    continue;
                }

                let minimal_span_score =
                    result.start_logits[start_index] + result.end_logits[end_index];
                // Span logits minus the CLS logits calibrate against the
                // model's implicit no-answer confidence.
                let rank_score = minimal_span_score - cls_token_score;

                let is_better = match &best {
                    Some(current) => rank_score > current.rank_score,
                    None => true,
                };
                if is_better {
                    best = Some(SpanCandidate {
                        rank_score,
                        minimal_span_score,
                        cls_token_score,
                        answer_type_logits: &result.answer_type_logits,
                        language,
                        start_offset: feature.wp_start_offset[start_index],
                        // Half-open byte range.
                        end_offset: feature.wp_end_offset[end_index] + 1,
                    });
                }
            }
        }
    }

    let Some(winner) = best else {
        warn!(example_id = example.example_id, "no valid span survived");
        return Ok(None);
    };

    let minimal_answer = Span {
        start_byte_offset: winner.start_offset,
        end_byte_offset: winner.end_offset,
    };

    let passage_answer_index = match example
        .candidates
        .iter()
        .position(|c| c.contains(minimal_answer.start_byte_offset, minimal_answer.end_byte_offset))
    {
        Some(index) => index,
        None => {
            // Lossy by design: indistinguishable from a genuine index-0
            // match without this log line.
            warn!(
                example_id = example.example_id,
                "no passage candidate contains the winning span; choosing first"
            );
            0
        }
    };

    Ok(Some(ScoreSummary {
        predicted_label: PredictedLabel {
            example_id: example.example_id,
            language: winner.language,
            passage_answer_index,
            passage_answer_score: winner.rank_score,
            minimal_answer,
            minimal_answer_score: winner.rank_score,
            yes_no_answer: YesNoAnswer::None,
        },
        minimal_span_score: winner.minimal_span_score,
        cls_token_score: winner.cls_token_score,
        answer_type_logits: winner.answer_type_logits.to_vec(),
    }))
}
