//! Merge-join of the three input streams into per-example aggregates.
//!
//! Examples, features, and results are produced by different stages of the
//! pipeline but share one id scheme: a feature or result carries
//! `unique_id`, and its join key `unique_id + 1` sorts strictly after the
//! owning example's id and strictly before the next example's id. Tagging
//! all three streams, sorting by key, and walking the result once therefore
//! reassembles each example's records with only a "current aggregate"
//! cursor, no index structures.

pub mod error;


pub use error::JoinError;

use std::collections::BTreeMap;

use tracing::{debug, info, warn};

use crate::candidates::CandidateStore;
use crate::constants::JOIN_PROGRESS_INTERVAL;
use crate::records::{Feature, PassageCandidate, RawResult};

/// One element of the tagged, sortable union of the three input streams.
#[derive(Debug, Clone)]
pub enum TaggedRecord {
    Example {
        example_id: i64,
        candidates: Vec<PassageCandidate>,
    },
    Feature(Feature),
    Result(RawResult),
}

impl TaggedRecord {
    /// Join key. Examples sort at their own id; features and results sort
    /// at `unique_id + 1`, which the id scheme guarantees lands strictly
    /// between the owning example's id and the next example's id.
    pub fn key(&self) -> i64 {
        match self {
            Self::Example { example_id, .. } => *example_id,
            Self::Feature(feature) => feature.unique_id + 1,
            Self::Result(result) => result.unique_id + 1,
        }
    }
}

/// All data available for scoring a single example: its passage-answer
/// candidates plus every feature window and raw result that joined to it,
/// both keyed by the derived join key.
///
/// Append-only during the join, read-only afterwards. A well-formed
/// aggregate has the same key set in `features` and `results`; the Span
/// Scorer treats a mismatch as a scoring-input failure.
#[derive(Debug, Clone)]
pub struct EvalExample {
    pub example_id: i64,
    pub candidates: Vec<PassageCandidate>,
    pub features: BTreeMap<i64, Feature>,
    pub results: BTreeMap<i64, RawResult>,
}

impl EvalExample {
    pub fn new(example_id: i64, candidates: Vec<PassageCandidate>) -> Self {
        Self {
            example_id,
            candidates,
            features: BTreeMap::new(),
            results: BTreeMap::new(),
        }
    }
}

/// Counters reported after the join.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JoinStats {
    pub examples: usize,
    pub features: usize,
    pub results: usize,
    /// Features/results that arrived before any example was materialized.
    pub failed_matches: usize,
}

/// Joins candidates, features, and raw results into one [`EvalExample`]
/// per example id, in ascending example-id order.
///
/// Orphaned features/results are logged, counted, and skipped. A feature
/// whose recorded `example_index` disagrees with the example it sorted
/// under is a fatal integrity error: the id scheme was broken upstream and
/// no further output can be trusted.
pub fn merge_join(
    store: CandidateStore,
    features: Vec<Feature>,
    results: Vec<RawResult>,
) -> Result<(Vec<EvalExample>, JoinStats), JoinError> {
    if store.is_empty() {
        return Err(JoinError::EmptyCandidateStore);
    }

    let mut merged: Vec<TaggedRecord> = Vec::with_capacity(store.len() + features.len() + results.len());
    merged.extend(
        store
            .into_iter_sorted()
            .map(|(example_id, candidates)| TaggedRecord::Example {
                example_id,
                candidates,
            }),
    );
    merged.extend(features.into_iter().map(TaggedRecord::Feature));
    merged.extend(results.into_iter().map(TaggedRecord::Result));
    // Stable sort: an example precedes its derived keys by the id scheme,
    // so key ties never cross record kinds.
    merged.sort_by_key(TaggedRecord::key);

    let total = merged.len();
    info!(records = total, "combining examples, features and results");

    let mut eval_examples: Vec<EvalExample> = Vec::new();
    let mut stats = JoinStats::default();

    for (step, record) in merged.into_iter().enumerate() {
        if step % JOIN_PROGRESS_INTERVAL == 0 {
            debug!(step, total, "merge-join progress");
        }

        let key = record.key();
        match record {
            TaggedRecord::Example {
                example_id,
                candidates,
            } => {
                stats.examples += 1;
                eval_examples.push(EvalExample::new(example_id, candidates));
            }
            TaggedRecord::Feature(feature) => {
                stats.features += 1;
                let Some(current) = eval_examples.last_mut() else {
                    warn!(
                        unique_id = feature.unique_id,
                        "feature arrived before any example; dataset/predictions mismatch?"
                    );
                    stats.failed_matches += 1;
                    continue;
                };
                if current.example_id != feature.example_index {
                    return Err(JoinError::ExampleMismatch {
                        current_example_id: current.example_id,
                        recorded_example_id: feature.example_index,
                        unique_id: feature.unique_id,
                    });
                }
                current.features.insert(key, feature);
            }
            TaggedRecord::Result(result) => {
                stats.results += 1;
                let Some(current) = eval_examples.last_mut() else {
                    warn!(
                        unique_id = result.unique_id,
                        "result arrived before any example; dataset/predictions mismatch?"
                    );
                    stats.failed_matches += 1;
                    continue;
                };
                current.results.insert(key, result);
            }
        }
    }

    info!(
        examples = stats.examples,
        features = stats.features,
        results = stats.results,
        "merge-join complete"
    );
    if stats.failed_matches > 0 {
        warn!(failed_matches = stats.failed_matches, "some records failed to join");
    }

    Ok((eval_examples, stats))
}
