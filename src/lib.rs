//! Postprocessing of raw QA span logits into official TyDi QA predictions.
//!
//! The pipeline joins three independently produced record streams into one
//! aggregate per example, then reduces each aggregate to a final prediction:
//!
//! 1. [`CandidateStore`] holds passage-answer candidates from the dataset
//!    annotations, keyed by example id.
//! 2. [`merge_join`] combines candidates, tokenized feature windows, and raw
//!    model results into [`EvalExample`] aggregates, exploiting the shared
//!    id scheme (derived keys sort strictly after the owning example's id).
//! 3. [`scoring::score`] selects the best valid answer span per example and
//!    resolves it to a passage candidate.
//! 4. [`PredictionDriver`] fans scoring out across a bounded worker pool and
//!    collects the final `example_id -> PredictedLabel` map; [`output`]
//!    serializes it in the shape the evaluation script expects.
//!
//! Scoring is a pure function of one aggregate, so parallel and sequential
//! runs produce identical output.

pub mod candidates;
pub mod config;
pub mod constants;
pub mod driver;
pub mod join;
pub mod output;
pub mod records;
pub mod scoring;

pub use candidates::CandidateStore;
pub use config::{Config, ConfigError};
pub use driver::{DriverStats, PredictionDriver, PredictionSet, ScoringFailure};
pub use join::{EvalExample, JoinError, JoinStats, TaggedRecord, merge_join};
pub use output::{OutputError, predictions_to_json, write_predictions};
pub use records::{
    Feature, Language, PassageCandidate, RawResult, ReadError, Span, UnknownLanguageId,
    read_features, read_results,
};
pub use scoring::{
    PredictedLabel, ScoreSummary, ScoringError, ScoringOptions, YesNoAnswer, score,
};
