//! Cross-cutting, shared constants.
//!
//! Beam width and answer-length defaults mirror the flag defaults of the
//! reference TyDi QA pipeline; override them per run through [`crate::Config`].

/// Default number of top-scoring start/end token positions considered when
/// enumerating candidate answer spans.
pub const DEFAULT_CANDIDATE_BEAM: usize = 30;

/// Default inclusive cap on answer span length, in tokens.
pub const DEFAULT_MAX_ANSWER_LENGTH: usize = 100;

/// Upper bound on scoring workers, regardless of available parallelism.
pub const DEFAULT_WORKER_CAP: usize = 8;

/// Offset-array value marking a token position that cannot anchor an answer
/// span (separators, padding, question tokens).
pub const SENTINEL_OFFSET: i64 = -1;

/// Emit a progress line every this many merge-join steps.
pub const JOIN_PROGRESS_INTERVAL: usize = 50_000;

/// Emit a progress line every this many scored examples.
pub const SCORING_PROGRESS_INTERVAL: usize = 1_000;
