//! Span-scorer error types.

use thiserror::Error;

use crate::records::UnknownLanguageId;

/// Errors that fail the scoring of one example.
///
/// These are per-example failures: the driver reports them against the
/// offending example id and keeps scoring the rest. Recoverable conditions
/// (no results, count mismatch, no surviving span) are not errors; the
/// scorer returns `None` for those.
#[derive(Debug, Error)]
pub enum ScoringError {
    /// A feature carried a `language_id` outside the known range.
    #[error(transparent)]
    UnknownLanguage(#[from] UnknownLanguageId),
}
