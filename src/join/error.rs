//! Merge-join error types.

use thiserror::Error;

/// Errors that abort the merge-join.
///
/// Orphaned features/results (arriving before any example) are not errors;
/// they are counted in [`JoinStats::failed_matches`] and skipped.
///
/// [`JoinStats::failed_matches`]: crate::join::JoinStats::failed_matches
#[derive(Debug, Error)]
pub enum JoinError {
    /// The candidate store had no examples at all.
    #[error("no example candidates found")]
    EmptyCandidateStore,

    /// A feature's recorded owning-example id disagrees with the example it
    /// sorted under. The id scheme was violated upstream; joining the
    /// feature anyway would corrupt every downstream prediction, so the
    /// whole run halts.
    #[error(
        "feature with unique id {unique_id} sorted under example {current_example_id} \
         but records example {recorded_example_id}"
    )]
    ExampleMismatch {
        current_example_id: i64,
        recorded_example_id: i64,
        unique_id: i64,
    },
}
