//! Fan-out of per-example scoring across a bounded worker pool.
//!
//! Scoring one example is a pure function of its [`EvalExample`], so the
//! driver can hand examples to blocking workers and collect completions in
//! whatever order they finish: the output map is keyed by example id and
//! each id is produced by exactly one task. Sequential and parallel runs
//! must produce identical maps.


use std::collections::BTreeMap;

use futures_util::StreamExt;
use futures_util::stream::FuturesUnordered;
use tracing::{debug, error, info};

use crate::constants::{DEFAULT_WORKER_CAP, SCORING_PROGRESS_INTERVAL};
use crate::join::EvalExample;
use crate::scoring::{self, PredictedLabel, ScoringOptions};

/// One example whose scoring failed (scorer error or worker panic). The
/// sibling examples are unaffected; failures are reported here instead of
/// aborting the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoringFailure {
    pub example_id: i64,
    pub reason: String,
}

/// Counters reported after the scoring phase.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DriverStats {
    /// Examples that produced a prediction.
    pub scored: usize,
    /// Examples the scorer declined (no results, count mismatch, no span).
    pub skipped: usize,
    pub failed: Vec<ScoringFailure>,
}

/// Final output of a run: predictions keyed by example id, plus counters.
/// Examples the scorer declined or that failed are absent from the map.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PredictionSet {
    pub predictions: BTreeMap<i64, PredictedLabel>,
    pub stats: DriverStats,
}

/// Distributes per-example scoring across blocking workers and reassembles
/// the final prediction map.
#[derive(Debug, Clone)]
pub struct PredictionDriver {
    options: ScoringOptions,
    workers: usize,
}

impl PredictionDriver {
    /// Worker count capped at [`DEFAULT_WORKER_CAP`]; scoring is CPU-bound
    /// and oversubscribing large machines buys nothing.
    pub fn new(options: ScoringOptions) -> Self {
        let available = std::thread::available_parallelism()
            .map(std::num::NonZeroUsize::get)
            .unwrap_or(1);
        Self::with_workers(options, available.min(DEFAULT_WORKER_CAP))
    }

    pub fn with_workers(options: ScoringOptions, workers: usize) -> Self {
        Self {
            options,
            workers: workers.max(1),
        }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Scores every example on the worker pool, collecting completions in
    /// arrival order. A failed task is recorded against its example id
    /// while the rest of the pool keeps running.
    pub async fn run(&self, examples: Vec<EvalExample>) -> PredictionSet {
        let total = examples.len();
        info!(examples = total, workers = self.workers, "scoring examples");

        let mut output = PredictionSet::default();
        let mut pending = examples.into_iter();
        let mut in_flight = FuturesUnordered::new();
        let mut completed = 0usize;

        loop {
            while in_flight.len() < self.workers {
                let Some(example) = pending.next() else { break };
                let options = self.options;
                let example_id = example.example_id;
                let handle =
                    tokio::task::spawn_blocking(move || scoring::score(&example, &options));
                in_flight.push(async move { (example_id, handle.await) });
            }

            let Some((example_id, joined)) = in_flight.next().await else {
                break;
            };

            completed += 1;
            if completed % SCORING_PROGRESS_INTERVAL == 0 {
                debug!(completed, total, "scoring progress");
            }

            match joined {
                Ok(Ok(Some(summary))) => {
                    output
                        .predictions
                        .insert(example_id, summary.predicted_label);
                    output.stats.scored += 1;
                }
                Ok(Ok(None)) => {
                    output.stats.skipped += 1;
                }
                Ok(Err(e)) => {
                    error!(example_id, error = %e, "scoring failed");
                    output.stats.failed.push(ScoringFailure {
                        example_id,
                        reason: e.to_string(),
                    });
                }
                Err(join_error) => {
                    error!(example_id, error = %join_error, "scoring task panicked");
                    output.stats.failed.push(ScoringFailure {
                        example_id,
                        reason: join_error.to_string(),
                    });
                }
            }
        }

        // Failures arrive in completion order; report them in id order so
        // parallel runs are reproducible.
        output.stats.failed.sort_by_key(|f| f.example_id);
        self.log_summary(&output);
        output
    }

    /// Pure sequential fallback. Produces a map identical to [`run`]'s for
    /// the same inputs.
    ///
    /// [`run`]: PredictionDriver::run
    pub fn run_sequential(&self, examples: &[EvalExample]) -> PredictionSet {
        let mut output = PredictionSet::default();
        for example in examples {
            match scoring::score(example, &self.options) {
                Ok(Some(summary)) => {
                    output
                        .predictions
                        .insert(example.example_id, summary.predicted_label);
                    output.stats.scored += 1;
                }
                Ok(None) => {
                    output.stats.skipped += 1;
                }
                Err(e) => {
                    error!(example_id = example.example_id, error = %e, "scoring failed");
                    output.stats.failed.push(ScoringFailure {
                        example_id: example.example_id,
                        reason: e.to_string(),
                    });
                }
            }
        }
        self.log_summary(&output);
        output
    }

    fn log_summary(&self, output: &PredictionSet) {
        info!(
            scored = output.stats.scored,
            skipped = output.stats.skipped,
            failed = output.stats.failed.len(),
            "scoring complete"
        );
    }
}
