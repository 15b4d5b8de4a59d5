//! Prediction postprocessing entrypoint: env config, JSONL inputs in,
//! prediction JSON out.

use std::fs::File;
use std::io::{BufReader, BufWriter};

use mimalloc::MiMalloc;

use tydi_postproc::{
    CandidateStore, Config, PredictionDriver, ScoringOptions, merge_join, read_features,
    read_results, write_predictions,
};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = Config::from_env()?;
    config.validate()?;

    tracing::info!(
        candidates = %config.candidates_path.display(),
        features = %config.features_path.display(),
        results = %config.results_path.display(),
        "postprocessing predictions"
    );

    let candidates = CandidateStore::from_jsonl(BufReader::new(File::open(
        &config.candidates_path,
    )?))?;
    let features = read_features(BufReader::new(File::open(&config.features_path)?))?;
    let results = read_results(BufReader::new(File::open(&config.results_path)?))?;

    let (eval_examples, join_stats) = merge_join(candidates, features, results)?;
    tracing::info!(
        examples = join_stats.examples,
        features = join_stats.features,
        results = join_stats.results,
        failed_matches = join_stats.failed_matches,
        "join complete"
    );

    let options = ScoringOptions {
        candidate_beam: config.candidate_beam,
        max_answer_length: config.max_answer_length,
    };
    let driver = match config.workers {
        Some(workers) => PredictionDriver::with_workers(options, workers),
        None => PredictionDriver::new(options),
    };

    let output = driver.run(eval_examples).await;
    for failure in &output.stats.failed {
        tracing::error!(
            example_id = failure.example_id,
            reason = %failure.reason,
            "no prediction due to scoring failure"
        );
    }

    let writer = BufWriter::new(File::create(&config.output_path)?);
    write_predictions(writer, &output.predictions)?;
    tracing::info!(
        predictions = output.predictions.len(),
        skipped = output.stats.skipped,
        failed = output.stats.failed.len(),
        output = %config.output_path.display(),
        "predictions written"
    );

    Ok(())
}
