//! Environment-backed configuration.
//!
//! Input paths are required; tunables have defaults. Override with `TYDI_*`
//! environment variables.

pub mod error;


pub use error::ConfigError;

use std::env;
use std::path::PathBuf;

use crate::constants::{DEFAULT_CANDIDATE_BEAM, DEFAULT_MAX_ANSWER_LENGTH};

/// Run configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `TYDI_*` variables; the three input
/// paths are required, everything else defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Candidates JSONL file (dataset annotations).
    pub candidates_path: PathBuf,

    /// Feature-window JSONL file.
    pub features_path: PathBuf,

    /// Raw model-result JSONL file.
    pub results_path: PathBuf,

    /// Where to write the prediction JSON. Default: `./predictions.json`.
    pub output_path: PathBuf,

    /// Beam width for start/end index selection. Default: `30`.
    pub candidate_beam: usize,

    /// Inclusive token-length cap on answer spans. Default: `100`.
    pub max_answer_length: usize,

    /// Scoring worker override. Default: auto (parallelism, capped).
    pub workers: Option<usize>,
}

/// Default output path used when `TYDI_OUTPUT_PATH` is not set.
pub const DEFAULT_OUTPUT_PATH: &str = "./predictions.json";

impl Config {
    const ENV_CANDIDATES_PATH: &'static str = "TYDI_CANDIDATES_PATH";
    const ENV_FEATURES_PATH: &'static str = "TYDI_FEATURES_PATH";
    const ENV_RESULTS_PATH: &'static str = "TYDI_RESULTS_PATH";
    const ENV_OUTPUT_PATH: &'static str = "TYDI_OUTPUT_PATH";
    const ENV_CANDIDATE_BEAM: &'static str = "TYDI_CANDIDATE_BEAM";
    const ENV_MAX_ANSWER_LENGTH: &'static str = "TYDI_MAX_ANSWER_LENGTH";
    const ENV_WORKERS: &'static str = "TYDI_WORKERS";

    /// Loads configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let candidates_path = Self::parse_required_path_from_env(Self::ENV_CANDIDATES_PATH)?;
        let features_path = Self::parse_required_path_from_env(Self::ENV_FEATURES_PATH)?;
        let results_path = Self::parse_required_path_from_env(Self::ENV_RESULTS_PATH)?;
        let output_path = Self::parse_path_from_env(
            Self::ENV_OUTPUT_PATH,
            PathBuf::from(DEFAULT_OUTPUT_PATH),
        );
        let candidate_beam =
            Self::parse_usize_from_env(Self::ENV_CANDIDATE_BEAM, DEFAULT_CANDIDATE_BEAM)?;
        let max_answer_length =
            Self::parse_usize_from_env(Self::ENV_MAX_ANSWER_LENGTH, DEFAULT_MAX_ANSWER_LENGTH)?;
        let workers = Self::parse_optional_usize_from_env(Self::ENV_WORKERS)?;

        Ok(Self {
            candidates_path,
            features_path,
            results_path,
            output_path,
            candidate_beam,
            max_answer_length,
            workers,
        })
    }

    /// Validates paths and basic invariants (does not create files).
    pub fn validate(&self) -> Result<(), ConfigError> {
        for path in [&self.candidates_path, &self.features_path, &self.results_path] {
            if !path.exists() {
                return Err(ConfigError::PathNotFound { path: path.clone() });
            }
            if !path.is_file() {
                return Err(ConfigError::NotAFile { path: path.clone() });
            }
        }

        if self.candidate_beam == 0 {
            return Err(ConfigError::MustBePositive {
                name: Self::ENV_CANDIDATE_BEAM,
            });
        }
        if self.max_answer_length == 0 {
            return Err(ConfigError::MustBePositive {
                name: Self::ENV_MAX_ANSWER_LENGTH,
            });
        }
        if self.workers == Some(0) {
            return Err(ConfigError::MustBePositive {
                name: Self::ENV_WORKERS,
            });
        }

        Ok(())
    }

    fn parse_required_path_from_env(var_name: &'static str) -> Result<PathBuf, ConfigError> {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .ok_or(ConfigError::MissingEnvVar { name: var_name })
    }

    fn parse_path_from_env(var_name: &str, default: PathBuf) -> PathBuf {
        env::var(var_name).map(PathBuf::from).unwrap_or(default)
    }

    fn parse_usize_from_env(
        var_name: &'static str,
        default: usize,
    ) -> Result<usize, ConfigError> {
        match env::var(var_name) {
            Ok(value) => value.parse().map_err(|e| ConfigError::ParseError {
                name: var_name,
                value,
                source: e,
            }),
            Err(_) => Ok(default),
        }
    }

    fn parse_optional_usize_from_env(
        var_name: &'static str,
    ) -> Result<Option<usize>, ConfigError> {
        match env::var(var_name) {
            Ok(value) => value
                .parse()
                .map(Some)
                .map_err(|e| ConfigError::ParseError {
                    name: var_name,
                    value,
                    source: e,
                }),
            Err(_) => Ok(None),
        }
    }
}
