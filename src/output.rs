//! Serialization of the final prediction mapping.
//!
//! The downstream evaluation script consumes a single JSON object keyed by
//! example id; field names and nesting inside each prediction are a
//! compatibility contract.

use std::collections::BTreeMap;
use std::io::Write;

use serde_json::{Map, Value};
use thiserror::Error;

use crate::scoring::PredictedLabel;

/// Errors writing the prediction output.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("failed to serialize predictions: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to write predictions: {0}")]
    Io(#[from] std::io::Error),
}

/// Builds the prediction dictionary as a JSON object keyed by the decimal
/// example id.
pub fn predictions_to_json(
    predictions: &BTreeMap<i64, PredictedLabel>,
) -> Result<Value, OutputError> {
    let mut object = Map::with_capacity(predictions.len());
    for (example_id, label) in predictions {
        object.insert(example_id.to_string(), serde_json::to_value(label)?);
    }
    Ok(Value::Object(object))
}

/// Writes the prediction dictionary to `writer` as one JSON object.
pub fn write_predictions<W: Write>(
    writer: W,
    predictions: &BTreeMap<i64, PredictedLabel>,
) -> Result<(), OutputError> {
    let value = predictions_to_json(predictions)?;
    serde_json::to_writer(writer, &value)?;
    Ok(())
}
