//! Batch ingest: decode, stamp, append.

use chrono::Local;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::error::IngestError;
use crate::store::{Reading, ReadingStore};

/// Key holding the array of readings in an ingest body.
pub const READINGS_KEY: &str = "readings";

/// Current local time as a naive ISO-8601 string with microseconds.
pub fn receipt_timestamp() -> String {
    Local::now().format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
}

/// Decode a request body and pull out its `readings` value.
///
/// Bodies that are not JSON are a processing failure; JSON that is not a
/// non-empty object carrying `readings` is `InvalidFormat`.
pub fn extract_readings(body: &[u8]) -> Result<Value, IngestError> {
    let value: Value = serde_json::from_slice(body)?;

    match value {
        Value::Object(mut map) if !map.is_empty() => {
            map.remove(READINGS_KEY).ok_or(IngestError::InvalidFormat)
        }
        _ => Err(IngestError::InvalidFormat),
    }
}

/// How far a batch got before it finished or failed.
#[derive(Debug)]
pub struct BatchOutcome {
    /// Readings appended to the store, including those before a failure.
    pub appended: usize,
    /// Why the batch stopped early, if it did.
    pub error: Option<IngestError>,
}

impl BatchOutcome {
    /// Appended count on success, the error otherwise.
    pub fn into_result(self) -> Result<usize, IngestError> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(self.appended),
        }
    }
}

/// Stamp and append every reading in `body`, in order.
///
/// Readings are appended one at a time. If an element is rejected, the ones
/// before it stay in the store and are counted in `appended`.
#[instrument(skip(store, body), fields(body_len = body.len()))]
pub async fn ingest_batch(store: &ReadingStore, body: &[u8]) -> BatchOutcome {
    let mut appended = 0;
    let error = append_all(store, body, &mut appended).await.err();
    BatchOutcome { appended, error }
}

async fn append_all(
    store: &ReadingStore,
    body: &[u8],
    appended: &mut usize,
) -> Result<(), IngestError> {
    let readings = match extract_readings(body)? {
        Value::Array(items) => items,
        other => {
            return Err(IngestError::Processing(format!(
                "'readings' must be a list, got {}",
                json_type_name(&other)
            )))
        }
    };

    debug!(count = readings.len(), "Ingesting batch");

    for (index, item) in readings.into_iter().enumerate() {
        let mut reading = match item {
            Value::Object(fields) => Reading::from(fields),
            other => {
                return Err(IngestError::Processing(format!(
                    "reading at index {index} must be an object, got {}",
                    json_type_name(&other)
                )))
            }
        };
        reading.stamp(receipt_timestamp());
        store.append(reading).await;
        *appended += 1;
    }

    Ok(())
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "object",
    }
}
