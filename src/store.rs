//! Process-wide, append-only store of sensor readings.
//!
//! The store holds every reading accepted since startup, oldest first. It is
//! unbounded and not persisted; contents are lost when the process exits.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tokio::sync::RwLock;

/// Field stamped on every reading at ingest time.
pub const RECEIVED_AT: &str = "received_at";

/// One sensor observation: arbitrary JSON fields plus `received_at`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Reading(Map<String, Value>);

impl Reading {
    /// Wrap an already-decoded JSON object.
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Set (or overwrite) the receipt timestamp.
    pub fn stamp(&mut self, received_at: impl Into<String>) {
        self.0
            .insert(RECEIVED_AT.to_string(), Value::String(received_at.into()));
    }

    /// Receipt timestamp, if stamped.
    pub fn received_at(&self) -> Option<&str> {
        self.0.get(RECEIVED_AT).and_then(Value::as_str)
    }

    /// Look up a passthrough field.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }
}

impl From<Map<String, Value>> for Reading {
    fn from(fields: Map<String, Value>) -> Self {
        Self::new(fields)
    }
}

/// Shared, ordered collection of readings.
///
/// Cloning is cheap and yields a handle to the same underlying sequence.
/// A single lock serializes appends against each other and against snapshots,
/// so readers never see a half-written record.
#[derive(Debug, Clone, Default)]
pub struct ReadingStore {
    readings: Arc<RwLock<Vec<Reading>>>,
}

impl ReadingStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one reading to the tail.
    pub async fn append(&self, reading: Reading) {
        self.readings.write().await.push(reading);
    }

    /// Copy of every reading, in insertion order.
    pub async fn snapshot(&self) -> Vec<Reading> {
        self.readings.read().await.clone()
    }

    /// Number of stored readings.
    pub async fn len(&self) -> usize {
        self.readings.read().await.len()
    }

    /// Whether nothing has been ingested yet.
    pub async fn is_empty(&self) -> bool {
        self.readings.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn reading(value: Value) -> Reading {
        match value {
            Value::Object(map) => Reading::from(map),
            other => panic!("expected object, got {other}"),
        }
    }

    #[tokio::test]
    async fn new_store_is_empty() {
        let store = ReadingStore::new();
        assert!(store.is_empty().await);
        assert!(store.snapshot().await.is_empty());
    }

    #[tokio::test]
    async fn append_preserves_insertion_order() {
        let store = ReadingStore::new();
        for id in ["a", "b", "c"] {
            store.append(reading(json!({ "sensor_id": id }))).await;
        }

        let ids: Vec<_> = store
            .snapshot()
            .await
            .iter()
            .map(|r| r.get("sensor_id").and_then(Value::as_str).unwrap().to_string())
            .collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        assert_eq!(store.len().await, 3);
    }

    #[tokio::test]
    async fn clones_share_the_same_sequence() {
        let store = ReadingStore::new();
        let handle = store.clone();
        handle.append(reading(json!({ "sensor_id": "s1" }))).await;
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn concurrent_appends_are_all_kept() {
        let store = ReadingStore::new();
        let tasks: Vec<_> = (0..32)
            .map(|i| {
                let store = store.clone();
                tokio::spawn(async move {
                    store.append(reading(json!({ "n": i, "sensor_id": "x" }))).await;
                })
            })
            .collect();
        for task in tasks {
            task.await.unwrap();
        }

        let snapshot = store.snapshot().await;
        assert_eq!(snapshot.len(), 32);
        assert!(snapshot
            .iter()
            .all(|r| r.get("n").is_some() && r.get("sensor_id").is_some()));
    }

    #[test]
    fn stamp_overwrites_existing_timestamp() {
        let mut r = reading(json!({ "received_at": "client-supplied", "temperature": 21 }));
        r.stamp("2026-01-01T00:00:00.000000");
        assert_eq!(r.received_at(), Some("2026-01-01T00:00:00.000000"));
        assert_eq!(r.get("temperature"), Some(&json!(21)));
    }

    #[test]
    fn reading_serializes_as_flat_object() {
        let r = reading(json!({ "sensor_id": "s1", "humidity": 40 }));
        assert_eq!(
            serde_json::to_value(&r).unwrap(),
            json!({ "sensor_id": "s1", "humidity": 40 })
        );
    }
}
