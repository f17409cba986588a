//! Minimal in-memory telemetry sink.
//!
//! Devices POST batches of schema-less sensor readings; each reading is
//! stamped with a server receipt time and appended to a process-wide store.
//! The store is served back as JSON and through a polling HTML dashboard.
//!
//! ```text
//! device  ──POST /api/ingest/readings──▶  ingest  ──append──▶  store
//! browser ──GET /──────────────────────▶  dashboard (static HTML)
//! browser ──GET /api/data (every 2s)───▶  query   ──snapshot──  store
//! ```
//!
//! Contents are not persisted and are lost on restart.
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from environment
//! - [`error`]: Unified error types
//! - [`store`]: Reading type and the shared store
//! - [`ingest`]: Batch decoding and timestamp stamping
//! - [`api`]: HTTP routes and handlers
//! - [`metrics`]: Prometheus counters and timers
//! - [`utils`]: Utility functions

pub mod api;
pub mod config;
pub mod error;
pub mod ingest;
pub mod metrics;
pub mod store;
pub mod utils;

pub use config::Config;
pub use error::{IngestError, Result, SinkError};
pub use store::{Reading, ReadingStore};
