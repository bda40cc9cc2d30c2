//! # homenode-adapter-telemetry-server
//!
//! Axum HTTP collector for temperature telemetry.
//!
//! Accepts single samples and batches, runs the session-scoped 3-sigma
//! outlier filter from `homenode-domain`, appends accepted samples to an
//! append-only CSV audit log, and answers every ingest with the accepted
//! subset. The session set lives in memory only; a restart starts a fresh
//! statistical session while the CSV keeps growing.

pub mod error;
pub mod router;
pub mod state;
pub mod store;

pub use router::router;
pub use state::AppState;
pub use store::CsvStore;
