//! Snapshot ETL for the IGP reported-earthquakes table.
//!
//! One invocation performs one pass: fetch the public report page, extract
//! up to ten records from its table, and fully replace the persisted
//! snapshot in the durable store. Retries, scheduling and change detection
//! live outside this crate.
//!
//! # Pipeline
//!
//! ```text
//! HttpFetcher ──► extract_records ──► SnapshotStore::replace_all
//!      │500             │404                  │500
//!      └────────────────┴───── RunOutcome ────┴──► 200 {message, cantidad, data}
//! ```
//!
//! # Modules
//!
//! - [`fetch`] - HTTP retrieval of the report page ([`ReportFetcher`] seam)
//! - [`extract`] - marker-text table selection and row parsing
//! - [`store`] - durable replace-all storage ([`SnapshotStore`] seam)
//! - [`handler`] - orchestration and status mapping
//! - [`config`] - environment-derived configuration
//! - [`error`] - typed errors per pipeline stage

pub mod config;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod handler;
pub mod store;
pub mod types;

// Re-export core types at crate root
pub use config::Config;
pub use error::{EtlError, FetchError, StoreError, TableNotFoundError};
pub use extract::{extract_records, MAX_RECORDS};
pub use fetch::{HttpFetcher, ReportFetcher, REPORT_URL};
pub use handler::run;
pub use store::{MemoryStore, ReplaceSummary, SnapshotStore, SqliteStore};
pub use types::{ResponseBody, RunOutcome, SeismicRecord, SuccessBody};
