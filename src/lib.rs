//! watchtime - viewing history statistics.
//!
//! Folds a viewing-activity history into watch-time totals per month,
//! day of week, hour of day and calendar day, plus a summary report.

pub mod config;
pub mod ingest;
pub mod report;
pub mod store;

pub use config::{Config, OutputFormat};
pub use ingest::{load_activity_file, parse_activity, IngestError};
pub use report::WatchReport;
pub use store::{ViewingHistory, ViewingRecord, WatchStatistics};
