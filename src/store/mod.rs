//! Viewing record storage and aggregation module.
//!
//! Provides the normalized record model, the bucket splitting rules and
//! the aggregators that turn a viewing history into watch-time totals.

pub mod aggregator;
pub mod history;
pub mod splitter;
pub mod types;

pub use aggregator::*;
pub use history::*;
pub use splitter::*;
pub use types::*;
