//! Scheduled batch runs.

pub mod scope;
pub mod weekly;

pub use scope::TenantScope;
pub use weekly::{BatchError, BatchOutcome, WeeklyAggregator, WeeklyBatchConfig};
