//! Infrastructure layer: record storage, batch runs, report submission,
//! remote oracles and configuration.

pub mod batch;
pub mod config;
pub mod oracle;
pub mod reports;
pub mod store;

pub use batch::{BatchError, BatchOutcome, TenantScope, WeeklyAggregator, WeeklyBatchConfig};
pub use config::{ConfigError, Settings};
pub use oracle::GeminiOracle;
pub use reports::{DailyReportService, SubmittedReport};
pub use store::{InMemoryRecordStore, RecordStore, StoreError};
