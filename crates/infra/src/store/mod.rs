//! Record store boundary.
//!
//! The engine reads members, daily reports, tasks and preferences, and writes
//! daily reports and weekly summaries. Query mechanics belong to the backend.

pub mod in_memory;
pub mod r#trait;

pub use in_memory::{InMemoryRecordStore, PreferenceRecord, StoreSnapshot, TaskRecord, TaskStatus};
pub use r#trait::{RecordStore, StoreError};
