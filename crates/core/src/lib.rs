//! `nippo-core`: domain foundation building blocks.
//!
//! Identifiers, value objects and record types shared by the generation engine
//! and the infrastructure adapters. No IO lives here.

pub mod entity;
pub mod error;
pub mod id;
pub mod politeness;
pub mod record;
pub mod value_object;
pub mod week;

pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{ReportId, SummaryId, TaskId, TenantId, UserId};
pub use politeness::PolitenessLevel;
pub use record::{
    DailyReport, Member, NewDailyReport, NewWeeklySummary, NewWorkLog, WeeklySummary, WorkLog,
};
pub use value_object::ValueObject;
pub use week::WeeklyWindow;
