use std::sync::Arc;

use chrono::NaiveDate;
use thiserror::Error;

use nippo_ai::{AiPreferences, CandidateTask};
use nippo_core::{
    DailyReport, Member, NewDailyReport, NewWeeklySummary, TenantId, UserId, WeeklySummary,
};

/// Record store operation error.
///
/// These are infrastructure errors, as opposed to domain validation errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backend could not serve the request (connection, IO, poisoned lock).
    #[error("record store backend error: {0}")]
    Backend(String),

    /// A write referenced a record that does not exist (e.g. an unknown task).
    #[error("integrity violation: {0}")]
    IntegrityViolation(String),

    /// A write was accepted but returned no persisted record.
    #[error("write returned no record: {0}")]
    EmptyWrite(String),
}

/// Tenant-scoped record store consumed by the generation engine.
///
/// ## Read semantics
///
/// - `list_members` returns the complete member list in one call; paginating
///   backends must materialise every page first.
/// - `fetch_reports` returns the member's reports with `report_date` in
///   `[start, end]` (inclusive), ascending by date, with work logs joined and
///   task titles resolved where possible.
///
/// ## Write semantics
///
/// - `upsert_weekly_summary` replaces the content of an existing summary for
///   the same tenant, user and window (keeping its id) or inserts a new one.
/// - `insert_daily_report` rejects work logs that reference unknown tasks with
///   [`StoreError::IntegrityViolation`].
#[async_trait::async_trait]
pub trait RecordStore: Send + Sync {
    async fn list_members(&self) -> Result<Vec<Member>, StoreError>;

    async fn fetch_reports(
        &self,
        tenant_id: TenantId,
        user_id: UserId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailyReport>, StoreError>;

    async fn upsert_weekly_summary(
        &self,
        summary: NewWeeklySummary,
    ) -> Result<WeeklySummary, StoreError>;

    /// `Ok(None)` when the user never saved preferences.
    async fn load_preferences(&self, user_id: UserId) -> Result<Option<AiPreferences>, StoreError>;

    /// Tasks assigned to the user that are not done.
    async fn active_tasks(
        &self,
        tenant_id: TenantId,
        user_id: UserId,
    ) -> Result<Vec<CandidateTask>, StoreError>;

    async fn insert_daily_report(&self, report: NewDailyReport) -> Result<DailyReport, StoreError>;
}

#[async_trait::async_trait]
impl<S> RecordStore for Arc<S>
where
    S: RecordStore + ?Sized,
{
    async fn list_members(&self) -> Result<Vec<Member>, StoreError> {
        (**self).list_members().await
    }

    async fn fetch_reports(
        &self,
        tenant_id: TenantId,
        user_id: UserId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailyReport>, StoreError> {
        (**self).fetch_reports(tenant_id, user_id, start, end).await
    }

    async fn upsert_weekly_summary(
        &self,
        summary: NewWeeklySummary,
    ) -> Result<WeeklySummary, StoreError> {
        (**self).upsert_weekly_summary(summary).await
    }

    async fn load_preferences(&self, user_id: UserId) -> Result<Option<AiPreferences>, StoreError> {
        (**self).load_preferences(user_id).await
    }

    async fn active_tasks(
        &self,
        tenant_id: TenantId,
        user_id: UserId,
    ) -> Result<Vec<CandidateTask>, StoreError> {
        (**self).active_tasks(tenant_id, user_id).await
    }

    async fn insert_daily_report(&self, report: NewDailyReport) -> Result<DailyReport, StoreError> {
        (**self).insert_daily_report(report).await
    }
}
