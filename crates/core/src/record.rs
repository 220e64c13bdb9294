//! Persisted records exchanged with the record store.
//!
//! These are plain data: the store owns their lifecycle, the engine only reads
//! daily reports and writes weekly summaries.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::Entity;
use crate::id::{ReportId, SummaryId, TaskId, TenantId, UserId};
use crate::politeness::PolitenessLevel;
use crate::week::WeeklyWindow;

/// A tenant member (user id + owning tenant).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Member {
    pub user_id: UserId,
    pub tenant_id: TenantId,
}

impl Member {
    pub fn new(tenant_id: TenantId, user_id: UserId) -> Self {
        Self { user_id, tenant_id }
    }
}

impl Entity for Member {
    type Id = UserId;

    fn id(&self) -> &Self::Id {
        &self.user_id
    }
}

/// Hours logged against a task, joined with the task title when the store
/// can resolve it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkLog {
    pub task_id: TaskId,
    pub hours: f64,
    #[serde(default)]
    pub task_title: Option<String>,
}

/// A persisted daily report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyReport {
    pub id: ReportId,
    pub tenant_id: TenantId,
    pub user_id: UserId,
    pub report_date: NaiveDate,
    pub content_raw: String,
    #[serde(default)]
    pub content_polished: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    pub politeness_level: PolitenessLevel,
    #[serde(default)]
    pub work_logs: Vec<WorkLog>,
    pub created_at: DateTime<Utc>,
}

impl DailyReport {
    /// The best available body: polished text when present, raw notes otherwise.
    pub fn body(&self) -> &str {
        match self.content_polished.as_deref() {
            Some(polished) if !polished.trim().is_empty() => polished,
            _ => &self.content_raw,
        }
    }
}

impl Entity for DailyReport {
    type Id = ReportId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Insert payload for a daily report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewDailyReport {
    pub tenant_id: TenantId,
    pub user_id: UserId,
    pub report_date: NaiveDate,
    pub content_raw: String,
    pub content_polished: String,
    pub subject: String,
    pub politeness_level: PolitenessLevel,
    pub work_logs: Vec<NewWorkLog>,
}

/// Insert payload for one work log of a daily report.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewWorkLog {
    pub task_id: TaskId,
    pub hours: f64,
}

/// A persisted weekly summary for one member and one window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklySummary {
    pub id: SummaryId,
    pub tenant_id: TenantId,
    pub user_id: UserId,
    pub content: String,
    pub window: WeeklyWindow,
    pub created_at: DateTime<Utc>,
}

impl Entity for WeeklySummary {
    type Id = SummaryId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Upsert payload for a weekly summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewWeeklySummary {
    pub tenant_id: TenantId,
    pub user_id: UserId,
    pub content: String,
    pub window: WeeklyWindow,
}
