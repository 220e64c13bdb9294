use std::path::Path;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value as JsonValue;

use nippo_ai::{AiPreferences, CandidateTask};
use nippo_core::{
    DailyReport, Member, NewDailyReport, NewWeeklySummary, ReportId, SummaryId, TaskId, TenantId,
    UserId, WeeklySummary, WorkLog,
};

use super::r#trait::{RecordStore, StoreError};

/// Task progress. Unknown values decode as `Todo`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Todo,
    InProgress,
    Done,
}

impl TaskStatus {
    pub fn is_active(&self) -> bool {
        match self {
            TaskStatus::Todo | TaskStatus::InProgress => true,
            TaskStatus::Done => false,
        }
    }
}

impl<'de> Deserialize<'de> for TaskStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(match raw.as_str() {
            "in_progress" => TaskStatus::InProgress,
            "done" => TaskStatus::Done,
            _ => TaskStatus::Todo,
        })
    }
}

/// A project task as stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub id: TaskId,
    pub tenant_id: TenantId,
    pub title: String,
    #[serde(default)]
    pub assigned_to: Option<UserId>,
    #[serde(default)]
    pub status: TaskStatus,
}

impl TaskRecord {
    pub fn assigned(tenant_id: TenantId, user_id: UserId, title: impl Into<String>) -> Self {
        Self {
            id: TaskId::new(),
            tenant_id,
            title: title.into(),
            assigned_to: Some(user_id),
            status: TaskStatus::Todo,
        }
    }

    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }
}

/// Raw AI settings blob stored on a user profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreferenceRecord {
    pub user_id: UserId,
    #[serde(default)]
    pub ai_settings: JsonValue,
}

/// Serializable contents of an [`InMemoryRecordStore`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreSnapshot {
    #[serde(default)]
    pub members: Vec<Member>,
    #[serde(default)]
    pub tasks: Vec<TaskRecord>,
    #[serde(default)]
    pub reports: Vec<DailyReport>,
    #[serde(default)]
    pub weekly_summaries: Vec<WeeklySummary>,
    #[serde(default)]
    pub preferences: Vec<PreferenceRecord>,
}

/// In-memory record store.
///
/// Intended for tests/dev and for one-off batch runs over a JSON snapshot.
/// Not optimized for performance.
#[derive(Debug, Default)]
pub struct InMemoryRecordStore {
    inner: RwLock<StoreSnapshot>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_snapshot(snapshot: StoreSnapshot) -> Self {
        Self {
            inner: RwLock::new(snapshot),
        }
    }

    pub fn load_json(path: &Path) -> Result<Self, StoreError> {
        let bytes = std::fs::read(path)
            .map_err(|e| StoreError::Backend(format!("reading {}: {e}", path.display())))?;
        let snapshot: StoreSnapshot = serde_json::from_slice(&bytes)
            .map_err(|e| StoreError::Backend(format!("decoding {}: {e}", path.display())))?;
        Ok(Self::from_snapshot(snapshot))
    }

    pub fn save_json(&self, path: &Path) -> Result<(), StoreError> {
        let snapshot = self.snapshot()?;
        let bytes = serde_json::to_vec_pretty(&snapshot)
            .map_err(|e| StoreError::Backend(format!("encoding snapshot: {e}")))?;
        std::fs::write(path, bytes)
            .map_err(|e| StoreError::Backend(format!("writing {}: {e}", path.display())))
    }

    pub fn snapshot(&self) -> Result<StoreSnapshot, StoreError> {
        Ok(self.read()?.clone())
    }

    pub fn add_member(&self, member: Member) -> Result<(), StoreError> {
        self.write()?.members.push(member);
        Ok(())
    }

    pub fn add_task(&self, task: TaskRecord) -> Result<(), StoreError> {
        self.write()?.tasks.push(task);
        Ok(())
    }

    pub fn add_report(&self, report: DailyReport) -> Result<(), StoreError> {
        self.write()?.reports.push(report);
        Ok(())
    }

    pub fn set_preferences(
        &self,
        user_id: UserId,
        ai_settings: JsonValue,
    ) -> Result<(), StoreError> {
        let mut inner = self.write()?;
        inner.preferences.retain(|p| p.user_id != user_id);
        inner.preferences.push(PreferenceRecord { user_id, ai_settings });
        Ok(())
    }

    pub fn weekly_summaries(&self) -> Result<Vec<WeeklySummary>, StoreError> {
        Ok(self.read()?.weekly_summaries.clone())
    }

    pub fn reports(&self) -> Result<Vec<DailyReport>, StoreError> {
        Ok(self.read()?.reports.clone())
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, StoreSnapshot>, StoreError> {
        self.inner
            .read()
            .map_err(|_| StoreError::Backend("record store lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, StoreSnapshot>, StoreError> {
        self.inner
            .write()
            .map_err(|_| StoreError::Backend("record store lock poisoned".to_string()))
    }
}

fn task_title(tasks: &[TaskRecord], tenant_id: TenantId, task_id: TaskId) -> Option<String> {
    tasks
        .iter()
        .find(|t| t.id == task_id && t.tenant_id == tenant_id)
        .map(|t| t.title.clone())
}

#[async_trait::async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn list_members(&self) -> Result<Vec<Member>, StoreError> {
        Ok(self.read()?.members.clone())
    }

    async fn fetch_reports(
        &self,
        tenant_id: TenantId,
        user_id: UserId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailyReport>, StoreError> {
        let inner = self.read()?;

        let mut reports: Vec<DailyReport> = inner
            .reports
            .iter()
            .filter(|r| r.tenant_id == tenant_id && r.user_id == user_id)
            .filter(|r| start <= r.report_date && r.report_date <= end)
            .cloned()
            .collect();

        for report in &mut reports {
            for log in &mut report.work_logs {
                if log.task_title.is_none() {
                    log.task_title = task_title(&inner.tasks, tenant_id, log.task_id);
                }
            }
        }

        reports.sort_by(|a, b| {
            a.report_date
                .cmp(&b.report_date)
                .then(a.created_at.cmp(&b.created_at))
        });
        Ok(reports)
    }

    async fn upsert_weekly_summary(
        &self,
        summary: NewWeeklySummary,
    ) -> Result<WeeklySummary, StoreError> {
        let mut inner = self.write()?;

        if let Some(existing) = inner.weekly_summaries.iter_mut().find(|s| {
            s.tenant_id == summary.tenant_id
                && s.user_id == summary.user_id
                && s.window == summary.window
        }) {
            existing.content = summary.content;
            return Ok(existing.clone());
        }

        let stored = WeeklySummary {
            id: SummaryId::new(),
            tenant_id: summary.tenant_id,
            user_id: summary.user_id,
            content: summary.content,
            window: summary.window,
            created_at: Utc::now(),
        };
        inner.weekly_summaries.push(stored.clone());
        Ok(stored)
    }

    async fn load_preferences(&self, user_id: UserId) -> Result<Option<AiPreferences>, StoreError> {
        let inner = self.read()?;
        Ok(inner
            .preferences
            .iter()
            .find(|p| p.user_id == user_id)
            .map(|p| AiPreferences::from_json(Some(&p.ai_settings))))
    }

    async fn active_tasks(
        &self,
        tenant_id: TenantId,
        user_id: UserId,
    ) -> Result<Vec<CandidateTask>, StoreError> {
        let inner = self.read()?;
        Ok(inner
            .tasks
            .iter()
            .filter(|t| {
                t.tenant_id == tenant_id && t.assigned_to == Some(user_id) && t.status.is_active()
            })
            .map(|t| CandidateTask::new(t.id, t.title.clone()))
            .collect())
    }

    async fn insert_daily_report(&self, report: NewDailyReport) -> Result<DailyReport, StoreError> {
        let mut inner = self.write()?;

        let mut work_logs = Vec::with_capacity(report.work_logs.len());
        for log in &report.work_logs {
            let title = task_title(&inner.tasks, report.tenant_id, log.task_id).ok_or_else(|| {
                StoreError::IntegrityViolation(format!(
                    "work log references unknown task {}",
                    log.task_id
                ))
            })?;
            work_logs.push(WorkLog {
                task_id: log.task_id,
                hours: log.hours,
                task_title: Some(title),
            });
        }

        let stored = DailyReport {
            id: ReportId::new(),
            tenant_id: report.tenant_id,
            user_id: report.user_id,
            report_date: report.report_date,
            content_raw: report.content_raw,
            content_polished: Some(report.content_polished),
            subject: Some(report.subject),
            politeness_level: report.politeness_level,
            work_logs,
            created_at: Utc::now(),
        };
        inner.reports.push(stored.clone());
        Ok(stored)
    }
}
