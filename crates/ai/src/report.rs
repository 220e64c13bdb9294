use serde::{Deserialize, Serialize};

use nippo_core::{NewWorkLog, PolitenessLevel, TaskId};

use crate::error::AiError;

/// Subject used when generation fails.
pub const FALLBACK_SUBJECT: &str = "【報告】業務日報（AI変換失敗）";

/// A user's unpolished notes plus the requested formality.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportDraft {
    pub raw_content: String,
    pub politeness_level: PolitenessLevel,
}

impl ReportDraft {
    pub fn new(raw_content: impl Into<String>, politeness_level: PolitenessLevel) -> Self {
        Self {
            raw_content: raw_content.into(),
            politeness_level,
        }
    }
}

/// A task the reporter is currently assigned to, offered as extraction context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateTask {
    pub id: TaskId,
    pub title: String,
}

impl CandidateTask {
    pub fn new(id: TaskId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
        }
    }
}

/// Hours the oracle attributed to one task.
///
/// `task_id` is whatever the oracle declared; it is not checked against the
/// candidate list here.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkLogEntry {
    pub task_id: TaskId,
    pub hours: f64,
}

impl From<WorkLogEntry> for NewWorkLog {
    fn from(entry: WorkLogEntry) -> Self {
        NewWorkLog {
            task_id: entry.task_id,
            hours: entry.hours,
        }
    }
}

/// The structured result of one generation call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolishedReport {
    pub subject: String,
    pub content_polished: String,
    pub politeness_level: PolitenessLevel,
    #[serde(default)]
    pub work_logs: Vec<WorkLogEntry>,
}

impl PolishedReport {
    /// Deterministic stand-in returned whenever generation fails.
    pub fn fallback(raw_content: &str) -> Self {
        Self {
            subject: FALLBACK_SUBJECT.to_string(),
            content_polished: format!("AI変換中にエラーが発生しました。\n原文: {raw_content}"),
            politeness_level: PolitenessLevel::MIN,
            work_logs: Vec::new(),
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.subject == FALLBACK_SUBJECT && self.work_logs.is_empty()
    }

    pub(crate) fn validate(self) -> Result<Self, AiError> {
        if self.subject.trim().is_empty() {
            return Err(AiError::schema("subject is empty"));
        }
        if self.content_polished.trim().is_empty() {
            return Err(AiError::schema("content_polished is empty"));
        }
        if let Some(bad) = self
            .work_logs
            .iter()
            .find(|log| !(log.hours.is_finite() && log.hours >= 0.0))
        {
            return Err(AiError::schema(format!(
                "work log for task {} has invalid hours {}",
                bad.task_id, bad.hours
            )));
        }
        Ok(self)
    }
}
