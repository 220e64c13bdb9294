//! Daily report submission.

use chrono::NaiveDate;
use tracing::{info, warn};

use nippo_ai::{
    CandidateTask, PolishedReport, ReportDraft, ReportGenerator, TextOracle, WorkLogEntry,
};
use nippo_core::{DailyReport, Member, NewDailyReport, NewWorkLog};

use crate::store::{RecordStore, StoreError};

/// Result of a submission: the stored report plus what the generator produced.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmittedReport {
    pub report: DailyReport,
    pub polished: PolishedReport,
    /// Work logs returned by the generator that referenced tasks outside the
    /// member's active task list.
    pub dropped_work_logs: Vec<WorkLogEntry>,
}

/// Polishes a member's notes and persists the result as a daily report.
pub struct DailyReportService<S, O> {
    store: S,
    generator: ReportGenerator<O>,
}

impl<S, O> DailyReportService<S, O>
where
    S: RecordStore,
    O: TextOracle,
{
    pub fn new(store: S, generator: ReportGenerator<O>) -> Self {
        Self { store, generator }
    }

    /// Generate and store a daily report for `member` on `report_date`.
    ///
    /// Preferences and candidate tasks are best effort: a failure to load
    /// either is logged and the report is generated without them. Only the
    /// final write can fail the submission.
    pub async fn submit(
        &self,
        member: Member,
        draft: ReportDraft,
        report_date: NaiveDate,
    ) -> Result<SubmittedReport, StoreError> {
        let preferences = match self.store.load_preferences(member.user_id).await {
            Ok(p) => p,
            Err(e) => {
                warn!(
                    user = %member.user_id,
                    error = %e,
                    "loading preferences failed; using defaults"
                );
                None
            }
        };

        let tasks = match self.store.active_tasks(member.tenant_id, member.user_id).await {
            Ok(t) => t,
            Err(e) => {
                warn!(
                    tenant = %member.tenant_id,
                    user = %member.user_id,
                    error = %e,
                    "loading active tasks failed; generating without task context"
                );
                Vec::new()
            }
        };

        let polished = self
            .generator
            .generate(
                &draft.raw_content,
                Some(draft.politeness_level),
                &tasks,
                preferences.as_ref(),
            )
            .await;

        let (kept, dropped) = partition_known(&polished.work_logs, &tasks);
        for entry in &dropped {
            warn!(
                tenant = %member.tenant_id,
                user = %member.user_id,
                task = %entry.task_id,
                "dropping work log for unknown task"
            );
        }

        let report = self
            .store
            .insert_daily_report(NewDailyReport {
                tenant_id: member.tenant_id,
                user_id: member.user_id,
                report_date,
                content_raw: draft.raw_content,
                content_polished: polished.content_polished.clone(),
                subject: polished.subject.clone(),
                politeness_level: polished.politeness_level,
                work_logs: kept,
            })
            .await?;

        info!(
            tenant = %member.tenant_id,
            user = %member.user_id,
            report = %report.id,
            date = %report_date,
            fallback = polished.is_fallback(),
            "daily report stored"
        );

        Ok(SubmittedReport {
            report,
            polished,
            dropped_work_logs: dropped,
        })
    }

    /// Stored reports for `member` between `start` and `end` inclusive.
    pub async fn preview_week(
        &self,
        member: Member,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailyReport>, StoreError> {
        self.store
            .fetch_reports(member.tenant_id, member.user_id, start, end)
            .await
    }
}

fn partition_known(
    entries: &[WorkLogEntry],
    tasks: &[CandidateTask],
) -> (Vec<NewWorkLog>, Vec<WorkLogEntry>) {
    let mut kept = Vec::new();
    let mut dropped = Vec::new();
    for entry in entries {
        if tasks.iter().any(|t| t.id == entry.task_id) {
            kept.push(NewWorkLog::from(*entry));
        } else {
            dropped.push(*entry);
        }
    }
    (kept, dropped)
}
