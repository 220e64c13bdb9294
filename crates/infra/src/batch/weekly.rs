use chrono::{Local, NaiveDate};
use futures::stream::{self, StreamExt};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use nippo_ai::{AiError, ReportGenerator, TextOracle};
use nippo_core::{Member, NewWeeklySummary, WeeklyWindow};

use super::scope::TenantScope;
use crate::store::{RecordStore, StoreError};

/// Per-member failure inside a weekly run. Logged and counted, never returned
/// from [`WeeklyAggregator::run`].
#[derive(Debug, Error)]
pub enum BatchError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Ai(#[from] AiError),
}

/// Counters for one weekly run.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchOutcome {
    pub success_count: usize,
    pub skip_count: usize,
    pub error_count: usize,
}

impl BatchOutcome {
    pub fn processed(&self) -> usize {
        self.success_count + self.skip_count + self.error_count
    }

    fn record(mut self, outcome: MemberOutcome) -> Self {
        match outcome {
            MemberOutcome::Summarized => self.success_count += 1,
            MemberOutcome::Skipped => self.skip_count += 1,
            MemberOutcome::Failed => self.error_count += 1,
        }
        self
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum MemberOutcome {
    Summarized,
    Skipped,
    Failed,
}

/// Config for the weekly aggregator.
#[derive(Debug, Clone)]
pub struct WeeklyBatchConfig {
    pub scope: TenantScope,
    /// Members processed at once. `1` keeps the run strictly sequential.
    pub concurrency: usize,
}

impl Default for WeeklyBatchConfig {
    fn default() -> Self {
        Self {
            scope: TenantScope::Any,
            concurrency: 1,
        }
    }
}

impl WeeklyBatchConfig {
    pub fn with_scope(mut self, scope: TenantScope) -> Self {
        self.scope = scope;
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }
}

/// Generates one weekly summary per member for the Monday..Friday window.
///
/// - Members with no reports in the window are skipped without an oracle call.
/// - A member's fetch, generation or write failure is logged and counted; the
///   run continues with the next member.
/// - Summaries are upserted by (tenant, user, window), so re-running a week
///   replaces rather than duplicates.
pub struct WeeklyAggregator<S, O> {
    store: S,
    generator: ReportGenerator<O>,
    config: WeeklyBatchConfig,
}

impl<S, O> WeeklyAggregator<S, O>
where
    S: RecordStore,
    O: TextOracle,
{
    pub fn new(store: S, generator: ReportGenerator<O>) -> Self {
        Self {
            store,
            generator,
            config: WeeklyBatchConfig::default(),
        }
    }

    pub fn with_config(mut self, config: WeeklyBatchConfig) -> Self {
        self.config = config;
        self
    }

    /// Run over every member in scope for the week containing `reference_date`
    /// (today when absent).
    ///
    /// Only a failure to enumerate members is returned as an error; nothing has
    /// been processed in that case.
    pub async fn run(&self, reference_date: Option<NaiveDate>) -> Result<BatchOutcome, StoreError> {
        let reference = reference_date.unwrap_or_else(|| Local::now().date_naive());
        let window = WeeklyWindow::containing(reference);
        info!(window = %window, scope = ?self.config.scope, "weekly summary run started");

        let members: Vec<Member> = self
            .store
            .list_members()
            .await?
            .into_iter()
            .filter(|m| self.config.scope.admits(m))
            .collect();

        let outcome = stream::iter(members)
            .map(|member| self.process_member(member, window))
            .buffer_unordered(self.config.concurrency.max(1))
            .fold(BatchOutcome::default(), |acc, outcome| async move { acc.record(outcome) })
            .await;

        info!(
            window = %window,
            success = outcome.success_count,
            skip = outcome.skip_count,
            error = outcome.error_count,
            "weekly summary run finished"
        );
        Ok(outcome)
    }

    async fn process_member(&self, member: Member, window: WeeklyWindow) -> MemberOutcome {
        match self.summarize_member(&member, window).await {
            Ok(true) => MemberOutcome::Summarized,
            Ok(false) => MemberOutcome::Skipped,
            Err(e) => {
                warn!(
                    tenant = %member.tenant_id,
                    user = %member.user_id,
                    error = %e,
                    "weekly summary failed for member"
                );
                MemberOutcome::Failed
            }
        }
    }

    /// `Ok(false)` when the member has nothing to summarise.
    async fn summarize_member(
        &self,
        member: &Member,
        window: WeeklyWindow,
    ) -> Result<bool, BatchError> {
        let reports = self
            .store
            .fetch_reports(member.tenant_id, member.user_id, window.start, window.end)
            .await?;

        if reports.is_empty() {
            debug!(
                tenant = %member.tenant_id,
                user = %member.user_id,
                "no reports in window; skipping"
            );
            return Ok(false);
        }

        let preferences = self.store.load_preferences(member.user_id).await?;
        let content = self.generator.summarize_week(&reports, preferences.as_ref()).await?;

        let stored = self
            .store
            .upsert_weekly_summary(NewWeeklySummary {
                tenant_id: member.tenant_id,
                user_id: member.user_id,
                content,
                window,
            })
            .await?;

        debug!(
            tenant = %member.tenant_id,
            user = %member.user_id,
            summary = %stored.id,
            reports = reports.len(),
            "weekly summary stored"
        );
        Ok(true)
    }
}
