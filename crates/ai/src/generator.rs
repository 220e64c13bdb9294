use tracing::{debug, warn};

use nippo_core::{DailyReport, PolitenessLevel};

use crate::error::AiError;
use crate::oracle::{OracleRequest, ResponseSchema, TextOracle};
use crate::preferences::AiPreferences;
use crate::prompts;
use crate::report::{CandidateTask, PolishedReport};
use crate::response;

/// Model selector used when none is configured.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Body returned by summary mode when there is nothing to summarise.
pub const NO_REPORTS_MESSAGE: &str = "対象期間の日報がありません。";

/// Turns notes into reports through a text-completion oracle.
///
/// - `generate` makes at most one oracle call and always returns a report:
///   any failure yields [`PolishedReport::fallback`].
/// - `summarize_week` makes at most one oracle call, none for an empty input,
///   and returns errors so batch callers can count them.
#[derive(Debug, Clone)]
pub struct ReportGenerator<O> {
    oracle: O,
    model: String,
}

impl<O: TextOracle> ReportGenerator<O> {
    pub fn new(oracle: O) -> Self {
        Self {
            oracle,
            model: DEFAULT_MODEL.to_string(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Polish `raw_content` and extract per-task hours.
    ///
    /// Work-log task ids are returned as declared by the oracle, even when
    /// they are not among `candidate_tasks`.
    pub async fn generate(
        &self,
        raw_content: &str,
        politeness_level: Option<PolitenessLevel>,
        candidate_tasks: &[CandidateTask],
        preferences: Option<&AiPreferences>,
    ) -> PolishedReport {
        let prompt =
            prompts::report_prompt(raw_content, politeness_level, candidate_tasks, preferences);

        match self.request_report(prompt, politeness_level).await {
            Ok(report) => {
                debug!(
                    level = %report.politeness_level,
                    work_logs = report.work_logs.len(),
                    "report generated"
                );
                report
            }
            Err(e) => {
                warn!(error = %e, "report generation failed; returning fallback report");
                PolishedReport::fallback(raw_content)
            }
        }
    }

    async fn request_report(
        &self,
        prompt: String,
        politeness_level: Option<PolitenessLevel>,
    ) -> Result<PolishedReport, AiError> {
        let request = OracleRequest::new(&self.model, prompt, ResponseSchema::PolishedReport);
        let answer = self.oracle.complete(request).await?;
        response::decode_report(answer, politeness_level)
    }

    /// Synthesise one weekly body from a member's daily reports.
    ///
    /// An empty slice returns [`NO_REPORTS_MESSAGE`] without calling the oracle.
    pub async fn summarize_week(
        &self,
        reports: &[DailyReport],
        preferences: Option<&AiPreferences>,
    ) -> Result<String, AiError> {
        if reports.is_empty() {
            return Ok(NO_REPORTS_MESSAGE.to_string());
        }

        let prompt = prompts::weekly_prompt(reports, preferences);
        let request = OracleRequest::new(&self.model, prompt, ResponseSchema::WeeklySummary);
        let answer = self.oracle.complete(request).await?;
        response::decode_summary(answer)
    }
}
