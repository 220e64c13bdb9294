//! `nippo-ai`
//!
//! **Responsibility:** turning notes into reports through a text-completion oracle.
//!
//! This crate stays storage-agnostic:
//! - inputs (notes, candidate tasks, preferences, daily reports) are provided by callers;
//! - it never persists anything;
//! - the oracle is injected, never constructed here.

pub mod error;
pub mod generator;
pub mod oracle;
pub mod preferences;
pub mod prompts;
pub mod report;
mod response;

pub use error::AiError;
pub use generator::{DEFAULT_MODEL, NO_REPORTS_MESSAGE, ReportGenerator};
pub use oracle::{OracleRequest, OracleResponse, ResponseSchema, ScriptedOracle, TextOracle};
pub use preferences::{AiPreferences, Language, ToneKey};
pub use report::{CandidateTask, FALLBACK_SUBJECT, PolishedReport, ReportDraft, WorkLogEntry};
