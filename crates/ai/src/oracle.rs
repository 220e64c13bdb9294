//! Text-completion oracle boundary.
//!
//! The oracle is an opaque service: it receives a model selector, a prompt and
//! the schema the answer must follow, and returns either an already-validated
//! structured value or raw text. The two shapes are resolved into
//! [`OracleResponse`] here so nothing downstream inspects the transport's
//! response object.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};

use serde_json::{json, Value as JsonValue};

use crate::error::AiError;

/// Output schema requested from the oracle.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ResponseSchema {
    /// `{subject, content_polished, politeness_level, work_logs[]}`
    PolishedReport,
    /// `{content}`
    WeeklySummary,
}

impl ResponseSchema {
    pub fn mime_type(&self) -> &'static str {
        "application/json"
    }

    /// JSON schema in the OpenAPI subset accepted by structured-output models.
    pub fn json_schema(&self) -> JsonValue {
        match self {
            ResponseSchema::PolishedReport => json!({
                "type": "object",
                "properties": {
                    "subject": { "type": "string" },
                    "content_polished": { "type": "string" },
                    "politeness_level": { "type": "integer" },
                    "work_logs": {
                        "type": "array",
                        "items": {
                            "type": "object",
                            "properties": {
                                "task_id": { "type": "string" },
                                "hours": { "type": "number" }
                            },
                            "required": ["task_id", "hours"]
                        }
                    }
                },
                "required": ["subject", "content_polished", "politeness_level", "work_logs"]
            }),
            ResponseSchema::WeeklySummary => json!({
                "type": "object",
                "properties": {
                    "content": { "type": "string" }
                },
                "required": ["content"]
            }),
        }
    }
}

/// One completion request.
#[derive(Debug, Clone, PartialEq)]
pub struct OracleRequest {
    pub model: String,
    pub prompt: String,
    pub schema: ResponseSchema,
}

impl OracleRequest {
    pub fn new(
        model: impl Into<String>,
        prompt: impl Into<String>,
        schema: ResponseSchema,
    ) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            schema,
        }
    }
}

/// What the oracle handed back.
#[derive(Debug, Clone, PartialEq)]
pub enum OracleResponse {
    /// A value the oracle already validated against the requested schema.
    Structured(JsonValue),
    /// Text that still has to be parsed and coerced.
    RawText(String),
}

/// Text-completion service with structured-output capability.
///
/// Implementations must be stateless from the caller's point of view: a call
/// that is abandoned leaves nothing behind to clean up.
#[async_trait::async_trait]
pub trait TextOracle: Send + Sync {
    async fn complete(&self, request: OracleRequest) -> Result<OracleResponse, AiError>;
}

#[async_trait::async_trait]
impl<O> TextOracle for Arc<O>
where
    O: TextOracle + ?Sized,
{
    async fn complete(&self, request: OracleRequest) -> Result<OracleResponse, AiError> {
        (**self).complete(request).await
    }
}

/// In-memory oracle for tests/dev.
///
/// Replays queued answers in order and records every request it receives.
/// When the queue is empty it fails with a transport error.
#[derive(Debug, Default)]
pub struct ScriptedOracle {
    answers: Mutex<VecDeque<Result<OracleResponse, AiError>>>,
    requests: Mutex<Vec<OracleRequest>>,
}

impl ScriptedOracle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, answer: Result<OracleResponse, AiError>) {
        self.answers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(answer);
    }

    pub fn push_structured(&self, value: JsonValue) {
        self.push(Ok(OracleResponse::Structured(value)));
    }

    pub fn push_text(&self, text: impl Into<String>) {
        self.push(Ok(OracleResponse::RawText(text.into())));
    }

    pub fn push_failure(&self, error: AiError) {
        self.push(Err(error));
    }

    pub fn requests(&self) -> Vec<OracleRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

#[async_trait::async_trait]
impl TextOracle for ScriptedOracle {
    async fn complete(&self, request: OracleRequest) -> Result<OracleResponse, AiError> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request);

        self.answers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .unwrap_or_else(|| Err(AiError::transport("scripted oracle has no answer queued")))
    }
}
