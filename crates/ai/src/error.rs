use thiserror::Error;

/// Failure while talking to the text-completion oracle or decoding its answer.
///
/// `ReportGenerator::generate` never surfaces this type: it converts every
/// variant into the fallback report. Summary mode returns it so batch callers
/// can count the member as failed.
#[derive(Debug, Clone, Error)]
pub enum AiError {
    /// The request never produced a response (network, timeout, HTTP status).
    #[error("oracle request failed: {0}")]
    Transport(String),

    /// The response could not be decoded at all.
    #[error("malformed oracle response: {0}")]
    MalformedResponse(String),

    /// The response decoded but does not satisfy the requested schema.
    #[error("oracle response violates schema: {0}")]
    SchemaViolation(String),
}

impl AiError {
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedResponse(msg.into())
    }

    pub fn schema(msg: impl Into<String>) -> Self {
        Self::SchemaViolation(msg.into())
    }
}
