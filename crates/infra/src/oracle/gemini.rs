//! `generateContent` client for Gemini models.

use serde::Deserialize;
use serde_json::{Value as JsonValue, json};
use tracing::debug;

use nippo_ai::{AiError, OracleRequest, OracleResponse, TextOracle};

use crate::config::Settings;

/// Oracle backed by the Gemini REST API.
///
/// Structured output is requested through `responseSchema`; the first
/// candidate's text comes back as [`OracleResponse::RawText`] and is decoded
/// by the generator.
pub struct GeminiOracle {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl std::fmt::Debug for GeminiOracle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiOracle")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl GeminiOracle {
    pub fn new(
        client: reqwest::Client,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, AiError> {
        let client = reqwest::Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|e| AiError::transport(format!("building HTTP client: {e}")))?;
        Ok(Self::new(client, &settings.base_url, &settings.api_key))
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, model)
    }
}

pub(crate) fn request_body(request: &OracleRequest) -> JsonValue {
    json!({
        "contents": [
            { "role": "user", "parts": [ { "text": request.prompt } ] }
        ],
        "generationConfig": {
            "responseMimeType": request.schema.mime_type(),
            "responseSchema": request.schema.json_schema(),
        }
    })
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

/// Concatenated text parts of the first candidate.
pub(crate) fn parse_response(body: &str) -> Result<OracleResponse, AiError> {
    let decoded: GenerateContentResponse = serde_json::from_str(body)
        .map_err(|e| AiError::malformed(format!("generateContent body: {e}")))?;

    let text: String = decoded
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|content| content.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(AiError::malformed("response has no candidate text"));
    }
    Ok(OracleResponse::RawText(text))
}

#[async_trait::async_trait]
impl TextOracle for GeminiOracle {
    async fn complete(&self, request: OracleRequest) -> Result<OracleResponse, AiError> {
        let url = self.endpoint(&request.model);
        debug!(model = %request.model, schema = ?request.schema, "calling generateContent");

        let resp = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request_body(&request))
            .send()
            .await
            .map_err(|e| AiError::transport(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(AiError::transport(format!("server returned {}: {body}", status.as_u16())));
        }

        let body = resp.text().await.map_err(|e| AiError::transport(e.to_string()))?;
        parse_response(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nippo_ai::ResponseSchema;

    #[test]
    fn request_body_carries_prompt_and_schema() {
        let request =
            OracleRequest::new("gemini-2.5-flash", "日報を書いて", ResponseSchema::PolishedReport);
        let body = request_body(&request);

        assert_eq!(body["contents"][0]["parts"][0]["text"], "日報を書いて");
        assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
        assert_eq!(
            body["generationConfig"]["responseSchema"],
            ResponseSchema::PolishedReport.json_schema()
        );
    }

    #[test]
    fn endpoint_includes_model() {
        let oracle = GeminiOracle::new(reqwest::Client::new(), "http://localhost:9000/", "k");
        assert_eq!(
            oracle.endpoint("gemini-2.5-flash"),
            "http://localhost:9000/v1beta/models/gemini-2.5-flash:generateContent"
        );
        assert!(!format!("{oracle:?}").contains("\"k\""));
    }

    #[test]
    fn first_candidate_text_is_returned_raw() {
        let body = r#"{
            "candidates": [
                { "content": { "parts": [
                    { "text": "{\"content\":" },
                    { "text": "\"週報\"}" }
                ] } },
                { "content": { "parts": [ { "text": "ignored" } ] } }
            ]
        }"#;

        assert_eq!(
            parse_response(body).unwrap(),
            OracleResponse::RawText(r#"{"content":"週報"}"#.to_string())
        );
    }

    #[test]
    fn empty_or_invalid_bodies_are_malformed() {
        assert!(matches!(
            parse_response(r#"{"candidates":[]}"#),
            Err(AiError::MalformedResponse(_))
        ));
        assert!(matches!(
            parse_response(r#"{"candidates":[{"finishReason":"SAFETY"}]}"#),
            Err(AiError::MalformedResponse(_))
        ));
        assert!(matches!(parse_response("<html>"), Err(AiError::MalformedResponse(_))));
    }
}
