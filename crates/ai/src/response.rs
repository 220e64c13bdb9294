//! Decoding oracle answers into typed results.

use serde::Deserialize;
use serde_json::Value as JsonValue;

use nippo_core::{PolitenessLevel, TaskId};

use crate::error::AiError;
use crate::oracle::OracleResponse;
use crate::report::{PolishedReport, WorkLogEntry};

/// Shape accepted from raw text before coercion.
#[derive(Debug, Deserialize)]
struct RawReport {
    subject: String,
    content_polished: String,
    #[serde(default)]
    politeness_level: Option<JsonValue>,
    #[serde(default)]
    work_logs: Vec<RawWorkLog>,
}

#[derive(Debug, Deserialize)]
struct RawWorkLog {
    task_id: String,
    hours: JsonValue,
}

#[derive(Debug, Deserialize)]
struct RawSummary {
    content: String,
}

/// Strip a surrounding Markdown code fence (```json ... ```), if any.
fn unfence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string (e.g. "json") on the opening line.
    let body = match rest.find('\n') {
        Some(idx) => &rest[idx + 1..],
        None => rest,
    };
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

/// Resolve an oracle answer into a validated report.
///
/// Structured answers are used as-is. Raw text is parsed and coerced; when the
/// caller supplied a level it replaces whatever level the text declares.
pub(crate) fn decode_report(
    response: OracleResponse,
    requested_level: Option<PolitenessLevel>,
) -> Result<PolishedReport, AiError> {
    let report = match response {
        OracleResponse::Structured(value) => serde_json::from_value::<PolishedReport>(value)
            .map_err(|e| AiError::schema(e.to_string()))?,
        OracleResponse::RawText(text) => coerce_raw_report(&text, requested_level)?,
    };
    report.validate()
}

fn coerce_raw_report(
    text: &str,
    requested_level: Option<PolitenessLevel>,
) -> Result<PolishedReport, AiError> {
    let value: JsonValue =
        serde_json::from_str(unfence(text)).map_err(|e| AiError::malformed(e.to_string()))?;
    let raw: RawReport = serde_json::from_value(value).map_err(|e| AiError::schema(e.to_string()))?;

    // The declared level is only consulted when the caller supplied none.
    let politeness_level = match requested_level {
        Some(level) => level,
        None => raw
            .politeness_level
            .as_ref()
            .and_then(lax_integer)
            .map(PolitenessLevel::clamped)
            .unwrap_or_default(),
    };

    let work_logs = raw
        .work_logs
        .into_iter()
        .map(|log| {
            let task_id = log
                .task_id
                .parse::<TaskId>()
                .map_err(|e| AiError::schema(e.to_string()))?;
            let hours = lax_number(&log.hours).ok_or_else(|| {
                AiError::schema(format!("work log hours {} is not a number", log.hours))
            })?;
            Ok(WorkLogEntry { task_id, hours })
        })
        .collect::<Result<Vec<_>, AiError>>()?;

    Ok(PolishedReport {
        subject: raw.subject,
        content_polished: raw.content_polished,
        politeness_level,
        work_logs,
    })
}

/// A number, or a string holding one.
fn lax_number(value: &JsonValue) -> Option<f64> {
    match value {
        JsonValue::Number(n) => n.as_f64(),
        JsonValue::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// An integer, an integral float, or a string holding either.
fn lax_integer(value: &JsonValue) -> Option<i64> {
    if let JsonValue::Number(n) = value {
        if let Some(i) = n.as_i64() {
            return Some(i);
        }
    }
    let f = lax_number(value)?;
    (f.is_finite() && f.fract() == 0.0).then_some(f as i64)
}

/// Resolve an oracle answer into a weekly summary body.
///
/// Raw text that is not JSON is taken as the body itself.
pub(crate) fn decode_summary(response: OracleResponse) -> Result<String, AiError> {
    let content = match response {
        OracleResponse::Structured(JsonValue::String(s)) => s,
        OracleResponse::Structured(value) => serde_json::from_value::<RawSummary>(value)
            .map_err(|e| AiError::schema(e.to_string()))?
            .content,
        OracleResponse::RawText(text) => {
            let body = unfence(&text);
            match serde_json::from_str::<JsonValue>(body) {
                Ok(value @ JsonValue::Object(_)) => serde_json::from_value::<RawSummary>(value)
                    .map_err(|e| AiError::schema(e.to_string()))?
                    .content,
                Ok(JsonValue::String(s)) => s,
                _ => body.to_string(),
            }
        }
    };

    if content.trim().is_empty() {
        return Err(AiError::malformed("weekly summary body is empty"));
    }
    Ok(content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn level(n: u8) -> PolitenessLevel {
        PolitenessLevel::new(n).unwrap()
    }

    /// Raw-text answer carrying `value` serialized as JSON.
    fn raw(value: JsonValue) -> OracleResponse {
        OracleResponse::RawText(value.to_string())
    }

    #[test]
    fn unfence_strips_code_fences_with_info_string() {
        assert_eq!(unfence("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(unfence("  {\"a\":1}  "), "{\"a\":1}");
    }

    #[test]
    fn raw_text_level_is_overridden_by_requested_level() {
        let answer = raw(json!({
            "subject": "件名",
            "content_polished": "本文",
            "politeness_level": 1,
            "work_logs": []
        }));
        let report = decode_report(answer, Some(level(4))).unwrap();
        assert_eq!(report.politeness_level, level(4));
    }

    #[test]
    fn raw_text_level_is_clamped_when_none_requested() {
        let text = r#"{"subject":"件名","content_polished":"本文","politeness_level":9}"#;
        let report = decode_report(OracleResponse::RawText(text.into()), None).unwrap();
        assert_eq!(report.politeness_level, PolitenessLevel::MAX);
        assert!(report.work_logs.is_empty());
    }

    #[test]
    fn structured_value_is_used_directly() {
        let task = TaskId::new();
        let value = json!({
            "subject": "件名",
            "content_polished": "本文",
            "politeness_level": 2,
            "work_logs": [{ "task_id": task.to_string(), "hours": 1.5 }]
        });
        let report = decode_report(OracleResponse::Structured(value), Some(level(5))).unwrap();
        assert_eq!(report.politeness_level, level(2));
        assert_eq!(report.work_logs, vec![WorkLogEntry { task_id: task, hours: 1.5 }]);
    }

    #[test]
    fn unparseable_task_reference_is_a_schema_violation() {
        let answer = raw(json!({
            "subject": "s",
            "content_polished": "c",
            "work_logs": [{ "task_id": "T-1", "hours": 1 }]
        }));
        assert!(matches!(
            decode_report(answer, None),
            Err(AiError::SchemaViolation(_))
        ));
    }

    #[test]
    fn non_json_text_is_malformed_for_reports() {
        assert!(matches!(
            decode_report(OracleResponse::RawText("sorry, I can't".into()), None),
            Err(AiError::MalformedResponse(_))
        ));
    }

    #[test]
    fn summary_accepts_json_or_plain_text() {
        assert_eq!(
            decode_summary(OracleResponse::RawText(r#"{"content":"今週は"}"#.into())).unwrap(),
            "今週は"
        );
        assert_eq!(
            decode_summary(OracleResponse::RawText("今週は順調でした。".into())).unwrap(),
            "今週は順調でした。"
        );
        assert_eq!(
            decode_summary(OracleResponse::Structured(json!({ "content": "body" }))).unwrap(),
            "body"
        );
    }

    #[test]
    fn requested_level_wins_over_non_integer_declared_levels() {
        for declared in [json!("4"), json!(3.0), json!("high"), JsonValue::Null] {
            let answer = raw(json!({
                "subject": "件名",
                "content_polished": "本文",
                "politeness_level": declared.clone(),
                "work_logs": []
            }));
            let report = decode_report(answer, Some(level(2))).unwrap();
            assert_eq!(report.politeness_level, level(2), "declared {declared}");
        }
    }

    #[test]
    fn lax_declared_levels_are_coerced_when_none_requested() {
        let decode = |declared: JsonValue| {
            let answer = raw(json!({
                "subject": "s",
                "content_polished": "c",
                "politeness_level": declared
            }));
            decode_report(answer, None).unwrap().politeness_level
        };
        assert_eq!(decode(json!("4")), level(4));
        assert_eq!(decode(json!(5.0)), level(5));
        assert_eq!(decode(json!("12")), PolitenessLevel::MAX);
        assert_eq!(decode(json!(2.5)), PolitenessLevel::DEFAULT);
        assert_eq!(decode(json!("formal")), PolitenessLevel::DEFAULT);
    }

    #[test]
    fn string_hours_are_coerced_and_garbage_hours_rejected() {
        let task = TaskId::new();
        let with_hours = |hours: JsonValue| {
            raw(json!({
                "subject": "s",
                "content_polished": "c",
                "work_logs": [{ "task_id": task.to_string(), "hours": hours }]
            }))
        };

        let report = decode_report(with_hours(json!("2.5")), None).unwrap();
        assert_eq!(report.work_logs, vec![WorkLogEntry { task_id: task, hours: 2.5 }]);

        assert!(matches!(
            decode_report(with_hours(json!("two")), None),
            Err(AiError::SchemaViolation(_))
        ));
    }

    #[test]
    fn summary_json_string_literal_is_unquoted() {
        assert_eq!(
            decode_summary(OracleResponse::RawText(r#""今週は順調でした。""#.into())).unwrap(),
            "今週は順調でした。"
        );
    }

    #[test]
    fn empty_summary_is_rejected() {
        assert!(decode_summary(OracleResponse::RawText("   ".into())).is_err());
    }
}
