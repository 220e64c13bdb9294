//! Process configuration read from environment variables.

use std::time::Duration;

use thiserror::Error;

use nippo_ai::DEFAULT_MODEL;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value for {name}: {value:?} ({reason})")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
    pub batch_concurrency: usize,
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("batch_concurrency", &self.batch_concurrency)
            .finish()
    }
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build settings from an arbitrary variable lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let api_key = get("GEMINI_API_KEY").ok_or(ConfigError::Missing("GEMINI_API_KEY"))?;
        let model = get("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let base_url = get("GEMINI_BASE_URL")
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let timeout_secs = match get("ORACLE_TIMEOUT_SECS") {
            Some(raw) => parse_positive("ORACLE_TIMEOUT_SECS", &raw)?,
            None => DEFAULT_TIMEOUT_SECS,
        };
        let batch_concurrency = match get("BATCH_CONCURRENCY") {
            Some(raw) => parse_positive("BATCH_CONCURRENCY", &raw)? as usize,
            None => 1,
        };

        Ok(Self {
            api_key,
            model,
            base_url,
            timeout: Duration::from_secs(timeout_secs),
            batch_concurrency,
        })
    }
}

fn parse_positive(name: &'static str, raw: &str) -> Result<u64, ConfigError> {
    let invalid = |reason: String| ConfigError::Invalid {
        name,
        value: raw.to_string(),
        reason,
    };
    let value: u64 = raw.parse().map_err(|e: std::num::ParseIntError| invalid(e.to_string()))?;
    if value == 0 {
        return Err(invalid("must be at least 1".to_string()));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults_apply_when_only_key_is_set() {
        let settings = Settings::from_lookup(lookup(&[("GEMINI_API_KEY", "secret")])).unwrap();

        assert_eq!(settings.api_key, "secret");
        assert_eq!(settings.model, DEFAULT_MODEL);
        assert_eq!(settings.base_url, DEFAULT_BASE_URL);
        assert_eq!(settings.timeout, Duration::from_secs(60));
        assert_eq!(settings.batch_concurrency, 1);
    }

    #[test]
    fn missing_or_blank_key_is_an_error() {
        assert_eq!(
            Settings::from_lookup(lookup(&[])).unwrap_err(),
            ConfigError::Missing("GEMINI_API_KEY")
        );
        assert_eq!(
            Settings::from_lookup(lookup(&[("GEMINI_API_KEY", "  ")])).unwrap_err(),
            ConfigError::Missing("GEMINI_API_KEY")
        );
    }

    #[test]
    fn overrides_are_read_and_trailing_slash_trimmed() {
        let settings = Settings::from_lookup(lookup(&[
            ("GEMINI_API_KEY", "k"),
            ("GEMINI_MODEL", "gemini-2.5-pro"),
            ("GEMINI_BASE_URL", "http://localhost:8080/"),
            ("ORACLE_TIMEOUT_SECS", "5"),
            ("BATCH_CONCURRENCY", "4"),
        ]))
        .unwrap();

        assert_eq!(settings.model, "gemini-2.5-pro");
        assert_eq!(settings.base_url, "http://localhost:8080");
        assert_eq!(settings.timeout, Duration::from_secs(5));
        assert_eq!(settings.batch_concurrency, 4);
    }

    #[test]
    fn invalid_numbers_are_rejected() {
        let err = Settings::from_lookup(lookup(&[
            ("GEMINI_API_KEY", "k"),
            ("BATCH_CONCURRENCY", "0"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: "BATCH_CONCURRENCY", .. }));

        let err = Settings::from_lookup(lookup(&[
            ("GEMINI_API_KEY", "k"),
            ("ORACLE_TIMEOUT_SECS", "soon"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: "ORACLE_TIMEOUT_SECS", .. }));
    }

    #[test]
    fn debug_output_hides_the_api_key() {
        let settings = Settings::from_lookup(lookup(&[("GEMINI_API_KEY", "top-secret")])).unwrap();
        assert!(!format!("{settings:?}").contains("top-secret"));
    }
}
