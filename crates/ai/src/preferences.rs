//! Per-user AI preferences (tone, output language, custom instructions).

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value as JsonValue;
use tracing::debug;

/// Style selector for generated prose.
///
/// Decoding never fails on an unrecognised key: anything outside the closed
/// set resolves to [`ToneKey::Professional`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub enum ToneKey {
    #[default]
    Professional,
    Concise,
    English,
    Enthusiastic,
}

impl ToneKey {
    pub const ALL: [ToneKey; 4] = [
        ToneKey::Professional,
        ToneKey::Concise,
        ToneKey::English,
        ToneKey::Enthusiastic,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ToneKey::Professional => "professional",
            ToneKey::Concise => "concise",
            ToneKey::English => "english",
            ToneKey::Enthusiastic => "enthusiastic",
        }
    }

    pub fn from_key(key: &str) -> Self {
        match key.trim().to_ascii_lowercase().as_str() {
            "professional" => ToneKey::Professional,
            "concise" => ToneKey::Concise,
            "english" => ToneKey::English,
            "enthusiastic" => ToneKey::Enthusiastic,
            _ => ToneKey::Professional,
        }
    }
}

impl Serialize for ToneKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ToneKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let key = String::deserialize(deserializer)?;
        Ok(ToneKey::from_key(&key))
    }
}

/// Output language of generated reports.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub enum Language {
    #[default]
    Ja,
    En,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Ja => "ja",
            Language::En => "en",
        }
    }

    pub fn from_code(code: &str) -> Self {
        match code.trim().to_ascii_lowercase().as_str() {
            "en" => Language::En,
            _ => Language::Ja,
        }
    }
}

impl Serialize for Language {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Language {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let code = String::deserialize(deserializer)?;
        Ok(Language::from_code(&code))
    }
}

/// AI settings stored on a user's profile.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AiPreferences {
    #[serde(default)]
    pub tone: ToneKey,
    #[serde(default)]
    pub language: Language,
    #[serde(default)]
    pub custom_instructions: String,
}

impl AiPreferences {
    pub fn new(tone: ToneKey) -> Self {
        Self {
            tone,
            ..Default::default()
        }
    }

    pub fn with_language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }

    pub fn with_custom_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.custom_instructions = instructions.into();
        self
    }

    /// Decode the profile's stored settings blob.
    ///
    /// Missing, null or undecodable blobs yield the defaults.
    pub fn from_json(value: Option<&JsonValue>) -> Self {
        match value {
            None | Some(JsonValue::Null) => Self::default(),
            Some(v) => serde_json::from_value(v.clone()).unwrap_or_else(|e| {
                debug!(error = %e, "ignoring undecodable ai settings");
                Self::default()
            }),
        }
    }
}
