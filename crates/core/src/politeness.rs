//! Politeness level (1..=5) selecting the base instruction template.

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::value_object::ValueObject;

/// Formality of generated prose, from 1 (plain memo) to 5 (most deferential).
///
/// Construction always validates the range, so a `PolitenessLevel` in hand is
/// guaranteed to be within `1..=5`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct PolitenessLevel(u8);

impl PolitenessLevel {
    pub const MIN: PolitenessLevel = PolitenessLevel(1);
    pub const MAX: PolitenessLevel = PolitenessLevel(5);
    /// Level used when no explicit level is registered or supplied.
    pub const DEFAULT: PolitenessLevel = PolitenessLevel(3);

    pub fn new(level: u8) -> DomainResult<Self> {
        Self::try_from(i64::from(level))
    }

    /// Clamp an arbitrary integer into range.
    pub fn clamped(level: i64) -> Self {
        Self(level.clamp(1, 5) as u8)
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl Default for PolitenessLevel {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<i64> for PolitenessLevel {
    type Error = DomainError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        if (1..=5).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(DomainError::validation(format!(
                "politeness level must be within 1..=5 (got {value})"
            )))
        }
    }
}

impl From<PolitenessLevel> for u8 {
    fn from(value: PolitenessLevel) -> Self {
        value.0
    }
}

impl core::fmt::Display for PolitenessLevel {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl ValueObject for PolitenessLevel {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_out_of_range_levels() {
        assert!(PolitenessLevel::new(0).is_err());
        assert!(PolitenessLevel::new(6).is_err());
        assert_eq!(PolitenessLevel::new(5).unwrap(), PolitenessLevel::MAX);
    }

    #[test]
    fn clamps_into_range() {
        assert_eq!(PolitenessLevel::clamped(-3), PolitenessLevel::MIN);
        assert_eq!(PolitenessLevel::clamped(42), PolitenessLevel::MAX);
        assert_eq!(PolitenessLevel::clamped(4).get(), 4);
    }

    #[test]
    fn deserialization_validates_range() {
        let ok: PolitenessLevel = serde_json::from_str("2").unwrap();
        assert_eq!(ok.get(), 2);
        assert!(serde_json::from_str::<PolitenessLevel>("9").is_err());
        assert_eq!(serde_json::to_string(&ok).unwrap(), "2");
    }
}
