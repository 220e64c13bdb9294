//! Monday..Friday reporting window.

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::value_object::ValueObject;

/// The working-week window (Monday through Friday) of the ISO week that contains
/// a reference date.
///
/// Weekend reference dates belong to the week that started on the preceding
/// Monday, so a Sunday maps to the Monday six days earlier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WeeklyWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl WeeklyWindow {
    /// Number of days between Monday and Friday.
    const WORKDAY_SPAN: i64 = 4;

    pub fn containing(reference: NaiveDate) -> Self {
        let offset = i64::from(reference.weekday().num_days_from_monday());
        let start = reference - Duration::days(offset);
        Self {
            start,
            end: start + Duration::days(Self::WORKDAY_SPAN),
        }
    }

    /// Inclusive on both ends.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

impl core::fmt::Display for WeeklyWindow {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

impl ValueObject for WeeklyWindow {}
