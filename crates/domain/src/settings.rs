use crate::rule::PatternType;
use chrono_tz::{Tz, UTC};
use std::str::FromStr;
use thiserror::Error;

/// Whether a weekday-in-month rule may select several weeks, like the
/// first and third friday, or only one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeekSelection {
    Single,
    Multiple,
}

#[derive(Error, Debug, PartialEq)]
#[error("Invalid week selection: `{0}`, expected `single` or `multiple`")]
pub struct InvalidWeekSelectionError(String);

impl FromStr for WeekSelection {
    type Err = InvalidWeekSelectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "single" => Ok(Self::Single),
            "multiple" => Ok(Self::Multiple),
            _ => Err(InvalidWeekSelectionError(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EditorSettings {
    /// Zone the wall-clock instants of a rule are interpreted in
    pub timezone: Tz,
    pub monthly_weeks: WeekSelection,
    pub yearly_weeks: WeekSelection,
}

impl EditorSettings {
    pub fn set_timezone(&mut self, timezone: &str) -> bool {
        match timezone.parse::<Tz>() {
            Ok(tzid) => {
                self.timezone = tzid;
                true
            }
            Err(_) => false,
        }
    }

    pub fn week_selection(&self, pattern_type: PatternType) -> WeekSelection {
        match pattern_type {
            PatternType::Yearly => self.yearly_weeks,
            _ => self.monthly_weeks,
        }
    }
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            timezone: UTC,
            monthly_weeks: WeekSelection::Multiple,
            yearly_weeks: WeekSelection::Single,
        }
    }
}
