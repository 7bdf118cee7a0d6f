use crate::{
    date::{get_max_month_length, start_of_day_millis},
    rule::{DailyPattern, MonthDay, Pattern, RecurrenceRule, SeriesEnd},
    shared::recurrence::Month,
};
use chrono_tz::{Tz, UTC};
use thiserror::Error;

/// Reason why a `RecurrenceRule` cannot be handed to the occurrence service
/// yet. These are not failures of the editor, they are meant to be shown to
/// the user while editing continues.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Interval must be a positive number")]
    InvalidInterval,
    #[error("No weekday specified")]
    NoWeekDay,
    #[error("No week of month specified")]
    NoWeekOfMonth,
    #[error("Day of month `{day}` is out of range")]
    InvalidDayOfMonth { day: u32 },
    #[error("No date specified")]
    NoIndividualDate,
    #[error("End type {end_type} does not fit pattern type {pattern_type}")]
    EndTypeMismatch {
        pattern_type: &'static str,
        end_type: &'static str,
    },
    #[error("Number of occurrences must be a positive number")]
    InvalidOccurrences,
    #[error("The series ends before it starts")]
    SeriesEndBeforeStart,
    #[error("The event ends before it starts")]
    EndBeforeStart,
}

/// Validates with the start day taken in UTC, see `validate_in`
pub fn validate(rule: &RecurrenceRule) -> Option<ValidationError> {
    validate_in(rule, &UTC)
}

/// Validates a rule whose instants are wall-clock times in `tz`. The zone
/// decides where the start day begins for the series end date check.
pub fn validate_in(rule: &RecurrenceRule, tz: &Tz) -> Option<ValidationError> {
    validate_pattern(&rule.pattern)
        .or_else(|| validate_series_end(rule, tz))
        .or_else(|| match (rule.start, rule.end) {
            (Some(start), Some(end)) if end < start => Some(ValidationError::EndBeforeStart),
            _ => None,
        })
}

fn validate_interval(interval: u32) -> Option<ValidationError> {
    if interval == 0 {
        Some(ValidationError::InvalidInterval)
    } else {
        None
    }
}

fn validate_month_day(day: &MonthDay, month: Option<Month>) -> Option<ValidationError> {
    match day {
        MonthDay::WeekdayInMonth { weeks, .. } => {
            if weeks.is_empty() {
                Some(ValidationError::NoWeekOfMonth)
            } else {
                None
            }
        }
        MonthDay::DayOfMonth { day } => {
            let max_day = month.map(get_max_month_length).unwrap_or(31);
            if *day < 1 || *day > max_day {
                Some(ValidationError::InvalidDayOfMonth { day: *day })
            } else {
                None
            }
        }
    }
}

fn validate_pattern(pattern: &Pattern) -> Option<ValidationError> {
    match pattern {
        Pattern::None => None,
        Pattern::Daily(DailyPattern::EveryWorkingDay) => None,
        Pattern::Daily(DailyPattern::Interval(interval)) => validate_interval(*interval),
        Pattern::Weekly {
            interval,
            week_days,
        } => validate_interval(*interval).or_else(|| {
            if week_days.is_empty() {
                Some(ValidationError::NoWeekDay)
            } else {
                None
            }
        }),
        Pattern::Monthly { interval, day } => {
            validate_interval(*interval).or_else(|| validate_month_day(day, None))
        }
        Pattern::Yearly {
            interval,
            month,
            day,
        } => validate_interval(*interval).or_else(|| validate_month_day(day, Some(*month))),
        Pattern::Individual { dates } => {
            if dates.is_empty() {
                Some(ValidationError::NoIndividualDate)
            } else {
                None
            }
        }
    }
}

fn validate_series_end(rule: &RecurrenceRule, tz: &Tz) -> Option<ValidationError> {
    let pattern_type = rule.pattern_type();
    match (pattern_type.is_recurring(), rule.series_end) {
        (true, SeriesEnd::Single)
        | (false, SeriesEnd::Times(_))
        | (false, SeriesEnd::Date(_)) => Some(ValidationError::EndTypeMismatch {
            pattern_type: pattern_type.as_str(),
            end_type: rule.end_type().as_str(),
        }),
        (_, SeriesEnd::Times(0)) => Some(ValidationError::InvalidOccurrences),
        (_, SeriesEnd::Date(end_date)) => match rule.start {
            // The series end is a date, so compare against the whole start day
            Some(start) if end_date < start_of_day_millis(start, tz).unwrap_or(start) => {
                Some(ValidationError::SeriesEndBeforeStart)
            }
            _ => None,
        },
        _ => None,
    }
}
