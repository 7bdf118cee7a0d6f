use crate::shared::wire::millis_to_wire;
use recurrence_editor_domain::{
    DailyPattern, Month, MonthDay, Pattern, RecurrenceRule, SeriesEnd, WeekDay, WeekOfMonth,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

fn is_false(value: &bool) -> bool {
    !*value
}

fn is_true(value: &bool) -> bool {
    *value
}

/// Wire shape of a `RecurrenceRule`. Only the fields relevant to the pattern
/// type and end type of the rule are present.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurrenceRuleDTO {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
    #[serde(skip_serializing_if = "is_false")]
    pub whole_day: bool,
    pub pattern: PatternDTO,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub exceptions: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub series_end_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub series_occurrences: Option<String>,
    #[serde(skip_serializing_if = "is_true")]
    pub current_till_end: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_series: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternDTO {
    #[serde(rename = "type")]
    pub pattern_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interval: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub every_working_day: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weekdays: Option<Vec<WeekDay>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days_of_month: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weeks_of_month: Option<Vec<WeekOfMonth>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub month: Option<Month>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dates: Option<Vec<String>>,
}

impl PatternDTO {
    fn with_month_day(mut self, day: &MonthDay) -> Self {
        match day {
            MonthDay::DayOfMonth { day } => {
                self.days_of_month = Some(day.to_string());
            }
            MonthDay::WeekdayInMonth { week_day, weeks } => {
                self.weekdays = Some(vec![*week_day]);
                self.weeks_of_month = Some(weeks.iter().copied().collect());
            }
        }
        self
    }

    pub fn new(pattern: &Pattern) -> Self {
        let base = Self {
            pattern_type: pattern.pattern_type().as_str().to_string(),
            ..Default::default()
        };
        match pattern {
            Pattern::None => base,
            Pattern::Daily(DailyPattern::EveryWorkingDay) => Self {
                every_working_day: Some(true),
                ..base
            },
            Pattern::Daily(DailyPattern::Interval(interval)) => Self {
                interval: Some(interval.to_string()),
                ..base
            },
            Pattern::Weekly {
                interval,
                week_days,
            } => Self {
                interval: Some(interval.to_string()),
                weekdays: Some(week_days.iter().copied().collect()),
                ..base
            },
            Pattern::Monthly { interval, day } => Self {
                interval: Some(interval.to_string()),
                ..base
            }
            .with_month_day(day),
            Pattern::Yearly {
                interval,
                month,
                day,
            } => Self {
                interval: Some(interval.to_string()),
                month: Some(*month),
                ..base
            }
            .with_month_day(day),
            Pattern::Individual { dates } => Self {
                dates: Some(dates.iter().copied().map(millis_to_wire).collect()),
                ..base
            },
        }
    }
}

impl RecurrenceRuleDTO {
    pub fn new(rule: &RecurrenceRule) -> Self {
        let (series_end_date, series_occurrences) = match rule.series_end {
            SeriesEnd::Single => (None, None),
            SeriesEnd::Times(times) => (None, Some(times.to_string())),
            SeriesEnd::Date(date) => (Some(millis_to_wire(date)), None),
        };
        Self {
            start: rule.start.map(millis_to_wire),
            end: rule.end.map(millis_to_wire),
            whole_day: rule.whole_day,
            pattern: PatternDTO::new(&rule.pattern),
            exceptions: rule.exceptions.iter().copied().map(millis_to_wire).collect(),
            series_end_date,
            series_occurrences,
            current_till_end: rule.current_till_end,
            parent_series: rule.parent_series.as_ref().map(|id| id.to_string()),
        }
    }
}

/// Loosely typed view of an incoming rule. Every field is kept as a raw JSON
/// value so that a single malformed field never fails the whole decode.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRecurrenceRule {
    pub start: Option<Value>,
    pub end: Option<Value>,
    pub whole_day: Option<Value>,
    pub pattern: Option<Value>,
    pub exceptions: Option<Value>,
    pub series_end_date: Option<Value>,
    pub series_occurrences: Option<Value>,
    pub current_till_end: Option<Value>,
    pub parent_series: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPattern {
    #[serde(rename = "type")]
    pub pattern_type: Option<Value>,
    pub interval: Option<Value>,
    pub every_working_day: Option<Value>,
    pub weekdays: Option<Value>,
    pub days_of_month: Option<Value>,
    pub weeks_of_month: Option<Value>,
    pub month: Option<Value>,
    pub dates: Option<Value>,
}
