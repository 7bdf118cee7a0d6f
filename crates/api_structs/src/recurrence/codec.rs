use super::dtos::{PatternDTO, RawPattern, RawRecurrenceRule, RecurrenceRuleDTO};
use crate::shared::wire::{parse_bool, parse_millis, parse_u32};
use recurrence_editor_domain::{
    DailyPattern, Month, MonthDay, Pattern, PatternType, RecurrenceRule, SeriesEnd, SeriesId,
    WeekDay, WeekOfMonth, DEFAULT_INTERVAL, DEFAULT_OCCURRENCES,
};
use serde_json::Value;
use std::collections::BTreeSet;
use std::str::FromStr;
use thiserror::Error;
use tracing::warn;

#[derive(Error, Debug)]
pub enum CodecError {
    #[error("Unable to serialize recurrence rule: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub fn encode(rule: &RecurrenceRule) -> Result<String, CodecError> {
    let dto = RecurrenceRuleDTO::new(rule);
    Ok(serde_json::to_string(&dto)?)
}

pub fn encode_pattern(rule: &RecurrenceRule) -> Result<String, CodecError> {
    let dto = PatternDTO::new(&rule.pattern);
    Ok(serde_json::to_string(&dto)?)
}

/// Decodes a rule from its JSON wire encoding.
///
/// Never fails: text that is not a JSON object yields `RecurrenceRule::new(now_ts)`
/// and every field that is missing or malformed falls back to a default.
pub fn decode(text: &str, now_ts: i64) -> RecurrenceRule {
    let value = match serde_json::from_str::<Value>(text) {
        Ok(value @ Value::Object(_)) => value,
        Ok(_) => {
            warn!("Recurrence rule is not a JSON object, using the default rule");
            return RecurrenceRule::new(now_ts);
        }
        Err(e) => {
            warn!("Malformed recurrence rule: {}, using the default rule", e);
            return RecurrenceRule::new(now_ts);
        }
    };
    let raw: RawRecurrenceRule = match serde_json::from_value(value) {
        Ok(raw) => raw,
        Err(e) => {
            warn!("Malformed recurrence rule: {}, using the default rule", e);
            return RecurrenceRule::new(now_ts);
        }
    };
    decode_raw(raw)
}

/// Decodes either encoding, JSON when the text starts with `{` and the
/// legacy flat encoding otherwise
pub fn decode_any(text: &str, now_ts: i64) -> RecurrenceRule {
    if text.trim_start().starts_with('{') {
        decode(text, now_ts)
    } else {
        super::legacy::decode(text, now_ts)
    }
}

fn field<T>(
    name: &str,
    value: Option<&Value>,
    parse: impl Fn(&Value) -> Option<T>,
    fallback: T,
) -> Option<T> {
    let value = value?;
    if value.is_null() {
        return None;
    }
    match parse(value) {
        Some(parsed) => Some(parsed),
        None => {
            warn!("Unable to parse `{}` from {}, falling back", name, value);
            Some(fallback)
        }
    }
}

fn list<T>(name: &str, value: Option<&Value>, parse: impl Fn(&Value) -> Option<T>) -> Vec<T> {
    let items = match value {
        None | Some(Value::Null) => return Vec::new(),
        Some(Value::Array(items)) => items,
        Some(value) => {
            warn!("Expected `{}` to be a list, got {}", name, value);
            return Vec::new();
        }
    };
    items
        .iter()
        .filter_map(|item| {
            let parsed = parse(item);
            if parsed.is_none() {
                warn!("Skipping malformed `{}` entry {}", name, item);
            }
            parsed
        })
        .collect()
}

fn parse_name<T: FromStr>(value: &Value) -> Option<T> {
    value.as_str().and_then(|s| s.parse().ok())
}

fn parse_month(value: &Value) -> Option<Month> {
    parse_name(value).or_else(|| parse_u32(value).and_then(Month::from_number))
}

fn decode_month_day(raw: &RawPattern) -> MonthDay {
    let week_days: Vec<WeekDay> = list("weekdays", raw.weekdays.as_ref(), parse_name::<WeekDay>);
    match week_days.first() {
        Some(week_day) => MonthDay::WeekdayInMonth {
            week_day: *week_day,
            weeks: list("weeksOfMonth", raw.weeks_of_month.as_ref(), parse_name::<WeekOfMonth>)
                .into_iter()
                .collect(),
        },
        None => MonthDay::DayOfMonth {
            day: field("daysOfMonth", raw.days_of_month.as_ref(), parse_u32, 0).unwrap_or(1),
        },
    }
}

fn decode_pattern(value: Option<&Value>) -> Pattern {
    let raw: RawPattern = match value {
        None | Some(Value::Null) => return Pattern::None,
        Some(value @ Value::Object(_)) => match serde_json::from_value(value.clone()) {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Malformed pattern: {}, falling back to NONE", e);
                return Pattern::None;
            }
        },
        Some(value) => {
            warn!("Expected pattern to be an object, got {}", value);
            return Pattern::None;
        }
    };

    let pattern_type = field(
        "type",
        raw.pattern_type.as_ref(),
        |v| v.as_str().and_then(PatternType::from_wire),
        PatternType::None,
    )
    .unwrap_or(PatternType::None);
    let interval =
        field("interval", raw.interval.as_ref(), parse_u32, 0).unwrap_or(DEFAULT_INTERVAL);

    match pattern_type {
        PatternType::None => Pattern::None,
        PatternType::Daily => {
            let every_working_day = field(
                "everyWorkingDay",
                raw.every_working_day.as_ref(),
                parse_bool,
                false,
            )
            .unwrap_or(false);
            if every_working_day {
                Pattern::Daily(DailyPattern::EveryWorkingDay)
            } else {
                Pattern::Daily(DailyPattern::Interval(interval))
            }
        }
        PatternType::Weekly => Pattern::Weekly {
            interval,
            week_days: list("weekdays", raw.weekdays.as_ref(), parse_name::<WeekDay>)
                .into_iter()
                .collect(),
        },
        PatternType::Monthly => Pattern::Monthly {
            interval,
            day: decode_month_day(&raw),
        },
        PatternType::Yearly => Pattern::Yearly {
            interval,
            month: field("month", raw.month.as_ref(), parse_month, Month::January)
                .unwrap_or(Month::January),
            day: decode_month_day(&raw),
        },
        PatternType::Individual => Pattern::Individual {
            dates: list("dates", raw.dates.as_ref(), parse_millis)
                .into_iter()
                .collect(),
        },
    }
}

fn decode_series_end(raw: &RawRecurrenceRule, pattern_type: PatternType) -> SeriesEnd {
    if !pattern_type.is_recurring() {
        return SeriesEnd::Single;
    }
    let series_end_date = field(
        "seriesEndDate",
        raw.series_end_date.as_ref(),
        |v| parse_millis(v).map(Some),
        None,
    );
    if let Some(date) = series_end_date.flatten() {
        return SeriesEnd::Date(date);
    }
    match field(
        "seriesOccurrences",
        raw.series_occurrences.as_ref(),
        parse_u32,
        0,
    ) {
        Some(times) => SeriesEnd::Times(times),
        None => {
            warn!(
                "{} rule has no series end, ending after {} occurrences",
                pattern_type, DEFAULT_OCCURRENCES
            );
            SeriesEnd::Times(DEFAULT_OCCURRENCES)
        }
    }
}

fn decode_raw(raw: RawRecurrenceRule) -> RecurrenceRule {
    let pattern = decode_pattern(raw.pattern.as_ref());
    let series_end = decode_series_end(&raw, pattern.pattern_type());
    let parent_series = field(
        "parentSeries",
        raw.parent_series.as_ref(),
        |v| v.as_str().and_then(|s| SeriesId::from_str(s).ok()).map(Some),
        None,
    )
    .flatten();

    let mut rule = RecurrenceRule {
        start: field("start", raw.start.as_ref(), |v| parse_millis(v).map(Some), None).flatten(),
        end: field("end", raw.end.as_ref(), |v| parse_millis(v).map(Some), None).flatten(),
        whole_day: field("wholeDay", raw.whole_day.as_ref(), parse_bool, false).unwrap_or(false),
        pattern,
        series_end,
        exceptions: list("exceptions", raw.exceptions.as_ref(), parse_millis)
            .into_iter()
            .collect::<BTreeSet<_>>(),
        current_till_end: field(
            "currentTillEnd",
            raw.current_till_end.as_ref(),
            parse_bool,
            true,
        )
        .unwrap_or(true),
        parent_series,
    };
    if rule.normalize() {
        warn!("Decoded recurrence rule had to be normalized");
    }
    rule
}
