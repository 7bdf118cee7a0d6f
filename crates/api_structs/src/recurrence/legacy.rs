//! The flat `key=value|key=value` encoding of older clients. It only knows
//! single events and plain recurring rules, without exceptions or individual
//! dates.

use recurrence_editor_domain::{
    DailyPattern, EndType, Month, MonthDay, Pattern, PatternType, RecurrenceRule, SeriesEnd,
    WeekDay, WeekOfMonth, DEFAULT_INTERVAL, DEFAULT_OCCURRENCES,
};
use std::collections::{BTreeSet, HashMap};
use thiserror::Error;
use tracing::warn;

/// Event durations in minutes, the `duration` field is an index into it
pub const DURATIONS_MINUTES: [i64; 11] = [0, 15, 30, 45, 60, 90, 120, 180, 240, 480, 1440];

const MINUTE_MILLIS: i64 = 1000 * 60;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum LegacyEncodeError {
    #[error("{0} rules cannot be written in the legacy encoding")]
    UnsupportedPattern(PatternType),
    #[error("Rule has {0} exceptions, the legacy encoding has none")]
    HasExceptions(usize),
    #[error("The legacy encoding needs exactly one week of month, the rule has {0}")]
    WeeksOfMonth(usize),
}

fn type_name(pattern_type: PatternType) -> Result<&'static str, LegacyEncodeError> {
    match pattern_type {
        PatternType::None => Ok("SINGLE"),
        PatternType::Individual => Err(LegacyEncodeError::UnsupportedPattern(pattern_type)),
        _ => Ok(pattern_type.as_str()),
    }
}

fn join_week_days<'a>(week_days: impl IntoIterator<Item = &'a WeekDay>) -> String {
    week_days
        .into_iter()
        .map(|wday| wday.as_str())
        .collect::<Vec<_>>()
        .join(",")
}

fn duration_index(rule: &RecurrenceRule) -> Option<usize> {
    let duration = rule.end?.checked_sub(rule.start?)?;
    DURATIONS_MINUTES
        .iter()
        .position(|minutes| minutes * MINUTE_MILLIS == duration)
}

pub fn encode(rule: &RecurrenceRule) -> Result<String, LegacyEncodeError> {
    if !rule.exceptions.is_empty() {
        return Err(LegacyEncodeError::HasExceptions(rule.exceptions.len()));
    }
    let mut pairs: Vec<(&str, String)> = vec![("type", type_name(rule.pattern_type())?.into())];

    match &rule.pattern {
        Pattern::None | Pattern::Individual { .. } => (),
        Pattern::Daily(DailyPattern::EveryWorkingDay) => {
            pairs.push(("weekdays", join_week_days(&WeekDay::WORKING_DAYS)));
        }
        Pattern::Daily(DailyPattern::Interval(interval)) => {
            pairs.push(("interval", interval.to_string()));
        }
        Pattern::Weekly {
            interval,
            week_days,
        } => {
            pairs.push(("interval", interval.to_string()));
            pairs.push(("weekdays", join_week_days(week_days)));
        }
        Pattern::Monthly { interval, day } | Pattern::Yearly { interval, day, .. } => {
            pairs.push(("interval", interval.to_string()));
            match day {
                MonthDay::DayOfMonth { day } => pairs.push(("dayOfMonth", day.to_string())),
                MonthDay::WeekdayInMonth { week_day, weeks } => {
                    let week = match (weeks.len(), weeks.iter().next()) {
                        (1, Some(week)) => week,
                        (count, _) => return Err(LegacyEncodeError::WeeksOfMonth(count)),
                    };
                    pairs.push(("dayOfMonth", week.ordinal().to_string()));
                    pairs.push(("weekdays", week_day.as_str().to_string()));
                }
            }
            if let Some(month) = rule.month() {
                pairs.push(("month", month.number().to_string()));
            }
        }
    }

    if let Some(start) = rule.start {
        pairs.push(("start", start.to_string()));
    }
    if let Some(end) = rule.end {
        pairs.push(("end", end.to_string()));
    }
    if let Some(index) = duration_index(rule) {
        pairs.push(("duration", index.to_string()));
    }
    pairs.push(("endType", rule.end_type().as_str().to_string()));
    match rule.series_end {
        SeriesEnd::Single => (),
        SeriesEnd::Times(times) => pairs.push(("occurrences", times.to_string())),
        SeriesEnd::Date(date) => pairs.push(("seriesEndDate", date.to_string())),
    }

    Ok(pairs
        .into_iter()
        .map(|(key, value)| format!("{}={}", key, value))
        .collect::<Vec<_>>()
        .join("|"))
}

struct Fields<'a> {
    pairs: HashMap<&'a str, &'a str>,
}

impl<'a> Fields<'a> {
    fn parse(text: &'a str) -> Self {
        let mut pairs = HashMap::new();
        for pair in text.split('|').map(str::trim).filter(|p| !p.is_empty()) {
            match pair.split_once('=') {
                Some((key, value)) => {
                    pairs.insert(key.trim(), value.trim());
                }
                None => warn!("Skipping malformed legacy pair `{}`", pair),
            }
        }
        Self { pairs }
    }

    fn get<T: std::str::FromStr>(&self, key: &str, fallback: T) -> Option<T> {
        let value = self.pairs.get(key)?;
        match value.parse() {
            Ok(parsed) => Some(parsed),
            Err(_) => {
                warn!("Unable to parse legacy `{}` from `{}`, falling back", key, value);
                Some(fallback)
            }
        }
    }

    /// Absent and malformed timestamps are both `None`, 0 is the epoch
    fn millis(&self, key: &str) -> Option<i64> {
        let value = self.pairs.get(key)?;
        match value.parse() {
            Ok(ts) => Some(ts),
            Err(_) => {
                warn!("Unable to parse legacy `{}` from `{}`, ignoring it", key, value);
                None
            }
        }
    }

    fn week_days(&self) -> BTreeSet<WeekDay> {
        match self.pairs.get("weekdays") {
            Some(list) => list
                .split(',')
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .filter_map(|name| match name.parse() {
                    Ok(wday) => Some(wday),
                    Err(e) => {
                        warn!("Skipping legacy weekday: {}", e);
                        None
                    }
                })
                .collect(),
            None => BTreeSet::new(),
        }
    }

    fn month(&self) -> Month {
        let month = self.pairs.get("month").and_then(|value| {
            value
                .parse()
                .ok()
                .and_then(Month::from_number)
                .or_else(|| value.parse().ok())
        });
        match (month, self.pairs.get("month")) {
            (Some(month), _) => month,
            (None, Some(value)) => {
                warn!("Unable to parse legacy month `{}`, using JANUARY", value);
                Month::January
            }
            (None, None) => Month::January,
        }
    }
}

fn decode_month_day(fields: &Fields, week_days: &BTreeSet<WeekDay>) -> MonthDay {
    let day_of_month = fields.get("dayOfMonth", 0).unwrap_or(1);
    match week_days.iter().next() {
        Some(week_day) => MonthDay::WeekdayInMonth {
            week_day: *week_day,
            weeks: match WeekOfMonth::from_ordinal(day_of_month) {
                Some(week) => std::iter::once(week).collect(),
                None => {
                    warn!("Legacy week ordinal {} is out of range", day_of_month);
                    BTreeSet::new()
                }
            },
        },
        None => MonthDay::DayOfMonth { day: day_of_month },
    }
}

fn decode_pattern(fields: &Fields) -> Pattern {
    let pattern_type = match fields.pairs.get("type") {
        Some(name) if name.eq_ignore_ascii_case("SINGLE") => PatternType::None,
        Some(name) => match PatternType::from_wire(name) {
            Some(PatternType::Individual) | None => {
                warn!("Unknown legacy rule type `{}`, using SINGLE", name);
                PatternType::None
            }
            Some(pattern_type) => pattern_type,
        },
        None => PatternType::None,
    };
    let interval = fields.get("interval", 0).unwrap_or(DEFAULT_INTERVAL);
    let week_days = fields.week_days();

    match pattern_type {
        PatternType::Daily => {
            if week_days.iter().eq(WeekDay::WORKING_DAYS.iter()) {
                Pattern::Daily(DailyPattern::EveryWorkingDay)
            } else {
                Pattern::Daily(DailyPattern::Interval(interval))
            }
        }
        PatternType::Weekly => Pattern::Weekly {
            interval,
            week_days,
        },
        PatternType::Monthly => Pattern::Monthly {
            interval,
            day: decode_month_day(fields, &week_days),
        },
        PatternType::Yearly => Pattern::Yearly {
            interval,
            month: fields.month(),
            day: decode_month_day(fields, &week_days),
        },
        PatternType::None | PatternType::Individual => Pattern::None,
    }
}

fn decode_series_end(fields: &Fields, pattern_type: PatternType) -> SeriesEnd {
    if !pattern_type.is_recurring() {
        return SeriesEnd::Single;
    }
    let end_type = fields
        .pairs
        .get("endType")
        .and_then(|name| EndType::from_wire(name));
    let series_end = match end_type {
        Some(EndType::Date) => fields.millis("seriesEndDate").map(SeriesEnd::Date),
        Some(EndType::Times) => fields.get("occurrences", 0).map(SeriesEnd::Times),
        _ => None,
    };
    series_end.unwrap_or_else(|| {
        warn!(
            "Legacy {} rule has no usable series end, ending after {} occurrences",
            pattern_type, DEFAULT_OCCURRENCES
        );
        SeriesEnd::Times(DEFAULT_OCCURRENCES)
    })
}

/// Decodes the legacy encoding. Like the JSON decoder it never fails, text
/// without a single `key=value` pair yields `RecurrenceRule::new(now_ts)`.
pub fn decode(text: &str, now_ts: i64) -> RecurrenceRule {
    let fields = Fields::parse(text);
    if fields.pairs.is_empty() {
        warn!("Legacy recurrence rule has no fields, using the default rule");
        return RecurrenceRule::new(now_ts);
    }

    let pattern = decode_pattern(&fields);
    let series_end = decode_series_end(&fields, pattern.pattern_type());
    let start = fields.millis("start");
    let end = fields.millis("end").or_else(|| {
        let index = fields.get::<usize>("duration", usize::MAX)?;
        let minutes = match DURATIONS_MINUTES.get(index) {
            Some(minutes) => minutes,
            None => {
                warn!("Legacy duration index {} is out of range", index);
                return None;
            }
        };
        let end = start?.checked_add(minutes * MINUTE_MILLIS);
        if end.is_none() {
            warn!("Legacy start plus duration {} is out of range", index);
        }
        end
    });

    let mut rule = RecurrenceRule::new(now_ts);
    rule.start = start;
    rule.end = end;
    rule.pattern = pattern;
    rule.series_end = series_end;
    rule.normalize();
    rule
}
