use crate::{
    date::date_of_millis,
    rule::DEFAULT_INTERVAL,
    shared::recurrence::{Month, WeekDay, WeekOfMonth},
};
use chrono::Datelike;
use chrono_tz::Tz;
use std::collections::BTreeSet;

/// The values a freshly selected pattern starts out with
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PatternDefaults {
    pub month: Month,
    pub day_of_month: u32,
    pub week_day: WeekDay,
    pub week_of_month: WeekOfMonth,
    pub weeks_of_month: BTreeSet<WeekOfMonth>,
    pub interval: u32,
}

impl PatternDefaults {
    pub fn for_reference(reference_ts: Option<i64>, tz: &Tz) -> Self {
        match reference_ts.and_then(|ts| date_of_millis(ts, tz)) {
            Some(date) => {
                let day_of_month = date.day();
                let week_of_month = WeekOfMonth::of_day(day_of_month);
                Self {
                    month: Month::from_number(date.month()).unwrap_or(Month::January),
                    day_of_month,
                    week_day: WeekDay::from(date.weekday()),
                    week_of_month,
                    weeks_of_month: std::iter::once(week_of_month).collect(),
                    interval: DEFAULT_INTERVAL,
                }
            }
            None => Self::default(),
        }
    }
}

impl Default for PatternDefaults {
    fn default() -> Self {
        Self {
            month: Month::January,
            day_of_month: 1,
            week_day: WeekDay::Sunday,
            week_of_month: WeekOfMonth::First,
            weeks_of_month: std::iter::once(WeekOfMonth::First).collect(),
            interval: DEFAULT_INTERVAL,
        }
    }
}

/// Derives `PatternDefaults` from a reference date.
///
/// It is asked on every pattern transition, so the last result is kept and
/// only recomputed when the reference changes.
#[derive(Debug, Clone)]
pub struct PatternDefaultsCalculator {
    timezone: Tz,
    cached: Option<(Option<i64>, PatternDefaults)>,
}

impl PatternDefaultsCalculator {
    pub fn new(timezone: Tz) -> Self {
        Self {
            timezone,
            cached: None,
        }
    }

    pub fn defaults(&mut self, reference_ts: Option<i64>) -> &PatternDefaults {
        if matches!(&self.cached, Some((cached_ref, _)) if *cached_ref != reference_ts) {
            self.cached = None;
        }
        let timezone = &self.timezone;
        &self
            .cached
            .get_or_insert_with(|| {
                (
                    reference_ts,
                    PatternDefaults::for_reference(reference_ts, timezone),
                )
            })
            .1
    }

    pub fn set_timezone(&mut self, timezone: Tz) {
        if self.timezone != timezone {
            self.timezone = timezone;
            self.cached = None;
        }
    }
}
