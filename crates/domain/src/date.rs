use crate::shared::recurrence::Month;
use chrono::prelude::*;
use chrono_tz::Tz;

pub fn is_leap_year(year: i32) -> bool {
    year % 400 == 0 || (year % 100 != 0 && year % 4 == 0)
}

pub fn get_month_length(year: i32, month: Month) -> u32 {
    match month {
        Month::February => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
        Month::April | Month::June | Month::September | Month::November => 30,
        _ => 31,
    }
}

/// Longest the given month can ever be, i.e. february counts 29 days.
pub fn get_max_month_length(month: Month) -> u32 {
    // 2000 is a leap year
    get_month_length(2000, month)
}

/// The wall-clock date of the given timestamp in the given timezone.
/// `None` when the timestamp is outside of the representable range.
pub fn date_of_millis(ts: i64, tz: &Tz) -> Option<NaiveDate> {
    tz.timestamp_millis_opt(ts).single().map(|dt| dt.date_naive())
}

/// Timestamp in millis of the first instant of the day `ts` falls on.
pub fn start_of_day_millis(ts: i64, tz: &Tz) -> Option<i64> {
    let dt = tz.timestamp_millis_opt(ts).single()?;
    let midnight = dt.date_naive().and_hms_opt(0, 0, 0)?;
    tz.from_local_datetime(&midnight)
        .earliest()
        .map(|dt| dt.timestamp_millis())
}
