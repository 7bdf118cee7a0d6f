use serde::{de::Visitor, Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};
use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum WeekDay {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl WeekDay {
    pub const ALL: [WeekDay; 7] = [
        WeekDay::Monday,
        WeekDay::Tuesday,
        WeekDay::Wednesday,
        WeekDay::Thursday,
        WeekDay::Friday,
        WeekDay::Saturday,
        WeekDay::Sunday,
    ];

    pub const WORKING_DAYS: [WeekDay; 5] = [
        WeekDay::Monday,
        WeekDay::Tuesday,
        WeekDay::Wednesday,
        WeekDay::Thursday,
        WeekDay::Friday,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Monday => "MONDAY",
            Self::Tuesday => "TUESDAY",
            Self::Wednesday => "WEDNESDAY",
            Self::Thursday => "THURSDAY",
            Self::Friday => "FRIDAY",
            Self::Saturday => "SATURDAY",
            Self::Sunday => "SUNDAY",
        }
    }
}

impl From<chrono::Weekday> for WeekDay {
    fn from(wday: chrono::Weekday) -> Self {
        Self::ALL[wday.num_days_from_monday() as usize]
    }
}

impl From<WeekDay> for chrono::Weekday {
    fn from(wday: WeekDay) -> Self {
        match wday {
            WeekDay::Monday => chrono::Weekday::Mon,
            WeekDay::Tuesday => chrono::Weekday::Tue,
            WeekDay::Wednesday => chrono::Weekday::Wed,
            WeekDay::Thursday => chrono::Weekday::Thu,
            WeekDay::Friday => chrono::Weekday::Fri,
            WeekDay::Saturday => chrono::Weekday::Sat,
            WeekDay::Sunday => chrono::Weekday::Sun,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Month {
    January,
    February,
    March,
    April,
    May,
    June,
    July,
    August,
    September,
    October,
    November,
    December,
}

impl Month {
    pub const ALL: [Month; 12] = [
        Month::January,
        Month::February,
        Month::March,
        Month::April,
        Month::May,
        Month::June,
        Month::July,
        Month::August,
        Month::September,
        Month::October,
        Month::November,
        Month::December,
    ];

    /// January -> 1
    pub fn from_number(month: u32) -> Option<Self> {
        if (1..=12).contains(&month) {
            Some(Self::ALL[(month - 1) as usize])
        } else {
            None
        }
    }

    /// January -> 1
    pub fn number(&self) -> u32 {
        *self as u32 + 1
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::January => "JANUARY",
            Self::February => "FEBRUARY",
            Self::March => "MARCH",
            Self::April => "APRIL",
            Self::May => "MAY",
            Self::June => "JUNE",
            Self::July => "JULY",
            Self::August => "AUGUST",
            Self::September => "SEPTEMBER",
            Self::October => "OCTOBER",
            Self::November => "NOVEMBER",
            Self::December => "DECEMBER",
        }
    }
}

/// Which occurrence of a weekday inside a month, e.g. the third friday.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum WeekOfMonth {
    First,
    Second,
    Third,
    Fourth,
    Last,
}

impl WeekOfMonth {
    pub const ALL: [WeekOfMonth; 5] = [
        WeekOfMonth::First,
        WeekOfMonth::Second,
        WeekOfMonth::Third,
        WeekOfMonth::Fourth,
        WeekOfMonth::Last,
    ];

    /// The week of month a given day of month falls into. Days 29 to 31 are
    /// always in the `Last` week.
    pub fn of_day(day_of_month: u32) -> Self {
        let index = (day_of_month.max(1) - 1) / 7;
        Self::ALL[(index as usize).min(Self::ALL.len() - 1)]
    }

    /// FIRST -> 1, LAST -> 5
    pub fn from_ordinal(ordinal: u32) -> Option<Self> {
        if (1..=5).contains(&ordinal) {
            Some(Self::ALL[(ordinal - 1) as usize])
        } else {
            None
        }
    }

    pub fn ordinal(&self) -> u32 {
        *self as u32 + 1
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::First => "FIRST",
            Self::Second => "SECOND",
            Self::Third => "THIRD",
            Self::Fourth => "FOURTH",
            Self::Last => "LAST",
        }
    }
}

#[derive(Error, Debug, PartialEq)]
pub enum InvalidCalendarNameError {
    #[error("Invalid weekday specified: {0}")]
    WeekDay(String),
    #[error("Invalid month specified: {0}")]
    Month(String),
    #[error("Invalid week of month specified: {0}")]
    WeekOfMonth(String),
}

impl FromStr for WeekDay {
    type Err = InvalidCalendarNameError;

    fn from_str(day: &str) -> Result<Self, Self::Err> {
        let upper = day.trim().to_uppercase();
        Self::ALL
            .iter()
            .find(|wday| wday.as_str() == upper)
            .copied()
            .ok_or_else(|| InvalidCalendarNameError::WeekDay(day.to_string()))
    }
}

impl FromStr for Month {
    type Err = InvalidCalendarNameError;

    fn from_str(month: &str) -> Result<Self, Self::Err> {
        let upper = month.trim().to_uppercase();
        Self::ALL
            .iter()
            .find(|m| m.as_str() == upper)
            .copied()
            .ok_or_else(|| InvalidCalendarNameError::Month(month.to_string()))
    }
}

impl FromStr for WeekOfMonth {
    type Err = InvalidCalendarNameError;

    fn from_str(week: &str) -> Result<Self, Self::Err> {
        let upper = week.trim().to_uppercase();
        Self::ALL
            .iter()
            .find(|w| w.as_str() == upper)
            .copied()
            .ok_or_else(|| InvalidCalendarNameError::WeekOfMonth(week.to_string()))
    }
}

macro_rules! impl_wire_name {
    ($ty:ident, $expecting:expr) => {
        impl Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl Serialize for $ty {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                struct NameVisitor;

                impl<'de> Visitor<'de> for NameVisitor {
                    type Value = $ty;

                    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                        formatter.write_str($expecting)
                    }

                    fn visit_str<E>(self, value: &str) -> Result<$ty, E>
                    where
                        E: serde::de::Error,
                    {
                        value.parse::<$ty>().map_err(E::custom)
                    }
                }

                deserializer.deserialize_str(NameVisitor)
            }
        }
    };
}

impl_wire_name!(WeekDay, "A valid string representation of weekday");
impl_wire_name!(Month, "A valid string representation of month");
impl_wire_name!(WeekOfMonth, "A valid string representation of week of month");

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parses_valid_weekday_str_correctly() {
        assert_eq!("MONDAY".parse::<WeekDay>().unwrap(), WeekDay::Monday);
        assert_eq!("sunday".parse::<WeekDay>().unwrap(), WeekDay::Sunday);
        assert_eq!(" Friday ".parse::<WeekDay>().unwrap(), WeekDay::Friday);
    }

    #[test]
    fn parses_invalid_weekday_str_correctly() {
        assert!("".parse::<WeekDay>().is_err());
        assert!("MO".parse::<WeekDay>().is_err());
        assert!("1MONDAY".parse::<WeekDay>().is_err());
        assert!("funday".parse::<WeekDay>().is_err());
    }

    #[test]
    fn parses_months_and_weeks() {
        assert_eq!("march".parse::<Month>().unwrap(), Month::March);
        assert!("marc".parse::<Month>().is_err());
        assert_eq!("LAST".parse::<WeekOfMonth>().unwrap(), WeekOfMonth::Last);
        assert!("FIFTH".parse::<WeekOfMonth>().is_err());
    }

    #[test]
    fn month_numbers() {
        assert_eq!(Month::from_number(1), Some(Month::January));
        assert_eq!(Month::from_number(12), Some(Month::December));
        assert_eq!(Month::from_number(0), None);
        assert_eq!(Month::from_number(13), None);
        assert_eq!(Month::October.number(), 10);
    }

    #[test]
    fn week_of_month_from_day() {
        assert_eq!(WeekOfMonth::of_day(1), WeekOfMonth::First);
        assert_eq!(WeekOfMonth::of_day(7), WeekOfMonth::First);
        assert_eq!(WeekOfMonth::of_day(8), WeekOfMonth::Second);
        assert_eq!(WeekOfMonth::of_day(15), WeekOfMonth::Third);
        assert_eq!(WeekOfMonth::of_day(28), WeekOfMonth::Fourth);
        assert_eq!(WeekOfMonth::of_day(29), WeekOfMonth::Last);
        assert_eq!(WeekOfMonth::of_day(31), WeekOfMonth::Last);
    }

    #[test]
    fn converts_chrono_weekdays() {
        assert_eq!(WeekDay::from(chrono::Weekday::Fri), WeekDay::Friday);
        assert_eq!(chrono::Weekday::from(WeekDay::Sunday), chrono::Weekday::Sun);
    }

    #[test]
    fn serializes_weekday() {
        assert_eq!(WeekDay::Monday.to_string(), "MONDAY");
        assert_eq!(Month::December.to_string(), "DECEMBER");
        assert_eq!(WeekOfMonth::Second.to_string(), "SECOND");
    }
}
