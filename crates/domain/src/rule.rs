use crate::shared::{
    entity::SeriesId,
    recurrence::{Month, WeekDay, WeekOfMonth},
};
use std::collections::BTreeSet;
use std::fmt::Display;

/// Number of occurrences a series gets when it first becomes recurring
pub const DEFAULT_OCCURRENCES: u32 = 10;
pub const DEFAULT_INTERVAL: u32 = 1;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PatternType {
    None,
    Daily,
    Weekly,
    Monthly,
    Yearly,
    Individual,
}

impl PatternType {
    /// Whether this pattern type generates a series out of a rule
    pub fn is_recurring(&self) -> bool {
        !matches!(self, Self::None | Self::Individual)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "NONE",
            Self::Daily => "DAILY",
            Self::Weekly => "WEEKLY",
            Self::Monthly => "MONTHLY",
            Self::Yearly => "YEARLY",
            Self::Individual => "INDIVIDUAL",
        }
    }

    pub fn from_wire(value: &str) -> Option<Self> {
        match value.trim().to_uppercase().as_str() {
            "NONE" => Some(Self::None),
            "DAILY" => Some(Self::Daily),
            "WEEKLY" => Some(Self::Weekly),
            "MONTHLY" => Some(Self::Monthly),
            "YEARLY" => Some(Self::Yearly),
            "INDIVIDUAL" => Some(Self::Individual),
            _ => None,
        }
    }
}

impl Display for PatternType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EndType {
    Single,
    Times,
    Date,
}

impl EndType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Single => "SINGLE",
            Self::Times => "TIMES",
            Self::Date => "DATE",
        }
    }

    pub fn from_wire(value: &str) -> Option<Self> {
        match value.trim().to_uppercase().as_str() {
            "SINGLE" => Some(Self::Single),
            "TIMES" => Some(Self::Times),
            "DATE" => Some(Self::Date),
            _ => None,
        }
    }
}

impl Display for EndType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DailyPattern {
    /// Every n-th day
    Interval(u32),
    /// Monday to friday, overrides any interval
    EveryWorkingDay,
}

/// Sub-mode of `Monthly` and `Yearly` rules
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MonthDayMode {
    DayOfMonth,
    WeekdayInMonth,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MonthDay {
    /// e.g. the 15th
    DayOfMonth { day: u32 },
    /// e.g. the first and third friday
    WeekdayInMonth {
        week_day: WeekDay,
        weeks: BTreeSet<WeekOfMonth>,
    },
}

impl MonthDay {
    pub fn mode(&self) -> MonthDayMode {
        match self {
            Self::DayOfMonth { .. } => MonthDayMode::DayOfMonth,
            Self::WeekdayInMonth { .. } => MonthDayMode::WeekdayInMonth,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Pattern {
    None,
    Daily(DailyPattern),
    Weekly {
        interval: u32,
        week_days: BTreeSet<WeekDay>,
    },
    Monthly {
        interval: u32,
        day: MonthDay,
    },
    Yearly {
        interval: u32,
        month: Month,
        day: MonthDay,
    },
    Individual {
        dates: BTreeSet<i64>,
    },
}

impl Pattern {
    pub fn pattern_type(&self) -> PatternType {
        match self {
            Self::None => PatternType::None,
            Self::Daily(_) => PatternType::Daily,
            Self::Weekly { .. } => PatternType::Weekly,
            Self::Monthly { .. } => PatternType::Monthly,
            Self::Yearly { .. } => PatternType::Yearly,
            Self::Individual { .. } => PatternType::Individual,
        }
    }

    pub fn month_day(&self) -> Option<&MonthDay> {
        match self {
            Self::Monthly { day, .. } | Self::Yearly { day, .. } => Some(day),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SeriesEnd {
    /// Not a series, only valid for `None` and `Individual` patterns
    Single,
    /// Ends after the given number of occurrences
    Times(u32),
    /// Ends on the given date, timestamp in millis
    Date(i64),
}

impl SeriesEnd {
    pub fn end_type(&self) -> EndType {
        match self {
            Self::Single => EndType::Single,
            Self::Times(_) => EndType::Times,
            Self::Date(_) => EndType::Date,
        }
    }
}

/// One recurring event definition.
///
/// The fields are public so that codecs can build rules directly, but editing
/// a rule that is shown to a user should go through the `RecurrenceEditor`
/// which keeps the rule consistent and notifies subscribers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecurrenceRule {
    pub start: Option<i64>,
    pub end: Option<i64>,
    pub whole_day: bool,
    pub pattern: Pattern,
    pub series_end: SeriesEnd,
    pub exceptions: BTreeSet<i64>,
    pub current_till_end: bool,
    pub parent_series: Option<SeriesId>,
}

impl RecurrenceRule {
    pub fn new(now_ts: i64) -> Self {
        Self {
            start: Some(now_ts),
            end: Some(now_ts),
            whole_day: false,
            pattern: Pattern::None,
            series_end: SeriesEnd::Single,
            exceptions: BTreeSet::new(),
            current_till_end: true,
            parent_series: None,
        }
    }

    pub fn pattern_type(&self) -> PatternType {
        self.pattern.pattern_type()
    }

    pub fn interval(&self) -> Option<u32> {
        match &self.pattern {
            Pattern::Daily(DailyPattern::Interval(interval))
            | Pattern::Weekly { interval, .. }
            | Pattern::Monthly { interval, .. }
            | Pattern::Yearly { interval, .. } => Some(*interval),
            _ => None,
        }
    }

    pub fn every_working_day(&self) -> bool {
        matches!(self.pattern, Pattern::Daily(DailyPattern::EveryWorkingDay))
    }

    /// The selected weekdays of a weekly rule, or the single weekday of a
    /// monthly / yearly rule in weekday-in-month mode.
    pub fn week_days(&self) -> BTreeSet<WeekDay> {
        match &self.pattern {
            Pattern::Weekly { week_days, .. } => week_days.clone(),
            _ => match self.pattern.month_day() {
                Some(MonthDay::WeekdayInMonth { week_day, .. }) => {
                    std::iter::once(*week_day).collect()
                }
                _ => BTreeSet::new(),
            },
        }
    }

    pub fn weeks_of_month(&self) -> BTreeSet<WeekOfMonth> {
        match self.pattern.month_day() {
            Some(MonthDay::WeekdayInMonth { weeks, .. }) => weeks.clone(),
            _ => BTreeSet::new(),
        }
    }

    pub fn day_of_month(&self) -> Option<u32> {
        match self.pattern.month_day() {
            Some(MonthDay::DayOfMonth { day }) => Some(*day),
            _ => None,
        }
    }

    pub fn month_day_mode(&self) -> Option<MonthDayMode> {
        self.pattern.month_day().map(MonthDay::mode)
    }

    pub fn month(&self) -> Option<Month> {
        match &self.pattern {
            Pattern::Yearly { month, .. } => Some(*month),
            _ => None,
        }
    }

    pub fn individual_dates(&self) -> Option<&BTreeSet<i64>> {
        match &self.pattern {
            Pattern::Individual { dates } => Some(dates),
            _ => None,
        }
    }

    pub fn end_type(&self) -> EndType {
        self.series_end.end_type()
    }

    pub fn occurrences(&self) -> Option<u32> {
        match self.series_end {
            SeriesEnd::Times(times) => Some(times),
            _ => None,
        }
    }

    pub fn series_end_date(&self) -> Option<i64> {
        match self.series_end {
            SeriesEnd::Date(date) => Some(date),
            _ => None,
        }
    }

    /// Whether `date` may be excluded from the series. Single events have
    /// no exceptions, an individual rule can only exclude one of its dates.
    pub fn accepts_exception(&self, date: i64) -> bool {
        match &self.pattern {
            Pattern::None => false,
            Pattern::Individual { dates } => dates.contains(&date),
            _ => true,
        }
    }

    /// Repairs the coupling between pattern type and end type, and drops
    /// exceptions which cannot belong to the rule. Returns whether anything
    /// had to be changed.
    pub fn normalize(&mut self) -> bool {
        let before = self.clone();
        let recurring = self.pattern_type().is_recurring();
        match (recurring, self.series_end) {
            (false, SeriesEnd::Times(_)) | (false, SeriesEnd::Date(_)) => {
                self.series_end = SeriesEnd::Single;
            }
            (true, SeriesEnd::Single) => {
                self.series_end = SeriesEnd::Times(DEFAULT_OCCURRENCES);
            }
            _ => (),
        }
        let exceptions = std::mem::take(&mut self.exceptions);
        self.exceptions = exceptions
            .into_iter()
            .filter(|date| self.accepts_exception(*date))
            .collect();
        *self != before
    }

    /// Validity with the start day taken in UTC
    pub fn is_valid(&self) -> bool {
        crate::validation::validate(self).is_none()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn monthly_weekday_rule() -> RecurrenceRule {
        let mut rule = RecurrenceRule::new(0);
        rule.pattern = Pattern::Monthly {
            interval: 2,
            day: MonthDay::WeekdayInMonth {
                week_day: WeekDay::Friday,
                weeks: vec![WeekOfMonth::First, WeekOfMonth::Third]
                    .into_iter()
                    .collect(),
            },
        };
        rule.series_end = SeriesEnd::Times(5);
        rule
    }

    #[test]
    fn new_rule_has_default_state() {
        let rule = RecurrenceRule::new(1000);
        assert_eq!(rule.start, Some(1000));
        assert_eq!(rule.end, Some(1000));
        assert_eq!(rule.pattern_type(), PatternType::None);
        assert_eq!(rule.end_type(), EndType::Single);
        assert!(rule.current_till_end);
        assert!(rule.exceptions.is_empty());
        assert!(rule.parent_series.is_none());
    }

    #[test]
    fn flat_accessors_reflect_the_pattern() {
        let rule = monthly_weekday_rule();
        assert_eq!(rule.interval(), Some(2));
        assert_eq!(
            rule.week_days(),
            std::iter::once(WeekDay::Friday).collect::<BTreeSet<_>>()
        );
        assert_eq!(rule.weeks_of_month().len(), 2);
        assert_eq!(rule.day_of_month(), None);
        assert_eq!(rule.month_day_mode(), Some(MonthDayMode::WeekdayInMonth));
        assert_eq!(rule.month(), None);
        assert_eq!(rule.occurrences(), Some(5));
        assert_eq!(rule.series_end_date(), None);
    }

    #[test]
    fn every_working_day_has_no_interval() {
        let mut rule = RecurrenceRule::new(0);
        rule.pattern = Pattern::Daily(DailyPattern::EveryWorkingDay);
        assert!(rule.every_working_day());
        assert_eq!(rule.interval(), None);
    }

    #[test]
    fn normalize_repairs_end_type_coupling() {
        let mut rule = RecurrenceRule::new(0);
        rule.series_end = SeriesEnd::Date(100);
        assert!(rule.normalize());
        assert_eq!(rule.series_end, SeriesEnd::Single);

        let mut rule = monthly_weekday_rule();
        rule.series_end = SeriesEnd::Single;
        assert!(rule.normalize());
        assert_eq!(rule.series_end, SeriesEnd::Times(DEFAULT_OCCURRENCES));

        let mut rule = monthly_weekday_rule();
        assert!(!rule.normalize());
    }

    #[test]
    fn normalize_drops_exceptions_outside_individual_dates() {
        let mut rule = RecurrenceRule::new(0);
        rule.pattern = Pattern::Individual {
            dates: vec![10, 20].into_iter().collect(),
        };
        rule.exceptions = vec![10, 30].into_iter().collect();
        assert!(rule.normalize());
        assert_eq!(rule.exceptions, std::iter::once(10).collect::<BTreeSet<_>>());
    }

    #[test]
    fn accepts_exceptions_by_pattern() {
        let mut rule = RecurrenceRule::new(0);
        assert!(!rule.accepts_exception(10));

        rule.pattern = Pattern::Daily(DailyPattern::Interval(1));
        assert!(rule.accepts_exception(10));

        rule.pattern = Pattern::Individual {
            dates: std::iter::once(10).collect(),
        };
        assert!(rule.accepts_exception(10));
        assert!(!rule.accepts_exception(20));
    }

    #[test]
    fn pattern_type_wire_names() {
        assert_eq!(PatternType::from_wire("weekly"), Some(PatternType::Weekly));
        assert_eq!(PatternType::from_wire("HOURLY"), None);
        assert_eq!(PatternType::Individual.to_string(), "INDIVIDUAL");
        assert!(!PatternType::Individual.is_recurring());
        assert!(PatternType::Yearly.is_recurring());
        assert_eq!(EndType::from_wire("times"), Some(EndType::Times));
    }
}
