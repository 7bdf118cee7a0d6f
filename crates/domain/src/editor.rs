use crate::{
    date::start_of_day_millis,
    defaults::{PatternDefaults, PatternDefaultsCalculator},
    rule::{
        DailyPattern, EndType, MonthDay, MonthDayMode, Pattern, PatternType, RecurrenceRule,
        SeriesEnd, DEFAULT_OCCURRENCES,
    },
    settings::{EditorSettings, WeekSelection},
    shared::{
        entity::SeriesId,
        recurrence::{Month, WeekDay, WeekOfMonth},
    },
    subscribers::{RuleChange, RuleSubscriber, RuleSubscribers, SubscriptionId},
    validation::{validate_in, ValidationError},
};
use std::collections::BTreeSet;
use thiserror::Error;
use tracing::{debug, error};

/// Outcome of an edit on the `RecurrenceEditor`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commit {
    /// The rule changed and subscribers were notified once
    Applied,
    /// The edit would not change anything, nobody was notified
    Unchanged,
    /// The edit would have discarded exceptions and the gate refused it
    Declined,
}

/// Edits which are not valid for the current state of the rule. These are
/// programming errors of the caller and are never swallowed by the editor.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransitionError {
    #[error("`{field}` cannot be set on a {pattern_type} rule")]
    NotApplicable {
        field: &'static str,
        pattern_type: PatternType,
    },
    #[error("End type {end_type} cannot be used with a {pattern_type} rule")]
    EndTypeMismatch {
        end_type: EndType,
        pattern_type: PatternType,
    },
    #[error("Date {date} is not an occurrence of the rule")]
    NotAnOccurrence { date: i64 },
}

/// Asked before an edit silently drops exceptions from the rule, e.g.
/// when the pattern type changes and the old exceptions become meaningless.
pub trait ConfirmationGate {
    fn confirm_discard_exceptions(&self, rule: &RecurrenceRule, discarded: &BTreeSet<i64>)
        -> bool;
}

/// Gate that lets every edit through
#[derive(Debug, Default, Clone, Copy)]
pub struct AlwaysConfirm;

impl ConfirmationGate for AlwaysConfirm {
    fn confirm_discard_exceptions(&self, _: &RecurrenceRule, _: &BTreeSet<i64>) -> bool {
        true
    }
}

impl<F> ConfirmationGate for F
where
    F: Fn(&RecurrenceRule, &BTreeSet<i64>) -> bool,
{
    fn confirm_discard_exceptions(
        &self,
        rule: &RecurrenceRule,
        discarded: &BTreeSet<i64>,
    ) -> bool {
        self(rule, discarded)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DiscardPolicy {
    /// Dropping exceptions is a side effect the gate has to confirm
    Confirm,
    /// Dropping exceptions is what the edit asked for
    Expected,
}

/// Owns a `RecurrenceRule` and is the only way it should be edited.
///
/// Every setter stages its changes on a draft of the rule, compares the draft
/// with the current rule, and only when it differs swaps the draft in and
/// notifies the subscribers exactly once. Subscribers therefore never observe
/// a rule in the middle of a multi-field transition.
pub struct RecurrenceEditor {
    rule: RecurrenceRule,
    settings: EditorSettings,
    defaults: PatternDefaultsCalculator,
    subscribers: RuleSubscribers,
    gate: Box<dyn ConfirmationGate>,
}

impl std::fmt::Debug for RecurrenceEditor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecurrenceEditor")
            .field("rule", &self.rule)
            .field("settings", &self.settings)
            .field("subscribers", &self.subscribers)
            .finish()
    }
}

fn not_applicable(field: &'static str, pattern_type: PatternType) -> TransitionError {
    TransitionError::NotApplicable {
        field,
        pattern_type,
    }
}

fn seed_pattern(pattern_type: PatternType, defaults: &PatternDefaults) -> Pattern {
    match pattern_type {
        PatternType::None => Pattern::None,
        PatternType::Daily => Pattern::Daily(DailyPattern::Interval(defaults.interval)),
        PatternType::Weekly => Pattern::Weekly {
            interval: defaults.interval,
            week_days: std::iter::once(defaults.week_day).collect(),
        },
        PatternType::Monthly => Pattern::Monthly {
            interval: defaults.interval,
            day: seed_month_day(MonthDayMode::DayOfMonth, defaults),
        },
        PatternType::Yearly => Pattern::Yearly {
            interval: defaults.interval,
            month: defaults.month,
            day: seed_month_day(MonthDayMode::DayOfMonth, defaults),
        },
        PatternType::Individual => Pattern::Individual {
            dates: BTreeSet::new(),
        },
    }
}

fn seed_month_day(mode: MonthDayMode, defaults: &PatternDefaults) -> MonthDay {
    match mode {
        MonthDayMode::DayOfMonth => MonthDay::DayOfMonth {
            day: defaults.day_of_month,
        },
        MonthDayMode::WeekdayInMonth => MonthDay::WeekdayInMonth {
            week_day: defaults.week_day,
            weeks: defaults.weeks_of_month.clone(),
        },
    }
}

fn month_day_mut<'a>(
    pattern: &'a mut Pattern,
    field: &'static str,
) -> Result<&'a mut MonthDay, TransitionError> {
    let pattern_type = pattern.pattern_type();
    match pattern {
        Pattern::Monthly { day, .. } | Pattern::Yearly { day, .. } => Ok(day),
        _ => Err(not_applicable(field, pattern_type)),
    }
}

impl RecurrenceEditor {
    pub fn new(rule: RecurrenceRule, settings: EditorSettings) -> Self {
        Self {
            rule,
            defaults: PatternDefaultsCalculator::new(settings.timezone),
            settings,
            subscribers: Default::default(),
            gate: Box::new(AlwaysConfirm),
        }
    }

    pub fn with_gate<G: ConfirmationGate + 'static>(mut self, gate: G) -> Self {
        self.gate = Box::new(gate);
        self
    }

    pub fn rule(&self) -> &RecurrenceRule {
        &self.rule
    }

    pub fn into_rule(self) -> RecurrenceRule {
        self.rule
    }

    pub fn settings(&self) -> &EditorSettings {
        &self.settings
    }

    pub fn set_settings(&mut self, settings: EditorSettings) {
        self.defaults.set_timezone(settings.timezone);
        self.settings = settings;
    }

    /// Defaults a freshly selected pattern would start with right now
    pub fn defaults(&mut self) -> PatternDefaults {
        self.defaults.defaults(self.rule.start).clone()
    }

    pub fn validate(&self) -> Option<ValidationError> {
        validate_in(&self.rule, &self.settings.timezone)
    }

    pub fn subscribe<S: RuleSubscriber + 'static>(&mut self, subscriber: S) -> SubscriptionId {
        self.subscribers.subscribe(Box::new(subscriber))
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscribers.unsubscribe(id)
    }

    fn commit<F>(
        &mut self,
        change: RuleChange,
        discard_policy: DiscardPolicy,
        stage: F,
    ) -> Result<Commit, TransitionError>
    where
        F: FnOnce(
            &mut RecurrenceRule,
            &PatternDefaults,
            &EditorSettings,
        ) -> Result<(), TransitionError>,
    {
        let defaults = self.defaults.defaults(self.rule.start).clone();
        let mut draft = self.rule.clone();
        if let Err(e) = stage(&mut draft, &defaults, &self.settings) {
            error!("Rejected {:?} edit of the recurrence rule: {}", change, e);
            return Err(e);
        }

        if draft == self.rule {
            return Ok(Commit::Unchanged);
        }

        if discard_policy == DiscardPolicy::Confirm {
            let discarded: BTreeSet<i64> = self
                .rule
                .exceptions
                .difference(&draft.exceptions)
                .copied()
                .collect();
            if !discarded.is_empty()
                && !self
                    .gate
                    .confirm_discard_exceptions(&self.rule, &discarded)
            {
                debug!(
                    "{:?} edit declined, it would discard {} exceptions",
                    change,
                    discarded.len()
                );
                return Ok(Commit::Declined);
            }
        }

        self.rule = draft;
        debug!("Committed {:?} edit of the recurrence rule", change);
        self.subscribers.notify(change, &self.rule);
        Ok(Commit::Applied)
    }

    pub fn set_pattern_type(
        &mut self,
        pattern_type: PatternType,
    ) -> Result<Commit, TransitionError> {
        if self.rule.pattern_type() == pattern_type {
            return Ok(Commit::Unchanged);
        }
        self.commit(
            RuleChange::PatternType,
            DiscardPolicy::Confirm,
            |draft, defaults, _| {
                draft.pattern = seed_pattern(pattern_type, defaults);
                // The shape of the series changed, old exceptions mean nothing
                draft.exceptions.clear();
                draft.series_end = match (pattern_type.is_recurring(), draft.series_end) {
                    (false, _) => SeriesEnd::Single,
                    (true, SeriesEnd::Single) => SeriesEnd::Times(DEFAULT_OCCURRENCES),
                    (true, series_end) => series_end,
                };
                Ok(())
            },
        )
    }

    pub fn set_month_day_mode(&mut self, mode: MonthDayMode) -> Result<Commit, TransitionError> {
        self.commit(
            RuleChange::MonthDayMode,
            DiscardPolicy::Confirm,
            |draft, defaults, _| {
                let pattern_type = draft.pattern_type();
                match &mut draft.pattern {
                    Pattern::Monthly { interval, day } | Pattern::Yearly { interval, day, .. } => {
                        if day.mode() != mode {
                            *day = seed_month_day(mode, defaults);
                            *interval = defaults.interval;
                        }
                        Ok(())
                    }
                    _ => Err(not_applicable("month day mode", pattern_type)),
                }
            },
        )
    }

    pub fn set_interval(&mut self, new_interval: u32) -> Result<Commit, TransitionError> {
        self.commit(
            RuleChange::Interval,
            DiscardPolicy::Confirm,
            |draft, _, _| {
                let pattern_type = draft.pattern_type();
                match &mut draft.pattern {
                    Pattern::Daily(daily) => {
                        *daily = DailyPattern::Interval(new_interval);
                        Ok(())
                    }
                    Pattern::Weekly { interval, .. }
                    | Pattern::Monthly { interval, .. }
                    | Pattern::Yearly { interval, .. } => {
                        *interval = new_interval;
                        Ok(())
                    }
                    _ => Err(not_applicable("interval", pattern_type)),
                }
            },
        )
    }

    pub fn set_every_working_day(
        &mut self,
        every_working_day: bool,
    ) -> Result<Commit, TransitionError> {
        self.commit(
            RuleChange::EveryWorkingDay,
            DiscardPolicy::Confirm,
            |draft, defaults, _| {
                let pattern_type = draft.pattern_type();
                match &mut draft.pattern {
                    Pattern::Daily(daily) => {
                        if every_working_day {
                            *daily = DailyPattern::EveryWorkingDay;
                        } else if *daily == DailyPattern::EveryWorkingDay {
                            *daily = DailyPattern::Interval(defaults.interval);
                        }
                        Ok(())
                    }
                    _ => Err(not_applicable("every working day", pattern_type)),
                }
            },
        )
    }

    pub fn toggle_week_day(
        &mut self,
        week_day: WeekDay,
        selected: bool,
    ) -> Result<Commit, TransitionError> {
        self.commit(
            RuleChange::WeekDays,
            DiscardPolicy::Confirm,
            |draft, _, _| {
                let pattern_type = draft.pattern_type();
                match &mut draft.pattern {
                    Pattern::Weekly { week_days, .. } => {
                        if selected {
                            week_days.insert(week_day);
                        } else {
                            week_days.remove(&week_day);
                        }
                        Ok(())
                    }
                    _ => Err(not_applicable("weekdays", pattern_type)),
                }
            },
        )
    }

    pub fn set_week_days(
        &mut self,
        new_week_days: BTreeSet<WeekDay>,
    ) -> Result<Commit, TransitionError> {
        self.commit(
            RuleChange::WeekDays,
            DiscardPolicy::Confirm,
            |draft, _, _| {
                let pattern_type = draft.pattern_type();
                match &mut draft.pattern {
                    Pattern::Weekly { week_days, .. } => {
                        *week_days = new_week_days;
                        Ok(())
                    }
                    _ => Err(not_applicable("weekdays", pattern_type)),
                }
            },
        )
    }

    /// Sets the weekday of a monthly or yearly rule. A rule in day-of-month
    /// mode is switched to weekday-in-month mode as part of the same commit.
    pub fn set_week_day(&mut self, new_week_day: WeekDay) -> Result<Commit, TransitionError> {
        self.commit(
            RuleChange::WeekDays,
            DiscardPolicy::Confirm,
            |draft, defaults, _| {
                let month_day = month_day_mut(&mut draft.pattern, "weekday")?;
                match month_day {
                    MonthDay::WeekdayInMonth { week_day, .. } => *week_day = new_week_day,
                    MonthDay::DayOfMonth { .. } => {
                        *month_day = MonthDay::WeekdayInMonth {
                            week_day: new_week_day,
                            weeks: defaults.weeks_of_month.clone(),
                        }
                    }
                }
                Ok(())
            },
        )
    }

    /// Selects or deselects one week of a monthly or yearly rule.
    ///
    /// Selecting a week while the rule is in day-of-month mode first switches
    /// to weekday-in-month mode, seeded with the default weekday, and then
    /// applies the selection. Both happen in one commit with one notification.
    pub fn toggle_week_of_month(
        &mut self,
        week: WeekOfMonth,
        selected: bool,
    ) -> Result<Commit, TransitionError> {
        self.commit(
            RuleChange::WeeksOfMonth,
            DiscardPolicy::Confirm,
            |draft, defaults, settings| {
                let selection = settings.week_selection(draft.pattern_type());
                let month_day = month_day_mut(&mut draft.pattern, "weeks of month")?;
                match month_day {
                    MonthDay::DayOfMonth { .. } => {
                        if selected {
                            *month_day = MonthDay::WeekdayInMonth {
                                week_day: defaults.week_day,
                                weeks: std::iter::once(week).collect(),
                            };
                        }
                    }
                    MonthDay::WeekdayInMonth { weeks, .. } => {
                        if selected {
                            if selection == WeekSelection::Single {
                                weeks.clear();
                            }
                            weeks.insert(week);
                        } else {
                            weeks.remove(&week);
                        }
                    }
                }
                Ok(())
            },
        )
    }

    /// Sets the day of month of a monthly or yearly rule. A rule in
    /// weekday-in-month mode is switched to day-of-month mode.
    pub fn set_day_of_month(&mut self, day: u32) -> Result<Commit, TransitionError> {
        self.commit(
            RuleChange::DayOfMonth,
            DiscardPolicy::Confirm,
            |draft, _, _| {
                let month_day = month_day_mut(&mut draft.pattern, "day of month")?;
                *month_day = MonthDay::DayOfMonth { day };
                Ok(())
            },
        )
    }

    pub fn set_month(&mut self, new_month: Month) -> Result<Commit, TransitionError> {
        self.commit(
            RuleChange::Month,
            DiscardPolicy::Confirm,
            |draft, _, _| {
                let pattern_type = draft.pattern_type();
                match &mut draft.pattern {
                    Pattern::Yearly { month, .. } => {
                        *month = new_month;
                        Ok(())
                    }
                    _ => Err(not_applicable("month", pattern_type)),
                }
            },
        )
    }

    /// Changes how the series ends. `Times` starts out with the default
    /// number of occurrences and `Date` with the day of the series start.
    pub fn set_end_type(&mut self, end_type: EndType) -> Result<Commit, TransitionError> {
        self.commit(
            RuleChange::SeriesEnd,
            DiscardPolicy::Confirm,
            |draft, _, settings| {
                let pattern_type = draft.pattern_type();
                draft.series_end = match (pattern_type.is_recurring(), end_type, draft.series_end) {
                    (false, EndType::Single, _) => SeriesEnd::Single,
                    (true, EndType::Times, SeriesEnd::Times(times)) => SeriesEnd::Times(times),
                    (true, EndType::Times, _) => SeriesEnd::Times(DEFAULT_OCCURRENCES),
                    (true, EndType::Date, SeriesEnd::Date(date)) => SeriesEnd::Date(date),
                    (true, EndType::Date, _) => SeriesEnd::Date(
                        draft
                            .start
                            .and_then(|start| start_of_day_millis(start, &settings.timezone))
                            .unwrap_or_default(),
                    ),
                    _ => {
                        return Err(TransitionError::EndTypeMismatch {
                            end_type,
                            pattern_type,
                        })
                    }
                };
                Ok(())
            },
        )
    }

    pub fn set_occurrences(&mut self, occurrences: u32) -> Result<Commit, TransitionError> {
        self.set_series_end(SeriesEnd::Times(occurrences))
    }

    pub fn set_series_end_date(&mut self, date: i64) -> Result<Commit, TransitionError> {
        self.set_series_end(SeriesEnd::Date(date))
    }

    fn set_series_end(&mut self, series_end: SeriesEnd) -> Result<Commit, TransitionError> {
        self.commit(
            RuleChange::SeriesEnd,
            DiscardPolicy::Confirm,
            |draft, _, _| {
                let pattern_type = draft.pattern_type();
                if pattern_type.is_recurring() == (series_end == SeriesEnd::Single) {
                    return Err(TransitionError::EndTypeMismatch {
                        end_type: series_end.end_type(),
                        pattern_type,
                    });
                }
                draft.series_end = series_end;
                Ok(())
            },
        )
    }

    pub fn set_period(&mut self, start: i64, end: i64) -> Result<Commit, TransitionError> {
        self.commit(RuleChange::Period, DiscardPolicy::Confirm, |draft, _, _| {
            draft.start = Some(start);
            draft.end = Some(end);
            Ok(())
        })
    }

    pub fn set_whole_day(&mut self, whole_day: bool) -> Result<Commit, TransitionError> {
        self.commit(RuleChange::WholeDay, DiscardPolicy::Confirm, |draft, _, _| {
            draft.whole_day = whole_day;
            Ok(())
        })
    }

    pub fn set_current_till_end(
        &mut self,
        current_till_end: bool,
    ) -> Result<Commit, TransitionError> {
        self.commit(
            RuleChange::CurrentTillEnd,
            DiscardPolicy::Confirm,
            |draft, _, _| {
                draft.current_till_end = current_till_end;
                Ok(())
            },
        )
    }

    pub fn set_parent_series(
        &mut self,
        parent_series: Option<SeriesId>,
    ) -> Result<Commit, TransitionError> {
        self.commit(
            RuleChange::ParentSeries,
            DiscardPolicy::Confirm,
            |draft, _, _| {
                draft.parent_series = parent_series;
                Ok(())
            },
        )
    }

    fn check_exception(draft: &RecurrenceRule, date: i64) -> Result<(), TransitionError> {
        match draft.pattern {
            Pattern::None => Err(not_applicable("exceptions", PatternType::None)),
            _ if draft.accepts_exception(date) => Ok(()),
            _ => Err(TransitionError::NotAnOccurrence { date }),
        }
    }

    pub fn add_exception(&mut self, date: i64) -> Result<Commit, TransitionError> {
        self.commit(
            RuleChange::Exceptions,
            DiscardPolicy::Expected,
            |draft, _, _| {
                Self::check_exception(draft, date)?;
                draft.exceptions.insert(date);
                Ok(())
            },
        )
    }

    pub fn remove_exception(&mut self, date: i64) -> Result<Commit, TransitionError> {
        self.commit(
            RuleChange::Exceptions,
            DiscardPolicy::Expected,
            |draft, _, _| {
                draft.exceptions.remove(&date);
                Ok(())
            },
        )
    }

    pub fn set_exceptions(&mut self, exceptions: BTreeSet<i64>) -> Result<Commit, TransitionError> {
        self.commit(
            RuleChange::Exceptions,
            DiscardPolicy::Expected,
            |draft, _, _| {
                for date in &exceptions {
                    Self::check_exception(draft, *date)?;
                }
                draft.exceptions = exceptions;
                Ok(())
            },
        )
    }

    fn individual_dates_mut(
        draft: &mut RecurrenceRule,
    ) -> Result<&mut BTreeSet<i64>, TransitionError> {
        let pattern_type = draft.pattern_type();
        match &mut draft.pattern {
            Pattern::Individual { dates } => Ok(dates),
            _ => Err(not_applicable("individual dates", pattern_type)),
        }
    }

    pub fn add_individual_date(&mut self, date: i64) -> Result<Commit, TransitionError> {
        self.commit(
            RuleChange::IndividualDates,
            DiscardPolicy::Expected,
            |draft, _, _| {
                Self::individual_dates_mut(draft)?.insert(date);
                Ok(())
            },
        )
    }

    /// Removes an individual date, along with the exception on that date
    pub fn remove_individual_date(&mut self, date: i64) -> Result<Commit, TransitionError> {
        self.commit(
            RuleChange::IndividualDates,
            DiscardPolicy::Expected,
            |draft, _, _| {
                Self::individual_dates_mut(draft)?.remove(&date);
                draft.exceptions.remove(&date);
                Ok(())
            },
        )
    }

    pub fn set_individual_dates(
        &mut self,
        new_dates: BTreeSet<i64>,
    ) -> Result<Commit, TransitionError> {
        self.commit(
            RuleChange::IndividualDates,
            DiscardPolicy::Expected,
            |draft, _, _| {
                let dates = Self::individual_dates_mut(draft)?;
                *dates = new_dates;
                let dates = dates.clone();
                draft.exceptions.retain(|ex| dates.contains(ex));
                Ok(())
            },
        )
    }

    /// Swaps in a whole rule, e.g. one decoded from a server value
    pub fn replace(&mut self, mut rule: RecurrenceRule) -> Commit {
        rule.normalize();
        if rule == self.rule {
            return Commit::Unchanged;
        }
        self.rule = rule;
        debug!("Replaced the recurrence rule");
        self.subscribers.notify(RuleChange::Replaced, &self.rule);
        Commit::Applied
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::{TimeZone, Utc};
    use std::cell::RefCell;
    use std::rc::Rc;

    // 2024-03-15T12:00:00Z, a friday
    const START: i64 = 1_710_504_000_000;

    fn editor() -> RecurrenceEditor {
        RecurrenceEditor::new(RecurrenceRule::new(START), EditorSettings::default())
    }

    fn recorded(editor: &mut RecurrenceEditor) -> Rc<RefCell<Vec<RuleChange>>> {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_c = seen.clone();
        editor.subscribe(move |change: RuleChange, _: &RecurrenceRule| {
            seen_c.borrow_mut().push(change)
        });
        seen
    }

    fn weeks(weeks: &[WeekOfMonth]) -> BTreeSet<WeekOfMonth> {
        weeks.iter().copied().collect()
    }

    #[test]
    fn setting_the_current_pattern_type_is_a_noop() {
        let mut editor = editor();
        let seen = recorded(&mut editor);
        assert_eq!(editor.set_pattern_type(PatternType::None), Ok(Commit::Unchanged));

        assert_eq!(editor.set_pattern_type(PatternType::Weekly), Ok(Commit::Applied));
        assert_eq!(editor.set_pattern_type(PatternType::Weekly), Ok(Commit::Unchanged));
        assert_eq!(*seen.borrow(), vec![RuleChange::PatternType]);
    }

    #[test]
    fn seeds_patterns_from_the_start_date() {
        let mut editor = editor();

        editor.set_pattern_type(PatternType::Weekly).unwrap();
        assert_eq!(
            editor.rule().week_days(),
            std::iter::once(WeekDay::Friday).collect::<BTreeSet<_>>()
        );
        assert_eq!(editor.rule().interval(), Some(1));
        assert_eq!(editor.rule().series_end, SeriesEnd::Times(DEFAULT_OCCURRENCES));

        editor.set_pattern_type(PatternType::Monthly).unwrap();
        assert_eq!(editor.rule().day_of_month(), Some(15));
        assert!(editor.rule().week_days().is_empty());

        editor.set_pattern_type(PatternType::Yearly).unwrap();
        assert_eq!(editor.rule().month(), Some(Month::March));
        assert_eq!(editor.rule().day_of_month(), Some(15));

        editor.set_pattern_type(PatternType::Daily).unwrap();
        assert_eq!(editor.rule().pattern, Pattern::Daily(DailyPattern::Interval(1)));
        assert!(!editor.rule().every_working_day());
    }

    #[test]
    fn keeps_end_condition_between_recurring_patterns() {
        let mut editor = editor();
        editor.set_pattern_type(PatternType::Daily).unwrap();
        editor.set_occurrences(4).unwrap();
        editor.set_pattern_type(PatternType::Weekly).unwrap();
        assert_eq!(editor.rule().series_end, SeriesEnd::Times(4));
    }

    #[test]
    fn individual_forces_single_end_type() {
        for end_type in &[EndType::Times, EndType::Date] {
            let mut editor = editor();
            editor.set_pattern_type(PatternType::Monthly).unwrap();
            editor.set_end_type(*end_type).unwrap();
            assert_eq!(editor.rule().end_type(), *end_type);

            editor.set_pattern_type(PatternType::Individual).unwrap();
            assert_eq!(editor.rule().end_type(), EndType::Single);
            assert_eq!(editor.validate(), Some(ValidationError::NoIndividualDate));
        }
    }

    #[test]
    fn month_day_modes_are_mutually_exclusive() {
        let mut editor = editor();
        editor.set_pattern_type(PatternType::Monthly).unwrap();
        editor.set_interval(3).unwrap();

        editor
            .set_month_day_mode(MonthDayMode::WeekdayInMonth)
            .unwrap();
        assert_eq!(editor.rule().day_of_month(), None);
        assert_eq!(
            editor.rule().week_days(),
            std::iter::once(WeekDay::Friday).collect::<BTreeSet<_>>()
        );
        assert_eq!(editor.rule().weeks_of_month(), weeks(&[WeekOfMonth::Third]));
        assert_eq!(editor.rule().interval(), Some(1));

        editor.set_day_of_month(20).unwrap();
        assert_eq!(editor.rule().month_day_mode(), Some(MonthDayMode::DayOfMonth));
        assert!(editor.rule().week_days().is_empty());
        assert!(editor.rule().weeks_of_month().is_empty());
        assert_eq!(editor.rule().day_of_month(), Some(20));
    }

    #[test]
    fn toggling_a_week_switches_mode_with_one_notification() {
        let mut editor = editor();
        editor.set_pattern_type(PatternType::Monthly).unwrap();
        let seen = recorded(&mut editor);

        editor
            .toggle_week_of_month(WeekOfMonth::First, true)
            .unwrap();
        assert_eq!(*seen.borrow(), vec![RuleChange::WeeksOfMonth]);
        assert_eq!(editor.rule().weeks_of_month(), weeks(&[WeekOfMonth::First]));
        assert_eq!(
            editor.rule().week_days(),
            std::iter::once(WeekDay::Friday).collect::<BTreeSet<_>>()
        );

        editor
            .toggle_week_of_month(WeekOfMonth::Third, true)
            .unwrap();
        assert_eq!(
            editor.rule().weeks_of_month(),
            weeks(&[WeekOfMonth::First, WeekOfMonth::Third])
        );

        editor
            .toggle_week_of_month(WeekOfMonth::First, false)
            .unwrap();
        assert_eq!(editor.rule().weeks_of_month(), weeks(&[WeekOfMonth::Third]));
    }

    #[test]
    fn deselecting_a_week_in_day_mode_changes_nothing() {
        let mut editor = editor();
        editor.set_pattern_type(PatternType::Monthly).unwrap();
        assert_eq!(
            editor.toggle_week_of_month(WeekOfMonth::Second, false),
            Ok(Commit::Unchanged)
        );
    }

    #[test]
    fn yearly_rules_select_a_single_week_by_default() {
        let mut editor = editor();
        editor.set_pattern_type(PatternType::Yearly).unwrap();
        editor.toggle_week_of_month(WeekOfMonth::First, true).unwrap();
        editor.toggle_week_of_month(WeekOfMonth::Last, true).unwrap();
        assert_eq!(editor.rule().weeks_of_month(), weeks(&[WeekOfMonth::Last]));

        let mut settings = EditorSettings::default();
        settings.yearly_weeks = WeekSelection::Multiple;
        editor.set_settings(settings);
        editor.toggle_week_of_month(WeekOfMonth::First, true).unwrap();
        assert_eq!(
            editor.rule().weeks_of_month(),
            weeks(&[WeekOfMonth::First, WeekOfMonth::Last])
        );
    }

    #[test]
    fn set_week_day_switches_to_weekday_mode() {
        let mut editor = editor();
        editor.set_pattern_type(PatternType::Monthly).unwrap();
        editor.set_week_day(WeekDay::Tuesday).unwrap();
        assert_eq!(
            editor.rule().pattern.month_day(),
            Some(&MonthDay::WeekdayInMonth {
                week_day: WeekDay::Tuesday,
                weeks: weeks(&[WeekOfMonth::Third]),
            })
        );
    }

    #[test]
    fn weekly_validation_boundary() {
        let mut editor = editor();
        editor.set_pattern_type(PatternType::Weekly).unwrap();
        editor.toggle_week_day(WeekDay::Friday, false).unwrap();
        let err = editor.validate().unwrap();
        assert_eq!(err.to_string(), "No weekday specified");

        editor.toggle_week_day(WeekDay::Monday, true).unwrap();
        assert_eq!(editor.validate(), None);
    }

    #[test]
    fn every_working_day_overrides_interval() {
        let mut editor = editor();
        editor.set_pattern_type(PatternType::Daily).unwrap();
        editor.set_interval(3).unwrap();
        editor.set_every_working_day(true).unwrap();
        assert!(editor.rule().every_working_day());
        assert_eq!(editor.rule().interval(), None);

        editor.set_every_working_day(false).unwrap();
        assert_eq!(editor.rule().interval(), Some(1));

        editor.set_every_working_day(true).unwrap();
        editor.set_interval(2).unwrap();
        assert!(!editor.rule().every_working_day());
        assert_eq!(editor.rule().interval(), Some(2));
    }

    #[test]
    fn rejects_setters_of_other_patterns() {
        let mut editor = editor();
        editor.set_pattern_type(PatternType::Weekly).unwrap();
        let seen = recorded(&mut editor);
        let before = editor.rule().clone();

        assert_eq!(
            editor.set_month(Month::May),
            Err(TransitionError::NotApplicable {
                field: "month",
                pattern_type: PatternType::Weekly,
            })
        );
        assert!(editor.set_day_of_month(3).is_err());
        assert!(editor.set_every_working_day(true).is_err());
        assert!(editor.add_individual_date(START).is_err());
        assert_eq!(editor.rule(), &before);
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn end_type_must_fit_the_pattern() {
        let mut editor = editor();
        assert_eq!(
            editor.set_end_type(EndType::Times),
            Err(TransitionError::EndTypeMismatch {
                end_type: EndType::Times,
                pattern_type: PatternType::None,
            })
        );
        assert!(editor.set_occurrences(3).is_err());

        editor.set_pattern_type(PatternType::Daily).unwrap();
        assert!(editor.set_end_type(EndType::Single).is_err());
    }

    #[test]
    fn date_end_type_seeds_the_start_day() {
        let mut editor = editor();
        editor.set_pattern_type(PatternType::Daily).unwrap();
        editor.set_end_type(EndType::Date).unwrap();
        let start_of_day = Utc
            .with_ymd_and_hms(2024, 3, 15, 0, 0, 0)
            .unwrap()
            .timestamp_millis();
        assert_eq!(editor.rule().series_end, SeriesEnd::Date(start_of_day));
        assert_eq!(editor.validate(), None);

        editor.set_end_type(EndType::Times).unwrap();
        assert_eq!(editor.rule().occurrences(), Some(DEFAULT_OCCURRENCES));
    }

    #[test]
    fn removing_an_individual_date_prunes_its_exception() {
        let mut editor = editor();
        editor.set_pattern_type(PatternType::Individual).unwrap();
        editor.add_individual_date(START).unwrap();
        editor.add_individual_date(START + 1000).unwrap();
        editor.add_exception(START).unwrap();
        assert_eq!(
            editor.add_exception(START + 5),
            Err(TransitionError::NotAnOccurrence { date: START + 5 })
        );

        editor.remove_individual_date(START).unwrap();
        assert!(editor.rule().exceptions.is_empty());
        assert_eq!(
            editor.rule().individual_dates(),
            Some(&std::iter::once(START + 1000).collect::<BTreeSet<_>>())
        );
    }

    #[test]
    fn replacing_individual_dates_prunes_exceptions() {
        let mut editor = editor();
        editor.set_pattern_type(PatternType::Individual).unwrap();
        editor
            .set_individual_dates(vec![1, 2, 3].into_iter().collect())
            .unwrap();
        editor.set_exceptions(vec![1, 3].into_iter().collect()).unwrap();
        editor
            .set_individual_dates(vec![2, 3].into_iter().collect())
            .unwrap();
        assert_eq!(editor.rule().exceptions, std::iter::once(3).collect::<BTreeSet<_>>());
    }

    #[test]
    fn asks_before_discarding_exceptions() {
        let asked = Rc::new(RefCell::new(0));
        let asked_c = asked.clone();
        let mut editor = editor().with_gate(
            move |_: &RecurrenceRule, discarded: &BTreeSet<i64>| {
                *asked_c.borrow_mut() += discarded.len();
                false
            },
        );
        editor.set_pattern_type(PatternType::Daily).unwrap();
        editor.add_exception(START).unwrap();
        let seen = recorded(&mut editor);

        assert_eq!(
            editor.set_pattern_type(PatternType::Weekly),
            Ok(Commit::Declined)
        );
        assert_eq!(*asked.borrow(), 1);
        assert_eq!(editor.rule().pattern_type(), PatternType::Daily);
        assert!(seen.borrow().is_empty());

        // removing an exception explicitly is not a discard
        assert_eq!(editor.remove_exception(START), Ok(Commit::Applied));
        assert_eq!(*asked.borrow(), 1);
        assert_eq!(
            editor.set_pattern_type(PatternType::Weekly),
            Ok(Commit::Applied)
        );
    }

    #[test]
    fn replace_normalizes_and_notifies_once() {
        let mut editor = editor();
        let seen = recorded(&mut editor);
        let mut rule = RecurrenceRule::new(START);
        rule.pattern = Pattern::Daily(DailyPattern::Interval(2));

        assert_eq!(editor.replace(rule), Commit::Applied);
        assert_eq!(editor.rule().series_end, SeriesEnd::Times(DEFAULT_OCCURRENCES));
        let current = editor.rule().clone();
        assert_eq!(editor.replace(current), Commit::Unchanged);
        assert_eq!(*seen.borrow(), vec![RuleChange::Replaced]);
    }

    #[test]
    fn unsubscribed_observers_are_not_notified() {
        let mut editor = editor();
        let seen = Rc::new(RefCell::new(0));
        let seen_c = seen.clone();
        let id = editor.subscribe(move |_: RuleChange, _: &RecurrenceRule| {
            *seen_c.borrow_mut() += 1
        });
        editor.set_whole_day(true).unwrap();
        assert!(editor.unsubscribe(id));
        editor.set_whole_day(false).unwrap();
        assert_eq!(*seen.borrow(), 1);
    }
}
