mod date;
mod defaults;
mod editor;
mod occurrence;
mod rule;
mod settings;
mod shared;
mod subscribers;
mod validation;

pub use date::{get_max_month_length, get_month_length, is_leap_year, start_of_day_millis};
pub use defaults::{PatternDefaults, PatternDefaultsCalculator};
pub use editor::{AlwaysConfirm, Commit, ConfirmationGate, RecurrenceEditor, TransitionError};
pub use occurrence::{Occurrence, Occurrences, SeriesStatus};
pub use rule::{
    DailyPattern, EndType, MonthDay, MonthDayMode, Pattern, PatternType, RecurrenceRule,
    SeriesEnd, DEFAULT_INTERVAL, DEFAULT_OCCURRENCES,
};
pub use settings::{EditorSettings, InvalidWeekSelectionError, WeekSelection};
pub use shared::entity::{InvalidSeriesIdError, SeriesId};
pub use shared::recurrence::{InvalidCalendarNameError, Month, WeekDay, WeekOfMonth};
pub use subscribers::{RuleChange, RuleSubscriber, RuleSubscribers, SubscriptionId};
pub use validation::{validate, validate_in, ValidationError};
