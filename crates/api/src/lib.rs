mod debouncer;
mod error;
mod occurrences;
mod session;
mod shared;

pub use debouncer::{status_debouncer, StatusDebounceWorker, StatusDebouncer, StatusOutcome};
pub use error::EditorError;
pub use occurrences::{
    check_series_status, expand_occurrences, CheckSeriesStatusUseCase, ExpandOccurrencesUseCase,
};
pub use session::{RuleSession, RuleSnapshot, Tagged};
pub use shared::usecase::{execute, Subscriber, UseCase};
