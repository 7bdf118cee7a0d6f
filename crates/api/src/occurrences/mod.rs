mod check_series_status;
mod expand_occurrences;

pub(crate) use check_series_status::handle_error as handle_status_error;
pub use check_series_status::{check_series_status, CheckSeriesStatusUseCase};
pub use expand_occurrences::{expand_occurrences, ExpandOccurrencesUseCase};
