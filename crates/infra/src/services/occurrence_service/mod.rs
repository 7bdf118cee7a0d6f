mod http;
mod inmemory;

pub use http::HttpOccurrenceService;
pub use inmemory::InMemoryOccurrenceService;
use recurrence_editor_domain::{Occurrences, SeriesStatus};

/// The external service generating the occurrences of a rule.
///
/// It only ever receives the serialized rule, how it expands the rule is
/// none of the editor's business.
#[async_trait::async_trait]
pub trait IOccurrenceService: Send + Sync {
    async fn expand(&self, serialized_rule: &str) -> anyhow::Result<Occurrences>;
    async fn status(&self, serialized_rule: &str) -> anyhow::Result<SeriesStatus>;
}
