use super::IOccurrenceService;
use recurrence_editor_domain::{Occurrence, Occurrences, SeriesStatus};
use std::sync::Mutex;

/// Occurrence service answering with canned values. Records every rule it
/// was asked about.
pub struct InMemoryOccurrenceService {
    occurrences: Mutex<Vec<Occurrence>>,
    status: Mutex<SeriesStatus>,
    unavailable: Mutex<bool>,
    requests: Mutex<Vec<String>>,
}

impl InMemoryOccurrenceService {
    pub fn new() -> Self {
        Self {
            occurrences: Mutex::new(Vec::new()),
            status: Mutex::new(SeriesStatus {
                valid: true,
                status_text: String::new(),
            }),
            unavailable: Mutex::new(false),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn set_occurrences(&self, occurrences: Vec<Occurrence>) {
        *self.occurrences.lock().unwrap() = occurrences;
    }

    pub fn set_status(&self, status: SeriesStatus) {
        *self.status.lock().unwrap() = status;
    }

    /// Makes every following request fail until set back
    pub fn set_unavailable(&self, unavailable: bool) {
        *self.unavailable.lock().unwrap() = unavailable;
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    fn record(&self, serialized_rule: &str) -> anyhow::Result<()> {
        self.requests
            .lock()
            .unwrap()
            .push(serialized_rule.to_string());
        if *self.unavailable.lock().unwrap() {
            return Err(anyhow::Error::msg("Occurrence service is unavailable"));
        }
        Ok(())
    }
}

impl Default for InMemoryOccurrenceService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl IOccurrenceService for InMemoryOccurrenceService {
    async fn expand(&self, serialized_rule: &str) -> anyhow::Result<Occurrences> {
        self.record(serialized_rule)?;
        let occurrences = self.occurrences.lock().unwrap().clone();
        Ok(Occurrences::new(occurrences))
    }

    async fn status(&self, serialized_rule: &str) -> anyhow::Result<SeriesStatus> {
        self.record(serialized_rule)?;
        Ok(self.status.lock().unwrap().clone())
    }
}
