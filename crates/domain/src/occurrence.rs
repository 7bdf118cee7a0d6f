use serde::{Deserialize, Serialize};

/// One date generated by the occurrence service out of a `RecurrenceRule`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Occurrence {
    pub date: i64,
    /// The date is generated by the pattern but suppressed by an exception
    pub is_exception: bool,
}

/// Occurrences of a rule, guaranteed to be sorted by date with no date
/// appearing twice.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Occurrences {
    occurrences: Vec<Occurrence>,
}

impl Occurrences {
    pub fn new(mut occurrences: Vec<Occurrence>) -> Self {
        occurrences.sort_by_key(|o| o.date);
        // an exception wins over a plain occurrence on the same date
        occurrences.dedup_by(|next, prev| {
            if next.date == prev.date {
                prev.is_exception |= next.is_exception;
                true
            } else {
                false
            }
        });
        Self { occurrences }
    }

    /// Dates that actually take place
    pub fn active(&self) -> impl Iterator<Item = i64> + '_ {
        self.occurrences
            .iter()
            .filter(|o| !o.is_exception)
            .map(|o| o.date)
    }

    pub fn len(&self) -> usize {
        self.occurrences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.occurrences.is_empty()
    }

    pub fn inner(self) -> Vec<Occurrence> {
        self.occurrences
    }

    pub fn as_slice(&self) -> &[Occurrence] {
        &self.occurrences
    }
}

/// Whether the occurrence service accepts a rule, with a text to show the user
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesStatus {
    pub valid: bool,
    pub status_text: String,
}
