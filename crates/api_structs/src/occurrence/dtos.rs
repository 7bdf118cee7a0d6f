use recurrence_editor_domain::{Occurrence, SeriesStatus};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OccurrenceDTO {
    #[serde(with = "crate::shared::wire::millis_string")]
    pub date: i64,
    #[serde(default)]
    pub is_exception: bool,
}

impl OccurrenceDTO {
    pub fn new(occurrence: Occurrence) -> Self {
        Self {
            date: occurrence.date,
            is_exception: occurrence.is_exception,
        }
    }
}

impl From<OccurrenceDTO> for Occurrence {
    fn from(dto: OccurrenceDTO) -> Self {
        Self {
            date: dto.date,
            is_exception: dto.is_exception,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesStatusDTO {
    pub valid: bool,
    #[serde(default)]
    pub status_text: String,
}

impl SeriesStatusDTO {
    pub fn new(status: SeriesStatus) -> Self {
        Self {
            valid: status.valid,
            status_text: status.status_text,
        }
    }
}

impl From<SeriesStatusDTO> for SeriesStatus {
    fn from(dto: SeriesStatusDTO) -> Self {
        Self {
            valid: dto.valid,
            status_text: dto.status_text,
        }
    }
}
