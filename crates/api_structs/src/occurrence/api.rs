use crate::dtos::{OccurrenceDTO, SeriesStatusDTO};
use recurrence_editor_domain::{Occurrence, Occurrences};
use serde::{Deserialize, Serialize};

/// Body of every occurrence service request, the serialized rule
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleRequestBody {
    pub rule: String,
}

impl RuleRequestBody {
    pub fn new(rule: impl Into<String>) -> Self {
        Self { rule: rule.into() }
    }
}

pub mod expand_occurrences {
    use super::*;

    pub const PATH: &str = "/expand";

    pub type RequestBody = RuleRequestBody;

    #[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub occurrences: Vec<OccurrenceDTO>,
    }

    impl APIResponse {
        pub fn new(occurrences: Vec<Occurrence>) -> Self {
            Self {
                occurrences: occurrences.into_iter().map(OccurrenceDTO::new).collect(),
            }
        }

        pub fn into_occurrences(self) -> Occurrences {
            Occurrences::new(self.occurrences.into_iter().map(Occurrence::from).collect())
        }
    }
}

pub mod get_series_status {
    use super::*;

    pub const PATH: &str = "/status";

    pub type RequestBody = RuleRequestBody;

    pub type APIResponse = SeriesStatusDTO;
}

#[cfg(test)]
mod test {
    use super::*;
    use recurrence_editor_domain::SeriesStatus;
    use serde_json::json;

    #[test]
    fn occurrence_dates_travel_as_strings() {
        let res = expand_occurrences::APIResponse::new(vec![Occurrence {
            date: 1_710_504_000_000,
            is_exception: true,
        }]);
        assert_eq!(
            serde_json::to_value(&res).unwrap(),
            json!({ "occurrences": [{ "date": "1710504000000", "isException": true }] })
        );
    }

    #[test]
    fn parses_occurrence_response() {
        let res: expand_occurrences::APIResponse = serde_json::from_value(json!({
            "occurrences": [
                { "date": "3000", "isException": false },
                { "date": 1000 },
                { "date": "2000", "isException": true }
            ]
        }))
        .unwrap();
        let occurrences = res.into_occurrences();
        assert_eq!(occurrences.len(), 3);
        assert_eq!(occurrences.active().collect::<Vec<_>>(), vec![1000, 3000]);

        let bad: Result<expand_occurrences::APIResponse, _> =
            serde_json::from_value(json!({ "occurrences": [{ "date": "soon" }] }));
        assert!(bad.is_err());
    }

    #[test]
    fn parses_status_response() {
        let res: get_series_status::APIResponse =
            serde_json::from_value(json!({ "valid": false, "statusText": "Too many" })).unwrap();
        assert_eq!(
            SeriesStatus::from(res),
            SeriesStatus {
                valid: false,
                status_text: "Too many".into()
            }
        );
        assert_eq!(
            serde_json::to_value(RuleRequestBody::new("{}")).unwrap(),
            json!({ "rule": "{}" })
        );
    }
}
