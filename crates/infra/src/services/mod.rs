mod occurrence_service;

pub use occurrence_service::{HttpOccurrenceService, IOccurrenceService, InMemoryOccurrenceService};
