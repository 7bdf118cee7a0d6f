mod config;
mod services;
mod system;

pub use config::Config;
use recurrence_editor_domain::EditorSettings;
pub use services::*;
use std::sync::Arc;
pub use system::{ISys, RealSys, StaticTimeSys};
use tracing::info;

#[derive(Clone)]
pub struct RecurrenceContext {
    pub config: Config,
    pub sys: Arc<dyn ISys>,
    pub occurrence_service: Arc<dyn IOccurrenceService>,
}

impl RecurrenceContext {
    fn create(config: Config) -> Self {
        let occurrence_service: Arc<dyn IOccurrenceService> = match &config.occurrence_service_url
        {
            Some(url) => {
                info!("Using the occurrence service at {}", url);
                Arc::new(HttpOccurrenceService::new(url.clone()))
            }
            None => Arc::new(InMemoryOccurrenceService::new()),
        };
        Self {
            config,
            sys: Arc::new(RealSys {}),
            occurrence_service,
        }
    }

    /// Context with a frozen clock and the given in-memory occurrence service,
    /// used for testing
    pub fn create_inmemory(now: i64, occurrence_service: Arc<InMemoryOccurrenceService>) -> Self {
        let settings = EditorSettings::default();
        let config = Config {
            occurrence_service_url: None,
            timezone: settings.timezone,
            status_debounce_millis: 400,
            monthly_weeks: settings.monthly_weeks,
            yearly_weeks: settings.yearly_weeks,
        };
        Self {
            config,
            sys: Arc::new(StaticTimeSys(now)),
            occurrence_service,
        }
    }
}

/// Will setup the infrastructure context given the environment
pub fn setup_context() -> RecurrenceContext {
    RecurrenceContext::create(Config::new())
}
