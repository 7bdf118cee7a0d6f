use chrono_tz::{Tz, UTC};
use recurrence_editor_domain::{EditorSettings, WeekSelection};
use std::fmt::Display;
use std::str::FromStr;
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct Config {
    /// Base url of the occurrence service, e.g. `http://localhost:5000/api/v1`.
    /// When absent an in-memory service with canned answers is used.
    pub occurrence_service_url: Option<String>,
    /// Zone the wall-clock instants of rules are interpreted in
    pub timezone: Tz,
    /// Quiet period in millis after the last edit before the series status
    /// is checked again
    pub status_debounce_millis: u64,
    pub monthly_weeks: WeekSelection,
    pub yearly_weeks: WeekSelection,
}

fn env_or_default<T>(name: &str, default: T) -> T
where
    T: FromStr + Display,
{
    match std::env::var(name) {
        Ok(value) => match value.parse::<T>() {
            Ok(parsed) => parsed,
            Err(_) => {
                warn!(
                    "The given {}: {} is not valid, falling back to the default: {}.",
                    name, value, default
                );
                default
            }
        },
        Err(_) => default,
    }
}

impl Config {
    pub fn new() -> Self {
        let occurrence_service_url = match std::env::var("OCCURRENCE_SERVICE_URL") {
            Ok(url) if !url.trim().is_empty() => {
                Some(url.trim().trim_end_matches('/').to_string())
            }
            _ => {
                info!("Did not find OCCURRENCE_SERVICE_URL environment variable. Going to use the in-memory occurrence service.");
                None
            }
        };
        let timezone = match std::env::var("TIMEZONE") {
            Ok(name) => match name.parse::<Tz>() {
                Ok(tz) => tz,
                Err(_) => {
                    warn!(
                        "The given TIMEZONE: {} is not a valid IANA time zone, falling back to UTC.",
                        name
                    );
                    UTC
                }
            },
            Err(_) => UTC,
        };
        let defaults = EditorSettings::default();
        let monthly_weeks = match std::env::var("MONTHLY_WEEK_SELECTION") {
            Ok(value) => value.parse().unwrap_or_else(|e| {
                warn!("{}, falling back to the default.", e);
                defaults.monthly_weeks
            }),
            Err(_) => defaults.monthly_weeks,
        };
        let yearly_weeks = match std::env::var("YEARLY_WEEK_SELECTION") {
            Ok(value) => value.parse().unwrap_or_else(|e| {
                warn!("{}, falling back to the default.", e);
                defaults.yearly_weeks
            }),
            Err(_) => defaults.yearly_weeks,
        };

        Self {
            occurrence_service_url,
            timezone,
            status_debounce_millis: env_or_default("STATUS_DEBOUNCE_MILLIS", 400),
            monthly_weeks,
            yearly_weeks,
        }
    }

    pub fn editor_settings(&self) -> EditorSettings {
        EditorSettings {
            timezone: self.timezone,
            monthly_weeks: self.monthly_weeks,
            yearly_weeks: self.yearly_weeks,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use serial_test::serial;

    const VARS: [&str; 5] = [
        "OCCURRENCE_SERVICE_URL",
        "TIMEZONE",
        "STATUS_DEBOUNCE_MILLIS",
        "MONTHLY_WEEK_SELECTION",
        "YEARLY_WEEK_SELECTION",
    ];

    fn clear_env() {
        for var in &VARS {
            std::env::remove_var(var);
        }
    }

    #[test]
    #[serial]
    fn defaults_without_env() {
        clear_env();
        let config = Config::new();
        assert_eq!(config.occurrence_service_url, None);
        assert_eq!(config.timezone, UTC);
        assert_eq!(config.status_debounce_millis, 400);
        assert_eq!(config.editor_settings(), EditorSettings::default());
    }

    #[test]
    #[serial]
    fn reads_env_and_falls_back_on_invalid_values() {
        clear_env();
        std::env::set_var("OCCURRENCE_SERVICE_URL", "http://localhost:5000/api/");
        std::env::set_var("TIMEZONE", "Europe/Oslo");
        std::env::set_var("STATUS_DEBOUNCE_MILLIS", "soon");
        std::env::set_var("YEARLY_WEEK_SELECTION", "multiple");
        std::env::set_var("MONTHLY_WEEK_SELECTION", "some");

        let config = Config::new();
        assert_eq!(
            config.occurrence_service_url.as_deref(),
            Some("http://localhost:5000/api")
        );
        assert_eq!(config.timezone, chrono_tz::Europe::Oslo);
        assert_eq!(config.status_debounce_millis, 400);
        assert_eq!(config.yearly_weeks, WeekSelection::Multiple);
        assert_eq!(config.monthly_weeks, WeekSelection::Multiple);
        clear_env();
    }
}
