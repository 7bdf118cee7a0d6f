use serde::{de::Visitor, Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};
use thiserror::Error;

/// Opaque identifier of a recurring series, as handed out by the server.
///
/// The editor never interprets it, it is only carried along so that a rule
/// derived from another series can be bound back to its parent.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SeriesId(String);

impl SeriesId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for SeriesId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Error, Debug, PartialEq)]
pub enum InvalidSeriesIdError {
    #[error("Series id: `{0}` is malformed")]
    Malformed(String),
}

impl FromStr for SeriesId {
    type Err = InvalidSeriesIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(InvalidSeriesIdError::Malformed(s.to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }
}

impl Serialize for SeriesId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for SeriesId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct SeriesIdVisitor;

        impl<'de> Visitor<'de> for SeriesIdVisitor {
            type Value = SeriesId;

            fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                formatter.write_str("A valid string series id representation")
            }

            fn visit_str<E>(self, value: &str) -> Result<SeriesId, E>
            where
                E: serde::de::Error,
            {
                value
                    .parse::<SeriesId>()
                    .map_err(|_| E::custom(format!("Malformed series id: {}", value)))
            }
        }

        deserializer.deserialize_str(SeriesIdVisitor)
    }
}
