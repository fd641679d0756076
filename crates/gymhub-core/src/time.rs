//! UTC time helpers shared by entities, stores and services.
//!
//! Instants are persisted as RFC 3339 strings with a fixed microsecond
//! precision and an explicit `+00:00` offset, so string order is
//! chronological order. Times of day are persisted as `HH:MM:SS`.

use chrono::{DateTime, NaiveTime, SecondsFormat, SubsecRound, Utc};

use crate::error::AppError;
use crate::result::AppResult;

/// Storage format for wall-clock times of day.
pub const TIME_OF_DAY_FORMAT: &str = "%H:%M:%S";

/// Truncate an instant to the precision kept in storage.
pub fn normalize(instant: DateTime<Utc>) -> DateTime<Utc> {
    instant.trunc_subsecs(6)
}

/// Format an instant for storage.
pub fn to_storage(instant: &DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Micros, false)
}

/// Parse a stored instant. Any RFC 3339 offset is accepted and converted to UTC.
pub fn from_storage(value: &str) -> AppResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            AppError::with_source(
                crate::error::ErrorKind::Serialization,
                format!("Invalid stored timestamp '{value}'"),
                e,
            )
        })
}

/// Format a time of day for storage (second precision).
pub fn time_of_day_to_storage(time: &NaiveTime) -> String {
    time.format(TIME_OF_DAY_FORMAT).to_string()
}

/// Parse a time of day. Accepts `HH:MM:SS` and `HH:MM`.
pub fn parse_time_of_day(value: &str) -> AppResult<NaiveTime> {
    NaiveTime::parse_from_str(value, TIME_OF_DAY_FORMAT)
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M"))
        .map_err(|_| AppError::validation(format!("Invalid time of day '{value}', expected HH:MM:SS")))
}

/// Serde adapter for instants in storage format.
pub mod storage_instant {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&super::to_storage(value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(d)?;
        super::from_storage(&raw).map_err(serde::de::Error::custom)
    }
}

/// Serde adapter for optional instants in storage format.
pub mod storage_instant_opt {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        value: &Option<DateTime<Utc>>,
        s: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(v) => s.serialize_str(&super::to_storage(v)),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<DateTime<Utc>>, D::Error> {
        let raw = Option::<String>::deserialize(d)?;
        raw.map(|v| super::from_storage(&v).map_err(serde::de::Error::custom))
            .transpose()
    }
}

/// Serde adapter for times of day as `HH:MM:SS`.
pub mod time_of_day {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &NaiveTime, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&super::time_of_day_to_storage(value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(d)?;
        super::parse_time_of_day(&raw).map_err(serde::de::Error::custom)
    }
}
