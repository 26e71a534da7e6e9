//! Serde helpers for optional timestamps.
//!
//! Timestamps serialize as RFC 3339 strings. On input both RFC 3339 strings
//! (schedule files) and epoch seconds (service responses) are accepted.

use std::fmt;

use chrono::{DateTime, SecondsFormat, TimeZone, Utc};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serializer};
use serde_json::Value;

use crate::error::TypeError;

/// Parse an RFC 3339 timestamp into UTC.
pub fn parse_timestamp(text: &str) -> Result<DateTime<Utc>, TypeError> {
    DateTime::parse_from_rfc3339(text)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| TypeError::InvalidTimestamp(format!("{text}: {e}")))
}

/// Convert fractional epoch seconds into UTC.
pub fn from_epoch_seconds(secs: f64) -> Result<DateTime<Utc>, TypeError> {
    if !secs.is_finite() {
        return Err(TypeError::InvalidTimestamp(secs.to_string()));
    }
    let whole = secs.floor();
    let nanos = ((secs - whole) * 1e9).round() as u32;
    Utc.timestamp_opt(whole as i64, nanos.min(999_999_999))
        .single()
        .ok_or_else(|| TypeError::InvalidTimestamp(secs.to_string()))
}

/// Format a timestamp the way records serialize it.
pub fn format_timestamp(t: &DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

/// `#[serde(with = "timestamp::option")]` for `Option<DateTime<Utc>>` fields.
pub mod option {
    use super::*;

    pub fn serialize<S: Serializer>(
        value: &Option<DateTime<Utc>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(t) => serializer.serialize_str(&format_timestamp(t)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<DateTime<Utc>>, D::Error> {
        deserializer.deserialize_option(OptionalTimestampVisitor)
    }
}

struct OptionalTimestampVisitor;

impl<'de> Visitor<'de> for OptionalTimestampVisitor {
    type Value = Option<DateTime<Utc>>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an RFC 3339 timestamp, epoch seconds, or null")
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        let value = Value::deserialize(deserializer)?;
        timestamp_from_value(&value).map(Some).map_err(de::Error::custom)
    }
}

/// Strings are RFC 3339, numbers are epoch seconds.
fn timestamp_from_value(value: &Value) -> Result<DateTime<Utc>, TypeError> {
    match value {
        Value::String(text) => parse_timestamp(text),
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| TypeError::InvalidTimestamp(n.to_string()))
            .and_then(from_epoch_seconds),
        other => Err(TypeError::InvalidTimestamp(other.to_string())),
    }
}
