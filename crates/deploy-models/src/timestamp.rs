//! Serde helpers for server timestamps.
//!
//! The deploy server writes local date-times either as ISO strings
//! (`2024-03-01T10:15:30`) or as component arrays
//! (`[2024, 3, 1, 10, 15, 30, 0]`). Both forms are accepted; values are
//! always written back as ISO strings.

use chrono::{NaiveDate, NaiveDateTime};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serializer};
use serde_json::Value;

const ISO_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Serialize an optional timestamp as an ISO string (or `null`).
pub fn serialize<S>(value: &Option<NaiveDateTime>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match value {
        Some(ts) => serializer.serialize_str(&ts.format(ISO_FORMAT).to_string()),
        None => serializer.serialize_none(),
    }
}

/// Deserialize an optional timestamp from a string, an array, or `null`.
pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => NaiveDateTime::parse_from_str(&s, ISO_FORMAT)
            .map(Some)
            .map_err(|e| D::Error::custom(format!("invalid timestamp {s:?}: {e}"))),
        Some(Value::Array(parts)) => from_components(&parts)
            .map(Some)
            .ok_or_else(|| D::Error::custom("invalid timestamp array")),
        Some(other) => Err(D::Error::custom(format!(
            "unexpected timestamp value: {other}"
        ))),
    }
}

fn from_components(parts: &[Value]) -> Option<NaiveDateTime> {
    let num = |i: usize| parts.get(i).and_then(Value::as_u64).unwrap_or(0);
    if parts.len() < 3 {
        return None;
    }
    let date = NaiveDate::from_ymd_opt(num(0) as i32, num(1) as u32, num(2) as u32)?;
    date.and_hms_nano_opt(num(3) as u32, num(4) as u32, num(5) as u32, num(6) as u32)
}
