//! Lenient decoding of scalar JSON fields.
//!
//! The affiliate backend is inconsistent about field types: the same ID may
//! arrive as `5` in one response and `"5"` in another, and amounts are often
//! sent as decimal strings. [Scalar] accepts any JSON value so that a single
//! odd field never fails the whole record.

use serde::Deserialize;
use serde::de::IgnoredAny;
use serde_json::Number;
use time::{
    Date, OffsetDateTime, PrimitiveDateTime,
    format_description::well_known::Rfc3339,
    macros::format_description,
};

/// A JSON field that should hold a number or a string.
///
/// Anything else (objects, arrays, booleans) is kept as [Scalar::Other] and
/// treated as missing by the accessors.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub(crate) enum Scalar {
    Number(Number),
    Text(String),
    Other(Unsupported),
}

/// Placeholder for JSON values of an unsupported type.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct Unsupported;

impl<'de> Deserialize<'de> for Unsupported {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        IgnoredAny::deserialize(deserializer)?;
        Ok(Unsupported)
    }
}

impl Scalar {
    /// The value as text, the way a string coercion would render it.
    ///
    /// Integral floats lose their fractional part so that `5`, `5.0` and
    /// `"5"` all become `"5"`. Surrounding whitespace is trimmed.
    pub(crate) fn as_text(&self) -> Option<String> {
        match self {
            Scalar::Number(number) => Some(number_to_text(number)),
            Scalar::Text(text) => Some(text.trim().to_owned()),
            Scalar::Other(_) => None,
        }
    }

    /// The value as text, or `None` if it is missing or blank.
    pub(crate) fn as_non_empty_text(&self) -> Option<String> {
        self.as_text().filter(|text| !text.is_empty())
    }

    pub(crate) fn as_f64(&self) -> Option<f64> {
        match self {
            Scalar::Number(number) => number.as_f64(),
            Scalar::Text(text) => text.trim().parse().ok(),
            Scalar::Other(_) => None,
        }
        .filter(|value: &f64| value.is_finite())
    }

    pub(crate) fn as_i64(&self) -> Option<i64> {
        match self {
            Scalar::Number(number) => number.as_i64().or_else(|| {
                number
                    .as_f64()
                    .filter(|value| value.fract() == 0.0)
                    .map(|value| value as i64)
            }),
            Scalar::Text(text) => text.trim().parse().ok(),
            Scalar::Other(_) => None,
        }
    }
}

fn number_to_text(number: &Number) -> String {
    if let Some(value) = number.as_i64() {
        return value.to_string();
    }

    if let Some(value) = number.as_u64() {
        return value.to_string();
    }

    match number.as_f64() {
        Some(value) if value.fract() == 0.0 && value.abs() < 1e15 => {
            format!("{}", value as i64)
        }
        Some(value) => value.to_string(),
        None => number.to_string(),
    }
}

/// Accept either a list of strings or a single string.
pub(crate) fn string_list(value: Option<serde_json::Value>) -> Vec<String> {
    match value {
        Some(serde_json::Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| match item {
                serde_json::Value::String(url) => Some(url),
                _ => None,
            })
            .collect(),
        Some(serde_json::Value::String(url)) if !url.trim().is_empty() => vec![url],
        _ => Vec::new(),
    }
}

/// Parse a timestamp in one of the formats the backend has been seen to use.
///
/// Accepts `YYYY-MM-DD HH:MM:SS`, RFC 3339 and a bare `YYYY-MM-DD`. RFC 3339
/// timestamps are converted to UTC before the offset is dropped.
pub(crate) fn parse_timestamp(text: &str) -> Option<PrimitiveDateTime> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    let backend_format = format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
    if let Ok(timestamp) = PrimitiveDateTime::parse(text, backend_format) {
        return Some(timestamp);
    }

    if let Ok(timestamp) = OffsetDateTime::parse(text, &Rfc3339) {
        let utc = timestamp.to_offset(time::UtcOffset::UTC);
        return Some(PrimitiveDateTime::new(utc.date(), utc.time()));
    }

    Date::parse(text, format_description!("[year]-[month]-[day]"))
        .ok()
        .map(|date| date.midnight())
}
