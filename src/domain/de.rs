//! Lenient deserializers for backend records.
//!
//! The backend is not strict about scalar types: phone numbers arrive as
//! strings or numbers and timestamps may be missing or malformed.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    String(String),
    Unsigned(u64),
    Signed(i64),
    Float(f64),
}

/// Accepts a JSON string, number or `null` and yields a string.
pub(crate) fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<StringOrNumber>::deserialize(deserializer)?;
    Ok(match value {
        Some(StringOrNumber::String(s)) => s,
        Some(StringOrNumber::Unsigned(n)) => n.to_string(),
        Some(StringOrNumber::Signed(n)) => n.to_string(),
        Some(StringOrNumber::Float(n)) => format!("{n}"),
        None => String::new(),
    })
}

/// Parses RFC 3339 timestamps or plain dates; anything else becomes `None`.
pub(crate) fn lenient_datetime<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|raw| {
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .ok()
            .or_else(|| {
                NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
                    .ok()
                    .and_then(|date| date.and_hms_opt(0, 0, 0))
                    .map(|naive| naive.and_utc())
            })
    }))
}

/// Accepts the string `"all"` (any case) or an empty string as "no filter".
pub(crate) fn is_unfiltered(value: &str) -> bool {
    let value = value.trim();
    value.is_empty() || value.eq_ignore_ascii_case("all")
}
