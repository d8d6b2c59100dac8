// 👤 Lead - the record being deduplicated
// Identity is split across two keys (_id and email); everything else is payload.

use chrono::{DateTime, FixedOffset, SecondsFormat};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ============================================================================
// LEAD
// ============================================================================

/// A single lead record as it appears in the input document.
///
/// Optional fields keep the difference between "absent" (`None`) and
/// "present but empty" (`Some("")`), and unrecognised fields are kept in
/// `extra`, so that rejected and surviving records are written back exactly
/// as they were read.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    #[serde(rename = "_id")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,

    /// When the lead was captured. Absent means "no recency information".
    #[serde(default, with = "entry_date", skip_serializing_if = "Option::is_none")]
    pub entry_date: Option<DateTime<FixedOffset>>,

    /// Any other fields in the input object, carried through untouched
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Lead {
    pub fn new(id: impl Into<String>, email: impl Into<String>) -> Self {
        Lead {
            id: Some(id.into()),
            email: Some(email.into()),
            ..Lead::default()
        }
    }

    /// A lead takes part in deduplication only if both `_id` and `email`
    /// are present and non-blank.
    pub fn is_valid(&self) -> bool {
        self.match_keys().is_some()
    }

    /// Raw `(id, email)` pair for a valid lead, `None` otherwise.
    pub(crate) fn match_keys(&self) -> Option<(&str, &str)> {
        let id = self.id.as_deref().filter(|v| !v.trim().is_empty())?;
        let email = self.email.as_deref().filter(|v| !v.trim().is_empty())?;
        Some((id, email))
    }
}

/// Email as used for grouping: lower-cased, otherwise untouched.
pub fn normalize_email(email: &str) -> String {
    email.to_lowercase()
}

// ============================================================================
// ENTRY DATE CODEC
// ============================================================================

/// Parse an ISO-8601 timestamp carrying an explicit offset.
///
/// Accepts `2023-07-15T10:30:00-07:00`, `2024-01-01T10:00:00Z`, fractional
/// seconds, and the minute-precision form `2024-01-01T10:00Z`.
pub fn parse_entry_date(raw: &str) -> Result<DateTime<FixedOffset>, chrono::ParseError> {
    let raw = raw.trim();

    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts);
    }

    // Minute precision: chrono's %:z does not take "Z"
    let normalized = match raw.strip_suffix('Z').or_else(|| raw.strip_suffix('z')) {
        Some(head) => format!("{}+00:00", head),
        None => raw.to_string(),
    };
    DateTime::parse_from_str(&normalized, "%Y-%m-%dT%H:%M%:z")
}

/// Fully-qualified offset format: `Z` for UTC, `±hh:mm` otherwise.
pub fn format_entry_date(ts: &DateTime<FixedOffset>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

mod entry_date {
    use super::{format_entry_date, parse_entry_date};
    use chrono::{DateTime, FixedOffset};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<DateTime<FixedOffset>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(ts) => serializer.serialize_str(&format_entry_date(ts)),
            None => serializer.serialize_none(),
        }
    }

    // Blank strings are treated the same as a missing field
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<FixedOffset>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw {
            Some(text) if !text.trim().is_empty() => parse_entry_date(&text)
                .map(Some)
                .map_err(|e| de::Error::custom(format!("invalid entryDate '{}': {}", text, e))),
            _ => Ok(None),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
