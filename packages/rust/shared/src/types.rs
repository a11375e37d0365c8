//! Core domain types for Pastewatch sweeps.

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::PastewatchError;

/// Timestamp layout for `discovered_at`: second precision, literal `Z`.
pub const DISCOVERED_AT_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Pastebin paste IDs are exactly eight ASCII alphanumerics.
static PASTE_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9]{8}$").expect("paste ID regex"));

// ---------------------------------------------------------------------------
// PasteId
// ---------------------------------------------------------------------------

/// A validated Pastebin paste identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PasteId(String);

impl PasteId {
    /// Validate `raw` against the paste ID shape.
    pub fn parse(raw: &str) -> Result<Self, PastewatchError> {
        if PASTE_ID_RE.is_match(raw) {
            Ok(Self(raw.to_string()))
        } else {
            Err(PastewatchError::validation(format!(
                "paste ID '{raw}' must be 8 alphanumeric characters"
            )))
        }
    }

    /// Borrow the ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PasteId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for PasteId {
    type Err = PastewatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for PasteId {
    type Error = PastewatchError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<PasteId> for String {
    fn from(id: PasteId) -> Self {
        id.0
    }
}

// ---------------------------------------------------------------------------
// MatchRecord
// ---------------------------------------------------------------------------

/// Where a match was harvested from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Pastebin,
}

/// Triage state of a match. Records are always written as `Pending`;
/// analysts update them downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStatus {
    Pending,
}

/// One line of `keyword_matches.jsonl`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MatchRecord {
    /// Always `pastebin`.
    pub source: Source,
    /// Human-readable sentence naming the keywords and the paste.
    pub context: String,
    /// The paste the keywords were found in.
    pub paste_id: PasteId,
    /// Raw-content URL of the paste.
    pub url: String,
    /// When the match was found (UTC, second precision).
    #[serde(with = "discovered_at")]
    pub discovered_at: DateTime<Utc>,
    /// Matched keywords, in keyword-set order.
    pub keywords_found: Vec<String>,
    /// Triage status.
    pub status: MatchStatus,
}

impl MatchRecord {
    /// Build a pending record for a paste with at least one keyword hit.
    pub fn new(
        paste_id: PasteId,
        url: impl Into<String>,
        keywords_found: Vec<String>,
        discovered_at: DateTime<Utc>,
    ) -> Self {
        let context = format!(
            "Found {} in Pastebin paste ID {paste_id}",
            keywords_found.join(" and ")
        );

        Self {
            source: Source::Pastebin,
            context,
            paste_id,
            url: url.into(),
            discovered_at,
            keywords_found,
            status: MatchStatus::Pending,
        }
    }
}

/// Serde adapter pinning `discovered_at` to [`DISCOVERED_AT_FORMAT`].
mod discovered_at {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    use super::DISCOVERED_AT_FORMAT;

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, ser: S) -> Result<S::Ok, S::Error> {
        ser.collect_str(&value.format(DISCOVERED_AT_FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(de)?;
        NaiveDateTime::parse_from_str(&raw, DISCOVERED_AT_FORMAT)
            .map(|naive| naive.and_utc())
            .map_err(serde::de::Error::custom)
    }
}
