//! Publication dates as harvested from different sources.
//!
//! Sources disagree on encoding: Google News exposes an ISO 8601 `datetime`
//! attribute (with `Z`, an offset, or nothing), while A Tarde prints
//! `"03/11/2025 às 14:44"`. A date that cannot be read is kept as its raw text
//! so one bad field never costs the whole article.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Text written for articles that carry no date at all.
pub const DATE_NOT_FOUND: &str = "date not found";

const DISPLAY_FORMAT: &str = "%d/%m/%Y";

/// A publication date, or the reason there is none.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PublicationDate {
    Parsed(NaiveDate),
    #[default]
    NotFound,
    /// The source's text, kept verbatim because no known format matched.
    Unparsed(String),
}

impl PublicationDate {
    /// Year of a parsed date; `None` for missing or unreadable dates.
    pub fn year(&self) -> Option<i32> {
        match self {
            PublicationDate::Parsed(date) => Some(date.year()),
            _ => None,
        }
    }

    pub fn is_parsed(&self) -> bool {
        matches!(self, PublicationDate::Parsed(_))
    }
}

impl fmt::Display for PublicationDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PublicationDate::Parsed(date) => write!(f, "{}", date.format(DISPLAY_FORMAT)),
            PublicationDate::NotFound => f.write_str(DATE_NOT_FOUND),
            PublicationDate::Unparsed(raw) => f.write_str(raw),
        }
    }
}

impl Serialize for PublicationDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PublicationDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(match raw.as_deref().map(str::trim) {
            Some(DATE_NOT_FOUND) => PublicationDate::NotFound,
            other => parse_publication_date(other),
        })
    }
}

/// Read a harvested date string.
///
/// Tried in order: RFC 3339 (`Z` or offset, the date is taken in that
/// offset), ISO 8601 without offset, bare `YYYY-MM-DD`, and `dd/mm/YYYY`
/// optionally followed by `às HH:MM`.
pub fn parse_publication_date(raw: Option<&str>) -> PublicationDate {
    let Some(text) = raw.map(str::trim).filter(|t| !t.is_empty()) else {
        return PublicationDate::NotFound;
    };

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return PublicationDate::Parsed(dt.date_naive());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f") {
        return PublicationDate::Parsed(dt.date());
    }
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return PublicationDate::Parsed(date);
    }

    let day_part = text.split("às").next().unwrap_or(text).trim();
    if let Ok(date) = NaiveDate::parse_from_str(day_part, DISPLAY_FORMAT) {
        return PublicationDate::Parsed(date);
    }

    PublicationDate::Unparsed(text.to_string())
}
