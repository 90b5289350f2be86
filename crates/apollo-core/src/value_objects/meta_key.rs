//! Post meta allow-list
//!
//! Every meta key the system reads or writes is a variant of [`MetaKey`]. The
//! key decides the [`MetaKind`], and the kind decides how raw strings are
//! validated on write and sanitized on read.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use validator::ValidateUrl;

use crate::error::DomainError;

/// Maximum length of a text meta value, in characters
pub const MAX_TEXT_LENGTH: usize = 10_000;

/// Allowed post meta keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MetaKey {
    EventStartDate,
    EventEndDate,
    EventStartTime,
    EventLocation,
    EventCoupon,
    EventBanner,
    TicketsExt,
    EventDjIds,
    EventLocalIds,
    EventTimetable,
    FavoritesCount,
    BookmarksCount,
    InterestCount,
}

/// How a meta value is stored and sanitized
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetaKind {
    Integer,
    Array,
    Url,
    Text,
}

/// A sanitized meta value, ready to be returned to clients
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MetaValue {
    Integer(i64),
    Array(Vec<serde_json::Value>),
    Url(Option<String>),
    Text(String),
}

impl MetaKey {
    pub const ALL: [MetaKey; 13] = [
        MetaKey::EventStartDate,
        MetaKey::EventEndDate,
        MetaKey::EventStartTime,
        MetaKey::EventLocation,
        MetaKey::EventCoupon,
        MetaKey::EventBanner,
        MetaKey::TicketsExt,
        MetaKey::EventDjIds,
        MetaKey::EventLocalIds,
        MetaKey::EventTimetable,
        MetaKey::FavoritesCount,
        MetaKey::BookmarksCount,
        MetaKey::InterestCount,
    ];

    /// Stored key name
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::EventStartDate => "_event_start_date",
            Self::EventEndDate => "_event_end_date",
            Self::EventStartTime => "_event_start_time",
            Self::EventLocation => "_event_location",
            Self::EventCoupon => "_event_coupon",
            Self::EventBanner => "_event_banner",
            Self::TicketsExt => "_tickets_ext",
            Self::EventDjIds => "_event_dj_ids",
            Self::EventLocalIds => "_event_local_ids",
            Self::EventTimetable => "_event_timetable",
            Self::FavoritesCount => "_favorites_count",
            Self::BookmarksCount => "_bookmarks_count",
            Self::InterestCount => "_interest_count",
        }
    }

    pub const fn kind(&self) -> MetaKind {
        match self {
            Self::EventStartDate
            | Self::EventEndDate
            | Self::EventStartTime
            | Self::EventLocation
            | Self::EventCoupon => MetaKind::Text,
            Self::EventBanner | Self::TicketsExt => MetaKind::Url,
            Self::EventDjIds | Self::EventLocalIds | Self::EventTimetable => MetaKind::Array,
            Self::FavoritesCount | Self::BookmarksCount | Self::InterestCount => MetaKind::Integer,
        }
    }

    /// Internal keys are maintained by the system and never written by clients
    pub const fn is_internal(&self) -> bool {
        matches!(
            self,
            Self::FavoritesCount | Self::BookmarksCount | Self::InterestCount
        )
    }

    /// Look up a key by its stored name
    pub fn parse(name: &str) -> Result<Self, DomainError> {
        Self::ALL
            .iter()
            .copied()
            .find(|key| key.as_str() == name)
            .ok_or_else(|| DomainError::InvalidKey(name.to_string()))
    }

    /// Validate and normalize a raw value for this key
    pub fn validate_write(&self, raw: &str) -> Result<String, DomainError> {
        self.kind().validate_write(raw)
    }

    /// Sanitize a stored value for this key
    pub fn sanitize_read(&self, raw: &str) -> MetaValue {
        self.kind().sanitize_read(raw)
    }
}

impl fmt::Display for MetaKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MetaKey {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MetaKey::parse(s)
    }
}

impl MetaKind {
    /// Validate a raw client value, returning the string to store
    pub fn validate_write(&self, raw: &str) -> Result<String, DomainError> {
        match self {
            Self::Integer => raw
                .trim()
                .parse::<u64>()
                .map(|n| n.to_string())
                .map_err(|_| {
                    DomainError::ValidationFailed("expected a non-negative integer".to_string())
                }),
            Self::Url => {
                let url = raw.trim();
                if is_http_url(url) {
                    Ok(url.to_string())
                } else {
                    Err(DomainError::ValidationFailed(
                        "expected an absolute http or https URL".to_string(),
                    ))
                }
            }
            Self::Array => match serde_json::from_str::<serde_json::Value>(raw) {
                Ok(value @ serde_json::Value::Array(_)) => Ok(value.to_string()),
                _ => Err(DomainError::ValidationFailed(
                    "expected a JSON array".to_string(),
                )),
            },
            Self::Text => {
                if raw.chars().count() > MAX_TEXT_LENGTH {
                    Err(DomainError::ValidationFailed(format!(
                        "text longer than {MAX_TEXT_LENGTH} characters"
                    )))
                } else {
                    Ok(raw.to_string())
                }
            }
        }
    }

    /// Sanitize a stored value; never fails
    pub fn sanitize_read(&self, raw: &str) -> MetaValue {
        match self {
            Self::Integer => MetaValue::Integer(parse_non_negative(raw)),
            Self::Array => match serde_json::from_str::<serde_json::Value>(raw) {
                Ok(serde_json::Value::Array(items)) => MetaValue::Array(items),
                _ => MetaValue::Array(Vec::new()),
            },
            Self::Url => {
                let url = raw.trim();
                MetaValue::Url(is_http_url(url).then(|| url.to_string()))
            }
            Self::Text => MetaValue::Text(raw.to_string()),
        }
    }
}

impl MetaValue {
    /// Integer value, if this is an integer
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// Text rendering used by HTML fragments
    pub fn display_text(&self) -> String {
        match self {
            Self::Integer(n) => n.to_string(),
            Self::Array(items) => serde_json::Value::Array(items.clone()).to_string(),
            Self::Url(url) => url.clone().unwrap_or_default(),
            Self::Text(text) => text.clone(),
        }
    }
}

/// Parse a counter value; anything invalid or negative reads as 0
pub fn parse_non_negative(raw: &str) -> i64 {
    raw.trim().parse::<i64>().map_or(0, |n| n.max(0))
}

fn is_http_url(url: &str) -> bool {
    (url.starts_with("http://") || url.starts_with("https://")) && url.validate_url()
}
