use chrono::{DateTime, Local, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use serde_json::{Map, Value};
use std::fmt;

/// Kind of logged activity.
///
/// The set is open: anything that is not one of the quick-action kinds is kept
/// verbatim in `Other` and rendered generically.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EventType {
    Sleep,
    Feed,
    Diaper,
    Medicine,
    Weight,
    Note,
    Other(String),
}

impl EventType {
    /// Matching is exact, so "sleep" is an `Other` kind and never toggles.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "SLEEP" => EventType::Sleep,
            "FEED" => EventType::Feed,
            "DIAPER" => EventType::Diaper,
            "MEDICINE" => EventType::Medicine,
            "WEIGHT" => EventType::Weight,
            "NOTE" => EventType::Note,
            other => EventType::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            EventType::Sleep => "SLEEP",
            EventType::Feed => "FEED",
            EventType::Diaper => "DIAPER",
            EventType::Medicine => "MEDICINE",
            EventType::Weight => "WEIGHT",
            EventType::Note => "NOTE",
            EventType::Other(raw) => raw,
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored activity
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub id: i64,
    pub event_type: EventType,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub note: Option<String>,
    pub data: Map<String, Value>,
}

impl Event {
    /// An open sleep is a SLEEP event without an end time
    pub fn is_open_sleep(&self) -> bool {
        self.event_type == EventType::Sleep && self.end_time.is_none()
    }

    /// `data.amount` as display text. Empty strings count as absent.
    pub fn amount_text(&self) -> Option<String> {
        match self.data.get("amount")? {
            Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

/// Values needed to insert an event; the id is assigned by the store
#[derive(Debug, Clone, PartialEq)]
pub struct NewEvent {
    pub event_type: EventType,
    pub start_time: DateTime<Utc>,
    pub note: Option<String>,
    pub data: Map<String, Value>,
}

/// What a sleep toggle did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SleepToggle {
    Started(i64),
    Stopped(i64),
}

/// Canonical stored form: UTC, millisecond precision, `Z` suffix.
///
/// Every stored timestamp uses this shape so that string comparison in SQL
/// orders the same way as time.
pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn parse_stored_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|parsed| parsed.with_timezone(&Utc))
}

/// Accepts RFC 3339 with any offset, or a naive `YYYY-MM-DDTHH:MM[:SS]`
/// (what a datetime-local input submits) read as server local time.
pub fn parse_client_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Some(parsed) = parse_stored_timestamp(raw) {
        return Some(parsed);
    }

    let naive = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())?;

    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|local| local.with_timezone(&Utc))
}

/// Coerce an incoming payload into a key/value map; anything but an object is `{}`
pub fn normalize_data(data: Option<Value>) -> Map<String, Value> {
    match data {
        Some(Value::Object(map)) => map,
        _ => Map::new(),
    }
}
