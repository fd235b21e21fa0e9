use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A logged activity as it travels over the wire.
///
/// Timestamps are ISO 8601 strings in UTC (`2025-06-14T10:30:00.000Z`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: i64,
    /// Activity kind, e.g. "SLEEP" or "WEIGHT". Unknown kinds are kept verbatim.
    #[serde(rename = "type")]
    pub event_type: String,
    pub start_time: String,
    /// Only ever set on SLEEP events, once the sleep has been stopped
    pub end_time: Option<String>,
    pub note: Option<String>,
    /// Free-form key/value payload, `{}` when nothing was supplied
    #[serde(default)]
    pub data: Map<String, Value>,
}

/// Body of `POST /api/events`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LogEventRequest {
    #[serde(rename = "type")]
    pub event_type: Option<String>,
    pub note: Option<String>,
    pub data: Option<Value>,
}

/// Outcome of toggling the sleep button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SleepToggleStatus {
    Started,
    Stopped,
}

/// Response of `POST /api/events`.
///
/// SLEEP requests answer `{status, id}`, every other type answers `{message, id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LogEventResponse {
    Sleep { status: SleepToggleStatus, id: i64 },
    Logged { message: String, id: i64 },
}

impl LogEventResponse {
    pub fn id(&self) -> i64 {
        match self {
            LogEventResponse::Sleep { id, .. } | LogEventResponse::Logged { id, .. } => *id,
        }
    }
}

/// Response of `GET /api/events`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub is_sleeping: bool,
    pub medicine_given: bool,
}

/// Body of `DELETE /api/events`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeleteEventRequest {
    pub id: Option<i64>,
}

/// Body of `PATCH /api/events`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEventRequest {
    pub id: Option<i64>,
    /// RFC 3339, or the `YYYY-MM-DDTHH:MM` produced by a datetime-local input
    pub start_time: Option<String>,
    pub data: Option<Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuccessResponse {
    pub success: bool,
}

/// An event prepared for the activity list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormattedEvent {
    pub id: i64,
    #[serde(rename = "type")]
    pub event_type: String,
    /// "Sleep", "Feed", ...
    pub label: String,
    pub icon: String,
    /// Styling hint for the row badge
    pub css_class: String,
    pub subtext: String,
    pub time_display: String,
    /// Elapsed time of a finished sleep, e.g. "1h 25m"
    pub duration: Option<String>,
    /// Local `YYYY-MM-DDTHH:MM`, ready for a datetime-local input
    pub start_time_input: String,
    /// `data.amount` rendered as text, when present
    pub amount: Option<String>,
    /// The raw payload, so the edit form can send it back with changes
    pub data: Map<String, Value>,
}

/// Response of `GET /api/events/recent`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentEventsResponse {
    pub events: Vec<FormattedEvent>,
}

/// A log line posted by the page script
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub level: String,
    pub message: String,
    pub component: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}
