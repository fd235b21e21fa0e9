//! Domain-level command and query types
//! These structs are used by services inside the domain layer and are **not**
//! exposed over the public API. The REST layer maps the public DTOs defined in
//! the `shared` crate to these internal types.

use serde_json::Value;

/// Input for logging an event.
#[derive(Debug, Clone, Default)]
pub struct LogEventCommand {
    pub event_type: String,
    pub note: Option<String>,
    pub data: Option<Value>,
}

/// What logging an event did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogEventOutcome {
    SleepStarted(i64),
    SleepStopped(i64),
    Logged(i64),
}

impl LogEventOutcome {
    pub fn id(&self) -> i64 {
        match self {
            LogEventOutcome::SleepStarted(id)
            | LogEventOutcome::SleepStopped(id)
            | LogEventOutcome::Logged(id) => *id,
        }
    }
}

/// Input for editing an event's time and payload.
#[derive(Debug, Clone)]
pub struct UpdateEventCommand {
    pub id: i64,
    pub start_time: String,
    pub data: Option<Value>,
}

/// Derived day state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayStatus {
    pub is_sleeping: bool,
    pub medicine_given: bool,
}
