//! Activity list display logic.
//!
//! Turns stored events into the rows the activity list shows: icon, label,
//! subtext and time range. This is the only place that interprets `data` and
//! `note` for presentation.
//!
//! ## Rules
//!
//! - **WEIGHT**: `data.amount` followed by the configured unit label
//! - **NOTE**: the note text, truncated for the list
//! - **SLEEP**: "sleeping since" while open; once closed, the time range and
//!   elapsed hours and minutes
//! - **Unknown kinds**: generic icon and the "Logged" placeholder
//!
//! Times are rendered in the server's local time zone unless a zone is passed
//! explicitly.

use chrono::{DateTime, Duration, Local, TimeZone};
use serde::{Deserialize, Serialize};
use shared::FormattedEvent;
use std::fmt::Display;

use crate::domain::models::{Event, EventType};

const PLACEHOLDER_SUBTEXT: &str = "Logged";

/// Configuration for activity list display
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ActivityDisplayConfig {
    /// Unit label appended to WEIGHT amounts
    pub weight_unit: String,
    /// Characters of a note shown before truncating
    pub note_preview_chars: usize,
}

impl Default for ActivityDisplayConfig {
    fn default() -> Self {
        Self {
            weight_unit: "kg".to_string(),
            note_preview_chars: 40,
        }
    }
}

/// Icon and styling hint for a kind of activity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventStyle {
    pub icon: &'static str,
    pub css_class: &'static str,
}

impl EventStyle {
    pub fn for_type(event_type: &EventType) -> Self {
        let (icon, css_class) = match event_type {
            EventType::Sleep => ("😴", "sleep"),
            EventType::Feed => ("🍼", "feed"),
            EventType::Diaper => ("💩", "diaper"),
            EventType::Medicine => ("💊", "medicine"),
            EventType::Weight => ("⚖️", "weight"),
            EventType::Note => ("📝", "note"),
            EventType::Other(_) => ("📝", "other"),
        };
        Self { icon, css_class }
    }
}

/// Activity display service that formats events for the list view
#[derive(Clone, Default)]
pub struct ActivityDisplayService {
    config: ActivityDisplayConfig,
}

impl ActivityDisplayService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ActivityDisplayConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ActivityDisplayConfig {
        &self.config
    }

    /// Format a list of events in server local time
    pub fn format_events(&self, events: &[Event]) -> Vec<FormattedEvent> {
        events.iter().map(|event| self.format_event_in(event, &Local)).collect()
    }

    /// Format a single event with times rendered in `tz`
    pub fn format_event_in<Tz>(&self, event: &Event, tz: &Tz) -> FormattedEvent
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        let style = EventStyle::for_type(&event.event_type);
        let start = event.start_time.with_timezone(tz);

        let (time_display, duration) = match (&event.event_type, event.end_time) {
            (EventType::Sleep, None) => (format!("💤 Sleeping since {}", clock_time(&start)), None),
            (EventType::Sleep, Some(end)) => (
                format!("{} - {}", clock_time(&start), clock_time(&end.with_timezone(tz))),
                Some(format_duration(end - event.start_time)),
            ),
            _ => (clock_time(&start), None),
        };

        FormattedEvent {
            id: event.id,
            event_type: event.event_type.as_str().to_string(),
            label: display_label(&event.event_type),
            icon: style.icon.to_string(),
            css_class: style.css_class.to_string(),
            subtext: self.subtext(event),
            time_display,
            duration,
            start_time_input: start.format("%Y-%m-%dT%H:%M").to_string(),
            amount: event.amount_text(),
            data: event.data.clone(),
        }
    }

    /// Secondary line under the label
    pub fn subtext(&self, event: &Event) -> String {
        match &event.event_type {
            EventType::Weight => match event.amount_text() {
                Some(amount) => format!("{} {}", amount, self.config.weight_unit),
                None => PLACEHOLDER_SUBTEXT.to_string(),
            },
            EventType::Note => match event.note.as_deref().map(str::trim) {
                Some(note) if !note.is_empty() => truncate_chars(note, self.config.note_preview_chars),
                _ => PLACEHOLDER_SUBTEXT.to_string(),
            },
            _ => PLACEHOLDER_SUBTEXT.to_string(),
        }
    }
}

/// "SLEEP" -> "Sleep", "BATH_TIME" -> "Bath_time"
pub fn display_label(event_type: &EventType) -> String {
    let lower = event_type.as_str().to_lowercase();
    let mut chars = lower.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Elapsed time floor-divided into hours and minutes: "1h 25m", "40m"
pub fn format_duration(elapsed: Duration) -> String {
    let minutes = elapsed.num_minutes().max(0);
    let (hours, minutes) = (minutes / 60, minutes % 60);
    if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else {
        format!("{}m", minutes)
    }
}

/// 12-hour wall clock time, e.g. "9:05 PM"
fn clock_time<Tz>(time: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    time.format("%-I:%M %p").to_string()
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut truncated: String = text.chars().take(max_chars).collect();
    truncated.push('…');
    truncated
}
