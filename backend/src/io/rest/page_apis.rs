//! # Page Rendering
//!
//! `GET /` renders the whole app server side: the quick-action buttons seeded
//! from the current status, the recent activity list, and the modals. The
//! formatted events are also embedded as JSON so the edit modal can be filled
//! without another round trip.

use axum::{extract::State, response::Html};
use shared::FormattedEvent;
use std::fmt::Write;
use tracing::info;

use super::error::ApiError;
use crate::domain::DayStatus;
use crate::AppState;

const STYLESHEET: &str = include_str!("../../../static/app.css");
const SCRIPT: &str = include_str!("../../../static/app.js");

pub async fn index(State(state): State<AppState>) -> Result<Html<String>, ApiError> {
    info!("GET /");

    let status = state.event_service.get_status().await?;
    let events = state.event_service.list_recent(Some(state.recent_limit)).await?;
    let formatted = state.activity_display_service.format_events(&events);
    let weight_unit = &state.activity_display_service.config().weight_unit;

    let events_json = serde_json::to_string(&formatted).map_err(|e| ApiError::Internal(e.to_string()))?;
    Ok(Html(render_page(&status, &formatted, weight_unit, &events_json)))
}

fn render_page(status: &DayStatus, events: &[FormattedEvent], weight_unit: &str, events_json: &str) -> String {
    let unit = escape_html(weight_unit);
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Baby Tracker</title>
<style>{STYLESHEET}</style>
</head>
<body>
<main>
<header><h1>Baby Tracker</h1></header>
{buttons}
<section class="activity">
<h2>Recent Activity</h2>
{list}
</section>
</main>
{modals}
<script type="application/json" id="events-data">{events}</script>
<script>{SCRIPT}</script>
</body>
</html>
"#,
        buttons = render_buttons(status),
        list = render_activity_list(events),
        modals = render_modals(&unit),
        events = embed_json(events_json),
    )
}

fn render_buttons(status: &DayStatus) -> String {
    let (sleep_class, sleep_icon, sleep_label) = if status.is_sleeping {
        ("quick sleep active", "😴", "Wake Baby")
    } else {
        ("quick sleep", "👶", "Start Sleep")
    };
    let (med_class, med_icon, med_label) = if status.medicine_given {
        ("quick medicine given", "✅", "Meds Given")
    } else {
        ("quick medicine due", "💊", "Give Meds")
    };

    format!(
        r#"<section class="quick-buttons">
<button class="{sleep_class}" data-log="SLEEP"><span class="icon">{sleep_icon}</span><span>{sleep_label}</span></button>
<button class="quick feed" data-log="FEED"><span class="icon">🍼</span><span>Feed</span></button>
<button class="quick diaper" data-log="DIAPER"><span class="icon">💩</span><span>Diaper</span></button>
<button class="{med_class}" data-log="MEDICINE"><span class="icon">{med_icon}</span><span>{med_label}</span></button>
<button class="quick weight" data-open="weight-modal"><span class="icon">⚖️</span><span>Weight</span></button>
<button class="quick note" data-open="note-modal"><span class="icon">📝</span><span>Note</span></button>
</section>"#
    )
}

fn render_activity_list(events: &[FormattedEvent]) -> String {
    if events.is_empty() {
        return r#"<p class="empty">No activity yet.</p>"#.to_string();
    }

    let mut html = String::from(r#"<ul class="activity-list">"#);
    for event in events {
        let duration = event
            .duration
            .as_deref()
            .map(|d| format!(r#"<span class="duration">{}</span>"#, escape_html(d)))
            .unwrap_or_default();
        let _ = write!(
            html,
            r#"<li class="activity-row {css}" data-id="{id}"><span class="badge">{icon}</span><div class="details"><span class="label">{label}</span><span class="subtext">{subtext}</span></div><div class="times"><span class="time">{time}</span>{duration}</div></li>"#,
            css = escape_html(&event.css_class),
            id = event.id,
            icon = escape_html(&event.icon),
            label = escape_html(&event.label),
            subtext = escape_html(&event.subtext),
            time = escape_html(&event.time_display),
        );
    }
    html.push_str("</ul>");
    html
}

fn render_modals(unit: &str) -> String {
    format!(
        r#"<div class="modal hidden" id="weight-modal">
<div class="dialog">
<h3>Record Weight</h3>
<div class="row"><input type="number" step="0.01" placeholder="0.0" id="weight-input"><span class="unit">{unit}</span></div>
<div class="actions"><button data-close="weight-modal">Cancel</button><button class="primary" id="weight-save" data-unit="{unit}">Save</button></div>
</div>
</div>
<div class="modal hidden" id="note-modal">
<div class="dialog">
<h3>Add Note</h3>
<textarea id="note-input" rows="4" placeholder="What happened?"></textarea>
<div class="actions"><button data-close="note-modal">Cancel</button><button class="primary" id="note-save">Save</button></div>
</div>
</div>
<div class="modal hidden" id="edit-modal">
<div class="dialog">
<h3 id="edit-title">Edit Event</h3>
<label>Time<input type="datetime-local" id="edit-time"></label>
<label id="edit-amount-row" class="hidden">Amount ({unit})<input type="number" step="0.01" id="edit-amount"></label>
<div class="actions"><button class="danger" id="edit-delete">Delete</button><button data-close="edit-modal">Cancel</button><button class="primary" id="edit-save">Save</button></div>
</div>
</div>"#
    )
}

/// Keep embedded JSON from closing its script element
fn embed_json(json: &str) -> String {
    json.replace("</", "<\\/")
}

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
