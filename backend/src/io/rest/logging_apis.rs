use axum::{extract::State, response::Json};
use shared::{LogEntry, SuccessResponse};
use tracing::{debug, error, info, warn};

use crate::AppState;

/// Relay a message from the page script into the server log
pub async fn log_message(
    State(_state): State<AppState>,
    Json(entry): Json<LogEntry>,
) -> Json<SuccessResponse> {
    let component = entry.component.as_deref().unwrap_or("page");

    match entry.level.to_lowercase().as_str() {
        "debug" => debug!(component, "{}", entry.message),
        "warn" => warn!(component, "{}", entry.message),
        "error" => error!(component, "{}", entry.message),
        _ => info!(component, "{}", entry.message),
    }

    Json(SuccessResponse { success: true })
}
