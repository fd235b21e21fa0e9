//! # REST API for Events
//!
//! `/api/events` carries the whole quick-action surface: POST logs (or toggles
//! sleep), GET reports the derived status, DELETE and PATCH remove and edit.

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    response::Json,
};
use serde::{de::DeserializeOwned, Deserialize};
use tracing::info;

use super::error::ApiError;
use super::mappers::EventMapper;
use crate::AppState;
use shared::{
    DeleteEventRequest, Event as SharedEvent, LogEventRequest, LogEventResponse, RecentEventsResponse,
    StatusResponse, SuccessResponse, UpdateEventRequest,
};

// Query parameters for the recent-events API
#[derive(Debug, Deserialize)]
pub struct RecentEventsQuery {
    pub limit: Option<u32>,
}

/// JSON request body, accepted with or without a `Content-Type` header
fn parse_body<T: DeserializeOwned>(body: &Bytes) -> Result<T, ApiError> {
    serde_json::from_slice(body).map_err(|e| ApiError::BadRequest(format!("Invalid JSON body: {}", e)))
}

/// Log an event; SLEEP toggles the open sleep
pub async fn log_event(State(state): State<AppState>, body: Bytes) -> Result<Json<LogEventResponse>, ApiError> {
    let request: LogEventRequest = parse_body(&body)?;
    info!("POST /api/events - type: {:?}", request.event_type);

    let command = EventMapper::to_log_command(request)
        .ok_or_else(|| ApiError::BadRequest("Missing type".to_string()))?;
    let outcome = state.event_service.log_event(command).await?;

    Ok(Json(EventMapper::to_log_response(outcome)))
}

/// Current sleeping and medicine flags
pub async fn get_status(State(state): State<AppState>) -> Result<Json<StatusResponse>, ApiError> {
    info!("GET /api/events");

    let status = state.event_service.get_status().await?;
    Ok(Json(EventMapper::to_status_response(status)))
}

/// Delete one event; unknown ids succeed
pub async fn delete_event(State(state): State<AppState>, body: Bytes) -> Result<Json<SuccessResponse>, ApiError> {
    let request: DeleteEventRequest = parse_body(&body)?;
    info!("DELETE /api/events - id: {:?}", request.id);

    let id = request
        .id
        .ok_or_else(|| ApiError::BadRequest("Missing ID".to_string()))?;
    state.event_service.delete_event(id).await?;

    Ok(Json(SuccessResponse { success: true }))
}

/// Edit start time and data; unknown ids succeed
pub async fn update_event(State(state): State<AppState>, body: Bytes) -> Result<Json<SuccessResponse>, ApiError> {
    let request: UpdateEventRequest = parse_body(&body)?;
    info!("PATCH /api/events - id: {:?}, startTime: {:?}", request.id, request.start_time);

    if request.id.is_none() {
        return Err(ApiError::BadRequest("Missing ID".to_string()));
    }
    let command = EventMapper::to_update_command(request)
        .ok_or_else(|| ApiError::BadRequest("Missing startTime".to_string()))?;
    state.event_service.edit_event(command).await?;

    Ok(Json(SuccessResponse { success: true }))
}

/// Formatted recent events, the same rows the page renders
pub async fn list_recent(
    State(state): State<AppState>,
    Query(query): Query<RecentEventsQuery>,
) -> Result<Json<RecentEventsResponse>, ApiError> {
    info!("GET /api/events/recent - query: {:?}", query);

    let limit = query.limit.unwrap_or(state.recent_limit);
    let events = state.event_service.list_recent(Some(limit)).await?;

    Ok(Json(RecentEventsResponse {
        events: state.activity_display_service.format_events(&events),
    }))
}

/// A single raw event
pub async fn get_event(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<SharedEvent>, ApiError> {
    info!("GET /api/events/{}", id);

    match state.event_service.get_event(id).await? {
        Some(event) => Ok(Json(EventMapper::to_dto(event))),
        None => Err(ApiError::NotFound(format!("Event {} not found", id))),
    }
}
