use crate::domain::{
    models::{format_timestamp, Event as DomainEvent},
    DayStatus, LogEventCommand, LogEventOutcome, UpdateEventCommand,
};
use shared::{
    Event as SharedEvent, LogEventRequest, LogEventResponse, SleepToggleStatus, StatusResponse,
    UpdateEventRequest,
};

pub struct EventMapper;

impl EventMapper {
    pub fn to_dto(domain: DomainEvent) -> SharedEvent {
        SharedEvent {
            id: domain.id,
            event_type: domain.event_type.as_str().to_string(),
            start_time: format_timestamp(&domain.start_time),
            end_time: domain.end_time.as_ref().map(format_timestamp),
            note: domain.note,
            data: domain.data,
        }
    }

    /// None when the request carries no usable type
    pub fn to_log_command(dto: LogEventRequest) -> Option<LogEventCommand> {
        let event_type = dto.event_type.filter(|t| !t.trim().is_empty())?;
        Some(LogEventCommand {
            event_type,
            note: dto.note,
            data: dto.data,
        })
    }

    /// None when either the id or the start time is missing
    pub fn to_update_command(dto: UpdateEventRequest) -> Option<UpdateEventCommand> {
        Some(UpdateEventCommand {
            id: dto.id?,
            start_time: dto.start_time.filter(|s| !s.trim().is_empty())?,
            data: dto.data,
        })
    }

    pub fn to_log_response(outcome: LogEventOutcome) -> LogEventResponse {
        match outcome {
            LogEventOutcome::SleepStarted(id) => LogEventResponse::Sleep {
                status: SleepToggleStatus::Started,
                id,
            },
            LogEventOutcome::SleepStopped(id) => LogEventResponse::Sleep {
                status: SleepToggleStatus::Stopped,
                id,
            },
            LogEventOutcome::Logged(id) => LogEventResponse::Logged {
                message: "Logged".to_string(),
                id,
            },
        }
    }

    pub fn to_status_response(status: DayStatus) -> StatusResponse {
        StatusResponse {
            is_sleeping: status.is_sleeping,
            medicine_given: status.medicine_given,
        }
    }
}
