//! Event log service: recording, toggling, editing and deleting activities,
//! plus the day status derived from them.
use chrono::Local;
use std::sync::Arc;
use tracing::info;

use crate::domain::{
    clock::Clock,
    commands::{DayStatus, LogEventCommand, LogEventOutcome, UpdateEventCommand},
    day_period::{period_start, DEFAULT_RESET_HOUR},
    error::EventError,
    models::{normalize_data, parse_client_timestamp, Event, EventType, NewEvent, SleepToggle},
};
use crate::storage::{Connection, EventStorage};

pub const DEFAULT_RECENT_LIMIT: u32 = 50;

#[derive(Clone)]
pub struct EventService<C: Connection> {
    event_repository: C::EventRepository,
    clock: Arc<dyn Clock>,
    reset_hour: u32,
}

impl<C: Connection> EventService<C> {
    pub fn new(connection: Arc<C>, clock: Arc<dyn Clock>) -> Self {
        Self::with_reset_hour(connection, clock, DEFAULT_RESET_HOUR)
    }

    pub fn with_reset_hour(connection: Arc<C>, clock: Arc<dyn Clock>, reset_hour: u32) -> Self {
        let event_repository = connection.create_event_repository();
        Self {
            event_repository,
            clock,
            reset_hour,
        }
    }

    /// Record an activity. SLEEP toggles the open sleep instead of inserting blindly.
    pub async fn log_event(&self, command: LogEventCommand) -> Result<LogEventOutcome, EventError> {
        let raw_type = command.event_type.trim();
        if raw_type.is_empty() {
            return Err(EventError::validation("Missing type"));
        }

        let now = self.clock.now();
        let event_type = EventType::parse(raw_type);

        if event_type == EventType::Sleep {
            let outcome = match self.event_repository.toggle_sleep(now).await? {
                SleepToggle::Started(id) => LogEventOutcome::SleepStarted(id),
                SleepToggle::Stopped(id) => LogEventOutcome::SleepStopped(id),
            };
            info!("Sleep toggled: {:?}", outcome);
            return Ok(outcome);
        }

        let new_event = NewEvent {
            event_type,
            start_time: now,
            note: command.note.filter(|note| !note.trim().is_empty()),
            data: normalize_data(command.data),
        };
        let id = self.event_repository.insert_event(&new_event).await?;
        info!("Logged {} event with id {}", new_event.event_type, id);

        Ok(LogEventOutcome::Logged(id))
    }

    /// Derive the sleeping and medicine flags from the stored history.
    pub async fn get_status(&self) -> Result<DayStatus, EventError> {
        let is_sleeping = self.event_repository.has_open_sleep().await?;

        let now = self.clock.now();
        let cutoff = period_start(&now.with_timezone(&Local), self.reset_hour);
        let medicine_given = self
            .event_repository
            .has_event_between(&EventType::Medicine, cutoff, now)
            .await?;

        Ok(DayStatus {
            is_sleeping,
            medicine_given,
        })
    }

    /// Overwrite start time and data. An unknown id is a silent no-op.
    pub async fn edit_event(&self, command: UpdateEventCommand) -> Result<(), EventError> {
        let start_time = parse_client_timestamp(&command.start_time)
            .ok_or_else(|| EventError::validation(format!("Invalid startTime: {}", command.start_time)))?;
        let data = normalize_data(command.data);

        let changed = self
            .event_repository
            .update_event(command.id, start_time, &data)
            .await?;
        if changed {
            info!("Updated event {}", command.id);
        } else {
            info!("Update for unknown event {} ignored", command.id);
        }

        Ok(())
    }

    /// Remove an event. Deleting an unknown id is not an error.
    pub async fn delete_event(&self, id: i64) -> Result<(), EventError> {
        let deleted = self.event_repository.delete_event(id).await?;
        info!("Delete event {}: {}", id, if deleted { "removed" } else { "not found" });
        Ok(())
    }

    pub async fn get_event(&self, id: i64) -> Result<Option<Event>, EventError> {
        Ok(self.event_repository.get_event(id).await?)
    }

    /// Most recent events first, capped at `limit` (default 50)
    pub async fn list_recent(&self, limit: Option<u32>) -> Result<Vec<Event>, EventError> {
        let limit = limit.unwrap_or(DEFAULT_RECENT_LIMIT).max(1);
        Ok(self.event_repository.list_recent(limit).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::clock::FixedClock;
    use crate::storage::DbConnection;
    use crate::domain::models::format_timestamp;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use serde_json::json;

    fn local(day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
        Local
            .with_ymd_and_hms(2025, 6, day, hour, minute, 0)
            .single()
            .expect("Unambiguous local time")
            .with_timezone(&Utc)
    }

    async fn create_test_service(now: DateTime<Utc>) -> (EventService<DbConnection>, Arc<FixedClock>) {
        let db = Arc::new(DbConnection::init_test().await.expect("Failed to init test DB"));
        let clock = Arc::new(FixedClock::new(now));
        (EventService::new(db, clock.clone()), clock)
    }

    fn command(event_type: &str) -> LogEventCommand {
        LogEventCommand {
            event_type: event_type.to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_sleep_toggle_twice_closes_same_event() {
        let (service, clock) = create_test_service(local(14, 20, 0)).await;

        let started = service.log_event(command("SLEEP")).await.unwrap();
        assert!(matches!(started, LogEventOutcome::SleepStarted(_)));

        clock.advance(Duration::minutes(85));
        let stopped = service.log_event(command("SLEEP")).await.unwrap();
        assert_eq!(stopped, LogEventOutcome::SleepStopped(started.id()));

        let events = service.list_recent(None).await.unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].start_time, local(14, 20, 0));
        assert_eq!(events[0].end_time, Some(local(14, 21, 25)));
    }

    #[tokio::test]
    async fn test_single_sleep_toggle_leaves_one_open_event() {
        let (service, _clock) = create_test_service(local(14, 20, 0)).await;
        service.log_event(command("SLEEP")).await.unwrap();

        let events = service.list_recent(None).await.unwrap();
        assert_eq!(events.len(), 1);
        assert!(events[0].is_open_sleep());
        assert!(service.get_status().await.unwrap().is_sleeping);
    }

    #[tokio::test]
    async fn test_sleep_ignores_note_and_data() {
        let (service, _clock) = create_test_service(local(14, 20, 0)).await;
        let outcome = service
            .log_event(LogEventCommand {
                event_type: "SLEEP".to_string(),
                note: Some("nap".to_string()),
                data: Some(json!({"amount": "1"})),
            })
            .await
            .unwrap();

        let event = service.get_event(outcome.id()).await.unwrap().unwrap();
        assert!(event.note.is_none());
        assert!(event.data.is_empty());
    }

    #[tokio::test]
    async fn test_missing_type_is_validation_error() {
        let (service, _clock) = create_test_service(local(14, 9, 0)).await;
        let result = service.log_event(command("  ")).await;
        assert!(matches!(result, Err(EventError::Validation(_))));
    }

    #[tokio::test]
    async fn test_log_event_defaults_data_and_keeps_note() {
        let (service, _clock) = create_test_service(local(14, 9, 0)).await;

        let outcome = service
            .log_event(LogEventCommand {
                event_type: "NOTE".to_string(),
                note: Some("Rolled over for the first time".to_string()),
                data: None,
            })
            .await
            .unwrap();
        assert!(matches!(outcome, LogEventOutcome::Logged(_)));

        let event = service.get_event(outcome.id()).await.unwrap().unwrap();
        assert_eq!(event.event_type, EventType::Note);
        assert_eq!(event.note.as_deref(), Some("Rolled over for the first time"));
        assert!(event.data.is_empty());
        assert_eq!(event.start_time, local(14, 9, 0));
    }

    #[tokio::test]
    async fn test_unknown_type_is_accepted() {
        let (service, _clock) = create_test_service(local(14, 9, 0)).await;
        let outcome = service.log_event(command("BATH")).await.unwrap();

        let event = service.get_event(outcome.id()).await.unwrap().unwrap();
        assert_eq!(event.event_type, EventType::Other("BATH".to_string()));
    }

    #[tokio::test]
    async fn test_medicine_persists_until_next_reset() {
        let (service, clock) = create_test_service(local(14, 6, 30)).await;
        service.log_event(command("MEDICINE")).await.unwrap();

        // Same morning, after the dose
        assert!(service.get_status().await.unwrap().medicine_given);

        // Past midnight, still before the reset hour
        clock.set(local(15, 5, 59));
        assert!(service.get_status().await.unwrap().medicine_given);

        // New period
        clock.set(local(15, 6, 1));
        assert!(!service.get_status().await.unwrap().medicine_given);
    }

    #[tokio::test]
    async fn test_medicine_before_dose_is_not_given() {
        let (service, clock) = create_test_service(local(14, 6, 30)).await;
        service.log_event(command("MEDICINE")).await.unwrap();

        // Earlier the same day, after that day's reset: the dose is in the future
        clock.set(local(14, 6, 10));
        assert!(!service.get_status().await.unwrap().medicine_given);

        clock.set(local(14, 6, 30));
        assert!(service.get_status().await.unwrap().medicine_given);
    }

    #[tokio::test]
    async fn test_medicine_moved_into_the_future_is_not_given() {
        let (service, _clock) = create_test_service(local(14, 7, 0)).await;
        let id = service.log_event(command("MEDICINE")).await.unwrap().id();

        service
            .edit_event(UpdateEventCommand {
                id,
                start_time: format_timestamp(&local(14, 11, 0)),
                data: None,
            })
            .await
            .unwrap();

        assert!(!service.get_status().await.unwrap().medicine_given);
    }

    #[tokio::test]
    async fn test_custom_reset_hour() {
        let db = Arc::new(DbConnection::init_test().await.unwrap());
        let clock = Arc::new(FixedClock::new(local(14, 9, 30)));
        let service = EventService::with_reset_hour(db, clock.clone(), 9);
        service.log_event(command("MEDICINE")).await.unwrap();

        clock.set(local(15, 8, 59));
        assert!(service.get_status().await.unwrap().medicine_given);
        clock.set(local(15, 9, 0));
        assert!(!service.get_status().await.unwrap().medicine_given);
    }

    #[tokio::test]
    async fn test_edit_updates_amount_and_keeps_type_and_note() {
        let (service, _clock) = create_test_service(local(14, 9, 0)).await;
        let outcome = service
            .log_event(LogEventCommand {
                event_type: "WEIGHT".to_string(),
                note: Some("morning weigh-in".to_string()),
                data: Some(json!({"amount": "5.2", "unit": "kg"})),
            })
            .await
            .unwrap();

        service
            .edit_event(UpdateEventCommand {
                id: outcome.id(),
                start_time: "2025-06-14T08:45:00Z".to_string(),
                data: Some(json!({"amount": "5.3", "unit": "kg"})),
            })
            .await
            .unwrap();

        let event = service.get_event(outcome.id()).await.unwrap().unwrap();
        assert_eq!(event.data.get("amount"), Some(&json!("5.3")));
        assert_eq!(event.event_type, EventType::Weight);
        assert_eq!(event.note.as_deref(), Some("morning weigh-in"));
        assert_eq!(event.start_time, Utc.with_ymd_and_hms(2025, 6, 14, 8, 45, 0).unwrap());
    }

    #[tokio::test]
    async fn test_edit_missing_event_is_noop() {
        let (service, _clock) = create_test_service(local(14, 9, 0)).await;
        let result = service
            .edit_event(UpdateEventCommand {
                id: 404,
                start_time: "2025-06-14T08:45:00Z".to_string(),
                data: None,
            })
            .await;
        assert!(result.is_ok());
        assert!(service.list_recent(None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_edit_rejects_bad_start_time() {
        let (service, _clock) = create_test_service(local(14, 9, 0)).await;
        let outcome = service.log_event(command("FEED")).await.unwrap();

        let result = service
            .edit_event(UpdateEventCommand {
                id: outcome.id(),
                start_time: "not a time".to_string(),
                data: None,
            })
            .await;
        assert!(matches!(result, Err(EventError::Validation(_))));
    }

    #[tokio::test]
    async fn test_edit_does_not_touch_end_time() {
        let (service, clock) = create_test_service(local(14, 13, 0)).await;
        let started = service.log_event(command("SLEEP")).await.unwrap();
        clock.advance(Duration::minutes(45));
        service.log_event(command("SLEEP")).await.unwrap();

        service
            .edit_event(UpdateEventCommand {
                id: started.id(),
                start_time: "2025-06-14T12:50:00Z".to_string(),
                data: None,
            })
            .await
            .unwrap();

        let event = service.get_event(started.id()).await.unwrap().unwrap();
        assert_eq!(event.end_time, Some(local(14, 13, 45)));
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let (service, _clock) = create_test_service(local(14, 9, 0)).await;
        let outcome = service.log_event(command("DIAPER")).await.unwrap();

        service.delete_event(outcome.id()).await.unwrap();
        assert!(service.list_recent(None).await.unwrap().is_empty());

        service.delete_event(outcome.id()).await.expect("Second delete should be a no-op");
    }

    #[tokio::test]
    async fn test_list_recent_respects_limit() {
        let (service, clock) = create_test_service(local(14, 9, 0)).await;
        for _ in 0..5 {
            service.log_event(command("FEED")).await.unwrap();
            clock.advance(Duration::minutes(30));
        }

        let events = service.list_recent(Some(3)).await.unwrap();
        assert_eq!(events.len(), 3);
        assert!(events.windows(2).all(|pair| pair[0].start_time >= pair[1].start_time));
    }
}
