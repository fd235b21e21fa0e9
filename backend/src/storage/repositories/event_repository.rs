use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use sqlx::{sqlite::SqliteRow, Row};
use tracing::{debug, warn};

use crate::domain::models::{
    format_timestamp, parse_stored_timestamp, Event, EventType, NewEvent, SleepToggle,
};
use crate::storage::connection::DbConnection;
use crate::storage::traits::EventStorage;

const SELECT_COLUMNS: &str = "SELECT id, type, startTime, endTime, note, data FROM events";

/// Repository for event operations
#[derive(Clone)]
pub struct EventRepository {
    db: DbConnection,
}

impl EventRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    fn row_to_event(row: &SqliteRow) -> Result<Event> {
        let id: i64 = row.try_get("id")?;
        let start_raw: String = row.try_get("startTime")?;
        let end_raw: Option<String> = row.try_get("endTime")?;
        let data_raw: String = row.try_get("data")?;

        let start_time = parse_stored_timestamp(&start_raw)
            .ok_or_else(|| anyhow!("Event {} has an invalid startTime: {}", id, start_raw))?;
        let end_time = match end_raw {
            Some(raw) => Some(
                parse_stored_timestamp(&raw)
                    .ok_or_else(|| anyhow!("Event {} has an invalid endTime: {}", id, raw))?,
            ),
            None => None,
        };

        let data = serde_json::from_str::<Map<String, Value>>(&data_raw).unwrap_or_else(|e| {
            warn!("Event {} has unreadable data ({}), using an empty object", id, e);
            Map::new()
        });

        Ok(Event {
            id,
            event_type: EventType::parse(&row.try_get::<String, _>("type")?),
            start_time,
            end_time,
            note: row.try_get("note")?,
            data,
        })
    }
}

#[async_trait]
impl EventStorage for EventRepository {
    async fn insert_event(&self, event: &NewEvent) -> Result<i64> {
        let data = serde_json::to_string(&event.data)?;
        let result = sqlx::query(
            r#"
            INSERT INTO events (type, startTime, note, data)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(event.event_type.as_str())
        .bind(format_timestamp(&event.start_time))
        .bind(event.note.as_deref())
        .bind(data)
        .execute(self.db.pool())
        .await
        .context("Failed to insert event")?;

        let id = result.last_insert_rowid();
        debug!("Inserted {} event with id {}", event.event_type, id);
        Ok(id)
    }

    async fn toggle_sleep(&self, now: DateTime<Utc>) -> Result<SleepToggle> {
        let _guard = self.db.sleep_toggle_lock().lock().await;
        let mut tx = self.db.pool().begin().await?;

        let open_sleep: Option<i64> = sqlx::query_scalar(
            r#"
            SELECT id FROM events
            WHERE type = 'SLEEP' AND endTime IS NULL
            LIMIT 1
            "#,
        )
        .fetch_optional(&mut *tx)
        .await?;

        let timestamp = format_timestamp(&now);
        let outcome = match open_sleep {
            Some(id) => {
                sqlx::query("UPDATE events SET endTime = ? WHERE id = ?")
                    .bind(&timestamp)
                    .bind(id)
                    .execute(&mut *tx)
                    .await?;
                SleepToggle::Stopped(id)
            }
            None => {
                let result = sqlx::query(
                    r#"
                    INSERT INTO events (type, startTime, data)
                    VALUES ('SLEEP', ?, '{}')
                    "#,
                )
                .bind(&timestamp)
                .execute(&mut *tx)
                .await?;
                SleepToggle::Started(result.last_insert_rowid())
            }
        };

        tx.commit().await.context("Failed to commit sleep toggle")?;
        debug!("Sleep toggle: {:?}", outcome);
        Ok(outcome)
    }

    async fn get_event(&self, id: i64) -> Result<Option<Event>> {
        let row = sqlx::query(&format!("{} WHERE id = ?", SELECT_COLUMNS))
            .bind(id)
            .fetch_optional(self.db.pool())
            .await?;

        row.as_ref().map(Self::row_to_event).transpose()
    }

    async fn list_recent(&self, limit: u32) -> Result<Vec<Event>> {
        let rows = sqlx::query(&format!(
            "{} ORDER BY startTime DESC, id DESC LIMIT ?",
            SELECT_COLUMNS
        ))
        .bind(i64::from(limit))
        .fetch_all(self.db.pool())
        .await?;

        rows.iter().map(Self::row_to_event).collect()
    }

    async fn update_event(&self, id: i64, start_time: DateTime<Utc>, data: &Map<String, Value>) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE events
            SET startTime = ?, data = ?
            WHERE id = ?
            "#,
        )
        .bind(format_timestamp(&start_time))
        .bind(serde_json::to_string(data)?)
        .bind(id)
        .execute(self.db.pool())
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_event(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM events WHERE id = ?")
            .bind(id)
            .execute(self.db.pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn has_open_sleep(&self) -> Result<bool> {
        let row = sqlx::query(
            r#"
            SELECT id FROM events
            WHERE type = 'SLEEP' AND endTime IS NULL
            LIMIT 1
            "#,
        )
        .fetch_optional(self.db.pool())
        .await?;

        Ok(row.is_some())
    }

    async fn has_event_between(
        &self,
        event_type: &EventType,
        since: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> Result<bool> {
        let row = sqlx::query(
            r#"
            SELECT id FROM events
            WHERE type = ? AND startTime >= ? AND startTime <= ?
            LIMIT 1
            "#,
        )
        .bind(event_type.as_str())
        .bind(format_timestamp(&since))
        .bind(format_timestamp(&until))
        .fetch_optional(self.db.pool())
        .await?;

        Ok(row.is_some())
    }
}
