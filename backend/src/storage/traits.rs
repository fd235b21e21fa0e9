//! # Storage Traits
//!
//! Storage abstraction used by the domain layer. The SQLite repository is the
//! only implementation today.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use crate::domain::models::{Event, EventType, NewEvent, SleepToggle};

/// Trait defining the interface for event storage operations
#[async_trait]
pub trait EventStorage: Send + Sync {
    /// Insert a new event and return its id
    async fn insert_event(&self, event: &NewEvent) -> Result<i64>;

    /// Close the open sleep if there is one, otherwise open a new sleep at `now`.
    ///
    /// Implementations must run the lookup and the write as one atomic unit.
    async fn toggle_sleep(&self, now: DateTime<Utc>) -> Result<SleepToggle>;

    /// Retrieve a specific event by id
    async fn get_event(&self, id: i64) -> Result<Option<Event>>;

    /// Most recent events first, by start time
    async fn list_recent(&self, limit: u32) -> Result<Vec<Event>>;

    /// Overwrite start time and data.
    /// Returns true if a row was changed, false if the id does not exist
    async fn update_event(&self, id: i64, start_time: DateTime<Utc>, data: &Map<String, Value>) -> Result<bool>;

    /// Returns true if the event was found and deleted, false otherwise
    async fn delete_event(&self, id: i64) -> Result<bool>;

    /// Whether a SLEEP event without end time exists
    async fn has_open_sleep(&self) -> Result<bool>;

    /// Whether any event of the given type starts within `since..=until`
    async fn has_event_between(
        &self,
        event_type: &EventType,
        since: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> Result<bool>;
}

/// Trait defining the interface for storage connections
///
/// Provides factory methods for repositories so the domain layer never sees
/// the concrete backend.
pub trait Connection: Send + Sync + Clone {
    /// The type of EventStorage this connection creates
    type EventRepository: EventStorage + Clone;

    /// Create a new event repository for this connection
    fn create_event_repository(&self) -> Self::EventRepository;
}
