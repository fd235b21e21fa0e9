use anyhow::{Context, Result};
use sqlx::{migrate::MigrateDatabase, Sqlite, SqlitePool};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;

use super::repositories::EventRepository;
use super::traits::Connection;

// The database URL for the production database
pub const DEFAULT_DATABASE_URL: &str = "sqlite:baby_tracker.db";

/// DbConnection manages database operations
#[derive(Clone)]
pub struct DbConnection {
    pool: Arc<SqlitePool>,
    /// Serializes the sleep toggle's check-then-act across every repository
    sleep_toggle_lock: Arc<Mutex<()>>,
}

impl DbConnection {
    /// Create a new database connection
    pub async fn new(url: &str) -> Result<Self> {
        // Create database if it doesn't exist
        if !Sqlite::database_exists(url).await.unwrap_or(false) {
            info!("Creating database at {}", url);
            Sqlite::create_database(url)
                .await
                .with_context(|| format!("Failed to create database {}", url))?;
        }

        let pool = SqlitePool::connect(url)
            .await
            .with_context(|| format!("Failed to connect to {}", url))?;

        Self::from_pool(pool).await
    }

    /// Initialize a private in-memory database.
    ///
    /// The pool is pinned to one connection that never expires; every
    /// SQLite `:memory:` connection would otherwise see its own empty database.
    #[cfg(test)]
    pub async fn init_test() -> Result<Self> {
        let pool = sqlx::sqlite::SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await?;

        Self::from_pool(pool).await
    }

    async fn from_pool(pool: SqlitePool) -> Result<Self> {
        Self::setup_schema(&pool).await?;

        Ok(Self {
            pool: Arc::new(pool),
            sleep_toggle_lock: Arc::new(Mutex::new(())),
        })
    }

    /// Get a reference to the connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub(crate) fn sleep_toggle_lock(&self) -> &Mutex<()> {
        &self.sleep_toggle_lock
    }

    /// Set up the required database schema
    async fn setup_schema(pool: &SqlitePool) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS events (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                type TEXT NOT NULL,
                startTime TEXT NOT NULL,
                endTime TEXT,
                note TEXT,
                data TEXT NOT NULL DEFAULT '{}'
            );
            "#,
        )
        .execute(pool)
        .await?;

        // Recent-activity listing
        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_events_start_time
            ON events(startTime DESC);
            "#,
        )
        .execute(pool)
        .await?;

        // Medicine-since-reset lookups
        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_events_type_start_time
            ON events(type, startTime);
            "#,
        )
        .execute(pool)
        .await?;

        // At most one sleep without an end time
        sqlx::query(
            r#"
            CREATE UNIQUE INDEX IF NOT EXISTS idx_events_open_sleep
            ON events(type)
            WHERE type = 'SLEEP' AND endTime IS NULL;
            "#,
        )
        .execute(pool)
        .await?;

        Ok(())
    }
}

impl Connection for DbConnection {
    type EventRepository = EventRepository;

    fn create_event_repository(&self) -> Self::EventRepository {
        EventRepository::new(self.clone())
    }
}
