//! # Storage Module
//!
//! Persistence for the event log.
//!
//! ## Current Implementation
//!
//! - **Primary Storage**: SQLite through SQLx, one `events` table
//! - **Atomicity**: the sleep toggle runs in a single transaction behind an
//!   async mutex; a partial unique index backs the one-open-sleep rule
//! - **Timestamps**: stored as UTC ISO 8601 text so string order is time order
//!
//! ## Design Principles
//!
//! - **Repository Pattern**: the domain talks to `EventStorage`, not SQL
//! - **Testability**: `DbConnection::init_test` gives each test its own
//!   in-memory database

pub mod connection;
pub mod repositories;
pub mod traits;

// Re-export the main types that other modules need
pub use connection::{DbConnection, DEFAULT_DATABASE_URL};
pub use repositories::EventRepository;
pub use traits::{Connection, EventStorage};
