//! # Domain Module
//!
//! Business logic of the baby tracker, independent of HTTP and of SQL.
//!
//! ## Module Organization
//!
//! - **event_service**: logging, sleep toggling, editing, deleting and listing
//!   events, and deriving the day status
//! - **day_period**: the reset-hour boundary behind "medicine given today"
//! - **activity_display**: formatting events for the activity list
//! - **clock**: injectable source of the current time
//! - **commands**: internal command/result types
//! - **models**: the `Event` entity and its timestamp/payload helpers
//!
//! ## Business Rules
//!
//! - At most one SLEEP event is open at any time; logging SLEEP toggles it
//! - Status flags are derived from the event history on every query
//! - Medicine counts as given from the dose until the next reset hour
//! - Editing touches only the start time and the payload
//! - Deleting or editing an unknown id is a no-op

pub mod activity_display;
pub mod clock;
pub mod commands;
pub mod day_period;
pub mod error;
pub mod event_service;
pub mod models;

pub use activity_display::*;
pub use clock::*;
pub use commands::*;
pub use error::EventError;
pub use event_service::*;
