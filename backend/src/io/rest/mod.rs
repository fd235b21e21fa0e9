//! # REST API Interface Layer
//!
//! HTTP endpoints of the baby tracker. Handlers deserialize the shared DTOs,
//! map them onto domain commands, and turn domain errors into status codes
//! through [`ApiError`]. Each handler logs its request line.

pub mod error;
pub mod event_apis;
pub mod health_apis;
pub mod logging_apis;
pub mod mappers;
pub mod page_apis;

pub use error::ApiError;
pub use event_apis::*;
pub use health_apis::*;
pub use logging_apis::*;
pub use page_apis::index;
