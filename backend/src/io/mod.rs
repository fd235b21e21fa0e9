//! # IO Module
//!
//! Interface layer that exposes the domain over HTTP. Handlers translate
//! between the shared DTOs and domain commands and hold no business rules.

pub mod rest;

pub use rest::*;
