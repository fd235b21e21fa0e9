// Repository modules
pub mod event_repository;

// Re-export repository types
pub use event_repository::EventRepository;
