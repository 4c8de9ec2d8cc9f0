//! Character registry: the `CharacterRepository` seam and its in-memory store.

pub mod repository;
pub mod store;
