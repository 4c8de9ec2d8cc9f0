//! Service layer for the Marvel characters API.
//! - Owns the in-memory character registry and its id counter.
//! - Reuses the entity and validation rules from the `models` crate.
//! - Exposes a repository trait so handlers do not depend on the concrete store.

pub mod errors;
pub mod characters;

pub use characters::{repository::CharacterRepository, store::CharacterStore};
