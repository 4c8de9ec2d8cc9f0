//! Domain types for the Marvel characters API.
//! - `character`: the stored entity plus the input schema and its validation rules.
//! - `seed`: parsing of the loosely-typed seed dataset.

pub mod errors;
pub mod character;
pub mod seed;

pub use character::{Character, CharacterInput, ValidationErrors};
