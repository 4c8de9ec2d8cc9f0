use async_trait::async_trait;
use models::{Character, CharacterInput};

use crate::errors::ServiceError;

/// Trait abstraction for character storage (CRUD over a single resource).
#[async_trait]
pub trait CharacterRepository: Send + Sync {
    /// All characters, ascending by id.
    async fn list(&self) -> Vec<Character>;
    async fn get(&self, id: i64) -> Result<Character, ServiceError>;
    async fn create(&self, input: CharacterInput) -> Result<Character, ServiceError>;
    /// Full replace; the stored id is always `id`.
    async fn update(&self, id: i64, input: CharacterInput) -> Result<Character, ServiceError>;
    async fn delete(&self, id: i64) -> Result<(), ServiceError>;
}
