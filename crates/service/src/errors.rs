use models::{errors::ModelError, ValidationErrors};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation error: {0}")]
    Validation(ValidationErrors),
    #[error("not found: character {0}")]
    NotFound(i64),
    #[error("seed error: {0}")]
    Seed(#[from] ModelError),
    #[error("io error: {0}")]
    Io(String),
    #[error("character id space exhausted")]
    IdsExhausted,
}

impl From<ValidationErrors> for ServiceError {
    fn from(errors: ValidationErrors) -> Self {
        Self::Validation(errors)
    }
}
