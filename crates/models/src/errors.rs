use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ModelError {
    #[error("invalid seed data: {0}")]
    Seed(String),
    #[error("seed record #{index}: {reason}")]
    SeedRecord { index: usize, reason: String },
}
