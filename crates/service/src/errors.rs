use models::errors::ModelError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("{0}")]
    NotFound(String),
    #[error("storage error: {0}")]
    Storage(String),
}

impl ServiceError {
    pub fn not_found(entity: &str) -> Self { Self::NotFound(format!("{} not found", entity)) }
}

impl From<ModelError> for ServiceError {
    fn from(e: ModelError) -> Self {
        match e {
            ModelError::Validation(msg) => Self::Validation(msg),
        }
    }
}

/// Reasons an inline image could not be stored. Always recovered by the caller.
#[derive(Debug, Error)]
pub enum ImageError {
    #[error("image is not a string")]
    NotAString,
    #[error("data URI has no ',' separated payload")]
    MissingPayload,
    #[error("invalid base64 payload: {0}")]
    Decode(#[from] base64::DecodeError),
    #[error("cannot write image: {0}")]
    Io(#[from] std::io::Error),
}
