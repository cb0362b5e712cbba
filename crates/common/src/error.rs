use thiserror::Error;

#[derive(Debug, Error)]
pub enum KanonError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type KanonResult<T> = Result<T, KanonError>;
