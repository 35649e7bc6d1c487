use thiserror::Error;

#[derive(Debug, Error)]
pub enum EaselError {
    #[error("Geometry error: {0}")]
    Geometry(String),

    #[error("Partition error: {0}")]
    Partition(String),

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    #[error("Out of range: {0}")]
    OutOfRange(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, EaselError>;
