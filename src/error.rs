use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, VeilError>;

#[derive(Debug, Error)]
pub enum VeilError {
    #[error("config error: {0}")]
    Config(String),

    #[error("missing config: {0}")]
    MissingConfig(String),

    #[error("unknown entity: {0}")]
    UnknownEntity(String),

    #[error("invalid entity kind: {0}")]
    InvalidEntityKind(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
