use std::io;
use std::path::PathBuf;

/// Errors that can occur during a selfrunner invocation
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("File: {} not found", .0.display())]
    TestListNotFound(PathBuf),

    #[error("IO error: {0}")]
    IoError(#[from] io::Error),

    #[error("Filter syntax error at offset {offset}: {message}")]
    FilterSyntax { offset: usize, message: String },

    #[error("Engine error: {0}")]
    EngineError(String),

    #[error("Queue error: {0}")]
    QueueError(#[from] redis::RedisError),

    #[error("XML error: {0}")]
    XmlError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for selfrunner operations
pub type Result<T> = std::result::Result<T, Error>;
