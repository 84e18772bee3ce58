use thiserror::Error;

use crate::operation::types::{Field, MetaOperation};

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    #[error("Operation {operation} is missing required field '{field}'")]
    MissingField {
        operation: MetaOperation,
        field: Field,
    },

    #[error("Unsupported platform: {0}")]
    UnsupportedPlatform(String),

    #[error("Invalid box: {0}")]
    InvalidBox(String),

    #[error("Unknown key: {0}")]
    UnknownKey(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Automation backend error: {0}")]
    Backend(String),

    #[error("Clipboard error: {0}")]
    Clipboard(String),

    #[error("Fail-safe triggered: cursor parked at ({x}, {y})")]
    FailSafeTriggered { x: i32, y: i32 },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialize error: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSer(#[from] toml::ser::Error),
}

pub type DispatchResult<T> = Result<T, DispatchError>;
