use thiserror::Error;

#[derive(Error, Debug)]
pub enum ShellError {
    #[error("Invalid parameter '{0}': {1}")]
    InvalidParameter(String, String),

    #[error("Item '{0}' not found")]
    ItemNotFound(String),

    #[error("Command '{0}' not found")]
    CommandNotFound(String),

    #[error("Command '{0}' has no continuation named '{1}'")]
    UnknownContinuation(String, String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, ShellError>;

impl From<serde_json::Error> for ShellError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(err.to_string())
    }
}
