use thiserror::Error;

#[derive(Error, Debug)]
pub enum AreaCheckError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("JSON serialization error: {0}")]
    JsonSerialization(#[from] serde_json::Error),

    #[error("Request timeout after {0}ms")]
    Timeout(u64),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Server rejected request: {0}")]
    Rejected(String),
}

pub type Result<T> = std::result::Result<T, AreaCheckError>;
