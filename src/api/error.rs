/// Error types for fetching the inventory
use thiserror::Error;

/// Why a single fetch attempt failed. All variants count as a failed attempt
/// for retry purposes; they are kept apart so logs say what went wrong.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FetchError {
    /// Connection refused, DNS failure, timeout, broken body stream
    #[error("Request failed: {0}")]
    Transport(String),

    /// Response arrived with a status outside 2xx
    #[error("HTTP error: {0}")]
    Status(u16),

    /// Body was not a JSON array of inventory objects
    #[error("Malformed payload: {0}")]
    Payload(String),
}

impl FetchError {
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::Transport(_) => "transport",
            FetchError::Status(_) => "status",
            FetchError::Payload(_) => "payload",
        }
    }
}
