/// Core error types for PayPhone
use thiserror::Error;

/// Result type alias using `PayphoneError`
pub type Result<T> = std::result::Result<T, PayphoneError>;

/// Core error type for PayPhone
#[derive(Error, Debug)]
pub enum PayphoneError {
    /// Audio decoding errors
    #[error("Decode error: {0}")]
    Decode(String),

    /// Audio playback errors
    #[error("Playback error: {0}")]
    Playback(String),

    /// Declared media type is not an audio type
    #[error("Not an audio media type: {0}")]
    NotAudio(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    /// Other errors
    #[error("{0}")]
    Other(String),
}

impl PayphoneError {
    /// Create a decode error
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Create a playback error
    pub fn playback(msg: impl Into<String>) -> Self {
        Self::Playback(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages() {
        let err = PayphoneError::decode("bad header");
        assert_eq!(err.to_string(), "Decode error: bad header");

        let err = PayphoneError::NotAudio("text/plain".to_string());
        assert_eq!(err.to_string(), "Not an audio media type: text/plain");
    }
}
