/// Booth error types
///
/// The display strings here are the exact messages the booth panel shows,
/// so the `Display` impls double as the user-facing copy.
use thiserror::Error;

/// Errors surfaced on the booth display
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BoothError {
    /// An inserted recording was not audio
    #[error("Please insert an audio recording")]
    NotAudio,

    /// Enhance was requested without enough credit
    #[error("Please insert more quarters (upload more files)")]
    InsufficientCredit,

    /// Decode or playback failed mid-call
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
}

impl BoothError {
    /// The message shown on the booth display panel
    pub fn user_message(&self) -> String {
        self.to_string()
    }
}

/// Result type for booth operations
pub type Result<T> = std::result::Result<T, BoothError>;
