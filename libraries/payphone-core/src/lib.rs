//! PayPhone Core
//!
//! Platform-agnostic types, traits, and error handling for the PayPhone
//! booth.
//!
//! This crate defines:
//! - **Domain Types**: `Recording`, `AudioBuffer`, `AudioFormat`, `SampleRate`
//! - **Core Traits**: `AudioDecoder`, `AudioOutput`, `PlaybackHandle`, `AudioEffect`
//! - **Error Handling**: Unified `PayphoneError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use payphone_core::Recording;
//!
//! let recording = Recording::new(vec![0u8; 16], "audio/wav", "voicemail.wav");
//! assert!(recording.is_audio());
//! assert_eq!(recording.len(), 16);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use error::{PayphoneError, Result};
pub use traits::{AudioDecoder, AudioEffect, AudioOutput, PlaybackHandle};
pub use types::{AudioBuffer, AudioFormat, Recording, SampleRate};
