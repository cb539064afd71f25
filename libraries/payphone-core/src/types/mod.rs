//! Core types for PayPhone

mod audio;
mod recording;

pub use audio::{AudioBuffer, AudioFormat, SampleRate};
pub use recording::Recording;
