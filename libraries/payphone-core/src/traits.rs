/// Core traits for PayPhone
use crate::error::Result;
use crate::types::{AudioBuffer, Recording};

/// Audio decoder trait
///
/// Implementers decode an in-memory `Recording` into interleaved stereo
/// f32 PCM.
pub trait AudioDecoder: Send {
    /// Decode the full recording into an `AudioBuffer`
    ///
    /// # Errors
    /// Returns an error if the content cannot be probed or decoded
    fn decode(&mut self, recording: &Recording) -> Result<AudioBuffer>;

    /// Check whether the decoder recognizes the declared media type
    fn supports_media_type(&self, media_type: &str) -> bool;
}

/// Handle to an in-flight one-shot playback
///
/// Device playback is started fire-and-forget; this handle is the explicit
/// completion/cancellation surface for it. The booth never awaits
/// completion, but tests and teardown paths can.
pub trait PlaybackHandle: Send {
    /// Whether playback has reached the end of the buffer (or was stopped)
    fn is_finished(&self) -> bool;

    /// Stop playback early and release the stream
    fn stop(&mut self);
}

/// Audio output trait
///
/// Implementers play a decoded buffer once through an output device.
pub trait AudioOutput: Send {
    /// Start one-shot playback of the buffer
    ///
    /// Returns immediately with a handle to the in-flight playback.
    ///
    /// # Errors
    /// Returns an error if the stream cannot be built or started
    fn play(&mut self, buffer: &AudioBuffer) -> Result<Box<dyn PlaybackHandle>>;
}

/// Audio effect trait
///
/// Implementers process audio buffers in-place.
///
/// **CRITICAL**: No allocations allowed in `process` — it may run on the
/// audio path.
pub trait AudioEffect: Send {
    /// Process interleaved stereo samples in-place
    ///
    /// # Parameters
    /// - `buffer`: Interleaved stereo samples (L, R, L, R, ...)
    /// - `sample_rate`: Sample rate in Hz
    fn process(&mut self, buffer: &mut [f32], sample_rate: u32);

    /// Reset the effect state
    fn reset(&mut self);

    /// Enable/disable the effect
    fn set_enabled(&mut self, enabled: bool);

    /// Check if the effect is enabled
    fn is_enabled(&self) -> bool;

    /// Get effect name (for debugging)
    fn name(&self) -> &str;
}
