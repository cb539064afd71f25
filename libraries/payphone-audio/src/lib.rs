//! PayPhone Audio
//!
//! Audio decoding, effects, and device output for the PayPhone booth.
//!
//! This crate provides:
//! - Decoding of in-memory recordings via Symphonia (MP3, FLAC, OGG, WAV, AAC, OPUS)
//! - The fixed call-enhancement effect chain (low/high shelving EQ, dynamic
//!   range compressor)
//! - One-shot device playback via CPAL, with rubato resampling on sample
//!   rate mismatch
//!
//! # Example: Decoding a Recording
//!
//! ```rust,no_run
//! use payphone_audio::SymphoniaDecoder;
//! use payphone_core::{AudioDecoder, Recording};
//!
//! # fn example(bytes: Vec<u8>) -> Result<(), Box<dyn std::error::Error>> {
//! let recording = Recording::new(bytes, "audio/wav", "call.wav");
//! let mut decoder = SymphoniaDecoder::new();
//! let buffer = decoder.decode(&recording)?;
//!
//! println!("Decoded {} frames at {} Hz", buffer.frames(), buffer.format.sample_rate.as_hz());
//! # Ok(())
//! # }
//! ```
//!
//! # Example: The Enhancement Chain
//!
//! ```rust
//! use payphone_audio::{enhancement_chain, EnhancementSettings};
//!
//! let mut chain = enhancement_chain(&EnhancementSettings::default());
//!
//! let mut buffer = vec![0.0f32; 1024]; // interleaved stereo
//! chain.process(&mut buffer, 44100);
//! ```

mod decoder;
pub mod effects;
mod enhance;
mod error;
mod output;

pub use decoder::SymphoniaDecoder;
pub use effects::EffectChain;
pub use enhance::{enhancement_chain, EnhancementSettings};
pub use error::{AudioError, Result};
pub use output::CpalOutput;
