//! The payphone booth: coin-operated audio enhancement.
//!
//! Callers insert audio recordings into the booth; each insertion deposits
//! a quarter. Once the balance reaches fifty cents the booth can place a
//! call: the recording is decoded, pushed through a fixed call-quality
//! filter chain, played through the speaker, and a copy is published to the
//! enhanced player slot.
//!
//! # Example
//!
//! ```no_run
//! use payphone_booth::{Booth, DisplayPanel};
//! use payphone_core::Recording;
//!
//! let mut booth = Booth::new();
//! booth.insert_recording(Recording::new(vec![0u8; 4], "audio/wav", "a.wav"));
//! booth.insert_recording(Recording::new(vec![0u8; 4], "audio/wav", "b.wav"));
//!
//! booth.enhance();
//!
//! let panel = DisplayPanel::render(&booth);
//! println!("{} {}", panel.status, panel.coin_display);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod booth;
pub mod coins;
pub mod display;
pub mod error;
pub mod events;
pub mod session;

pub use booth::{Booth, BoothPhase};
pub use coins::{CoinBalance, CALL_THRESHOLD_CENTS, QUARTER_CENTS};
pub use display::DisplayPanel;
pub use error::{BoothError, Result};
pub use events::BoothEvent;
pub use session::AudioSession;
