/// The payphone booth state machine
///
/// Holds the inserted recording, the coin balance, the current phase, and
/// the last published enhanced copy. All mutation goes through
/// [`Booth::insert_recording`] and [`Booth::enhance`]; every change emits a
/// [`BoothEvent`](crate::BoothEvent).
use crate::coins::CoinBalance;
use crate::error::BoothError;
use crate::events::BoothEvent;
use crate::session::AudioSession;
use payphone_core::{PlaybackHandle, Recording};
use serde::{Deserialize, Serialize};

/// The two phases of the booth
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoothPhase {
    /// Waiting for coins or a recording
    #[default]
    Idle,
    /// An enhance cycle is running
    Processing,
}

/// The booth itself
pub struct Booth {
    session: AudioSession,
    phase: BoothPhase,
    coins: CoinBalance,
    recording: Option<Recording>,
    enhanced: Option<Recording>,
    error: Option<String>,
    playback: Option<Box<dyn PlaybackHandle>>,
    events: Vec<BoothEvent>,
}

impl Booth {
    /// Create a booth backed by the default audio session
    pub fn new() -> Self {
        Self::with_session(AudioSession::new())
    }

    /// Create a booth backed by an explicit session
    pub fn with_session(session: AudioSession) -> Self {
        Self {
            session,
            phase: BoothPhase::Idle,
            coins: CoinBalance::new(),
            recording: None,
            enhanced: None,
            error: None,
            playback: None,
            events: Vec::new(),
        }
    }

    /// Insert a recording into the booth
    ///
    /// Non-audio items are rejected with an error message and change
    /// nothing else. An accepted recording replaces any previous one,
    /// clears the error banner, and deposits one quarter.
    pub fn insert_recording(&mut self, recording: Recording) {
        if !recording.is_audio() {
            tracing::warn!(
                media_type = recording.media_type(),
                "Rejected non-audio insertion"
            );
            self.events.push(BoothEvent::RecordingRejected {
                media_type: recording.media_type().to_string(),
            });
            self.post_error(BoothError::NotAudio);
            return;
        }

        tracing::info!(name = recording.name(), "Recording inserted");
        self.error = None;
        self.events.push(BoothEvent::RecordingInserted {
            name: recording.name().to_string(),
        });
        self.recording = Some(recording);

        let cents = self.coins.insert_quarter();
        self.events.push(BoothEvent::CoinsChanged { cents });
    }

    /// Run one enhance cycle: charge the balance, decode, process, play,
    /// and publish the enhanced copy
    ///
    /// Without a recording this is a no-op. With insufficient credit it
    /// posts the quarters message and changes nothing else. The coins are
    /// consumed when the call connects, before decoding, and are not
    /// refunded on failure. The booth always returns to idle.
    pub fn enhance(&mut self) {
        let Some(recording) = self.recording.clone() else {
            return;
        };

        if !self.coins.is_sufficient() {
            tracing::debug!(cents = self.coins.cents(), "Not enough credit to call");
            self.post_error(BoothError::InsufficientCredit);
            return;
        }

        self.error = None;
        self.set_phase(BoothPhase::Processing);
        self.coins.reset();
        self.events.push(BoothEvent::CoinsChanged { cents: 0 });

        match self.session.enhance_and_play(&recording) {
            Ok(handle) => {
                // Fire and forget: keep the handle so playback can outlive
                // the cycle and still be stopped or observed
                self.playback = Some(handle);
                self.enhanced = Some(recording.enhanced_copy());
                self.events.push(BoothEvent::EnhanceCompleted {
                    name: recording.name().to_string(),
                });
                tracing::info!(name = recording.name(), "Call connected");
            }
            Err(e) => {
                tracing::error!(error = %e, "Call failed");
                // A previously published copy stays on the enhanced player;
                // a failed call only posts the banner
                self.post_error(BoothError::ConnectionFailed(e.to_string()));
            }
        }

        self.set_phase(BoothPhase::Idle);
    }

    /// Stop the in-flight playback, if any
    pub fn hang_up(&mut self) {
        if let Some(handle) = self.playback.as_mut() {
            handle.stop();
        }
        self.playback = None;
    }

    /// Whether the enhance action is currently available
    pub fn can_enhance(&self) -> bool {
        self.recording.is_some() && self.phase == BoothPhase::Idle && self.coins.is_sufficient()
    }

    /// Current phase
    pub fn phase(&self) -> BoothPhase {
        self.phase
    }

    /// Current coin balance
    pub fn coins(&self) -> &CoinBalance {
        &self.coins
    }

    /// The inserted recording, if any
    pub fn recording(&self) -> Option<&Recording> {
        self.recording.as_ref()
    }

    /// The last published enhanced copy, if any
    pub fn enhanced(&self) -> Option<&Recording> {
        self.enhanced.as_ref()
    }

    /// The error banner currently on the display, if any
    pub fn error_message(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Whether the last started playback is still running
    pub fn is_playing(&self) -> bool {
        self.playback.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Drain the accumulated events
    pub fn take_events(&mut self) -> Vec<BoothEvent> {
        std::mem::take(&mut self.events)
    }

    fn set_phase(&mut self, phase: BoothPhase) {
        if self.phase != phase {
            self.phase = phase;
            self.events.push(BoothEvent::PhaseChanged { phase });
        }
    }

    fn post_error(&mut self, error: BoothError) {
        let message = error.user_message();
        self.events.push(BoothEvent::Error {
            message: message.clone(),
        });
        self.error = Some(message);
    }
}

impl Default for Booth {
    fn default() -> Self {
        Self::new()
    }
}
