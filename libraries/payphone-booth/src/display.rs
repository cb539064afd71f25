/// The booth display panel
///
/// A pure projection of booth state into the strings and flags a frontend
/// renders. Rendering never mutates the booth.
use crate::booth::{Booth, BoothPhase};
use serde::{Deserialize, Serialize};

/// Signal meter with a recording inserted
const SIGNAL_CONNECTED: &str = "\u{25ae}\u{25ae}\u{25ae}\u{25ae}\u{25af}";

/// Signal meter with no recording
const SIGNAL_EMPTY: &str = "\u{25af}\u{25af}\u{25af}\u{25af}\u{25af}";

/// A rendered snapshot of the booth panel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayPanel {
    /// Status line shown above the meter
    pub status: String,
    /// Five-segment signal meter; binary, not proportional
    pub signal: String,
    /// Dollar-formatted coin balance
    pub coin_display: String,
    /// Whether the enhance button is pressable
    pub enhance_enabled: bool,
    /// Error banner text, if one is posted
    pub error_banner: Option<String>,
    /// Name bound to the original player slot
    pub original_player: Option<String>,
    /// Name bound to the enhanced player slot
    pub enhanced_player: Option<String>,
}

/// Status line for a given phase and line state
fn status_line(phase: BoothPhase, has_recording: bool) -> &'static str {
    match (phase, has_recording) {
        (BoothPhase::Processing, _) => "CONNECTING...",
        (BoothPhase::Idle, true) => "READY",
        (BoothPhase::Idle, false) => "WAITING",
    }
}

impl DisplayPanel {
    /// Render the panel from the current booth state
    pub fn render(booth: &Booth) -> Self {
        let status = status_line(booth.phase(), booth.recording().is_some());

        let signal = if booth.recording().is_some() {
            SIGNAL_CONNECTED
        } else {
            SIGNAL_EMPTY
        };

        Self {
            status: status.to_string(),
            signal: signal.to_string(),
            coin_display: booth.coins().display(),
            enhance_enabled: booth.can_enhance(),
            error_banner: booth.error_message().map(String::from),
            original_player: booth.recording().map(|r| r.name().to_string()),
            enhanced_player: booth.enhanced().map(|r| r.name().to_string()),
        }
    }
}
