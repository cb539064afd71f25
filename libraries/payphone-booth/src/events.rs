/// Booth event stream
///
/// Every state change emits an event into the booth's internal log; a
/// frontend drains the log to mirror the booth's state.
use crate::booth::BoothPhase;
use serde::{Deserialize, Serialize};

/// Events emitted by the booth
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BoothEvent {
    /// A recording was accepted into the booth
    RecordingInserted {
        /// Name of the recording
        name: String,
    },
    /// A non-audio insertion was rejected
    RecordingRejected {
        /// Media type of the rejected item
        media_type: String,
    },
    /// The coin balance changed
    CoinsChanged {
        /// New balance in cents
        cents: u32,
    },
    /// The booth moved between idle and processing
    PhaseChanged {
        /// The new phase
        phase: BoothPhase,
    },
    /// An enhance cycle completed and published its output
    EnhanceCompleted {
        /// Name of the enhanced recording
        name: String,
    },
    /// An error message was posted to the display
    Error {
        /// The message shown to the caller
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_serialize_as_tagged_json() {
        let event = BoothEvent::CoinsChanged { cents: 50 };
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(json, r#"{"type":"coins_changed","cents":50}"#);
    }

    #[test]
    fn phase_change_round_trips() {
        let event = BoothEvent::PhaseChanged {
            phase: BoothPhase::Processing,
        };
        let json = serde_json::to_string(&event).unwrap();
        let back: BoothEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }
}
