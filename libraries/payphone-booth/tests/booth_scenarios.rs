//! End-to-end booth scenarios against mock audio components

use payphone_booth::{AudioSession, Booth, BoothEvent, BoothPhase, DisplayPanel};
use payphone_core::{
    AudioBuffer, AudioDecoder, AudioFormat, AudioOutput, PayphoneError, PlaybackHandle, Recording,
    SampleRate,
};
use proptest::prelude::*;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

/// Decoder that produces a short fixed buffer, or fails on demand
struct MockDecoder {
    fail: Arc<AtomicBool>,
}

impl AudioDecoder for MockDecoder {
    fn decode(&mut self, recording: &Recording) -> payphone_core::Result<AudioBuffer> {
        if self.fail.load(Ordering::Relaxed) {
            return Err(PayphoneError::decode(format!(
                "unreadable recording: {}",
                recording.name()
            )));
        }
        let format = AudioFormat::stereo_f32(SampleRate::CD_QUALITY);
        Ok(AudioBuffer::new(vec![0.1; 4410 * 2], format))
    }

    fn supports_media_type(&self, media_type: &str) -> bool {
        media_type.starts_with("audio/")
    }
}

struct MockHandle {
    finished: Arc<AtomicBool>,
}

impl PlaybackHandle for MockHandle {
    fn is_finished(&self) -> bool {
        self.finished.load(Ordering::Relaxed)
    }

    fn stop(&mut self) {
        self.finished.store(true, Ordering::Relaxed);
    }
}

/// Output that counts play calls instead of touching a device
struct MockOutput {
    plays: Arc<AtomicUsize>,
}

impl AudioOutput for MockOutput {
    fn play(&mut self, _buffer: &AudioBuffer) -> payphone_core::Result<Box<dyn PlaybackHandle>> {
        self.plays.fetch_add(1, Ordering::Relaxed);
        Ok(Box::new(MockHandle {
            finished: Arc::new(AtomicBool::new(false)),
        }))
    }
}

fn flaky_booth() -> (Booth, Arc<AtomicUsize>, Arc<AtomicBool>) {
    let plays = Arc::new(AtomicUsize::new(0));
    let fail = Arc::new(AtomicBool::new(false));
    let plays_for_factory = Arc::clone(&plays);
    let session = AudioSession::with_components(
        Box::new(MockDecoder {
            fail: Arc::clone(&fail),
        }),
        Box::new(move || {
            Ok(Box::new(MockOutput {
                plays: Arc::clone(&plays_for_factory),
            }) as Box<dyn AudioOutput>)
        }),
    );
    (Booth::with_session(session), plays, fail)
}

fn mock_booth(fail_decode: bool) -> (Booth, Arc<AtomicUsize>) {
    let (booth, plays, fail) = flaky_booth();
    fail.store(fail_decode, Ordering::Relaxed);
    (booth, plays)
}

fn wav(name: &str) -> Recording {
    Recording::new(vec![0u8; 64], "audio/wav", name)
}

#[test]
fn inserting_audio_credits_a_quarter() {
    let (mut booth, _) = mock_booth(false);
    booth.insert_recording(wav("voicemail.wav"));

    assert_eq!(booth.coins().cents(), 25);
    assert_eq!(booth.recording().map(Recording::name), Some("voicemail.wav"));
    assert!(booth.error_message().is_none());

    let events = booth.take_events();
    assert!(events.contains(&BoothEvent::RecordingInserted {
        name: "voicemail.wav".into()
    }));
    assert!(events.contains(&BoothEvent::CoinsChanged { cents: 25 }));
}

#[test]
fn non_audio_is_rejected_and_nothing_else_changes() {
    let (mut booth, _) = mock_booth(false);
    booth.insert_recording(wav("keep.wav"));
    booth.take_events();

    booth.insert_recording(Recording::new(vec![0u8; 64], "video/mp4", "clip.mp4"));

    assert_eq!(
        booth.error_message(),
        Some("Please insert an audio recording")
    );
    // Prior recording and balance are untouched
    assert_eq!(booth.recording().map(Recording::name), Some("keep.wav"));
    assert_eq!(booth.coins().cents(), 25);

    let events = booth.take_events();
    assert!(events.contains(&BoothEvent::RecordingRejected {
        media_type: "video/mp4".into()
    }));
}

#[test]
fn accepted_recording_clears_the_error_banner() {
    let (mut booth, _) = mock_booth(false);
    booth.insert_recording(Recording::new(vec![0u8; 64], "text/plain", "notes.txt"));
    assert!(booth.error_message().is_some());

    booth.insert_recording(wav("song.wav"));
    assert!(booth.error_message().is_none());
}

#[test]
fn new_recording_replaces_the_old_one() {
    let (mut booth, _) = mock_booth(false);
    booth.insert_recording(wav("first.wav"));
    booth.insert_recording(wav("second.wav"));

    assert_eq!(booth.recording().map(Recording::name), Some("second.wav"));
    assert_eq!(booth.coins().cents(), 50);
}

#[test]
fn enhance_without_a_recording_is_a_no_op() {
    let (mut booth, plays) = mock_booth(false);
    booth.enhance();

    assert_eq!(booth.phase(), BoothPhase::Idle);
    assert!(booth.error_message().is_none());
    assert_eq!(plays.load(Ordering::Relaxed), 0);
    assert!(booth.take_events().is_empty());
}

#[test]
fn enhance_with_one_quarter_asks_for_more() {
    let (mut booth, plays) = mock_booth(false);
    booth.insert_recording(wav("short.wav"));

    booth.enhance();

    assert_eq!(
        booth.error_message(),
        Some("Please insert more quarters (upload more files)")
    );
    // Balance is untouched and no call was placed
    assert_eq!(booth.coins().cents(), 25);
    assert_eq!(plays.load(Ordering::Relaxed), 0);
    assert!(booth.enhanced().is_none());
}

#[test]
fn successful_enhance_plays_and_publishes() {
    let (mut booth, plays) = mock_booth(false);
    booth.insert_recording(wav("a.wav"));
    booth.insert_recording(wav("call.wav"));
    booth.take_events();

    assert!(booth.can_enhance());
    booth.enhance();

    assert_eq!(plays.load(Ordering::Relaxed), 1);
    assert_eq!(booth.coins().cents(), 0, "the call consumes the balance");
    assert_eq!(booth.phase(), BoothPhase::Idle);
    assert!(booth.error_message().is_none());
    assert!(booth.is_playing(), "playback outlives the enhance cycle");

    // The published copy is byte-identical to the original
    let original = booth.recording().cloned().unwrap();
    let enhanced = booth.enhanced().cloned().unwrap();
    assert_eq!(enhanced.content(), original.content());
    assert_eq!(enhanced.media_type(), original.media_type());

    let events = booth.take_events();
    assert!(events.contains(&BoothEvent::PhaseChanged {
        phase: BoothPhase::Processing
    }));
    assert!(events.contains(&BoothEvent::CoinsChanged { cents: 0 }));
    assert!(events.contains(&BoothEvent::EnhanceCompleted {
        name: "call.wav".into()
    }));
    assert!(events.contains(&BoothEvent::PhaseChanged {
        phase: BoothPhase::Idle
    }));
}

#[test]
fn decode_failure_reports_a_dropped_connection() {
    let (mut booth, plays) = mock_booth(true);
    booth.insert_recording(wav("a.wav"));
    booth.insert_recording(wav("broken.wav"));

    booth.enhance();

    let banner = booth.error_message().unwrap();
    assert!(
        banner.starts_with("Connection failed: "),
        "unexpected banner: {banner}"
    );
    assert_eq!(booth.phase(), BoothPhase::Idle);
    assert!(booth.enhanced().is_none());
    assert_eq!(plays.load(Ordering::Relaxed), 0);
    // No refunds
    assert_eq!(booth.coins().cents(), 0);
}

#[test]
fn failed_call_keeps_the_previous_enhanced_copy() {
    let (mut booth, _, fail) = flaky_booth();
    booth.insert_recording(wav("a.wav"));
    booth.insert_recording(wav("good.wav"));
    booth.enhance();
    assert_eq!(booth.enhanced().map(Recording::name), Some("good.wav"));

    // The line goes bad for the next call
    fail.store(true, Ordering::Relaxed);
    booth.insert_recording(wav("c.wav"));
    booth.insert_recording(wav("bad.wav"));
    booth.enhance();

    assert!(booth.error_message().is_some());
    // The earlier copy stays on the enhanced player
    assert_eq!(booth.enhanced().map(Recording::name), Some("good.wav"));
}

#[test]
fn failed_call_can_be_retried_after_more_quarters() {
    let (mut booth, _) = mock_booth(true);
    booth.insert_recording(wav("a.wav"));
    booth.insert_recording(wav("b.wav"));
    booth.enhance();
    assert!(booth.error_message().is_some());

    // Two fresh quarters re-arm the button; inserting clears the banner
    booth.insert_recording(wav("c.wav"));
    booth.insert_recording(wav("d.wav"));
    assert!(booth.error_message().is_none());
    assert!(booth.can_enhance());
}

#[test]
fn output_device_is_opened_lazily() {
    let (mut booth, plays) = mock_booth(false);
    booth.insert_recording(wav("a.wav"));
    booth.insert_recording(wav("b.wav"));

    // Nothing has touched the output yet
    assert_eq!(plays.load(Ordering::Relaxed), 0);

    booth.enhance();
    assert_eq!(plays.load(Ordering::Relaxed), 1);
}

#[test]
fn hang_up_stops_playback() {
    let (mut booth, _) = mock_booth(false);
    booth.insert_recording(wav("a.wav"));
    booth.insert_recording(wav("b.wav"));
    booth.enhance();
    assert!(booth.is_playing());

    booth.hang_up();
    assert!(!booth.is_playing());
}

#[test]
fn panel_shows_connecting_only_during_processing() {
    let (mut booth, _) = mock_booth(false);
    booth.insert_recording(wav("a.wav"));
    booth.insert_recording(wav("b.wav"));
    booth.enhance();

    // The cycle is synchronous, so by the time we render it is over
    let panel = DisplayPanel::render(&booth);
    assert_eq!(panel.status, "READY");
    assert_eq!(panel.enhanced_player.as_deref(), Some("b.wav"));
}

proptest! {
    #[test]
    fn balance_is_always_a_multiple_of_a_quarter(inserts in 0usize..40) {
        let (mut booth, _) = mock_booth(false);
        for i in 0..inserts {
            booth.insert_recording(wav(&format!("take-{i}.wav")));
        }
        prop_assert_eq!(booth.coins().cents(), inserts as u32 * 25);
        prop_assert_eq!(booth.can_enhance(), inserts >= 2);
    }
}
