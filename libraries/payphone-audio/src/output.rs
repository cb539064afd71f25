/// CPAL-based audio output with a dedicated audio thread
///
/// The CPAL `Stream` is not `Send` on every platform, so a dedicated thread
/// owns it and the rest of the system talks to that thread over a channel.
use crate::error::{AudioError, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, Stream, StreamConfig};
use crossbeam_channel::{bounded, Receiver, Sender};
use payphone_core::{AudioBuffer, AudioOutput, PlaybackHandle};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

/// Commands sent to the audio thread
enum AudioCommand {
    /// Start one-shot playback of a new buffer
    Play {
        samples: Arc<Vec<f32>>,
        finished: Arc<AtomicBool>,
    },
    /// Stop the current playback
    Stop,
    /// Shutdown the audio thread
    Shutdown,
}

/// Shared state between the command thread and the audio callback
struct AudioState {
    /// Audio samples (interleaved stereo f32) - Arc for lock-free reading
    buffer: Mutex<Arc<Vec<f32>>>,
    /// Current playback position (in samples, not frames)
    position: AtomicUsize,
    /// Completion flag of the in-flight playback
    finished: Mutex<Arc<AtomicBool>>,
}

impl AudioState {
    fn new() -> Self {
        Self {
            buffer: Mutex::new(Arc::new(Vec::new())),
            position: AtomicUsize::new(0),
            finished: Mutex::new(Arc::new(AtomicBool::new(true))),
        }
    }
}

/// Handle to a one-shot playback started on a `CpalOutput`
struct CpalPlaybackHandle {
    finished: Arc<AtomicBool>,
    command_tx: Sender<AudioCommand>,
}

impl PlaybackHandle for CpalPlaybackHandle {
    fn is_finished(&self) -> bool {
        self.finished.load(Ordering::Relaxed)
    }

    fn stop(&mut self) {
        // The audio thread marks the flag; setting it here too covers the
        // case where the thread is already gone
        let _ = self.command_tx.send(AudioCommand::Stop);
        self.finished.store(true, Ordering::Relaxed);
    }
}

/// CPAL audio output
///
/// Plays decoded buffers once through the default output device. Buffers at
/// a different sample rate than the device are resampled with rubato before
/// playback. Dropping the output shuts the audio thread down and releases
/// the device.
pub struct CpalOutput {
    /// Channel to send commands to the audio thread
    command_tx: Sender<AudioCommand>,
    /// Sample rate of the output device
    sample_rate: u32,
    /// Handle to the audio thread (joined on drop)
    audio_thread: Option<JoinHandle<()>>,
}

impl CpalOutput {
    /// Create a new CPAL output using the default audio device
    ///
    /// # Errors
    /// Returns an error if no audio device is found or configuration fails
    pub fn new() -> Result<Self> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or(AudioError::DeviceNotFound)?;

        let config = device
            .default_output_config()
            .map_err(|e| AudioError::StreamBuild(e.to_string()))?;

        let sample_rate = config.sample_rate();
        let config = config.config();

        let state = Arc::new(AudioState::new());
        let (command_tx, command_rx) = bounded::<AudioCommand>(8);

        let audio_thread = thread::spawn(move || {
            Self::audio_thread_run(device, config, state, command_rx);
        });

        Ok(Self {
            command_tx,
            sample_rate,
            audio_thread: Some(audio_thread),
        })
    }

    /// Device sample rate in Hz
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Audio thread main loop: owns the CPAL stream, processes commands
    fn audio_thread_run(
        device: Device,
        config: StreamConfig,
        state: Arc<AudioState>,
        command_rx: Receiver<AudioCommand>,
    ) {
        let mut stream: Option<Stream> = None;

        while let Ok(cmd) = command_rx.recv() {
            match cmd {
                AudioCommand::Play { samples, finished } => {
                    // Tear down any existing stream first
                    if let Some(s) = stream.take() {
                        drop(s);
                    }

                    {
                        let mut buffer_guard = state.buffer.lock().unwrap();
                        *buffer_guard = samples;
                    }
                    state.position.store(0, Ordering::Relaxed);
                    {
                        let mut finished_guard = state.finished.lock().unwrap();
                        // Abandoned playback counts as finished
                        finished_guard.store(true, Ordering::Relaxed);
                        *finished_guard = finished;
                    }

                    let state_for_callback = Arc::clone(&state);
                    match device.build_output_stream(
                        &config,
                        move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                            Self::audio_callback(data, &state_for_callback);
                        },
                        |err| tracing::error!("Audio stream error: {}", err),
                        None,
                    ) {
                        Ok(s) => {
                            if s.play().is_ok() {
                                stream = Some(s);
                            }
                        }
                        Err(e) => {
                            tracing::error!("Failed to build stream: {}", e);
                        }
                    }
                }
                AudioCommand::Stop => {
                    if let Some(s) = stream.take() {
                        drop(s);
                    }
                    state.position.store(0, Ordering::Relaxed);
                    state
                        .finished
                        .lock()
                        .unwrap()
                        .store(true, Ordering::Relaxed);
                }
                AudioCommand::Shutdown => {
                    if let Some(s) = stream.take() {
                        drop(s);
                    }
                    state
                        .finished
                        .lock()
                        .unwrap()
                        .store(true, Ordering::Relaxed);
                    break;
                }
            }
        }
    }

    /// Audio callback function (runs in real-time audio thread)
    fn audio_callback(output: &mut [f32], state: &AudioState) {
        // Get buffer reference (Arc clone is cheap)
        let buffer = {
            let buffer_guard = state.buffer.lock().unwrap();
            Arc::clone(&*buffer_guard)
        };

        let mut pos = state.position.load(Ordering::Relaxed);
        let buffer_len = buffer.len();

        if buffer_len == 0 || pos >= buffer_len {
            output.fill(0.0);
            return;
        }

        for out_sample in output.iter_mut() {
            if pos < buffer_len {
                *out_sample = buffer[pos];
                pos += 1;
            } else {
                *out_sample = 0.0;
            }
        }

        state.position.store(pos, Ordering::Relaxed);

        if pos >= buffer_len {
            // One-shot playback reached the end of the buffer
            state
                .finished
                .lock()
                .unwrap()
                .store(true, Ordering::Relaxed);
        }
    }

    /// Resample an interleaved stereo buffer to the device sample rate
    fn resample_buffer(buffer: &AudioBuffer, target_rate: u32) -> Result<Vec<f32>> {
        use rubato::{
            Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType,
            WindowFunction,
        };

        let source_rate = buffer.format.sample_rate.as_hz();
        let channels = buffer.format.channels as usize;

        let params = SincInterpolationParameters {
            sinc_len: 128,
            f_cutoff: 0.95,
            interpolation: SincInterpolationType::Cubic,
            oversampling_factor: 256,
            window: WindowFunction::BlackmanHarris2,
        };

        let mut resampler = SincFixedIn::<f32>::new(
            target_rate as f64 / source_rate as f64,
            2.0,
            params,
            buffer.frames(),
            channels,
        )
        .map_err(|e| AudioError::Resample(e.to_string()))?;

        // Deinterleave input samples
        let mut deinterleaved = vec![Vec::with_capacity(buffer.frames()); channels];
        for frame_idx in 0..buffer.frames() {
            for (ch, channel_vec) in deinterleaved.iter_mut().enumerate().take(channels) {
                channel_vec.push(buffer.samples[frame_idx * channels + ch]);
            }
        }

        let resampled = resampler
            .process(&deinterleaved, None)
            .map_err(|e| AudioError::Resample(e.to_string()))?;

        // Interleave output samples
        let output_frames = resampled[0].len();
        let mut interleaved = Vec::with_capacity(output_frames * channels);
        for frame_idx in 0..output_frames {
            for channel_data in resampled.iter().take(channels) {
                interleaved.push(channel_data[frame_idx]);
            }
        }

        Ok(interleaved)
    }
}

impl AudioOutput for CpalOutput {
    fn play(&mut self, buffer: &AudioBuffer) -> payphone_core::Result<Box<dyn PlaybackHandle>> {
        // A zero-frame buffer has nothing to play; hand back a handle that
        // is already finished instead of parking the callback on silence
        if buffer.is_empty() {
            return Ok(Box::new(CpalPlaybackHandle {
                finished: Arc::new(AtomicBool::new(true)),
                command_tx: self.command_tx.clone(),
            }));
        }

        // Convert buffer if sample rate doesn't match the device
        let samples = if buffer.format.sample_rate.as_hz() == self.sample_rate {
            buffer.samples.clone()
        } else {
            Self::resample_buffer(buffer, self.sample_rate)?
        };

        let finished = Arc::new(AtomicBool::new(false));

        self.command_tx
            .send(AudioCommand::Play {
                samples: Arc::new(samples),
                finished: Arc::clone(&finished),
            })
            .map_err(|e| {
                payphone_core::PayphoneError::playback(format!(
                    "Failed to send play command: {}",
                    e
                ))
            })?;

        Ok(Box::new(CpalPlaybackHandle {
            finished,
            command_tx: self.command_tx.clone(),
        }))
    }
}

impl Drop for CpalOutput {
    fn drop(&mut self) {
        // The audio thread exits on Shutdown; join so the device is
        // released before drop returns
        let _ = self.command_tx.send(AudioCommand::Shutdown);
        if let Some(handle) = self.audio_thread.take() {
            let _ = handle.join();
        }
    }
}
