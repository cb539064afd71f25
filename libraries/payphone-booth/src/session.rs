/// The booth's audio session
///
/// Owns the decoder and the output device. The output is created lazily on
/// the first enhance so picking up the handset does not grab the device, and
/// it is released when the session drops.
use payphone_audio::{enhancement_chain, EnhancementSettings, SymphoniaDecoder};
use payphone_core::{AudioDecoder, AudioOutput, PayphoneError, PlaybackHandle, Recording, Result};

/// Factory that opens an output device on demand
pub type OutputFactory = Box<dyn Fn() -> Result<Box<dyn AudioOutput>> + Send>;

/// Decode-enhance-play pipeline behind the booth
pub struct AudioSession {
    decoder: Box<dyn AudioDecoder>,
    output_factory: OutputFactory,
    output: Option<Box<dyn AudioOutput>>,
    settings: EnhancementSettings,
}

impl AudioSession {
    /// Create a session backed by Symphonia decoding and CPAL output
    pub fn new() -> Self {
        Self::with_components(
            Box::new(SymphoniaDecoder::new()),
            Box::new(|| {
                let output = payphone_audio::CpalOutput::new().map_err(PayphoneError::from)?;
                Ok(Box::new(output) as Box<dyn AudioOutput>)
            }),
        )
    }

    /// Create a session from explicit components
    ///
    /// This is the seam used by tests to run the booth without a device.
    pub fn with_components(decoder: Box<dyn AudioDecoder>, output_factory: OutputFactory) -> Self {
        Self {
            decoder,
            output_factory,
            output: None,
            settings: EnhancementSettings::default(),
        }
    }

    /// Decode the recording, run the enhancement chain over it, and start
    /// one-shot playback
    ///
    /// Returns the playback handle. The output device is opened on the
    /// first call and reused afterwards.
    ///
    /// # Errors
    /// Returns an error if decoding fails, the device cannot be opened, or
    /// playback cannot start.
    pub fn enhance_and_play(&mut self, recording: &Recording) -> Result<Box<dyn PlaybackHandle>> {
        let mut buffer = self.decoder.decode(recording)?;

        tracing::debug!(
            name = recording.name(),
            frames = buffer.frames(),
            "Running enhancement chain"
        );

        let mut chain = enhancement_chain(&self.settings);
        let sample_rate = buffer.format.sample_rate.as_hz();
        chain.process(&mut buffer.samples, sample_rate);

        if self.output.is_none() {
            self.output = Some((self.output_factory)()?);
        }
        // The Option is filled just above; map the impossible case anyway
        let output = self
            .output
            .as_mut()
            .ok_or_else(|| PayphoneError::playback("Output device unavailable"))?;

        output.play(&buffer)
    }

    /// Whether the output device has been opened
    pub fn has_output(&self) -> bool {
        self.output.is_some()
    }
}

impl Default for AudioSession {
    fn default() -> Self {
        Self::new()
    }
}
