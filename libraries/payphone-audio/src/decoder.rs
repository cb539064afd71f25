/// Audio decoder implementation using Symphonia
use crate::error::AudioError;
use payphone_core::{
    AudioBuffer, AudioDecoder as AudioDecoderTrait, AudioFormat, Recording, SampleRate,
};
use std::io::Cursor;
use std::sync::Arc;
use symphonia::core::audio::{AudioBufferRef, Signal};
use symphonia::core::codecs::DecoderOptions;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

/// Audio decoder using Symphonia
///
/// Supports: MP3, FLAC, OGG, WAV, AAC, OPUS
///
/// Decodes an in-memory `Recording` in full. The booth's input boundary is
/// an uploaded blob, so there is no file-path or streaming API here; the
/// probe works directly over the recording's bytes with the declared media
/// type as a format hint.
pub struct SymphoniaDecoder;

impl SymphoniaDecoder {
    /// Create a new decoder
    pub fn new() -> Self {
        Self
    }

    /// Convert a decoded Symphonia packet buffer to interleaved stereo f32
    ///
    /// Always outputs samples in the range [-1.0, 1.0]. Signed integers use
    /// symmetric scaling (divide by 2^(N-1)) so the range stays symmetric.
    fn convert_buffer(decoded: &AudioBufferRef) -> Vec<f32> {
        let channels = decoded.spec().channels.count();

        match decoded {
            AudioBufferRef::F32(buf) => {
                // F32 audio can have intersample peaks > 1.0, so clamp
                Self::downmix_to_stereo(buf, channels, |s| s.clamp(-1.0, 1.0))
            }
            AudioBufferRef::F64(buf) => {
                Self::downmix_to_stereo(buf, channels, |s| (s as f32).clamp(-1.0, 1.0))
            }
            AudioBufferRef::S32(buf) => {
                Self::downmix_to_stereo(buf, channels, |s| s as f32 / 2_147_483_648.0)
            }
            AudioBufferRef::S16(buf) => {
                Self::downmix_to_stereo(buf, channels, |s| s as f32 / 32_768.0)
            }
            AudioBufferRef::S8(buf) => {
                Self::downmix_to_stereo(buf, channels, |s| s as f32 / 128.0)
            }
            AudioBufferRef::S24(buf) => {
                Self::downmix_to_stereo(buf, channels, |s| s.inner() as f32 / 8_388_608.0)
            }
            AudioBufferRef::U32(buf) => Self::downmix_to_stereo(buf, channels, |s| {
                (s as f32 / u32::MAX as f32) * 2.0 - 1.0
            }),
            AudioBufferRef::U16(buf) => Self::downmix_to_stereo(buf, channels, |s| {
                (s as f32 / u16::MAX as f32) * 2.0 - 1.0
            }),
            AudioBufferRef::U8(buf) => Self::downmix_to_stereo(buf, channels, |s| {
                (s as f32 / u8::MAX as f32) * 2.0 - 1.0
            }),
            AudioBufferRef::U24(buf) => Self::downmix_to_stereo(buf, channels, |s| {
                (s.inner() as f32 / 16_777_215.0) * 2.0 - 1.0
            }),
        }
    }

    /// Downmix any channel count to interleaved stereo
    ///
    /// Mono is duplicated to both channels; stereo passes through. Channels
    /// beyond the first two (center, LFE, surrounds) are folded into both
    /// sides at -3 dB (ITU-R BS.775-1 coefficient).
    fn downmix_to_stereo<T, F>(
        buf: &symphonia::core::audio::AudioBuffer<T>,
        channels: usize,
        normalize: F,
    ) -> Vec<f32>
    where
        T: symphonia::core::sample::Sample + Copy,
        F: Fn(T) -> f32,
    {
        const FOLD_MIX: f32 = 0.707; // -3 dB

        let frames = buf.frames();
        let mut output = Vec::with_capacity(frames * 2);

        match channels {
            0 => {
                output.resize(frames * 2, 0.0);
            }
            1 => {
                let mono = buf.chan(0);
                for i in 0..frames {
                    let sample = normalize(mono[i]);
                    output.push(sample);
                    output.push(sample);
                }
            }
            _ => {
                let left = buf.chan(0);
                let right = buf.chan(1);
                for i in 0..frames {
                    let mut l = normalize(left[i]);
                    let mut r = normalize(right[i]);
                    for ch in 2..channels {
                        let folded = normalize(buf.chan(ch)[i]) * FOLD_MIX;
                        l += folded;
                        r += folded;
                    }
                    output.push(l.clamp(-1.0, 1.0));
                    output.push(r.clamp(-1.0, 1.0));
                }
            }
        }

        output
    }
}

impl Default for SymphoniaDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioDecoderTrait for SymphoniaDecoder {
    fn decode(&mut self, recording: &Recording) -> payphone_core::Result<AudioBuffer> {
        if recording.is_empty() {
            return Err(AudioError::Decode("Recording is empty".to_string()).into());
        }

        // Media source over the recording's bytes (shared, no copy)
        let cursor = Cursor::new(SharedBytes(recording.shared_content()));
        let mss = MediaSourceStream::new(Box::new(cursor), Default::default());

        // Hint the format registry with the declared media type
        let mut hint = Hint::new();
        if let Some(ext) = recording.extension_hint() {
            hint.with_extension(ext);
        }

        // Probe the media source
        let probed = symphonia::default::get_probe()
            .format(
                &hint,
                mss,
                &FormatOptions::default(),
                &MetadataOptions::default(),
            )
            .map_err(|e| AudioError::Symphonia(format!("Failed to probe recording: {}", e)))?;

        let mut format = probed.format;

        // Find the default track
        let track = format
            .default_track()
            .ok_or_else(|| AudioError::Decode("No audio tracks found".to_string()))?;

        let sample_rate = track.codec_params.sample_rate.unwrap_or(44100);
        let track_id = track.id;

        // Create decoder
        let mut decoder = symphonia::default::get_codecs()
            .make(&track.codec_params, &DecoderOptions::default())
            .map_err(|e| AudioError::Symphonia(format!("Failed to create decoder: {}", e)))?;

        // Decode all packets and collect into a single buffer
        let mut all_samples = Vec::new();

        loop {
            let packet = match format.next_packet() {
                Ok(packet) => packet,
                Err(symphonia::core::errors::Error::IoError(e))
                    if e.kind() == std::io::ErrorKind::UnexpectedEof =>
                {
                    break;
                }
                Err(e) => {
                    return Err(
                        AudioError::Symphonia(format!("Error reading packet: {}", e)).into()
                    );
                }
            };

            if packet.track_id() != track_id {
                continue;
            }

            let decoded = decoder
                .decode(&packet)
                .map_err(|e| AudioError::Decode(format!("Decode error: {}", e)))?;

            all_samples.extend_from_slice(&Self::convert_buffer(&decoded));
        }

        tracing::debug!(
            frames = all_samples.len() / 2,
            sample_rate,
            name = recording.name(),
            "decoded recording"
        );

        // Output is always stereo f32 since downmix_to_stereo normalizes
        let format = AudioFormat::stereo_f32(SampleRate::new(sample_rate));

        Ok(AudioBuffer::new(all_samples, format))
    }

    fn supports_media_type(&self, media_type: &str) -> bool {
        matches!(
            media_type,
            "audio/mpeg"
                | "audio/mp3"
                | "audio/wav"
                | "audio/wave"
                | "audio/x-wav"
                | "audio/flac"
                | "audio/x-flac"
                | "audio/ogg"
                | "audio/opus"
                | "audio/aac"
                | "audio/mp4"
                | "audio/x-m4a"
        )
    }
}

/// Newtype so `Cursor` can serve shared recording bytes as a Symphonia
/// media source
struct SharedBytes(Arc<[u8]>);

impl AsRef<[u8]> for SharedBytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn supported_media_types() {
        let decoder = SymphoniaDecoder::new();
        assert!(decoder.supports_media_type("audio/mpeg"));
        assert!(decoder.supports_media_type("audio/flac"));
        assert!(!decoder.supports_media_type("text/plain"));
        assert!(!decoder.supports_media_type("video/mp4"));
    }

    #[test]
    fn empty_recording_rejected() {
        let mut decoder = SymphoniaDecoder::new();
        let recording = Recording::new(Vec::new(), "audio/wav", "empty.wav");
        assert!(decoder.decode(&recording).is_err());
    }

    #[test]
    fn garbage_bytes_rejected() {
        let mut decoder = SymphoniaDecoder::new();
        let recording = Recording::new(vec![0xDE, 0xAD, 0xBE, 0xEF], "audio/wav", "junk.wav");
        assert!(decoder.decode(&recording).is_err());
    }
}
