//! Audio effects for the enhancement chain
//!
//! All effects implement the core `AudioEffect` trait and operate on
//! interleaved stereo f32 samples in the [-1.0, 1.0] range.

mod chain;
mod compressor;
mod shelf;

pub use chain::EffectChain;
pub use compressor::{Compressor, CompressorSettings};
pub use shelf::{ShelfKind, ShelvingFilter};

#[cfg(test)]
pub(crate) mod tests {
    /// Generate an interleaved stereo sine wave for effect tests
    pub fn generate_sine(frequency: f32, sample_rate: u32, duration_secs: f32) -> Vec<f32> {
        let frames = (sample_rate as f32 * duration_secs) as usize;
        let mut buffer = Vec::with_capacity(frames * 2);
        for i in 0..frames {
            let t = i as f32 / sample_rate as f32;
            let sample = (2.0 * std::f32::consts::PI * frequency * t).sin() * 0.5;
            buffer.push(sample);
            buffer.push(sample);
        }
        buffer
    }

    /// RMS level of an interleaved buffer
    pub fn rms(buffer: &[f32]) -> f32 {
        if buffer.is_empty() {
            return 0.0;
        }
        (buffer.iter().map(|s| s * s).sum::<f32>() / buffer.len() as f32).sqrt()
    }
}
