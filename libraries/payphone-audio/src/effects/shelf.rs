/// Shelving EQ filter
///
/// Boosts or cuts everything below (low shelf) or above (high shelf) a
/// cutoff frequency by a fixed gain, leaving the rest of the spectrum
/// unchanged. Implemented as an RBJ biquad with per-channel state.
use payphone_core::AudioEffect;

/// Butterworth Q, maximally flat shelf transition
const SHELF_Q: f32 = 0.707;

/// Which side of the cutoff the shelf acts on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShelfKind {
    /// Boosts/cuts below the cutoff frequency
    Low,
    /// Boosts/cuts above the cutoff frequency
    High,
}

/// Shelving biquad filter (stereo)
pub struct ShelvingFilter {
    kind: ShelfKind,
    /// Cutoff frequency in Hz
    frequency: f32,
    /// Shelf gain in dB (clamped to -24..=24)
    gain_db: f32,
    enabled: bool,

    // Filter coefficients (normalized, a0 = 1)
    b0: f32,
    b1: f32,
    b2: f32,
    a1: f32,
    a2: f32,

    // State variables (per channel)
    x1_l: f32,
    x2_l: f32,
    y1_l: f32,
    y2_l: f32,
    x1_r: f32,
    x2_r: f32,
    y1_r: f32,
    y2_r: f32,

    sample_rate: u32,
    needs_update: bool,
}

impl ShelvingFilter {
    /// Create a low shelf filter
    pub fn low_shelf(frequency: f32, gain_db: f32) -> Self {
        Self::new(ShelfKind::Low, frequency, gain_db)
    }

    /// Create a high shelf filter
    pub fn high_shelf(frequency: f32, gain_db: f32) -> Self {
        Self::new(ShelfKind::High, frequency, gain_db)
    }

    fn new(kind: ShelfKind, frequency: f32, gain_db: f32) -> Self {
        Self {
            kind,
            frequency,
            gain_db: gain_db.clamp(-24.0, 24.0),
            enabled: true,
            b0: 1.0,
            b1: 0.0,
            b2: 0.0,
            a1: 0.0,
            a2: 0.0,
            x1_l: 0.0,
            x2_l: 0.0,
            y1_l: 0.0,
            y2_l: 0.0,
            x1_r: 0.0,
            x2_r: 0.0,
            y1_r: 0.0,
            y2_r: 0.0,
            sample_rate: 44100,
            needs_update: true,
        }
    }

    /// Cutoff frequency in Hz
    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    /// Shelf gain in dB
    pub fn gain_db(&self) -> f32 {
        self.gain_db
    }

    /// Recalculate coefficients (RBJ audio EQ cookbook shelving formulas)
    fn update_coefficients(&mut self) {
        if !self.needs_update {
            return;
        }

        let sr = self.sample_rate as f32;
        if sr < 1.0 {
            return;
        }

        let a = 10.0_f32.powf(self.gain_db / 40.0);
        // Clamp frequency below Nyquist to keep the filter stable
        let clamped_freq = self.frequency.min(sr * 0.45);
        let omega = 2.0 * std::f32::consts::PI * clamped_freq / sr;
        let sin_omega = omega.sin();
        let cos_omega = omega.cos();
        let alpha = sin_omega / 2.0 * ((a + 1.0 / a) * (1.0 / SHELF_Q - 1.0) + 2.0).sqrt();
        let beta = 2.0 * a.sqrt() * alpha;

        let (b0, b1, b2, a0, a1, a2) = match self.kind {
            ShelfKind::Low => (
                a * ((a + 1.0) - (a - 1.0) * cos_omega + beta),
                2.0 * a * ((a - 1.0) - (a + 1.0) * cos_omega),
                a * ((a + 1.0) - (a - 1.0) * cos_omega - beta),
                (a + 1.0) + (a - 1.0) * cos_omega + beta,
                -2.0 * ((a - 1.0) + (a + 1.0) * cos_omega),
                (a + 1.0) + (a - 1.0) * cos_omega - beta,
            ),
            ShelfKind::High => (
                a * ((a + 1.0) + (a - 1.0) * cos_omega + beta),
                -2.0 * a * ((a - 1.0) + (a + 1.0) * cos_omega),
                a * ((a + 1.0) + (a - 1.0) * cos_omega - beta),
                (a + 1.0) - (a - 1.0) * cos_omega + beta,
                2.0 * ((a - 1.0) - (a + 1.0) * cos_omega),
                (a + 1.0) - (a - 1.0) * cos_omega - beta,
            ),
        };

        self.b0 = b0 / a0;
        self.b1 = b1 / a0;
        self.b2 = b2 / a0;
        self.a1 = a1 / a0;
        self.a2 = a2 / a0;

        self.needs_update = false;
    }

    /// Process a stereo sample pair (left, right)
    #[inline]
    fn process_sample(&mut self, left: f32, right: f32) -> (f32, f32) {
        let mut out_l = self.b0 * left + self.b1 * self.x1_l + self.b2 * self.x2_l
            - self.a1 * self.y1_l
            - self.a2 * self.y2_l;

        // Flush denormals to zero to prevent CPU performance issues
        if out_l.abs() < 1e-15 {
            out_l = 0.0;
        }

        self.x2_l = self.x1_l;
        self.x1_l = left;
        self.y2_l = self.y1_l;
        self.y1_l = out_l;

        let mut out_r = self.b0 * right + self.b1 * self.x1_r + self.b2 * self.x2_r
            - self.a1 * self.y1_r
            - self.a2 * self.y2_r;

        if out_r.abs() < 1e-15 {
            out_r = 0.0;
        }

        self.x2_r = self.x1_r;
        self.x1_r = right;
        self.y2_r = self.y1_r;
        self.y1_r = out_r;

        (out_l, out_r)
    }
}

impl AudioEffect for ShelvingFilter {
    fn process(&mut self, buffer: &mut [f32], sample_rate: u32) {
        if !self.enabled {
            return;
        }

        if self.sample_rate != sample_rate {
            self.sample_rate = sample_rate;
            self.needs_update = true;
        }

        self.update_coefficients();

        for chunk in buffer.chunks_exact_mut(2) {
            let (l, r) = self.process_sample(chunk[0], chunk[1]);
            chunk[0] = l;
            chunk[1] = r;
        }
    }

    fn reset(&mut self) {
        self.x1_l = 0.0;
        self.x2_l = 0.0;
        self.y1_l = 0.0;
        self.y2_l = 0.0;
        self.x1_r = 0.0;
        self.x2_r = 0.0;
        self.y1_r = 0.0;
        self.y2_r = 0.0;
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn name(&self) -> &str {
        match self.kind {
            ShelfKind::Low => "Low Shelf",
            ShelfKind::High => "High Shelf",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::tests::{generate_sine, rms};

    #[test]
    fn create_filters() {
        let low = ShelvingFilter::low_shelf(100.0, 3.0);
        assert!(low.is_enabled());
        assert_eq!(low.name(), "Low Shelf");
        assert_eq!(low.frequency(), 100.0);

        let high = ShelvingFilter::high_shelf(10000.0, 2.0);
        assert_eq!(high.name(), "High Shelf");
        assert_eq!(high.gain_db(), 2.0);
    }

    #[test]
    fn gain_clamped() {
        let filter = ShelvingFilter::low_shelf(100.0, 99.0);
        assert!(filter.gain_db() <= 24.0);
    }

    #[test]
    fn low_shelf_boosts_bass() {
        let mut filter = ShelvingFilter::low_shelf(100.0, 6.0);

        let mut low_tone = generate_sine(50.0, 44100, 0.5);
        let original_rms = rms(&low_tone);
        filter.process(&mut low_tone, 44100);

        // Skip the filter's settling transient
        let boosted_rms = rms(&low_tone[8820..]);
        assert!(
            boosted_rms > original_rms * 1.3,
            "50 Hz tone should be boosted: {} vs {}",
            boosted_rms,
            original_rms
        );
    }

    #[test]
    fn low_shelf_leaves_treble_alone() {
        let mut filter = ShelvingFilter::low_shelf(100.0, 6.0);

        let mut high_tone = generate_sine(5000.0, 44100, 0.5);
        let original_rms = rms(&high_tone);
        filter.process(&mut high_tone, 44100);

        let processed_rms = rms(&high_tone[8820..]);
        assert!(
            (processed_rms - original_rms).abs() < original_rms * 0.1,
            "5 kHz tone should pass through a 100 Hz low shelf: {} vs {}",
            processed_rms,
            original_rms
        );
    }

    #[test]
    fn high_shelf_boosts_treble() {
        let mut filter = ShelvingFilter::high_shelf(10000.0, 6.0);

        let mut high_tone = generate_sine(15000.0, 44100, 0.5);
        let original_rms = rms(&high_tone);
        filter.process(&mut high_tone, 44100);

        let boosted_rms = rms(&high_tone[8820..]);
        assert!(
            boosted_rms > original_rms * 1.3,
            "15 kHz tone should be boosted: {} vs {}",
            boosted_rms,
            original_rms
        );
    }

    #[test]
    fn output_is_finite() {
        let mut filter = ShelvingFilter::high_shelf(10000.0, 24.0);
        let mut buffer = generate_sine(1000.0, 44100, 0.2);
        filter.process(&mut buffer, 44100);

        for sample in &buffer {
            assert!(sample.is_finite());
        }
    }

    #[test]
    fn reset_clears_state() {
        let mut filter = ShelvingFilter::low_shelf(100.0, 6.0);

        let mut buffer = generate_sine(50.0, 44100, 0.1);
        filter.process(&mut buffer, 44100);

        filter.reset();

        let mut buffer2 = generate_sine(50.0, 44100, 0.1);
        filter.process(&mut buffer2, 44100);

        let mut buffer3 = generate_sine(50.0, 44100, 0.1);
        let mut fresh = ShelvingFilter::low_shelf(100.0, 6.0);
        fresh.process(&mut buffer3, 44100);

        for (a, b) in buffer2.iter().zip(buffer3.iter()) {
            assert!((a - b).abs() < 1e-5);
        }
    }

    #[test]
    fn disabled_filter_bypassed() {
        let mut filter = ShelvingFilter::low_shelf(100.0, 12.0);
        filter.set_enabled(false);

        let mut buffer = vec![0.5; 100];
        let original = buffer.clone();

        filter.process(&mut buffer, 44100);
        assert_eq!(buffer, original);
    }
}
