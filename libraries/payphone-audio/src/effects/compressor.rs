/// Dynamic Range Compressor
///
/// Reduces the level of signal portions exceeding a threshold, by a given
/// ratio, smoothed by attack/release timing.
use payphone_core::AudioEffect;

/// Compressor settings
#[derive(Debug, Clone, Copy)]
pub struct CompressorSettings {
    /// Threshold in dB (-60 to 0)
    /// Signals above this level will be compressed
    pub threshold_db: f32,

    /// Ratio (1.0 to 20.0)
    /// Amount of compression (e.g., 12.0 means 12:1 compression)
    pub ratio: f32,

    /// Attack time in milliseconds (0.1 to 100)
    /// How quickly compression is applied when signal exceeds threshold
    pub attack_ms: f32,

    /// Release time in milliseconds (10 to 1000)
    /// How quickly compression is released when signal falls below threshold
    pub release_ms: f32,

    /// Knee width in dB (0 to 40)
    /// Softens the transition at the threshold (0 = hard knee)
    pub knee_db: f32,
}

impl CompressorSettings {
    /// Validate and clamp settings to safe ranges
    pub fn validate(&mut self) {
        self.threshold_db = self.threshold_db.clamp(-60.0, 0.0);
        self.ratio = self.ratio.clamp(1.0, 20.0);
        self.attack_ms = self.attack_ms.clamp(0.1, 100.0);
        self.release_ms = self.release_ms.clamp(10.0, 1000.0);
        self.knee_db = self.knee_db.clamp(0.0, 40.0);
    }
}

impl Default for CompressorSettings {
    fn default() -> Self {
        Self {
            threshold_db: -20.0,
            ratio: 4.0,
            attack_ms: 5.0,
            release_ms: 50.0,
            knee_db: 6.0,
        }
    }
}

/// Dynamic Range Compressor
///
/// Uses a two-stage design:
/// 1. Peak level detection with instant attack and slow release (peak hold),
///    so the measured level is stable within each waveform cycle
/// 2. Gain smoothing with the configured attack/release, which controls how
///    fast compression responds
pub struct Compressor {
    settings: CompressorSettings,
    enabled: bool,

    // Peak level detector (in dB); instant attack, slow release
    peak_level_db: f32,

    // Smoothed gain reduction in dB
    gain_reduction_db: f32,

    // Coefficient cache
    peak_release_coeff: f32,
    gr_attack_coeff: f32,
    gr_release_coeff: f32,

    sample_rate: u32,
    needs_update: bool,
}

impl Compressor {
    /// Create a new compressor with default settings
    pub fn new() -> Self {
        Self::with_settings(CompressorSettings::default())
    }

    /// Create compressor with specific settings
    pub fn with_settings(mut settings: CompressorSettings) -> Self {
        settings.validate();
        let mut comp = Self {
            settings,
            enabled: true,
            peak_level_db: -120.0,
            gain_reduction_db: 0.0,
            peak_release_coeff: 0.0,
            gr_attack_coeff: 0.0,
            gr_release_coeff: 0.0,
            sample_rate: 44100,
            needs_update: true,
        };
        comp.update_coefficients();
        comp
    }

    /// Get current settings
    pub fn settings(&self) -> CompressorSettings {
        self.settings
    }

    /// Update internal coefficients based on settings and sample rate
    fn update_coefficients(&mut self) {
        if !self.needs_update {
            return;
        }

        let sr = self.sample_rate as f32;

        // Peak detector release is fixed at 50ms: long enough to hold peaks
        // across waveform cycles, short enough to follow level changes
        let peak_release_samples = 50.0 * sr / 1000.0;
        self.peak_release_coeff = (-1.0 / peak_release_samples).exp();

        // Gain smoothing: coeff = exp(-1 / (time_ms * sample_rate / 1000))
        // gives 63.2% response at the configured time
        let attack_samples = self.settings.attack_ms * sr / 1000.0;
        let release_samples = self.settings.release_ms * sr / 1000.0;

        self.gr_attack_coeff = (-1.0 / attack_samples).exp();
        self.gr_release_coeff = (-1.0 / release_samples).exp();

        self.needs_update = false;
    }

    /// Compute the desired output level for a given input level (in dB)
    #[inline]
    fn compute_output_level(&self, input_db: f32) -> f32 {
        let threshold = self.settings.threshold_db;
        let ratio = self.settings.ratio;
        let knee = self.settings.knee_db;

        if knee <= 0.0 {
            // Hard knee
            if input_db <= threshold {
                input_db
            } else {
                threshold + (input_db - threshold) / ratio
            }
        } else {
            // Soft knee
            let half_knee = knee / 2.0;
            let knee_start = threshold - half_knee;
            let knee_end = threshold + half_knee;

            if input_db <= knee_start {
                input_db
            } else if input_db >= knee_end {
                threshold + (input_db - threshold) / ratio
            } else {
                // Within knee region: smooth quadratic transition
                let x = input_db - knee_start;
                let slope_change = (1.0 - 1.0 / ratio) / (2.0 * knee);
                input_db - slope_change * x * x
            }
        }
    }

    /// Compute gain reduction for a given input level (in dB)
    /// Negative value means gain reduction
    #[inline]
    fn compute_gain_reduction(&self, input_db: f32) -> f32 {
        self.compute_output_level(input_db) - input_db
    }

    /// Update peak level detector: instant attack, decay toward the noise
    /// floor rather than the input (input can be -inf at zero crossings)
    #[inline]
    fn update_peak_level(&mut self, input_db: f32) {
        if input_db > self.peak_level_db {
            self.peak_level_db = input_db;
        } else {
            const NOISE_FLOOR_DB: f32 = -120.0;
            self.peak_level_db =
                self.peak_release_coeff * (self.peak_level_db - NOISE_FLOOR_DB) + NOISE_FLOOR_DB;
        }
    }

    /// Smooth gain reduction with attack/release
    #[inline]
    fn smooth_gain_reduction(&mut self, target_gr_db: f32) {
        // More negative target = attacking, less negative = releasing
        let coeff = if target_gr_db < self.gain_reduction_db {
            self.gr_attack_coeff
        } else {
            self.gr_release_coeff
        };

        self.gain_reduction_db = coeff * self.gain_reduction_db + (1.0 - coeff) * target_gr_db;
    }
}

impl Default for Compressor {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioEffect for Compressor {
    fn process(&mut self, buffer: &mut [f32], sample_rate: u32) {
        if !self.enabled {
            return;
        }

        if self.sample_rate != sample_rate {
            self.sample_rate = sample_rate;
            self.needs_update = true;
        }

        self.update_coefficients();

        // Linked stereo: detect on the louder channel, apply same gain to
        // both so the stereo image is preserved
        for chunk in buffer.chunks_exact_mut(2) {
            let max_sample = chunk[0].abs().max(chunk[1].abs());

            let input_db = if max_sample > 1e-10 {
                20.0 * max_sample.log10()
            } else {
                -200.0
            };

            self.update_peak_level(input_db);

            let target_gr_db = self.compute_gain_reduction(self.peak_level_db);
            self.smooth_gain_reduction(target_gr_db);

            let gain = 10.0_f32.powf(self.gain_reduction_db / 20.0);

            chunk[0] *= gain;
            chunk[1] *= gain;
        }
    }

    fn reset(&mut self) {
        self.peak_level_db = -120.0;
        self.gain_reduction_db = 0.0;
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn name(&self) -> &str {
        "Dynamic Range Compressor"
    }
}
