/// The fixed call-quality enhancement chain
///
/// Source -> low shelf -> high shelf -> compressor -> output device.
use crate::effects::{Compressor, CompressorSettings, EffectChain, ShelvingFilter};

/// Parameters of the enhancement chain.
///
/// The defaults are the booth's fixed constants; the struct exists as a
/// construction seam, not a runtime configuration surface.
#[derive(Debug, Clone, Copy)]
pub struct EnhancementSettings {
    /// Low shelf cutoff in Hz
    pub low_shelf_hz: f32,
    /// Low shelf gain in dB
    pub low_shelf_gain_db: f32,
    /// High shelf cutoff in Hz
    pub high_shelf_hz: f32,
    /// High shelf gain in dB
    pub high_shelf_gain_db: f32,
    /// Compressor settings
    pub compressor: CompressorSettings,
}

impl Default for EnhancementSettings {
    fn default() -> Self {
        Self {
            low_shelf_hz: 100.0,
            low_shelf_gain_db: 3.0,
            high_shelf_hz: 10_000.0,
            high_shelf_gain_db: 2.0,
            compressor: CompressorSettings {
                threshold_db: -24.0,
                ratio: 12.0,
                attack_ms: 3.0,
                release_ms: 250.0,
                knee_db: 30.0,
            },
        }
    }
}

/// Build the enhancement effect chain from the given settings
pub fn enhancement_chain(settings: &EnhancementSettings) -> EffectChain {
    let mut chain = EffectChain::new();
    chain.add_effect(Box::new(ShelvingFilter::low_shelf(
        settings.low_shelf_hz,
        settings.low_shelf_gain_db,
    )));
    chain.add_effect(Box::new(ShelvingFilter::high_shelf(
        settings.high_shelf_hz,
        settings.high_shelf_gain_db,
    )));
    chain.add_effect(Box::new(Compressor::with_settings(settings.compressor)));
    chain
}
