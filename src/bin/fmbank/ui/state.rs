//! Shared state types for UI communication
//!
//! Snapshots cross from the audio thread, so they are `Copy` and built
//! without allocating.

use fmbank::{FmEngine, GlobalParams, NUM_NOTES};

/// Static session facts, gathered once before the UI starts (can allocate)
#[derive(Clone, Debug)]
pub struct SessionInfo {
    pub device_name: String,
    pub sample_rate: f32,
    pub channels: usize,
}

/// What the engine looked like at the end of one audio callback
#[derive(Clone, Copy, Debug)]
pub struct EngineSnapshot {
    /// Indexed by note number
    pub sounding: [bool; NUM_NOTES],
    pub voice_count: usize,
    /// Values the last block rendered with (mid-ramp values included)
    pub params: GlobalParams,
    /// Peak absolute sample of the callback
    pub peak: f32,
}

impl EngineSnapshot {
    pub fn capture(engine: &FmEngine, peak: f32) -> Self {
        let mut sounding = [false; NUM_NOTES];
        for note in engine.active_notes() {
            sounding[note as usize] = true;
        }

        Self {
            sounding,
            voice_count: engine.active_voice_count(),
            params: *engine.params(),
            peak,
        }
    }
}

impl Default for EngineSnapshot {
    fn default() -> Self {
        Self {
            sounding: [false; NUM_NOTES],
            voice_count: 0,
            params: GlobalParams::default(),
            peak: 0.0,
        }
    }
}
