#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    error::{EngineError, Result},
    MAX_BLOCK_SIZE,
};

/// Construction-time settings for [`FmEngine`](crate::FmEngine).
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Output sample rate in Hz.
    pub sample_rate: f32,
    /// Output channel count. Channels past the first two are kept silent.
    pub channels: usize,
    /// Entries in the default sine table.
    pub waveform_size: usize,
    /// Largest block the host will ask for; sizes the bound buffer.
    pub max_block_size: usize,
    /// Capacity of the control queue created by `FmEngine::with_handle`.
    pub message_capacity: usize,
    /// Only accept MIDI on this channel (0-15). `None` is omni.
    pub midi_channel: Option<u8>,
    /// Ramp length, in blocks, used when a UI value changes.
    pub dezipper_steps: u32,
}

impl EngineConfig {
    pub fn new(channels: usize, sample_rate: f32) -> Self {
        Self {
            sample_rate,
            channels,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.sample_rate.is_finite() || self.sample_rate <= 0.0 {
            return Err(EngineError::InvalidSampleRate {
                sample_rate: self.sample_rate,
            });
        }
        if self.channels < 2 {
            return Err(EngineError::UnsupportedChannelCount {
                channels: self.channels,
            });
        }
        if self.waveform_size == 0 {
            return Err(EngineError::InvalidWaveformSize {
                size: self.waveform_size,
            });
        }
        if self.max_block_size == 0 {
            return Err(EngineError::InvalidConfig {
                reason: "max_block_size must be at least 1",
            });
        }
        if self.message_capacity == 0 {
            return Err(EngineError::InvalidConfig {
                reason: "message_capacity must be at least 1",
            });
        }
        if self.midi_channel.is_some_and(|channel| channel > 15) {
            return Err(EngineError::InvalidConfig {
                reason: "midi_channel must be 0-15",
            });
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sample_rate: 44_100.0,
            channels: 2,
            waveform_size: 4096,
            max_block_size: MAX_BLOCK_SIZE,
            message_capacity: 256,
            midi_channel: None,
            dezipper_steps: 0,
        }
    }
}
