//! The seven bank-wide synthesis parameters.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Detuned frequencies are clamped to this ceiling regardless of sample rate.
pub const MAX_FREQUENCY: f32 = 22_050.0;

/// Host-facing parameter addresses. The discriminants are the raw addresses.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamAddress {
    CarrierMultiplier = 0,
    ModulatingMultiplier = 1,
    ModulationIndex = 2,
    AttackDuration = 3,
    ReleaseDuration = 4,
    DetuningOffset = 5,
    DetuningMultiplier = 6,
}

impl ParamAddress {
    pub const COUNT: usize = 7;

    pub const ALL: [ParamAddress; Self::COUNT] = [
        ParamAddress::CarrierMultiplier,
        ParamAddress::ModulatingMultiplier,
        ParamAddress::ModulationIndex,
        ParamAddress::AttackDuration,
        ParamAddress::ReleaseDuration,
        ParamAddress::DetuningOffset,
        ParamAddress::DetuningMultiplier,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Inclusive (min, max) accepted for this parameter.
    pub fn range(self) -> (f32, f32) {
        match self {
            ParamAddress::CarrierMultiplier => (0.0, 1000.0),
            ParamAddress::ModulatingMultiplier => (0.0, 1000.0),
            ParamAddress::ModulationIndex => (0.0, 1000.0),
            ParamAddress::AttackDuration => (0.0, 10.0),
            ParamAddress::ReleaseDuration => (0.0, 100.0),
            ParamAddress::DetuningOffset => (-1000.0, 1000.0),
            ParamAddress::DetuningMultiplier => (0.9, 1.11),
        }
    }

    pub fn default_value(self) -> f32 {
        match self {
            ParamAddress::CarrierMultiplier => 1.0,
            ParamAddress::ModulatingMultiplier => 1.0,
            ParamAddress::ModulationIndex => 1.0,
            ParamAddress::AttackDuration => 0.0,
            ParamAddress::ReleaseDuration => 0.0,
            ParamAddress::DetuningOffset => 0.0,
            ParamAddress::DetuningMultiplier => 1.0,
        }
    }

    /// Clamp into range. NaN falls back to the default.
    pub fn clamp(self, value: f32) -> f32 {
        if value.is_nan() {
            return self.default_value();
        }
        let (min, max) = self.range();
        value.clamp(min, max)
    }

    pub fn name(self) -> &'static str {
        match self {
            ParamAddress::CarrierMultiplier => "carrier multiplier",
            ParamAddress::ModulatingMultiplier => "modulating multiplier",
            ParamAddress::ModulationIndex => "modulation index",
            ParamAddress::AttackDuration => "attack (s)",
            ParamAddress::ReleaseDuration => "release (s)",
            ParamAddress::DetuningOffset => "detune offset (Hz)",
            ParamAddress::DetuningMultiplier => "detune multiplier",
        }
    }
}

impl TryFrom<u64> for ParamAddress {
    type Error = EngineError;

    fn try_from(address: u64) -> Result<Self, Self::Error> {
        usize::try_from(address)
            .ok()
            .and_then(|i| Self::ALL.get(i).copied())
            .ok_or(EngineError::UnknownParameter { address })
    }
}

/// Snapshot of the bank-wide parameters for one block.
///
/// Voices read this, they never write it.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlobalParams {
    pub carrier_multiplier: f32,
    pub modulating_multiplier: f32,
    pub modulation_index: f32,
    /// Seconds.
    pub attack_duration: f32,
    /// Seconds.
    pub release_duration: f32,
    /// Hz, added after the multiplier.
    pub detuning_offset: f32,
    pub detuning_multiplier: f32,
}

impl GlobalParams {
    pub fn get(&self, address: ParamAddress) -> f32 {
        match address {
            ParamAddress::CarrierMultiplier => self.carrier_multiplier,
            ParamAddress::ModulatingMultiplier => self.modulating_multiplier,
            ParamAddress::ModulationIndex => self.modulation_index,
            ParamAddress::AttackDuration => self.attack_duration,
            ParamAddress::ReleaseDuration => self.release_duration,
            ParamAddress::DetuningOffset => self.detuning_offset,
            ParamAddress::DetuningMultiplier => self.detuning_multiplier,
        }
    }

    pub fn set(&mut self, address: ParamAddress, value: f32) {
        let slot = match address {
            ParamAddress::CarrierMultiplier => &mut self.carrier_multiplier,
            ParamAddress::ModulatingMultiplier => &mut self.modulating_multiplier,
            ParamAddress::ModulationIndex => &mut self.modulation_index,
            ParamAddress::AttackDuration => &mut self.attack_duration,
            ParamAddress::ReleaseDuration => &mut self.release_duration,
            ParamAddress::DetuningOffset => &mut self.detuning_offset,
            ParamAddress::DetuningMultiplier => &mut self.detuning_multiplier,
        };
        *slot = value;
    }

    /// Apply the bank-wide detune to a voice's base frequency.
    #[inline]
    pub fn detune(&self, frequency: f32) -> f32 {
        (frequency * self.detuning_multiplier + self.detuning_offset).clamp(0.0, MAX_FREQUENCY)
    }
}

impl Default for GlobalParams {
    fn default() -> Self {
        let mut params = Self {
            carrier_multiplier: 0.0,
            modulating_multiplier: 0.0,
            modulation_index: 0.0,
            attack_duration: 0.0,
            release_duration: 0.0,
            detuning_offset: 0.0,
            detuning_multiplier: 0.0,
        };
        for address in ParamAddress::ALL {
            params.set(address, address.default_value());
        }
        params
    }
}

/// Convert a duration in seconds to a whole number of samples.
#[inline]
pub fn seconds_to_samples(seconds: f32, sample_rate: f32) -> u32 {
    let samples = (seconds as f64 * sample_rate as f64).round();
    if samples <= 0.0 {
        0
    } else if samples >= u32::MAX as f64 {
        u32::MAX
    } else {
        samples as u32
    }
}
