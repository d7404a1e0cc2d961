#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{engine::FmEngine, synth::params::ParamAddress};

/// A named set of the seven bank-wide parameters.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, PartialEq)]
pub struct FmPatch {
    pub name: String,
    pub carrier_multiplier: f32,
    pub modulating_multiplier: f32,
    pub modulation_index: f32,
    pub attack_duration: f32,
    pub release_duration: f32,
    pub detuning_offset: f32,
    pub detuning_multiplier: f32,
}

impl FmPatch {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Snapshot the engine's logical (UI) values.
    pub fn capture(engine: &FmEngine) -> Self {
        let mut patch = Self::default();
        for address in ParamAddress::ALL {
            patch.set(address, engine.get_parameter(address));
        }
        patch
    }

    /// Load every parameter into the engine immediately, clamped to range.
    pub fn apply(&self, engine: &mut FmEngine) {
        for address in ParamAddress::ALL {
            engine.set_immediate(address, self.get(address));
        }
    }

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
        match address {
            ParamAddress::CarrierMultiplier => self.carrier_multiplier = value,
            ParamAddress::ModulatingMultiplier => self.modulating_multiplier = value,
            ParamAddress::ModulationIndex => self.modulation_index = value,
            ParamAddress::AttackDuration => self.attack_duration = value,
            ParamAddress::ReleaseDuration => self.release_duration = value,
            ParamAddress::DetuningOffset => self.detuning_offset = value,
            ParamAddress::DetuningMultiplier => self.detuning_multiplier = value,
        }
    }

    // ----- Presets -----

    /// Soft electric piano: 1:1 ratio, gentle index, short release.
    pub fn electric_piano() -> Self {
        Self {
            name: "electric piano".into(),
            carrier_multiplier: 1.0,
            modulating_multiplier: 1.0,
            modulation_index: 1.8,
            attack_duration: 0.005,
            release_duration: 0.4,
            ..Self::default()
        }
    }

    /// Inharmonic bell: 1:3.5 ratio with a long tail.
    pub fn bell() -> Self {
        Self {
            name: "bell".into(),
            carrier_multiplier: 1.0,
            modulating_multiplier: 3.5,
            modulation_index: 4.0,
            attack_duration: 0.001,
            release_duration: 2.5,
            ..Self::default()
        }
    }

    /// Slightly detuned pad with slow edges.
    pub fn pad() -> Self {
        Self {
            name: "pad".into(),
            carrier_multiplier: 1.0,
            modulating_multiplier: 2.0,
            modulation_index: 0.6,
            attack_duration: 0.8,
            release_duration: 1.5,
            detuning_offset: 1.5,
            ..Self::default()
        }
    }

    pub fn presets() -> Vec<FmPatch> {
        vec![
            Self::default(),
            Self::electric_piano(),
            Self::bell(),
            Self::pad(),
        ]
    }
}

impl Default for FmPatch {
    fn default() -> Self {
        Self {
            name: "init".into(),
            carrier_multiplier: ParamAddress::CarrierMultiplier.default_value(),
            modulating_multiplier: ParamAddress::ModulatingMultiplier.default_value(),
            modulation_index: ParamAddress::ModulationIndex.default_value(),
            attack_duration: ParamAddress::AttackDuration.default_value(),
            release_duration: ParamAddress::ReleaseDuration.default_value(),
            detuning_offset: ParamAddress::DetuningOffset.default_value(),
            detuning_multiplier: ParamAddress::DetuningMultiplier.default_value(),
        }
    }
}
