//! Table-lookup FM oscillator.

use std::f32::consts::TAU;

/*
Two-Operator FM
===============

A frequency-modulation oscillator runs two phase accumulators over the same
wave table. The modulator's output bends the carrier's instantaneous
frequency; the louder the modulator, the more sidebands appear around the
carrier and the brighter the tone.

Vocabulary
----------

  frequency     The note's base pitch in Hz.

  carrier       Ratio applied to the base pitch for the audible operator.
                carrier_hz = frequency * carrier

  modulator     Ratio applied to the base pitch for the modulating operator.
                modulator_hz = frequency * modulator

  index         Modulation depth. The carrier's frequency deviates by
                index * modulator_hz around carrier_hz.

  amplitude     Output scale, applied after the carrier lookup.


Per Sample
----------

    m      = table(mod_phase)
    inst   = carrier_hz + index * modulator_hz * m
    out    = amplitude * table(car_phase)

    mod_phase += modulator_hz / sample_rate
    car_phase += inst / sample_rate

Phases live in [0, 1) and wrap. Lookups interpolate linearly between table
entries, wrapping around the end of the table.
*/

/// Single-cycle waveform shared by every oscillator in the bank.
#[derive(Debug, Clone)]
pub struct WaveTable {
    samples: Vec<f32>,
}

impl WaveTable {
    /// One cycle of a sine wave.
    pub fn sine(size: usize) -> Self {
        let samples = (0..size)
            .map(|i| (TAU * i as f32 / size as f32).sin())
            .collect();
        Self { samples }
    }

    /// A silent table of `size` entries, to be filled with [`set`](Self::set).
    pub fn zeroed(size: usize) -> Self {
        Self {
            samples: vec![0.0; size],
        }
    }

    /// Write one table entry. Returns `false` when `index` is out of range.
    pub fn set(&mut self, index: usize, value: f32) -> bool {
        match self.samples.get_mut(index) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.samples
    }

    /// Read the table at a normalised phase in [0, 1).
    #[inline]
    pub fn lookup(&self, phase: f32) -> f32 {
        let len = self.samples.len();
        if len == 0 {
            return 0.0;
        }

        let position = phase * len as f32;
        let index = position as usize % len;
        let frac = position - position.floor();
        let a = self.samples[index];
        let b = self.samples[(index + 1) % len];
        a + (b - a) * frac
    }
}

/// Per-voice FM operator pair. Holds only phase and settings, the table is
/// borrowed at compute time.
#[derive(Debug, Clone)]
pub struct FmOscillator {
    pub frequency: f32,
    pub amplitude: f32,
    pub carrier: f32,
    pub modulator: f32,
    pub index: f32,
    car_phase: f32,
    mod_phase: f32,
}

impl FmOscillator {
    pub fn new() -> Self {
        Self {
            frequency: 0.0,
            amplitude: 0.0,
            carrier: 1.0,
            modulator: 1.0,
            index: 1.0,
            car_phase: 0.0,
            mod_phase: 0.0,
        }
    }

    /// Produce one output sample and advance both phases.
    #[inline]
    pub fn compute(&mut self, table: &WaveTable, sample_rate: f32) -> f32 {
        let carrier_hz = self.frequency * self.carrier;
        let modulator_hz = self.frequency * self.modulator;

        let modulation = table.lookup(self.mod_phase);
        let instantaneous = carrier_hz + self.index * modulator_hz * modulation;
        let out = self.amplitude * table.lookup(self.car_phase);

        self.mod_phase = wrap_phase(self.mod_phase + modulator_hz / sample_rate);
        self.car_phase = wrap_phase(self.car_phase + instantaneous / sample_rate);

        out
    }
}

impl Default for FmOscillator {
    fn default() -> Self {
        Self::new()
    }
}

#[inline]
fn wrap_phase(phase: f32) -> f32 {
    let wrapped = phase - phase.floor();
    // floor() of a tiny negative value can round the result up to exactly 1.0
    if wrapped >= 1.0 {
        0.0
    } else {
        wrapped
    }
}
