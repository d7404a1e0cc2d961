//! Low-level DSP primitives used by the voice bank.
//!
//! These components are allocation-free once constructed and realtime-safe,
//! so voices can embed them directly. They stay focused on the signal math;
//! envelope sequencing and list bookkeeping live in `synth`.

/// Output gain staging.
pub mod gain;
/// Two-operator FM oscillator and its shared wave table.
pub mod oscillator;
/// Linear parameter ramps (smoothing) for host and UI changes.
pub mod ramper;

pub use oscillator::{FmOscillator, WaveTable};
pub use ramper::ParamRamper;
