pub mod config;
pub mod dsp; // Oscillator, ramps, gain
pub mod engine; // Block renderer and control surface
pub mod error;
pub mod io; // MIDI decoding and output buffers
pub mod patch;
pub mod synth; // Voice pool, envelopes and bank-wide parameters

pub use config::EngineConfig;
#[cfg(feature = "rtrb")]
pub use engine::handle::EngineHandle;
pub use engine::FmEngine;
pub use error::EngineError;
pub use io::AudioOutput;
pub use patch::FmPatch;
pub use synth::{EnvStage, GlobalParams, ParamAddress, SynthMessage};

/// One voice per MIDI note.
pub const NUM_NOTES: usize = 128;
pub const MAX_BLOCK_SIZE: usize = 2048;
