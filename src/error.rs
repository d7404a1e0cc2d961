//! Errors returned by the non-realtime parts of the API.
//!
//! The audio path never returns these: out-of-range input there is ignored
//! so a bad event can never cost a deadline.

/// Everything that can go wrong outside the render call.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineError {
    /// Note numbers are 0..=127.
    NoteOutOfRange { note: u8 },

    /// Velocities are 0..=127.
    VelocityOutOfRange { velocity: u8 },

    /// Raw parameter address with no matching parameter.
    UnknownParameter { address: u64 },

    /// Sample rate must be finite and positive.
    InvalidSampleRate { sample_rate: f32 },

    /// The renderer writes a stereo pair, so at least two channels are needed.
    UnsupportedChannelCount { channels: usize },

    /// Wave tables need at least one entry.
    InvalidWaveformSize { size: usize },

    /// Write past the end of the wave table.
    WaveformIndexOutOfRange { index: usize, size: usize },

    /// The control queue to the audio thread is full.
    QueueFull,

    /// Some other configuration field is unusable.
    InvalidConfig { reason: &'static str },
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineError::NoteOutOfRange { note } => {
                write!(f, "Note {} is outside 0..=127", note)
            }
            EngineError::VelocityOutOfRange { velocity } => {
                write!(f, "Velocity {} is outside 0..=127", velocity)
            }
            EngineError::UnknownParameter { address } => {
                write!(f, "No parameter at address {}", address)
            }
            EngineError::InvalidSampleRate { sample_rate } => {
                write!(f, "Invalid sample rate {}", sample_rate)
            }
            EngineError::UnsupportedChannelCount { channels } => {
                write!(f, "Need at least 2 output channels, got {}", channels)
            }
            EngineError::InvalidWaveformSize { size } => {
                write!(f, "Invalid wave table size {}", size)
            }
            EngineError::WaveformIndexOutOfRange { index, size } => {
                write!(f, "Wave table index {} out of range for size {}", index, size)
            }
            EngineError::QueueFull => write!(f, "Control queue is full"),
            EngineError::InvalidConfig { reason } => {
                write!(f, "Invalid engine config: {}", reason)
            }
        }
    }
}

impl std::error::Error for EngineError {}

/// Result type used across the crate.
pub type Result<T> = std::result::Result<T, EngineError>;
