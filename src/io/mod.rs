// Purpose - external interfaces: MIDI decoding and the host output buffer

pub mod converter;
pub mod midi;

/// Planar output: one buffer per channel. The engine writes channels 0 and
/// 1 and silences any others.
#[derive(Debug, Default, Clone)]
pub struct AudioOutput {
    pub buffers: Vec<Vec<f32>>,
}

impl AudioOutput {
    /// `channels` zeroed buffers of `frames` samples each.
    pub fn new(channels: usize, frames: usize) -> Self {
        Self {
            buffers: vec![vec![0.0; frames]; channels],
        }
    }

    pub fn channels(&self) -> usize {
        self.buffers.len()
    }

    /// Shortest channel length, i.e. how many frames can be rendered.
    pub fn frames(&self) -> usize {
        self.buffers.iter().map(Vec::len).min().unwrap_or(0)
    }

    pub fn channel(&self, index: usize) -> Option<&[f32]> {
        self.buffers.get(index).map(Vec::as_slice)
    }
}
