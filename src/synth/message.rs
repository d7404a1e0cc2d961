#[cfg(feature = "rtrb")]
use rtrb::Consumer;

use crate::synth::params::ParamAddress;

/// Control events applied by the engine at the start of a block.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum SynthMessage {
    NoteOn { note: u8, velocity: u8 },
    NoteOff { note: u8 },
    AllNotesOff,
    /// Immediate, clamped.
    SetImmediate { address: ParamAddress, value: f32 },
    /// UI value; the engine dezippers toward it.
    SetParameter { address: ParamAddress, value: f32 },
    StartRamp { address: ParamAddress, value: f32, steps: u32 },
    Reset,
}

pub trait MessageReceiver {
    fn pop(&mut self) -> Option<SynthMessage>;
}

#[cfg(feature = "rtrb")]
impl MessageReceiver for Consumer<SynthMessage> {
    fn pop(&mut self) -> Option<SynthMessage> {
        Consumer::pop(self).ok()
    }
}
