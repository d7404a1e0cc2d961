use rtrb::Producer;

use crate::{
    error::{EngineError, Result},
    synth::{params::ParamAddress, SynthMessage},
};

/// Control-thread side of the engine's message queue.
///
/// Every call is wait-free: it pushes one message into the ring buffer and
/// returns. The engine applies queued messages, in order, at the start of its
/// next block. A full queue is reported as [`EngineError::QueueFull`] and the
/// message is dropped.
pub struct EngineHandle {
    tx: Producer<SynthMessage>,
}

impl EngineHandle {
    pub(crate) fn new(tx: Producer<SynthMessage>) -> Self {
        Self { tx }
    }

    pub fn note_on(&mut self, note: u8, velocity: u8) -> Result<()> {
        if note > 127 {
            return Err(EngineError::NoteOutOfRange { note });
        }
        if velocity > 127 {
            return Err(EngineError::VelocityOutOfRange { velocity });
        }
        self.send(SynthMessage::NoteOn { note, velocity })
    }

    pub fn note_off(&mut self, note: u8) -> Result<()> {
        if note > 127 {
            return Err(EngineError::NoteOutOfRange { note });
        }
        self.send(SynthMessage::NoteOff { note })
    }

    pub fn all_notes_off(&mut self) -> Result<()> {
        self.send(SynthMessage::AllNotesOff)
    }

    /// UI-style set, dezippered by the engine.
    pub fn set_parameter(&mut self, address: ParamAddress, value: f32) -> Result<()> {
        self.send(SynthMessage::SetParameter { address, value })
    }

    pub fn set_immediate(&mut self, address: ParamAddress, value: f32) -> Result<()> {
        self.send(SynthMessage::SetImmediate { address, value })
    }

    /// Ramp over `steps` blocks.
    pub fn start_ramp(&mut self, address: ParamAddress, value: f32, steps: u32) -> Result<()> {
        self.send(SynthMessage::StartRamp {
            address,
            value,
            steps,
        })
    }

    pub fn reset(&mut self) -> Result<()> {
        self.send(SynthMessage::Reset)
    }

    pub fn send(&mut self, message: SynthMessage) -> Result<()> {
        self.tx.push(message).map_err(|_| {
            log::warn!("fm engine: control queue full, dropped {:?}", message);
            EngineError::QueueFull
        })
    }

    /// Free slots left in the queue.
    pub fn slots(&self) -> usize {
        self.tx.slots()
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        config::EngineConfig,
        engine::FmEngine,
        error::EngineError,
        synth::{params::ParamAddress, EnvStage},
    };

    fn pair(capacity: usize) -> (FmEngine, super::EngineHandle) {
        let config = EngineConfig {
            sample_rate: 1_000.0,
            message_capacity: capacity,
            ..EngineConfig::default()
        };
        FmEngine::with_handle(config).expect("valid config")
    }

    fn block(engine: &mut FmEngine) {
        let mut left = [0.0; 16];
        let mut right = [0.0; 16];
        engine.render(&mut left, &mut right);
    }

    #[test]
    fn messages_apply_at_the_next_block() {
        let (mut engine, mut handle) = pair(16);
        handle.note_on(60, 100).expect("queue has room");
        handle.note_on(64, 100).expect("queue has room");
        handle.set_immediate(ParamAddress::ModulationIndex, 3.0).expect("queue has room");

        assert_eq!(engine.active_voice_count(), 0);
        block(&mut engine);

        assert_eq!(engine.active_notes().collect::<Vec<_>>(), vec![64, 60]);
        assert_eq!(engine.params().modulation_index, 3.0);

        // Zero release: the voice finishes in the block that applies it
        handle.note_off(60).expect("queue has room");
        block(&mut engine);
        assert_eq!(engine.active_notes().collect::<Vec<_>>(), vec![64]);
    }

    #[test]
    fn full_queue_reports_and_drops() {
        let (mut engine, mut handle) = pair(2);
        handle.note_on(60, 100).expect("queue has room");
        handle.note_on(62, 100).expect("queue has room");
        assert_eq!(handle.slots(), 0);
        assert_eq!(handle.note_on(64, 100), Err(EngineError::QueueFull));

        block(&mut engine);
        assert_eq!(engine.active_voice_count(), 2);
        assert_eq!(handle.slots(), 2);
    }

    #[test]
    fn out_of_range_notes_never_reach_the_queue() {
        let (_engine, mut handle) = pair(4);
        assert_eq!(
            handle.note_on(130, 1),
            Err(EngineError::NoteOutOfRange { note: 130 })
        );
        assert_eq!(
            handle.note_on(1, 130),
            Err(EngineError::VelocityOutOfRange { velocity: 130 })
        );
        assert_eq!(handle.slots(), 4);
    }

    #[test]
    fn queued_reset_and_panic() {
        let (mut engine, mut handle) = pair(8);
        handle.note_on(60, 100).expect("queue has room");
        handle.start_ramp(ParamAddress::CarrierMultiplier, 10.0, 50).expect("queue has room");
        block(&mut engine);
        assert!(engine.is_ramping(ParamAddress::CarrierMultiplier));

        handle.all_notes_off().expect("queue has room");
        block(&mut engine);
        assert_eq!(engine.voice(60).map(|v| v.stage()), Some(EnvStage::Off));

        handle.reset().expect("queue has room");
        block(&mut engine);
        assert!(!engine.is_ramping(ParamAddress::CarrierMultiplier));
        assert_eq!(engine.get_parameter(ParamAddress::CarrierMultiplier), 1.0);
    }
}
