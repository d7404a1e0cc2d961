use crate::{
    io::midi::{MidiEvent, CC_ALL_NOTES_OFF},
    synth::message::SynthMessage,
};

/// Map a decoded MIDI event onto a synth message. `channel_filter` of `None`
/// listens on every channel.
pub fn midi_to_synth(midi: MidiEvent, channel_filter: Option<u8>) -> Option<SynthMessage> {
    if channel_filter.is_some_and(|channel| channel != midi.channel()) {
        return None;
    }

    match midi {
        MidiEvent::NoteOn { key, velocity, .. } => Some(SynthMessage::NoteOn {
            note: key,
            velocity,
        }),
        MidiEvent::NoteOff { key, .. } => Some(SynthMessage::NoteOff { note: key }),
        MidiEvent::ControlChange { controller, .. } if controller == CC_ALL_NOTES_OFF => {
            Some(SynthMessage::AllNotesOff)
        }
        MidiEvent::ControlChange { .. } => None,
    }
}
