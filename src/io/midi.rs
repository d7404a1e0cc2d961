//! Decoding of already-framed 3-byte channel messages.

/// Controller number of the "All Notes Off" channel-mode message.
pub const CC_ALL_NOTES_OFF: u8 = 123;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MidiEvent {
    NoteOn { channel: u8, key: u8, velocity: u8 },
    NoteOff { channel: u8, key: u8, velocity: u8 },
    ControlChange { channel: u8, controller: u8, value: u8 },
}

impl MidiEvent {
    /// Decode one message. Anything that is not exactly three bytes, carries
    /// a data byte above 127, or has an unhandled status is `None`.
    pub fn parse(bytes: &[u8]) -> Option<Self> {
        let &[status, data1, data2] = bytes else {
            return None;
        };
        let channel = status & 0x0F;

        match status & 0xF0 {
            0x80 if data1 <= 127 => Some(MidiEvent::NoteOff {
                channel,
                key: data1,
                velocity: data2,
            }),
            0x90 if data1 <= 127 && data2 <= 127 => Some(MidiEvent::NoteOn {
                channel,
                key: data1,
                velocity: data2,
            }),
            0xB0 if data1 <= 127 => Some(MidiEvent::ControlChange {
                channel,
                controller: data1,
                value: data2,
            }),
            _ => None,
        }
    }

    pub fn channel(&self) -> u8 {
        match *self {
            MidiEvent::NoteOn { channel, .. }
            | MidiEvent::NoteOff { channel, .. }
            | MidiEvent::ControlChange { channel, .. } => channel,
        }
    }
}
