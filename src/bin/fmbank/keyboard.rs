//! Computer keyboard to MIDI note mapping
//!
//! Two rows laid out like a piano octave:
//!
//! ```text
//!  w e   t y u
//! a s d f g h j k
//! C D E F G A B C
//! ```

const KEYS: [(char, u8); 13] = [
    ('a', 0),
    ('w', 1),
    ('s', 2),
    ('e', 3),
    ('d', 4),
    ('f', 5),
    ('t', 6),
    ('g', 7),
    ('y', 8),
    ('h', 9),
    ('u', 10),
    ('j', 11),
    ('k', 12),
];

const MIN_OCTAVE: i8 = 0;
const MAX_OCTAVE: i8 = 8;

pub struct Keyboard {
    octave: i8,
}

impl Keyboard {
    pub fn new() -> Self {
        Self { octave: 4 }
    }

    /// Note for a key in the current octave. `a` in octave 4 is middle C (60).
    pub fn note_for(&self, key: char) -> Option<u8> {
        let key = key.to_ascii_lowercase();
        let (_, semitone) = KEYS.iter().find(|(k, _)| *k == key)?;
        let note = (self.octave as i16 + 1) * 12 + *semitone as i16;
        u8::try_from(note).ok().filter(|note| *note <= 127)
    }

    pub fn octave(&self) -> i8 {
        self.octave
    }

    pub fn octave_down(&mut self) {
        self.octave = (self.octave - 1).max(MIN_OCTAVE);
    }

    pub fn octave_up(&mut self) {
        self.octave = (self.octave + 1).min(MAX_OCTAVE);
    }
}

/// "C4", "F#2" ...
pub fn note_name(note: u8) -> String {
    const NAMES: [&str; 12] = [
        "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
    ];
    let octave = note as i16 / 12 - 1;
    format!("{}{}", NAMES[note as usize % 12], octave)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn home_row_starts_at_middle_c() {
        let keyboard = Keyboard::new();
        assert_eq!(keyboard.note_for('a'), Some(60));
        assert_eq!(keyboard.note_for('W'), Some(61));
        assert_eq!(keyboard.note_for('k'), Some(72));
        assert_eq!(keyboard.note_for('q'), None);
    }

    #[test]
    fn octaves_shift_and_stop_at_the_edges() {
        let mut keyboard = Keyboard::new();
        for _ in 0..10 {
            keyboard.octave_up();
        }
        assert_eq!(keyboard.octave(), MAX_OCTAVE);
        assert_eq!(keyboard.note_for('k'), Some(120));

        for _ in 0..10 {
            keyboard.octave_down();
        }
        assert_eq!(keyboard.note_for('a'), Some(12));
    }

    #[test]
    fn names() {
        assert_eq!(note_name(60), "C4");
        assert_eq!(note_name(69), "A4");
        assert_eq!(note_name(0), "C-1");
    }
}
