use crate::{
    synth::{
        active_list::ActiveList,
        voice::{EnvStage, RenderCtx, Voice, VoiceStatus},
    },
    NUM_NOTES,
};

/// Fixed pool of one voice per MIDI note, plus the list of voices that are
/// currently sounding.
///
/// The note number is the voice's identity: it indexes the pool and the
/// active list alike and is never reassigned. Nothing here allocates after
/// [`VoiceBank::new`], and out-of-range notes are ignored rather than
/// indexed, so every method is safe to call from the audio thread.
pub struct VoiceBank {
    voices: Vec<Voice>,
    active: ActiveList,
    attack_samples: u32,
    release_samples: u32,
}

impl VoiceBank {
    pub fn new() -> Self {
        let voices = (0..NUM_NOTES).map(|_| Voice::new()).collect();

        Self {
            voices,
            active: ActiveList::new(NUM_NOTES),
            attack_samples: 0,
            release_samples: 0,
        }
    }

    /// Ramp lengths used by the next trigger/release.
    pub fn set_ramp_samples(&mut self, attack_samples: u32, release_samples: u32) {
        self.attack_samples = attack_samples;
        self.release_samples = release_samples;
    }

    pub fn attack_samples(&self) -> u32 {
        self.attack_samples
    }

    pub fn release_samples(&self) -> u32 {
        self.release_samples
    }

    /// Note-on. Velocity 0 is a release.
    pub fn trigger(&mut self, note: u8, velocity: u8) {
        if velocity == 0 {
            self.release(note);
            return;
        }

        let slot = note as usize;
        let Some(voice) = self.voices.get_mut(slot) else {
            return;
        };

        if voice.stage() == EnvStage::Off {
            self.active.push_front(slot);
            voice.activate();
        }
        voice.note_on(note, velocity, self.attack_samples);
    }

    /// Note-off. Only voices in Attack or Sustain react.
    pub fn release(&mut self, note: u8) {
        if let Some(voice) = self.voices.get_mut(note as usize) {
            voice.note_off(self.release_samples);
        }
    }

    /// Hard silence. Every voice drops to Off at level 0 without a release
    /// ramp and the active list is emptied in one step.
    pub fn all_notes_off(&mut self) {
        for voice in &mut self.voices {
            voice.silence();
        }
        self.active.clear();
    }

    /// Add every active voice into the output. The buffers are not cleared
    /// here; voices accumulate.
    pub fn render(&mut self, out_left: &mut [f32], out_right: &mut [f32], ctx: &RenderCtx) {
        let mut cursor = self.active.head();

        while let Some(slot) = cursor {
            // Read the link before the voice can unlink itself
            cursor = self.active.next(slot);

            match self.voices[slot].run(out_left, out_right, ctx) {
                VoiceStatus::Sounding => {}
                VoiceStatus::Finished => self.active.remove(slot),
                VoiceStatus::Idle => {
                    log::error!("voice {} is Off but still on the active list", slot);
                    debug_assert!(false, "voice {slot} is Off but still on the active list");
                    self.active.remove(slot);
                }
            }
        }
    }

    pub fn voice(&self, note: u8) -> Option<&Voice> {
        self.voices.get(note as usize)
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    /// Notes on the active list, most recently started first.
    pub fn active_notes(&self) -> impl Iterator<Item = u8> + '_ {
        self.active.iter().map(|slot| slot as u8)
    }
}

impl Default for VoiceBank {
    fn default() -> Self {
        Self::new()
    }
}
