use crate::{
    dsp::oscillator::{FmOscillator, WaveTable},
    synth::params::GlobalParams,
};

/*
Voice Envelope
==============

Every voice carries a linear attack/sustain/release envelope that is advanced
one sample at a time inside the render call.

    Level
     1.0 ┐      ______________
         │     ╱              ╲
         │    ╱                ╲
     0.0 └───╱──────────────────╲───→ Time
          Attack    Sustain    Release

  Off      not sounding, not on the active list
  Attack   level walks toward 1.0 over `attack_samples`
  Sustain  level holds, no timeout
  Release  level walks toward 0.0 over `release_samples`, then Off

Ramps always start from the CURRENT level. A retrigger during Release glides
back up from wherever the level was; a release during Attack decays from the
partial level. Neither ever jumps.

Each ramp is described by a slope and a remaining sample count:

    slope = (target - level) / ramp_samples

The render loop processes at most `ramp_samples` frames before looking at
the stage again, so a stage boundary can fall anywhere inside a block.
*/

/// Envelope stage of a voice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvStage {
    Off,
    Attack,
    Sustain,
    Release,
}

/// What a render call left the voice in. The bank uses this to keep the
/// active list in step with the stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceStatus {
    /// Still sounding, stays on the active list.
    Sounding,
    /// Release finished during this call; unlink it.
    Finished,
    /// Rendered while Off. Only a corrupted active list gets here.
    Idle,
}

/// Read-only state every voice sees during one block.
pub struct RenderCtx<'a> {
    pub sample_rate: f32,
    pub table: &'a WaveTable,
    pub params: GlobalParams,
}

/// Convert MIDI note number to frequency in Hz.
/// A4 = 440 Hz = MIDI note 69
#[inline]
pub fn midi_note_to_freq(note: u8) -> f32 {
    440.0 * 2.0_f32.powf((note as f32 - 69.0) / 12.0)
}

/// Perceptual velocity curve: amplitude = (velocity / 127)^2
#[inline]
pub fn velocity_to_amplitude(velocity: u8) -> f32 {
    let v = velocity as f32 / 127.0;
    v * v
}

/// One note's worth of synthesis state, pooled by the bank.
#[derive(Debug, Clone)]
pub struct Voice {
    oscillator: Option<FmOscillator>,
    frequency: f32,
    stage: EnvStage,
    env_level: f64,
    env_slope: f64,
    env_ramp_samples: u32,
}

impl Voice {
    pub fn new() -> Self {
        Self {
            oscillator: None,
            frequency: 0.0,
            stage: EnvStage::Off,
            env_level: 0.0,
            env_slope: 0.0,
            env_ramp_samples: 0,
        }
    }

    /// Fresh oscillator for a voice coming out of Off.
    pub(crate) fn activate(&mut self) {
        self.oscillator = Some(FmOscillator::new());
    }

    /// Start (or restart) the attack ramp from the current level.
    pub(crate) fn note_on(&mut self, note: u8, velocity: u8, attack_samples: u32) {
        self.frequency = midi_note_to_freq(note);
        let oscillator = self.oscillator.get_or_insert_with(FmOscillator::new);
        oscillator.amplitude = velocity_to_amplitude(velocity);

        self.stage = EnvStage::Attack;
        self.env_ramp_samples = attack_samples;
        self.env_slope = ramp_slope(self.env_level, 1.0, attack_samples);
    }

    /// Start the release ramp. Ignored unless the voice is in Attack or
    /// Sustain.
    pub(crate) fn note_off(&mut self, release_samples: u32) {
        if !matches!(self.stage, EnvStage::Attack | EnvStage::Sustain) {
            return;
        }

        self.stage = EnvStage::Release;
        self.env_ramp_samples = release_samples;
        self.env_slope = ramp_slope(self.env_level, 0.0, release_samples);
    }

    /// Hard silence: Off at level 0, no ramp. The oscillator is left for the
    /// next activation to replace.
    pub(crate) fn silence(&mut self) {
        self.stage = EnvStage::Off;
        self.env_level = 0.0;
        self.env_slope = 0.0;
        self.env_ramp_samples = 0;
    }

    /// Release finished: Off, and the oscillator goes away.
    fn finish(&mut self) {
        self.silence();
        self.oscillator = None;
    }

    /// Render `out_left.len()` frames, adding into both channels.
    pub fn run(&mut self, out_left: &mut [f32], out_right: &mut [f32], ctx: &RenderCtx) -> VoiceStatus {
        debug_assert_eq!(out_left.len(), out_right.len());

        if self.stage == EnvStage::Off {
            return VoiceStatus::Idle;
        }
        let Some(oscillator) = self.oscillator.as_mut() else {
            return VoiceStatus::Idle;
        };

        oscillator.frequency = ctx.params.detune(self.frequency);
        oscillator.carrier = ctx.params.carrier_multiplier;
        oscillator.modulator = ctx.params.modulating_multiplier;
        oscillator.index = ctx.params.modulation_index;

        let frames = out_left.len().min(out_right.len());
        let mut offset = 0;

        while offset < frames {
            let remaining = frames - offset;

            match self.stage {
                EnvStage::Off => return VoiceStatus::Idle,

                EnvStage::Attack => {
                    if self.env_ramp_samples == 0 {
                        self.env_level = 1.0;
                        self.stage = EnvStage::Sustain;
                        continue;
                    }

                    let this_time = remaining.min(self.env_ramp_samples as usize);
                    render_frames(
                        oscillator,
                        &mut self.env_level,
                        self.env_slope,
                        &mut out_left[offset..offset + this_time],
                        &mut out_right[offset..offset + this_time],
                        ctx,
                    );
                    offset += this_time;
                    self.env_ramp_samples -= this_time as u32;

                    if self.env_ramp_samples == 0 {
                        self.env_level = 1.0;
                        self.stage = EnvStage::Sustain;
                    }
                }

                EnvStage::Sustain => {
                    render_frames(
                        oscillator,
                        &mut self.env_level,
                        0.0,
                        &mut out_left[offset..frames],
                        &mut out_right[offset..frames],
                        ctx,
                    );
                    offset = frames;
                }

                EnvStage::Release => {
                    if self.env_ramp_samples == 0 {
                        self.finish();
                        return VoiceStatus::Finished;
                    }

                    let this_time = remaining.min(self.env_ramp_samples as usize);
                    render_frames(
                        oscillator,
                        &mut self.env_level,
                        self.env_slope,
                        &mut out_left[offset..offset + this_time],
                        &mut out_right[offset..offset + this_time],
                        ctx,
                    );
                    offset += this_time;
                    self.env_ramp_samples -= this_time as u32;

                    if self.env_ramp_samples == 0 {
                        self.finish();
                        return VoiceStatus::Finished;
                    }
                }
            }
        }

        VoiceStatus::Sounding
    }

    pub fn stage(&self) -> EnvStage {
        self.stage
    }

    pub fn is_sounding(&self) -> bool {
        self.stage != EnvStage::Off
    }

    pub fn env_level(&self) -> f64 {
        self.env_level
    }

    pub fn env_slope(&self) -> f64 {
        self.env_slope
    }

    pub fn env_ramp_samples(&self) -> u32 {
        self.env_ramp_samples
    }

    /// Undetuned frequency of the last note-on.
    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    pub fn oscillator(&self) -> Option<&FmOscillator> {
        self.oscillator.as_ref()
    }
}

impl Default for Voice {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-sample delta that walks `from` to `to` in `samples` steps. A zero
/// length ramp gets no slope; the stage boundary is taken immediately.
#[inline]
fn ramp_slope(from: f64, to: f64, samples: u32) -> f64 {
    if samples == 0 {
        0.0
    } else {
        (to - from) / samples as f64
    }
}

#[inline]
fn render_frames(
    oscillator: &mut FmOscillator,
    level: &mut f64,
    slope: f64,
    out_left: &mut [f32],
    out_right: &mut [f32],
    ctx: &RenderCtx,
) {
    for (left, right) in out_left.iter_mut().zip(out_right.iter_mut()) {
        let x = oscillator.compute(ctx.table, ctx.sample_rate) as f64;
        let sample = (*level * x) as f32;
        *left += sample;
        *right += sample;
        *level += slope;
    }
}
