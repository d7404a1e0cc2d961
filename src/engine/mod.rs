// Purpose - the audio-thread owner of the voice bank: parameter surface,
// note control and the per-block render pipeline

#[cfg(feature = "rtrb")]
pub mod handle;

#[cfg(feature = "rtrb")]
use rtrb::RingBuffer;

#[cfg(feature = "rtrb")]
use self::handle::EngineHandle;
use crate::{
    config::EngineConfig,
    dsp::{
        gain::{apply_gain, MASTER_GAIN},
        oscillator::WaveTable,
        ramper::ParamRamper,
    },
    error::{EngineError, Result},
    io::{converter::midi_to_synth, midi::MidiEvent, AudioOutput},
    synth::{
        message::MessageReceiver,
        params::{seconds_to_samples, GlobalParams, ParamAddress},
        voice::{RenderCtx, Voice},
        SynthMessage, VoiceBank,
    },
};

/*
Block Pipeline
==============

The engine renders in blocks. Everything that changes the sound is applied
at a block boundary, never in the middle of one:

    drain queued messages        note on/off, parameter changes, reset
            │
    dezipper check               UI changes become short ramps
            │
    step every ramper once       one smoothing step per block
            │
    derive ramp lengths          attack/release seconds → samples
            │
    zero the region              all channels
            │
    walk the active list         each voice adds into left/right
            │
    master gain (0.5)

Parameter smoothing therefore runs at block rate: a ramp of N steps lasts N
blocks, whatever the block size.
*/

/// A polyphonic two-operator FM instrument.
///
/// The engine belongs to the audio thread; every mutation takes `&mut self`.
/// Other threads talk to it through an [`EngineHandle`], whose messages are
/// applied at the start of the next block.
pub struct FmEngine {
    config: EngineConfig,
    table: WaveTable,
    bank: VoiceBank,
    rampers: [ParamRamper; ParamAddress::COUNT],
    params: GlobalParams,
    output: Option<AudioOutput>,
    receiver: Option<Box<dyn MessageReceiver + Send>>,
    fresh: bool,
}

impl FmEngine {
    /// Engine with default settings for `channels` outputs at `sample_rate`.
    pub fn init(channels: usize, sample_rate: f32) -> Result<Self> {
        Self::new(EngineConfig::new(channels, sample_rate))
    }

    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;

        let rampers = ParamAddress::ALL.map(|address| ParamRamper::new(address.default_value()));
        let output = AudioOutput::new(config.channels, config.max_block_size);

        log::debug!(
            "fm engine: {} channels at {} Hz, {}-entry table",
            config.channels,
            config.sample_rate,
            config.waveform_size
        );

        let mut engine = Self {
            table: WaveTable::sine(config.waveform_size),
            bank: VoiceBank::new(),
            rampers,
            params: GlobalParams::default(),
            output: Some(output),
            receiver: None,
            fresh: true,
            config,
        };
        engine.sync_ramp_samples();
        Ok(engine)
    }

    /// Engine plus the control handle feeding it.
    #[cfg(feature = "rtrb")]
    pub fn with_handle(config: EngineConfig) -> Result<(Self, EngineHandle)> {
        let mut engine = Self::new(config)?;
        let (tx, rx) = RingBuffer::<SynthMessage>::new(engine.config.message_capacity);
        engine.attach_receiver(rx);
        Ok((engine, EngineHandle::new(tx)))
    }

    /// Install the queue drained at the start of every block. Replaces any
    /// previous receiver.
    pub fn attach_receiver<R>(&mut self, receiver: R)
    where
        R: MessageReceiver + Send + 'static,
    {
        self.receiver = Some(Box::new(receiver));
    }

    // ----- Waveform -----

    /// Replace the wave table with `size` zeroed entries, to be filled with
    /// [`set_waveform_value`](Self::set_waveform_value). Allocates; call it
    /// off the audio path.
    pub fn setup_waveform(&mut self, size: usize) -> Result<()> {
        if size == 0 {
            return Err(EngineError::InvalidWaveformSize { size });
        }
        self.table = WaveTable::zeroed(size);
        log::debug!("fm engine: waveform resized to {size} entries");
        Ok(())
    }

    pub fn set_waveform_value(&mut self, index: usize, value: f32) -> Result<()> {
        if self.table.set(index, value) {
            Ok(())
        } else {
            Err(EngineError::WaveformIndexOutOfRange {
                index,
                size: self.table.len(),
            })
        }
    }

    pub fn waveform(&self) -> &WaveTable {
        &self.table
    }

    // ----- Parameters -----

    pub fn set_carrier_multiplier(&mut self, value: f32) {
        self.set_immediate(ParamAddress::CarrierMultiplier, value);
    }

    pub fn set_modulating_multiplier(&mut self, value: f32) {
        self.set_immediate(ParamAddress::ModulatingMultiplier, value);
    }

    pub fn set_modulation_index(&mut self, value: f32) {
        self.set_immediate(ParamAddress::ModulationIndex, value);
    }

    pub fn set_attack_duration(&mut self, seconds: f32) {
        self.set_immediate(ParamAddress::AttackDuration, seconds);
    }

    pub fn set_release_duration(&mut self, seconds: f32) {
        self.set_immediate(ParamAddress::ReleaseDuration, seconds);
    }

    pub fn set_detuning_offset(&mut self, hz: f32) {
        self.set_immediate(ParamAddress::DetuningOffset, hz);
    }

    pub fn set_detuning_multiplier(&mut self, value: f32) {
        self.set_immediate(ParamAddress::DetuningMultiplier, value);
    }

    /// Jump a parameter to `value` (clamped), cancelling any ramp.
    pub fn set_immediate(&mut self, address: ParamAddress, value: f32) {
        let value = address.clamp(value);
        self.rampers[address.index()].set_immediate(value);
        self.params.set(address, value);
        self.sync_ramp_samples();
    }

    /// Host-facing set. Records the UI value; the audible value follows on
    /// the next block through a dezipper ramp of `config.dezipper_steps`.
    pub fn set_parameter(&mut self, address: ParamAddress, value: f32) {
        self.rampers[address.index()].set_ui_value(address.clamp(value));
    }

    /// The logical (UI) value, not the possibly mid-ramp audible one.
    pub fn get_parameter(&self, address: ParamAddress) -> f32 {
        self.rampers[address.index()].ui_value()
    }

    /// Glide a parameter to `value` over `steps` blocks.
    pub fn start_ramp(&mut self, address: ParamAddress, value: f32, steps: u32) {
        self.rampers[address.index()].start_ramp(address.clamp(value), steps);
        if steps == 0 {
            self.params.set(address, self.rampers[address.index()].get());
            self.sync_ramp_samples();
        }
    }

    pub fn is_ramping(&self, address: ParamAddress) -> bool {
        self.rampers[address.index()].is_ramping()
    }

    /// Values the last block rendered with.
    pub fn params(&self) -> &GlobalParams {
        &self.params
    }

    // ----- Notes -----

    pub fn start_note(&mut self, note: u8, velocity: u8) -> Result<()> {
        check_note(note)?;
        if velocity > 127 {
            return Err(EngineError::VelocityOutOfRange { velocity });
        }
        self.bank.trigger(note, velocity);
        Ok(())
    }

    pub fn stop_note(&mut self, note: u8) -> Result<()> {
        check_note(note)?;
        self.bank.release(note);
        Ok(())
    }

    /// Hard silence: every voice Off, no release tails.
    pub fn all_notes_off(&mut self) {
        self.bank.all_notes_off();
    }

    /// Decode and apply one raw 3-byte MIDI message. Anything unsupported,
    /// malformed or on a filtered channel is ignored.
    pub fn handle_midi_event(&mut self, bytes: &[u8]) {
        let Some(event) = MidiEvent::parse(bytes) else {
            return;
        };
        if let Some(message) = midi_to_synth(event, self.config.midi_channel) {
            self.apply_message(message);
        }
    }

    /// Apply a control message now. This is what the block drain does for
    /// every queued message.
    pub fn apply_message(&mut self, message: SynthMessage) {
        match message {
            SynthMessage::NoteOn { note, velocity } => self.bank.trigger(note, velocity),
            SynthMessage::NoteOff { note } => self.bank.release(note),
            SynthMessage::AllNotesOff => self.bank.all_notes_off(),
            SynthMessage::SetImmediate { address, value } => self.set_immediate(address, value),
            SynthMessage::SetParameter { address, value } => self.set_parameter(address, value),
            SynthMessage::StartRamp {
                address,
                value,
                steps,
            } => self.start_ramp(address, value, steps),
            SynthMessage::Reset => self.reset(),
        }
    }

    // ----- Rendering -----

    /// Bind the destination buffer. Returns the one previously bound.
    pub fn set_buffer(&mut self, output: AudioOutput) -> Option<AudioOutput> {
        self.output.replace(output)
    }

    pub fn output(&self) -> Option<&AudioOutput> {
        self.output.as_ref()
    }

    /// Unbind the destination buffer. `process` is a no-op until another is
    /// bound.
    pub fn take_buffer(&mut self) -> Option<AudioOutput> {
        self.output.take()
    }

    /// Render `frame_count` frames into the bound buffer starting at
    /// `buffer_offset`. An unbound buffer or a region past its end is
    /// ignored.
    pub fn process(&mut self, frame_count: usize, buffer_offset: usize) {
        let Some(mut output) = self.output.take() else {
            return;
        };

        let fits = buffer_offset
            .checked_add(frame_count)
            .is_some_and(|end| end <= output.frames());

        if fits && output.channels() >= 2 {
            let region = buffer_offset..buffer_offset + frame_count;
            let (stereo, extra) = output.buffers.split_at_mut(2);
            let (left, right) = stereo.split_at_mut(1);

            for channel in extra.iter_mut() {
                channel[region.clone()].fill(0.0);
            }
            self.render_block(&mut left[0][region.clone()], &mut right[0][region]);
        }

        self.output = Some(output);
    }

    /// Same pipeline as [`process`](Self::process), straight into caller
    /// slices. Renders the length of the shorter slice.
    pub fn render(&mut self, left: &mut [f32], right: &mut [f32]) {
        let frames = left.len().min(right.len());
        self.render_block(&mut left[..frames], &mut right[..frames]);
    }

    fn render_block(&mut self, left: &mut [f32], right: &mut [f32]) {
        // Cleared before the drain: a queued reset keeps the flag up
        // through the block that applies it
        self.fresh = false;
        self.drain_messages();

        let steps = self.config.dezipper_steps;
        for (address, ramper) in ParamAddress::ALL.into_iter().zip(self.rampers.iter_mut()) {
            ramper.dezipper_check(steps);
            self.params.set(address, ramper.get_and_step());
        }
        self.sync_ramp_samples();

        left.fill(0.0);
        right.fill(0.0);

        let ctx = RenderCtx {
            sample_rate: self.config.sample_rate,
            table: &self.table,
            params: self.params,
        };
        self.bank.render(left, right, &ctx);

        apply_gain(left, MASTER_GAIN);
        apply_gain(right, MASTER_GAIN);
    }

    fn drain_messages(&mut self) {
        let Some(mut receiver) = self.receiver.take() else {
            return;
        };
        while let Some(message) = receiver.pop() {
            self.apply_message(message);
        }
        self.receiver = Some(receiver);
    }

    fn sync_ramp_samples(&mut self) {
        let sample_rate = self.config.sample_rate;
        self.bank.set_ramp_samples(
            seconds_to_samples(self.params.attack_duration, sample_rate),
            seconds_to_samples(self.params.release_duration, sample_rate),
        );
    }

    // ----- Lifecycle -----

    /// All notes off, every parameter back to its default.
    pub fn reset(&mut self) {
        self.bank.all_notes_off();
        for ramper in &mut self.rampers {
            ramper.reset();
        }
        self.params = GlobalParams::default();
        self.sync_ramp_samples();
        self.fresh = true;
        log::debug!("fm engine: reset");
    }

    /// True from construction or a direct `reset` until the next rendered
    /// block. A reset queued through the handle is applied at the start of a
    /// block, so the flag stays up after that block and clears on the one
    /// after it.
    pub fn was_reset(&self) -> bool {
        self.fresh
    }

    /// Tear down, handing back the bound buffer.
    pub fn destroy(self) -> Option<AudioOutput> {
        log::debug!("fm engine: destroyed with {} active voices", self.bank.active_count());
        self.output
    }

    // ----- Introspection -----

    pub fn active_voice_count(&self) -> usize {
        self.bank.active_count()
    }

    /// Sounding notes, most recently started first.
    pub fn active_notes(&self) -> impl Iterator<Item = u8> + '_ {
        self.bank.active_notes()
    }

    pub fn voice(&self, note: u8) -> Option<&Voice> {
        self.bank.voice(note)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn sample_rate(&self) -> f32 {
        self.config.sample_rate
    }

    pub fn channels(&self) -> usize {
        self.config.channels
    }
}

fn check_note(note: u8) -> Result<()> {
    if note > 127 {
        Err(EngineError::NoteOutOfRange { note })
    } else {
        Ok(())
    }
}
