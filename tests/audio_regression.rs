use fmbank::{
    dsp::ramper::ParamRamper, io::AudioOutput, EngineConfig, EnvStage, FmEngine, ParamAddress,
};

/// Engine whose table is a constant 1.0, so the output is exactly
/// 0.5 × Σ (amplitude × envelope).
fn dc_engine(sample_rate: f32) -> FmEngine {
    let mut engine = FmEngine::init(2, sample_rate).expect("valid config");
    engine.setup_waveform(1).expect("non-empty table");
    engine.set_waveform_value(0, 1.0).expect("index in range");
    engine
}

fn render(engine: &mut FmEngine, frames: usize) -> Vec<f32> {
    let mut left = vec![0.0; frames];
    let mut right = vec![0.0; frames];
    engine.render(&mut left, &mut right);
    assert_eq!(left, right);
    left
}

fn stage(engine: &FmEngine, note: u8) -> EnvStage {
    engine.voice(note).map(|v| v.stage()).unwrap_or(EnvStage::Off)
}

#[test]
fn renders_silence_with_empty_bank() {
    let config = EngineConfig::default();
    let mut engine = FmEngine::new(config).expect("valid config");
    engine.set_buffer(AudioOutput::new(4, 256));
    engine.process(256, 0);

    let output = engine.output().expect("buffer bound");
    let samples: Vec<f32> = output
        .buffers
        .iter()
        .flat_map(|c| c.iter())
        .copied()
        .collect();
    assert_eq!(samples.len(), 1024);
    assert!(samples.iter().all(|s| *s == 0.0));
}

#[test]
fn midi_and_direct_calls_render_identically() {
    let mut by_midi = FmEngine::init(2, 48_000.0).expect("valid config");
    let mut direct = FmEngine::init(2, 48_000.0).expect("valid config");
    for engine in [&mut by_midi, &mut direct] {
        engine.set_attack_duration(0.01);
        engine.set_release_duration(0.05);
        engine.set_modulation_index(2.0);
    }

    by_midi.handle_midi_event(&[0x90, 60, 100]);
    direct.start_note(60, 100).expect("note in range");
    assert_eq!(render(&mut by_midi, 512), render(&mut direct, 512));

    by_midi.handle_midi_event(&[0x80, 60, 0]);
    direct.stop_note(60).expect("note in range");
    assert_eq!(render(&mut by_midi, 4096), render(&mut direct, 4096));

    assert_eq!(by_midi.active_voice_count(), 0);
    assert_eq!(direct.active_voice_count(), 0);
}

#[test]
fn attack_reaches_unity_after_rounded_duration() {
    let mut engine = FmEngine::init(2, 48_000.0).expect("valid config");
    // 0.0105 s × 48 kHz = 504 samples
    engine.set_attack_duration(0.0105);
    engine.start_note(69, 127).expect("note in range");

    render(&mut engine, 503);
    let voice = engine.voice(69).expect("pool covers every note");
    assert_eq!(voice.stage(), EnvStage::Attack);
    assert!(voice.env_level() < 1.0);

    render(&mut engine, 1);
    let voice = engine.voice(69).expect("pool covers every note");
    assert_eq!(voice.stage(), EnvStage::Sustain);
    assert_eq!(voice.env_level(), 1.0);
}

#[test]
fn release_is_linear_and_removes_voice_at_completion() {
    let mut engine = dc_engine(1_000.0);
    engine.set_release_duration(0.1);
    engine.start_note(60, 127).expect("note in range");
    render(&mut engine, 10);

    engine.stop_note(60).expect("note in range");
    let tail = render(&mut engine, 100);

    for (k, sample) in tail.iter().enumerate() {
        let expected = 0.5 * (1.0 - k as f32 / 100.0);
        assert!(
            (sample - expected).abs() < 1e-5,
            "sample {k}: {sample} != {expected}"
        );
    }
    assert_eq!(engine.active_voice_count(), 0);
    assert_eq!(stage(&engine, 60), EnvStage::Off);
    assert!(render(&mut engine, 32).iter().all(|s| *s == 0.0));
}

#[test]
fn envelope_is_continuous_from_attack_into_release() {
    let mut engine = dc_engine(1_000.0);
    engine.set_attack_duration(0.1);
    engine.set_release_duration(0.1);
    engine.start_note(60, 127).expect("note in range");

    let mut samples = render(&mut engine, 40);
    engine.stop_note(60).expect("note in range");
    samples.extend(render(&mut engine, 120));

    // Attack climbs 0.01 per sample, halved by the master gain
    let largest_jump = samples
        .windows(2)
        .map(|w| (w[1] - w[0]).abs())
        .fold(0.0f32, f32::max);
    assert!(largest_jump <= 0.005 + 1e-6, "jump of {largest_jump}");
    assert_eq!(engine.active_voice_count(), 0);
}

#[test]
fn zero_velocity_note_on_before_render_stays_silent() {
    let mut engine = dc_engine(1_000.0);
    engine.set_attack_duration(0.05);
    engine.set_release_duration(0.05);

    engine.start_note(60, 100).expect("note in range");
    engine.handle_midi_event(&[0x90, 60, 0]);
    assert_eq!(stage(&engine, 60), EnvStage::Release);

    // 50-sample release from a level that never left zero
    for block in 0..5 {
        assert!(render(&mut engine, 10).iter().all(|s| *s == 0.0));
        if let Some(voice) = engine.voice(60).filter(|v| v.stage() != EnvStage::Off) {
            assert_eq!(voice.env_level(), 0.0, "block {block}");
        }
    }

    assert_eq!(engine.active_voice_count(), 0);
    assert_eq!(stage(&engine, 60), EnvStage::Off);
    assert!(render(&mut engine, 16).iter().all(|s| *s == 0.0));
}

#[test]
fn retrigger_never_drops_the_level() {
    let mut engine = dc_engine(1_000.0);
    engine.set_attack_duration(0.05);
    engine.set_release_duration(0.1);

    // Retrigger during attack
    engine.start_note(60, 127).expect("note in range");
    let before = *render(&mut engine, 20).last().expect("frames rendered");
    engine.start_note(60, 127).expect("note in range");
    let after = render(&mut engine, 5);
    assert!(after[0] >= before);
    assert!(after.windows(2).all(|w| w[1] >= w[0]));

    // Retrigger during release
    render(&mut engine, 100);
    engine.stop_note(60).expect("note in range");
    let before = *render(&mut engine, 30).last().expect("frames rendered");
    engine.start_note(60, 127).expect("note in range");
    assert_eq!(stage(&engine, 60), EnvStage::Attack);
    let after = render(&mut engine, 5);
    assert!(after[0] <= before + 1e-6 && after[0] >= before - 0.01);
    assert!(after.windows(2).all(|w| w[1] >= w[0]));
    assert_eq!(engine.active_voice_count(), 1);
}

#[test]
fn all_notes_off_is_hard_silence() {
    let mut engine = dc_engine(1_000.0);
    engine.set_release_duration(5.0);
    for note in [48, 52, 55, 60] {
        engine.start_note(note, 90).expect("note in range");
    }
    engine.stop_note(52).expect("note in range");
    render(&mut engine, 16);

    engine.handle_midi_event(&[0xB0, 123, 0]);

    assert_eq!(engine.active_voice_count(), 0);
    assert_eq!(engine.active_notes().count(), 0);
    for note in 0..=127 {
        assert_eq!(stage(&engine, note), EnvStage::Off);
    }
    assert!(render(&mut engine, 64).iter().all(|s| *s == 0.0));
}

#[test]
fn master_gain_halves_the_voice_sum() {
    let mut engine = dc_engine(1_000.0);
    engine.start_note(60, 127).expect("note in range");
    assert!(render(&mut engine, 8).iter().all(|s| (s - 0.5).abs() < 1e-6));

    engine.start_note(67, 127).expect("note in range");
    assert!(render(&mut engine, 8).iter().all(|s| (s - 1.0).abs() < 1e-6));
}

#[test]
fn detune_below_zero_clamps_to_a_silent_zero_hertz_voice() {
    let mut engine = FmEngine::init(2, 48_000.0).expect("valid config");
    engine.set_detuning_offset(-1_000.0);
    engine.start_note(60, 127).expect("note in range");

    // Sine at 0 Hz never leaves phase 0
    assert!(render(&mut engine, 256).iter().all(|s| s.abs() < 1e-6));
    assert_eq!(engine.active_voice_count(), 1);
}

#[cfg(feature = "rtrb")]
#[test]
fn control_thread_messages_land_at_block_start() {
    let config = EngineConfig {
        sample_rate: 1_000.0,
        message_capacity: 64,
        ..EngineConfig::default()
    };
    let (mut engine, mut handle) = FmEngine::with_handle(config).expect("valid config");

    let sender = std::thread::spawn(move || {
        for note in [60, 64, 67] {
            handle.note_on(note, 100).expect("queue has room");
        }
        handle
            .set_parameter(ParamAddress::ModulationIndex, 4.0)
            .expect("queue has room");
        handle
    });
    let mut handle = sender.join().expect("sender thread finished");

    assert_eq!(engine.active_voice_count(), 0);
    render(&mut engine, 32);
    assert_eq!(engine.active_notes().collect::<Vec<_>>(), vec![67, 64, 60]);
    assert_eq!(engine.params().modulation_index, 4.0);

    handle.reset().expect("queue has room");
    render(&mut engine, 32);
    assert!(engine.was_reset());
    assert_eq!(engine.active_voice_count(), 0);
    assert_eq!(engine.get_parameter(ParamAddress::ModulationIndex), 1.0);
}

#[test]
fn ramp_is_monotonic_and_exact() {
    let mut ramper = ParamRamper::new(0.0);
    ramper.start_ramp(1.0, 100);

    let values: Vec<f32> = (0..100).map(|_| ramper.get_and_step()).collect();
    assert!(values.windows(2).all(|w| w[1] >= w[0]));
    assert!(values.iter().all(|v| *v <= 1.0));
    assert_eq!(ramper.get(), 1.0);
    assert!(!ramper.is_ramping());
}

#[test]
fn custom_waveform_reaches_the_output() {
    let mut engine = FmEngine::init(2, 1_000.0).expect("valid config");
    engine.setup_waveform(2).expect("non-empty table");
    engine.set_waveform_value(0, 0.5).expect("index in range");
    engine.set_waveform_value(1, 0.5).expect("index in range");
    engine.start_note(60, 127).expect("note in range");

    assert!(render(&mut engine, 16).iter().all(|s| (s - 0.25).abs() < 1e-6));
}
