//! Benchmarks for full engine blocks with many voices.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use fmbank::{FmEngine, FmPatch};

use crate::BLOCK_SIZES;

const SAMPLE_RATE: f32 = 48_000.0;

fn engine_with_voices(voices: u8) -> FmEngine {
    let mut engine = FmEngine::init(2, SAMPLE_RATE).expect("valid config");
    FmPatch::electric_piano().apply(&mut engine);
    for i in 0..voices {
        engine
            .start_note(36 + i, 100)
            .expect("note in range");
    }
    engine
}

pub fn bench_polyphony(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/polyphony");

    for &size in BLOCK_SIZES {
        let mut left = vec![0.0f32; size];
        let mut right = vec![0.0f32; size];

        // Sustained chords of increasing size; 64 is well past any real
        // performance and bounds the worst case
        for voices in [1u8, 8, 32, 64] {
            let mut engine = engine_with_voices(voices);
            group.bench_with_input(
                BenchmarkId::new(format!("{voices}_voices"), size),
                &size,
                |b, _| {
                    b.iter(|| {
                        engine.render(black_box(&mut left), black_box(&mut right));
                    })
                },
            );
        }

        // Eight voices with a detune glide running every block
        let mut engine = engine_with_voices(8);
        engine.set_detuning_multiplier(1.0);
        let mut up = true;
        group.bench_with_input(BenchmarkId::new("8_voices_gliding", size), &size, |b, _| {
            b.iter(|| {
                if !engine.is_ramping(fmbank::ParamAddress::DetuningMultiplier) {
                    let target = if up { 1.1 } else { 0.95 };
                    engine.start_ramp(fmbank::ParamAddress::DetuningMultiplier, target, 64);
                    up = !up;
                }
                engine.render(black_box(&mut left), black_box(&mut right));
            })
        });
    }

    group.finish();
}

/// Notes starting and stopping every block, exercising list push/unlink.
pub fn bench_note_churn(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/note_churn");

    for &size in BLOCK_SIZES {
        let mut left = vec![0.0f32; size];
        let mut right = vec![0.0f32; size];
        let mut engine = FmEngine::init(2, SAMPLE_RATE).expect("valid config");
        engine.set_attack_duration(0.001);
        engine.set_release_duration(0.002);

        let mut note = 0u8;
        group.bench_with_input(BenchmarkId::new("churn", size), &size, |b, _| {
            b.iter(|| {
                engine.handle_midi_event(&[0x90, 40 + note % 48, 100]);
                engine.handle_midi_event(&[0x80, 40 + (note + 24) % 48, 0]);
                note = note.wrapping_add(1);
                engine.render(black_box(&mut left), black_box(&mut right));
            })
        });
    }

    group.finish();
}
