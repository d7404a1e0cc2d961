//! Benchmarks for FM sample generation.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use fmbank::dsp::oscillator::{FmOscillator, WaveTable};

use crate::BLOCK_SIZES;

const SAMPLE_RATE: f32 = 48_000.0;

pub fn bench_oscillator(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/oscillator");
    let table = WaveTable::sine(4096);

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        // Index 0 - plain table playback
        let mut osc = FmOscillator::new();
        osc.frequency = 440.0;
        osc.amplitude = 1.0;
        osc.index = 0.0;
        group.bench_with_input(BenchmarkId::new("index_0", size), &size, |b, _| {
            b.iter(|| {
                for sample in buffer.iter_mut() {
                    *sample = osc.compute(black_box(&table), SAMPLE_RATE);
                }
                black_box(&buffer);
            })
        });

        // Inharmonic bell ratio with heavy modulation
        let mut osc = FmOscillator::new();
        osc.frequency = 440.0;
        osc.amplitude = 1.0;
        osc.modulator = 3.5;
        osc.index = 8.0;
        group.bench_with_input(BenchmarkId::new("bell", size), &size, |b, _| {
            b.iter(|| {
                for sample in buffer.iter_mut() {
                    *sample = osc.compute(black_box(&table), SAMPLE_RATE);
                }
                black_box(&buffer);
            })
        });
    }

    group.finish();
}
