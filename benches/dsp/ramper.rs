//! Benchmarks for parameter ramping.
//!
//! The engine steps seven rampers per block, so this is tiny next to voice
//! rendering; it is here to keep it that way.

use std::hint::black_box;

use criterion::Criterion;
use fmbank::dsp::ramper::ParamRamper;

pub fn bench_ramper(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/ramper");

    let mut ramper = ParamRamper::new(0.0);
    group.bench_function("get_and_step", |b| {
        b.iter(|| {
            if !ramper.is_ramping() {
                ramper.start_ramp(black_box(1.0) - ramper.get(), 1_000);
            }
            black_box(ramper.get_and_step())
        })
    });

    let mut ramper = ParamRamper::new(0.0);
    let mut value = 0.0f32;
    group.bench_function("dezipper_check", |b| {
        b.iter(|| {
            value = 1.0 - value;
            ramper.set_ui_value(black_box(value));
            ramper.dezipper_check(black_box(8));
            black_box(ramper.get_and_step())
        })
    });

    group.finish();
}
