//! Benchmarks for low-level DSP primitives.

mod oscillator;
mod ramper;

pub use oscillator::bench_oscillator;
pub use ramper::bench_ramper;
