//! Real-world scenario benchmarks.
//!
//! Whole engine blocks, as the audio callback runs them.

mod polyphony;

pub use polyphony::{bench_note_churn, bench_polyphony};
