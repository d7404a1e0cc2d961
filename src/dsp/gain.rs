//! Gain staging applied after voices are summed.

/// Several voices summed at full level clip easily, so the renderer halves
/// the mix before handing it to the host.
pub const MASTER_GAIN: f32 = 0.5;

/// Scale every sample in place.
#[inline]
pub fn apply_gain(signal: &mut [f32], gain: f32) {
    for sample in signal.iter_mut() {
        *sample *= gain;
    }
}
