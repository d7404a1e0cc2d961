//! Linear parameter ramps for click-free control changes.

/*
Parameter Ramping
=================

Jumping a synthesis parameter from one value to another between two blocks
produces a discontinuity in the output: a click. A ramper hides the jump by
walking the value linearly toward its new target over a number of steps.

Vocabulary
----------

  value         What the renderer reads right now.

  target        Where the current ramp ends. Once the ramp is done,
                value == target exactly.

  ui value      The logical value the host or UI last asked for. It does not
                move while a ramp is in flight, so a knob does not jitter
                while the sound glides behind it.

  step          One call to `get_and_step()`. The engine steps every ramper
                once per audio block, so a ramp of N steps lasts N blocks.

  dezipper      Turning a UI change into a short ramp instead of a jump.


The Math
--------

    step_size = (target - start) / steps

The value is never accumulated. It is reconstructed from the remaining
step count:

    value = target - step_size * remaining

so when `remaining` reaches 0 the value is exactly the target, no matter how
much floating-point error a long ramp would otherwise pile up.
*/

#[derive(Debug, Clone)]
pub struct ParamRamper {
    default: f32,
    target: f32,
    ui_value: f32,
    step_size: f32,
    remaining: u32,
    ui_changed: bool,
}

impl ParamRamper {
    pub fn new(default: f32) -> Self {
        Self {
            default,
            target: default,
            ui_value: default,
            step_size: 0.0,
            remaining: 0,
            ui_changed: false,
        }
    }

    /// Jump straight to `value`. Cancels any ramp in flight.
    pub fn set_immediate(&mut self, value: f32) {
        self.target = value;
        self.ui_value = value;
        self.step_size = 0.0;
        self.remaining = 0;
        self.ui_changed = false;
    }

    /// Start a linear walk from the current value to `target` over `steps`
    /// calls of [`get_and_step`](Self::get_and_step).
    ///
    /// A zero-length ramp is an immediate jump.
    pub fn start_ramp(&mut self, target: f32, steps: u32) {
        if steps == 0 {
            self.set_immediate(target);
            return;
        }

        let current = self.get();
        self.step_size = (target - current) / steps as f32;
        self.remaining = steps;
        self.target = target;
        self.ui_value = target;
        self.ui_changed = false;
    }

    /// Current value without advancing.
    #[inline]
    pub fn get(&self) -> f32 {
        if self.remaining == 0 {
            self.target
        } else {
            self.target - self.step_size * self.remaining as f32
        }
    }

    /// Return the current value, then advance one step.
    #[inline]
    pub fn get_and_step(&mut self) -> f32 {
        let value = self.get();
        if self.remaining != 0 {
            self.remaining -= 1;
        }
        value
    }

    pub fn ui_value(&self) -> f32 {
        self.ui_value
    }

    /// Record a new logical value. The audible value only follows once
    /// [`dezipper_check`](Self::dezipper_check) runs.
    pub fn set_ui_value(&mut self, value: f32) {
        self.ui_value = value;
        self.ui_changed = true;
    }

    /// Ramp toward the UI value if it changed since the last check.
    pub fn dezipper_check(&mut self, steps: u32) {
        if self.ui_changed {
            self.start_ramp(self.ui_value, steps);
        }
    }

    pub fn is_ramping(&self) -> bool {
        self.remaining != 0
    }

    pub fn default_value(&self) -> f32 {
        self.default
    }

    /// Back to the construction default, immediately.
    pub fn reset(&mut self) {
        self.set_immediate(self.default);
    }
}
