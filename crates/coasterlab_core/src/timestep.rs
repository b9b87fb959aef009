//! Fixed timestep accumulator
//!
//! Turns variable frame times into a whole number of fixed simulation steps.

/// Longest frame the accumulator will accept, to avoid a spiral of death
/// after a stall (first frame, window drag, breakpoint)
pub const MAX_FRAME_DT: f32 = 0.25;

#[derive(Clone, Debug)]
pub struct FixedTimestep {
    step: f32,
    accumulator: f32,
    max_steps: u32,
}

impl FixedTimestep {
    /// `step` is clamped to a small positive minimum
    pub fn new(step: f32) -> Self {
        Self {
            step: step.max(1e-5),
            accumulator: 0.0,
            max_steps: 16,
        }
    }

    /// Builder: cap the number of steps per frame
    pub fn with_max_steps(mut self, max_steps: u32) -> Self {
        self.max_steps = max_steps.max(1);
        self
    }

    pub fn step(&self) -> f32 {
        self.step
    }

    /// Add a frame's time and return how many fixed steps to run now
    ///
    /// Time beyond `max_steps` is dropped rather than carried over.
    pub fn advance(&mut self, frame_dt: f32) -> u32 {
        if frame_dt.is_finite() && frame_dt > 0.0 {
            self.accumulator += frame_dt.min(MAX_FRAME_DT);
        }

        let mut steps = 0;
        while self.accumulator >= self.step && steps < self.max_steps {
            self.accumulator -= self.step;
            steps += 1;
        }
        if steps == self.max_steps && self.accumulator >= self.step {
            log::trace!("Dropping {:.4}s of simulation time", self.accumulator);
            self.accumulator %= self.step;
        }
        steps
    }

    /// Fraction of a step left in the accumulator, for interpolating between states
    pub fn alpha(&self) -> f32 {
        (self.accumulator / self.step).clamp(0.0, 1.0)
    }

    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}
