//! Frame clock
//!
//! Converts elapsed wall-clock time into whole simulation ticks at a fixed
//! rate. Ticks are never scaled by elapsed time; a slow frame runs more ticks,
//! up to a cap.

use crate::consts::MAX_SUBSTEPS;

#[derive(Debug, Clone)]
pub struct FixedStep {
    step: f32,
    accumulator: f32,
    max_substeps: u32,
}

impl FixedStep {
    pub fn new(fps: u32) -> Self {
        Self {
            step: 1.0 / fps.max(1) as f32,
            accumulator: 0.0,
            max_substeps: MAX_SUBSTEPS,
        }
    }

    pub fn with_max_substeps(mut self, max_substeps: u32) -> Self {
        self.max_substeps = max_substeps.max(1);
        self
    }

    /// Seconds per tick
    pub fn step(&self) -> f32 {
        self.step
    }

    /// Add elapsed frame time and return how many ticks are due
    pub fn advance(&mut self, elapsed: f32) -> u32 {
        // Clamp long stalls (debugger, suspended window)
        self.accumulator += elapsed.clamp(0.0, 0.25);

        let mut ticks = 0;
        while self.accumulator >= self.step && ticks < self.max_substeps {
            self.accumulator -= self.step;
            ticks += 1;
        }
        if ticks == self.max_substeps {
            // Drop the backlog rather than spiral
            self.accumulator = self.accumulator.min(self.step);
        }
        ticks
    }
}
