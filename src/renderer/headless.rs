//! Renderer for runs without a window: logs periodic population summaries

use super::{Frame, FrameRenderer, FrameSummary};

#[derive(Debug, Clone)]
pub struct HeadlessRenderer {
    /// Log a summary every N frames (0 disables logging)
    log_every: u64,
    frames: u64,
    peak_neutrons: usize,
    last: Option<FrameSummary>,
}

impl HeadlessRenderer {
    pub fn new(log_every: u64) -> Self {
        Self {
            log_every,
            frames: 0,
            peak_neutrons: 0,
            last: None,
        }
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn peak_neutrons(&self) -> usize {
        self.peak_neutrons
    }

    pub fn last_summary(&self) -> Option<&FrameSummary> {
        self.last.as_ref()
    }
}

impl FrameRenderer for HeadlessRenderer {
    fn draw(&mut self, frame: &Frame) {
        self.frames += 1;
        self.peak_neutrons = self.peak_neutrons.max(frame.stats.neutrons());
        let summary = frame.summary();

        if self.log_every > 0 && self.frames % self.log_every == 0 {
            let s = &summary.stats;
            log::info!(
                "tick {:>6} | fast {:>4} thermal {:>4} | byproduct {:>3} fuel {:>3} water {:>3} | rods {:?}{}",
                summary.tick,
                s.fast_neutrons,
                s.thermal_neutrons,
                s.byproduct,
                s.fuel,
                s.moderator,
                summary.rod_depth,
                if summary.paused { " (paused)" } else { "" }
            );
        }
        self.last = Some(summary);
    }
}
