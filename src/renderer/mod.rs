//! Render boundary
//!
//! The simulation hands the host one `Frame` per rendered frame. Drawing,
//! windows and input are the host's business.

pub mod headless;
pub mod instance;

pub use headless::HeadlessRenderer;
pub use instance::{LineInstance, ParticleInstance, colors};

use serde::Serialize;

use crate::sim::{PopulationStats, ReactorState};

/// Everything the host needs to draw one frame
#[derive(Debug, Clone)]
pub struct Frame {
    pub tick: u64,
    pub paused: bool,
    /// Arena size in simulation units
    pub arena: [f32; 2],
    /// Active particles in storage order
    pub particles: Vec<ParticleInstance>,
    pub rods: Vec<LineInstance>,
    /// Rod insertion depths in cells
    pub rod_depths: Vec<u32>,
    pub channels: Vec<LineInstance>,
    pub stats: PopulationStats,
}

/// Compact per-frame summary for HUDs and logs
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FrameSummary {
    pub tick: u64,
    pub paused: bool,
    pub rod_depth: Option<u32>,
    #[serde(flatten)]
    pub stats: PopulationStats,
}

/// Implemented by the host's drawing layer
pub trait FrameRenderer {
    fn draw(&mut self, frame: &Frame);
}

impl Frame {
    /// Read the current state into render instances
    pub fn extract(state: &ReactorState) -> Self {
        let arena = state.config.arena();
        let particles = state.active().map(ParticleInstance::from_particle).collect();

        let rods = (0..state.rods.len())
            .map(|i| LineInstance::new(state.rods.x(i), 0.0, state.rods.tip_y(i), colors::ROD))
            .collect();

        let channels = if state.config.profile.has_channels() {
            (0..state.channels.columns().len())
                .map(|i| LineInstance::new(state.channels.x(i), 0.0, arena.y, colors::CHANNEL))
                .collect()
        } else {
            Vec::new()
        };

        Self {
            tick: state.time_ticks,
            paused: state.paused,
            arena: arena.to_array(),
            particles,
            rods,
            rod_depths: state.rods.depths().to_vec(),
            channels,
            stats: state.stats(),
        }
    }

    pub fn summary(&self) -> FrameSummary {
        FrameSummary {
            tick: self.tick,
            paused: self.paused,
            rod_depth: self.rod_depths.first().copied(),
            stats: self.stats,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ReactorConfig, ReactorProfile};
    use crate::sim::{TickInput, tick};

    #[test]
    fn extract_lists_only_active_particles() {
        let mut state = ReactorState::with_seed(ReactorConfig::default(), 5).unwrap();
        state.particles[0].active = false;
        let frame = Frame::extract(&state);
        assert_eq!(frame.particles.len(), state.particles.len() - 1);
        assert_eq!(frame.stats.total(), frame.particles.len());
    }

    #[test]
    fn extract_preserves_storage_order() {
        let state = ReactorState::with_seed(ReactorConfig::default(), 5).unwrap();
        let frame = Frame::extract(&state);
        for (inst, p) in frame.particles.iter().zip(state.active()) {
            assert_eq!(inst.position, p.pos.to_array());
            assert_eq!(inst.color, colors::for_kind(p.kind));
        }
    }

    #[test]
    fn rods_follow_depth() {
        let mut state = ReactorState::with_seed(ReactorConfig::default(), 5).unwrap();
        state.rods.set_depth(3);
        let frame = Frame::extract(&state);
        assert_eq!(frame.rods.len(), 10);
        assert!(frame.rods.iter().all(|r| r.y_bottom == 72.0));
        assert_eq!(frame.summary().rod_depth, Some(3));
    }

    #[test]
    fn channels_drawn_only_when_they_capture() {
        let fuel = ReactorState::with_seed(ReactorConfig::default(), 5).unwrap();
        assert!(Frame::extract(&fuel).channels.is_empty());

        let config = ReactorConfig::from_profile(ReactorProfile::ModeratedChannels);
        let moderated = ReactorState::with_seed(config, 5).unwrap();
        let frame = Frame::extract(&moderated);
        assert_eq!(frame.channels.len(), moderated.channels.columns().len());
        assert!(frame.channels.iter().all(|c| c.y_bottom == 504.0));
    }

    #[test]
    fn summary_serializes_flat() {
        let mut state = ReactorState::with_seed(ReactorConfig::default(), 5).unwrap();
        tick(&mut state, &TickInput::default());
        let json = serde_json::to_string(&Frame::extract(&state).summary()).unwrap();
        assert!(json.contains("\"tick\":1"));
        assert!(json.contains("\"fast_neutrons\""));
    }
}
