//! Chain Reaction - a 2D cellular fission simulation
//!
//! Core modules:
//! - `sim`: Deterministic simulation (particles, interactions, reactions, tick)
//! - `config`: Reactor profiles and validated startup configuration
//! - `renderer`: Frame extraction for the host renderer
//! - `error`: Configuration error type

pub mod config;
pub mod error;
pub mod renderer;
pub mod sim;

pub use config::{ReactorConfig, ReactorProfile};
pub use error::{ConfigError, Result};

use glam::{UVec2, Vec2};

/// Default reactor constants
pub mod consts {
    /// Cell edge length in simulation units
    pub const CELL_SIZE: f32 = 24.0;
    /// Grid dimensions in cells
    pub const GRID_WIDTH: u32 = 40;
    pub const GRID_HEIGHT: u32 = 21;

    /// Frames (and ticks) per second
    pub const FPS: u32 = 60;
    /// Maximum ticks run for one host frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;

    /// Hard population ceiling
    pub const MAX_PARTICLES: usize = 1000;
    pub const INITIAL_NEUTRONS: usize = 100;
    pub const INITIAL_FUEL: usize = 70;
    pub const INITIAL_MODERATOR: usize = 160;

    /// Neutron speeds in units per tick
    pub const FAST_NEUTRON_SPEED: f32 = 4.0;
    pub const THERMAL_NEUTRON_SPEED: f32 = 1.5;

    /// Extra reach added to the radius when testing rod and channel lines
    pub const LINE_MARGIN: f32 = 2.0;
    /// Slack added to summed radii in particle contact tests
    pub const CONTACT_EPSILON: f32 = 0.01;

    /// Fuel channels every N columns, rods offset from each channel
    pub const CHANNEL_SPACING: u32 = 4;
    pub const ROD_OFFSET: u32 = 2;
    /// Rod speed multiplier while the fast-adjust modifier is held
    pub const ROD_FAST_MULTIPLIER: u32 = 3;

    /// Fission yield per event
    pub const FISSION_NEUTRONS: u32 = 3;
}

/// Continuous coordinate of a cell's center
#[inline]
pub fn cell_center(cell: UVec2, cell_size: f32) -> Vec2 {
    (cell.as_vec2() + Vec2::splat(0.5)) * cell_size
}

/// Cell containing a continuous coordinate (clamped to non-negative)
#[inline]
pub fn cell_of(pos: Vec2, cell_size: f32) -> UVec2 {
    (pos / cell_size).max(Vec2::ZERO).floor().as_uvec2()
}

/// Unit vector for an angle in radians
#[inline]
pub fn unit_from_angle(theta: f32) -> Vec2 {
    Vec2::new(theta.cos(), theta.sin())
}
