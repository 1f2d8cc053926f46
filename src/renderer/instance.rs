//! Instance types handed to the host renderer

use bytemuck::{Pod, Zeroable};

use crate::sim::{Particle, ParticleKind};

/// One particle disc
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct ParticleInstance {
    pub position: [f32; 2], // offset 0
    pub radius: f32,        // offset 8
    pub kind: u32,          // offset 12
    pub color: [f32; 4],    // offset 16
}

impl ParticleInstance {
    pub fn from_particle(p: &Particle) -> Self {
        Self {
            position: p.pos.to_array(),
            radius: p.radius,
            kind: kind_index(p.kind),
            color: colors::for_kind(p.kind),
        }
    }
}

/// One vertical line: a control rod (top to tip) or a fuel channel (full height)
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct LineInstance {
    pub x: f32,
    pub y_top: f32,
    pub y_bottom: f32,
    pub _pad: u32,
    pub color: [f32; 4],
}

impl LineInstance {
    pub const fn new(x: f32, y_top: f32, y_bottom: f32, color: [f32; 4]) -> Self {
        Self {
            x,
            y_top,
            y_bottom,
            _pad: 0,
            color,
        }
    }
}

/// Stable numeric id per kind for shaders
pub fn kind_index(kind: ParticleKind) -> u32 {
    match kind {
        ParticleKind::FastNeutron => 0,
        ParticleKind::ThermalNeutron => 1,
        ParticleKind::Moderator => 2,
        ParticleKind::Byproduct => 3,
        ParticleKind::Fuel => 4,
    }
}

/// Colors for reactor elements
pub mod colors {
    use crate::sim::ParticleKind;

    pub const FAST_NEUTRON: [f32; 4] = [1.0, 0.0, 0.0, 1.0];
    pub const THERMAL_NEUTRON: [f32; 4] = [0.16, 0.16, 0.16, 1.0];
    pub const MODERATOR: [f32; 4] = [0.0, 0.39, 1.0, 0.4];
    pub const BYPRODUCT: [f32; 4] = [0.39, 0.0, 0.39, 1.0];
    pub const FUEL: [f32; 4] = [0.03, 0.24, 0.0, 1.0];
    pub const ROD: [f32; 4] = [0.12, 0.12, 0.12, 1.0];
    pub const CHANNEL: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
    pub const BACKGROUND: [f32; 4] = [0.0, 1.0, 1.0, 1.0];

    pub fn for_kind(kind: ParticleKind) -> [f32; 4] {
        match kind {
            ParticleKind::FastNeutron => FAST_NEUTRON,
            ParticleKind::ThermalNeutron => THERMAL_NEUTRON,
            ParticleKind::Moderator => MODERATOR,
            ParticleKind::Byproduct => BYPRODUCT,
            ParticleKind::Fuel => FUEL,
        }
    }
}
