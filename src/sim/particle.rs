//! Particle entity and kinematics

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::config::KindTable;

/// Particle kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParticleKind {
    FastNeutron,
    ThermalNeutron,
    /// Water
    Moderator,
    /// Xenon
    Byproduct,
    /// Uranium
    Fuel,
}

impl ParticleKind {
    pub const ALL: [ParticleKind; 5] = [
        ParticleKind::FastNeutron,
        ParticleKind::ThermalNeutron,
        ParticleKind::Moderator,
        ParticleKind::Byproduct,
        ParticleKind::Fuel,
    ];

    /// Neutrons are the only mobile, reactive kinds
    #[inline]
    pub fn is_neutron(&self) -> bool {
        matches!(self, ParticleKind::FastNeutron | ParticleKind::ThermalNeutron)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ParticleKind::FastNeutron => "fast",
            ParticleKind::ThermalNeutron => "thermal",
            ParticleKind::Moderator => "moderator",
            ParticleKind::Byproduct => "byproduct",
            ParticleKind::Fuel => "fuel",
        }
    }
}

/// A simulated particle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub id: u64,
    pub kind: ParticleKind,
    pub pos: Vec2,
    /// Unit direction for neutrons, zero for static kinds
    pub dir: Vec2,
    pub speed: f32,
    pub radius: f32,
    pub active: bool,
}

impl Particle {
    /// Create a particle with the kind's constants. `dir` is ignored for static kinds.
    pub fn new(
        id: u64,
        kind: ParticleKind,
        pos: Vec2,
        dir: Vec2,
        kinds: &KindTable,
        cell_size: f32,
    ) -> Self {
        let props = kinds.get(kind);
        Self {
            id,
            kind,
            pos,
            dir: if kind.is_neutron() {
                dir.normalize_or_zero()
            } else {
                Vec2::ZERO
            },
            speed: if kind.is_neutron() { props.speed } else { 0.0 },
            radius: kinds.radius(kind, cell_size),
            active: true,
        }
    }

    #[inline]
    pub fn is_neutron(&self) -> bool {
        self.kind.is_neutron()
    }

    #[inline]
    pub fn velocity(&self) -> Vec2 {
        self.dir * self.speed
    }

    #[inline]
    pub fn distance_to(&self, other: &Particle) -> f32 {
        self.pos.distance(other.pos)
    }

    /// Whether two discs overlap, with `epsilon` slack on the summed radii
    #[inline]
    pub fn touches(&self, other: &Particle, epsilon: f32) -> bool {
        self.distance_to(other) < self.radius + other.radius + epsilon
    }

    /// Move one fixed step, reflecting off the arena edges.
    ///
    /// The disc stays within `[radius, arena - radius]` on both axes: any
    /// overshoot past an edge is mirrored back inside and the matching
    /// direction component is turned to point inward.
    pub fn advance(&mut self, arena: Vec2) {
        if !self.active || !self.is_neutron() {
            return;
        }

        self.pos += self.velocity();

        let min = Vec2::splat(self.radius);
        let max = arena - Vec2::splat(self.radius);
        for axis in 0..2 {
            if self.pos[axis] < min[axis] {
                self.pos[axis] = 2.0 * min[axis] - self.pos[axis];
                self.dir[axis] = self.dir[axis].abs();
            } else if self.pos[axis] > max[axis] {
                self.pos[axis] = 2.0 * max[axis] - self.pos[axis];
                self.dir[axis] = -self.dir[axis].abs();
            }
            // Degenerate arenas narrower than the disc
            self.pos[axis] = self.pos[axis].clamp(min[axis].min(max[axis]), max[axis].max(min[axis]));
        }
    }

    /// Slow a fast neutron to thermal speed. Never reverses.
    pub fn thermalize(&mut self, kinds: &KindTable, cell_size: f32) {
        if self.kind != ParticleKind::FastNeutron {
            return;
        }
        self.kind = ParticleKind::ThermalNeutron;
        self.speed = kinds.thermal_neutron.speed;
        self.radius = kinds.radius(ParticleKind::ThermalNeutron, cell_size);
    }
}
