//! Population management
//!
//! Spawning under the global cap, purging dead particles, host injections and
//! the per-tick background injection.

use glam::{UVec2, Vec2};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::particle::{Particle, ParticleKind};
use super::reaction::{ReactorEvent, Spawn, SpawnSite};
use super::state::ReactorState;
use crate::{cell_center, unit_from_angle};

/// Per-kind counts of active particles
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopulationStats {
    pub fast_neutrons: usize,
    pub thermal_neutrons: usize,
    pub moderator: usize,
    pub byproduct: usize,
    pub fuel: usize,
}

impl PopulationStats {
    pub fn neutrons(&self) -> usize {
        self.fast_neutrons + self.thermal_neutrons
    }

    pub fn total(&self) -> usize {
        self.neutrons() + self.moderator + self.byproduct + self.fuel
    }

    pub fn get(&self, kind: ParticleKind) -> usize {
        match kind {
            ParticleKind::FastNeutron => self.fast_neutrons,
            ParticleKind::ThermalNeutron => self.thermal_neutrons,
            ParticleKind::Moderator => self.moderator,
            ParticleKind::Byproduct => self.byproduct,
            ParticleKind::Fuel => self.fuel,
        }
    }
}

impl ReactorState {
    /// Whether storage has room for one more particle.
    ///
    /// Counts particles deactivated this tick but not yet purged, so the
    /// stored population never exceeds the cap at any point in a tick.
    #[inline]
    pub fn has_room(&self) -> bool {
        self.particles.len() < self.config.max_particles
    }

    /// Uniformly random grid cell
    pub fn random_cell(&mut self) -> UVec2 {
        UVec2::new(
            self.rng.random_range(0..self.config.grid_width),
            self.rng.random_range(0..self.config.grid_height),
        )
    }

    /// Uniformly random unit direction
    pub fn random_direction(&mut self) -> Vec2 {
        unit_from_angle(self.rng.random_range(0.0..std::f32::consts::TAU))
    }

    fn drop_spawn(&mut self, kind: ParticleKind) -> Option<usize> {
        log::debug!("Population cap reached, dropping {} spawn", kind.as_str());
        self.events.push(ReactorEvent::SpawnDropped { kind });
        None
    }

    /// Spawn at a continuous position with an explicit direction.
    ///
    /// Returns the new particle's index, or `None` if the cap is reached.
    pub fn spawn_particle(&mut self, kind: ParticleKind, pos: Vec2, dir: Vec2) -> Option<usize> {
        if !self.has_room() {
            return self.drop_spawn(kind);
        }
        let id = self.next_entity_id();
        let particle = Particle::new(
            id,
            kind,
            pos,
            dir,
            &self.config.kinds,
            self.config.cell_size,
        );
        self.particles.push(particle);
        Some(self.particles.len() - 1)
    }

    /// Spawn centered in `cell`, with a random direction for neutrons
    pub fn spawn_at_cell(&mut self, kind: ParticleKind, cell: UVec2) -> Option<usize> {
        if !self.has_room() {
            return self.drop_spawn(kind);
        }
        let dir = if kind.is_neutron() {
            self.random_direction()
        } else {
            Vec2::ZERO
        };
        let pos = cell_center(cell, self.config.cell_size);
        self.spawn_particle(kind, pos, dir)
    }

    /// Commit a pending spawn from a reaction
    pub fn spawn(&mut self, spawn: Spawn) -> Option<usize> {
        let cell = match spawn.site {
            SpawnSite::Cell(cell) => cell,
            SpawnSite::RandomCell => {
                if !self.has_room() {
                    return self.drop_spawn(spawn.kind);
                }
                self.random_cell()
            }
        };
        self.spawn_at_cell(spawn.kind, cell)
    }

    /// Spawn up to `count` particles at random cells; returns how many fit
    pub fn spawn_random(&mut self, kind: ParticleKind, count: usize) -> usize {
        let mut spawned = 0;
        for _ in 0..count {
            if self.spawn(Spawn::anywhere(kind)).is_none() {
                break;
            }
            spawned += 1;
        }
        spawned
    }

    /// Host injection command. Fuel is only accepted in the fuel-particle profile.
    pub fn inject(&mut self, kind: ParticleKind, count: usize) -> usize {
        if kind == ParticleKind::Fuel && !self.config.profile.has_fuel_particles() {
            log::debug!(
                "Ignoring fuel injection: profile {} has fuel channels",
                self.config.profile.as_str()
            );
            return 0;
        }
        let spawned = self.spawn_random(kind, count);
        log::debug!("Injected {}/{} {}", spawned, count, kind.as_str());
        spawned
    }

    /// Active particles of one kind
    pub fn count(&self, kind: ParticleKind) -> usize {
        self.active().filter(|p| p.kind == kind).count()
    }

    pub fn stats(&self) -> PopulationStats {
        let mut stats = PopulationStats::default();
        for p in self.active() {
            match p.kind {
                ParticleKind::FastNeutron => stats.fast_neutrons += 1,
                ParticleKind::ThermalNeutron => stats.thermal_neutrons += 1,
                ParticleKind::Moderator => stats.moderator += 1,
                ParticleKind::Byproduct => stats.byproduct += 1,
                ParticleKind::Fuel => stats.fuel += 1,
            }
        }
        stats
    }

    /// Drop inactive particles from storage; returns how many were removed
    pub fn purge(&mut self) -> usize {
        let before = self.particles.len();
        self.particles.retain(|p| p.active);
        before - self.particles.len()
    }

    /// Random background injection, one independent draw per rule
    pub fn inject_background(&mut self) {
        let injection = self.config.injection.clone();
        let cap = self.config.max_particles;

        if self.rng.random::<f32>() < injection.neutron_rate && self.particles.len() < cap / 2 {
            self.spawn(Spawn::anywhere(ParticleKind::FastNeutron));
        }

        if self.rng.random::<f32>() < injection.moderator_rate
            && self.count(ParticleKind::Moderator) < injection.moderator_cap
            && self.has_room()
        {
            self.spawn(Spawn::anywhere(ParticleKind::Moderator));
        }

        if self.rng.random::<f32>() < injection.byproduct_rate
            && self.count(ParticleKind::Byproduct) < injection.byproduct_cap
            && self.has_room()
        {
            self.spawn(Spawn::anywhere(ParticleKind::Byproduct));
        }
    }
}
