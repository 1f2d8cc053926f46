//! Reactor state
//!
//! Everything the tick mutates lives here: the population, the rods, the pause
//! flag, the RNG and the event log for the last tick.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::geometry::{ControlRods, FuelChannels};
use super::particle::{Particle, ParticleKind};
use super::reaction::ReactorEvent;
use crate::config::ReactorConfig;
use crate::error::Result;

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct ReactorState {
    pub config: ReactorConfig,
    /// Seed the RNG was created from
    pub seed: u64,
    pub rng: Pcg32,
    /// Simulation tick counter (not advanced while paused)
    pub time_ticks: u64,
    pub paused: bool,
    /// Population in storage order; inactive entries are purged each tick
    pub particles: Vec<Particle>,
    pub rods: ControlRods,
    pub channels: FuelChannels,
    /// Events from the most recent tick
    pub events: Vec<ReactorEvent>,
    next_id: u64,
}

impl ReactorState {
    /// Validate the config and seed the initial population.
    ///
    /// Uses `config.seed` when set, otherwise a fresh random seed.
    pub fn new(config: ReactorConfig) -> Result<Self> {
        let seed = config.seed.unwrap_or_else(rand::random);
        Self::with_seed(config, seed)
    }

    /// Validate the config and seed the initial population from `seed`
    pub fn with_seed(config: ReactorConfig, seed: u64) -> Result<Self> {
        let mut state = Self::empty(config, seed)?;

        let initial = state.config.initial.clone();
        state.spawn_random(ParticleKind::FastNeutron, initial.fast_neutrons);
        state.spawn_random(ParticleKind::Fuel, initial.fuel);
        state.spawn_random(ParticleKind::Moderator, initial.moderator);
        state.spawn_random(ParticleKind::Byproduct, initial.byproduct);

        log::info!(
            "Reactor ({}) seeded with {} particles, seed {}",
            state.config.profile.as_str(),
            state.particles.len(),
            seed
        );
        Ok(state)
    }

    /// Validated state with no particles
    pub fn empty(config: ReactorConfig, seed: u64) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            rng: Pcg32::seed_from_u64(seed),
            seed,
            time_ticks: 0,
            paused: false,
            particles: Vec::with_capacity(config.max_particles),
            rods: ControlRods::from_config(&config),
            channels: FuelChannels::from_config(&config),
            events: Vec::new(),
            next_id: 1,
            config,
        })
    }

    /// Allocate a new entity ID. IDs are never reused within a run.
    pub fn next_entity_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Active particles in storage order
    pub fn active(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter().filter(|p| p.active)
    }
}
