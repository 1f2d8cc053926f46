//! Deterministic simulation module
//!
//! All reactor logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (storage order)
//! - No rendering or platform dependencies

pub mod clock;
pub mod geometry;
pub mod interaction;
pub mod particle;
pub mod population;
pub mod reaction;
pub mod state;
pub mod tick;

pub use clock::FixedStep;
pub use geometry::{ControlRods, FuelChannels, RodAdjust, RodDirection};
pub use interaction::{Interaction, Rule, Snapshot};
pub use particle::{Particle, ParticleKind};
pub use population::PopulationStats;
pub use reaction::{Effect, ReactorEvent, Spawn, SpawnSite, resolve};
pub use state::ReactorState;
pub use tick::{Injection, TickInput, count_events, tick};
