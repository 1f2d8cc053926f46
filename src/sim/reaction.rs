//! Reaction resolver
//!
//! Turns a detected interaction into an effect: which particles deactivate,
//! which neutron thermalizes, and what gets spawned. Every probabilistic branch
//! is one uniform draw in [0, 1) against a configured threshold.

use glam::UVec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::interaction::{Interaction, Snapshot};
use super::particle::ParticleKind;
use crate::cell_of;
use crate::config::ReactorConfig;

/// Something observable that happened during a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReactorEvent {
    /// A nucleus split and requested `neutrons` new neutrons (before the cap)
    Fission { cell: UVec2, neutrons: u32 },
    /// A neutron was captured without emitting new neutrons
    Capture { cell: UVec2 },
    /// A fast neutron burned out a byproduct particle
    Burnout { cell: UVec2 },
    /// A neutron met moderator; fast ones leave it thermal
    Moderated { id: u64 },
    /// A neutron was absorbed by a control rod
    RodAbsorbed { rod: usize },
    /// A spawn was suppressed by the population cap
    SpawnDropped { kind: ParticleKind },
}

/// Where a spawned particle appears
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnSite {
    Cell(UVec2),
    RandomCell,
}

/// A pending spawn; neutrons get a random direction when committed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Spawn {
    pub kind: ParticleKind,
    pub site: SpawnSite,
}

impl Spawn {
    pub fn at(kind: ParticleKind, cell: UVec2) -> Self {
        Self {
            kind,
            site: SpawnSite::Cell(cell),
        }
    }

    pub fn anywhere(kind: ParticleKind) -> Self {
        Self {
            kind,
            site: SpawnSite::RandomCell,
        }
    }
}

/// The committed consequence of one interaction
#[derive(Debug, Clone, PartialEq)]
pub struct Effect {
    pub event: ReactorEvent,
    /// Indices to deactivate, in order
    pub deactivate: Vec<usize>,
    pub thermalize: Option<usize>,
    pub spawns: Vec<Spawn>,
}

impl Effect {
    fn new(event: ReactorEvent) -> Self {
        Self {
            event,
            deactivate: Vec::new(),
            thermalize: None,
            spawns: Vec::new(),
        }
    }
}

/// Decide the outcome of an interaction.
///
/// Returns `None` when the draw comes out negative and the interaction has no
/// effect at all (byproduct survived), in which case rule evaluation continues.
pub fn resolve<R: Rng>(
    interaction: Interaction,
    snapshot: &Snapshot<'_>,
    config: &ReactorConfig,
    rng: &mut R,
) -> Option<Effect> {
    let particles = snapshot.particles;
    let reactions = &config.reactions;

    match interaction {
        Interaction::FuelContact { neutron, fuel } => {
            // The strike always consumes both; only the emission is random
            let cell = cell_of(particles[fuel].pos, config.cell_size);
            let emits = rng.random::<f32>() < reactions.fuel_fission_probability;
            let mut effect = Effect::new(if emits {
                ReactorEvent::Fission {
                    cell,
                    neutrons: reactions.fission_neutrons,
                }
            } else {
                ReactorEvent::Capture { cell }
            });
            effect.deactivate = vec![neutron, fuel];
            effect.spawns.push(Spawn::at(ParticleKind::Byproduct, cell));
            if emits {
                for _ in 0..reactions.fission_neutrons {
                    effect
                        .spawns
                        .push(Spawn::at(ParticleKind::ThermalNeutron, cell));
                }
            }
            Some(effect)
        }

        Interaction::ChannelCapture { neutron, .. } => {
            let cell = cell_of(particles[neutron].pos, config.cell_size);
            let fissions = rng.random::<f32>() < reactions.channel_fission_probability;
            let mut effect = if fissions {
                let mut effect = Effect::new(ReactorEvent::Fission {
                    cell,
                    neutrons: reactions.fission_neutrons,
                });
                effect.spawns.push(Spawn::at(ParticleKind::Byproduct, cell));
                for _ in 0..reactions.fission_neutrons {
                    effect.spawns.push(Spawn::at(ParticleKind::FastNeutron, cell));
                }
                effect
            } else {
                Effect::new(ReactorEvent::Capture { cell })
            };
            effect.deactivate = vec![neutron];
            Some(effect)
        }

        Interaction::ByproductContact { neutron, byproduct } => {
            if rng.random::<f32>() >= reactions.burnout_probability {
                return None;
            }
            let cell = cell_of(particles[byproduct].pos, config.cell_size);
            let mut effect = Effect::new(ReactorEvent::Burnout { cell });
            effect.deactivate = vec![neutron, byproduct];
            if config.profile.has_fuel_particles() {
                effect.spawns.push(Spawn::anywhere(ParticleKind::Fuel));
            }
            Some(effect)
        }

        Interaction::Moderation { neutron, .. } => {
            // Thermal neutrons are held in the moderator for the tick, unchanged
            let mut effect = Effect::new(ReactorEvent::Moderated {
                id: particles[neutron].id,
            });
            effect.thermalize =
                (particles[neutron].kind == ParticleKind::FastNeutron).then_some(neutron);
            Some(effect)
        }

        Interaction::RodShadow { neutron, rod } => {
            let mut effect = Effect::new(ReactorEvent::RodAbsorbed { rod });
            effect.deactivate = vec![neutron];
            Some(effect)
        }
    }
}
