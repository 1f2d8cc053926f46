//! Spatial interaction pass
//!
//! Finds what each moving neutron is touching this tick. Contact rules scan the
//! population in storage order and take the first qualifying candidate; there
//! is no nearest-first sort, so iteration order decides ties.

use serde::{Deserialize, Serialize};

use super::geometry::{ControlRods, FuelChannels};
use super::particle::{Particle, ParticleKind};

/// One interaction check. Each reactor profile lists these in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rule {
    /// Neutron strikes a fuel particle
    FuelContact,
    /// Neutron enters a moderator particle. Fast neutrons slow down; thermal
    /// ones are held for the tick with no change.
    Moderation,
    /// Thermal neutron reaches a fuel channel line
    ChannelCapture,
    /// Fast neutron strikes a byproduct particle
    ByproductContact,
    /// Neutron enters the region above a control rod's tip
    RodShadow,
}

impl Rule {
    /// Whether this rule is checked for a neutron of `kind`
    pub fn applies_to(&self, kind: ParticleKind) -> bool {
        match self {
            Rule::FuelContact | Rule::Moderation | Rule::RodShadow => kind.is_neutron(),
            Rule::ByproductContact => kind == ParticleKind::FastNeutron,
            Rule::ChannelCapture => kind == ParticleKind::ThermalNeutron,
        }
    }
}

/// A detected interaction, by index into the population
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interaction {
    FuelContact { neutron: usize, fuel: usize },
    Moderation { neutron: usize, moderator: usize },
    ChannelCapture { neutron: usize, channel: usize },
    ByproductContact { neutron: usize, byproduct: usize },
    RodShadow { neutron: usize, rod: usize },
}

impl Interaction {
    pub fn neutron(&self) -> usize {
        match *self {
            Interaction::FuelContact { neutron, .. }
            | Interaction::Moderation { neutron, .. }
            | Interaction::ChannelCapture { neutron, .. }
            | Interaction::ByproductContact { neutron, .. }
            | Interaction::RodShadow { neutron, .. } => neutron,
        }
    }
}

/// Read-only view of the population for one planning pass.
///
/// `consumed` records deactivations already planned earlier in the pass, so a
/// target claimed by one neutron is invisible to every later one.
pub struct Snapshot<'a> {
    pub particles: &'a [Particle],
    pub rods: &'a ControlRods,
    pub channels: &'a FuelChannels,
    pub contact_epsilon: f32,
    consumed: Vec<bool>,
}

impl<'a> Snapshot<'a> {
    pub fn new(
        particles: &'a [Particle],
        rods: &'a ControlRods,
        channels: &'a FuelChannels,
        contact_epsilon: f32,
    ) -> Self {
        Self {
            particles,
            rods,
            channels,
            contact_epsilon,
            consumed: vec![false; particles.len()],
        }
    }

    /// Active in storage and not consumed earlier in this pass
    #[inline]
    pub fn is_live(&self, i: usize) -> bool {
        self.particles[i].active && !self.consumed[i]
    }

    pub fn consume(&mut self, i: usize) {
        self.consumed[i] = true;
    }

    /// First live particle of `target` kind touching particle `i`
    pub fn find_contact(&self, i: usize, target: ParticleKind) -> Option<usize> {
        let p = &self.particles[i];
        self.particles.iter().enumerate().position(|(j, other)| {
            j != i && other.kind == target && self.is_live(j) && p.touches(other, self.contact_epsilon)
        })
    }

    /// Evaluate a single rule for particle `i`
    pub fn detect(&self, rule: Rule, i: usize) -> Option<Interaction> {
        let p = &self.particles[i];
        if !rule.applies_to(p.kind) {
            return None;
        }
        match rule {
            Rule::FuelContact => self
                .find_contact(i, ParticleKind::Fuel)
                .map(|fuel| Interaction::FuelContact { neutron: i, fuel }),
            Rule::Moderation => self
                .find_contact(i, ParticleKind::Moderator)
                .map(|moderator| Interaction::Moderation {
                    neutron: i,
                    moderator,
                }),
            Rule::ChannelCapture => self
                .channels
                .touching_channel(p.pos, p.radius)
                .map(|channel| Interaction::ChannelCapture {
                    neutron: i,
                    channel,
                }),
            Rule::ByproductContact => self
                .find_contact(i, ParticleKind::Byproduct)
                .map(|byproduct| Interaction::ByproductContact {
                    neutron: i,
                    byproduct,
                }),
            Rule::RodShadow => self
                .rods
                .absorbing_rod(p.pos, p.radius)
                .map(|rod| Interaction::RodShadow { neutron: i, rod }),
        }
    }
}
