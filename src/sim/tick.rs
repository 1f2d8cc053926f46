//! Fixed timestep simulation tick
//!
//! One tick per frame: host commands, then kinematics, then an interaction
//! plan against an immutable snapshot, then commit, purge and background
//! injection.

use serde::{Deserialize, Serialize};

use super::geometry::RodAdjust;
use super::interaction::Snapshot;
use super::particle::ParticleKind;
use super::reaction::{Effect, ReactorEvent, resolve};
use super::state::ReactorState;

/// Host request to add particles at random cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Injection {
    pub kind: ParticleKind,
    pub count: usize,
}

impl Injection {
    pub fn new(kind: ParticleKind, count: usize) -> Self {
        Self { kind, count }
    }
}

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TickInput {
    /// Rod movement for this tick
    pub rods: Option<RodAdjust>,
    /// Pause toggle
    pub pause: bool,
    /// Particle injections, applied in order
    pub injections: Vec<Injection>,
}

/// Advance the reactor by one tick
pub fn tick(state: &mut ReactorState, input: &TickInput) {
    state.events.clear();

    // Rods and injections work while paused
    if let Some(adjust) = input.rods {
        state.rods.adjust(adjust);
    }
    for injection in &input.injections {
        state.inject(injection.kind, injection.count);
    }
    if input.pause {
        state.paused = !state.paused;
        log::info!("Reactor {}", if state.paused { "paused" } else { "resumed" });
    }
    if state.paused {
        return;
    }

    state.time_ticks += 1;

    let arena = state.config.arena();
    for particle in state.particles.iter_mut() {
        particle.advance(arena);
    }

    let effects = plan(state);
    commit(state, effects);

    state.purge();
    state.inject_background();
}

/// Resolve at most one effect per active neutron, in storage order.
///
/// Deactivations planned for earlier neutrons are visible to later ones
/// through the snapshot's consumed set.
fn plan(state: &mut ReactorState) -> Vec<Effect> {
    let ReactorState {
        config,
        rng,
        particles,
        rods,
        channels,
        ..
    } = state;
    let (config, particles) = (&*config, particles.as_slice());

    let mut snapshot = Snapshot::new(particles, rods, channels, config.contact_epsilon);
    let rules = config.profile.rules();
    let mut effects = Vec::new();

    for i in 0..particles.len() {
        if !particles[i].is_neutron() || !snapshot.is_live(i) {
            continue;
        }
        for &rule in rules {
            let Some(interaction) = snapshot.detect(rule, i) else {
                continue;
            };
            // A negative draw with no effect falls through to the next rule
            let Some(effect) = resolve(interaction, &snapshot, config, rng) else {
                continue;
            };
            for &idx in &effect.deactivate {
                snapshot.consume(idx);
            }
            log::trace!("tick: particle {} -> {:?}", particles[i].id, effect.event);
            effects.push(effect);
            break;
        }
    }

    effects
}

fn commit(state: &mut ReactorState, effects: Vec<Effect>) {
    for effect in effects {
        for idx in effect.deactivate {
            state.particles[idx].active = false;
        }
        if let Some(idx) = effect.thermalize {
            let (kinds, cell_size) = (&state.config.kinds, state.config.cell_size);
            state.particles[idx].thermalize(kinds, cell_size);
        }
        state.events.push(effect.event);
        for spawn in effect.spawns {
            state.spawn(spawn);
        }
    }
}

/// Count of events matching a predicate in the last tick
pub fn count_events(state: &ReactorState, pred: impl Fn(&ReactorEvent) -> bool) -> usize {
    state.events.iter().filter(|e| pred(e)).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ReactorConfig, ReactorProfile};
    use crate::sim::geometry::{ControlRods, RodAdjust};
    use glam::Vec2;

    /// Empty reactor with no seed population and no background injection
    fn quiet(profile: ReactorProfile) -> ReactorState {
        let mut config = ReactorConfig::from_profile(profile);
        config.initial.fast_neutrons = 0;
        config.initial.fuel = 0;
        config.initial.moderator = 0;
        config.injection.neutron_rate = 0.0;
        config.injection.moderator_rate = 0.0;
        config.injection.byproduct_rate = 0.0;
        ReactorState::empty(config, 1234).unwrap()
    }

    #[test]
    fn test_tick_pause() {
        let mut state = ReactorState::with_seed(ReactorConfig::default(), 12345).unwrap();
        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        tick(&mut state, &pause);
        assert!(state.paused);
        assert_eq!(state.time_ticks, 0);

        let positions: Vec<Vec2> = state.particles.iter().map(|p| p.pos).collect();
        tick(&mut state, &TickInput::default());
        let after: Vec<Vec2> = state.particles.iter().map(|p| p.pos).collect();
        assert_eq!(positions, after);

        tick(&mut state, &pause);
        assert!(!state.paused);
        assert_eq!(state.time_ticks, 1);
    }

    #[test]
    fn commands_apply_while_paused() {
        let mut state = quiet(ReactorProfile::FuelParticles);
        state.paused = true;
        let input = TickInput {
            rods: Some(RodAdjust::insert(3)),
            injections: vec![Injection::new(ParticleKind::FastNeutron, 4)],
            ..Default::default()
        };
        tick(&mut state, &input);
        assert_eq!(state.rods.depths()[0], 13);
        assert_eq!(state.particles.len(), 4);
    }

    #[test]
    fn fuel_strike_replaces_fuel_with_byproduct() {
        let mut state = quiet(ReactorProfile::FuelParticles);
        state.config.reactions.fuel_fission_probability = 1.0;
        let fuel = crate::cell_center(glam::UVec2::new(4, 10), 24.0);
        state.spawn_particle(ParticleKind::Fuel, fuel, Vec2::ZERO);
        state.spawn_particle(ParticleKind::FastNeutron, fuel - Vec2::new(10.0, 0.0), Vec2::X);

        tick(&mut state, &TickInput::default());

        let stats = state.stats();
        assert_eq!(stats.fuel, 0);
        assert_eq!(stats.fast_neutrons, 0);
        assert_eq!(stats.byproduct, 1);
        assert_eq!(stats.thermal_neutrons, 3);
        assert_eq!(state.active().find(|p| p.kind == ParticleKind::Byproduct).unwrap().pos, fuel);
    }

    #[test]
    fn one_fuel_particle_feeds_one_neutron() {
        let mut state = quiet(ReactorProfile::FuelParticles);
        state.config.reactions.fuel_fission_probability = 0.0;
        let fuel = crate::cell_center(glam::UVec2::new(4, 10), 24.0);
        state.spawn_particle(ParticleKind::Fuel, fuel, Vec2::ZERO);
        // Two neutrons converging on the same fuel particle
        state.spawn_particle(ParticleKind::FastNeutron, fuel - Vec2::new(10.0, 0.0), Vec2::X);
        state.spawn_particle(ParticleKind::FastNeutron, fuel + Vec2::new(10.0, 0.0), Vec2::NEG_X);

        tick(&mut state, &TickInput::default());

        // First neutron in storage order claims it; the second flies on
        assert_eq!(state.count(ParticleKind::FastNeutron), 1);
        assert_eq!(state.count(ParticleKind::Byproduct), 1);
        assert_eq!(
            count_events(&state, |e| matches!(e, ReactorEvent::Capture { .. })),
            1
        );
    }

    #[test]
    fn byproduct_survivor_still_checks_rods() {
        let mut state = quiet(ReactorProfile::FuelParticles);
        state.config.reactions.burnout_probability = 0.0;
        state.rods.set_depth(21);
        let rod_x = state.rods.x(0);
        state.spawn_particle(ParticleKind::Byproduct, Vec2::new(rod_x + 4.0, 100.0), Vec2::ZERO);
        state.spawn_particle(ParticleKind::FastNeutron, Vec2::new(rod_x, 100.0), Vec2::Y);

        tick(&mut state, &TickInput::default());

        assert_eq!(state.count(ParticleKind::FastNeutron), 0);
        assert_eq!(state.count(ParticleKind::Byproduct), 1);
        assert_eq!(state.events, vec![ReactorEvent::RodAbsorbed { rod: 0 }]);
    }

    #[test]
    fn burnout_regrows_fuel_somewhere() {
        let mut state = quiet(ReactorProfile::FuelParticles);
        state.config.reactions.burnout_probability = 1.0;
        let at = Vec2::new(300.0, 300.0);
        state.spawn_particle(ParticleKind::Byproduct, at, Vec2::ZERO);
        state.spawn_particle(ParticleKind::FastNeutron, at - Vec2::new(8.0, 0.0), Vec2::X);

        tick(&mut state, &TickInput::default());

        let stats = state.stats();
        assert_eq!(stats.byproduct, 0);
        assert_eq!(stats.fast_neutrons, 0);
        assert_eq!(stats.fuel, 1);
    }

    #[test]
    fn moderation_then_channel_capture() {
        let mut state = quiet(ReactorProfile::ModeratedChannels);
        state.config.reactions.channel_fission_probability = 0.0;
        state.rods.set_depth(1);
        // Between channels at x=96 and x=192, heading toward x=96
        let water = Vec2::new(130.0, 300.0);
        state.spawn_particle(ParticleKind::Moderator, water, Vec2::ZERO);
        state.spawn_particle(ParticleKind::FastNeutron, water + Vec2::new(6.0, 0.0), Vec2::NEG_X);

        tick(&mut state, &TickInput::default());
        assert_eq!(state.count(ParticleKind::ThermalNeutron), 1);
        assert_eq!(state.count(ParticleKind::Moderator), 1);

        let mut captured = false;
        for _ in 0..40 {
            tick(&mut state, &TickInput::default());
            if count_events(&state, |e| matches!(e, ReactorEvent::Capture { .. })) > 0 {
                captured = true;
                break;
            }
            // Never reverts to fast
            assert_eq!(state.count(ParticleKind::FastNeutron), 0);
        }
        assert!(captured);
        assert_eq!(state.count(ParticleKind::ThermalNeutron), 0);
    }

    #[test]
    fn fast_neutrons_pass_through_channels() {
        let mut state = quiet(ReactorProfile::ModeratedChannels);
        state.rods.set_depth(1);
        state.spawn_particle(ParticleKind::FastNeutron, Vec2::new(100.0, 300.0), Vec2::NEG_X);
        for _ in 0..5 {
            tick(&mut state, &TickInput::default());
        }
        assert_eq!(state.count(ParticleKind::FastNeutron), 1);
    }

    /// Moderated reactor with a fully inserted rod sharing the column of the
    /// channel at x=96
    fn rod_over_channel() -> ReactorState {
        let mut state = quiet(ReactorProfile::ModeratedChannels);
        state.config.reactions.channel_fission_probability = 0.0;
        state.config.layout.rod_columns = vec![4];
        state.rods = ControlRods::from_config(&state.config);
        state.rods.set_depth(21);
        state
    }

    #[test]
    fn thermal_neutron_in_moderator_skips_channel() {
        let mut state = quiet(ReactorProfile::ModeratedChannels);
        state.config.reactions.channel_fission_probability = 0.0;
        let channel_x = state.channels.x(1);
        state.spawn_particle(ParticleKind::Moderator, Vec2::new(channel_x + 3.0, 400.0), Vec2::ZERO);
        state.spawn_particle(ParticleKind::ThermalNeutron, Vec2::new(channel_x, 400.0), Vec2::Y);

        tick(&mut state, &TickInput::default());

        assert_eq!(state.events, vec![ReactorEvent::Moderated { id: 2 }]);
        assert_eq!(state.count(ParticleKind::ThermalNeutron), 1);
        assert_eq!(state.count(ParticleKind::Moderator), 1);
    }

    #[test]
    fn moderation_comes_before_byproduct() {
        let mut state = quiet(ReactorProfile::ModeratedChannels);
        state.config.reactions.burnout_probability = 1.0;
        state.spawn_particle(ParticleKind::Moderator, Vec2::new(305.0, 404.0), Vec2::ZERO);
        state.spawn_particle(ParticleKind::Byproduct, Vec2::new(295.0, 404.0), Vec2::ZERO);
        state.spawn_particle(ParticleKind::FastNeutron, Vec2::new(300.0, 400.0), Vec2::Y);

        tick(&mut state, &TickInput::default());

        assert_eq!(state.events, vec![ReactorEvent::Moderated { id: 3 }]);
        assert_eq!(state.count(ParticleKind::Byproduct), 1);
        assert_eq!(state.count(ParticleKind::ThermalNeutron), 1);
    }

    #[test]
    fn channel_comes_before_rod_for_thermal_neutrons() {
        let mut state = rod_over_channel();
        state.spawn_particle(ParticleKind::ThermalNeutron, Vec2::new(96.0, 300.0), Vec2::Y);

        tick(&mut state, &TickInput::default());

        assert_eq!(
            state.events,
            vec![ReactorEvent::Capture {
                cell: glam::UVec2::new(4, 12)
            }]
        );
        assert_eq!(state.stats().neutrons(), 0);
    }

    #[test]
    fn fast_neutron_on_channel_is_taken_by_rod() {
        let mut state = rod_over_channel();
        state.spawn_particle(ParticleKind::FastNeutron, Vec2::new(96.0, 300.0), Vec2::Y);

        tick(&mut state, &TickInput::default());

        assert_eq!(state.events, vec![ReactorEvent::RodAbsorbed { rod: 0 }]);
        assert_eq!(state.stats().neutrons(), 0);
    }

    #[test]
    fn deactivated_particles_are_purged_same_tick() {
        let mut state = quiet(ReactorProfile::FuelParticles);
        state.rods.set_depth(21);
        let rod_x = state.rods.x(0);
        state.spawn_particle(ParticleKind::FastNeutron, Vec2::new(rod_x, 200.0), Vec2::Y);
        tick(&mut state, &TickInput::default());
        assert!(state.particles.is_empty());
    }

    #[test]
    fn test_determinism() {
        let mut state1 = ReactorState::with_seed(ReactorConfig::default(), 99999).unwrap();
        let mut state2 = ReactorState::with_seed(ReactorConfig::default(), 99999).unwrap();

        let inputs = [
            TickInput {
                rods: Some(RodAdjust::withdraw(3)),
                ..Default::default()
            },
            TickInput {
                injections: vec![Injection::new(ParticleKind::FastNeutron, 10)],
                ..Default::default()
            },
            TickInput::default(),
            TickInput {
                injections: vec![Injection::new(ParticleKind::Fuel, 5)],
                ..Default::default()
            },
        ];

        for _ in 0..50 {
            for input in &inputs {
                tick(&mut state1, input);
                tick(&mut state2, input);
                assert_eq!(state1.stats(), state2.stats());
            }
        }

        assert_eq!(state1.time_ticks, state2.time_ticks);
        assert_eq!(state1.particles.len(), state2.particles.len());
    }
}
