//! Reactor configuration
//!
//! Fixed at startup. Loaded from JSON or built from a profile preset, then
//! validated before the first tick.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{ConfigError, Result};
use crate::sim::{ParticleKind, Rule};

/// Which reaction table and core geometry are active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ReactorProfile {
    /// Discrete fuel nuclei scattered over the grid; fission emits thermal neutrons
    #[default]
    FuelParticles,
    /// Water moderator particles and continuous vertical fuel channels
    ModeratedChannels,
}

impl ReactorProfile {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReactorProfile::FuelParticles => "fuel",
            ReactorProfile::ModeratedChannels => "moderated",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "fuel" | "fuel-particles" | "a" => Some(ReactorProfile::FuelParticles),
            "moderated" | "moderated-channels" | "water" | "b" => {
                Some(ReactorProfile::ModeratedChannels)
            }
            _ => None,
        }
    }

    /// Interaction rules in evaluation order; the first that triggers wins
    pub fn rules(&self) -> &'static [Rule] {
        match self {
            ReactorProfile::FuelParticles => {
                &[Rule::FuelContact, Rule::ByproductContact, Rule::RodShadow]
            }
            ReactorProfile::ModeratedChannels => &[
                Rule::Moderation,
                Rule::ChannelCapture,
                Rule::ByproductContact,
                Rule::RodShadow,
            ],
        }
    }

    /// Whether fuel exists as particles (and may be injected)
    pub fn has_fuel_particles(&self) -> bool {
        *self == ReactorProfile::FuelParticles
    }

    /// Whether fuel channels capture neutrons
    pub fn has_channels(&self) -> bool {
        *self == ReactorProfile::ModeratedChannels
    }
}

/// Per-kind physical constants
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KindProps {
    /// Units moved per tick
    pub speed: f32,
    /// Collision radius is `cell_size / radius_divisor`
    pub radius_divisor: f32,
}

impl KindProps {
    pub const fn new(speed: f32, radius_divisor: f32) -> Self {
        Self {
            speed,
            radius_divisor,
        }
    }
}

/// Kind to constants lookup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KindTable {
    pub fast_neutron: KindProps,
    pub thermal_neutron: KindProps,
    pub moderator: KindProps,
    pub byproduct: KindProps,
    pub fuel: KindProps,
}

impl Default for KindTable {
    fn default() -> Self {
        Self {
            fast_neutron: KindProps::new(FAST_NEUTRON_SPEED, 8.0),
            thermal_neutron: KindProps::new(THERMAL_NEUTRON_SPEED, 8.0),
            moderator: KindProps::new(0.0, 4.0),
            byproduct: KindProps::new(0.0, 3.0),
            fuel: KindProps::new(0.0, 4.0),
        }
    }
}

impl KindTable {
    pub fn get(&self, kind: ParticleKind) -> KindProps {
        match kind {
            ParticleKind::FastNeutron => self.fast_neutron,
            ParticleKind::ThermalNeutron => self.thermal_neutron,
            ParticleKind::Moderator => self.moderator,
            ParticleKind::Byproduct => self.byproduct,
            ParticleKind::Fuel => self.fuel,
        }
    }

    /// Collision radius for a kind at the given cell size
    pub fn radius(&self, kind: ParticleKind, cell_size: f32) -> f32 {
        cell_size / self.get(kind).radius_divisor
    }
}

/// Reaction thresholds, each compared against one uniform draw in [0, 1)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReactionConfig {
    /// Neutron striking a fuel particle emits new neutrons
    pub fuel_fission_probability: f32,
    /// Thermal neutron captured by a fuel channel fissions
    pub channel_fission_probability: f32,
    /// Fast neutron striking a byproduct burns it out
    pub burnout_probability: f32,
    /// Neutrons emitted per fission (each subject to the cap)
    pub fission_neutrons: u32,
}

/// Per-tick background injection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InjectionConfig {
    /// Chance per tick of one fast neutron while population < cap / 2
    pub neutron_rate: f32,
    pub moderator_rate: f32,
    pub moderator_cap: usize,
    pub byproduct_rate: f32,
    pub byproduct_cap: usize,
}

/// Seed population placed at random cells on startup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeedCounts {
    pub fast_neutrons: usize,
    pub fuel: usize,
    pub moderator: usize,
    pub byproduct: usize,
}

impl SeedCounts {
    pub fn total(&self) -> usize {
        self.fast_neutrons + self.fuel + self.moderator + self.byproduct
    }
}

/// Fuel channel and control rod layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoreLayout {
    /// Grid columns holding fuel channels
    pub channel_columns: Vec<u32>,
    /// Grid columns holding control rods
    pub rod_columns: Vec<u32>,
    /// Initial insertion depth in cells
    pub initial_rod_depth: u32,
    /// Cells moved per rod adjustment
    pub rod_step: u32,
    /// Step multiplier for fast adjustment
    pub rod_fast_multiplier: u32,
    /// Reach added to a neutron's radius when testing a rod or channel line
    pub line_margin: f32,
}

impl CoreLayout {
    /// Channels every `CHANNEL_SPACING` columns, a rod beside each
    pub fn standard(grid_width: u32, grid_height: u32) -> Self {
        let channel_columns: Vec<u32> = (0..grid_width)
            .step_by(CHANNEL_SPACING as usize)
            .collect();
        let rod_columns = channel_columns
            .iter()
            .map(|c| c + ROD_OFFSET)
            .filter(|&c| c < grid_width)
            .collect();
        Self {
            channel_columns,
            rod_columns,
            initial_rod_depth: (grid_height / 2).max(1),
            rod_step: 1,
            rod_fast_multiplier: ROD_FAST_MULTIPLIER,
            line_margin: LINE_MARGIN,
        }
    }
}

/// Complete startup configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReactorConfig {
    pub profile: ReactorProfile,
    pub grid_width: u32,
    pub grid_height: u32,
    pub cell_size: f32,
    pub max_particles: usize,
    pub fps: u32,
    /// RNG seed; `None` seeds from OS entropy
    pub seed: Option<u64>,
    pub contact_epsilon: f32,
    pub kinds: KindTable,
    pub reactions: ReactionConfig,
    pub injection: InjectionConfig,
    pub initial: SeedCounts,
    pub layout: CoreLayout,
}

impl Default for ReactorConfig {
    fn default() -> Self {
        Self::from_profile(ReactorProfile::default())
    }
}

impl ReactorConfig {
    /// Preset configuration for a profile
    pub fn from_profile(profile: ReactorProfile) -> Self {
        let (reactions, injection, initial) = match profile {
            ReactorProfile::FuelParticles => (
                ReactionConfig {
                    fuel_fission_probability: 0.6,
                    channel_fission_probability: 0.5,
                    burnout_probability: 0.95,
                    fission_neutrons: FISSION_NEUTRONS,
                },
                InjectionConfig {
                    neutron_rate: 0.4,
                    moderator_rate: 0.0,
                    moderator_cap: 0,
                    byproduct_rate: 0.0,
                    byproduct_cap: 0,
                },
                SeedCounts {
                    fast_neutrons: INITIAL_NEUTRONS,
                    fuel: INITIAL_FUEL,
                    moderator: 0,
                    byproduct: 0,
                },
            ),
            ReactorProfile::ModeratedChannels => (
                ReactionConfig {
                    fuel_fission_probability: 0.6,
                    channel_fission_probability: 0.5,
                    burnout_probability: 0.8,
                    fission_neutrons: FISSION_NEUTRONS,
                },
                InjectionConfig {
                    neutron_rate: 0.4,
                    moderator_rate: 0.05,
                    moderator_cap: 200,
                    byproduct_rate: 0.01,
                    byproduct_cap: 60,
                },
                SeedCounts {
                    fast_neutrons: INITIAL_NEUTRONS,
                    fuel: 0,
                    moderator: INITIAL_MODERATOR,
                    byproduct: 0,
                },
            ),
        };

        Self {
            profile,
            grid_width: GRID_WIDTH,
            grid_height: GRID_HEIGHT,
            cell_size: CELL_SIZE,
            max_particles: MAX_PARTICLES,
            fps: FPS,
            seed: None,
            contact_epsilon: CONTACT_EPSILON,
            kinds: KindTable::default(),
            reactions,
            injection,
            initial,
            layout: CoreLayout::standard(GRID_WIDTH, GRID_HEIGHT),
        }
    }

    /// Parse JSON and validate
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read a JSON config file and validate it
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded {} config from {}", config.profile.as_str(), path.display());
        Ok(config)
    }

    /// Arena extent in simulation units
    pub fn arena(&self) -> Vec2 {
        Vec2::new(self.grid_width as f32, self.grid_height as f32) * self.cell_size
    }

    /// Reject configurations the simulation cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.grid_width == 0 {
            return Err(ConfigError::Zero { field: "grid_width" });
        }
        if self.grid_height == 0 {
            return Err(ConfigError::Zero {
                field: "grid_height",
            });
        }
        if !self.cell_size.is_finite() || self.cell_size <= 0.0 {
            return Err(ConfigError::Zero { field: "cell_size" });
        }
        if self.max_particles == 0 {
            return Err(ConfigError::Zero {
                field: "max_particles",
            });
        }
        if self.fps == 0 {
            return Err(ConfigError::Zero { field: "fps" });
        }
        if self.layout.rod_step == 0 {
            return Err(ConfigError::Zero { field: "rod_step" });
        }
        if self.layout.rod_fast_multiplier == 0 {
            return Err(ConfigError::Zero {
                field: "rod_fast_multiplier",
            });
        }

        check_constant("contact_epsilon", self.contact_epsilon)?;
        check_constant("line_margin", self.layout.line_margin)?;

        let kinds = [
            ("fast_neutron", &self.kinds.fast_neutron),
            ("thermal_neutron", &self.kinds.thermal_neutron),
            ("moderator", &self.kinds.moderator),
            ("byproduct", &self.kinds.byproduct),
            ("fuel", &self.kinds.fuel),
        ];
        for (name, props) in kinds {
            check_constant(name, props.speed)?;
            if !props.radius_divisor.is_finite() || props.radius_divisor <= 0.0 {
                return Err(ConfigError::Zero {
                    field: "radius_divisor",
                });
            }
        }

        let probabilities = [
            (
                "fuel_fission_probability",
                self.reactions.fuel_fission_probability,
            ),
            (
                "channel_fission_probability",
                self.reactions.channel_fission_probability,
            ),
            ("burnout_probability", self.reactions.burnout_probability),
            ("neutron_rate", self.injection.neutron_rate),
            ("moderator_rate", self.injection.moderator_rate),
            ("byproduct_rate", self.injection.byproduct_rate),
        ];
        for (field, value) in probabilities {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::Probability { field, value });
            }
        }

        let requested = self.initial.total();
        if requested > self.max_particles {
            return Err(ConfigError::SeedExceedsCap {
                requested,
                cap: self.max_particles,
            });
        }

        for &column in &self.layout.rod_columns {
            if column >= self.grid_width {
                return Err(ConfigError::ColumnOutOfRange {
                    what: "rod",
                    column,
                    width: self.grid_width,
                });
            }
        }
        for &column in &self.layout.channel_columns {
            if column >= self.grid_width {
                return Err(ConfigError::ColumnOutOfRange {
                    what: "channel",
                    column,
                    width: self.grid_width,
                });
            }
        }
        let depth = self.layout.initial_rod_depth;
        if depth < 1 || depth > self.grid_height {
            return Err(ConfigError::RodDepth {
                depth,
                height: self.grid_height,
            });
        }

        Ok(())
    }
}

fn check_constant(field: &'static str, value: f32) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(ConfigError::Constant { field, value });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_validate() {
        ReactorConfig::from_profile(ReactorProfile::FuelParticles)
            .validate()
            .unwrap();
        ReactorConfig::from_profile(ReactorProfile::ModeratedChannels)
            .validate()
            .unwrap();
    }

    #[test]
    fn standard_layout_matches_grid() {
        let layout = CoreLayout::standard(40, 21);
        assert_eq!(layout.channel_columns, vec![0, 4, 8, 12, 16, 20, 24, 28, 32, 36]);
        assert_eq!(layout.rod_columns, vec![2, 6, 10, 14, 18, 22, 26, 30, 34, 38]);
        assert_eq!(layout.initial_rod_depth, 10);
    }

    #[test]
    fn rod_beside_last_channel_is_dropped_when_off_grid() {
        let layout = CoreLayout::standard(9, 5);
        assert_eq!(layout.channel_columns, vec![0, 4, 8]);
        assert_eq!(layout.rod_columns, vec![2, 6]);
    }

    #[test]
    fn profile_from_str() {
        assert_eq!(
            ReactorProfile::from_str("Moderated"),
            Some(ReactorProfile::ModeratedChannels)
        );
        assert_eq!(
            ReactorProfile::from_str("fuel"),
            Some(ReactorProfile::FuelParticles)
        );
        assert_eq!(ReactorProfile::from_str("graphite"), None);
    }

    #[test]
    fn profile_rule_order() {
        assert_eq!(
            ReactorProfile::FuelParticles.rules(),
            &[Rule::FuelContact, Rule::ByproductContact, Rule::RodShadow]
        );
        assert_eq!(ReactorProfile::ModeratedChannels.rules()[0], Rule::Moderation);
    }

    #[test]
    fn zero_grid_rejected() {
        let mut config = ReactorConfig::default();
        config.grid_width = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("grid_width"));
    }

    #[test]
    fn bad_probability_rejected() {
        let mut config = ReactorConfig::default();
        config.reactions.burnout_probability = 1.2;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Probability {
                field: "burnout_probability",
                ..
            })
        ));

        config.reactions.burnout_probability = f32::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn seed_over_cap_rejected() {
        let mut config = ReactorConfig::default();
        config.max_particles = 50;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::SeedExceedsCap { requested: 170, cap: 50 })
        ));
    }

    #[test]
    fn rod_outside_grid_rejected() {
        let mut config = ReactorConfig::default();
        config.layout.rod_columns.push(40);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ColumnOutOfRange { what: "rod", column: 40, .. })
        ));
    }

    #[test]
    fn negative_speed_rejected() {
        let mut config = ReactorConfig::default();
        config.kinds.thermal_neutron.speed = -1.0;
        assert!(matches!(config.validate(), Err(ConfigError::Constant { .. })));
    }

    #[test]
    fn json_partial_fills_defaults() {
        let config = ReactorConfig::from_json(r#"{ "max_particles": 400, "seed": 7 }"#).unwrap();
        assert_eq!(config.max_particles, 400);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.grid_width, GRID_WIDTH);
    }

    #[test]
    fn json_invalid_values_fail_fast() {
        let err = ReactorConfig::from_json(r#"{ "cell_size": 0.0 }"#).unwrap_err();
        assert!(err.to_string().contains("cell_size"));

        let err = ReactorConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn json_round_trip_preserves_profile() {
        let config = ReactorConfig::from_profile(ReactorProfile::ModeratedChannels);
        let json = serde_json::to_string(&config).unwrap();
        let back = ReactorConfig::from_json(&json).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let err = ReactorConfig::load("/nonexistent/reactor.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
