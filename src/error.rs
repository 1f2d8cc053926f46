use thiserror::Error;

/// Crate-wide result type alias.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Startup configuration errors.
///
/// The running simulation has no failure paths; everything that can go wrong is
/// caught here before the first tick. Each variant names the offending field.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A size, count or rate that must be strictly positive was zero.
    #[error("{field} must be greater than zero")]
    Zero { field: &'static str },

    /// A probability outside [0, 1] or not finite.
    #[error("probability {field} = {value} is outside [0, 1]")]
    Probability { field: &'static str, value: f32 },

    /// A non-finite or negative physical constant.
    #[error("{field} = {value} must be finite and non-negative")]
    Constant { field: &'static str, value: f32 },

    /// Seed population does not fit under the population cap.
    #[error("initial population {requested} exceeds max_particles {cap}")]
    SeedExceedsCap { requested: usize, cap: usize },

    /// A rod or channel column lies outside the grid.
    #[error("{what} column {column} is outside the grid width {width}")]
    ColumnOutOfRange {
        what: &'static str,
        column: u32,
        width: u32,
    },

    /// Initial rod depth outside [1, grid_height].
    #[error("initial rod depth {depth} is outside [1, {height}]")]
    RodDepth { depth: u32, height: u32 },

    /// Unknown reactor profile name.
    #[error("unknown reactor profile: {0}")]
    UnknownProfile(String),

    /// Config file could not be read.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Config file is not valid JSON for `ReactorConfig`.
    #[error("config parse error: {0}")]
    Parse(#[from] serde_json::Error),
}
