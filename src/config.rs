//! Configuration for a simulation run.
//!
//! Supports YAML configuration files with sensible defaults. Every knob is
//! threaded explicitly through [`crate::Colony::new`]; there is no ambient
//! state.

use crate::coord::Coord;
use crate::density::DensityField;
use crate::pheromone::DepositPolicy;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    pub grid: GridConfig,
    pub search: SearchConfig,
    pub colony: ColonyConfig,
    pub pheromone: PheromoneConfig,
    #[serde(default)]
    pub map: MapConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Grid extent and excluded voxels
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridConfig {
    /// Voxel grid extent along each axis
    pub shape: [usize; 3],
    /// Voxels pinned to zero pheromone alongside the border
    #[serde(default)]
    pub mask: Vec<[usize; 3]>,
}

/// Endpoints and move budget of the path search
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Shared spawn coordinate for every ant
    pub start: [usize; 3],
    /// Goal coordinate a valid path must end on
    pub goal: [usize; 3],
    /// Exact number of moves a valid path spends (ttl budget)
    pub path_length: u32,
}

/// Population schedule
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColonyConfig {
    /// Number of spawn rounds
    pub rounds: u32,
    /// Ants added at the start of each round
    pub ants_per_round: u32,
    /// Ticks simulated per round
    pub ticks_per_round: u32,
    /// Sampling retries before an ant gives up on a tick
    pub number_of_tries: u32,
}

/// Pheromone dynamics and deposit policy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PheromoneConfig {
    /// Multiplicative decay applied each tick, in (0, 1]
    pub decay: f64,
    /// Floor for non-border cells
    pub min_value: f64,
    /// Pheromone every ant deposits at its position each tick
    pub base_deposit: f64,
    /// Extra deposit for ants on their goal; 0 disables
    pub goal_bonus: f64,
    /// Spread the goal bonus to the 6 neighboring cells
    pub spread_to_neighbors: bool,
    /// Goal bonus also requires an exhausted move budget
    pub bonus_requires_exhausted_ttl: bool,
}

/// Synthetic density map for runs without an external map file
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MapConfig {
    /// Same density everywhere
    Uniform { value: f64 },
    /// Axial ramp along z (z / 10)
    Gradient,
}

/// Logging and checkpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Ticks between stats history snapshots
    pub stats_interval: u64,
    /// Ticks between checkpoints
    pub checkpoint_interval: u64,
    /// Log level (error, warn, info, debug, trace)
    pub log_level: String,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            shape: [5, 5, 10],
            mask: Vec::new(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            start: [1, 1, 1],
            goal: [3, 3, 3],
            path_length: 8,
        }
    }
}

impl Default for ColonyConfig {
    fn default() -> Self {
        Self {
            rounds: 100,
            ants_per_round: 10,
            ticks_per_round: 30,
            number_of_tries: 100,
        }
    }
}

impl Default for PheromoneConfig {
    fn default() -> Self {
        Self {
            decay: 0.9,
            min_value: 1.0,
            base_deposit: 1.0,
            goal_bonus: 0.2,
            spread_to_neighbors: true,
            bonus_requires_exhausted_ttl: false,
        }
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        Self::Gradient
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            stats_interval: 10,
            checkpoint_interval: 500,
            log_level: "info".to_string(),
        }
    }
}

impl MapConfig {
    /// Build the synthetic density field for the configured grid
    pub fn build(&self, shape: [usize; 3]) -> Result<DensityField, String> {
        match self {
            Self::Uniform { value } => DensityField::uniform(shape, *value),
            Self::Gradient => Ok(DensityField::gradient(shape)),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a YAML file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), Box<dyn std::error::Error>> {
        let yaml = serde_yaml::to_string(self)?;
        std::fs::write(path, yaml)?;
        Ok(())
    }

    /// Start coordinate
    pub fn start(&self) -> Coord {
        Coord::from(self.search.start)
    }

    /// Goal coordinate
    pub fn goal(&self) -> Coord {
        Coord::from(self.search.goal)
    }

    /// Masked voxels as coordinates
    pub fn mask_coords(&self) -> Vec<Coord> {
        self.grid.mask.iter().copied().map(Coord::from).collect()
    }

    /// Deposit policy for the pheromone field
    pub fn deposit_policy(&self) -> DepositPolicy {
        DepositPolicy {
            base_deposit: self.pheromone.base_deposit,
            goal_bonus: self.pheromone.goal_bonus,
            spread_to_neighbors: self.pheromone.spread_to_neighbors,
            bonus_requires_exhausted_ttl: self.pheromone.bonus_requires_exhausted_ttl,
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), String> {
        let shape = self.grid.shape;
        if shape.iter().any(|&n| n < 3) {
            return Err("every grid axis must be at least 3 cells".to_string());
        }
        if !(self.pheromone.decay > 0.0 && self.pheromone.decay <= 1.0) {
            return Err("decay must be in (0, 1]".to_string());
        }
        if self.pheromone.min_value <= 0.0 {
            return Err("min_value must be > 0".to_string());
        }
        if self.pheromone.base_deposit <= 0.0 {
            return Err("base_deposit must be > 0".to_string());
        }
        if self.pheromone.goal_bonus < 0.0 {
            return Err("goal_bonus must be >= 0".to_string());
        }
        if self.search.path_length == 0 {
            return Err("path_length must be > 0".to_string());
        }
        if self.colony.rounds == 0
            || self.colony.ants_per_round == 0
            || self.colony.ticks_per_round == 0
        {
            return Err("rounds, ants_per_round and ticks_per_round must be > 0".to_string());
        }
        if self.colony.number_of_tries == 0 {
            return Err("number_of_tries must be > 0".to_string());
        }
        if self.logging.stats_interval == 0 || self.logging.checkpoint_interval == 0 {
            return Err("stats_interval and checkpoint_interval must be > 0".to_string());
        }

        let start = self.start();
        let goal = self.goal();
        for (name, c) in [("start", start), ("goal", goal)] {
            if !c.in_bounds(shape) {
                return Err(format!("{} {} lies outside the grid", name, c));
            }
            if c.on_border(shape) {
                return Err(format!("{} {} lies on the zero-pheromone border", name, c));
            }
        }
        if start == goal {
            return Err("start and goal must differ".to_string());
        }

        for &voxel in &self.grid.mask {
            let c = Coord::from(voxel);
            if !c.in_bounds(shape) {
                return Err(format!("masked voxel {} lies outside the grid", c));
            }
            if c == start || c == goal {
                return Err(format!("masked voxel {} covers start or goal", c));
            }
        }

        Ok(())
    }
}
