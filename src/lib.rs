//! # pherotrace
//!
//! Ant colony optimization over volumetric density maps.
//!
//! A growing population of stochastic walkers searches a 3-D voxel grid for
//! high-scoring, loop-free paths between two points. Moves are biased by a
//! decaying, self-reinforcing pheromone field; scores and per-cell waiting
//! times come from an externally supplied density map (e.g. a blurred
//! molecular structure).
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use pherotrace::{Colony, Config};
//!
//! let config = Config::default();
//! let density = config.map.build(config.grid.shape).unwrap();
//!
//! let mut colony = Colony::new(config, density).unwrap();
//! colony.run().unwrap();
//!
//! match colony.best_solution() {
//!     Ok(solution) => println!("best path: {}", solution),
//!     Err(e) => println!("{}", e),
//! }
//! ```
//!
//! ## Reproducibility
//!
//! ```rust,no_run
//! use pherotrace::{Colony, Config, DensityField};
//!
//! let config = Config::default();
//! let density = DensityField::uniform(config.grid.shape, 0.3).unwrap();
//!
//! // Same seed, same config: identical paths and scores
//! let mut colony = Colony::new_with_seed(config, density, 42).unwrap();
//! colony.run().unwrap();
//! ```

pub mod ant;
pub mod checkpoint;
pub mod colony;
pub mod config;
pub mod coord;
pub mod density;
pub mod error;
pub mod pheromone;
pub mod stats;

// Re-export main types
pub use ant::Ant;
pub use colony::{Colony, Solution};
pub use config::Config;
pub use coord::Coord;
pub use density::DensityField;
pub use error::SimError;
pub use pheromone::PheromoneField;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Run a quick benchmark
pub fn benchmark(rounds: u32, ants_per_round: u32) -> Result<BenchmarkResult, String> {
    use std::time::Instant;

    let mut config = Config::default();
    config.colony.rounds = rounds;
    config.colony.ants_per_round = ants_per_round;

    let density = config.map.build(config.grid.shape)?;
    let mut colony = Colony::new_with_seed(config, density, 42)?;

    let start = Instant::now();
    colony.run().map_err(|e| e.to_string())?;
    let elapsed = start.elapsed();

    Ok(BenchmarkResult {
        rounds,
        ants_per_round,
        ticks: colony.time,
        valid_paths: colony.valid_count(),
        best_score: colony.best_solution().map(|s| s.score).ok(),
        elapsed_secs: elapsed.as_secs_f64(),
        ticks_per_second: colony.time as f64 / elapsed.as_secs_f64(),
    })
}

/// Benchmark result
#[derive(Debug, Clone)]
pub struct BenchmarkResult {
    pub rounds: u32,
    pub ants_per_round: u32,
    pub ticks: u64,
    pub valid_paths: usize,
    pub best_score: Option<f64>,
    pub elapsed_secs: f64,
    pub ticks_per_second: f64,
}

impl std::fmt::Display for BenchmarkResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Benchmark Results ===")?;
        writeln!(f, "Rounds: {} x {} ants", self.rounds, self.ants_per_round)?;
        writeln!(f, "Ticks: {}", self.ticks)?;
        writeln!(f, "Valid paths: {}", self.valid_paths)?;
        match self.best_score {
            Some(score) => writeln!(f, "Best score: {:.4}", score)?,
            None => writeln!(f, "Best score: none")?,
        }
        writeln!(f, "Time: {:.3}s", self.elapsed_secs)?;
        writeln!(f, "Speed: {:.1} ticks/s", self.ticks_per_second)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_quick_simulation() {
        let mut config = Config::default();
        config.colony.rounds = 2;
        let density = config.map.build(config.grid.shape).unwrap();

        let mut colony = Colony::new_with_seed(config, density, 1).unwrap();
        colony.run().unwrap();

        assert_eq!(colony.time, 60);
        assert_eq!(colony.population(), 20);
    }

    #[test]
    fn test_benchmark() {
        let result = benchmark(2, 5).unwrap();

        assert_eq!(result.rounds, 2);
        assert_eq!(result.ticks, 60);
        assert!(result.ticks_per_second > 0.0);
    }
}
