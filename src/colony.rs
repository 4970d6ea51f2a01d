//! Colony controller: owns the population and drives the simulation.
//!
//! Tick ordering is the load-bearing guarantee: within a tick every ant
//! completes its move against the pheromone state left by the previous
//! tick's reinforcement, and only then is the field reinforced once from
//! the post-move positions. No ant ever observes a same-tick deposit.

use crate::ant::{Ant, AntId};
use crate::checkpoint::Checkpoint;
use crate::config::Config;
use crate::coord::Coord;
use crate::density::DensityField;
use crate::error::SimError;
use crate::pheromone::{DepositPolicy, PheromoneField};
use crate::stats::{Stats, StatsHistory};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

/// The best valid path found by a run
#[derive(Clone, Debug)]
pub struct Solution {
    pub ant: AntId,
    pub path: Vec<Coord>,
    pub score: f64,
}

impl std::fmt::Display for Solution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, c) in self.path.iter().enumerate() {
            if i > 0 {
                write!(f, " --> ")?;
            }
            write!(f, "{}", c)?;
        }
        write!(f, "  (score {:.4}, ant {})", self.score, self.ant)
    }
}

/// The simulation: ant population, fields, clock, and RNG
pub struct Colony {
    // Population, in creation order
    pub ants: Vec<Ant>,

    // Fields
    pub pheromone: PheromoneField,
    pub density: DensityField,

    // Clock
    pub time: u64,
    pub round: u32,

    // Configuration
    pub config: Config,

    // Statistics
    pub stats: Stats,
    pub stats_history: StatsHistory,

    policy: DepositPolicy,
    start: Coord,
    goal: Coord,
    next_ant_id: AntId,

    // Random number generator (seeded for reproducibility)
    rng: ChaCha8Rng,
    seed: u64,
}

impl Colony {
    /// Create a colony with a random seed
    pub fn new(config: Config, density: DensityField) -> Result<Self, String> {
        let seed = rand::thread_rng().gen();
        Self::new_with_seed(config, density, seed)
    }

    /// Create a colony with a specific seed for reproducibility
    pub fn new_with_seed(config: Config, density: DensityField, seed: u64) -> Result<Self, String> {
        config.validate()?;
        if density.shape() != config.grid.shape {
            return Err(format!(
                "density shape {:?} does not match configured grid {:?}",
                density.shape(),
                config.grid.shape
            ));
        }

        let pheromone = PheromoneField::with_mask(
            config.grid.shape,
            config.pheromone.min_value,
            config.pheromone.decay,
            config.mask_coords(),
        );

        Ok(Self {
            ants: Vec::new(),
            pheromone,
            density,
            time: 0,
            round: 0,
            stats: Stats::new(),
            stats_history: StatsHistory::new(config.logging.stats_interval),
            policy: config.deposit_policy(),
            start: config.start(),
            goal: config.goal(),
            next_ant_id: 0,
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
            config,
        })
    }

    /// Restore a colony from a checkpoint
    pub fn from_checkpoint(checkpoint: Checkpoint) -> Self {
        let stats_interval = checkpoint.config.logging.stats_interval;
        Self {
            ants: checkpoint.ants,
            pheromone: checkpoint.pheromone,
            density: checkpoint.density,
            time: checkpoint.time,
            round: checkpoint.round,
            stats: checkpoint.stats,
            stats_history: StatsHistory::new(stats_interval),
            policy: checkpoint.config.deposit_policy(),
            start: checkpoint.config.start(),
            goal: checkpoint.config.goal(),
            next_ant_id: checkpoint.next_ant_id,
            rng: ChaCha8Rng::seed_from_u64(checkpoint.random_seed),
            seed: checkpoint.random_seed,
            config: checkpoint.config,
        }
    }

    /// Snapshot the full simulation state
    pub fn create_checkpoint(&self) -> Checkpoint {
        Checkpoint::new(
            self.time,
            self.round,
            self.config.clone(),
            self.ants.clone(),
            self.pheromone.clone(),
            self.density.clone(),
            self.stats.clone(),
            self.next_ant_id,
            self.seed,
        )
    }

    /// Spawn one batch of ants at the shared start coordinate
    pub fn spawn_round(&mut self) {
        let batch = self.config.colony.ants_per_round;
        for _ in 0..batch {
            let ant = Ant::new(
                self.next_ant_id,
                self.start,
                self.goal,
                self.config.search.path_length,
            );
            self.ants.push(ant);
            self.next_ant_id += 1;
        }
        log::debug!("round {}: spawned {} ants, population {}", self.round, batch, self.ants.len());
    }

    /// One simulation tick: every ant moves, then the field is reinforced
    /// once from the post-move snapshot.
    ///
    /// An error aborts the tick before reinforcement, so a failed tick
    /// never leaves the pheromone field partially updated.
    pub fn tick(&mut self) -> Result<(), SimError> {
        let tries = self.config.colony.number_of_tries;
        let alive_before = self.ants.iter().filter(|a| a.is_alive()).count();

        for ant in &mut self.ants {
            ant.step(&self.density, &self.pheromone, tries, &mut self.rng)?;
        }
        self.pheromone.reinforce(&self.ants, &self.policy);

        self.time += 1;
        let alive_after = self.ants.iter().filter(|a| a.is_alive()).count();
        self.update_stats(alive_before - alive_after);
        Ok(())
    }

    /// Spawn a batch and run a full round of ticks
    pub fn run_round(&mut self) -> Result<(), SimError> {
        self.spawn_round();
        for _ in 0..self.config.colony.ticks_per_round {
            self.tick()?;
        }
        self.round += 1;
        log::info!(
            "round {}/{}: {}",
            self.round,
            self.config.colony.rounds,
            self.stats.summary()
        );
        Ok(())
    }

    /// Run all remaining rounds
    pub fn run(&mut self) -> Result<(), SimError> {
        while self.round < self.config.colony.rounds {
            self.run_round()?;
        }
        Ok(())
    }

    /// Best valid path, ties broken by earliest-created ant
    pub fn best_solution(&self) -> Result<Solution, SimError> {
        let mut best: Option<&Ant> = None;
        for ant in &self.ants {
            if !ant.is_valid() {
                continue;
            }
            if best.map_or(true, |b| ant.score > b.score) {
                best = Some(ant);
            }
        }

        best.map(|ant| Solution {
            ant: ant.id,
            path: ant.path.clone(),
            score: ant.score,
        })
        .ok_or(SimError::NoSolutionFound)
    }

    /// Total population, dead ants included
    pub fn population(&self) -> usize {
        self.ants.len()
    }

    /// Ants still moving
    pub fn alive_count(&self) -> usize {
        self.ants.iter().filter(|a| a.is_alive()).count()
    }

    /// Ants holding a finished, on-goal path
    pub fn valid_count(&self) -> usize {
        self.ants.iter().filter(|a| a.is_valid()).count()
    }

    /// Seed for reproducibility
    pub fn seed(&self) -> u64 {
        self.seed
    }

    fn update_stats(&mut self, deaths: usize) {
        self.stats.time = self.time;
        self.stats.round = self.round;
        self.stats.deaths = deaths;
        self.stats.update(&self.ants, self.pheromone.total());

        if self.time % self.config.logging.stats_interval == 0 {
            self.stats_history.record(self.stats.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corridor_config() -> Config {
        let mut config = Config::default();
        config.grid.shape = [3, 3, 12];
        config.search.start = [1, 1, 1];
        config.search.goal = [1, 1, 9];
        config.search.path_length = 8;
        config.colony.rounds = 3;
        config.colony.ants_per_round = 5;
        config.colony.ticks_per_round = 30;
        config
    }

    fn corridor_density() -> DensityField {
        DensityField::uniform([3, 3, 12], 0.3).unwrap()
    }

    #[test]
    fn test_colony_creation() {
        let colony = Colony::new_with_seed(corridor_config(), corridor_density(), 1).unwrap();
        assert_eq!(colony.population(), 0);
        assert_eq!(colony.time, 0);
        assert_eq!(colony.round, 0);
    }

    #[test]
    fn test_shape_mismatch_rejected() {
        let density = DensityField::uniform([4, 4, 4], 0.3).unwrap();
        assert!(Colony::new_with_seed(corridor_config(), density, 1).is_err());
    }

    #[test]
    fn test_population_grows_per_round() {
        let mut colony = Colony::new_with_seed(corridor_config(), corridor_density(), 2).unwrap();

        colony.run_round().unwrap();
        assert_eq!(colony.population(), 5);
        colony.run_round().unwrap();
        assert_eq!(colony.population(), 10);
        assert_eq!(colony.time, 60);
    }

    #[test]
    fn test_corridor_run_finds_the_path() {
        let mut colony = Colony::new_with_seed(corridor_config(), corridor_density(), 3).unwrap();
        colony.run().unwrap();

        let solution = colony.best_solution().unwrap();
        assert_eq!(solution.path.len(), 9);
        assert_eq!(*solution.path.last().unwrap(), Coord::new(1, 1, 9));
        assert!((solution.score - 2.4).abs() < 1e-9);
    }

    #[test]
    fn test_no_solution_found() {
        let mut config = corridor_config();
        config.colony.rounds = 1;
        config.colony.ticks_per_round = 1;

        let mut colony = Colony::new_with_seed(config, corridor_density(), 4).unwrap();
        colony.run().unwrap();

        assert_eq!(colony.best_solution().unwrap_err(), SimError::NoSolutionFound);
    }

    #[test]
    fn test_stable_tie_break() {
        let mut colony = Colony::new_with_seed(corridor_config(), corridor_density(), 5).unwrap();

        let mut first = Ant::new(0, colony.start, colony.goal, 8);
        first.current = colony.goal;
        first.ttl = 0;
        first.score = 2.4;
        let mut second = first.clone();
        second.id = 1;
        colony.ants.push(first);
        colony.ants.push(second);

        assert_eq!(colony.best_solution().unwrap().ant, 0);
    }

    #[test]
    fn test_dead_ants_stay_in_population() {
        let mut config = corridor_config();
        // two-cell corridor kills every ant on its second active tick
        config.grid.shape = [3, 3, 4];
        config.search.start = [1, 1, 1];
        config.search.goal = [1, 1, 2];
        config.search.path_length = 8;
        config.colony.rounds = 1;

        let density = DensityField::uniform([3, 3, 4], 0.3).unwrap();
        let mut colony = Colony::new_with_seed(config, density, 6).unwrap();
        colony.run().unwrap();

        assert_eq!(colony.population(), 5);
        assert_eq!(colony.alive_count(), 0);
    }

    #[test]
    fn test_invalid_density_aborts_run() {
        let density = DensityField::uniform([3, 3, 12], 0.0).unwrap();
        let mut colony = Colony::new_with_seed(corridor_config(), density, 7).unwrap();

        let err = colony.run().unwrap_err();
        assert!(matches!(err, SimError::InvalidDensity { .. }));
    }

    #[test]
    fn test_failed_tick_leaves_field_untouched() {
        let density = DensityField::uniform([3, 3, 12], 0.0).unwrap();
        let mut colony = Colony::new_with_seed(corridor_config(), density, 8).unwrap();
        colony.spawn_round();

        let before = colony.pheromone.total();
        assert!(colony.tick().is_err());
        assert_eq!(colony.pheromone.total(), before);
    }

    #[test]
    fn test_same_seed_same_outcome() {
        let mut a = Colony::new_with_seed(corridor_config(), corridor_density(), 99).unwrap();
        let mut b = Colony::new_with_seed(corridor_config(), corridor_density(), 99).unwrap();

        a.run().unwrap();
        b.run().unwrap();

        assert_eq!(a.population(), b.population());
        for (x, y) in a.ants.iter().zip(&b.ants) {
            assert_eq!(x.path, y.path);
            assert_eq!(x.score, y.score);
            assert_eq!(x.alive, y.alive);
        }
    }
}
