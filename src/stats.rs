//! Statistics tracking for the simulation.

use crate::ant::Ant;
use serde::{Deserialize, Serialize};

/// Statistics snapshot for a simulation tick
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Stats {
    /// Current simulation tick
    pub time: u64,
    /// Completed rounds
    pub round: u32,
    /// Total population, dead ants included
    pub population: usize,
    /// Ants still moving
    pub alive: usize,
    /// Ants waiting out a freeze period
    pub frozen: usize,
    /// Ants holding a finished, on-goal path
    pub valid: usize,
    /// Best score among valid ants
    pub best_score: f64,
    /// Mean score across the whole population
    pub mean_score: f64,
    /// Mean remaining move budget among living ants
    pub mean_ttl: f64,
    /// Summed pheromone over the grid
    pub pheromone_total: f64,
    /// Deaths this tick
    pub deaths: usize,
}

impl Stats {
    /// Create new empty stats
    pub fn new() -> Self {
        Self::default()
    }

    /// Update stats from the current population
    pub fn update(&mut self, ants: &[Ant], pheromone_total: f64) {
        self.population = ants.len();
        self.alive = ants.iter().filter(|a| a.is_alive()).count();
        self.frozen = ants.iter().filter(|a| a.is_alive() && a.is_frozen()).count();
        self.valid = ants.iter().filter(|a| a.is_valid()).count();

        self.best_score = ants
            .iter()
            .filter(|a| a.is_valid())
            .map(|a| a.score)
            .fold(0.0, f64::max);

        self.mean_score = if ants.is_empty() {
            0.0
        } else {
            ants.iter().map(|a| a.score).sum::<f64>() / ants.len() as f64
        };

        self.mean_ttl = if self.alive == 0 {
            0.0
        } else {
            ants.iter()
                .filter(|a| a.is_alive())
                .map(|a| a.ttl as f64)
                .sum::<f64>()
                / self.alive as f64
        };

        self.pheromone_total = pheromone_total;
    }

    /// One-line progress summary
    pub fn summary(&self) -> String {
        format!(
            "t={:>6} pop={:>5} alive={:>5} frozen={:>5} valid={:>4} best={:>8.3} pher={:>10.1}",
            self.time,
            self.population,
            self.alive,
            self.frozen,
            self.valid,
            self.best_score,
            self.pheromone_total,
        )
    }

    /// Save stats to JSON file
    pub fn save_json(&self, path: &str) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
    }
}

/// Rolling history of stats snapshots
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StatsHistory {
    pub snapshots: Vec<Stats>,
    pub interval: u64,
}

impl StatsHistory {
    /// Create an empty history recording every `interval` ticks
    pub fn new(interval: u64) -> Self {
        Self {
            snapshots: Vec::new(),
            interval,
        }
    }

    /// Record a snapshot
    pub fn record(&mut self, stats: Stats) {
        self.snapshots.push(stats);
    }

    /// (tick, best score) series
    pub fn best_score_series(&self) -> Vec<(u64, f64)> {
        self.snapshots.iter().map(|s| (s.time, s.best_score)).collect()
    }

    /// (tick, valid ants) series
    pub fn valid_series(&self) -> Vec<(u64, usize)> {
        self.snapshots.iter().map(|s| (s.time, s.valid)).collect()
    }

    /// Save history to JSON file
    pub fn save(&self, path: &str) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
    }
}
