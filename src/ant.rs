//! Ant agent: a finite-state random walker over the voxel grid.

use crate::coord::Coord;
use crate::density::DensityField;
use crate::error::SimError;
use crate::pheromone::PheromoneField;
use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Unique ant identifier; creation order doubles as tie-break order
pub type AntId = u64;

/// A single ant: current position, path so far, score, and move budget.
///
/// States are derived from the fields: frozen while `freeze > 0`, active
/// while `freeze == 0`, dead once `alive` is false. Death is terminal; a
/// dead ant keeps its final position and keeps contributing it to
/// pheromone reinforcement.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Ant {
    pub id: AntId,
    pub current: Coord,
    pub goal: Coord,
    pub path: Vec<Coord>,
    pub score: f64,
    pub freeze: u32,
    pub ttl: u32,
    pub alive: bool,
}

impl Ant {
    /// Create an ant at `start` with a full move budget
    pub fn new(id: AntId, start: Coord, goal: Coord, path_length: u32) -> Self {
        Self {
            id,
            current: start,
            goal,
            path: vec![start],
            score: 0.0,
            freeze: 0,
            ttl: path_length,
            alive: true,
        }
    }

    /// Liveness flag; false is terminal
    #[inline]
    pub fn is_alive(&self) -> bool {
        self.alive
    }

    /// Waiting out a freeze period
    #[inline]
    pub fn is_frozen(&self) -> bool {
        self.freeze > 0
    }

    /// A finished, on-goal path: the move budget is spent and the ant
    /// stands on its goal
    pub fn is_valid(&self) -> bool {
        self.ttl == 0 && self.current == self.goal
    }

    /// Number of moves taken so far
    pub fn path_len(&self) -> usize {
        self.path.len() - 1
    }

    /// Whether the ant qualifies for the goal deposit bonus
    pub fn reached_goal(&self, require_exhausted_ttl: bool) -> bool {
        self.current == self.goal && (!require_exhausted_ttl || self.ttl == 0)
    }

    /// Advance the ant by one tick.
    ///
    /// Frozen ants count down; active ants draw up to `tries` neighbors
    /// from the pheromone distribution and take the first one that does
    /// not revisit their path. The freeze time for the next period comes
    /// from the density at the resulting position. The ant dies when the
    /// retry budget runs out or the move budget reaches zero.
    pub fn step<R: Rng>(
        &mut self,
        density: &DensityField,
        pheromone: &PheromoneField,
        tries: u32,
        rng: &mut R,
    ) -> Result<(), SimError> {
        if !self.alive {
            return Ok(());
        }
        if self.freeze > 0 {
            self.freeze -= 1;
            return Ok(());
        }

        let dist = pheromone.neighbor_distribution(self.current)?;
        let sampler = WeightedIndex::new(&dist.probs)
            .map_err(|_| SimError::DegenerateDistribution { at: self.current })?;
        let shape = pheromone.shape();

        let mut moved = false;
        let mut remaining = tries;
        while remaining > 0 {
            let candidate = dist.coords[sampler.sample(rng)];
            if !candidate.in_bounds(shape) {
                return Err(SimError::OutOfGridMove { at: candidate });
            }
            if !self.path.contains(&candidate) {
                self.current = candidate;
                self.path.push(candidate);
                self.score += density.get(candidate);
                self.ttl -= 1;
                moved = true;
                break;
            }
            remaining -= 1;
        }

        let freeze_ticks = density.freeze_duration(self.current)?;

        if remaining == 0 || (moved && self.ttl == 0) {
            self.alive = false;
            return Ok(());
        }

        self.freeze = freeze_ticks;
        Ok(())
    }
}

impl std::fmt::Display for Ant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Ant {}", self.id)?;
        writeln!(f, "  alive: {}", self.alive)?;
        writeln!(f, "  score: {}", self.score)?;
        write!(f, "  path: ")?;
        for (i, c) in self.path.iter().enumerate() {
            if i > 0 {
                write!(f, " --> ")?;
            }
            write!(f, "{}", c)?;
        }
        Ok(())
    }
}
