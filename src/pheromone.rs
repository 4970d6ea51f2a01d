//! Pheromone field: the mutable volumetric state that biases move selection.
//!
//! Two invariants hold after every update: border cells (and masked voxels)
//! are exactly zero, and every other cell is at least `min_value`. The zero
//! border is what keeps ants inside the grid, since a zero-weight neighbor
//! can never win a draw; the floor keeps move distributions away from true
//! zeros everywhere else.

use crate::ant::Ant;
use crate::coord::{Coord, NEIGHBOR_OFFSETS};
use crate::error::SimError;
use ndarray::{Array3, Axis};
use serde::{Deserialize, Serialize};

/// Deposit amounts and the goal-bonus policy applied each tick
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct DepositPolicy {
    /// Pheromone added at every ant's current cell
    pub base_deposit: f64,
    /// Extra pheromone for ants satisfying the goal condition; 0 disables
    pub goal_bonus: f64,
    /// Spread the goal bonus to the 6 neighboring cells as well
    pub spread_to_neighbors: bool,
    /// Goal condition also requires an exhausted move budget (ttl == 0)
    pub bonus_requires_exhausted_ttl: bool,
}

/// The 6 neighbor coordinates of a cell and their move probabilities
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NeighborDistribution {
    pub coords: [Coord; 6],
    pub probs: [f64; 6],
}

/// Mutable 3-D pheromone grid with decay, floor, and pinned-zero cells
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PheromoneField {
    #[serde(with = "crate::density::flat")]
    grid: Array3<f64>,
    min_value: f64,
    decay: f64,
    mask: Vec<Coord>,
}

impl PheromoneField {
    /// Create a field with all interior cells at `min_value` and a zero border
    pub fn new(shape: [usize; 3], min_value: f64, decay: f64) -> Self {
        Self::with_mask(shape, min_value, decay, Vec::new())
    }

    /// Like [`PheromoneField::new`], with extra voxels permanently pinned to
    /// zero alongside the border (already-traced structures the ants must
    /// route around)
    pub fn with_mask(shape: [usize; 3], min_value: f64, decay: f64, mask: Vec<Coord>) -> Self {
        let grid = Array3::from_elem((shape[0], shape[1], shape[2]), min_value);
        let mut field = Self {
            grid,
            min_value,
            decay,
            mask,
        };
        field.reborder();
        field
    }

    /// Zero the six grid faces and every masked voxel
    fn reborder(&mut self) {
        for axis in 0..3 {
            let last = self.grid.len_of(Axis(axis)) - 1;
            self.grid.index_axis_mut(Axis(axis), 0).fill(0.0);
            self.grid.index_axis_mut(Axis(axis), last).fill(0.0);
        }
        for &voxel in &self.mask {
            if let Some(cell) = self.grid.get_mut(voxel.index()) {
                *cell = 0.0;
            }
        }
    }

    /// Grid extent along each axis
    pub fn shape(&self) -> [usize; 3] {
        let s = self.grid.shape();
        [s[0], s[1], s[2]]
    }

    /// Pheromone floor for non-border cells
    pub fn min_value(&self) -> f64 {
        self.min_value
    }

    /// Per-tick multiplicative decay factor
    pub fn decay(&self) -> f64 {
        self.decay
    }

    /// Pheromone at a coordinate; out-of-range reads are 0.0
    #[inline]
    pub fn get(&self, at: Coord) -> f64 {
        self.grid.get(at.index()).copied().unwrap_or(0.0)
    }

    /// Summed pheromone over the whole grid
    pub fn total(&self) -> f64 {
        self.grid.sum()
    }

    /// Move distribution over the 6 axis-aligned neighbors of `at`.
    ///
    /// A neighbor index leaving the grid entirely means `at` is on the
    /// border, which live ants never reach; it is reported rather than
    /// wrapped. A zero weight sum cannot be normalized and is reported as
    /// [`SimError::DegenerateDistribution`].
    pub fn neighbor_distribution(&self, at: Coord) -> Result<NeighborDistribution, SimError> {
        let shape = self.shape();
        let mut coords = [at; 6];
        let mut weights = [0.0f64; 6];

        for (i, d) in NEIGHBOR_OFFSETS.iter().enumerate() {
            let neighbor = at
                .offset(*d)
                .filter(|n| n.in_bounds(shape))
                .ok_or(SimError::OutOfGridMove { at })?;
            coords[i] = neighbor;
            weights[i] = self.get(neighbor);
        }

        let sum: f64 = weights.iter().sum();
        if sum <= 0.0 {
            return Err(SimError::DegenerateDistribution { at });
        }

        let mut probs = weights;
        for p in &mut probs {
            *p /= sum;
        }
        Ok(NeighborDistribution { coords, probs })
    }

    /// Deposit pheromone from the ants' current positions, then decay, clamp,
    /// and re-zero the border and mask.
    ///
    /// Every ant deposits, alive or not: a dead ant's frozen position keeps
    /// marking the trail until the simulation ends. Deposits land before
    /// decay within the same tick.
    pub fn reinforce(&mut self, ants: &[Ant], policy: &DepositPolicy) {
        let shape = self.shape();
        for ant in ants {
            self.add(ant.current, policy.base_deposit);
            if policy.goal_bonus > 0.0 && ant.reached_goal(policy.bonus_requires_exhausted_ttl) {
                self.add(ant.current, policy.goal_bonus);
                if policy.spread_to_neighbors {
                    for d in NEIGHBOR_OFFSETS {
                        if let Some(n) = ant.current.offset(d).filter(|n| n.in_bounds(shape)) {
                            self.add(n, policy.goal_bonus);
                        }
                    }
                }
            }
        }

        let (decay, min_value) = (self.decay, self.min_value);
        self.grid.mapv_inplace(|v| (v * decay).max(min_value));
        self.reborder();
    }

    /// Reinforce every cell along a path by `trace`, independent of live
    /// agents. The whole path is bounds-checked before any cell changes.
    pub fn add_path(&mut self, path: &[Coord], trace: f64) -> Result<(), SimError> {
        let shape = self.shape();
        for &at in path {
            if !at.in_bounds(shape) {
                return Err(SimError::OutOfGridMove { at });
            }
        }
        for &at in path {
            self.add(at, trace);
        }
        self.reborder();
        Ok(())
    }

    #[inline]
    fn add(&mut self, at: Coord, amount: f64) {
        if let Some(cell) = self.grid.get_mut(at.index()) {
            *cell += amount;
        }
    }
}
