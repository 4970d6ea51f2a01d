//! Density field: the immutable volumetric map the ants score against.
//!
//! Supplied by an external producer (e.g. a Gaussian blur of a molecular
//! structure at a chosen resolution); the simulation only reads it.

use crate::coord::Coord;
use crate::error::SimError;
use ndarray::Array3;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Upper bound on the freeze time derived from a density value
pub const MAX_FREEZE_TICKS: u32 = 100;

/// Flat `(shape, data)` serde representation for 3-D arrays
pub(crate) mod flat {
    use ndarray::Array3;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Serialize, Deserialize)]
    struct RawGrid {
        shape: [usize; 3],
        data: Vec<f64>,
    }

    pub fn serialize<S>(grid: &Array3<f64>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let shape = grid.shape();
        RawGrid {
            shape: [shape[0], shape[1], shape[2]],
            data: grid.iter().copied().collect(),
        }
        .serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Array3<f64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = RawGrid::deserialize(deserializer)?;
        Array3::from_shape_vec((raw.shape[0], raw.shape[1], raw.shape[2]), raw.data)
            .map_err(serde::de::Error::custom)
    }
}

/// Read-only 3-D grid of non-negative scalars
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DensityField {
    #[serde(with = "flat")]
    grid: Array3<f64>,
}

impl DensityField {
    /// Build a field from a raw array, rejecting negative or non-finite values
    pub fn from_array(grid: Array3<f64>) -> Result<Self, String> {
        for (idx, &v) in grid.indexed_iter() {
            if !v.is_finite() {
                return Err(format!("non-finite density {} at {:?}", v, idx));
            }
            if v < 0.0 {
                return Err(format!("negative density {} at {:?}", v, idx));
            }
        }
        Ok(Self { grid })
    }

    /// Uniform field with the given value everywhere
    pub fn uniform(shape: [usize; 3], value: f64) -> Result<Self, String> {
        Self::from_array(Array3::from_elem((shape[0], shape[1], shape[2]), value))
    }

    /// Axial ramp along z: cell (x, y, z) holds z / 10
    pub fn gradient(shape: [usize; 3]) -> Self {
        let grid =
            Array3::from_shape_fn((shape[0], shape[1], shape[2]), |(_, _, z)| z as f64 / 10.0);
        Self { grid }
    }

    /// Grid extent along each axis
    pub fn shape(&self) -> [usize; 3] {
        let s = self.grid.shape();
        [s[0], s[1], s[2]]
    }

    /// Density at a coordinate; out-of-range reads are 0.0
    #[inline]
    pub fn get(&self, at: Coord) -> f64 {
        self.grid.get(at.index()).copied().unwrap_or(0.0)
    }

    /// Freeze time at a coordinate: floor(min(1 / density, 100)) ticks
    ///
    /// Zero or negative density has no defined freeze time.
    pub fn freeze_duration(&self, at: Coord) -> Result<u32, SimError> {
        let value = self.get(at);
        if !value.is_finite() || value <= 0.0 {
            return Err(SimError::InvalidDensity { at, value });
        }
        Ok((1.0 / value).min(MAX_FREEZE_TICKS as f64).floor() as u32)
    }

    /// Save the field as JSON
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> std::io::Result<()> {
        let json = serde_json::to_string(self)?;
        std::fs::write(path, json)
    }

    /// Load a field from JSON, re-validating its values
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let json = std::fs::read_to_string(path).map_err(|e| e.to_string())?;
        let field: DensityField = serde_json::from_str(&json).map_err(|e| e.to_string())?;
        Self::from_array(field.grid)
    }
}
