//! Square heightmap grid and its synthesis from fractal noise.

use crate::config::NoiseParameters;
use crate::error::{ensure_resolution, Result, TerrainError};
use crate::noise::fbm;
use crate::permutation::PermutationTable;

/// A `resolution x resolution` grid of heights in `[0, 1]`, stored row-major
/// at `y * resolution + x`.
#[derive(Debug, Clone, PartialEq)]
pub struct Heightmap {
    resolution: usize,
    values: Vec<f32>,
}

impl Heightmap {
    /// Wrap caller-provided samples, checking size and finiteness
    pub fn from_values(resolution: usize, values: Vec<f32>) -> Result<Self> {
        let expected = vertex_count(resolution)?;
        if values.len() != expected {
            return Err(TerrainError::HeightmapSize {
                resolution,
                expected,
                actual: values.len(),
            });
        }

        if let Some((index, &value)) = values.iter().enumerate().find(|(_, v)| !v.is_finite()) {
            return Err(TerrainError::NonFiniteHeight { index, value });
        }

        Ok(Heightmap { resolution, values })
    }

    /// A heightmap where every sample is `height`
    pub fn flat(resolution: usize, height: f32) -> Result<Self> {
        let count = vertex_count(resolution)?;
        Self::from_values(resolution, vec![height; count])
    }

    pub fn resolution(&self) -> usize {
        self.resolution
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// Get the height at grid cell `(x, y)`
    pub fn get(&self, x: usize, y: usize) -> Option<f32> {
        if x < self.resolution && y < self.resolution {
            Some(self.values[y * self.resolution + x])
        } else {
            None
        }
    }

    /// Height at `(x, y)` with both coordinates clamped onto the grid
    pub(crate) fn get_clamped(&self, x: isize, y: isize) -> f32 {
        let max = self.resolution as isize - 1;
        let x = x.clamp(0, max) as usize;
        let y = y.clamp(0, max) as usize;
        self.values[y * self.resolution + x]
    }

    /// Lowest and highest sample
    pub fn min_max(&self) -> (f32, f32) {
        self.values
            .iter()
            .fold((f32::MAX, f32::MIN), |(lo, hi), &v| (lo.min(v), hi.max(v)))
    }
}

/// Number of samples in a validated `resolution x resolution` grid
fn vertex_count(resolution: usize) -> Result<usize> {
    ensure_resolution(resolution)?;
    resolution
        .checked_mul(resolution)
        .ok_or_else(|| TerrainError::invalid("resolution", "grid size overflows"))
}

/// Synthesize a heightmap from fractal noise
///
/// One permutation table is built from `noise.seed`; each cell is sampled at
/// normalized coordinates `(x / (resolution - 1), y / (resolution - 1))`.
///
/// # Arguments
/// * `resolution` - Vertices per edge, at least 2
/// * `noise` - Fractal noise parameters
///
/// # Returns
/// * `Result<Heightmap>` - The grid, or a validation error
pub fn synthesize_heightmap(resolution: usize, noise: &NoiseParameters) -> Result<Heightmap> {
    let count = vertex_count(resolution)?;
    noise.validate()?;

    let table = PermutationTable::new(noise.seed);
    let denominator = (resolution - 1) as f64;

    let mut values = Vec::with_capacity(count);
    for y in 0..resolution {
        for x in 0..resolution {
            let nx = x as f64 / denominator;
            let ny = y as f64 / denominator;
            values.push(fbm(nx, ny, noise, &table) as f32);
        }
    }

    let heightmap = Heightmap { resolution, values };
    let (lo, hi) = heightmap.min_max();
    log::debug!(
        "synthesized {}x{} heightmap (seed {}, {} octaves), range [{:.3}, {:.3}]",
        resolution,
        resolution,
        noise.seed,
        noise.octaves,
        lo,
        hi
    );

    Ok(heightmap)
}
