use noise::{NoiseFn, Perlin, Seedable};
use tracing::info;

use crate::voxel::Grid;

/// Noise sampling parameters for the height jitter
pub struct JitterParams {
    /// Largest offset, in voxels, added or removed from a column
    pub amplitude: u32,
    /// Base frequency (lower = broader swells)
    pub frequency: f64,
    /// Number of noise octaves
    pub octaves: u32,
    /// Amplitude decay per octave (0.0-1.0)
    pub persistence: f64,
    /// Frequency multiplier per octave
    pub lacunarity: f64,
}

impl JitterParams {
    pub fn with_amplitude(amplitude: u32) -> Self {
        Self {
            amplitude,
            ..Default::default()
        }
    }
}

impl Default for JitterParams {
    fn default() -> Self {
        Self {
            amplitude: 0,
            frequency: 1.0 / 32.0,
            octaves: 4,
            persistence: 0.5,
            lacunarity: 2.0,
        }
    }
}

/// Raise every column to `base` and colour it by plate.
pub fn set_base_height(grid: &mut Grid, base: u32) {
    info!(base, "Set heights");
    for (_, _, voxel) in grid.iter_mut() {
        voxel.height = base;
        voxel.color = voxel.plate.palette_color();
    }
}

/// Fractional Brownian Motion over a Perlin source, normalised to [-1, 1].
fn fbm(noise: &Perlin, x: f64, y: f64, params: &JitterParams) -> f64 {
    let mut total = 0.0;
    let mut amplitude = 1.0;
    let mut frequency = 1.0;
    let mut max_value = 0.0;

    for _ in 0..params.octaves {
        total += amplitude * noise.get([x * frequency, y * frequency]);
        max_value += amplitude;
        amplitude *= params.persistence;
        frequency *= params.lacunarity;
    }

    if max_value > 0.0 {
        total / max_value
    } else {
        0.0
    }
}

/// Perturb column heights with smooth noise so flat plates are not perfectly
/// level. Heights never drop below zero.
pub fn apply_jitter(grid: &mut Grid, params: &JitterParams, seed: u64) {
    if params.amplitude == 0 {
        return;
    }
    info!(amplitude = params.amplitude, "Applying height jitter");

    let noise = Perlin::new(1).set_seed(seed as u32);
    for (x, y, voxel) in grid.iter_mut() {
        let n = fbm(&noise, x as f64 * params.frequency, y as f64 * params.frequency, params);
        let offset = (n.clamp(-1.0, 1.0) * params.amplitude as f64).round() as i64;
        voxel.height = (voxel.height as i64 + offset).max(0) as u32;
    }
}
