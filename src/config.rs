//! Run parameters.
//!
//! Parameters come from the command line, optionally layered over a JSON
//! file. Every field besides the map size has a default.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::plates::PlateId;

pub const DEFAULT_DELTA_YEARS: u32 = 100;
pub const DEFAULT_BASE_HEIGHT: u32 = 100;
pub const DEFAULT_METERS_PER_VOXEL: u32 = 50;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GenParams {
    /// Map width in voxels
    pub width: usize,
    /// Map depth in voxels
    pub height: usize,
    /// Simulated years
    pub years: u64,
    /// Years advanced per simulation step
    pub delta_years: u32,
    /// Number of plates (random 5-15 if not set)
    pub plates: Option<usize>,
    /// Number of deep sea basins (random 0-3 if not set)
    pub basins: Option<usize>,
    /// Number of mid-ocean ridges (1 if not set)
    pub ridges: Option<usize>,
    /// Number of continental margins (random 0-2 if not set)
    pub margins: Option<usize>,
    /// Starting column height
    pub base_height: u32,
    /// Maximum height jitter added by Perlin noise (0 disables)
    pub jitter: u32,
    /// Vertical resolution of one voxel
    pub meters_per_voxel: u32,
    /// Master seed (random if not set)
    pub seed: Option<u64>,
    /// Activate every element on its first step
    pub immediate: bool,
}

impl Default for GenParams {
    fn default() -> Self {
        Self {
            width: 0,
            height: 0,
            years: 0,
            delta_years: DEFAULT_DELTA_YEARS,
            plates: None,
            basins: None,
            ridges: None,
            margins: None,
            base_height: DEFAULT_BASE_HEIGHT,
            jitter: 0,
            meters_per_voxel: DEFAULT_METERS_PER_VOXEL,
            seed: None,
            immediate: false,
        }
    }
}

impl GenParams {
    pub fn new(width: usize, height: usize, years: u64) -> Self {
        Self {
            width,
            height,
            years,
            ..Default::default()
        }
    }

    /// Read parameters from a JSON file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Check the parameters before any work starts.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 {
            return Err(ConfigError::Missing("sizex"));
        }
        if self.height == 0 {
            return Err(ConfigError::Missing("sizey"));
        }
        if self.delta_years == 0 {
            return Err(invalid("delta_years", "must be positive"));
        }
        if self.meters_per_voxel == 0 {
            return Err(invalid("meters_per_voxel", "must be positive"));
        }
        if let Some(plates) = self.plates {
            if plates == 0 || plates > PlateId::MAX_PLATES {
                return Err(invalid(
                    "plates",
                    format!("must be between 1 and {}", PlateId::MAX_PLATES),
                ));
            }
        }
        Ok(())
    }
}

fn invalid(name: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid { name, reason: reason.into() }
}
