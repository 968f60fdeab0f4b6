//! Physical resolution of the voxel model.
//!
//! Converts plate drift rates into voxel units for run summaries, and holds
//! the time constants of the depth rules.

/// Simulated years for a deep sea basin to sink by one voxel.
pub const YEARS_PER_BASIN_SHIFT: u32 = 2000;

/// Rift and margin depth is tracked per thousand simulated years.
pub const YEARS_PER_DEPTH_STEP: u64 = 1000;

/// Reference resolution: one voxel is 50 m tall.
const REFERENCE_METERS_PER_VOXEL: u32 = 50;

/// Voxel resolution configuration
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VoxelScale {
    /// Vertical distance one voxel represents (in meters)
    pub meters_per_voxel: u32,
}

impl VoxelScale {
    pub fn new(meters_per_voxel: u32) -> Self {
        assert!(meters_per_voxel > 0, "voxel resolution must be positive");
        Self { meters_per_voxel }
    }

    /// Depth in voxels gained per thousand years by a boundary drifting at
    /// `speed_cm_per_year`. Never less than one voxel so that every rift
    /// keeps growing.
    pub fn depth_per_thousand_years(&self, speed_cm_per_year: i32) -> u32 {
        // cm/year over 1000 years is speed * 10 meters.
        let meters = speed_cm_per_year.unsigned_abs() * 10;
        (meters / self.meters_per_voxel).max(1)
    }
}

impl Default for VoxelScale {
    fn default() -> Self {
        Self::new(REFERENCE_METERS_PER_VOXEL)
    }
}

/// Rift or margin depth reached after `gen_years`: one voxel per thousand
/// years, whatever the drift rate.
#[inline]
pub fn expected_depth(gen_years: u64) -> u64 {
    gen_years / YEARS_PER_DEPTH_STEP
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_depth_rate() {
        let scale = VoxelScale::default();
        assert_eq!(scale.depth_per_thousand_years(2), 1);
        assert_eq!(scale.depth_per_thousand_years(9), 1);
        assert_eq!(scale.depth_per_thousand_years(10), 2);
        assert_eq!(scale.depth_per_thousand_years(15), 3);
        assert_eq!(VoxelScale::new(10).depth_per_thousand_years(15), 15);
    }

    #[test]
    fn test_expected_depth_per_thousand_years() {
        assert_eq!(expected_depth(0), 0);
        assert_eq!(expected_depth(999), 0);
        assert_eq!(expected_depth(1000), 1);
        assert_eq!(expected_depth(5500), 5);
    }
}
