//! Voxel columns and the landscape grid.
//!
//! The grid owns every column. Landscape elements remember coordinates and
//! receive `&mut Grid` when they run, so the grid is the only place heights
//! and colours change.

use crate::plates::PlateId;
use crate::tilemap::Tilemap;

/// One column of stacked voxels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Voxel {
    /// Number of stacked voxels.
    pub height: u32,
    /// Palette index.
    pub color: u8,
    /// Owning plate, `PlateId::NONE` until the map is partitioned.
    pub plate: PlateId,
}

impl Default for Voxel {
    fn default() -> Self {
        Self {
            height: 0,
            color: 0,
            plate: PlateId::NONE,
        }
    }
}

impl Voxel {
    /// Lower the column by `amount`, stopping at the floor.
    pub fn lower(&mut self, amount: u32) {
        self.height = self.height.saturating_sub(amount);
    }

    /// Swap to the mirrored palette entry so a feature stands out.
    pub fn invert_color(&mut self) {
        self.color = 255 - self.color;
    }
}

pub type Grid = Tilemap<Voxel>;

impl Tilemap<Voxel> {
    /// Copy the plate of every cell from a partition map of the same size.
    pub fn apply_plate_map(&mut self, plate_map: &Tilemap<PlateId>) {
        assert_eq!(
            (self.width, self.height),
            (plate_map.width, plate_map.height),
            "plate map size differs from grid"
        );
        for (x, y, voxel) in self.iter_mut() {
            voxel.plate = *plate_map.get(x, y);
        }
    }

    pub fn plate_at(&self, x: usize, y: usize) -> PlateId {
        self.get(x, y).plate
    }

    /// Tallest column in the grid.
    pub fn max_height(&self) -> u32 {
        self.iter().map(|(_, _, v)| v.height).max().unwrap_or(0)
    }

    /// Number of voxels stacked over the whole grid.
    pub fn voxel_count(&self) -> u64 {
        self.iter().map(|(_, _, v)| v.height as u64).sum()
    }
}
