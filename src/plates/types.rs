use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Slowest plate drift, cm/year.
pub const MIN_PLATE_SPEED: i32 = 2;
/// Fastest plate drift, cm/year.
pub const MAX_PLATE_SPEED: i32 = 15;

/// Unique identifier for a tectonic plate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct PlateId(pub u8);

impl PlateId {
    /// Marker for a cell that has not been partitioned yet.
    pub const NONE: PlateId = PlateId(255);

    /// Largest number of plates a map can hold; `NONE` takes the last slot.
    pub const MAX_PLATES: usize = 255;

    pub fn is_none(&self) -> bool {
        *self == Self::NONE
    }

    pub fn index(&self) -> usize {
        self.0 as usize
    }

    /// Palette colour used for cells of this plate. Stays within the
    /// 256-entry palette.
    pub fn palette_color(&self) -> u8 {
        ((self.0 as u16 + 1) % 256) as u8
    }
}

/// A seed point of the discrete Voronoi partition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedPoint {
    pub x: usize,
    pub y: usize,
}

impl SeedPoint {
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// L1 distance to a cell.
    pub fn manhattan(&self, x: usize, y: usize) -> usize {
        self.x.abs_diff(x) + self.y.abs_diff(y)
    }
}

/// A tectonic plate. Plates only describe motion; their geometry lives in the
/// grid as per-cell plate references.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plate {
    pub id: PlateId,
    /// Drift along x, cm/year.
    pub speed_x: i32,
    /// Drift along y, cm/year.
    pub speed_y: i32,
    /// The plate that stands for the map edge.
    pub is_edge: bool,
}

impl Plate {
    /// Generate a plate with a random drift in `[MIN_PLATE_SPEED, MAX_PLATE_SPEED]`
    /// on both axes.
    pub fn random(id: PlateId, rng: &mut ChaCha8Rng) -> Self {
        Self {
            id,
            speed_x: rng.gen_range(MIN_PLATE_SPEED..=MAX_PLATE_SPEED),
            speed_y: rng.gen_range(MIN_PLATE_SPEED..=MAX_PLATE_SPEED),
            is_edge: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_palette_color_wraps() {
        assert_eq!(PlateId(0).palette_color(), 1);
        assert_eq!(PlateId(14).palette_color(), 15);
        assert_eq!(PlateId(254).palette_color(), 255);
    }

    #[test]
    fn test_random_speed_range() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for i in 0..100 {
            let plate = Plate::random(PlateId(i), &mut rng);
            assert!((MIN_PLATE_SPEED..=MAX_PLATE_SPEED).contains(&plate.speed_x));
            assert!((MIN_PLATE_SPEED..=MAX_PLATE_SPEED).contains(&plate.speed_y));
            assert!(!plate.is_edge);
        }
    }
}
