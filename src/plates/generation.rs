use rand::Rng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

use crate::tilemap::Tilemap;

use super::types::{Plate, PlateId, SeedPoint};

/// Plate count range used when the caller does not pick one.
pub const MIN_PLATES: usize = 5;
pub const MAX_PLATES: usize = 15;

/// Split a `width x height` map into tectonic plates.
///
/// Picks the plate count uniformly in `[MIN_PLATES, MAX_PLATES]` unless one is
/// given, scatters one seed per plate and builds the discrete L1 Voronoi
/// diagram of those seeds. Returns the plate map and the plate count.
pub fn split_plates(
    width: usize,
    height: usize,
    plate_count: Option<usize>,
    rng: &mut ChaCha8Rng,
) -> (Tilemap<PlateId>, usize) {
    let count = plate_count.unwrap_or_else(|| rng.gen_range(MIN_PLATES..=MAX_PLATES));
    info!(plates = count, "Split map into plates");

    let seeds = random_seeds(width, height, count, rng);
    (partition_with_seeds(width, height, &seeds), count)
}

/// Scatter `count` seed points uniformly over the map. Seeds may coincide;
/// a duplicate only changes how large the plates end up.
pub fn random_seeds(width: usize, height: usize, count: usize, rng: &mut ChaCha8Rng) -> Vec<SeedPoint> {
    assert!(width > 0 && height > 0, "cannot seed an empty {}x{} map", width, height);

    (0..count)
        .map(|_| SeedPoint::new(rng.gen_range(0..width), rng.gen_range(0..height)))
        .collect()
}

/// Discrete Voronoi diagram under Manhattan distance.
///
/// Every cell takes the index of its nearest seed; on equal distance the seed
/// that comes first in `seeds` wins. The result depends on nothing but the
/// seed list.
pub fn partition_with_seeds(width: usize, height: usize, seeds: &[SeedPoint]) -> Tilemap<PlateId> {
    assert!(!seeds.is_empty(), "partition needs at least one seed");
    assert!(
        seeds.len() <= PlateId::MAX_PLATES,
        "{} plates exceed the limit of {}",
        seeds.len(),
        PlateId::MAX_PLATES
    );
    for seed in seeds {
        assert!(
            seed.x < width && seed.y < height,
            "seed ({}, {}) outside {}x{} map",
            seed.x,
            seed.y,
            width,
            height
        );
    }

    let mut plate_map = Tilemap::new_with(width, height, PlateId::NONE);

    for (x, y, cell) in plate_map.iter_mut() {
        let mut best = 0usize;
        let mut best_dist = usize::MAX;
        for (i, seed) in seeds.iter().enumerate() {
            let dist = seed.manhattan(x, y);
            if dist < best_dist {
                best_dist = dist;
                best = i;
            }
        }
        *cell = PlateId(best as u8);
    }

    debug!(seeds = ?seeds, "Voronoi partition complete");
    plate_map
}

/// Create `count` plates with random drift. Plate 0 is always the edge plate.
pub fn assign_properties(count: usize, rng: &mut ChaCha8Rng) -> Vec<Plate> {
    assert!(count > 0, "a map needs at least one plate");

    let mut plates: Vec<Plate> = (0..count)
        .map(|i| Plate::random(PlateId(i as u8), rng))
        .collect();
    plates[0].is_edge = true;

    for plate in &plates {
        debug!(id = plate.id.0, speed_x = plate.speed_x, speed_y = plate.speed_y, "Plate properties");
    }
    plates
}
