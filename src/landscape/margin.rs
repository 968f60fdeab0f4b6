//! Continental margins.
//!
//! A margin anchors on the plate boundary nearest to a random start point and
//! cuts a one-sided slope into the start plate, the same depth rule as a ridge
//! rift but only on the landward side.

use std::collections::{HashSet, VecDeque};

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::plates::types::{MAX_PLATE_SPEED, MIN_PLATE_SPEED};
use crate::scale::{expected_depth, VoxelScale};
use crate::voxel::Grid;

use super::lifecycle::{Activation, Lifecycle, Phase};

/// Longest random activation delay of a margin, years.
pub const MARGIN_MAX_DELAY: u64 = 5000;

/// Where a margin meets the neighbouring plate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct MarginAnchor {
    /// Voxel on the start plate touching another plate.
    pub x: usize,
    pub y: usize,
    /// Unit step from the anchor toward the other plate.
    pub dx: i64,
    pub dy: i64,
}

/// Breadth-first search over the plate under `start` for the first voxel
/// with a neighbour on another plate.
///
/// Returns `None` when the start plate borders no other plate.
pub fn find_boundary(grid: &Grid, start: (usize, usize)) -> Option<MarginAnchor> {
    let plate = grid.plate_at(start.0, start.1);
    let mut queue = VecDeque::from([start]);
    let mut seen = HashSet::from([start]);

    while let Some((x, y)) = queue.pop_front() {
        let neighbors = grid.neighbors_8(x, y);
        if let Some(&(nx, ny)) = neighbors.iter().find(|&&(nx, ny)| grid.plate_at(nx, ny) != plate) {
            let dx = nx as i64 - x as i64;
            let dy = ny as i64 - y as i64;
            return Some(MarginAnchor { x, y, dx, dy });
        }
        for next in neighbors {
            if seen.insert(next) {
                queue.push_back(next);
            }
        }
    }
    None
}

#[derive(Clone, Debug)]
pub struct ContinentalMargin {
    pub start: (usize, usize),
    pub anchor: Option<MarginAnchor>,
    pub lifecycle: Lifecycle,
    /// Nominal drift rate in voxels per thousand years, for summaries.
    pub depth_per_thousand_years: u32,
}

impl ContinentalMargin {
    pub fn new(
        grid: &Grid,
        start: (usize, usize),
        scale: &VoxelScale,
        activation: Activation,
        rng: &mut ChaCha8Rng,
    ) -> Self {
        let lifecycle = Lifecycle::new(activation.delay(MARGIN_MAX_DELAY, rng));
        let speed = rng.gen_range(MIN_PLATE_SPEED..=MAX_PLATE_SPEED);
        let depth_per_thousand_years = scale.depth_per_thousand_years(speed);

        let anchor = find_boundary(grid, start);
        match anchor {
            Some(a) => info!(
                start_x = start.0,
                start_y = start.1,
                x = a.x,
                y = a.y,
                dx = a.dx,
                dy = a.dy,
                "Add ContinentalMargin"
            ),
            None => warn!(x = start.0, y = start.1, "Start plate has no neighbour, margin stays flat"),
        }

        Self {
            start,
            anchor,
            lifecycle,
            depth_per_thousand_years,
        }
    }

    /// Margin starting from a uniformly random voxel.
    pub fn random(grid: &Grid, scale: &VoxelScale, activation: Activation, rng: &mut ChaCha8Rng) -> Self {
        let x = rng.gen_range(0..grid.width);
        let y = rng.gen_range(0..grid.height);
        Self::new(grid, (x, y), scale, activation, rng)
    }

    pub fn expected_depth(&self) -> u64 {
        expected_depth(self.lifecycle.gen_years)
    }

    pub fn step(&mut self, grid: &mut Grid, years_delta: u64) {
        if self.lifecycle.tick(years_delta) == Phase::Dormant {
            return;
        }
        let Some(anchor) = self.anchor else {
            return;
        };

        let depth = self.expected_depth();
        let delta = self.lifecycle.take_shift(depth);
        if delta == 0 {
            return;
        }

        for k in 0..depth as i64 {
            let (x, y) = (anchor.x as i64 - k * anchor.dx, anchor.y as i64 - k * anchor.dy);
            if grid.in_bounds(x, y) {
                grid.get_mut(x as usize, y as usize).lower(delta as u32);
            }
        }
        debug!(depth, delta, "Margin slope deepened");
    }
}
