//! Mid-ocean ridge: a rift that opens along the longest plate boundary
//! running between two points of the map border.

pub mod boundary;

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, warn};

use crate::plates::types::{MAX_PLATE_SPEED, MIN_PLATE_SPEED};
use crate::scale::{expected_depth, VoxelScale};
use crate::voxel::Grid;

use super::lifecycle::{Activation, Lifecycle, Phase};

pub use boundary::{BoundaryEdge, BoundaryGraph, EdgeAxis, EdgeKey};

/// Palette index painted on the ridge axis.
pub const RIDGE_COLOR: u8 = 200;
/// Longest random activation delay of a ridge, years.
pub const RIDGE_MAX_DELAY: u64 = 5000;

#[derive(Clone, Debug)]
pub struct MidOceanRidge {
    pub graph: BoundaryGraph,
    /// Boundary edges of the ridge axis, from one map border to the other.
    pub path: Vec<BoundaryEdge>,
    pub lifecycle: Lifecycle,
    /// Nominal spreading rate in voxels per thousand years, drawn from a
    /// plate speed. Reported in summaries; the rift itself deepens one voxel
    /// per thousand years.
    pub depth_per_thousand_years: u32,
}

impl MidOceanRidge {
    /// Lay the ridge along the longest border-to-border plate boundary and
    /// paint its axis.
    pub fn new(grid: &mut Grid, scale: &VoxelScale, activation: Activation, rng: &mut ChaCha8Rng) -> Self {
        let lifecycle = Lifecycle::new(activation.delay(RIDGE_MAX_DELAY, rng));
        let speed = rng.gen_range(MIN_PLATE_SPEED..=MAX_PLATE_SPEED);
        let depth_per_thousand_years = scale.depth_per_thousand_years(speed);

        let graph = BoundaryGraph::build(grid);
        let path: Vec<BoundaryEdge> = graph
            .longest_path()
            .iter()
            .filter_map(|key| graph.edge(key).copied())
            .collect();

        if path.is_empty() {
            warn!("No plate boundary reaches the map border, ridge stays flat");
        } else {
            info!(
                edges = graph.len(),
                candidates = graph.candidates.len(),
                length = path.len(),
                speed,
                depth_per_thousand_years,
                "Add MidOceanRidge"
            );
        }

        for edge in &path {
            grid.get_mut(edge.first.0, edge.first.1).color = RIDGE_COLOR;
            grid.get_mut(edge.second.0, edge.second.1).color = RIDGE_COLOR;
        }

        Self {
            graph,
            path,
            lifecycle,
            depth_per_thousand_years,
        }
    }

    /// Rift depth the ridge should have reached by now.
    pub fn expected_depth(&self) -> u64 {
        expected_depth(self.lifecycle.gen_years)
    }

    pub fn step(&mut self, grid: &mut Grid, years_delta: u64) {
        if self.lifecycle.tick(years_delta) == Phase::Dormant {
            return;
        }

        let depth = self.expected_depth();
        let delta = self.lifecycle.take_shift(depth);
        if delta == 0 {
            return;
        }

        for edge in &self.path {
            widen(grid, edge, depth, delta as u32);
        }
        debug!(depth, delta, "Rift widened");
    }
}

/// Lower the cells at offsets `0..depth` outward from both sides of `edge`
/// along its spreading axis.
fn widen(grid: &mut Grid, edge: &BoundaryEdge, depth: u64, amount: u32) {
    let (fx, fy) = (edge.first.0 as i64, edge.first.1 as i64);
    let (sx, sy) = (edge.second.0 as i64, edge.second.1 as i64);

    for k in 0..depth as i64 {
        let (near, far) = match edge.axis {
            EdgeAxis::Horizontal => ((fx, fy - k), (sx, sy + k)),
            EdgeAxis::Vertical => ((fx - k, fy), (sx + k, sy)),
        };
        for (x, y) in [near, far] {
            if grid.in_bounds(x, y) {
                grid.get_mut(x as usize, y as usize).lower(amount);
            }
        }
    }
}
