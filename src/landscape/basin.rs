//! Deep sea basins and the guyots scattered across their floor.
//!
//! A basin is a circular region that sinks one voxel every
//! [`YEARS_PER_BASIN_SHIFT`] years once active. Each guyot is a flat-topped
//! seamount inside the basin: it sinks along with the floor and loses one
//! voxel off its summit every time the basin shifts.

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

use crate::scale::YEARS_PER_BASIN_SHIFT;
use crate::voxel::Grid;

use super::lifecycle::{Activation, Lifecycle, Phase};

pub const BASIN_MIN_RADIUS: usize = 50;
pub const BASIN_MAX_RADIUS: usize = 100;
/// Longest random activation delay of a basin, years.
pub const BASIN_MAX_DELAY: u64 = 5000;

pub const GUYOT_MIN_RADIUS: usize = 20;
pub const GUYOT_MAX_RADIUS: usize = 30;
/// Longest random activation delay of a guyot, years.
pub const GUYOT_MAX_DELAY: u64 = 1000;
/// Summit height per voxel of guyot radius; also the cone slope.
pub const GUYOT_HEIGHT_MULTIPLIER: u32 = 2;

/// A disc on the grid, tested with squared Euclidean distance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Circle {
    pub x: usize,
    pub y: usize,
    pub radius: usize,
}

impl Circle {
    pub fn new(x: usize, y: usize, radius: usize) -> Self {
        Self { x, y, radius }
    }

    pub fn contains(&self, x: usize, y: usize) -> bool {
        let dx = x.abs_diff(self.x) as u64;
        let dy = y.abs_diff(self.y) as u64;
        let r = self.radius as u64;
        dx * dx + dy * dy <= r * r
    }

    /// In-bounds cells of the disc, scanning its bounding box.
    pub fn cells(&self, grid: &Grid) -> Vec<(usize, usize)> {
        let (xmin, xmax, ymin, ymax) = grid.clipped_box(self.x, self.y, self.radius);
        let mut cells = Vec::new();
        for x in xmin..xmax {
            for y in ymin..ymax {
                if self.contains(x, y) {
                    cells.push((x, y));
                }
            }
        }
        cells
    }

    /// True when the disc plus a one-cell margin lies inside a map.
    pub fn fits(&self, width: usize, height: usize) -> bool {
        self.x > self.radius
            && self.y > self.radius
            && self.x + self.radius + 1 < width
            && self.y + self.radius + 1 < height
    }
}

/// Largest basin radius whose disc, with a one-cell margin, fits the map.
pub fn max_fitting_radius(width: usize, height: usize) -> Option<usize> {
    let side = width.min(height);
    if side < 3 {
        return None;
    }
    Some((side - 3) / 2)
}

/// Flat-topped seamount owned by a basin.
#[derive(Clone, Debug)]
pub struct Guyot {
    pub circle: Circle,
    pub lifecycle: Lifecycle,
    /// Floor level the cone stands on, follows the basin down.
    pub zero_level: i64,
    /// Summit height above `zero_level`.
    pub height: u32,
}

impl Guyot {
    /// Raise a Chebyshev cone capped at `GUYOT_HEIGHT_MULTIPLIER * radius`
    /// above the floor found at the corner of its bounding box.
    pub fn new(grid: &mut Grid, circle: Circle, activation: Activation, rng: &mut ChaCha8Rng) -> Self {
        let lifecycle = Lifecycle::new(activation.delay(GUYOT_MAX_DELAY, rng));
        let (xmin, _, ymin, _) = grid.clipped_box(circle.x, circle.y, circle.radius);
        let zero_level = grid.get(xmin, ymin).height as i64;
        let height = GUYOT_HEIGHT_MULTIPLIER * circle.radius as u32;

        for (x, y) in circle.cells(grid) {
            let ring = x.abs_diff(circle.x).max(y.abs_diff(circle.y)) as i64;
            let voxel = grid.get_mut(x, y);
            voxel.invert_color();
            let level = zero_level + height as i64 - ring * GUYOT_HEIGHT_MULTIPLIER as i64;
            voxel.height = level.max(0) as u32;
        }

        Self {
            circle,
            lifecycle,
            zero_level,
            height,
        }
    }

    /// Current summit level.
    pub fn cap(&self) -> i64 {
        self.zero_level + self.height as i64
    }

    /// Follow the basin down by `shift` voxels, then shave the summit once the
    /// guyot is active.
    pub fn step(&mut self, grid: &mut Grid, shift: u64) {
        self.zero_level -= shift as i64;

        let years = shift * YEARS_PER_BASIN_SHIFT as u64;
        if self.lifecycle.tick(years) == Phase::Dormant || self.height == 0 {
            return;
        }

        let cap = self.cap();
        for (x, y) in self.circle.cells(grid) {
            let voxel = grid.get_mut(x, y);
            if voxel.height as i64 == cap && voxel.height > 0 {
                voxel.height -= 1;
            }
        }
        self.height -= 1;
        self.lifecycle.shift_already += 1;
        debug!(x = self.circle.x, y = self.circle.y, height = self.height, "Guyot eroded");
    }
}

/// Circular abyssal basin.
#[derive(Clone, Debug)]
pub struct DeepSeaBasin {
    pub circle: Circle,
    pub lifecycle: Lifecycle,
    pub guyots: Vec<Guyot>,
}

impl DeepSeaBasin {
    /// Mark the basin on the grid and raise its guyots.
    ///
    /// Panics if the disc does not fit the grid with a one-cell margin.
    pub fn new(grid: &mut Grid, circle: Circle, activation: Activation, rng: &mut ChaCha8Rng) -> Self {
        assert!(
            circle.fits(grid.width, grid.height),
            "basin {:?} does not fit a {}x{} map",
            circle,
            grid.width,
            grid.height
        );
        let lifecycle = Lifecycle::new(activation.delay(BASIN_MAX_DELAY, rng));

        for (x, y) in circle.cells(grid) {
            grid.get_mut(x, y).invert_color();
        }

        let mut basin = Self {
            circle,
            lifecycle,
            guyots: Vec::new(),
        };
        basin.generate_guyots(grid, activation, rng);
        basin
    }

    /// Pick a random radius and centre that fit the grid.
    pub fn random(grid: &mut Grid, max_radius: usize, activation: Activation, rng: &mut ChaCha8Rng) -> Self {
        let radius = rng.gen_range(BASIN_MIN_RADIUS..=max_radius.min(BASIN_MAX_RADIUS));
        let x = rng.gen_range(radius + 1..grid.width - radius - 1);
        let y = rng.gen_range(radius + 1..grid.height - radius - 1);
        info!(x, y, radius, "Add DeepSeaBasin");
        Self::new(grid, Circle::new(x, y, radius), activation, rng)
    }

    fn generate_guyots(&mut self, grid: &mut Grid, activation: Activation, rng: &mut ChaCha8Rng) {
        let count = self.circle.radius / GUYOT_MIN_RADIUS;
        for _ in 0..count {
            let radius = rng.gen_range(GUYOT_MIN_RADIUS..=GUYOT_MAX_RADIUS.min(self.circle.radius));
            let span = self.circle.radius - radius;
            let x = rng.gen_range(self.circle.x..=self.circle.x + span);
            let y = rng.gen_range(self.circle.y..=self.circle.y + span);
            info!(x, y, radius, basin_x = self.circle.x, basin_y = self.circle.y, "Add guyot");
            self.guyots.push(Guyot::new(grid, Circle::new(x, y, radius), activation, rng));
        }
    }

    /// Voxels the basin should have sunk by now.
    pub fn target_shift(&self) -> u64 {
        self.lifecycle.gen_years / YEARS_PER_BASIN_SHIFT as u64
    }

    pub fn step(&mut self, grid: &mut Grid, years_delta: u64) {
        if self.lifecycle.tick(years_delta) == Phase::Dormant {
            return;
        }

        let shift = self.lifecycle.take_shift(self.target_shift());
        if shift == 0 {
            return;
        }
        let amount = shift as u32;

        for (x, y) in self.circle.cells(grid) {
            let voxel = grid.get_mut(x, y);
            if voxel.height >= amount {
                voxel.height -= amount;
            }
        }
        debug!(
            x = self.circle.x,
            y = self.circle.y,
            shift,
            total = self.lifecycle.shift_already,
            "Basin sank"
        );

        for guyot in &mut self.guyots {
            guyot.step(grid, shift);
        }
    }
}
