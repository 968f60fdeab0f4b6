//! Simulation driver.
//!
//! Runs the generation phases in order: empty map, plate partition, plate
//! properties, base heights, element siting, then the fixed-step time loop.
//! Each phase is public so tools can time them one by one.

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::GenParams;
use crate::error::GenerationError;
use crate::heightmap::{apply_jitter, set_base_height, JitterParams};
use crate::landscape::basin::{max_fitting_radius, BASIN_MIN_RADIUS};
use crate::landscape::{
    Activation, ContinentalMargin, DeepSeaBasin, ElementSummary, LandscapeElement, MidOceanRidge,
};
use crate::plates::{assign_properties, split_plates, Plate};
use crate::scale::VoxelScale;
use crate::seeds::GenerationSeeds;
use crate::tilemap::Tilemap;
use crate::voxel::Grid;

/// Random basin count range.
pub const MAX_RANDOM_BASINS: usize = 3;
/// Ridges sited when the count is not configured.
pub const DEFAULT_RIDGES: usize = 1;
/// Random margin count range.
pub const MAX_RANDOM_MARGINS: usize = 2;
/// Simulated years between progress log lines.
pub const PROGRESS_LOG_YEARS: u64 = 1000;

pub struct Generator {
    pub params: GenParams,
    pub seeds: GenerationSeeds,
    pub scale: VoxelScale,
    pub grid: Grid,
    pub plate_count: usize,
    pub plates: Vec<Plate>,
    /// Elements in creation order; this is also the order they are advanced in.
    pub elements: Vec<LandscapeElement>,
    pub current_year: u64,
    tectonics_rng: ChaCha8Rng,
    elements_rng: ChaCha8Rng,
}

impl Generator {
    /// Validate `params` and prepare a run. Nothing is generated yet.
    pub fn new(params: GenParams) -> Result<Self, GenerationError> {
        params.validate()?;
        let seeds = params.seed.map(GenerationSeeds::from_master).unwrap_or_else(GenerationSeeds::random);
        info!(seed = seeds.master, "Generating landscape");
        debug!("{}", seeds);

        Ok(Self {
            scale: VoxelScale::new(params.meters_per_voxel),
            grid: Tilemap::new(0, 0),
            plate_count: 0,
            plates: Vec::new(),
            elements: Vec::new(),
            current_year: 0,
            tectonics_rng: seeds.tectonics_rng(),
            elements_rng: seeds.elements_rng(),
            seeds,
            params,
        })
    }

    /// Run every phase in order.
    pub fn generate(&mut self) -> Result<(), GenerationError> {
        self.setup_map();
        self.split_map();
        self.set_properties();
        self.set_height();
        self.generate_elements()?;
        self.simulate();
        Ok(())
    }

    fn activation(&self) -> Activation {
        Activation::from_immediate(self.params.immediate)
    }

    /// Allocate the flat, unassigned grid.
    pub fn setup_map(&mut self) {
        info!(width = self.params.width, height = self.params.height, "Setup map");
        self.grid = Tilemap::new(self.params.width, self.params.height);
    }

    /// Partition the grid into plates.
    pub fn split_map(&mut self) {
        let (plate_map, count) = split_plates(
            self.grid.width,
            self.grid.height,
            self.params.plates,
            &mut self.tectonics_rng,
        );
        self.grid.apply_plate_map(&plate_map);
        self.plate_count = count;
    }

    /// Draw drift speeds for every plate.
    pub fn set_properties(&mut self) {
        self.plates = assign_properties(self.plate_count, &mut self.tectonics_rng);
    }

    /// Base heights and plate colours, then optional noise jitter.
    pub fn set_height(&mut self) {
        set_base_height(&mut self.grid, self.params.base_height);
        apply_jitter(&mut self.grid, &JitterParams::with_amplitude(self.params.jitter), self.seeds.jitter);
    }

    /// Site every landscape element: basins first, then ridges, then margins.
    pub fn generate_elements(&mut self) -> Result<(), GenerationError> {
        let activation = self.activation();
        let (width, height) = (self.grid.width, self.grid.height);
        let basin_radius = max_fitting_radius(width, height).filter(|r| *r >= BASIN_MIN_RADIUS);

        let basins = match (self.params.basins, basin_radius) {
            (Some(0), _) => 0,
            (Some(n), Some(_)) => n,
            (Some(_), None) => {
                return Err(GenerationError::BasinDoesNotFit {
                    radius: BASIN_MIN_RADIUS,
                    width,
                    height,
                })
            }
            (None, radius) => {
                let n = self.elements_rng.gen_range(0..=MAX_RANDOM_BASINS);
                if n > 0 && radius.is_none() {
                    warn!(width, height, "Map too small for deep sea basins, skipping {}", n);
                    0
                } else {
                    n
                }
            }
        };
        let ridges = self.params.ridges.unwrap_or(DEFAULT_RIDGES);
        let margins = self
            .params
            .margins
            .unwrap_or_else(|| self.elements_rng.gen_range(0..=MAX_RANDOM_MARGINS));
        info!(basins, ridges, margins, "Generate landscape elements");
        if ridges > 1 {
            // The longest boundary path is deterministic for a given map.
            warn!(ridges, "Every ridge follows the same boundary path, their rifts stack");
        }

        if let Some(max_radius) = basin_radius {
            for _ in 0..basins {
                let basin = DeepSeaBasin::random(&mut self.grid, max_radius, activation, &mut self.elements_rng);
                self.elements.push(LandscapeElement::Basin(basin));
            }
        }
        for _ in 0..ridges {
            let ridge = MidOceanRidge::new(&mut self.grid, &self.scale, activation, &mut self.elements_rng);
            self.elements.push(LandscapeElement::Ridge(ridge));
        }
        for _ in 0..margins {
            let margin = ContinentalMargin::random(&self.grid, &self.scale, activation, &mut self.elements_rng);
            self.elements.push(LandscapeElement::Margin(margin));
        }
        Ok(())
    }

    /// Advance every element in creation order, `delta_years` at a time,
    /// until the configured number of years has passed.
    pub fn simulate(&mut self) {
        let years = self.params.years;
        let delta = self.params.delta_years as u64;
        info!(years, delta, elements = self.elements.len(), "Simulating");

        while self.current_year < years {
            self.advance(delta);
            if progress_due(self.current_year, delta) {
                info!(year = self.current_year, max_height = self.grid.max_height(), "Progress");
            }
        }
    }

    /// One simulation step.
    pub fn advance(&mut self, years_delta: u64) {
        for element in &mut self.elements {
            element.advance(&mut self.grid, years_delta);
        }
        self.current_year += years_delta;
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            seeds: self.seeds,
            width: self.grid.width,
            height: self.grid.height,
            years: self.current_year,
            plates: self.plates.len(),
            elements: self.elements.iter().map(LandscapeElement::summary).collect(),
            max_height: self.grid.max_height(),
            voxel_count: self.grid.voxel_count(),
        }
    }
}

/// True for the step that crosses a multiple of [`PROGRESS_LOG_YEARS`].
fn progress_due(year: u64, delta: u64) -> bool {
    year % PROGRESS_LOG_YEARS < delta
}

/// What a run produced, written next to the model on request.
#[derive(Clone, Debug, Serialize)]
pub struct RunSummary {
    pub seeds: GenerationSeeds,
    pub width: usize,
    pub height: usize,
    /// Simulated years actually run.
    pub years: u64,
    pub plates: usize,
    pub elements: Vec<ElementSummary>,
    pub max_height: u32,
    pub voxel_count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;
    use crate::landscape::basin::Circle;
    use crate::landscape::ridge::RIDGE_COLOR;
    use crate::landscape::ElementKind;
    use crate::plates::PlateId;
    use crate::voxel::Voxel;
    use rand::SeedableRng;

    fn params(width: usize, height: usize, years: u64) -> GenParams {
        GenParams {
            seed: Some(1234),
            plates: Some(6),
            basins: Some(0),
            ridges: Some(1),
            margins: Some(1),
            immediate: true,
            ..GenParams::new(width, height, years)
        }
    }

    #[test]
    fn test_generate_end_to_end() {
        let mut generator = Generator::new(params(48, 32, 3000)).unwrap();
        generator.generate().unwrap();

        assert_eq!(generator.current_year, 3000);
        assert_eq!(generator.plates.len(), 6);
        assert!(generator.plates[0].is_edge);
        assert!(generator.grid.iter().all(|(_, _, v)| (v.plate.0 as usize) < 6));
        assert!(generator.grid.iter().all(|(_, _, v)| v.height <= 100));

        let kinds: Vec<ElementKind> = generator.elements.iter().map(|e| e.kind()).collect();
        assert_eq!(kinds, vec![ElementKind::MidOceanRidge, ElementKind::ContinentalMargin]);
        assert!(generator.elements.iter().all(|e| e.lifecycle().gen_years == 3000));
    }

    #[test]
    fn test_generation_is_deterministic() {
        let mut a = Generator::new(params(40, 40, 2000)).unwrap();
        let mut b = Generator::new(params(40, 40, 2000)).unwrap();
        a.generate().unwrap();
        b.generate().unwrap();
        assert!(a.grid.iter().zip(b.grid.iter()).all(|((_, _, p), (_, _, q))| p == q));
    }

    #[test]
    fn test_partial_last_step_still_runs() {
        let mut generator = Generator::new(GenParams { delta_years: 300, ..params(16, 16, 1000) }).unwrap();
        generator.generate().unwrap();
        assert_eq!(generator.current_year, 1200);
    }

    #[test]
    fn test_zero_years_leaves_base_heights() {
        let mut generator = Generator::new(params(20, 20, 0)).unwrap();
        generator.generate().unwrap();
        assert!(generator.grid.iter().all(|(_, _, v)| v.height == 100));
    }

    #[test]
    fn test_explicit_basin_too_large_for_map() {
        let mut generator = Generator::new(GenParams { basins: Some(1), ..params(60, 60, 100) }).unwrap();
        generator.setup_map();
        generator.split_map();
        generator.set_properties();
        generator.set_height();
        let err = generator.generate_elements().unwrap_err();
        assert!(matches!(err, GenerationError::BasinDoesNotFit { radius: 50, .. }));
    }

    #[test]
    fn test_random_basins_skipped_on_small_map() {
        let mut generator = Generator::new(GenParams { basins: None, ..params(60, 60, 100) }).unwrap();
        generator.generate().unwrap();
        assert!(generator.elements.iter().all(|e| e.kind() != ElementKind::DeepSeaBasin));
    }

    #[test]
    fn test_basin_sinks_during_run() {
        let mut generator = Generator::new(GenParams { basins: Some(1), margins: Some(0), ..params(110, 110, 4000) }).unwrap();
        generator.generate().unwrap();

        let basin = match &generator.elements[0] {
            LandscapeElement::Basin(basin) => basin,
            other => panic!("expected a basin first, got {:?}", other.kind()),
        };
        assert_eq!(basin.lifecycle.shift_already, 2);
        assert!(basin.circle.fits(110, 110));
    }

    #[test]
    fn test_invalid_params_rejected() {
        let result = Generator::new(GenParams::new(0, 10, 100));
        assert!(matches!(result, Err(GenerationError::Config(ConfigError::Missing("sizex")))));
    }

    #[test]
    fn test_summary_matches_grid() {
        let mut generator = Generator::new(params(24, 24, 1000)).unwrap();
        generator.generate().unwrap();
        let summary = generator.summary();

        assert_eq!(summary.seeds.master, 1234);
        assert_eq!(summary.elements.len(), 2);
        assert_eq!(summary.voxel_count, generator.grid.voxel_count());
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["elements"][0]["kind"], "mid_ocean_ridge");
    }

    #[test]
    fn test_progress_logged_once_per_interval() {
        let due: Vec<u64> = (1..=25).map(|i| i * 300).filter(|y| progress_due(*y, 300)).collect();
        assert_eq!(due, vec![1200, 2100, 3000, 4200, 5100, 6000, 7200]);
        assert!(progress_due(1000, 100));
        assert!(!progress_due(1100, 100));
    }

    #[test]
    fn test_elements_advance_in_creation_order() {
        let mut generator = Generator::new(params(12, 8, 4000)).unwrap();
        generator.grid = Tilemap::new_with(12, 8, Voxel { height: 5, color: 1, plate: PlateId(0) });
        for (x, _, voxel) in generator.grid.iter_mut() {
            if x >= 6 {
                voxel.plate = PlateId(1);
            }
        }

        let mut rng = ChaCha8Rng::seed_from_u64(8);
        let basin = DeepSeaBasin::new(&mut generator.grid, Circle::new(5, 4, 2), Activation::Immediate, &mut rng);
        generator.elements.push(LandscapeElement::Basin(basin));
        let ridge = MidOceanRidge::new(&mut generator.grid, &generator.scale, Activation::Immediate, &mut rng);
        assert_eq!(ridge.path.len(), 8);
        generator.elements.push(LandscapeElement::Ridge(ridge));

        // The ridge axis is painted over the inverted basin.
        assert_eq!(generator.grid.get(5, 4).color, RIDGE_COLOR);
        assert_eq!(generator.grid.get(4, 4).color, 254);

        generator.advance(4000);
        assert_eq!(generator.current_year, 4000);
        // Basin sinks 2 from 5, then the rift takes the remaining 3.
        // Rift first would leave 1, below the basin shift, and the basin would skip it.
        assert_eq!(generator.grid.get(5, 4).height, 0);
        assert_eq!(generator.grid.get(3, 4).height, 0);
        // Rift only, outside the basin.
        assert_eq!(generator.grid.get(5, 0).height, 1);
        assert_eq!(generator.grid.get(0, 0).height, 5);
    }

    #[test]
    fn test_extra_ridges_stack_on_the_same_path() {
        let run = |ridges| {
            let mut generator =
                Generator::new(GenParams { ridges: Some(ridges), margins: Some(0), ..params(32, 24, 1000) }).unwrap();
            generator.generate().unwrap();
            generator
        };
        let single = run(1);
        let double = run(2);

        let paths: Vec<&Vec<_>> = double
            .elements
            .iter()
            .filter_map(|e| match e {
                LandscapeElement::Ridge(ridge) => Some(&ridge.path),
                _ => None,
            })
            .collect();
        assert_eq!(paths.len(), 2);
        assert!(!paths[0].is_empty());
        assert_eq!(paths[0], paths[1]);

        for ((_, _, one), (_, _, two)) in single.grid.iter().zip(double.grid.iter()) {
            assert_eq!(100 - two.height, 2 * (100 - one.height));
        }
    }
}
