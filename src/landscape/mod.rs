//! Landscape elements: features that reshape the grid as simulated time passes.
//!
//! The set of elements is closed. Each one is sited once on the grid, then
//! advanced step by step by the generator in creation order.

pub mod basin;
pub mod lifecycle;
pub mod margin;
pub mod ridge;

use serde::Serialize;

use crate::voxel::Grid;

pub use basin::{Circle, DeepSeaBasin, Guyot};
pub use lifecycle::{Activation, Lifecycle, Phase};
pub use margin::{ContinentalMargin, MarginAnchor};
pub use ridge::MidOceanRidge;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    DeepSeaBasin,
    MidOceanRidge,
    ContinentalMargin,
}

impl std::fmt::Display for ElementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ElementKind::DeepSeaBasin => "DeepSeaBasin",
            ElementKind::MidOceanRidge => "MidOceanRidge",
            ElementKind::ContinentalMargin => "ContinentalMargin",
        };
        write!(f, "{}", name)
    }
}

#[derive(Clone, Debug)]
pub enum LandscapeElement {
    Basin(DeepSeaBasin),
    Ridge(MidOceanRidge),
    Margin(ContinentalMargin),
}

impl LandscapeElement {
    /// Advance the element by one simulation step.
    pub fn advance(&mut self, grid: &mut Grid, years_delta: u64) {
        match self {
            LandscapeElement::Basin(basin) => basin.step(grid, years_delta),
            LandscapeElement::Ridge(ridge) => ridge.step(grid, years_delta),
            LandscapeElement::Margin(margin) => margin.step(grid, years_delta),
        }
    }

    pub fn kind(&self) -> ElementKind {
        match self {
            LandscapeElement::Basin(_) => ElementKind::DeepSeaBasin,
            LandscapeElement::Ridge(_) => ElementKind::MidOceanRidge,
            LandscapeElement::Margin(_) => ElementKind::ContinentalMargin,
        }
    }

    pub fn lifecycle(&self) -> &Lifecycle {
        match self {
            LandscapeElement::Basin(basin) => &basin.lifecycle,
            LandscapeElement::Ridge(ridge) => &ridge.lifecycle,
            LandscapeElement::Margin(margin) => &margin.lifecycle,
        }
    }

    pub fn summary(&self) -> ElementSummary {
        match self {
            LandscapeElement::Basin(basin) => ElementSummary::DeepSeaBasin {
                x: basin.circle.x,
                y: basin.circle.y,
                radius: basin.circle.radius,
                guyots: basin.guyots.len(),
                lifecycle: basin.lifecycle,
            },
            LandscapeElement::Ridge(ridge) => ElementSummary::MidOceanRidge {
                length: ridge.path.len(),
                boundary_edges: ridge.graph.len(),
                depth_per_thousand_years: ridge.depth_per_thousand_years,
                lifecycle: ridge.lifecycle,
            },
            LandscapeElement::Margin(margin) => ElementSummary::ContinentalMargin {
                start: margin.start,
                anchor: margin.anchor,
                depth_per_thousand_years: margin.depth_per_thousand_years,
                lifecycle: margin.lifecycle,
            },
        }
    }
}

/// Serializable description of an element, for run summaries.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ElementSummary {
    DeepSeaBasin {
        x: usize,
        y: usize,
        radius: usize,
        guyots: usize,
        lifecycle: Lifecycle,
    },
    MidOceanRidge {
        length: usize,
        boundary_edges: usize,
        depth_per_thousand_years: u32,
        lifecycle: Lifecycle,
    },
    ContinentalMargin {
        start: (usize, usize),
        anchor: Option<MarginAnchor>,
        depth_per_thousand_years: u32,
        lifecycle: Lifecycle,
    },
}
