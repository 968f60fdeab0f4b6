//! Tectonic voxel landscape generation library
//!
//! Re-exports modules for use by binaries and tools.

pub mod config;
pub mod error;
pub mod export;
pub mod generator;
pub mod heightmap;
pub mod landscape;
pub mod logging;
pub mod plates;
pub mod scale;
pub mod seeds;
pub mod tilemap;
pub mod voxel;
