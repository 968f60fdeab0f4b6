pub mod generation;
pub mod types;

pub use generation::{assign_properties, partition_with_seeds, random_seeds, split_plates};
pub use types::{Plate, PlateId, SeedPoint};
