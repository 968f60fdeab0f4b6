//! Writers for the finished landscape.

pub mod preview;
pub mod vox;

pub use preview::export_preview;
pub use vox::{write_vox, VOX_MAX_SIZE};
