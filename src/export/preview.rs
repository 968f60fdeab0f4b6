use std::path::Path;

use image::{ImageBuffer, Rgb, RgbImage};
use tracing::info;

use crate::error::ExportError;
use crate::landscape::ridge::RIDGE_COLOR;
use crate::voxel::{Grid, Voxel};

/// Top-down PNG of the grid: one pixel per column, hue from the palette
/// index, brightness from the column height.
pub fn export_preview(grid: &Grid, path: &Path) -> Result<(), ExportError> {
    let img = render_preview(grid);
    img.save(path)?;
    info!(path = %path.display(), "Wrote preview");
    Ok(())
}

pub fn render_preview(grid: &Grid) -> RgbImage {
    let max_height = grid.max_height().max(1) as f32;
    let mut img: RgbImage = ImageBuffer::new(grid.width as u32, grid.height as u32);

    for (x, y, voxel) in grid.iter() {
        let shade = 0.35 + 0.65 * (voxel.height as f32 / max_height);
        img.put_pixel(x as u32, y as u32, Rgb(shaded(palette_color(voxel), shade)));
    }
    img
}

/// Spread palette indices around the hue wheel; ridge axes stay white.
fn palette_color(voxel: &Voxel) -> [u8; 3] {
    if voxel.color == RIDGE_COLOR {
        return [255, 255, 255];
    }
    // Golden angle keeps neighbouring indices apart.
    let hue = (voxel.color as f32 * 137.508) % 360.0;
    hsv_to_rgb(hue, 0.6, 0.9)
}

fn hsv_to_rgb(h: f32, s: f32, v: f32) -> [u8; 3] {
    let c = v * s;
    let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
    let m = v - c;
    let (r, g, b) = match (h / 60.0) as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    [
        ((r + m) * 255.0) as u8,
        ((g + m) * 255.0) as u8,
        ((b + m) * 255.0) as u8,
    ]
}

fn shaded(color: [u8; 3], shade: f32) -> [u8; 3] {
    color.map(|c| (c as f32 * shade.clamp(0.0, 1.0)) as u8)
}
