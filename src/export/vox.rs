//! MagicaVoxel `.vox` writer (format version 150).
//!
//! The file holds one model: a `MAIN` chunk whose children are a `SIZE` and an
//! `XYZI` chunk. Every column contributes one voxel per level below its
//! height, tagged with the column's palette index. All integers are
//! little-endian.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::info;

use crate::error::ExportError;
use crate::voxel::Grid;

pub const VOX_VERSION: u32 = 150;
/// Largest model extent per axis; coordinates are stored in one byte.
pub const VOX_MAX_SIZE: usize = 256;

/// Chunk id, content size and children size.
const CHUNK_HEADER_SIZE: u32 = 12;
const SIZE_CONTENT_SIZE: u32 = 12;

/// Fail early when the grid cannot be stored in a vox model.
pub fn check_size(width: usize, height: usize, depth: usize) -> Result<(), ExportError> {
    if width > VOX_MAX_SIZE || height > VOX_MAX_SIZE || depth > VOX_MAX_SIZE {
        return Err(ExportError::TooLarge {
            width,
            height,
            depth,
            limit: VOX_MAX_SIZE,
        });
    }
    Ok(())
}

/// Write `grid` as a `.vox` file at `path`.
pub fn write_vox(grid: &Grid, path: &Path) -> Result<(), ExportError> {
    let file = File::create(path)?;
    let mut out = BufWriter::new(file);
    write_model(grid, &mut out)?;
    out.flush()?;
    info!(
        path = %path.display(),
        max_height = grid.max_height(),
        voxels = grid.voxel_count(),
        "Wrote vox model"
    );
    Ok(())
}

/// Serialize `grid` into any writer.
pub fn write_model<W: Write>(grid: &Grid, out: &mut W) -> Result<(), ExportError> {
    let depth = grid.max_height() as usize;
    check_size(grid.width, grid.height, depth)?;
    // Bounded by 256^3, so it fits the u32 count.
    let voxels = grid.voxel_count() as u32;

    let xyzi_content = 4 + 4 * voxels;
    let children = (CHUNK_HEADER_SIZE + SIZE_CONTENT_SIZE) + (CHUNK_HEADER_SIZE + xyzi_content);

    out.write_all(b"VOX ")?;
    write_u32(out, VOX_VERSION)?;

    out.write_all(b"MAIN")?;
    write_u32(out, 0)?;
    write_u32(out, children)?;

    out.write_all(b"SIZE")?;
    write_u32(out, SIZE_CONTENT_SIZE)?;
    write_u32(out, 0)?;
    write_u32(out, grid.width as u32)?;
    write_u32(out, grid.height as u32)?;
    write_u32(out, depth as u32)?;

    out.write_all(b"XYZI")?;
    write_u32(out, xyzi_content)?;
    write_u32(out, 0)?;
    write_u32(out, voxels)?;
    for (x, y, voxel) in grid.iter() {
        for z in 0..voxel.height {
            out.write_all(&[x as u8, y as u8, z as u8, voxel.color])?;
        }
    }
    Ok(())
}

fn write_u32<W: Write>(out: &mut W, value: u32) -> std::io::Result<()> {
    out.write_all(&value.to_le_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tilemap::Tilemap;
    use crate::voxel::Voxel;

    fn read_u32(bytes: &[u8], at: usize) -> u32 {
        u32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
    }

    fn small_grid() -> Grid {
        let mut grid: Grid = Tilemap::new(2, 2);
        grid.get_mut(0, 0).height = 2;
        grid.get_mut(0, 0).color = 7;
        grid.get_mut(1, 1).height = 1;
        grid.get_mut(1, 1).color = 9;
        grid
    }

    #[test]
    fn test_header_and_chunks() {
        let mut bytes = Vec::new();
        write_model(&small_grid(), &mut bytes).unwrap();

        assert_eq!(&bytes[0..4], b"VOX ");
        assert_eq!(read_u32(&bytes, 4), 150);
        assert_eq!(&bytes[8..12], b"MAIN");
        assert_eq!(read_u32(&bytes, 12), 0);
        assert_eq!(read_u32(&bytes, 16) as usize, bytes.len() - 20);

        assert_eq!(&bytes[20..24], b"SIZE");
        assert_eq!(read_u32(&bytes, 32), 2);
        assert_eq!(read_u32(&bytes, 36), 2);
        assert_eq!(read_u32(&bytes, 40), 2);

        assert_eq!(&bytes[44..48], b"XYZI");
        assert_eq!(read_u32(&bytes, 48), 4 + 4 * 3);
        assert_eq!(read_u32(&bytes, 56), 3);
    }

    #[test]
    fn test_voxel_entries() {
        let mut bytes = Vec::new();
        write_model(&small_grid(), &mut bytes).unwrap();

        let entries: Vec<&[u8]> = bytes[60..].chunks(4).collect();
        assert_eq!(entries, vec![&[0, 0, 0, 7][..], &[0, 0, 1, 7][..], &[1, 1, 0, 9][..]]);
    }

    #[test]
    fn test_empty_grid() {
        let grid: Grid = Tilemap::new(3, 3);
        let mut bytes = Vec::new();
        write_model(&grid, &mut bytes).unwrap();
        assert_eq!(bytes.len(), 60);
        assert_eq!(read_u32(&bytes, 56), 0);
    }

    #[test]
    fn test_too_large_rejected() {
        let grid: Grid = Tilemap::new_with(300, 4, Voxel { height: 1, ..Default::default() });
        let mut bytes = Vec::new();
        assert!(matches!(write_model(&grid, &mut bytes), Err(ExportError::TooLarge { width: 300, .. })));
        assert!(check_size(256, 256, 256).is_ok());
        assert!(check_size(10, 10, 257).is_err());
    }

    #[test]
    fn test_write_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("landscape.vox");
        write_vox(&small_grid(), &path).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(bytes.len(), 60 + 12);
    }
}
