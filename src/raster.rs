//! Loading elevation grids from raster images.
//!
//! Heightmaps arrive as grayscale images (PNG/TIFF); samples are read as
//! 16-bit luma and used as raw elevation values. Reprojection and CRS
//! handling are deliberately out of scope: the pipeline only ever sees an
//! in-memory grid. An optional no-data value lets callers mark absent
//! samples (commonly 0 in merged rasters).

use std::path::Path;

use crate::error::{MapError, Result};
use crate::grid::ElevationGrid;

/// Load a grayscale image as an elevation grid. Pixels equal to
/// `no_data` (if given) become the no-data sentinel.
pub fn load_image_grid(path: &Path, no_data: Option<f32>) -> Result<ElevationGrid> {
    let image = image::open(path)
        .map_err(|e| MapError::Raster(format!("{}: {}", path.display(), e)))?
        .to_luma16();

    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(MapError::Raster(format!("{}: empty image", path.display())));
    }

    let mut grid = ElevationGrid::new_with(height as usize, width as usize, 0.0);
    for (x, y, pixel) in image.enumerate_pixels() {
        let value = pixel.0[0] as f32;
        let value = match no_data {
            Some(sentinel) if value == sentinel => f32::NAN,
            _ => value,
        };
        grid.set(y as usize, x as usize, value);
    }
    Ok(grid)
}
