//! Conversion pipeline orchestration.
//!
//! Wires the stages together: border trimming, optional resolution
//! reduction, triangulation and STL serialization, with optional tiling
//! on top. The stages themselves are pure; this module owns the policy
//! decisions (when to reduce, how to name tile outputs) and is the only
//! place that logs.

use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::conf::PERFORMANCE_WARNING_THRESHOLD;
use crate::error::{MapError, Result};
use crate::grid::{trim_empty_borders, ElevationGrid};
use crate::resolution::{bin_factor, reduce_resolution};
use crate::stl::{write_stl, Encoding};
use crate::tiling::{split_into_tiles, TileIndex};
use crate::triangulate::{model_size_for, triangulate, ScalingParams};

/// Options for one conversion run, mirroring the public configuration
/// surface of the tool.
#[derive(Clone, Copy, Debug)]
pub struct ConvertOptions {
    pub encoding: Encoding,
    /// Desired physical size (x, y) in output units.
    pub model_size: (f64, f64),
    /// Skip resolution reduction entirely. Large grids then convert at
    /// full detail, at a potentially extreme cost in time and memory.
    pub max_res: bool,
    pub scaling: ScalingParams,
    /// Use `model_size` exactly instead of preserving the grid aspect ratio.
    pub ensure_squared: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            encoding: Encoding::Binary,
            model_size: (200.0, 200.0),
            max_res: false,
            scaling: ScalingParams::default(),
            ensure_squared: false,
        }
    }
}

/// Receiver for coarse pipeline progress, one unit per finished tile.
/// Implementations must be callable from worker threads.
pub trait ProgressSink: Sync {
    fn advance(&self, n: usize);
}

/// Default sink that swallows all progress.
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn advance(&self, _n: usize) {}
}

/// Convert a single elevation grid to one STL file.
///
/// Returns the path actually written (the `.stl` extension is enforced).
pub fn convert_grid_to_stl(
    grid: &ElevationGrid,
    options: &ConvertOptions,
    output: &Path,
) -> Result<PathBuf> {
    if grid.is_empty() {
        return Err(MapError::DegenerateGrid);
    }

    // Merged rasters sometimes carry an all-empty border row/col.
    let grid = if grid.rows > 1 && grid.cols > 1 {
        trim_empty_borders(grid)
    } else {
        grid.clone()
    };

    let grid = if options.max_res {
        if grid.rows * grid.cols > PERFORMANCE_WARNING_THRESHOLD {
            log::warn!(
                "converting {}x{} cells at maximum resolution; this may need a lot of time and memory",
                grid.rows,
                grid.cols
            );
        }
        grid
    } else {
        let factor = bin_factor(grid.rows, grid.cols);
        if factor > 1 {
            log::debug!("reducing grid resolution by factor {}", factor);
            reduce_resolution(&grid, factor)
        } else {
            grid
        }
    };

    let size = model_size_for(
        &grid,
        options.model_size.0,
        options.model_size.1,
        options.ensure_squared,
    );
    let mesh = triangulate(&grid, size, &options.scaling);
    log::debug!("writing {} triangles to {}", mesh.len(), output.display());
    write_stl(&mesh, output, options.encoding)
}

/// Convert a grid split into `n` x `m` tiles, one STL file per tile.
///
/// Tiles are independent and processed in parallel; the returned paths are
/// in row-major tile order and named by tile position, never by completion
/// order. A 1x1 tiling writes a single file without a tile suffix.
pub fn convert_tiled_grid_to_stl(
    grid: &ElevationGrid,
    tiles: (usize, usize),
    options: &ConvertOptions,
    output: &Path,
    progress: &dyn ProgressSink,
) -> Result<Vec<PathBuf>> {
    if grid.is_empty() {
        return Err(MapError::DegenerateGrid);
    }

    let (n, m) = tiles;
    if n == 1 && m == 1 {
        let path = convert_grid_to_stl(grid, options, output)?;
        progress.advance(1);
        return Ok(vec![path]);
    }

    split_into_tiles(grid, n, m)
        .par_iter()
        .map(|tile| {
            let path = convert_grid_to_stl(&tile.grid, options, &tile_path(output, tile.index))?;
            progress.advance(1);
            Ok(path)
        })
        .collect()
}

/// Output path for one tile: `<stem>_<row>_<col>.stl`, 1-based.
fn tile_path(output: &Path, index: TileIndex) -> PathBuf {
    let stem = output
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("tile");
    output.with_file_name(format!("{}_{}_{}.stl", stem, index.0 + 1, index.1 + 1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stl::read_stl;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::tempdir;

    struct CountingSink(AtomicUsize);

    impl ProgressSink for CountingSink {
        fn advance(&self, n: usize) {
            self.0.fetch_add(n, Ordering::SeqCst);
        }
    }

    fn ramp_grid(rows: usize, cols: usize) -> ElevationGrid {
        let mut grid = ElevationGrid::new_with(rows, cols, 0.0);
        for r in 0..rows {
            for c in 0..cols {
                grid.set(r, c, (r + c) as f32);
            }
        }
        grid
    }

    #[test]
    fn test_convert_writes_readable_stl() {
        let dir = tempdir().unwrap();
        let grid = ramp_grid(4, 4);
        let path = convert_grid_to_stl(&grid, &ConvertOptions::default(), &dir.path().join("model")).unwrap();
        assert!(path.exists());
        let mesh = read_stl(&path).unwrap();
        // 3x3 quads on top, perimeter walls, base.
        assert_eq!(mesh.len(), 18 + 24 + 2);
    }

    #[test]
    fn test_zero_area_grid_is_degenerate() {
        let grid = ElevationGrid::from_rows(vec![]);
        let result = convert_grid_to_stl(&grid, &ConvertOptions::default(), Path::new("unused"));
        assert!(matches!(result, Err(MapError::DegenerateGrid)));
    }

    #[test]
    fn test_tiled_conversion_names_and_counts() {
        let dir = tempdir().unwrap();
        let grid = ramp_grid(8, 8);
        let sink = CountingSink(AtomicUsize::new(0));

        let paths = convert_tiled_grid_to_stl(
            &grid,
            (2, 2),
            &ConvertOptions::default(),
            &dir.path().join("area.stl"),
            &sink,
        )
        .unwrap();

        assert_eq!(paths.len(), 4);
        assert_eq!(sink.0.load(Ordering::SeqCst), 4);
        let names: Vec<_> = paths
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["area_1_1.stl", "area_1_2.stl", "area_2_1.stl", "area_2_2.stl"]);
        for path in &paths {
            assert!(path.exists());
        }
    }

    #[test]
    fn test_single_tile_has_no_suffix() {
        let dir = tempdir().unwrap();
        let grid = ramp_grid(3, 3);
        let paths = convert_tiled_grid_to_stl(
            &grid,
            (1, 1),
            &ConvertOptions::default(),
            &dir.path().join("solo"),
            &NoProgress,
        )
        .unwrap();
        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0].file_name().unwrap().to_str().unwrap(), "solo.stl");
    }
}
