//! Splitting a large grid into independently convertible tiles.
//!
//! Tiling bounds the size of each output file: every tile runs through
//! the rest of the pipeline on its own and produces its own STL. Tiles
//! share no state, so they can be processed in parallel.

use crate::error::{MapError, Result};
use crate::grid::ElevationGrid;

/// Position of a tile inside the tiling, `(row, col)`, top-left is (0, 0).
/// Only used to name output artifacts.
pub type TileIndex = (usize, usize);

/// One sub-grid plus its position in the tiling.
#[derive(Clone, Debug)]
pub struct Tile {
    pub index: TileIndex,
    pub grid: ElevationGrid,
}

/// Parse a tile format string of the exact shape `"<n>x<m>"`, n and m >= 1.
pub fn parse_tile_format(format: &str) -> Result<(usize, usize)> {
    let invalid = || MapError::InvalidTileFormat(format.to_string());

    let mut parts = format.split('x');
    let n = parts.next().ok_or_else(invalid)?;
    let m = parts.next().ok_or_else(invalid)?;
    if parts.next().is_some() {
        return Err(invalid());
    }

    let n: usize = n.parse().map_err(|_| invalid())?;
    let m: usize = m.parse().map_err(|_| invalid())?;
    if n == 0 || m == 0 {
        return Err(invalid());
    }
    Ok((n, m))
}

/// Split the grid into `n` x `m` tiles in row-major tile order.
///
/// Rows are divided into n nearly-equal bands and columns into m, with
/// remainder rows/cols going to the first bands. Every input cell lands
/// in exactly one tile.
pub fn split_into_tiles(grid: &ElevationGrid, n: usize, m: usize) -> Vec<Tile> {
    let row_bands = band_bounds(grid.rows, n);
    let col_bands = band_bounds(grid.cols, m);

    let mut tiles = Vec::with_capacity(n * m);
    for (tile_r, &(r0, r1)) in row_bands.iter().enumerate() {
        for (tile_c, &(c0, c1)) in col_bands.iter().enumerate() {
            tiles.push(Tile {
                index: (tile_r, tile_c),
                grid: grid.crop(r0, r1, c0, c1),
            });
        }
    }
    tiles
}

/// Half-open `(start, end)` bounds of `bands` nearly-equal bands over `len`.
fn band_bounds(len: usize, bands: usize) -> Vec<(usize, usize)> {
    let base = len / bands;
    let remainder = len % bands;

    let mut bounds = Vec::with_capacity(bands);
    let mut start = 0;
    for band in 0..bands {
        let size = base + usize::from(band < remainder);
        bounds.push((start, start + size));
        start += size;
    }
    bounds
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_formats() {
        assert_eq!(parse_tile_format("2x3").unwrap(), (2, 3));
        assert_eq!(parse_tile_format("1x1").unwrap(), (1, 1));
        assert_eq!(parse_tile_format("10x4").unwrap(), (10, 4));
    }

    #[test]
    fn test_parse_invalid_formats() {
        for bad in ["", "2x", "x2", "axb", "0x1", "1x0", "2x3x4", "2-3", "-1x2", " 2x3"] {
            assert!(
                matches!(parse_tile_format(bad), Err(MapError::InvalidTileFormat(_))),
                "expected InvalidTileFormat for {:?}",
                bad
            );
        }
    }

    #[test]
    fn test_split_covers_every_cell_once() {
        // 10x12 grid, 2x3 tiles: 6 sub-grids covering all 120 cells exactly once.
        let mut grid = ElevationGrid::new_with(10, 12, 0.0);
        for r in 0..10 {
            for c in 0..12 {
                grid.set(r, c, (r * 12 + c) as f32);
            }
        }

        let tiles = split_into_tiles(&grid, 2, 3);
        assert_eq!(tiles.len(), 6);

        let mut seen = vec![0usize; 120];
        for tile in &tiles {
            for (_, _, v) in tile.grid.iter() {
                seen[v as usize] += 1;
            }
        }
        assert!(seen.iter().all(|&count| count == 1));
    }

    #[test]
    fn test_split_remainder_goes_to_first_bands() {
        let grid = ElevationGrid::new_with(7, 5, 0.0);
        let tiles = split_into_tiles(&grid, 3, 2);

        // Rows 7 into 3 bands: 3, 2, 2. Cols 5 into 2 bands: 3, 2.
        assert_eq!(tiles[0].grid.rows, 3);
        assert_eq!(tiles[0].grid.cols, 3);
        assert_eq!(tiles[1].grid.cols, 2);
        assert_eq!(tiles[2].grid.rows, 2);
        assert_eq!(tiles[5].grid.rows, 2);
        assert_eq!(tiles[5].grid.cols, 2);
    }

    #[test]
    fn test_split_row_major_tile_order() {
        let grid = ElevationGrid::new_with(4, 4, 0.0);
        let tiles = split_into_tiles(&grid, 2, 2);
        let indices: Vec<_> = tiles.iter().map(|t| t.index).collect();
        assert_eq!(indices, vec![(0, 0), (0, 1), (1, 0), (1, 1)]);
    }
}
