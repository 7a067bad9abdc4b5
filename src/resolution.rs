//! Resolution reduction by integer binning.
//!
//! Large rasters produce enormous triangle counts; binning trades
//! geometric detail for bounded compute and memory. The bin factor is
//! derived from the average of both axes relative to the target
//! resolution, rounded to the nearest integer.

use crate::conf::MAXIMUM_RESOLUTION;
use crate::grid::ElevationGrid;

/// Bin factor for a grid of the given dimensions. A result <= 1 means
/// the grid is already small enough and no reduction is needed.
pub fn bin_factor(rows: usize, cols: usize) -> usize {
    let avg = (rows as f64 / MAXIMUM_RESOLUTION as f64 + cols as f64 / MAXIMUM_RESOLUTION as f64) / 2.0;
    avg.round() as usize
}

/// Downsample the grid by averaging `factor` x `factor` blocks.
///
/// No-data cells are ignored in the average; a block that is entirely
/// no-data stays no-data. Partial blocks at the right/bottom edge average
/// only their available cells, so edge elevations are not biased downward.
/// A factor <= 1 returns the grid unchanged.
pub fn reduce_resolution(grid: &ElevationGrid, factor: usize) -> ElevationGrid {
    if factor <= 1 {
        return grid.clone();
    }

    let out_rows = grid.rows.div_ceil(factor);
    let out_cols = grid.cols.div_ceil(factor);
    let mut out = ElevationGrid::new_with(out_rows, out_cols, f32::NAN);

    for out_r in 0..out_rows {
        for out_c in 0..out_cols {
            let row_end = ((out_r + 1) * factor).min(grid.rows);
            let col_end = ((out_c + 1) * factor).min(grid.cols);

            let mut sum = 0.0f64;
            let mut count = 0usize;
            for r in out_r * factor..row_end {
                for c in out_c * factor..col_end {
                    let v = grid.get(r, c);
                    if !ElevationGrid::is_no_data(v) {
                        sum += v as f64;
                        count += 1;
                    }
                }
            }

            if count > 0 {
                out.set(out_r, out_c, (sum / count as f64) as f32);
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factor_one_is_identity() {
        let grid = ElevationGrid::from_rows(vec![vec![1.0, 2.0], vec![3.0, 4.0]]);
        let reduced = reduce_resolution(&grid, 1);
        assert_eq!(reduced.rows, grid.rows);
        assert_eq!(reduced.cols, grid.cols);
        for (r, c, v) in grid.iter() {
            assert_eq!(reduced.get(r, c), v);
        }
    }

    #[test]
    fn test_block_mean() {
        let grid = ElevationGrid::from_rows(vec![
            vec![1.0, 3.0, 5.0, 7.0],
            vec![1.0, 3.0, 5.0, 7.0],
            vec![9.0, 9.0, 2.0, 2.0],
            vec![9.0, 9.0, 2.0, 2.0],
        ]);
        let reduced = reduce_resolution(&grid, 2);
        assert_eq!(reduced.rows, 2);
        assert_eq!(reduced.cols, 2);
        assert_eq!(reduced.get(0, 0), 2.0);
        assert_eq!(reduced.get(0, 1), 6.0);
        assert_eq!(reduced.get(1, 0), 9.0);
        assert_eq!(reduced.get(1, 1), 2.0);
    }

    #[test]
    fn test_partial_blocks_average_available_cells_only() {
        // 3x3 with factor 2: the edge blocks must not be padded with zeros.
        let grid = ElevationGrid::from_rows(vec![
            vec![4.0, 4.0, 8.0],
            vec![4.0, 4.0, 8.0],
            vec![6.0, 6.0, 10.0],
        ]);
        let reduced = reduce_resolution(&grid, 2);
        assert_eq!(reduced.rows, 2);
        assert_eq!(reduced.cols, 2);
        assert_eq!(reduced.get(0, 0), 4.0);
        assert_eq!(reduced.get(0, 1), 8.0);
        assert_eq!(reduced.get(1, 0), 6.0);
        assert_eq!(reduced.get(1, 1), 10.0);
    }

    #[test]
    fn test_no_data_ignored_in_block() {
        let grid = ElevationGrid::from_rows(vec![
            vec![2.0, f32::NAN],
            vec![4.0, f32::NAN],
        ]);
        let reduced = reduce_resolution(&grid, 2);
        assert_eq!(reduced.get(0, 0), 3.0);
    }

    #[test]
    fn test_all_no_data_block_propagates() {
        let mut grid = ElevationGrid::new_with(4, 4, 1.0);
        for r in 0..2 {
            for c in 0..2 {
                grid.set(r, c, f32::NAN);
            }
        }
        let reduced = reduce_resolution(&grid, 2);
        assert!(reduced.get(0, 0).is_nan());
        assert_eq!(reduced.get(1, 1), 1.0);
    }

    #[test]
    fn test_bin_factor_heuristic() {
        assert_eq!(bin_factor(500, 500), 1);
        assert_eq!(bin_factor(1000, 1000), 1);
        assert_eq!(bin_factor(2000, 2000), 2);
        // Average of both axes: (4000 + 1000) / 2 / 1000 rounds to 3.
        assert_eq!(bin_factor(4000, 1000), 3);
        assert_eq!(bin_factor(10, 10), 0);
    }
}
