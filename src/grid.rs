//! Row-major 2D grid of elevation samples.
//!
//! The grid is the unit of work for every pipeline stage: each stage
//! consumes one grid and produces a fresh one, nothing is mutated across
//! stage boundaries. Missing samples are marked with `f32::NAN`.

/// A 2D elevation grid, row-major, with `f32::NAN` as the no-data sentinel.
#[derive(Clone, Debug)]
pub struct ElevationGrid {
    pub rows: usize,
    pub cols: usize,
    data: Vec<f32>,
}

impl ElevationGrid {
    /// Create a grid filled with a single value.
    pub fn new_with(rows: usize, cols: usize, value: f32) -> Self {
        Self {
            rows,
            cols,
            data: vec![value; rows * cols],
        }
    }

    /// Build a grid from rows of samples. All rows must have equal length;
    /// offending rows panic since this is a programming error, not input.
    pub fn from_rows(rows: Vec<Vec<f32>>) -> Self {
        let n_rows = rows.len();
        let n_cols = rows.first().map(|r| r.len()).unwrap_or(0);
        let mut data = Vec::with_capacity(n_rows * n_cols);
        for row in &rows {
            assert_eq!(row.len(), n_cols, "all grid rows must have equal length");
            data.extend_from_slice(row);
        }
        Self {
            rows: n_rows,
            cols: n_cols,
            data,
        }
    }

    fn index(&self, row: usize, col: usize) -> usize {
        debug_assert!(row < self.rows && col < self.cols);
        row * self.cols + col
    }

    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.data[self.index(row, col)]
    }

    pub fn set(&mut self, row: usize, col: usize, value: f32) {
        let idx = self.index(row, col);
        self.data[idx] = value;
    }

    /// Whether this sample is the no-data sentinel.
    pub fn is_no_data(value: f32) -> bool {
        value.is_nan()
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0 || self.cols == 0
    }

    /// Iterate over all cells with their coordinates.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, f32)> + '_ {
        let cols = self.cols;
        self.data
            .iter()
            .enumerate()
            .map(move |(idx, &val)| (idx / cols, idx % cols, val))
    }

    /// Minimum elevation ignoring no-data cells, `None` if every cell is no-data.
    pub fn min_elevation(&self) -> Option<f32> {
        self.data
            .iter()
            .copied()
            .filter(|v| !v.is_nan())
            .fold(None, |acc, v| match acc {
                Some(m) if m <= v => Some(m),
                _ => Some(v),
            })
    }

    fn row_is_empty(&self, row: usize) -> bool {
        (0..self.cols).all(|c| self.get(row, c).is_nan())
    }

    fn col_is_empty(&self, col: usize) -> bool {
        (0..self.rows).all(|r| self.get(r, col).is_nan())
    }

    /// Extract a rectangular sub-grid. `row_end`/`col_end` are exclusive.
    pub fn crop(&self, row_start: usize, row_end: usize, col_start: usize, col_end: usize) -> Self {
        let mut out = ElevationGrid::new_with(row_end - row_start, col_end - col_start, 0.0);
        for r in row_start..row_end {
            for c in col_start..col_end {
                out.set(r - row_start, c - col_start, self.get(r, c));
            }
        }
        out
    }
}

/// Drop leading and trailing rows/columns that contain no data at all.
///
/// Tile merging upstream occasionally pads the raster with an empty border
/// row or column; those would show up as spurious cliffs in the model.
/// If the whole grid is empty the input is returned unchanged rather than
/// producing a zero-area grid.
pub fn trim_empty_borders(grid: &ElevationGrid) -> ElevationGrid {
    let first_row = (0..grid.rows).find(|&r| !grid.row_is_empty(r));
    let first_row = match first_row {
        Some(r) => r,
        None => return grid.clone(),
    };
    let last_row = (0..grid.rows).rev().find(|&r| !grid.row_is_empty(r)).unwrap_or(first_row);

    let first_col = (0..grid.cols).find(|&c| !grid.col_is_empty(c)).unwrap_or(0);
    let last_col = (0..grid.cols).rev().find(|&c| !grid.col_is_empty(c)).unwrap_or(first_col);

    grid.crop(first_row, last_row + 1, first_col, last_col + 1)
}
