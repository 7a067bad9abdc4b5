//! Triangulation of an elevation grid into a closed printable solid.
//!
//! The solid has three parts: the top surface (two triangles per 2x2
//! neighborhood of grid points), vertical walls along every boundary edge
//! of the top surface, and a flat base at z = 0. Quads touching a no-data
//! corner are skipped, leaving holes; the walls seal those holes down to
//! the base so the result stays printable.

use crate::grid::ElevationGrid;
use crate::mesh::{Mesh, Triangle, Vec3};

/// Physical target dimensions of the model in output units (e.g. millimeters).
/// Both components must be strictly positive.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ModelSize {
    pub x: f64,
    pub y: f64,
}

/// Z-axis scaling knobs applied to raw elevation samples.
#[derive(Clone, Copy, Debug)]
pub struct ScalingParams {
    /// Additive offset; `None` means auto base, i.e. the lowest point of
    /// the model sits at z = 0.
    pub z_offset: Option<f64>,
    /// Multiplier applied after elevation scaling.
    pub z_scale: f64,
    /// Pre-multiplier applied to raw elevation before `z_scale`.
    pub elevation_scale: f64,
}

impl Default for ScalingParams {
    fn default() -> Self {
        Self {
            z_offset: None,
            z_scale: 1.0,
            elevation_scale: 1.0,
        }
    }
}

/// Derive the physical footprint for a grid.
///
/// When the caller asked for a square output the desired size is taken as
/// given. Otherwise the y-dimension is rescaled by the grid's col/row
/// ratio so one grid step covers the same physical distance on both axes,
/// preserving the aspect ratio of the sampled data.
pub fn model_size_for(grid: &ElevationGrid, x: f64, y: f64, ensure_squared: bool) -> ModelSize {
    if ensure_squared || grid.rows == 0 {
        ModelSize { x, y }
    } else {
        ModelSize {
            x,
            y: y / grid.rows as f64 * grid.cols as f64,
        }
    }
}

/// Effective additive offset for post-scale elevation values: the caller's
/// z-offset if given, else the negative of the minimum so the model's
/// lowest point lands on the base plane.
pub fn effective_offset(scaled: &[f64], z_offset: Option<f64>) -> f64 {
    if let Some(offset) = z_offset {
        return offset;
    }
    let min = scaled
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(f64::INFINITY, f64::min);
    if min.is_finite() {
        -min
    } else {
        0.0
    }
}

/// Triangulate a grid into a closed solid with the given footprint.
///
/// A grid with fewer than 2 rows or columns has no top surface to build;
/// it yields the base slab only (recognized edge case, not an error).
pub fn triangulate(grid: &ElevationGrid, size: ModelSize, params: &ScalingParams) -> Mesh {
    let rows = grid.rows;
    let cols = grid.cols;

    if rows < 2 || cols < 2 {
        let mut mesh = Mesh::with_capacity(2);
        push_base(&mut mesh, size);
        return mesh;
    }

    // Scale elevations up front; no-data stays NaN and never reaches a vertex.
    let mut z = vec![f64::NAN; rows * cols];
    for (r, c, v) in grid.iter() {
        if !ElevationGrid::is_no_data(v) {
            z[r * cols + c] = v as f64 * params.elevation_scale * params.z_scale;
        }
    }
    let offset = effective_offset(&z, params.z_offset);
    for v in z.iter_mut() {
        if v.is_finite() {
            *v += offset;
        }
    }

    let x_step = size.x / (rows - 1) as f64;
    let y_step = size.y / (cols - 1) as f64;
    let point = |r: usize, c: usize| Vec3::new(r as f64 * x_step, c as f64 * y_step, z[r * cols + c]);
    let quad_ok = |r: usize, c: usize| {
        z[r * cols + c].is_finite()
            && z[(r + 1) * cols + c].is_finite()
            && z[r * cols + c + 1].is_finite()
            && z[(r + 1) * cols + c + 1].is_finite()
    };

    let mut mesh = Mesh::with_capacity(2 * (rows - 1) * (cols - 1) + 2);

    for r in 0..rows - 1 {
        for c in 0..cols - 1 {
            if !quad_ok(r, c) {
                continue;
            }

            let a = point(r, c);
            let b = point(r + 1, c);
            let d = point(r + 1, c + 1);
            let cc = point(r, c + 1);

            // Quad split along the fixed a-d diagonal, wound upward.
            mesh.push(Triangle::new(a, b, d));
            mesh.push(Triangle::new(a, d, cc));

            // Walk the quad boundary counter-clockwise (a, b, d, cc); any
            // edge without an emitted neighbor quad on the far side is a
            // boundary of the top surface and gets walled down to the base.
            // The traversal direction keeps wall normals facing outward,
            // for the outer rim and interior holes alike.
            let edges = [
                (r as isize, c as isize - 1, a, b),
                (r as isize + 1, c as isize, b, d),
                (r as isize, c as isize + 1, d, cc),
                (r as isize - 1, c as isize, cc, a),
            ];
            for (nr, nc, u, v) in edges {
                let neighbor_emitted = nr >= 0
                    && nc >= 0
                    && (nr as usize) < rows - 1
                    && (nc as usize) < cols - 1
                    && quad_ok(nr as usize, nc as usize);
                if !neighbor_emitted {
                    push_wall(&mut mesh, u, v);
                }
            }
        }
    }

    push_base(&mut mesh, size);
    mesh
}

/// Two vertical triangles from the top edge u -> v down to the base plane.
fn push_wall(mesh: &mut Mesh, u: Vec3, v: Vec3) {
    let u_base = Vec3::new(u.x, u.y, 0.0);
    let v_base = Vec3::new(v.x, v.y, 0.0);
    mesh.push(Triangle::new(u, u_base, v));
    mesh.push(Triangle::new(v, u_base, v_base));
}

/// Two triangles spanning the full footprint at z = 0, normal downward.
fn push_base(mesh: &mut Mesh, size: ModelSize) {
    let o = Vec3::new(0.0, 0.0, 0.0);
    let px = Vec3::new(size.x, 0.0, 0.0);
    let py = Vec3::new(0.0, size.y, 0.0);
    let pxy = Vec3::new(size.x, size.y, 0.0);
    mesh.push(Triangle::new(o, py, pxy));
    mesh.push(Triangle::new(o, pxy, px));
}
