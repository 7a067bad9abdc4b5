//! Heightmap to 3D-printable STL conversion.
//!
//! Re-exports the pipeline stages for use by the binary and by callers
//! that bring their own elevation grids.

pub mod conf;
pub mod error;
pub mod grid;
pub mod mesh;
pub mod pipeline;
pub mod raster;
pub mod resolution;
pub mod stl;
pub mod tiling;
pub mod triangulate;
