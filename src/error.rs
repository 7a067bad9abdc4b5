//! Error types for the conversion pipeline.

use std::io;

use thiserror::Error;

/// All errors the pipeline can surface to its caller.
#[derive(Debug, Error)]
pub enum MapError {
    /// Malformed tile format string, expected "NxM" with both counts >= 1.
    #[error("invalid tile format {0:?}, expected \"NxM\" e.g. \"1x1\" or \"2x3\"")]
    InvalidTileFormat(String),

    /// Grid with zero area reached the pipeline; no geometry can be produced.
    #[error("elevation grid has zero area, cannot produce geometry")]
    DegenerateGrid,

    /// Requested an output encoding other than binary or ascii.
    #[error("unsupported encoding {0:?}, expected \"binary\" or \"ascii\"")]
    UnsupportedEncoding(String),

    /// Input raster could not be decoded into an elevation grid.
    #[error("raster error: {0}")]
    Raster(String),

    /// Output file could not be written (or an STL could not be read back).
    #[error("io error: {0}")]
    Io(#[from] io::Error),

    /// STL file contents did not match the expected layout.
    #[error("malformed stl: {0}")]
    MalformedStl(String),
}

pub type Result<T> = std::result::Result<T, MapError>;
