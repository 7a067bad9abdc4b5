//! Tuning constants for the conversion pipeline.

/// Target edge length (in samples) the resolution reducer aims for.
/// Grids larger than this get binned down so the triangle count stays
/// manageable and typical output files stay well below ~300 MB.
pub const MAXIMUM_RESOLUTION: usize = 1000;

/// Cell count above which a max-resolution conversion gets a cost warning.
pub const PERFORMANCE_WARNING_THRESHOLD: usize = 3000 * 3000;
