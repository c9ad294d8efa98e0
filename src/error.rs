//! Error types for building acceleration structures.

use thiserror::Error;

/// Errors reported when validating the inputs of a build.
///
/// Queries never fail: a malformed or empty structure simply reports a miss.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A voxel grid needs at least one cell per axis.
    #[error("voxel grid size must be non-zero")]
    ZeroGridSize,

    /// `size³` does not fit in `usize`.
    #[error("voxel grid size {0} is too large")]
    GridTooLarge(usize),

    /// The sparse tree subdivides by four down to a `4×4×4` base block.
    #[error("grid size {0} is not a power of four (4, 16, 64, ...)")]
    GridSizeNotPowerOfFour(usize),

    /// The cell buffer does not hold `size³` entries.
    #[error("voxel buffer holds {actual} cells, expected {expected}")]
    VoxelCountMismatch {
        /// `size³` of the grid.
        expected: usize,
        /// Length of the buffer that was passed in.
        actual: usize,
    },

    /// World bounds must be finite with `min < max` on every axis.
    #[error("world bounds are not finite or enclose no volume")]
    InvalidBounds,

    /// Node or leaf offsets no longer fit the 32-bit child pointers.
    #[error("sparse tree exceeds {0} entries")]
    TreeTooLarge(usize),
}

/// Result type for build operations.
pub type Result<T> = std::result::Result<T, Error>;
