use somaseg_imgproc::{filter::FilterError, morphology::MorphologyError};
use somaseg_volume::VolumeError;
use thiserror::Error;

/// An error type for the snake evolvers.
#[derive(Error, Debug, PartialEq)]
pub enum SnakeError {
    /// `step` was called before a level set was bound.
    #[error("the level set is not set (use set_levelset)")]
    LevelSetNotSet,

    /// Snakes only evolve on 2D and 3D volumes.
    #[error("Invalid number of dimensions {0} (should be 2 or 3)")]
    InvalidDimensionality(usize),

    /// The region means are undefined because one side of the contour is empty.
    #[error("Degenerate partition: {inside} voxels inside and {outside} outside the contour")]
    DegeneratePartition {
        /// Number of voxels inside the contour.
        inside: usize,
        /// Number of voxels outside the contour.
        outside: usize,
    },

    /// The level set and the data do not have the same shape.
    #[error("Shape mismatch: level set {0:?} != data {1:?}")]
    ShapeMismatch(Vec<usize>, Vec<usize>),

    /// Error from the morphology operators.
    #[error(transparent)]
    MorphologyError(MorphologyError),

    /// Error from the filters.
    #[error(transparent)]
    FilterError(#[from] FilterError),

    /// Error with the underlying volume.
    #[error(transparent)]
    VolumeError(#[from] VolumeError),
}

impl From<MorphologyError> for SnakeError {
    fn from(e: MorphologyError) -> Self {
        match e {
            MorphologyError::InvalidDimensionality(rank) => SnakeError::InvalidDimensionality(rank),
            other => SnakeError::MorphologyError(other),
        }
    }
}

impl SnakeError {
    pub(crate) fn shape_mismatch<const N: usize>(levelset: [usize; N], data: [usize; N]) -> Self {
        SnakeError::ShapeMismatch(levelset.to_vec(), data.to_vec())
    }
}
