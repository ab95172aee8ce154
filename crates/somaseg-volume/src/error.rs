use thiserror::Error;

/// An error type for volume creation and manipulation.
#[derive(Error, Debug, PartialEq)]
pub enum VolumeError {
    /// The number of elements in the data does not match the requested shape.
    #[error("Shape mismatch: expected {expected} elements for shape, but got {actual} elements in data")]
    InvalidShape {
        /// Expected number of elements based on shape
        expected: usize,
        /// Actual number of elements in the data
        actual: usize,
    },

    /// Two volumes that must share a shape do not.
    #[error("Shape mismatch: {0:?} != {1:?}")]
    ShapeMismatch(Vec<usize>, Vec<usize>),

    /// A region does not fit inside the volume.
    #[error("Region [{start:?}, {end:?}) is out of bounds for a volume of shape {shape:?}")]
    RegionOutOfBounds {
        /// First index of the region (inclusive).
        start: Vec<usize>,
        /// Last index of the region (exclusive).
        end: Vec<usize>,
        /// Shape of the volume.
        shape: Vec<usize>,
    },

    /// An index exceeds the bounds of the volume.
    #[error("Index {index} out of bounds for dimension of size {size}")]
    IndexOutOfBounds {
        /// The offending index
        index: usize,
        /// The size of the dimension
        size: usize,
    },
}

impl VolumeError {
    /// Create an [`VolumeError::InvalidShape`] error.
    pub fn invalid_shape(expected: usize, actual: usize) -> Self {
        Self::InvalidShape { expected, actual }
    }

    /// Create a [`VolumeError::ShapeMismatch`] error from two shapes.
    pub fn shape_mismatch<const N: usize>(lhs: [usize; N], rhs: [usize; N]) -> Self {
        Self::ShapeMismatch(lhs.to_vec(), rhs.to_vec())
    }
}
