use somaseg_snakes::SnakeError;
use somaseg_volume::VolumeError;

/// An error type for soma detection.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum SomaDetectError {
    /// The estimated radius must be positive and finite.
    #[error("Invalid soma radius {0}: must be positive and finite")]
    InvalidRadius(f64),

    /// The estimated centre lies outside the volume.
    #[error("Soma center {center:?} is outside the volume of shape {shape:?}")]
    CenterOutOfBounds {
        /// The estimated centre.
        center: [f64; 3],
        /// The shape of the volume.
        shape: [usize; 3],
    },

    /// The clamped bounding box has no extent along some axis.
    #[error("Empty soma region from {start:?} to {end:?}")]
    EmptyRegion {
        /// First voxel of the region.
        start: [usize; 3],
        /// One past the last voxel of the region.
        end: [usize; 3],
    },

    /// Error from the snake evolution.
    #[error(transparent)]
    SnakeError(#[from] SnakeError),

    /// Error with the underlying volume.
    #[error(transparent)]
    VolumeError(#[from] VolumeError),
}

impl SomaDetectError {
    /// Whether the evolution stopped because the contour became empty or filled the region.
    ///
    /// Callers can use it to skip a soma candidate instead of aborting.
    pub fn is_degenerate(&self) -> bool {
        matches!(
            self,
            SomaDetectError::SnakeError(SnakeError::DegeneratePartition { .. })
        )
    }
}
