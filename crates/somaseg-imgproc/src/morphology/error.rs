use somaseg_volume::VolumeError;

/// Errors related to morphological operations.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum MorphologyError {
    /// Structuring-element families exist only for 2D and 3D volumes.
    #[error("Invalid number of dimensions {0} (should be 2 or 3)")]
    InvalidDimensionality(usize),

    /// Error with the underlying volume.
    #[error(transparent)]
    VolumeError(#[from] VolumeError),
}
