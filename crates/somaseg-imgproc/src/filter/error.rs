use somaseg_volume::VolumeError;

/// An error type for filtering operations.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum FilterError {
    /// The standard deviation of a Gaussian must be strictly positive and finite.
    #[error("Invalid sigma {0}: must be positive and finite")]
    InvalidSigma(f32),

    /// The axis to filter along does not exist.
    #[error("Axis {0} out of bounds for a volume with {1} dimensions")]
    AxisOutOfBounds(usize, usize),

    /// Error with the underlying volume.
    #[error(transparent)]
    VolumeError(#[from] VolumeError),
}
