/// Error types for filtering operations.
pub mod error;
pub use error::FilterError;

/// 1D kernels used by the separable filters.
pub mod kernels;

/// Separable Gaussian filtering over every axis of a volume.
pub mod separable;
pub use separable::{correlate1d, gaussian_filter, gaussian_gradient_magnitude};

/// Discrete gradients with central differences.
pub mod gradient;
pub use gradient::{abs_gradient_sum, gradient};
