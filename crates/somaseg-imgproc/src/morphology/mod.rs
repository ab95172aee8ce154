/// Error types used for morphological operations.
pub mod error;
pub use error::MorphologyError;

/// Structuring elements and the fixed 2D/3D families.
pub mod elements;
pub use elements::{box_element, structuring_elements, Dimensionality, StructuringElement};

/// Binary erosion and dilation.
pub mod ops;
pub use ops::{dilate, erode};

/// SI/IS operators and the alternating curvature operator.
pub mod context;
pub use context::{is, si, CurvaturePhase, MorphContext};
