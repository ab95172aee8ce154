#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// border handling for out-of-bounds reads.
pub mod border;

/// separable filtering and discrete gradients.
pub mod filter;

/// binary morphology and the curvature operator.
pub mod morphology;
