#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]
//!
//! # Overview
//!
//! `somaseg-volume` provides [`Volume`], a dense row-major array with a compile-time number of
//! dimensions. It holds the grayscale data a snake evolves on, derived fields such as gradients,
//! and the binary [`LevelSet`] the snake itself is made of.
//!
//! ```rust
//! use somaseg_volume::{LevelSet, Volume3};
//!
//! let data = Volume3::<f32>::from_shape_val([8, 8, 8], 100.0);
//! let mut u = LevelSet::<3>::zeros(data.shape);
//! *u.get_mut([4, 4, 4]).unwrap() = 1;
//! assert_eq!(u.count_nonzero(), 1);
//! ```

/// Error types for the volume module.
pub mod error;

/// Volume representation and region operations.
pub mod volume;

pub use crate::error::VolumeError;
pub use crate::volume::{get_strides_from_shape, LevelSet, Volume, Volume2, Volume3};
