#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]
//!
//! # Overview
//!
//! [`soma_detect`] crops a box around an estimated soma position, evolves a region snake
//! ([`somaseg_snakes::MorphAcwe`]) from a spherical seed, and writes the result into a mask
//! of the size of the input volume.

/// Bounding boxes of the soma region.
pub mod bbox;

/// Detection parameters.
pub mod config;

/// The soma detection.
pub mod detect;

/// Error types for the soma detection.
pub mod error;

pub use crate::bbox::BoundingBox;
pub use crate::config::{Iterations, SomaDetectConfig};
pub use crate::detect::{seed_radius, soma_detect, SomaDetection};
pub use crate::error::SomaDetectError;
