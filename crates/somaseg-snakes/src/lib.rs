#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]
//!
//! # Overview
//!
//! Morphological snakes evolve a binary level set with erosions, dilations and the alternating
//! curvature operator instead of solving a PDE. Two evolvers are provided:
//!
//! - [`MorphAcwe`], the region-based Chan-Vese snake, with an automatic convergence rule.
//! - [`MorphGac`], the edge-based geodesic snake, with an optional balloon force. Its input is
//!   an edge-stopping field such as [`gborders`] or [`glines`].

/// Region-based snake (Morphological Active Contours without Edges).
pub mod acwe;

/// Automatic convergence criteria and bookkeeping.
pub mod convergence;

/// Error types for the snakes.
pub mod error;

/// Edge-based snake (Morphological Geodesic Active Contours).
pub mod gac;

/// Initial level sets.
pub mod levelset;

/// Edge- and line-stopping functions.
pub mod stopping;

pub use crate::acwe::MorphAcwe;
pub use crate::convergence::{AutoConvergeCriteria, AutoConvergeResult, ConvergenceTrace};
pub use crate::error::SnakeError;
pub use crate::gac::MorphGac;
pub use crate::levelset::{circle_levelset, foreground_volume};
pub use crate::stopping::{gborders, glines};
