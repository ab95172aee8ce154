use serde::{Deserialize, Serialize};

/// Structure to define the automatic convergence parameters.
///
/// The evolution stops once the foreground count stabilises: the sum of the last `window`
/// forward differences of the count is small in absolute terms or relative to the count.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutoConvergeCriteria {
    /// Maximum number of iterations to perform.
    pub max_iterations: usize,
    /// Number of forward differences summed into the sliding window.
    pub window: usize,
    /// The window is only checked once the 0-based iteration index exceeds this value minus one.
    pub min_elapsed: usize,
    /// Stop when the window magnitude is below this number of voxels.
    pub absolute_tolerance: f64,
    /// Stop when the window magnitude is below this fraction of the foreground count.
    pub relative_tolerance: f64,
}

impl Default for AutoConvergeCriteria {
    fn default() -> Self {
        Self {
            max_iterations: 200,
            window: 6,
            min_elapsed: 7,
            absolute_tolerance: 20.0,
            relative_tolerance: 0.1,
        }
    }
}

/// Result of an automatic convergence run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AutoConvergeResult {
    /// The total number of iterations performed.
    pub num_iterations: usize,
    /// Whether the stopping rule fired before the iteration cap.
    pub converged: bool,
    /// Foreground count of the final level set.
    pub foreground: f64,
}

/// Foreground counts recorded after every iteration, with their forward differences.
#[derive(Debug, Clone, Default)]
pub struct ConvergenceTrace {
    counts: Vec<f64>,
    diffs: Vec<f64>,
}

impl ConvergenceTrace {
    /// Create an empty trace with room for `capacity` iterations.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            counts: Vec::with_capacity(capacity),
            diffs: Vec::with_capacity(capacity),
        }
    }

    /// Record the foreground count of the latest iteration.
    pub fn push(&mut self, count: f64) {
        if let Some(&last) = self.counts.last() {
            self.diffs.push(count - last);
        }
        self.counts.push(count);
    }

    /// Recorded foreground counts, one per iteration.
    pub fn counts(&self) -> &[f64] {
        &self.counts
    }

    /// Forward differences of the counts.
    pub fn diffs(&self) -> &[f64] {
        &self.diffs
    }

    /// Number of recorded iterations.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Whether no iteration has been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum of the most recent `window` forward differences.
    pub fn window_sum(&self, window: usize) -> f64 {
        let start = self.diffs.len().saturating_sub(window);
        self.diffs[start..].iter().sum()
    }

    /// Whether the stopping rule of `criteria` holds after the latest iteration.
    pub fn has_converged(&self, criteria: &AutoConvergeCriteria) -> bool {
        // 0-based index of the latest iteration must exceed `min_elapsed - 1`
        if self.counts.len() <= criteria.min_elapsed {
            return false;
        }
        let Some(&count) = self.counts.last() else {
            return false;
        };

        let window = self.window_sum(criteria.window).abs();
        window < criteria.absolute_tolerance || window < criteria.relative_tolerance * count
    }
}
