use num_traits::Zero;
use somaseg_imgproc::{filter::abs_gradient_sum, morphology::MorphContext};
use somaseg_volume::{LevelSet, Volume};

use crate::convergence::{AutoConvergeCriteria, AutoConvergeResult, ConvergenceTrace};
use crate::error::SnakeError;
use crate::levelset::foreground_volume;

/// Morphological Active Contours without Edges (region-based Chan-Vese snake).
///
/// The contour separates the volume into an inside region with mean intensity `c1` and an
/// outside region with mean `c0`, and each step moves the boundary voxels to the region whose
/// mean they are closest to before smoothing the contour with the curvature operator.
///
/// # Example
///
/// ```rust
/// use somaseg_snakes::{circle_levelset, MorphAcwe};
/// use somaseg_volume::Volume;
///
/// let data = Volume::<f32, 2>::from_shape_fn([32, 32], |[r, c]| {
///     let d = ((r as f32 - 16.0).powi(2) + (c as f32 - 16.0).powi(2)).sqrt();
///     if d < 8.0 { 200.0 } else { 20.0 }
/// });
///
/// let mut acwe = MorphAcwe::new(data, 1, 1.0, 1.0).unwrap();
/// acwe.set_levelset(&circle_levelset([32, 32], [16.0, 16.0], 3.0)).unwrap();
/// acwe.run(20).unwrap();
///
/// let u = acwe.levelset().unwrap();
/// assert_eq!(u.get([16, 16]), Some(&1));
/// assert_eq!(u.get([1, 1]), Some(&0));
/// ```
#[derive(Debug, Clone)]
pub struct MorphAcwe<const N: usize> {
    data: Volume<f32, N>,
    levelset: Option<LevelSet<N>>,
    context: MorphContext<N>,
    /// Number of curvature operator applications per step.
    pub smoothing: usize,
    /// Weight of the inside region term.
    pub lambda1: f32,
    /// Weight of the outside region term.
    pub lambda2: f32,
}

impl<const N: usize> MorphAcwe<N> {
    /// Create a new region snake on `data` with its own morphology context.
    ///
    /// # Arguments
    ///
    /// * `data` - The volume to segment.
    /// * `smoothing` - Number of curvature operator applications per step.
    /// * `lambda1` - Weight of the inside region term.
    /// * `lambda2` - Weight of the outside region term.
    ///
    /// # Errors
    ///
    /// Returns [`SnakeError::InvalidDimensionality`] unless `N` is 2 or 3.
    pub fn new(
        data: Volume<f32, N>,
        smoothing: usize,
        lambda1: f32,
        lambda2: f32,
    ) -> Result<Self, SnakeError> {
        Ok(Self::with_context(
            data,
            smoothing,
            lambda1,
            lambda2,
            MorphContext::new()?,
        ))
    }

    /// Create a new region snake that continues from an existing morphology context.
    pub fn with_context(
        data: Volume<f32, N>,
        smoothing: usize,
        lambda1: f32,
        lambda2: f32,
        context: MorphContext<N>,
    ) -> Self {
        Self {
            data,
            levelset: None,
            context,
            smoothing,
            lambda1,
            lambda2,
        }
    }

    /// Consume the snake and return its morphology context.
    pub fn into_context(self) -> MorphContext<N> {
        self.context
    }

    /// The morphology context, including the current curvature phase.
    pub fn context(&self) -> &MorphContext<N> {
        &self.context
    }

    /// The volume being segmented.
    pub fn data(&self) -> &Volume<f32, N> {
        &self.data
    }

    /// Replace the volume being segmented.
    ///
    /// # Errors
    ///
    /// Returns [`SnakeError::ShapeMismatch`] if a level set is bound and its shape differs.
    pub fn set_data(&mut self, data: Volume<f32, N>) -> Result<(), SnakeError> {
        if let Some(u) = self.levelset.as_ref() {
            if u.shape != data.shape {
                return Err(SnakeError::shape_mismatch(u.shape, data.shape));
            }
        }
        self.data = data;
        Ok(())
    }

    /// Bind the initial level set, binarised so that positive values are inside.
    ///
    /// # Errors
    ///
    /// Returns [`SnakeError::ShapeMismatch`] if `u` and the data differ in shape.
    pub fn set_levelset<T>(&mut self, u: &Volume<T, N>) -> Result<(), SnakeError>
    where
        T: PartialOrd + Zero,
    {
        if u.shape != self.data.shape {
            return Err(SnakeError::shape_mismatch(u.shape, self.data.shape));
        }
        self.levelset = Some(LevelSet::binarize(u));
        Ok(())
    }

    /// The current level set, if one has been bound.
    pub fn levelset(&self) -> Option<&LevelSet<N>> {
        self.levelset.as_ref()
    }

    /// Perform a single step of the morphological Chan-Vese evolution.
    ///
    /// # Errors
    ///
    /// Returns [`SnakeError::LevelSetNotSet`] if no level set is bound and
    /// [`SnakeError::DegeneratePartition`] if the contour is empty or covers the whole volume.
    pub fn step(&mut self) -> Result<(), SnakeError> {
        let u = self.levelset.as_ref().ok_or(SnakeError::LevelSetNotSet)?;
        let (c0, c1) = region_means(&self.data, u)?;
        log::debug!("region means: c0 = {c0:.3}, c1 = {c1:.3}");

        let du = abs_gradient_sum(u);
        let mut next = u.clone();
        for ((v, &d), &g) in next
            .as_slice_mut()
            .iter_mut()
            .zip(self.data.iter())
            .zip(du.iter())
        {
            let aux = g * (self.lambda1 * (d - c1).powi(2) - self.lambda2 * (d - c0).powi(2));
            if aux < 0.0 {
                *v = 1;
            } else if aux > 0.0 {
                *v = 0;
            }
        }

        let next = self.context.smooth(next, self.smoothing);
        self.levelset = Some(next);
        Ok(())
    }

    /// Run `iterations` steps.
    pub fn run(&mut self, iterations: usize) -> Result<(), SnakeError> {
        self.run_with_progress(iterations, |_, _, _| {})
    }

    /// Run `iterations` steps, calling `progress` with the iteration index, the level set and
    /// the data after every step.
    pub fn run_with_progress<F>(&mut self, iterations: usize, mut progress: F) -> Result<(), SnakeError>
    where
        F: FnMut(usize, &LevelSet<N>, &Volume<f32, N>),
    {
        for i in 0..iterations {
            self.step()?;
            if let Some(u) = self.levelset.as_ref() {
                log::debug!("Iteration: {i}, foreground: {}", foreground_volume(u));
                progress(i, u, &self.data);
            }
        }
        Ok(())
    }

    /// Run until the foreground count stabilises, with the default criteria.
    pub fn autoconverge(&mut self) -> Result<AutoConvergeResult, SnakeError> {
        self.autoconverge_with(&AutoConvergeCriteria::default())
    }

    /// Run until the foreground count stabilises or `criteria.max_iterations` is reached.
    ///
    /// Reaching the cap is not an error; the result reports `converged = false`.
    pub fn autoconverge_with(
        &mut self,
        criteria: &AutoConvergeCriteria,
    ) -> Result<AutoConvergeResult, SnakeError> {
        let mut trace = ConvergenceTrace::with_capacity(criteria.max_iterations);

        for i in 0..criteria.max_iterations {
            self.step()?;
            let u = self.levelset.as_ref().ok_or(SnakeError::LevelSetNotSet)?;
            let foreground = foreground_volume(u);
            trace.push(foreground);
            log::debug!("Iteration: {i}, foreground: {foreground}");

            if trace.has_converged(criteria) {
                log::info!("automatic convergence after {} iterations", i + 1);
                return Ok(AutoConvergeResult {
                    num_iterations: i + 1,
                    converged: true,
                    foreground,
                });
            }
        }

        log::warn!(
            "no convergence within {} iterations, stopping",
            criteria.max_iterations
        );
        Ok(AutoConvergeResult {
            num_iterations: criteria.max_iterations,
            converged: false,
            foreground: trace.counts().last().copied().unwrap_or(0.0),
        })
    }
}

/// Mean intensity outside (`c0`) and inside (`c1`) the contour.
fn region_means<const N: usize>(
    data: &Volume<f32, N>,
    u: &LevelSet<N>,
) -> Result<(f32, f32), SnakeError> {
    let (mut sum_in, mut sum_out) = (0.0f64, 0.0f64);
    let (mut inside, mut outside) = (0usize, 0usize);
    for (&d, &v) in data.iter().zip(u.iter()) {
        if v > 0 {
            sum_in += d as f64;
            inside += 1;
        } else {
            sum_out += d as f64;
            outside += 1;
        }
    }

    if inside == 0 || outside == 0 {
        return Err(SnakeError::DegeneratePartition { inside, outside });
    }

    Ok((
        (sum_out / outside as f64) as f32,
        (sum_in / inside as f64) as f32,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circle_levelset;
    use approx::assert_relative_eq;

    fn two_level_disk(shape: [usize; 2], radius: f32) -> Volume<f32, 2> {
        let c = [shape[0] as f32 / 2.0, shape[1] as f32 / 2.0];
        Volume::from_shape_fn(shape, |[r, col]| {
            let d = ((r as f32 - c[0]).powi(2) + (col as f32 - c[1]).powi(2)).sqrt();
            if d < radius {
                180.0
            } else {
                30.0
            }
        })
    }

    #[test]
    fn test_step_requires_levelset() -> Result<(), SnakeError> {
        let mut acwe = MorphAcwe::new(Volume::<f32, 2>::zeros([8, 8]), 1, 1.0, 1.0)?;
        assert_eq!(acwe.step(), Err(SnakeError::LevelSetNotSet));
        assert_eq!(acwe.run(3), Err(SnakeError::LevelSetNotSet));
        assert!(acwe.autoconverge().is_err());
        Ok(())
    }

    #[test]
    fn test_invalid_dimensionality() {
        let data = Volume::<f32, 1>::zeros([8]);
        assert_eq!(
            MorphAcwe::new(data, 1, 1.0, 1.0).err(),
            Some(SnakeError::InvalidDimensionality(1))
        );
    }

    #[test]
    fn test_set_levelset_shape_and_binarisation() -> Result<(), SnakeError> {
        let mut acwe = MorphAcwe::new(Volume::<f32, 2>::zeros([4, 5]), 1, 1.0, 1.0)?;

        let wrong = LevelSet::<2>::zeros([5, 4]);
        assert_eq!(
            acwe.set_levelset(&wrong),
            Err(SnakeError::ShapeMismatch(vec![5, 4], vec![4, 5]))
        );

        let phi = Volume::<f32, 2>::from_shape_fn([4, 5], |[r, c]| r as f32 - c as f32);
        acwe.set_levelset(&phi)?;
        let u = acwe.levelset().ok_or(SnakeError::LevelSetNotSet)?;
        assert!(u.iter().all(|&v| v <= 1));
        assert_eq!(u.get([2, 1]), Some(&1));
        assert_eq!(u.get([2, 2]), Some(&0));
        assert_eq!(u.get([0, 3]), Some(&0));

        assert!(acwe.set_data(Volume::zeros([3, 3])).is_err());
        Ok(())
    }

    #[test]
    fn test_region_means() -> Result<(), SnakeError> {
        let data = Volume::<f32, 2>::from_shape_vec([1, 4], vec![1.0, 3.0, 10.0, 20.0])?;
        let u = LevelSet::<2>::from_shape_vec([1, 4], vec![0, 0, 1, 1])?;
        let (c0, c1) = region_means(&data, &u)?;
        assert_relative_eq!(c0, 2.0);
        assert_relative_eq!(c1, 15.0);
        Ok(())
    }

    #[test]
    fn test_degenerate_partition() -> Result<(), SnakeError> {
        let data = two_level_disk([16, 16], 4.0);
        let mut acwe = MorphAcwe::new(data, 1, 1.0, 1.0)?;

        acwe.set_levelset(&LevelSet::<2>::zeros([16, 16]))?;
        assert_eq!(
            acwe.step(),
            Err(SnakeError::DegeneratePartition {
                inside: 0,
                outside: 256
            })
        );

        acwe.set_levelset(&LevelSet::<2>::from_shape_val([16, 16], 1u8))?;
        assert_eq!(
            acwe.step(),
            Err(SnakeError::DegeneratePartition {
                inside: 256,
                outside: 0
            })
        );
        Ok(())
    }

    #[test]
    fn test_grows_onto_disk() -> Result<(), SnakeError> {
        let data = two_level_disk([40, 40], 10.0);
        let expected = data.iter().filter(|&&v| v > 100.0).count() as f32;

        let mut acwe = MorphAcwe::new(data, 1, 1.0, 1.0)?;
        acwe.set_levelset(&circle_levelset([40, 40], [20.0, 20.0], 4.0))?;

        let mut seen = 0;
        acwe.run_with_progress(30, |i, u, data| {
            assert_eq!(i, seen);
            assert_eq!(u.shape, data.shape);
            seen += 1;
        })?;
        assert_eq!(seen, 30);

        let u = acwe.levelset().ok_or(SnakeError::LevelSetNotSet)?;
        let count = u.count_nonzero() as f32;
        assert!((count - expected).abs() / expected < 0.15);
        Ok(())
    }

    #[test]
    fn test_autoconverge_terminates() -> Result<(), SnakeError> {
        let data = two_level_disk([40, 40], 10.0);
        let mut acwe = MorphAcwe::new(data, 1, 1.0, 1.0)?;
        acwe.set_levelset(&circle_levelset([40, 40], [20.0, 20.0], 4.0))?;

        let result = acwe.autoconverge()?;
        assert!(result.num_iterations <= 200);
        assert!(result.num_iterations >= 8);
        assert!(result.converged);

        let u = acwe.levelset().ok_or(SnakeError::LevelSetNotSet)?;
        assert_relative_eq!(result.foreground, u.count_nonzero() as f64);
        Ok(())
    }

    #[test]
    fn test_shared_context_keeps_phase() -> Result<(), SnakeError> {
        let data = two_level_disk([24, 24], 6.0);
        let mut first = MorphAcwe::new(data.clone(), 1, 1.0, 1.0)?;
        first.set_levelset(&circle_levelset([24, 24], [12.0, 12.0], 3.0))?;
        first.step()?;
        let phase = first.context().phase();

        let second = MorphAcwe::with_context(data, 1, 1.0, 1.0, first.into_context());
        assert_eq!(second.context().phase(), phase);
        Ok(())
    }
}
