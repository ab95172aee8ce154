use num_traits::Zero;
use somaseg_imgproc::{
    filter::gradient,
    morphology::{box_element, dilate, erode, MorphContext, StructuringElement},
};
use somaseg_volume::{LevelSet, Volume};

use crate::error::SnakeError;
use crate::levelset::foreground_volume;

/// Morphological Geodesic Active Contours (edge-based snake with a balloon force).
///
/// The snake is attracted to the minima of an edge-stopping field such as the output of
/// [`crate::gborders`]. A non-zero balloon strength inflates (positive) or deflates (negative)
/// the contour wherever the field is above `threshold / |balloon|`.
///
/// The masks `data > threshold` and `data > threshold / |balloon|` are derived from the data,
/// the threshold and the balloon, and are recomputed by every setter of those three values.
#[derive(Debug, Clone)]
pub struct MorphGac<const N: usize> {
    data: Volume<f32, N>,
    ddata: Vec<Volume<f32, N>>,
    levelset: Option<LevelSet<N>>,
    threshold: f32,
    balloon: f32,
    threshold_mask: LevelSet<N>,
    balloon_mask: Option<LevelSet<N>>,
    structure: StructuringElement<N>,
    context: MorphContext<N>,
    /// Number of curvature operator applications per step.
    pub smoothing: usize,
}

impl<const N: usize> MorphGac<N> {
    /// Create a new geodesic snake with its own morphology context.
    ///
    /// # Arguments
    ///
    /// * `data` - The edge-stopping field, low on the edges to attract the contour to.
    /// * `smoothing` - Number of curvature operator applications per step.
    /// * `threshold` - Data threshold gating the balloon force.
    /// * `balloon` - Balloon strength; positive inflates, negative deflates, zero disables.
    ///
    /// # Errors
    ///
    /// Returns [`SnakeError::InvalidDimensionality`] unless `N` is 2 or 3.
    pub fn new(
        data: Volume<f32, N>,
        smoothing: usize,
        threshold: f32,
        balloon: f32,
    ) -> Result<Self, SnakeError> {
        Ok(Self::with_context(
            data,
            smoothing,
            threshold,
            balloon,
            MorphContext::new()?,
        ))
    }

    /// Create a new geodesic snake that continues from an existing morphology context.
    pub fn with_context(
        data: Volume<f32, N>,
        smoothing: usize,
        threshold: f32,
        balloon: f32,
        context: MorphContext<N>,
    ) -> Self {
        let mut gac = Self {
            ddata: gradient(&data),
            threshold_mask: LevelSet::zeros(data.shape),
            data,
            levelset: None,
            threshold,
            balloon,
            balloon_mask: None,
            structure: box_element(),
            context,
            smoothing,
        };
        gac.update_masks();
        gac
    }

    /// Consume the snake and return its morphology context.
    pub fn into_context(self) -> MorphContext<N> {
        self.context
    }

    /// The morphology context, including the current curvature phase.
    pub fn context(&self) -> &MorphContext<N> {
        &self.context
    }

    /// The edge-stopping field.
    pub fn data(&self) -> &Volume<f32, N> {
        &self.data
    }

    /// Replace the edge-stopping field, recomputing its gradient and the masks.
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
        self.ddata = gradient(&data);
        self.data = data;
        self.update_masks();
        Ok(())
    }

    /// The threshold gating the balloon force.
    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Set the threshold, recomputing the masks.
    pub fn set_threshold(&mut self, threshold: f32) {
        self.threshold = threshold;
        self.update_masks();
    }

    /// The balloon strength.
    pub fn balloon(&self) -> f32 {
        self.balloon
    }

    /// Set the balloon strength, recomputing the masks.
    pub fn set_balloon(&mut self, balloon: f32) {
        self.balloon = balloon;
        self.update_masks();
    }

    /// Mask of the voxels where `data > threshold`.
    pub fn threshold_mask(&self) -> &LevelSet<N> {
        &self.threshold_mask
    }

    /// Mask of the voxels where `data > threshold / |balloon|`, `None` when the balloon is zero.
    pub fn balloon_mask(&self) -> Option<&LevelSet<N>> {
        self.balloon_mask.as_ref()
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

    fn update_masks(&mut self) {
        let threshold = self.threshold;
        self.threshold_mask = self.data.map(|&v| u8::from(v > threshold));

        self.balloon_mask = if self.balloon != 0.0 {
            let gate = threshold / self.balloon.abs();
            Some(self.data.map(|&v| u8::from(v > gate)))
        } else {
            None
        };
    }

    /// Perform a single step of the morphological geodesic evolution.
    ///
    /// # Errors
    ///
    /// Returns [`SnakeError::LevelSetNotSet`] if no level set is bound.
    pub fn step(&mut self) -> Result<(), SnakeError> {
        let u = self.levelset.as_ref().ok_or(SnakeError::LevelSetNotSet)?;
        let mut res = u.clone();

        // balloon force
        if let Some(mask) = self.balloon_mask.as_ref() {
            let candidate = if self.balloon > 0.0 {
                dilate(u, &self.structure)
            } else {
                erode(u, &self.structure)
            };
            res.as_slice_mut()
                .iter_mut()
                .zip(candidate.iter())
                .zip(mask.iter())
                .for_each(|((r, &c), &m)| {
                    if m != 0 {
                        *r = c;
                    }
                });
        }

        // image attachment
        let mut aux = Volume::<f32, N>::zeros(res.shape);
        for (dd, dr) in self.ddata.iter().zip(gradient(&res).iter()) {
            aux.as_slice_mut()
                .iter_mut()
                .zip(dd.iter().zip(dr.iter()))
                .for_each(|(a, (x, y))| *a += x * y);
        }
        res.as_slice_mut()
            .iter_mut()
            .zip(aux.iter())
            .for_each(|(r, &a)| {
                if a > 0.0 {
                    *r = 1;
                } else if a < 0.0 {
                    *r = 0;
                }
            });

        let res = self.context.smooth(res, self.smoothing);
        self.levelset = Some(res);
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
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(shape: [usize; 2], lo: usize, hi: usize) -> LevelSet<2> {
        LevelSet::from_shape_fn(shape, |[r, c]| u8::from(r >= lo && r < hi && c >= lo && c < hi))
    }

    #[test]
    fn test_step_requires_levelset() -> Result<(), SnakeError> {
        let mut gac = MorphGac::new(Volume::<f32, 2>::from_shape_val([6, 6], 1.0), 1, 0.5, 1.0)?;
        assert_eq!(gac.step(), Err(SnakeError::LevelSetNotSet));
        assert_eq!(gac.run(2), Err(SnakeError::LevelSetNotSet));
        Ok(())
    }

    #[test]
    fn test_masks_follow_setters() -> Result<(), SnakeError> {
        let data = Volume::<f32, 2>::from_shape_vec([1, 4], vec![0.1, 0.3, 0.6, 0.9])?;
        let mut gac = MorphGac::new(data, 1, 0.5, 0.0)?;
        assert_eq!(gac.threshold_mask().as_slice(), &[0, 0, 1, 1]);
        assert!(gac.balloon_mask().is_none());

        gac.set_balloon(-2.0);
        // gate = 0.5 / 2
        assert_eq!(gac.balloon_mask().map(|m| m.as_slice()), Some(&[0u8, 1, 1, 1][..]));

        gac.set_threshold(1.6);
        assert_eq!(gac.threshold_mask().as_slice(), &[0, 0, 0, 0]);
        assert_eq!(gac.balloon_mask().map(|m| m.as_slice()), Some(&[0u8, 0, 0, 1][..]));

        gac.set_data(Volume::from_shape_vec([1, 4], vec![2.0, 0.0, 0.0, 0.0])?)?;
        assert_eq!(gac.threshold_mask().as_slice(), &[1, 0, 0, 0]);
        assert_eq!(gac.balloon_mask().map(|m| m.as_slice()), Some(&[1u8, 0, 0, 0][..]));

        gac.set_balloon(0.0);
        assert!(gac.balloon_mask().is_none());
        Ok(())
    }

    #[test]
    fn test_balloon_on_flat_field() -> Result<(), SnakeError> {
        // flat field: no attachment force, the balloon acts alone
        let data = Volume::<f32, 2>::from_shape_val([11, 11], 1.0);
        let mut gac = MorphGac::new(data, 0, 0.5, 1.0)?;

        gac.set_levelset(&square([11, 11], 3, 8))?;
        gac.step()?;
        assert_eq!(gac.levelset().map(|u| u.count_nonzero()), Some(49));

        gac.set_balloon(-1.0);
        gac.set_levelset(&square([11, 11], 3, 8))?;
        gac.step()?;
        assert_eq!(gac.levelset().map(|u| u.count_nonzero()), Some(9));
        Ok(())
    }

    #[test]
    fn test_balloon_gated_by_threshold() -> Result<(), SnakeError> {
        // the field is below the gate everywhere: the contour does not move
        let data = Volume::<f32, 2>::from_shape_val([11, 11], 0.2);
        let mut gac = MorphGac::new(data, 0, 0.5, 1.0)?;
        let u = square([11, 11], 3, 8);
        gac.set_levelset(&u)?;
        gac.run(3)?;
        assert_eq!(gac.levelset(), Some(&u));
        Ok(())
    }

    #[test]
    fn test_set_levelset_shape_mismatch() -> Result<(), SnakeError> {
        let mut gac = MorphGac::new(Volume::<f32, 3>::zeros([4, 4, 4]), 1, 0.5, 1.0)?;
        assert_eq!(
            gac.set_levelset(&LevelSet::<3>::zeros([4, 4, 5])),
            Err(SnakeError::ShapeMismatch(vec![4, 4, 5], vec![4, 4, 4]))
        );
        Ok(())
    }
}
