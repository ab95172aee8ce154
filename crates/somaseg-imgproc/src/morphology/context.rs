use somaseg_volume::LevelSet;

use super::ops::{dilate_into, erode_into};
use super::{structuring_elements, MorphologyError, StructuringElement};

/// Which composite the curvature operator applies on its next call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CurvaturePhase {
    /// `SI(IS(u))`: dilation family first, then erosion family.
    #[default]
    SiOIs,
    /// `IS(SI(u))`: erosion family first, then dilation family.
    IsOSi,
}

impl CurvaturePhase {
    /// The phase that follows this one.
    pub fn next(self) -> Self {
        match self {
            CurvaturePhase::SiOIs => CurvaturePhase::IsOSi,
            CurvaturePhase::IsOSi => CurvaturePhase::SiOIs,
        }
    }
}

/// State shared by the SI/IS operators and the curvature operator.
///
/// Holds the structuring-element family of the dimensionality `N`, a scratch buffer keyed by
/// the shape of the last input, and the alternation phase of the curvature operator. Each
/// evolver owns one context, so independent evolvers never interfere with each other.
///
/// # Example
///
/// ```rust
/// use somaseg_imgproc::morphology::{CurvaturePhase, MorphContext};
/// use somaseg_volume::LevelSet;
///
/// let mut ctx = MorphContext::<2>::new().unwrap();
/// let u = LevelSet::<2>::from_shape_fn([9, 9], |[r, c]| u8::from(r > 2 && r < 6 && c > 2 && c < 6));
///
/// assert_eq!(ctx.phase(), CurvaturePhase::SiOIs);
/// let smoothed = ctx.curvature(&u);
/// assert_eq!(ctx.phase(), CurvaturePhase::IsOSi);
/// assert_eq!(smoothed.shape, u.shape);
/// ```
#[derive(Debug, Clone)]
pub struct MorphContext<const N: usize> {
    elements: Vec<StructuringElement<N>>,
    scratch: Vec<u8>,
    scratch_shape: Option<[usize; N]>,
    phase: CurvaturePhase,
}

impl<const N: usize> MorphContext<N> {
    /// Create a context for `N`-dimensional level sets.
    ///
    /// # Errors
    ///
    /// Returns [`MorphologyError::InvalidDimensionality`] unless `N` is 2 or 3.
    pub fn new() -> Result<Self, MorphologyError> {
        Ok(Self {
            elements: structuring_elements::<N>()?,
            scratch: Vec::new(),
            scratch_shape: None,
            phase: CurvaturePhase::default(),
        })
    }

    /// The structuring-element family used by SI and IS.
    pub fn elements(&self) -> &[StructuringElement<N>] {
        &self.elements
    }

    /// The composite the next [`MorphContext::curvature`] call will apply.
    pub fn phase(&self) -> CurvaturePhase {
        self.phase
    }

    /// SI operator: the maximum over the family of erosions of `u`.
    pub fn si(&mut self, u: &LevelSet<N>) -> LevelSet<N> {
        self.prepare_scratch(u.shape);

        let mut out = LevelSet::zeros(u.shape);
        for element in self.elements.iter() {
            erode_into(u, &mut self.scratch, element);
            out.as_slice_mut()
                .iter_mut()
                .zip(self.scratch.iter())
                .for_each(|(o, &s)| *o |= s);
        }
        out
    }

    /// IS operator: the minimum over the family of dilations of `u`.
    pub fn is(&mut self, u: &LevelSet<N>) -> LevelSet<N> {
        self.prepare_scratch(u.shape);

        let mut out = LevelSet::from_shape_val(u.shape, 1u8);
        for element in self.elements.iter() {
            dilate_into(u, &mut self.scratch, element);
            out.as_slice_mut()
                .iter_mut()
                .zip(self.scratch.iter())
                .for_each(|(o, &s)| *o &= s);
        }
        out
    }

    /// `SI(IS(u))`.
    pub fn si_o_is(&mut self, u: &LevelSet<N>) -> LevelSet<N> {
        let v = self.is(u);
        self.si(&v)
    }

    /// `IS(SI(u))`.
    pub fn is_o_si(&mut self, u: &LevelSet<N>) -> LevelSet<N> {
        let v = self.si(u);
        self.is(&v)
    }

    /// Curvature operator: applies `SI(IS(u))` and `IS(SI(u))` on alternate calls.
    pub fn curvature(&mut self, u: &LevelSet<N>) -> LevelSet<N> {
        let out = match self.phase {
            CurvaturePhase::SiOIs => self.si_o_is(u),
            CurvaturePhase::IsOSi => self.is_o_si(u),
        };
        self.phase = self.phase.next();
        out
    }

    /// Apply the curvature operator `times` times in a row.
    pub fn smooth(&mut self, u: LevelSet<N>, times: usize) -> LevelSet<N> {
        (0..times).fold(u, |acc, _| self.curvature(&acc))
    }

    fn prepare_scratch(&mut self, shape: [usize; N]) {
        if self.scratch_shape != Some(shape) {
            log::trace!("reallocating morphology scratch buffer for shape {:?}", shape);
            self.scratch = vec![0u8; shape.iter().product()];
            self.scratch_shape = Some(shape);
        }
    }
}

/// SI operator on a fresh context.
///
/// # Errors
///
/// Returns [`MorphologyError::InvalidDimensionality`] unless `N` is 2 or 3.
pub fn si<const N: usize>(u: &LevelSet<N>) -> Result<LevelSet<N>, MorphologyError> {
    Ok(MorphContext::new()?.si(u))
}

/// IS operator on a fresh context.
///
/// # Errors
///
/// Returns [`MorphologyError::InvalidDimensionality`] unless `N` is 2 or 3.
pub fn is<const N: usize>(u: &LevelSet<N>) -> Result<LevelSet<N>, MorphologyError> {
    Ok(MorphContext::new()?.is(u))
}
