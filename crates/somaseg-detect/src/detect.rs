use somaseg_snakes::{circle_levelset, MorphAcwe};
use somaseg_volume::{Volume, Volume3};

use crate::bbox::BoundingBox;
use crate::config::{Iterations, SomaDetectConfig};
use crate::error::SomaDetectError;

/// Result of a soma detection.
#[derive(Debug, Clone, PartialEq)]
pub struct SomaDetection {
    /// Full-size mask, `soma_label` on the soma and 0 elsewhere.
    pub mask: Volume3<u8>,
    /// The region the snake evolved in.
    pub bbox: BoundingBox,
    /// Number of snake iterations performed.
    pub num_iterations: usize,
    /// Whether the convergence rule fired, `None` for a fixed number of iterations.
    pub converged: Option<bool>,
}

/// Seed radius derived from the estimated soma radius and the anisotropy of the volume.
///
/// `floor(min(max(sqrt(radius) * max(ratio_xz, ratio_yz), min_seed_radius), max_radius_factor *
/// sqrt(radius)))` where the ratios compare the first two axes to the last one.
pub fn seed_radius(shape: [usize; 3], radius: f64, config: &SomaDetectConfig) -> f64 {
    let ratio_xz = shape[0] as f64 / shape[2] as f64;
    let ratio_yz = shape[1] as f64 / shape[2] as f64;
    let sqrt_radius = radius.sqrt();

    (sqrt_radius * ratio_xz.max(ratio_yz))
        .max(config.min_seed_radius)
        .min(config.max_radius_factor * sqrt_radius)
        .floor()
}

/// Detect the soma around an estimated position with a region snake.
///
/// A box of half-width `window_scale * r` around `center` is cropped from `img`, where `r`
/// is the [`seed_radius`]. A sphere of radius `r` is seeded at the centre of the crop and
/// evolved with [`MorphAcwe`], and the final level set is written, scaled to `soma_label`, into
/// an otherwise zero mask of the size of `img`.
///
/// # Arguments
///
/// * `img` - The neuron volume.
/// * `center` - Estimated soma centre, in voxels.
/// * `radius` - Estimated soma radius, in voxels.
/// * `config` - Snake and crop parameters.
///
/// # Errors
///
/// Returns an error if the radius or the centre are invalid, if the crop is empty, or if the
/// snake degenerates (see [`SomaDetectError::is_degenerate`]).
pub fn soma_detect<T>(
    img: &Volume3<T>,
    center: [f64; 3],
    radius: f64,
    config: &SomaDetectConfig,
) -> Result<SomaDetection, SomaDetectError>
where
    T: Copy + Into<f32>,
{
    if !(radius.is_finite() && radius > 0.0) {
        return Err(SomaDetectError::InvalidRadius(radius));
    }
    let shape = img.shape;
    if (0..3).any(|k| !(center[k].is_finite() && center[k] >= 0.0 && center[k] < shape[k] as f64)) {
        return Err(SomaDetectError::CenterOutOfBounds { center, shape });
    }

    let r = seed_radius(shape, radius, config);
    let bbox = BoundingBox::from_center(center, config.window_scale * r, shape);
    if bbox.is_empty() {
        return Err(SomaDetectError::EmptyRegion {
            start: bbox.start,
            end: bbox.end,
        });
    }
    log::debug!("soma seed radius {r}, region {:?} -> {:?}", bbox.start, bbox.end);

    let crop: Volume<f32, 3> = img.crop(bbox.start, bbox.end)?.map(|&v| v.into());
    let crop_shape = crop.shape;
    let seed_center = crop_shape.map(|s| (s / 2) as f64);

    let mut acwe = MorphAcwe::new(crop, config.smoothing, config.lambda1, config.lambda2)?;
    acwe.set_levelset(&circle_levelset(crop_shape, seed_center, r))?;

    let (num_iterations, converged) = match config.iterations {
        Iterations::Fixed(n) => {
            acwe.run(n)?;
            (n, None)
        }
        Iterations::AutoConverge => {
            let result = acwe.autoconverge_with(&config.convergence)?;
            (result.num_iterations, Some(result.converged))
        }
    };

    let label = config.soma_label;
    let region = match acwe.levelset() {
        Some(u) => u.map(|&v| if v > 0 { label } else { 0 }),
        None => return Err(somaseg_snakes::SnakeError::LevelSetNotSet.into()),
    };

    let mut mask = Volume3::<u8>::zeros(shape);
    mask.paste(&region, bbox.start)?;

    log::info!(
        "soma detected after {num_iterations} iterations: {} voxels",
        region.count_nonzero()
    );

    Ok(SomaDetection {
        mask,
        bbox,
        num_iterations,
        converged,
    })
}
