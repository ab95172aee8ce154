use somaseg_imgproc::{
    border::BorderMode,
    filter::{gaussian_filter, gaussian_gradient_magnitude},
};
use somaseg_volume::Volume;

use crate::error::SnakeError;

/// Edge-stopping function `1 / sqrt(1 + alpha * |grad(G_sigma * img)|)`.
///
/// The result is close to 1 in flat regions and close to 0 on strong edges, which is the field
/// [`crate::MorphGac`] is attracted to. Samples outside the image are read as zero.
///
/// # Arguments
///
/// * `img` - The image or volume.
/// * `alpha` - Strength of the edges.
/// * `sigma` - Standard deviation of the Gaussian smoothing.
///
/// # Errors
///
/// Returns [`SnakeError::FilterError`] if `sigma` is not positive and finite.
pub fn gborders<const N: usize>(
    img: &Volume<f32, N>,
    alpha: f32,
    sigma: f32,
) -> Result<Volume<f32, N>, SnakeError> {
    let gradnorm = gaussian_gradient_magnitude(img, sigma, BorderMode::Constant)?;
    Ok(gradnorm.map(|&g| 1.0 / (1.0 + alpha * g).sqrt()))
}

/// Line-stopping function: the image smoothed with a Gaussian of standard deviation `sigma`.
///
/// Used to attract [`crate::MorphGac`] to bright or dark thin structures.
pub fn glines<const N: usize>(img: &Volume<f32, N>, sigma: f32) -> Result<Volume<f32, N>, SnakeError> {
    Ok(gaussian_filter(img, sigma, BorderMode::Reflect)?)
}
