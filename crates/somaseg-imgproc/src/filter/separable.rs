use somaseg_volume::Volume;

use super::kernels::{gaussian_derivative_kernel_1d, gaussian_kernel_1d, gaussian_radius};
use super::FilterError;
use crate::border::BorderMode;

/// Correlate a volume with a 1D kernel along one axis.
///
/// # Arguments
///
/// * `src` - The source volume.
/// * `weights` - The kernel, of odd length and centred at its middle tap.
/// * `axis` - The axis to filter along.
/// * `border` - How samples outside the volume are read.
///
/// # Returns
///
/// A new volume of the same shape with `out[i] = sum_t weights[t + r] * src[i + t e_axis]`.
///
/// # Errors
///
/// Returns an error if `axis >= N`.
pub fn correlate1d<const N: usize>(
    src: &Volume<f32, N>,
    weights: &[f32],
    axis: usize,
    border: BorderMode,
) -> Result<Volume<f32, N>, FilterError> {
    if axis >= N {
        return Err(FilterError::AxisOutOfBounds(axis, N));
    }

    let radius = (weights.len() / 2) as isize;
    let len = src.shape[axis];
    let stride = src.strides[axis];
    let data = src.as_slice();

    let mut dst = Volume::<f32, N>::zeros(src.shape);
    for (i, out) in dst.as_slice_mut().iter_mut().enumerate() {
        let pos = src.get_index_unchecked(i)[axis];
        // offset of the first sample of this line along `axis`
        let base = i - pos * stride;
        *out = weights
            .iter()
            .enumerate()
            .filter_map(|(t, w)| {
                border
                    .resolve(pos as isize + t as isize - radius, len)
                    .map(|j| w * data[base + j * stride])
            })
            .sum();
    }

    Ok(dst)
}

/// Smooth a volume with an isotropic gaussian truncated at `4 sigma`.
///
/// # Errors
///
/// Returns [`FilterError::InvalidSigma`] if `sigma` is not positive and finite.
pub fn gaussian_filter<const N: usize>(
    src: &Volume<f32, N>,
    sigma: f32,
    border: BorderMode,
) -> Result<Volume<f32, N>, FilterError> {
    check_sigma(sigma)?;
    let kernel = gaussian_kernel_1d(sigma, gaussian_radius(sigma));

    let mut dst = src.clone();
    for axis in 0..N {
        dst = correlate1d(&dst, &kernel, axis, border)?;
    }
    Ok(dst)
}

/// Gradient magnitude of a volume computed with gaussian derivatives.
///
/// Along each axis the volume is differentiated with a first-order gaussian derivative and
/// smoothed with a gaussian along the remaining axes; the result is the euclidean norm of
/// those partial derivatives.
///
/// # Errors
///
/// Returns [`FilterError::InvalidSigma`] if `sigma` is not positive and finite.
pub fn gaussian_gradient_magnitude<const N: usize>(
    src: &Volume<f32, N>,
    sigma: f32,
    border: BorderMode,
) -> Result<Volume<f32, N>, FilterError> {
    check_sigma(sigma)?;
    let radius = gaussian_radius(sigma);
    let smooth = gaussian_kernel_1d(sigma, radius);
    let derivative = gaussian_derivative_kernel_1d(sigma, radius);

    let mut sum_sq = Volume::<f32, N>::zeros(src.shape);
    for d in 0..N {
        let mut partial = src.clone();
        for axis in 0..N {
            let weights = if axis == d { &derivative } else { &smooth };
            partial = correlate1d(&partial, weights, axis, border)?;
        }
        sum_sq
            .as_slice_mut()
            .iter_mut()
            .zip(partial.iter())
            .for_each(|(s, p)| *s += p * p);
    }

    Ok(sum_sq.map(|s| s.sqrt()))
}

fn check_sigma(sigma: f32) -> Result<(), FilterError> {
    if !(sigma.is_finite() && sigma > 0.0) {
        return Err(FilterError::InvalidSigma(sigma));
    }
    Ok(())
}
