/// Radius of a Gaussian kernel truncated at `4 sigma`.
pub fn gaussian_radius(sigma: f32) -> usize {
    (4.0 * sigma + 0.5) as usize
}

/// Create a normalised gaussian kernel of `2 * radius + 1` taps.
///
/// # Arguments
///
/// * `sigma` - The standard deviation of the gaussian.
/// * `radius` - The half width of the kernel.
///
/// # Returns
///
/// A vector of the kernel, summing to one.
pub fn gaussian_kernel_1d(sigma: f32, radius: usize) -> Vec<f32> {
    let sigma_sq = sigma * sigma;

    // compute the kernel
    let mut kernel = (0..=2 * radius)
        .map(|i| {
            let x = i as f32 - radius as f32;
            (-(x * x) / (2.0 * sigma_sq)).exp()
        })
        .collect::<Vec<_>>();

    // normalize the kernel
    let norm = kernel.iter().sum::<f32>();
    kernel.iter_mut().for_each(|k| *k /= norm);
    kernel
}

/// Create the correlation weights of the first derivative of a gaussian.
///
/// Correlating a signal with these weights yields its smoothed derivative with the usual sign
/// (positive on a rising edge).
///
/// # Arguments
///
/// * `sigma` - The standard deviation of the gaussian.
/// * `radius` - The half width of the kernel.
pub fn gaussian_derivative_kernel_1d(sigma: f32, radius: usize) -> Vec<f32> {
    let sigma_sq = sigma * sigma;
    gaussian_kernel_1d(sigma, radius)
        .into_iter()
        .enumerate()
        .map(|(i, k)| {
            let x = i as f32 - radius as f32;
            k * x / sigma_sq
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_gaussian_radius() {
        assert_eq!(gaussian_radius(1.0), 4);
        assert_eq!(gaussian_radius(0.5), 2);
        assert_eq!(gaussian_radius(2.0), 8);
    }

    #[test]
    fn test_gaussian_kernel_1d() {
        let kernel = gaussian_kernel_1d(0.5, 2);

        let expected = [
            0.00026386508,
            0.10645077,
            0.78657067,
            0.10645077,
            0.00026386508,
        ];

        for (k, e) in kernel.iter().zip(expected.iter()) {
            assert_relative_eq!(k, e, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_gaussian_derivative_kernel_1d() {
        let kernel = gaussian_derivative_kernel_1d(1.0, 4);
        assert_eq!(kernel.len(), 9);
        assert_relative_eq!(kernel[4], 0.0);
        assert_relative_eq!(kernel[3], -kernel[5], epsilon = 1e-7);
        assert!(kernel[5] > 0.0);

        // a unit ramp has unit derivative
        let slope = kernel
            .iter()
            .enumerate()
            .map(|(i, k)| k * (i as f32 - 4.0))
            .sum::<f32>();
        assert_relative_eq!(slope, 1.0, epsilon = 5e-3);
    }
}
