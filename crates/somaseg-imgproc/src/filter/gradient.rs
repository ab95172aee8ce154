use somaseg_volume::Volume;

/// Discrete gradient of a volume along every axis.
///
/// Interior samples use central differences `(f[i + 1] - f[i - 1]) / 2`; the first and last
/// samples use one-sided differences. Axes of length one have a zero gradient.
///
/// # Returns
///
/// One volume per axis, in axis order.
///
/// # Example
///
/// ```rust
/// use somaseg_imgproc::filter::gradient;
/// use somaseg_volume::Volume;
///
/// let f = Volume::<f32, 1>::from_shape_vec([4], vec![1.0, 2.0, 4.0, 7.0]).unwrap();
/// let g = gradient(&f);
/// assert_eq!(g[0].as_slice(), &[1.0, 1.5, 2.5, 3.0]);
/// ```
pub fn gradient<T, const N: usize>(field: &Volume<T, N>) -> Vec<Volume<f32, N>>
where
    T: Copy + Into<f32>,
{
    let data = field.as_slice();
    (0..N)
        .map(|axis| {
            let len = field.shape[axis];
            let stride = field.strides[axis];
            let mut out = Volume::<f32, N>::zeros(field.shape);
            if len < 2 {
                return out;
            }

            for (i, g) in out.as_slice_mut().iter_mut().enumerate() {
                let pos = field.get_index_unchecked(i)[axis];
                let at = |j: usize| -> f32 { data[j].into() };
                *g = if pos == 0 {
                    at(i + stride) - at(i)
                } else if pos == len - 1 {
                    at(i) - at(i - stride)
                } else {
                    (at(i + stride) - at(i - stride)) * 0.5
                };
            }
            out
        })
        .collect()
}

/// Sum of the absolute partial derivatives, `sum_axis |df/dx_axis|`.
pub fn abs_gradient_sum<T, const N: usize>(field: &Volume<T, N>) -> Volume<f32, N>
where
    T: Copy + Into<f32>,
{
    let mut out = Volume::<f32, N>::zeros(field.shape);
    for partial in gradient(field) {
        out.as_slice_mut()
            .iter_mut()
            .zip(partial.iter())
            .for_each(|(o, g)| *o += g.abs());
    }
    out
}
