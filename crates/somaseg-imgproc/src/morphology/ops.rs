use somaseg_volume::LevelSet;

use super::StructuringElement;
use crate::border::BorderMode;

/// Erode a binary level set into `dst`, which must be `src.numel()` long.
///
/// A voxel stays inside only if every voxel covered by the element is inside. Samples
/// outside the volume are background, so erosion always clears voxels touching the border
/// along an active direction.
pub(crate) fn erode_into<const N: usize>(
    src: &LevelSet<N>,
    dst: &mut [u8],
    element: &StructuringElement<N>,
) {
    let data = src.as_slice();
    for (i, out) in dst.iter_mut().enumerate() {
        let idx = src.get_index_unchecked(i);
        let inside = element
            .offsets()
            .iter()
            .all(|o| match neighbor_offset(src, idx, o, 1) {
                Some(j) => data[j] != 0,
                None => false,
            });
        *out = u8::from(inside);
    }
}

/// Dilate a binary level set into `dst`, which must be `src.numel()` long.
///
/// A voxel becomes inside if any voxel covered by the reflected element is inside.
pub(crate) fn dilate_into<const N: usize>(
    src: &LevelSet<N>,
    dst: &mut [u8],
    element: &StructuringElement<N>,
) {
    let data = src.as_slice();
    for (i, out) in dst.iter_mut().enumerate() {
        let idx = src.get_index_unchecked(i);
        let inside = element
            .offsets()
            .iter()
            .any(|o| match neighbor_offset(src, idx, o, -1) {
                Some(j) => data[j] != 0,
                None => false,
            });
        *out = u8::from(inside);
    }
}

/// Erode a binary level set, returning a new level set.
pub fn erode<const N: usize>(src: &LevelSet<N>, element: &StructuringElement<N>) -> LevelSet<N> {
    let mut dst = LevelSet::zeros(src.shape);
    erode_into(src, dst.as_slice_mut(), element);
    dst
}

/// Dilate a binary level set, returning a new level set.
pub fn dilate<const N: usize>(src: &LevelSet<N>, element: &StructuringElement<N>) -> LevelSet<N> {
    let mut dst = LevelSet::zeros(src.shape);
    dilate_into(src, dst.as_slice_mut(), element);
    dst
}

// memory offset of `idx + sign * o`, or None when it falls into the constant border
fn neighbor_offset<const N: usize>(
    src: &LevelSet<N>,
    idx: [usize; N],
    o: &[isize; N],
    sign: isize,
) -> Option<usize> {
    let mut offset = 0;
    for k in 0..N {
        let n = idx[k] as isize + sign * o[k];
        offset += BorderMode::Constant.resolve(n, src.shape[k])? * src.strides[k];
    }
    Some(offset)
}
