use somaseg_volume::LevelSet;

/// Build a binary level set whose 0.5-level set is a circle (2D) or sphere (3D).
///
/// A voxel is inside when its euclidean distance to `center` is strictly smaller than
/// `radius`, so a non-positive radius yields an empty level set.
///
/// # Arguments
///
/// * `shape` - The shape of the level set.
/// * `center` - The centre of the circle, in voxel coordinates (may lie outside the shape).
/// * `radius` - The radius of the circle, in voxels.
///
/// # Example
///
/// ```rust
/// use somaseg_snakes::circle_levelset;
///
/// let u = circle_levelset([5, 5], [2.0, 2.0], 1.5);
/// assert_eq!(u.count_nonzero(), 9);
/// ```
pub fn circle_levelset<const N: usize>(
    shape: [usize; N],
    center: [f64; N],
    radius: f64,
) -> LevelSet<N> {
    LevelSet::from_shape_fn(shape, |idx| {
        let dist = idx
            .iter()
            .zip(center.iter())
            .map(|(&i, &c)| (i as f64 - c).powi(2))
            .sum::<f64>()
            .sqrt();
        u8::from(radius - dist > 0.0)
    })
}

/// Foreground volume of a level set: the sum of its positive entries.
pub fn foreground_volume<const N: usize>(u: &LevelSet<N>) -> f64 {
    u.iter().map(|&v| v as f64).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_positive_radius_is_empty() {
        assert_eq!(circle_levelset([6, 7], [3.0, 3.0], 0.0).count_nonzero(), 0);
        assert_eq!(circle_levelset([4, 4, 4], [2.0, 2.0, 2.0], -2.0).count_nonzero(), 0);
    }

    #[test]
    fn test_center_is_inside() {
        let u = circle_levelset([10, 12, 14], [4.0, 5.0, 6.0], 0.5);
        assert_eq!(u.get([4, 5, 6]), Some(&1));
        assert_eq!(u.count_nonzero(), 1);
    }

    #[test]
    fn test_disk_and_sphere() {
        // radius 1.5 disk: centre, 4 edge neighbours and 4 corners (distance ~1.41)
        let u = circle_levelset([5, 5], [2.0, 2.0], 1.5);
        assert_eq!(u.count_nonzero(), 9);
        assert_eq!(u.get([0, 2]), Some(&0));

        let u = circle_levelset([9, 9, 9], [4.0, 4.0, 4.0], 1.1);
        assert_eq!(u.count_nonzero(), 7);
        assert_eq!(foreground_volume(&u), 7.0);
    }

    #[test]
    fn test_center_outside_shape() {
        // first row: [0, 1] at distance 1, [0, 0] and [0, 2] at sqrt(2)
        let u = circle_levelset([4, 4], [-1.0, 1.0], 1.5);
        assert_eq!(u.count_nonzero(), 3);
        assert_eq!(u.get([0, 0]), Some(&1));
        assert_eq!(u.get([0, 1]), Some(&1));
        assert_eq!(u.get([0, 2]), Some(&1));
        assert_eq!(u.get([1, 1]), Some(&0));

        let u = circle_levelset([4, 4], [-1.0, 1.0], 1.2);
        assert_eq!(u.count_nonzero(), 1);
        assert_eq!(u.get([0, 1]), Some(&1));
    }
}
