use serde::{Deserialize, Serialize};

/// An axis-aligned box of voxels, `start` inclusive and `end` exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// First voxel of the box along each axis.
    pub start: [usize; 3],
    /// One past the last voxel of the box along each axis.
    pub end: [usize; 3],
}

impl BoundingBox {
    /// Build the box `center +/- half_width`, clamped to a volume of the given shape.
    ///
    /// Each bound is clamped to `[0, shape - 1]` and truncated to an integer, so the last
    /// plane of the volume is never included.
    ///
    /// # Example
    ///
    /// ```rust
    /// use somaseg_detect::BoundingBox;
    ///
    /// let bbox = BoundingBox::from_center([5.0, 20.0, 38.0], 9.0, [40, 40, 40]);
    /// assert_eq!(bbox.start, [0, 11, 29]);
    /// assert_eq!(bbox.end, [14, 29, 39]);
    /// ```
    pub fn from_center(center: [f64; 3], half_width: f64, shape: [usize; 3]) -> Self {
        let mut start = [0usize; 3];
        let mut end = [0usize; 3];
        let mut clamped = false;
        for k in 0..3 {
            let upper = shape[k].saturating_sub(1) as f64;
            let lo = center[k] - half_width;
            let hi = center[k] + half_width;
            clamped |= lo < 0.0 || hi > upper;
            start[k] = lo.clamp(0.0, upper) as usize;
            end[k] = hi.clamp(0.0, upper) as usize;
        }

        if clamped {
            log::warn!(
                "bounding box around {:?} clamped to the volume: {:?} -> {:?}",
                center,
                start,
                end
            );
        }
        Self { start, end }
    }

    /// Extent of the box along each axis.
    pub fn shape(&self) -> [usize; 3] {
        let mut shape = [0usize; 3];
        for k in 0..3 {
            shape[k] = self.end[k].saturating_sub(self.start[k]);
        }
        shape
    }

    /// Whether the box contains no voxel.
    pub fn is_empty(&self) -> bool {
        self.shape().iter().any(|&s| s == 0)
    }

    /// Whether the voxel `index` lies inside the box.
    pub fn contains(&self, index: [usize; 3]) -> bool {
        (0..3).all(|k| index[k] >= self.start[k] && index[k] < self.end[k])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_center_inside() {
        let bbox = BoundingBox::from_center([20.0, 20.0, 20.0], 9.0, [40, 40, 40]);
        assert_eq!(bbox.start, [11, 11, 11]);
        assert_eq!(bbox.end, [29, 29, 29]);
        assert_eq!(bbox.shape(), [18, 18, 18]);
        assert!(!bbox.is_empty());
        assert!(bbox.contains([11, 20, 28]));
        assert!(!bbox.contains([11, 20, 29]));
    }

    #[test]
    fn test_from_center_truncates_and_clamps() {
        let bbox = BoundingBox::from_center([2.5, 10.7, 30.0], 4.0, [8, 16, 32]);
        assert_eq!(bbox.start, [0, 6, 26]);
        assert_eq!(bbox.end, [6, 14, 31]);
    }

    #[test]
    fn test_flat_volume_is_empty() {
        let bbox = BoundingBox::from_center([0.0, 5.0, 5.0], 3.0, [1, 10, 10]);
        assert_eq!(bbox.shape(), [0, 6, 6]);
        assert!(bbox.is_empty());
    }
}
