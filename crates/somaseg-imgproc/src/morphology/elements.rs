use somaseg_volume::Volume;

use super::MorphologyError;

/// Dimensionality of a volume that has a structuring-element family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimensionality {
    /// 2D images, 4 elements of 3x3.
    Two,
    /// 3D stacks, 9 elements of 3x3x3.
    Three,
}

impl Dimensionality {
    /// Resolve the dimensionality of a rank.
    ///
    /// # Errors
    ///
    /// Returns [`MorphologyError::InvalidDimensionality`] unless `rank` is 2 or 3.
    pub fn from_rank(rank: usize) -> Result<Self, MorphologyError> {
        match rank {
            2 => Ok(Dimensionality::Two),
            3 => Ok(Dimensionality::Three),
            _ => Err(MorphologyError::InvalidDimensionality(rank)),
        }
    }
}

// diagonal, middle column, anti-diagonal, middle row
const ELEMENTS_2D: [[[u8; 3]; 3]; 4] = [
    [[1, 0, 0], [0, 1, 0], [0, 0, 1]],
    [[0, 1, 0], [0, 1, 0], [0, 1, 0]],
    [[0, 0, 1], [0, 1, 0], [1, 0, 0]],
    [[0, 0, 0], [1, 1, 1], [0, 0, 0]],
];

// three axis-aligned planes followed by the six diagonal planes
const ELEMENTS_3D: [[[[u8; 3]; 3]; 3]; 9] = [
    // x == 1
    [
        [[0, 1, 0], [0, 1, 0], [0, 1, 0]],
        [[0, 1, 0], [0, 1, 0], [0, 1, 0]],
        [[0, 1, 0], [0, 1, 0], [0, 1, 0]],
    ],
    // y == 1
    [
        [[0, 0, 0], [1, 1, 1], [0, 0, 0]],
        [[0, 0, 0], [1, 1, 1], [0, 0, 0]],
        [[0, 0, 0], [1, 1, 1], [0, 0, 0]],
    ],
    // z == 1
    [
        [[0, 0, 0], [0, 0, 0], [0, 0, 0]],
        [[1, 1, 1], [1, 1, 1], [1, 1, 1]],
        [[0, 0, 0], [0, 0, 0], [0, 0, 0]],
    ],
    // y == x
    [
        [[1, 0, 0], [0, 1, 0], [0, 0, 1]],
        [[1, 0, 0], [0, 1, 0], [0, 0, 1]],
        [[1, 0, 0], [0, 1, 0], [0, 0, 1]],
    ],
    // y + x == 2
    [
        [[0, 0, 1], [0, 1, 0], [1, 0, 0]],
        [[0, 0, 1], [0, 1, 0], [1, 0, 0]],
        [[0, 0, 1], [0, 1, 0], [1, 0, 0]],
    ],
    // z == x
    [
        [[1, 0, 0], [1, 0, 0], [1, 0, 0]],
        [[0, 1, 0], [0, 1, 0], [0, 1, 0]],
        [[0, 0, 1], [0, 0, 1], [0, 0, 1]],
    ],
    // z + x == 2
    [
        [[0, 0, 1], [0, 0, 1], [0, 0, 1]],
        [[0, 1, 0], [0, 1, 0], [0, 1, 0]],
        [[1, 0, 0], [1, 0, 0], [1, 0, 0]],
    ],
    // z == y
    [
        [[1, 1, 1], [0, 0, 0], [0, 0, 0]],
        [[0, 0, 0], [1, 1, 1], [0, 0, 0]],
        [[0, 0, 0], [0, 0, 0], [1, 1, 1]],
    ],
    // z + y == 2
    [
        [[0, 0, 0], [0, 0, 0], [1, 1, 1]],
        [[0, 0, 0], [1, 1, 1], [0, 0, 0]],
        [[1, 1, 1], [0, 0, 0], [0, 0, 0]],
    ],
];

/// A binary structuring element of side 3 centred at its middle voxel.
///
/// The element stores its 0/1 mask together with the active offsets relative to the centre,
/// which is what erosion and dilation iterate over.
#[derive(Debug, Clone, PartialEq)]
pub struct StructuringElement<const N: usize> {
    mask: Volume<u8, N>,
    offsets: Vec<[isize; N]>,
}

impl<const N: usize> StructuringElement<N> {
    /// Create a structuring element from a mask of side 3 along every axis.
    ///
    /// # Errors
    ///
    /// Returns an error if the mask is not `3 x ... x 3`.
    pub fn from_mask(mask: Volume<u8, N>) -> Result<Self, MorphologyError> {
        if mask.shape != [3; N] {
            return Err(somaseg_volume::VolumeError::shape_mismatch([3; N], mask.shape).into());
        }

        Ok(Self {
            offsets: active_offsets(&mask),
            mask,
        })
    }

    /// The 0/1 mask of the element.
    pub fn mask(&self) -> &Volume<u8, N> {
        &self.mask
    }

    /// The active offsets relative to the centre, in row-major order.
    pub fn offsets(&self) -> &[[isize; N]] {
        &self.offsets
    }
}

/// The full-connectivity element: every neighbour within one step along all axes.
///
/// # Example
///
/// ```rust
/// use somaseg_imgproc::morphology::box_element;
///
/// assert_eq!(box_element::<3>().offsets().len(), 27);
/// ```
pub fn box_element<const N: usize>() -> StructuringElement<N> {
    let mask = Volume::from_shape_val([3; N], 1u8);
    StructuringElement {
        offsets: active_offsets(&mask),
        mask,
    }
}

fn active_offsets<const N: usize>(mask: &Volume<u8, N>) -> Vec<[isize; N]> {
    mask.iter()
        .enumerate()
        .filter(|(_, v)| **v != 0)
        .map(|(i, _)| {
            let idx = mask.get_index_unchecked(i);
            let mut offset = [0isize; N];
            for k in 0..N {
                offset[k] = idx[k] as isize - 1;
            }
            offset
        })
        .collect()
}

/// The fixed structuring-element family used by the SI and IS operators.
///
/// 2D volumes get 4 elements (diagonal, column, anti-diagonal, row); 3D volumes get 9
/// (three axis-aligned planes, six diagonal planes).
///
/// # Errors
///
/// Returns [`MorphologyError::InvalidDimensionality`] unless `N` is 2 or 3.
pub fn structuring_elements<const N: usize>() -> Result<Vec<StructuringElement<N>>, MorphologyError>
{
    let masks: Vec<Vec<u8>> = match Dimensionality::from_rank(N)? {
        Dimensionality::Two => ELEMENTS_2D
            .iter()
            .map(|e| e.iter().flatten().copied().collect())
            .collect(),
        Dimensionality::Three => ELEMENTS_3D
            .iter()
            .map(|e| e.iter().flatten().flatten().copied().collect())
            .collect(),
    };

    masks
        .into_iter()
        .map(|data| StructuringElement::from_mask(Volume::from_shape_vec([3; N], data)?))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimensionality() {
        assert_eq!(Dimensionality::from_rank(2), Ok(Dimensionality::Two));
        assert_eq!(Dimensionality::from_rank(3), Ok(Dimensionality::Three));
        assert_eq!(
            Dimensionality::from_rank(4),
            Err(MorphologyError::InvalidDimensionality(4))
        );
    }

    #[test]
    fn test_family_2d() -> Result<(), MorphologyError> {
        let family = structuring_elements::<2>()?;
        assert_eq!(family.len(), 4);
        for element in family.iter() {
            // every element is a line of three through the centre
            assert_eq!(element.offsets().len(), 3);
            assert!(element.offsets().contains(&[0, 0]));
        }
        assert_eq!(family[0].offsets(), &[[-1, -1], [0, 0], [1, 1]]);
        assert_eq!(family[3].offsets(), &[[0, -1], [0, 0], [0, 1]]);
        Ok(())
    }

    #[test]
    fn test_family_3d() -> Result<(), MorphologyError> {
        let family = structuring_elements::<3>()?;
        assert_eq!(family.len(), 9);
        for element in family.iter() {
            // every element is a plane of nine through the centre, symmetric about it
            assert_eq!(element.offsets().len(), 9);
            for o in element.offsets() {
                assert!(element.offsets().contains(&[-o[0], -o[1], -o[2]]));
            }
        }
        assert_eq!(family[2].mask().get([1, 0, 2]), Some(&1));
        assert_eq!(family[2].mask().get([0, 1, 1]), Some(&0));
        assert_eq!(family[7].mask().get([2, 2, 0]), Some(&1));
        Ok(())
    }

    #[test]
    fn test_family_invalid_rank() {
        assert_eq!(
            structuring_elements::<1>(),
            Err(MorphologyError::InvalidDimensionality(1))
        );
    }

    #[test]
    fn test_from_mask_wrong_shape() {
        let mask = Volume::from_shape_val([3, 5], 1u8);
        assert!(StructuringElement::from_mask(mask).is_err());
    }
}
