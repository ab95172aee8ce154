use crate::error::VolumeError;

/// Compute the row-major strides of a shape.
///
/// The stride of the last dimension is always one.
///
/// # Example
///
/// ```
/// use somaseg_volume::get_strides_from_shape;
///
/// assert_eq!(get_strides_from_shape([2, 3, 4]), [12, 4, 1]);
/// ```
pub fn get_strides_from_shape<const N: usize>(shape: [usize; N]) -> [usize; N] {
    let mut strides: [usize; N] = [0; N];
    let mut stride = 1;
    for i in (0..shape.len()).rev() {
        strides[i] = stride;
        stride *= shape[i];
    }
    strides
}

/// A dense, owned, row-major N-dimensional array.
///
/// `Volume` stores intensities of a 2D image or a 3D stack, derived fields such as
/// gradients and stopping functions, and binary level sets (see [`LevelSet`]).
/// The last axis varies fastest in memory.
///
/// # Example
///
/// ```
/// use somaseg_volume::Volume3;
///
/// let v = Volume3::<f32>::from_shape_fn([2, 3, 4], |[z, y, x]| (z * 12 + y * 4 + x) as f32);
/// assert_eq!(v.numel(), 24);
/// assert_eq!(v.get([1, 2, 3]), Some(&23.0));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Volume<T, const N: usize> {
    data: Vec<T>,
    /// The shape of the volume.
    pub shape: [usize; N],
    /// The strides of the volume data in memory.
    pub strides: [usize; N],
}

/// Two-dimensional volume (an image).
pub type Volume2<T> = Volume<T, 2>;

/// Three-dimensional volume (a stack).
pub type Volume3<T> = Volume<T, 3>;

/// Binary level set: every element is `0` (outside) or `1` (inside).
pub type LevelSet<const N: usize> = Volume<u8, N>;

impl<T, const N: usize> Volume<T, N> {
    /// Creates a new `Volume` with the given shape and data.
    ///
    /// # Errors
    ///
    /// If the number of elements in the data does not match the shape, an error is returned.
    pub fn from_shape_vec(shape: [usize; N], data: Vec<T>) -> Result<Self, VolumeError> {
        let numel = shape.iter().product::<usize>();
        if numel != data.len() {
            return Err(VolumeError::invalid_shape(numel, data.len()));
        }
        Ok(Self {
            data,
            shape,
            strides: get_strides_from_shape(shape),
        })
    }

    /// Creates a new `Volume` with every element set to `value`.
    pub fn from_shape_val(shape: [usize; N], value: T) -> Self
    where
        T: Clone,
    {
        let numel = shape.iter().product::<usize>();
        Self {
            data: vec![value; numel],
            shape,
            strides: get_strides_from_shape(shape),
        }
    }

    /// Creates a new `Volume` by evaluating `f` at every multi-index in row-major order.
    pub fn from_shape_fn<F>(shape: [usize; N], f: F) -> Self
    where
        F: Fn([usize; N]) -> T,
    {
        let numel = shape.iter().product::<usize>();
        let data = (0..numel)
            .map(|i| {
                let mut index = [0; N];
                let mut j = i;
                for k in (0..N).rev() {
                    index[k] = j % shape[k];
                    j /= shape[k];
                }
                f(index)
            })
            .collect();
        Self {
            data,
            shape,
            strides: get_strides_from_shape(shape),
        }
    }

    /// Creates a new `Volume` with all elements set to zero.
    pub fn zeros(shape: [usize; N]) -> Self
    where
        T: Clone + num_traits::Zero,
    {
        Self::from_shape_val(shape, T::zero())
    }

    /// Returns the number of elements in the volume.
    #[inline]
    pub fn numel(&self) -> usize {
        self.data.len()
    }

    /// Returns the data of the volume as a slice.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Returns the data of the volume as a mutable slice.
    #[inline]
    pub fn as_slice_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Returns an iterator over the elements in memory order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.data.iter()
    }

    /// Get the offset of the element at the given index, or `None` if out of bounds.
    pub fn get_iter_offset(&self, index: [usize; N]) -> Option<usize> {
        let mut offset = 0;
        for ((&idx, dim_size), stride) in index.iter().zip(self.shape).zip(self.strides) {
            if idx >= dim_size {
                return None;
            }
            offset += idx * stride;
        }
        Some(offset)
    }

    /// Get the multi-index of the element at the given offset without bounds checks.
    ///
    /// The reverse of [`Volume::get_iter_offset`].
    pub fn get_index_unchecked(&self, offset: usize) -> [usize; N] {
        let mut idx = [0; N];
        let mut rem = offset;
        for (dim_i, &s) in self.strides.iter().enumerate() {
            idx[dim_i] = rem / s;
            rem %= s;
        }
        idx
    }

    /// Get the multi-index of the element at the given offset.
    ///
    /// # Errors
    ///
    /// If the offset is out of bounds (>= numel), an error is returned.
    pub fn get_index(&self, offset: usize) -> Result<[usize; N], VolumeError> {
        let numel = self.numel();
        if offset >= numel {
            return Err(VolumeError::IndexOutOfBounds {
                index: offset,
                size: numel,
            });
        }
        Ok(self.get_index_unchecked(offset))
    }

    /// Get the element at the given index, or `None` if out of bounds.
    pub fn get(&self, index: [usize; N]) -> Option<&T> {
        self.get_iter_offset(index).map(|i| &self.data[i])
    }

    /// Get a mutable reference to the element at the given index, or `None` if out of bounds.
    pub fn get_mut(&mut self, index: [usize; N]) -> Option<&mut T> {
        self.get_iter_offset(index).map(move |i| &mut self.data[i])
    }

    /// Apply a function to each element of the volume.
    pub fn map<U, F>(&self, f: F) -> Volume<U, N>
    where
        F: Fn(&T) -> U,
    {
        Volume {
            data: self.data.iter().map(f).collect(),
            shape: self.shape,
            strides: self.strides,
        }
    }

    /// Extract the sub-volume `[start, end)` as a new owned volume.
    ///
    /// # Errors
    ///
    /// If the region is inverted or exceeds the volume bounds, an error is returned.
    ///
    /// # Example
    ///
    /// ```
    /// use somaseg_volume::Volume2;
    ///
    /// let v = Volume2::from_shape_vec([3, 3], (0u8..9).collect()).unwrap();
    /// let c = v.crop([1, 1], [3, 3]).unwrap();
    /// assert_eq!(c.as_slice(), &[4, 5, 7, 8]);
    /// ```
    pub fn crop(&self, start: [usize; N], end: [usize; N]) -> Result<Volume<T, N>, VolumeError>
    where
        T: Clone,
    {
        self.check_region(start, end)?;

        let mut shape = [0; N];
        for i in 0..N {
            shape[i] = end[i] - start[i];
        }

        Ok(Volume::from_shape_fn(shape, |idx| {
            let mut offset = 0;
            for i in 0..N {
                offset += (start[i] + idx[i]) * self.strides[i];
            }
            self.data[offset].clone()
        }))
    }

    /// Copy `src` into this volume with its origin placed at `start`.
    ///
    /// # Errors
    ///
    /// If `src` does not fit inside this volume at `start`, an error is returned.
    pub fn paste(&mut self, src: &Volume<T, N>, start: [usize; N]) -> Result<(), VolumeError>
    where
        T: Clone,
    {
        let mut end = [0; N];
        for i in 0..N {
            end[i] = start[i] + src.shape[i];
        }
        self.check_region(start, end)?;

        for (i, v) in src.data.iter().enumerate() {
            let idx = src.get_index_unchecked(i);
            let mut offset = 0;
            for k in 0..N {
                offset += (start[k] + idx[k]) * self.strides[k];
            }
            self.data[offset] = v.clone();
        }

        Ok(())
    }

    fn check_region(&self, start: [usize; N], end: [usize; N]) -> Result<(), VolumeError> {
        let fits = (0..N).all(|i| start[i] <= end[i] && end[i] <= self.shape[i]);
        if !fits {
            return Err(VolumeError::RegionOutOfBounds {
                start: start.to_vec(),
                end: end.to_vec(),
                shape: self.shape.to_vec(),
            });
        }
        Ok(())
    }
}

impl<const N: usize> Volume<u8, N> {
    /// Binarise a real-valued field: positive values become `1`, everything else `0`.
    ///
    /// NaN is treated as not positive.
    pub fn binarize<T>(field: &Volume<T, N>) -> Self
    where
        T: PartialOrd + num_traits::Zero,
    {
        field.map(|v| u8::from(*v > T::zero()))
    }

    /// Number of elements set to a non-zero value.
    pub fn count_nonzero(&self) -> usize {
        self.data.iter().filter(|&&v| v != 0).count()
    }
}
