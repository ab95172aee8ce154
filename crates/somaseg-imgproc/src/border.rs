/// Border handling modes for neighbourhood operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BorderMode {
    /// Out-of-bounds samples read as zero (background).
    #[default]
    Constant,

    /// Reflect the volume across the border, including the border sample.
    /// Corresponds to OpenCV's `BORDER_REFLECT` (`d c b a | a b c d | d c b a`).
    Reflect,
}

impl BorderMode {
    /// Map a possibly out-of-bounds coordinate to an in-bounds one.
    ///
    /// Returns `None` when the sample must be read as the constant background.
    ///
    /// # Arguments
    ///
    /// * `index` - The coordinate along one axis, possibly negative or past the end.
    /// * `len` - The length of that axis.
    pub fn resolve(self, index: isize, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        if index >= 0 && (index as usize) < len {
            return Some(index as usize);
        }
        match self {
            BorderMode::Constant => None,
            BorderMode::Reflect => {
                let n = len as isize;
                let period = 2 * n;
                let mut m = index.rem_euclid(period);
                if m >= n {
                    m = period - 1 - m;
                }
                Some(m as usize)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::BorderMode;

    #[test]
    fn test_constant() {
        assert_eq!(BorderMode::Constant.resolve(2, 4), Some(2));
        assert_eq!(BorderMode::Constant.resolve(-1, 4), None);
        assert_eq!(BorderMode::Constant.resolve(4, 4), None);
    }

    #[test]
    fn test_reflect() {
        let resolved = (-3..7)
            .map(|i| BorderMode::Reflect.resolve(i, 4))
            .collect::<Option<Vec<_>>>();
        assert_eq!(resolved, Some(vec![2, 1, 0, 0, 1, 2, 3, 3, 2, 1]));
    }

    #[test]
    fn test_reflect_short_axis() {
        assert_eq!(BorderMode::Reflect.resolve(-5, 1), Some(0));
        assert_eq!(BorderMode::Reflect.resolve(3, 2), Some(0));
    }
}
