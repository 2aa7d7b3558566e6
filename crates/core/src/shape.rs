//! Transform extents.

use crate::error::FftError;

/// Extents of a 1-, 2- or 3-dimensional transform, slowest-varying first.
///
/// The last extent is contiguous in memory and is the axis that real/complex
/// transforms halve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Shape {
    dims: [usize; 3],
    rank: usize,
    len: usize,
}

impl Shape {
    pub const MAX_RANK: usize = 3;

    /// Validates `dims` and builds a shape.
    ///
    /// Every extent must be at least 1 and fit in a C `int`, which is what the
    /// engines take.
    pub fn new(dims: &[usize]) -> Result<Self, FftError> {
        if dims.is_empty() || dims.len() > Self::MAX_RANK {
            return Err(FftError::UnsupportedRank(dims.len()));
        }

        let mut stored = [1usize; 3];
        let mut len = 1usize;
        for (axis, &extent) in dims.iter().enumerate() {
            if extent == 0 || extent > i32::MAX as usize {
                return Err(FftError::InvalidDimension { axis, extent });
            }
            len = len
                .checked_mul(extent)
                .ok_or_else(|| FftError::ShapeOverflow(dims.to_vec()))?;
            stored[axis] = extent;
        }

        Ok(Self {
            dims: stored,
            rank: dims.len(),
            len,
        })
    }

    pub fn dims(&self) -> &[usize] {
        &self.dims[..self.rank]
    }

    pub fn rank(&self) -> usize {
        self.rank
    }

    /// Number of samples in the full (time/space domain) signal.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Number of non-redundant complex coefficients of a real signal.
    ///
    /// The last axis keeps `n/2 + 1` bins, the others are kept whole.
    pub fn half_spectrum_len(&self) -> usize {
        let last = self.dims[self.rank - 1];
        self.len / last * (last / 2 + 1)
    }
}

impl TryFrom<&[usize]> for Shape {
    type Error = FftError;

    fn try_from(dims: &[usize]) -> Result<Self, Self::Error> {
        Shape::new(dims)
    }
}

impl<const N: usize> TryFrom<[usize; N]> for Shape {
    type Error = FftError;

    fn try_from(dims: [usize; N]) -> Result<Self, Self::Error> {
        Shape::new(&dims)
    }
}

impl TryFrom<usize> for Shape {
    type Error = FftError;

    fn try_from(extent: usize) -> Result<Self, Self::Error> {
        Shape::new(&[extent])
    }
}

impl std::fmt::Display for Shape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (axis, extent) in self.dims().iter().enumerate() {
            if axis > 0 {
                f.write_str("x")?;
            }
            write!(f, "{extent}")?;
        }
        Ok(())
    }
}
