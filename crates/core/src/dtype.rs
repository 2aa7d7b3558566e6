//! Element type tags for buffers living in device memory.
//!
//! Complex widths count total bits, so [`Dtype::Complex64`] is a pair of
//! `f32` (`num_complex::Complex32`) and [`Dtype::Complex128`] a pair of `f64`
//! (`num_complex::Complex64`).

use num_complex::{Complex32, Complex64};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dtype {
    Real32,
    Real64,
    Complex64,
    Complex128,
}

/// Floating point precision of a dtype's components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Precision {
    Single,
    Double,
}

impl Dtype {
    pub const ALL: [Dtype; 4] = [
        Dtype::Real32,
        Dtype::Real64,
        Dtype::Complex64,
        Dtype::Complex128,
    ];

    pub fn is_complex(self) -> bool {
        matches!(self, Dtype::Complex64 | Dtype::Complex128)
    }

    pub fn is_real(self) -> bool {
        !self.is_complex()
    }

    pub fn precision(self) -> Precision {
        match self {
            Dtype::Real32 | Dtype::Complex64 => Precision::Single,
            Dtype::Real64 | Dtype::Complex128 => Precision::Double,
        }
    }

    /// Size of one element in bytes.
    pub fn byte_width(self) -> usize {
        match self {
            Dtype::Real32 => 4,
            Dtype::Real64 | Dtype::Complex64 => 8,
            Dtype::Complex128 => 16,
        }
    }

    /// Casts a divisor into this dtype's component precision.
    ///
    /// Dividing a complex element by a real divisor of the same component
    /// width divides both parts, so complex buffers share the real casts.
    pub fn cast_scale(self, divisor: f64) -> ScaleFactor {
        match self.precision() {
            Precision::Single => ScaleFactor::Single(divisor as f32),
            Precision::Double => ScaleFactor::Double(divisor),
        }
    }
}

impl std::fmt::Display for Dtype {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Dtype::Real32 => "real32",
            Dtype::Real64 => "real64",
            Dtype::Complex64 => "complex64",
            Dtype::Complex128 => "complex128",
        };
        f.write_str(name)
    }
}

/// A divisor already cast to the precision of the buffer it scales.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScaleFactor {
    Single(f32),
    Double(f64),
}

impl ScaleFactor {
    pub fn precision(self) -> Precision {
        match self {
            ScaleFactor::Single(_) => Precision::Single,
            ScaleFactor::Double(_) => Precision::Double,
        }
    }

    /// Whether dividing by this factor keeps finite values finite.
    pub fn is_finite_nonzero(self) -> bool {
        match self {
            ScaleFactor::Single(value) => value.is_finite() && value != 0.0,
            ScaleFactor::Double(value) => value.is_finite() && value != 0.0,
        }
    }
}

/// Host scalar types with a matching [`Dtype`].
pub trait Element: Copy + Send + Sync + 'static {
    /// Component type (`f32` or `f64`).
    type Real: Copy + Send + Sync + 'static;

    const DTYPE: Dtype;

    /// Number of `Real` components per element (1 for real, 2 for complex).
    const COMPONENTS: usize;
}

impl Element for f32 {
    type Real = f32;
    const DTYPE: Dtype = Dtype::Real32;
    const COMPONENTS: usize = 1;
}

impl Element for f64 {
    type Real = f64;
    const DTYPE: Dtype = Dtype::Real64;
    const COMPONENTS: usize = 1;
}

impl Element for Complex32 {
    type Real = f32;
    const DTYPE: Dtype = Dtype::Complex64;
    const COMPONENTS: usize = 2;
}

impl Element for Complex64 {
    type Real = f64;
    const DTYPE: Dtype = Dtype::Complex128;
    const COMPONENTS: usize = 2;
}
