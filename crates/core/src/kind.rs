//! Transform kinds and directions.

use crate::dtype::Dtype;
use crate::shape::Shape;

/// The six supported (input, output) dtype combinations, named after the
/// engine call that performs them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransformKind {
    /// real32 -> complex64
    R2C,
    /// complex64 -> real32
    C2R,
    /// complex64 -> complex64
    C2C,
    /// real64 -> complex128
    D2Z,
    /// complex128 -> real64
    Z2D,
    /// complex128 -> complex128
    Z2Z,
}

impl TransformKind {
    pub const ALL: [TransformKind; 6] = [
        TransformKind::R2C,
        TransformKind::C2R,
        TransformKind::C2C,
        TransformKind::D2Z,
        TransformKind::Z2D,
        TransformKind::Z2Z,
    ];

    pub fn input_dtype(self) -> Dtype {
        match self {
            TransformKind::R2C => Dtype::Real32,
            TransformKind::C2R | TransformKind::C2C => Dtype::Complex64,
            TransformKind::D2Z => Dtype::Real64,
            TransformKind::Z2D | TransformKind::Z2Z => Dtype::Complex128,
        }
    }

    pub fn output_dtype(self) -> Dtype {
        match self {
            TransformKind::C2R => Dtype::Real32,
            TransformKind::R2C | TransformKind::C2C => Dtype::Complex64,
            TransformKind::Z2D => Dtype::Real64,
            TransformKind::D2Z | TransformKind::Z2Z => Dtype::Complex128,
        }
    }

    /// True for the two kinds that keep their representation and may run in place.
    pub fn is_complex_to_complex(self) -> bool {
        matches!(self, TransformKind::C2C | TransformKind::Z2Z)
    }

    /// Element counts `(input, output)` the engine reads and writes for `shape`.
    pub fn buffer_lens(self, shape: &Shape) -> (usize, usize) {
        match self {
            TransformKind::R2C | TransformKind::D2Z => (shape.len(), shape.half_spectrum_len()),
            TransformKind::C2R | TransformKind::Z2D => (shape.half_spectrum_len(), shape.len()),
            TransformKind::C2C | TransformKind::Z2Z => (shape.len(), shape.len()),
        }
    }
}

impl std::fmt::Display for TransformKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TransformKind::R2C => "R2C",
            TransformKind::C2R => "C2R",
            TransformKind::C2C => "C2C",
            TransformKind::D2Z => "D2Z",
            TransformKind::Z2D => "Z2D",
            TransformKind::Z2Z => "Z2Z",
        };
        f.write_str(name)
    }
}

/// Transform orientation.
///
/// Only complex-to-complex calls pass it to the engine; the real/complex
/// calls imply it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Forward,
    Inverse,
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Forward => f.write_str("forward"),
            Direction::Inverse => f.write_str("inverse"),
        }
    }
}
