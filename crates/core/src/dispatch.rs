//! Mapping from (input, output) dtype pairs to transform kinds and the engine
//! call that executes them.
//!
//! [`resolve`] is the only place that decides which dtype pairs are legal.
//! Plans consult it once at construction and keep the result.

use crate::buffer::DevicePtr;
use crate::dtype::Dtype;
use crate::engine::FftEngine;
use crate::error::{EngineError, FftError};
use crate::kind::{Direction, TransformKind};

/// Reference to one of the engine's execution calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExecPrimitive {
    ExecR2C,
    ExecC2R,
    ExecC2C,
    ExecD2Z,
    ExecZ2D,
    ExecZ2Z,
}

impl ExecPrimitive {
    /// Whether the engine call takes an explicit direction flag.
    pub fn takes_direction(self) -> bool {
        matches!(self, ExecPrimitive::ExecC2C | ExecPrimitive::ExecZ2Z)
    }

    /// Calls the referenced engine primitive.
    ///
    /// `direction` is forwarded only to the complex-to-complex calls.
    ///
    /// # Safety
    /// `idata` and `odata` must address device memory, in the engine's address
    /// space, large enough for the element counts the plan behind `handle`
    /// reads and writes, and must stay valid until the call returns.
    pub unsafe fn invoke<E: FftEngine + ?Sized>(
        self,
        engine: &E,
        handle: &E::Handle,
        idata: DevicePtr,
        odata: DevicePtr,
        direction: Direction,
    ) -> Result<(), EngineError> {
        // SAFETY: forwarded from the caller.
        unsafe {
            match self {
                ExecPrimitive::ExecR2C => engine.exec_r2c(handle, idata, odata),
                ExecPrimitive::ExecC2R => engine.exec_c2r(handle, idata, odata),
                ExecPrimitive::ExecC2C => engine.exec_c2c(handle, idata, odata, direction),
                ExecPrimitive::ExecD2Z => engine.exec_d2z(handle, idata, odata),
                ExecPrimitive::ExecZ2D => engine.exec_z2d(handle, idata, odata),
                ExecPrimitive::ExecZ2Z => engine.exec_z2z(handle, idata, odata, direction),
            }
        }
    }
}

/// Resolves a dtype pair to its transform kind and execution primitive.
pub fn resolve(input: Dtype, output: Dtype) -> Result<(TransformKind, ExecPrimitive), FftError> {
    use Dtype::*;

    match (input, output) {
        (Real32, Complex64) => Ok((TransformKind::R2C, ExecPrimitive::ExecR2C)),
        (Complex64, Real32) => Ok((TransformKind::C2R, ExecPrimitive::ExecC2R)),
        (Complex64, Complex64) => Ok((TransformKind::C2C, ExecPrimitive::ExecC2C)),
        (Real64, Complex128) => Ok((TransformKind::D2Z, ExecPrimitive::ExecD2Z)),
        (Complex128, Real64) => Ok((TransformKind::Z2D, ExecPrimitive::ExecZ2D)),
        (Complex128, Complex128) => Ok((TransformKind::Z2Z, ExecPrimitive::ExecZ2Z)),
        _ => Err(FftError::UnsupportedTypeCombination { input, output }),
    }
}
