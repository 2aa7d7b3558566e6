//! Error taxonomy for plan construction and transform execution.

use crate::dtype::Dtype;
use crate::kind::{Direction, TransformKind};

/// Error reported by an engine or device-memory collaborator.
pub type EngineError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Which side of a transform a buffer sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferRole {
    Input,
    Output,
}

impl std::fmt::Display for BufferRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BufferRole::Input => f.write_str("input"),
            BufferRole::Output => f.write_str("output"),
        }
    }
}

/// Errors raised by plans and the executor.
///
/// Everything except [`FftError::PlanAllocationFailed`],
/// [`FftError::ExecutionFailed`], [`FftError::ScalingFailed`] and
/// [`FftError::PlanReleaseFailed`] is detected before the engine is called.
#[derive(Debug, thiserror::Error)]
pub enum FftError {
    #[error("unsupported input/output type combination: {input} -> {output}")]
    UnsupportedTypeCombination { input: Dtype, output: Dtype },

    #[error("transforms of dimension {0} are not supported (expected 1, 2 or 3)")]
    UnsupportedRank(usize),

    #[error("invalid extent {extent} on axis {axis} (must be between 1 and {max})", max = i32::MAX)]
    InvalidDimension { axis: usize, extent: usize },

    #[error("shape {0:?} has more elements than fit in usize")]
    ShapeOverflow(Vec<usize>),

    #[error("engine failed to allocate a {kind} plan: {source}")]
    PlanAllocationFailed {
        kind: TransformKind,
        #[source]
        source: EngineError,
    },

    #[error("can only compute in-place transform of complex data ({0} plan)")]
    IllegalInPlaceTransform(TransformKind),

    #[error("cannot compute {direction} {input} -> {output} transform")]
    IllegalDirectionForKind {
        direction: Direction,
        input: Dtype,
        output: Dtype,
    },

    #[error("{role} buffer has dtype {actual}, plan expects {expected}")]
    BufferDtypeMismatch {
        role: BufferRole,
        expected: Dtype,
        actual: Dtype,
    },

    #[error("{role} buffer holds {actual} elements, plan expects {expected}")]
    BufferLengthMismatch {
        role: BufferRole,
        expected: usize,
        actual: usize,
    },

    #[error("scale factor {0} must be finite and non-zero")]
    InvalidScaleFactor(f64),

    #[error("{kind} execution failed: {source}")]
    ExecutionFailed {
        kind: TransformKind,
        #[source]
        source: EngineError,
    },

    #[error("scaling output buffer failed: {0}")]
    ScalingFailed(#[source] EngineError),

    #[error("engine failed to release {kind} plan: {source}")]
    PlanReleaseFailed {
        kind: TransformKind,
        #[source]
        source: EngineError,
    },

    #[error("plan handle has already been released")]
    PlanReleased,
}
