//! Transform plans.
//!
//! A [`TransformPlan`] owns one engine handle for a fixed shape and kind. The
//! handle is allocated eagerly in the constructor and released exactly once,
//! either by [`TransformPlan::dispose`] or when the plan is dropped.
//!
//! `dispose` consumes the plan, so a released plan cannot be executed:
//!
//! ```compile_fail
//! # use gpufft_core::{plan::TransformPlan, executor, engine::FftEngine, buffer::DeviceBuffer, kind::Direction};
//! fn use_after_dispose<E: FftEngine, B: DeviceBuffer<E>>(mut plan: TransformPlan<E>, buf: &mut B) {
//!     plan.dispose().ok();
//!     executor::execute_in_place(&mut plan, buf, Direction::Forward, None).ok();
//! }
//! ```

use std::sync::Arc;

use log::{debug, warn};

use crate::buffer::DevicePtr;
use crate::config::PlanConfig;
use crate::dispatch::{self, ExecPrimitive};
use crate::dtype::Dtype;
use crate::engine::FftEngine;
use crate::error::FftError;
use crate::kind::{Direction, TransformKind};
use crate::shape::Shape;

pub struct TransformPlan<E: FftEngine> {
    engine: Arc<E>,
    shape: Shape,
    kind: TransformKind,
    primitive: ExecPrimitive,
    // Only `None` once the handle has been released.
    handle: Option<E::Handle>,
}

impl<E: FftEngine> TransformPlan<E> {
    /// Resolves the dtype pair and allocates an engine handle for `shape`.
    pub fn new(engine: Arc<E>, shape: Shape, input: Dtype, output: Dtype) -> Result<Self, FftError> {
        let (kind, primitive) = dispatch::resolve(input, output)?;
        let handle = allocate(engine.as_ref(), &shape, kind)?;
        debug!("created {kind} plan for shape {shape}");
        Ok(Self {
            engine,
            shape,
            kind,
            primitive,
            handle: Some(handle),
        })
    }

    /// Validates `dims` before resolving the dtype pair, so a bad rank is
    /// reported whatever the dtypes are.
    pub fn create(engine: Arc<E>, dims: &[usize], input: Dtype, output: Dtype) -> Result<Self, FftError> {
        let shape = Shape::new(dims)?;
        Self::new(engine, shape, input, output)
    }

    pub fn from_config(engine: Arc<E>, config: &PlanConfig) -> Result<Self, FftError> {
        Self::create(engine, &config.shape, config.input, config.output)
    }

    /// Creates an independent plan with the same shape and kind.
    ///
    /// The copy gets its own engine handle; nothing is shared with `self`.
    pub fn try_clone(&self) -> Result<Self, FftError> {
        let handle = allocate(self.engine.as_ref(), &self.shape, self.kind)?;
        debug!("cloned {} plan for shape {}", self.kind, self.shape);
        Ok(Self {
            engine: Arc::clone(&self.engine),
            shape: self.shape,
            kind: self.kind,
            primitive: self.primitive,
            handle: Some(handle),
        })
    }

    /// Releases the engine handle now and reports any release failure.
    pub fn dispose(mut self) -> Result<(), FftError> {
        self.release()
    }

    pub fn engine(&self) -> &Arc<E> {
        &self.engine
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn kind(&self) -> TransformKind {
        self.kind
    }

    pub fn primitive(&self) -> ExecPrimitive {
        self.primitive
    }

    pub fn input_dtype(&self) -> Dtype {
        self.kind.input_dtype()
    }

    pub fn output_dtype(&self) -> Dtype {
        self.kind.output_dtype()
    }

    /// Elements the engine reads from the input buffer.
    pub fn input_len(&self) -> usize {
        self.kind.buffer_lens(&self.shape).0
    }

    /// Elements the engine writes to the output buffer.
    pub fn output_len(&self) -> usize {
        self.kind.buffer_lens(&self.shape).1
    }

    /// Runs the plan's primitive on raw pointers.
    ///
    /// # Safety
    /// `idata`/`odata` must be valid for [`Self::input_len`] and
    /// [`Self::output_len`] elements of the plan's dtypes in the engine's
    /// address space.
    pub(crate) unsafe fn launch(
        &mut self,
        idata: DevicePtr,
        odata: DevicePtr,
        direction: Direction,
    ) -> Result<(), FftError> {
        let handle = self.handle.as_ref().ok_or(FftError::PlanReleased)?;
        // SAFETY: forwarded from the caller.
        unsafe {
            self.primitive
                .invoke(self.engine.as_ref(), handle, idata, odata, direction)
        }
        .map_err(|source| FftError::ExecutionFailed {
            kind: self.kind,
            source,
        })
    }

    fn release(&mut self) -> Result<(), FftError> {
        let handle = self.handle.take().ok_or(FftError::PlanReleased)?;
        debug!("releasing {} plan for shape {}", self.kind, self.shape);
        self.engine
            .destroy(handle)
            .map_err(|source| FftError::PlanReleaseFailed {
                kind: self.kind,
                source,
            })
    }
}

impl<E: FftEngine> Drop for TransformPlan<E> {
    fn drop(&mut self) {
        if self.handle.is_none() {
            return;
        }
        if let Err(err) = self.release() {
            warn!("{err}");
        }
    }
}

impl<E: FftEngine> std::fmt::Debug for TransformPlan<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransformPlan")
            .field("shape", &self.shape)
            .field("kind", &self.kind)
            .field("released", &self.handle.is_none())
            .finish()
    }
}

/// Picks the engine's creation call for the shape's rank.
fn allocate<E: FftEngine + ?Sized>(
    engine: &E,
    shape: &Shape,
    kind: TransformKind,
) -> Result<E::Handle, FftError> {
    let handle = match *shape.dims() {
        [nx] => engine.plan_1d(nx, kind),
        [nx, ny] => engine.plan_2d(nx, ny, kind),
        [nx, ny, nz] => engine.plan_3d(nx, ny, nz, kind),
        _ => return Err(FftError::UnsupportedRank(shape.rank())),
    };
    handle.map_err(|source| FftError::PlanAllocationFailed { kind, source })
}
