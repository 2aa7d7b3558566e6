//! The transform engine seam.
//!
//! An engine allocates opaque plan handles for a fixed shape and kind and runs
//! the six execution calls against raw device pointers. Transforms are
//! unnormalized: a forward transform followed by an inverse one scales the
//! signal by its sample count.
//!
//! Layout contract shared by all engines: row-major, last extent fastest;
//! real/complex transforms keep `n_last/2 + 1` coefficients on the last axis.

use crate::buffer::DevicePtr;
use crate::error::EngineError;
use crate::kind::{Direction, TransformKind};

pub trait FftEngine {
    /// Engine-side plan. Owned by exactly one `TransformPlan`, released through
    /// [`FftEngine::destroy`].
    type Handle;

    fn plan_1d(&self, nx: usize, kind: TransformKind) -> Result<Self::Handle, EngineError>;

    fn plan_2d(&self, nx: usize, ny: usize, kind: TransformKind)
    -> Result<Self::Handle, EngineError>;

    fn plan_3d(
        &self,
        nx: usize,
        ny: usize,
        nz: usize,
        kind: TransformKind,
    ) -> Result<Self::Handle, EngineError>;

    fn destroy(&self, handle: Self::Handle) -> Result<(), EngineError>;

    /// # Safety
    /// `idata`/`odata` must be valid for the plan's input/output element counts.
    unsafe fn exec_r2c(
        &self,
        handle: &Self::Handle,
        idata: DevicePtr,
        odata: DevicePtr,
    ) -> Result<(), EngineError>;

    /// # Safety
    /// See [`FftEngine::exec_r2c`].
    unsafe fn exec_c2r(
        &self,
        handle: &Self::Handle,
        idata: DevicePtr,
        odata: DevicePtr,
    ) -> Result<(), EngineError>;

    /// # Safety
    /// See [`FftEngine::exec_r2c`]. `idata == odata` is allowed.
    unsafe fn exec_c2c(
        &self,
        handle: &Self::Handle,
        idata: DevicePtr,
        odata: DevicePtr,
        direction: Direction,
    ) -> Result<(), EngineError>;

    /// # Safety
    /// See [`FftEngine::exec_r2c`].
    unsafe fn exec_d2z(
        &self,
        handle: &Self::Handle,
        idata: DevicePtr,
        odata: DevicePtr,
    ) -> Result<(), EngineError>;

    /// # Safety
    /// See [`FftEngine::exec_r2c`].
    unsafe fn exec_z2d(
        &self,
        handle: &Self::Handle,
        idata: DevicePtr,
        odata: DevicePtr,
    ) -> Result<(), EngineError>;

    /// # Safety
    /// See [`FftEngine::exec_r2c`]. `idata == odata` is allowed.
    unsafe fn exec_z2z(
        &self,
        handle: &Self::Handle,
        idata: DevicePtr,
        odata: DevicePtr,
        direction: Direction,
    ) -> Result<(), EngineError>;
}
