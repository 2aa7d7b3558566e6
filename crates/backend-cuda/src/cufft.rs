//! cuFFT implementation of [`FftEngine`].
//!
//! Every plan is bound to the backend's stream right after creation, so
//! transforms and the scaling kernels that follow them run in stream order.

use std::ffi::c_int;
use std::sync::Arc;

use gpufft_core::{DevicePtr, Direction, EngineError, FftEngine, TransformKind};
use log::debug;

use crate::cufft_sys::{
    CUFFT_FORWARD, CUFFT_INVERSE, cudaStream_t, cufftComplex, cufftDestroy, cufftDoubleComplex, cufftDoubleReal,
    cufftExecC2C, cufftExecC2R, cufftExecD2Z, cufftExecR2C, cufftExecZ2D, cufftExecZ2Z, cufftHandle, cufftPlan1d,
    cufftPlan2d, cufftPlan3d, cufftReal, cufftResult, cufftSetStream, cufftType,
};
use crate::{CudaBackend, CudaBackendError};

/// A live cuFFT plan. Released only through [`FftEngine::destroy`].
#[derive(Debug)]
pub struct CufftHandle {
    raw: cufftHandle,
    kind: TransformKind,
}

pub struct CufftEngine {
    backend: Arc<CudaBackend>,
}

impl CufftEngine {
    pub fn new(backend: Arc<CudaBackend>) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &Arc<CudaBackend> {
        &self.backend
    }

    fn bind(&self) -> Result<(), CudaBackendError> {
        self.backend.context().bind_to_thread()?;
        Ok(())
    }

    fn create(
        &self,
        kind: TransformKind,
        plan: impl FnOnce(*mut cufftHandle, cufftType) -> cufftResult,
    ) -> Result<CufftHandle, CudaBackendError> {
        self.bind()?;
        let mut raw: cufftHandle = 0;
        plan(&raw mut raw, fft_type(kind)).to_result()?;

        let stream = self.backend.stream().cu_stream() as cudaStream_t;
        // SAFETY: `raw` was just created and is not shared.
        if let Err(err) = unsafe { cufftSetStream(raw, stream) }.to_result() {
            // SAFETY: `raw` is destroyed once and then dropped.
            let _ = unsafe { cufftDestroy(raw) };
            return Err(err.into());
        }

        debug!("created cuFFT {kind} plan {raw}");
        Ok(CufftHandle { raw, kind })
    }
}

fn fft_type(kind: TransformKind) -> cufftType {
    match kind {
        TransformKind::R2C => cufftType::CUFFT_R2C,
        TransformKind::C2R => cufftType::CUFFT_C2R,
        TransformKind::C2C => cufftType::CUFFT_C2C,
        TransformKind::D2Z => cufftType::CUFFT_D2Z,
        TransformKind::Z2D => cufftType::CUFFT_Z2D,
        TransformKind::Z2Z => cufftType::CUFFT_Z2Z,
    }
}

fn sign(direction: Direction) -> c_int {
    match direction {
        Direction::Forward => CUFFT_FORWARD,
        Direction::Inverse => CUFFT_INVERSE,
    }
}

fn extent(n: usize) -> Result<c_int, CudaBackendError> {
    c_int::try_from(n).map_err(|_| CudaBackendError::ExtentTooLarge(n))
}

fn device<T>(ptr: DevicePtr) -> *mut T {
    ptr.addr() as usize as *mut T
}

impl FftEngine for CufftEngine {
    type Handle = CufftHandle;

    fn plan_1d(&self, nx: usize, kind: TransformKind) -> Result<CufftHandle, EngineError> {
        let nx = extent(nx)?;
        // SAFETY: `plan` points at a live local handle slot.
        Ok(self.create(kind, |plan, ty| unsafe { cufftPlan1d(plan, nx, ty, 1) })?)
    }

    fn plan_2d(&self, nx: usize, ny: usize, kind: TransformKind) -> Result<CufftHandle, EngineError> {
        let (nx, ny) = (extent(nx)?, extent(ny)?);
        // SAFETY: as in `plan_1d`.
        Ok(self.create(kind, |plan, ty| unsafe { cufftPlan2d(plan, nx, ny, ty) })?)
    }

    fn plan_3d(&self, nx: usize, ny: usize, nz: usize, kind: TransformKind) -> Result<CufftHandle, EngineError> {
        let (nx, ny, nz) = (extent(nx)?, extent(ny)?, extent(nz)?);
        // SAFETY: as in `plan_1d`.
        Ok(self.create(kind, |plan, ty| unsafe { cufftPlan3d(plan, nx, ny, nz, ty) })?)
    }

    fn destroy(&self, handle: CufftHandle) -> Result<(), EngineError> {
        self.bind()?;
        // SAFETY: the handle is consumed, so nothing can use it afterwards.
        unsafe { cufftDestroy(handle.raw) }.to_result()?;
        debug!("destroyed cuFFT {} plan {}", handle.kind, handle.raw);
        Ok(())
    }

    unsafe fn exec_r2c(&self, handle: &CufftHandle, idata: DevicePtr, odata: DevicePtr) -> Result<(), EngineError> {
        self.bind()?;
        // SAFETY: the caller guarantees both pointers cover the plan's element counts.
        unsafe { cufftExecR2C(handle.raw, device::<cufftReal>(idata), device::<cufftComplex>(odata)) }.to_result()?;
        Ok(())
    }

    unsafe fn exec_c2r(&self, handle: &CufftHandle, idata: DevicePtr, odata: DevicePtr) -> Result<(), EngineError> {
        self.bind()?;
        // SAFETY: the caller guarantees both pointers cover the plan's element counts.
        unsafe { cufftExecC2R(handle.raw, device::<cufftComplex>(idata), device::<cufftReal>(odata)) }.to_result()?;
        Ok(())
    }

    unsafe fn exec_c2c(
        &self,
        handle: &CufftHandle,
        idata: DevicePtr,
        odata: DevicePtr,
        direction: Direction,
    ) -> Result<(), EngineError> {
        self.bind()?;
        // SAFETY: the caller guarantees both pointers cover the plan's element counts.
        unsafe {
            cufftExecC2C(
                handle.raw,
                device::<cufftComplex>(idata),
                device::<cufftComplex>(odata),
                sign(direction),
            )
        }
        .to_result()?;
        Ok(())
    }

    unsafe fn exec_d2z(&self, handle: &CufftHandle, idata: DevicePtr, odata: DevicePtr) -> Result<(), EngineError> {
        self.bind()?;
        // SAFETY: the caller guarantees both pointers cover the plan's element counts.
        unsafe {
            cufftExecD2Z(
                handle.raw,
                device::<cufftDoubleReal>(idata),
                device::<cufftDoubleComplex>(odata),
            )
        }
        .to_result()?;
        Ok(())
    }

    unsafe fn exec_z2d(&self, handle: &CufftHandle, idata: DevicePtr, odata: DevicePtr) -> Result<(), EngineError> {
        self.bind()?;
        // SAFETY: the caller guarantees both pointers cover the plan's element counts.
        unsafe {
            cufftExecZ2D(
                handle.raw,
                device::<cufftDoubleComplex>(idata),
                device::<cufftDoubleReal>(odata),
            )
        }
        .to_result()?;
        Ok(())
    }

    unsafe fn exec_z2z(
        &self,
        handle: &CufftHandle,
        idata: DevicePtr,
        odata: DevicePtr,
        direction: Direction,
    ) -> Result<(), EngineError> {
        self.bind()?;
        // SAFETY: the caller guarantees both pointers cover the plan's element counts.
        unsafe {
            cufftExecZ2Z(
                handle.raw,
                device::<cufftDoubleComplex>(idata),
                device::<cufftDoubleComplex>(odata),
                sign(direction),
            )
        }
        .to_result()?;
        Ok(())
    }
}
