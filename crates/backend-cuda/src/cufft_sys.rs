//! Raw FFI bindings to the NVIDIA cuFFT library.
//!
//! Only the basic plan/exec/destroy surface is bound: 1-D, 2-D and 3-D plan
//! creation, the six execution calls, stream association and destruction.
//!
//! cuFFT documentation: https://docs.nvidia.com/cuda/cufft/

#![allow(non_camel_case_types)]

use std::ffi::{c_int, c_void};

/// cuFFT plan handle.
pub type cufftHandle = c_int;

pub type cufftReal = f32;
pub type cufftDoubleReal = f64;

/// cuFFT result/error codes.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum cufftResult {
    CUFFT_SUCCESS = 0,
    CUFFT_INVALID_PLAN = 1,
    CUFFT_ALLOC_FAILED = 2,
    CUFFT_INVALID_TYPE = 3,
    CUFFT_INVALID_VALUE = 4,
    CUFFT_INTERNAL_ERROR = 5,
    CUFFT_EXEC_FAILED = 6,
    CUFFT_SETUP_FAILED = 7,
    CUFFT_INVALID_SIZE = 8,
    CUFFT_UNALIGNED_DATA = 9,
    CUFFT_INCOMPLETE_PARAMETER_LIST = 10,
    CUFFT_INVALID_DEVICE = 11,
    CUFFT_PARSE_ERROR = 12,
    CUFFT_NO_WORKSPACE = 13,
    CUFFT_NOT_IMPLEMENTED = 14,
    CUFFT_LICENSE_ERROR = 15,
    CUFFT_NOT_SUPPORTED = 16,
}

impl cufftResult {
    pub fn to_result(self) -> Result<(), CufftError> {
        if self == cufftResult::CUFFT_SUCCESS {
            Ok(())
        } else {
            Err(CufftError(self))
        }
    }
}

/// cuFFT transform types.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum cufftType {
    CUFFT_R2C = 0x2a,
    CUFFT_C2R = 0x2c,
    CUFFT_C2C = 0x29,
    CUFFT_D2Z = 0x6a,
    CUFFT_Z2D = 0x6c,
    CUFFT_Z2Z = 0x69,
}

pub const CUFFT_FORWARD: c_int = -1;
pub const CUFFT_INVERSE: c_int = 1;

/// Single-precision complex number (matches cuComplex / `Complex32`).
#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct cufftComplex {
    pub x: f32,
    pub y: f32,
}

/// Double-precision complex number (matches cuDoubleComplex / `Complex64`).
#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct cufftDoubleComplex {
    pub x: f64,
    pub y: f64,
}

/// CUDA stream type (opaque pointer).
pub type cudaStream_t = *mut c_void;

// The library search path is configured by build.rs.
#[link(name = "cufft")]
unsafe extern "C" {
    pub fn cufftPlan1d(plan: *mut cufftHandle, nx: c_int, fft_type: cufftType, batch: c_int) -> cufftResult;

    pub fn cufftPlan2d(plan: *mut cufftHandle, nx: c_int, ny: c_int, fft_type: cufftType) -> cufftResult;

    /// `nz` is the fastest-changing, contiguous dimension.
    pub fn cufftPlan3d(
        plan: *mut cufftHandle,
        nx: c_int,
        ny: c_int,
        nz: c_int,
        fft_type: cufftType,
    ) -> cufftResult;

    pub fn cufftExecR2C(plan: cufftHandle, idata: *mut cufftReal, odata: *mut cufftComplex) -> cufftResult;

    pub fn cufftExecC2R(plan: cufftHandle, idata: *mut cufftComplex, odata: *mut cufftReal) -> cufftResult;

    /// `direction` is `CUFFT_FORWARD` or `CUFFT_INVERSE`. Unnormalized.
    pub fn cufftExecC2C(
        plan: cufftHandle,
        idata: *mut cufftComplex,
        odata: *mut cufftComplex,
        direction: c_int,
    ) -> cufftResult;

    pub fn cufftExecD2Z(
        plan: cufftHandle,
        idata: *mut cufftDoubleReal,
        odata: *mut cufftDoubleComplex,
    ) -> cufftResult;

    pub fn cufftExecZ2D(
        plan: cufftHandle,
        idata: *mut cufftDoubleComplex,
        odata: *mut cufftDoubleReal,
    ) -> cufftResult;

    pub fn cufftExecZ2Z(
        plan: cufftHandle,
        idata: *mut cufftDoubleComplex,
        odata: *mut cufftDoubleComplex,
        direction: c_int,
    ) -> cufftResult;

    /// All kernel launches for the plan go to `stream` (0 for the legacy default stream).
    pub fn cufftSetStream(plan: cufftHandle, stream: cudaStream_t) -> cufftResult;

    pub fn cufftDestroy(plan: cufftHandle) -> cufftResult;
}

/// Non-success status returned by a cuFFT call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CufftError(pub cufftResult);

impl std::fmt::Display for CufftError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "cuFFT error: {:?}", self.0)
    }
}

impl std::error::Error for CufftError {}
