//! cuFFT engine for gpufft, built on cudarc.
//!
//! Everything except [`is_available`] needs the `cuda` feature, which links
//! against `libcufft` and compiles the scaling kernels with NVRTC at runtime.
//!
//! # Data Layout
//!
//! Device buffers store complex numbers as contiguous `[re, im, re, im, ...]`
//! components, matching the layout cuFFT expects for `cufftComplex` and
//! `cufftDoubleComplex`.

#[cfg(feature = "cuda")]
mod buffer;
#[cfg(feature = "cuda")]
mod cufft;
#[cfg(feature = "cuda")]
mod cufft_sys;
#[cfg(feature = "cuda")]
mod kernels;

#[cfg(feature = "cuda")]
pub use backend::{CudaBackend, CudaBackendError};
#[cfg(feature = "cuda")]
pub use buffer::{CudaBuffer, CudaElement};
#[cfg(feature = "cuda")]
pub use cufft::{CufftEngine, CufftHandle};
#[cfg(feature = "cuda")]
pub use cufft_sys::CufftError;

#[cfg(feature = "cuda")]
mod backend {
    use std::sync::Arc;

    use cudarc::driver::{CudaContext, CudaStream, DriverError};
    use cudarc::nvrtc::CompileError;
    use gpufft_core::{Dtype, Precision};

    use crate::cufft::CufftEngine;
    use crate::cufft_sys::CufftError;
    use crate::kernels::ScaleKernels;

    #[derive(Debug, thiserror::Error)]
    pub enum CudaBackendError {
        #[error("CUDA driver error: {0}")]
        Driver(#[from] DriverError),
        #[error("scaling kernel compilation failed: {0}")]
        Compile(#[from] CompileError),
        #[error(transparent)]
        Cufft(#[from] CufftError),
        #[error("extent {0} exceeds the cuFFT size limit")]
        ExtentTooLarge(usize),
        #[error("{divisor:?} precision divisor cannot scale a {dtype} buffer")]
        PrecisionMismatch { divisor: Precision, dtype: Dtype },
    }

    /// One device context, its stream and the kernels compiled for it.
    ///
    /// Engines and buffers share the backend through an `Arc`, so every plan
    /// and every scaling launch is ordered on the same stream.
    pub struct CudaBackend {
        ctx: Arc<CudaContext>,
        stream: Arc<CudaStream>,
        kernels: ScaleKernels,
    }

    impl CudaBackend {
        pub fn new(ordinal: usize) -> Result<Arc<Self>, CudaBackendError> {
            let ctx = CudaContext::new(ordinal)?;
            let stream = ctx.default_stream();
            let kernels = ScaleKernels::new(&ctx)?;
            log::info!("CUDA backend ready on device {ordinal}");
            Ok(Arc::new(Self { ctx, stream, kernels }))
        }

        /// Backend on device 0, or `None` when no usable device is present.
        pub fn try_new() -> Option<Arc<Self>> {
            match Self::new(0) {
                Ok(backend) => Some(backend),
                Err(err) => {
                    log::warn!("CUDA backend unavailable: {err}");
                    None
                }
            }
        }

        pub fn engine(self: &Arc<Self>) -> Arc<CufftEngine> {
            Arc::new(CufftEngine::new(Arc::clone(self)))
        }

        pub fn context(&self) -> &Arc<CudaContext> {
            &self.ctx
        }

        pub fn stream(&self) -> &Arc<CudaStream> {
            &self.stream
        }

        pub(crate) fn kernels(&self) -> &ScaleKernels {
            &self.kernels
        }

        /// Blocks until all queued transforms and scaling launches finish.
        pub fn synchronize(&self) -> Result<(), CudaBackendError> {
            self.stream.synchronize()?;
            Ok(())
        }
    }
}

/// Whether a CUDA device can be opened.
#[cfg(feature = "cuda")]
pub fn is_available() -> bool {
    cudarc::driver::CudaContext::new(0).is_ok()
}

#[cfg(not(feature = "cuda"))]
pub fn is_available() -> bool {
    false
}

#[cfg(all(test, feature = "cuda"))]
mod _tests_cuda;
