//! NVRTC kernels for in-place output scaling.
//!
//! Complex buffers are stored as interleaved `[re, im, re, im, ...]`
//! components, so one real-valued division kernel per precision covers both
//! real and complex outputs.

use std::sync::Arc;

use cudarc::driver::{CudaContext, CudaFunction, CudaModule, CudaSlice, CudaStream, LaunchConfig, PushKernelArg};

use crate::CudaBackendError;

const KERNEL_SOURCE: &str = r#"
extern "C" {

__global__ void divide_f32(float* __restrict__ data, float divisor, size_t n) {
    size_t i = (size_t)blockIdx.x * blockDim.x + threadIdx.x;
    if (i < n) {
        data[i] /= divisor;
    }
}

__global__ void divide_f64(double* __restrict__ data, double divisor, size_t n) {
    size_t i = (size_t)blockIdx.x * blockDim.x + threadIdx.x;
    if (i < n) {
        data[i] /= divisor;
    }
}

}
"#;

/// Compiled scaling kernels, loaded once per context.
pub struct ScaleKernels {
    _module: Arc<CudaModule>,
    divide_f32: CudaFunction,
    divide_f64: CudaFunction,
}

impl ScaleKernels {
    pub fn new(ctx: &Arc<CudaContext>) -> Result<Self, CudaBackendError> {
        log::info!("Compiling CUDA scaling kernels...");

        let ptx = cudarc::nvrtc::compile_ptx(KERNEL_SOURCE)?;
        let module = ctx.load_module(ptx)?;
        let divide_f32 = module.load_function("divide_f32")?;
        let divide_f64 = module.load_function("divide_f64")?;

        log::info!("CUDA scaling kernels compiled successfully");

        Ok(Self {
            _module: module,
            divide_f32,
            divide_f64,
        })
    }

    fn launch_config(n: usize) -> LaunchConfig {
        const BLOCK_SIZE: u32 = 256;
        let grid_size = n.div_ceil(BLOCK_SIZE as usize) as u32;
        LaunchConfig {
            grid_dim: (grid_size, 1, 1),
            block_dim: (BLOCK_SIZE, 1, 1),
            shared_mem_bytes: 0,
        }
    }

    /// Divides every component of `data` by `divisor` on `stream`.
    pub fn divide_f32(&self, stream: &CudaStream, data: &mut CudaSlice<f32>, divisor: f32) -> Result<(), CudaBackendError> {
        let n = data.len();
        if n == 0 {
            return Ok(());
        }
        let cfg = Self::launch_config(n);
        // SAFETY: the kernel reads and writes exactly `n` floats of `data`.
        unsafe {
            stream
                .launch_builder(&self.divide_f32)
                .arg(data)
                .arg(&divisor)
                .arg(&n)
                .launch(cfg)?;
        }
        Ok(())
    }

    /// Divides every component of `data` by `divisor` on `stream`.
    pub fn divide_f64(&self, stream: &CudaStream, data: &mut CudaSlice<f64>, divisor: f64) -> Result<(), CudaBackendError> {
        let n = data.len();
        if n == 0 {
            return Ok(());
        }
        let cfg = Self::launch_config(n);
        // SAFETY: the kernel reads and writes exactly `n` doubles of `data`.
        unsafe {
            stream
                .launch_builder(&self.divide_f64)
                .arg(data)
                .arg(&divisor)
                .arg(&n)
                .launch(cfg)?;
        }
        Ok(())
    }
}
