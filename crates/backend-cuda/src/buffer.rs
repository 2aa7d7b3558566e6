//! Device buffers for the cuFFT engine.

use std::sync::Arc;

use cudarc::driver::{CudaSlice, CudaStream, DevicePtr as _, DevicePtrMut as _, DeviceRepr, ValidAsZeroBits};
use gpufft_core::{BufferDescriptor, DeviceBuffer, DevicePtr, Dtype, Element, EngineError, ScaleFactor};
use num_complex::{Complex32, Complex64};

use crate::kernels::ScaleKernels;
use crate::{CudaBackend, CudaBackendError, CufftEngine};

/// Element types that can live in a [`CudaBuffer`].
///
/// Device memory holds `COMPONENTS` scalars of type `Component` per element;
/// complex values are interleaved `[re, im]`.
pub trait CudaElement: Element {
    type Component: DeviceRepr + ValidAsZeroBits + Copy + Send + Sync + 'static;

    fn flatten(values: &[Self]) -> Vec<Self::Component>;

    fn gather(components: &[Self::Component]) -> Vec<Self>;

    fn divide(
        kernels: &ScaleKernels,
        stream: &CudaStream,
        data: &mut CudaSlice<Self::Component>,
        divisor: ScaleFactor,
    ) -> Result<(), CudaBackendError>;
}

fn divide_single(
    kernels: &ScaleKernels,
    stream: &CudaStream,
    data: &mut CudaSlice<f32>,
    divisor: ScaleFactor,
    dtype: Dtype,
) -> Result<(), CudaBackendError> {
    match divisor {
        ScaleFactor::Single(value) => kernels.divide_f32(stream, data, value),
        ScaleFactor::Double(_) => Err(CudaBackendError::PrecisionMismatch {
            divisor: divisor.precision(),
            dtype,
        }),
    }
}

fn divide_double(
    kernels: &ScaleKernels,
    stream: &CudaStream,
    data: &mut CudaSlice<f64>,
    divisor: ScaleFactor,
    dtype: Dtype,
) -> Result<(), CudaBackendError> {
    match divisor {
        ScaleFactor::Double(value) => kernels.divide_f64(stream, data, value),
        ScaleFactor::Single(_) => Err(CudaBackendError::PrecisionMismatch {
            divisor: divisor.precision(),
            dtype,
        }),
    }
}

impl CudaElement for f32 {
    type Component = f32;

    fn flatten(values: &[f32]) -> Vec<f32> {
        values.to_vec()
    }

    fn gather(components: &[f32]) -> Vec<f32> {
        components.to_vec()
    }

    fn divide(
        kernels: &ScaleKernels,
        stream: &CudaStream,
        data: &mut CudaSlice<f32>,
        divisor: ScaleFactor,
    ) -> Result<(), CudaBackendError> {
        divide_single(kernels, stream, data, divisor, Self::DTYPE)
    }
}

impl CudaElement for f64 {
    type Component = f64;

    fn flatten(values: &[f64]) -> Vec<f64> {
        values.to_vec()
    }

    fn gather(components: &[f64]) -> Vec<f64> {
        components.to_vec()
    }

    fn divide(
        kernels: &ScaleKernels,
        stream: &CudaStream,
        data: &mut CudaSlice<f64>,
        divisor: ScaleFactor,
    ) -> Result<(), CudaBackendError> {
        divide_double(kernels, stream, data, divisor, Self::DTYPE)
    }
}

impl CudaElement for Complex32 {
    type Component = f32;

    fn flatten(values: &[Complex32]) -> Vec<f32> {
        values.iter().flat_map(|c| [c.re, c.im]).collect()
    }

    fn gather(components: &[f32]) -> Vec<Complex32> {
        components.chunks_exact(2).map(|c| Complex32::new(c[0], c[1])).collect()
    }

    fn divide(
        kernels: &ScaleKernels,
        stream: &CudaStream,
        data: &mut CudaSlice<f32>,
        divisor: ScaleFactor,
    ) -> Result<(), CudaBackendError> {
        divide_single(kernels, stream, data, divisor, Self::DTYPE)
    }
}

impl CudaElement for Complex64 {
    type Component = f64;

    fn flatten(values: &[Complex64]) -> Vec<f64> {
        values.iter().flat_map(|c| [c.re, c.im]).collect()
    }

    fn gather(components: &[f64]) -> Vec<Complex64> {
        components.chunks_exact(2).map(|c| Complex64::new(c[0], c[1])).collect()
    }

    fn divide(
        kernels: &ScaleKernels,
        stream: &CudaStream,
        data: &mut CudaSlice<f64>,
        divisor: ScaleFactor,
    ) -> Result<(), CudaBackendError> {
        divide_double(kernels, stream, data, divisor, Self::DTYPE)
    }
}

/// `len` elements of `T` in device memory, owned through cudarc.
pub struct CudaBuffer<T: CudaElement> {
    backend: Arc<CudaBackend>,
    data: CudaSlice<T::Component>,
    len: usize,
}

impl<T: CudaElement> CudaBuffer<T> {
    pub fn zeros(backend: &Arc<CudaBackend>, len: usize) -> Result<Self, CudaBackendError> {
        let data = backend.stream().alloc_zeros::<T::Component>(len * T::COMPONENTS)?;
        Ok(Self {
            backend: Arc::clone(backend),
            data,
            len,
        })
    }

    pub fn from_host(backend: &Arc<CudaBackend>, values: &[T]) -> Result<Self, CudaBackendError> {
        let data = backend.stream().clone_htod(T::flatten(values).as_slice())?;
        Ok(Self {
            backend: Arc::clone(backend),
            data,
            len: values.len(),
        })
    }

    /// Copies the buffer back to the host, waiting for queued work on the stream.
    pub fn to_host(&self) -> Result<Vec<T>, CudaBackendError> {
        let components = self.backend.stream().clone_dtoh(&self.data)?;
        Ok(T::gather(&components))
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

// SAFETY: the descriptor addresses the CudaSlice allocation, which lives as
// long as the buffer and never moves.
unsafe impl<T: CudaElement> DeviceBuffer<CufftEngine> for CudaBuffer<T> {
    fn descriptor(&self) -> BufferDescriptor {
        let (ptr, _record) = self.data.device_ptr(self.backend.stream());
        BufferDescriptor::new(DevicePtr::from_raw(ptr), self.len, T::DTYPE)
    }

    fn descriptor_mut(&mut self) -> BufferDescriptor {
        let (ptr, _record) = self.data.device_ptr_mut(self.backend.stream());
        BufferDescriptor::new(DevicePtr::from_raw(ptr), self.len, T::DTYPE)
    }

    fn divide_in_place(&mut self, divisor: ScaleFactor) -> Result<(), EngineError> {
        T::divide(self.backend.kernels(), self.backend.stream(), &mut self.data, divisor)?;
        Ok(())
    }
}
