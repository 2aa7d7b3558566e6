//! Vec-backed buffers that [`HostEngine`](crate::HostEngine) can address.

use gpufft_core::{BufferDescriptor, DeviceBuffer, DevicePtr, Element, EngineError, ScaleFactor};
use num_complex::{Complex32, Complex64};

use crate::HostEngine;

/// Host element types that can be divided by a [`ScaleFactor`] of their own precision.
pub trait HostElement: Element + Default {
    /// Extracts the divisor if it has this element's component precision.
    fn divisor(factor: ScaleFactor) -> Option<Self::Real>;

    fn divide(self, divisor: Self::Real) -> Self;
}

impl HostElement for f32 {
    fn divisor(factor: ScaleFactor) -> Option<f32> {
        match factor {
            ScaleFactor::Single(value) => Some(value),
            ScaleFactor::Double(_) => None,
        }
    }

    fn divide(self, divisor: f32) -> Self {
        self / divisor
    }
}

impl HostElement for f64 {
    fn divisor(factor: ScaleFactor) -> Option<f64> {
        match factor {
            ScaleFactor::Double(value) => Some(value),
            ScaleFactor::Single(_) => None,
        }
    }

    fn divide(self, divisor: f64) -> Self {
        self / divisor
    }
}

impl HostElement for Complex32 {
    fn divisor(factor: ScaleFactor) -> Option<f32> {
        f32::divisor(factor)
    }

    fn divide(self, divisor: f32) -> Self {
        self / divisor
    }
}

impl HostElement for Complex64 {
    fn divisor(factor: ScaleFactor) -> Option<f64> {
        f64::divisor(factor)
    }

    fn divide(self, divisor: f64) -> Self {
        self / divisor
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HostBuffer<T: HostElement> {
    data: Vec<T>,
}

impl<T: HostElement> HostBuffer<T> {
    pub fn from_vec(data: Vec<T>) -> Self {
        Self { data }
    }

    pub fn zeros(len: usize) -> Self {
        Self {
            data: vec![T::default(); len],
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }
}

// SAFETY: the descriptor addresses the Vec's heap allocation, which cannot be
// reallocated or freed while the buffer is borrowed. Only `descriptor_mut`,
// taken from `as_mut_ptr`, hands out an address the engine writes through.
unsafe impl<T: HostElement> DeviceBuffer<HostEngine> for HostBuffer<T> {
    fn descriptor(&self) -> BufferDescriptor {
        BufferDescriptor::new(DevicePtr::from_raw(self.data.as_ptr() as u64), self.data.len(), T::DTYPE)
    }

    fn descriptor_mut(&mut self) -> BufferDescriptor {
        BufferDescriptor::new(DevicePtr::from_raw(self.data.as_mut_ptr() as u64), self.data.len(), T::DTYPE)
    }

    fn divide_in_place(&mut self, divisor: ScaleFactor) -> Result<(), EngineError> {
        let divisor = T::divisor(divisor).ok_or_else(|| {
            format!("{:?} divisor does not match {} buffer", divisor.precision(), T::DTYPE)
        })?;
        for value in &mut self.data {
            *value = value.divide(divisor);
        }
        Ok(())
    }
}
