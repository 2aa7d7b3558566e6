//! Device memory as seen by the transform layer.
//!
//! Buffers are owned by a device-memory layer outside this crate. The
//! executor only reads their address, element count and dtype, and asks them
//! to divide themselves by a scalar after a normalized transform.

use crate::dtype::{Dtype, ScaleFactor};
use crate::engine::FftEngine;
use crate::error::EngineError;

/// Raw address in an engine's address space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DevicePtr(u64);

impl DevicePtr {
    pub const fn from_raw(addr: u64) -> Self {
        Self(addr)
    }

    pub const fn addr(self) -> u64 {
        self.0
    }
}

/// Address, element count and dtype of a buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferDescriptor {
    pub ptr: DevicePtr,
    pub len: usize,
    pub dtype: Dtype,
}

impl BufferDescriptor {
    pub fn new(ptr: DevicePtr, len: usize, dtype: Dtype) -> Self {
        Self { ptr, len, dtype }
    }
}

/// A buffer that engine `E` can read from and write to.
///
/// # Safety
/// The descriptor returned by [`DeviceBuffer::descriptor`] must address
/// `len` elements of `dtype` in `E`'s address space, and the memory must stay
/// valid, and not be moved, for as long as the buffer is borrowed.
pub unsafe trait DeviceBuffer<E: FftEngine + ?Sized> {
    fn descriptor(&self) -> BufferDescriptor;

    /// Descriptor for a buffer the engine will write to.
    ///
    /// Buffers whose address must come from a mutable borrow to be written
    /// through override this.
    fn descriptor_mut(&mut self) -> BufferDescriptor {
        self.descriptor()
    }

    /// Divides every element by `divisor`, in place, on the device.
    ///
    /// `divisor` is already in this buffer's component precision; complex
    /// elements divide both parts.
    fn divide_in_place(&mut self, divisor: ScaleFactor) -> Result<(), EngineError>;
}
