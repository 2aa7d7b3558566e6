//! Host-memory FFT engine built on rustfft.
//!
//! `HostEngine` follows the same contract as the cuFFT engine: unnormalized
//! transforms, row-major data with the last extent fastest, and
//! `n_last/2 + 1` coefficients on the last axis of real/complex transforms.
//! "Device" pointers are plain host addresses, handed out by [`HostBuffer`].

mod buffer;

use std::sync::Arc;

use gpufft_core::{DevicePtr, Direction, EngineError, FftEngine, Precision, TransformKind};
use log::trace;
use num_complex::Complex;
use parking_lot::Mutex;
use rustfft::{Fft, FftNum, FftPlanner};

pub use buffer::{HostBuffer, HostElement};

/// Engine misuse detected by [`HostEngine`].
#[derive(Debug, thiserror::Error)]
pub enum HostEngineError {
    #[error("{call} called on a {actual} plan")]
    KindMismatch {
        call: TransformKind,
        actual: TransformKind,
    },
}

pub struct HostEngine {
    single: Mutex<FftPlanner<f32>>,
    double: Mutex<FftPlanner<f64>>,
}

impl HostEngine {
    pub fn new() -> Self {
        Self {
            single: Mutex::new(FftPlanner::new()),
            double: Mutex::new(FftPlanner::new()),
        }
    }

    fn plan(&self, dims: &[usize], kind: TransformKind) -> HostPlan {
        let axes = match kind.input_dtype().precision() {
            Precision::Single => AxisPlans::Single(AxisFfts::new(&mut self.single.lock(), dims)),
            Precision::Double => AxisPlans::Double(AxisFfts::new(&mut self.double.lock(), dims)),
        };
        trace!("planned host {kind} transform over {dims:?}");
        HostPlan {
            kind,
            dims: dims.to_vec(),
            axes,
        }
    }
}

impl Default for HostEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-axis rustfft plans for one shape.
pub struct HostPlan {
    kind: TransformKind,
    dims: Vec<usize>,
    axes: AxisPlans,
}

enum AxisPlans {
    Single(AxisFfts<f32>),
    Double(AxisFfts<f64>),
}

struct AxisFfts<T: FftNum> {
    forward: Vec<Arc<dyn Fft<T>>>,
    inverse: Vec<Arc<dyn Fft<T>>>,
}

impl<T: FftNum> AxisFfts<T> {
    fn new(planner: &mut FftPlanner<T>, dims: &[usize]) -> Self {
        Self {
            forward: dims.iter().map(|&n| planner.plan_fft_forward(n)).collect(),
            inverse: dims.iter().map(|&n| planner.plan_fft_inverse(n)).collect(),
        }
    }

    fn for_direction(&self, direction: Direction) -> &[Arc<dyn Fft<T>>] {
        match direction {
            Direction::Forward => &self.forward,
            Direction::Inverse => &self.inverse,
        }
    }
}

impl HostPlan {
    fn single(&self, call: TransformKind) -> Result<&AxisFfts<f32>, HostEngineError> {
        match &self.axes {
            AxisPlans::Single(axes) if self.kind == call => Ok(axes),
            _ => Err(HostEngineError::KindMismatch {
                call,
                actual: self.kind,
            }),
        }
    }

    fn double(&self, call: TransformKind) -> Result<&AxisFfts<f64>, HostEngineError> {
        match &self.axes {
            AxisPlans::Double(axes) if self.kind == call => Ok(axes),
            _ => Err(HostEngineError::KindMismatch {
                call,
                actual: self.kind,
            }),
        }
    }
}

impl FftEngine for HostEngine {
    type Handle = HostPlan;

    fn plan_1d(&self, nx: usize, kind: TransformKind) -> Result<HostPlan, EngineError> {
        Ok(self.plan(&[nx], kind))
    }

    fn plan_2d(&self, nx: usize, ny: usize, kind: TransformKind) -> Result<HostPlan, EngineError> {
        Ok(self.plan(&[nx, ny], kind))
    }

    fn plan_3d(&self, nx: usize, ny: usize, nz: usize, kind: TransformKind) -> Result<HostPlan, EngineError> {
        Ok(self.plan(&[nx, ny, nz], kind))
    }

    fn destroy(&self, handle: HostPlan) -> Result<(), EngineError> {
        trace!("dropping host {} plan over {:?}", handle.kind, handle.dims);
        Ok(())
    }

    unsafe fn exec_r2c(&self, handle: &HostPlan, idata: DevicePtr, odata: DevicePtr) -> Result<(), EngineError> {
        let axes = handle.single(TransformKind::R2C)?;
        unsafe { real_to_complex(&handle.dims, axes, idata, odata) };
        Ok(())
    }

    unsafe fn exec_c2r(&self, handle: &HostPlan, idata: DevicePtr, odata: DevicePtr) -> Result<(), EngineError> {
        let axes = handle.single(TransformKind::C2R)?;
        unsafe { complex_to_real(&handle.dims, axes, idata, odata) };
        Ok(())
    }

    unsafe fn exec_c2c(
        &self,
        handle: &HostPlan,
        idata: DevicePtr,
        odata: DevicePtr,
        direction: Direction,
    ) -> Result<(), EngineError> {
        let axes = handle.single(TransformKind::C2C)?;
        unsafe { complex_to_complex(&handle.dims, axes.for_direction(direction), idata, odata) };
        Ok(())
    }

    unsafe fn exec_d2z(&self, handle: &HostPlan, idata: DevicePtr, odata: DevicePtr) -> Result<(), EngineError> {
        let axes = handle.double(TransformKind::D2Z)?;
        unsafe { real_to_complex(&handle.dims, axes, idata, odata) };
        Ok(())
    }

    unsafe fn exec_z2d(&self, handle: &HostPlan, idata: DevicePtr, odata: DevicePtr) -> Result<(), EngineError> {
        let axes = handle.double(TransformKind::Z2D)?;
        unsafe { complex_to_real(&handle.dims, axes, idata, odata) };
        Ok(())
    }

    unsafe fn exec_z2z(
        &self,
        handle: &HostPlan,
        idata: DevicePtr,
        odata: DevicePtr,
        direction: Direction,
    ) -> Result<(), EngineError> {
        let axes = handle.double(TransformKind::Z2Z)?;
        unsafe { complex_to_complex(&handle.dims, axes.for_direction(direction), idata, odata) };
        Ok(())
    }
}

// ============================================================================
// Host transforms
// ============================================================================
//
// Each routine copies its input into a scratch vector before it creates the
// output slice, so aliased input/output pointers never overlap as live slices.

/// # Safety
/// `ptr` must be a host address valid for `len` reads of `T`.
unsafe fn host_slice<'a, T>(ptr: DevicePtr, len: usize) -> &'a [T] {
    unsafe { std::slice::from_raw_parts(ptr.addr() as usize as *const T, len) }
}

/// # Safety
/// `ptr` must be a host address valid for `len` writes of `T`, with no other
/// live reference to that memory.
unsafe fn host_slice_mut<'a, T>(ptr: DevicePtr, len: usize) -> &'a mut [T] {
    unsafe { std::slice::from_raw_parts_mut(ptr.addr() as usize as *mut T, len) }
}

fn half_spectrum(dims: &[usize]) -> (usize, usize, usize) {
    let len: usize = dims.iter().product();
    let last = dims[dims.len() - 1];
    let half = last / 2 + 1;
    (len, last, half)
}

unsafe fn complex_to_complex<T: FftNum>(
    dims: &[usize],
    ffts: &[Arc<dyn Fft<T>>],
    idata: DevicePtr,
    odata: DevicePtr,
) {
    let len: usize = dims.iter().product();
    let mut work = unsafe { host_slice::<Complex<T>>(idata, len) }.to_vec();
    transform_axes(&mut work, dims, ffts);
    unsafe { host_slice_mut::<Complex<T>>(odata, len) }.copy_from_slice(&work);
}

unsafe fn real_to_complex<T: FftNum>(dims: &[usize], axes: &AxisFfts<T>, idata: DevicePtr, odata: DevicePtr) {
    let (len, last, half) = half_spectrum(dims);
    let mut work: Vec<Complex<T>> = unsafe { host_slice::<T>(idata, len) }
        .iter()
        .map(|&re| Complex::new(re, T::zero()))
        .collect();
    transform_axes(&mut work, dims, &axes.forward);

    let out = unsafe { host_slice_mut::<Complex<T>>(odata, len / last * half) };
    for (row, dst) in work.chunks_exact(last).zip(out.chunks_exact_mut(half)) {
        dst.copy_from_slice(&row[..half]);
    }
}

unsafe fn complex_to_real<T: FftNum>(dims: &[usize], axes: &AxisFfts<T>, idata: DevicePtr, odata: DevicePtr) {
    let (len, last, half) = half_spectrum(dims);
    let spectrum = unsafe { host_slice::<Complex<T>>(idata, len / last * half) };
    let mut work = hermitian_extend(spectrum, dims);
    transform_axes(&mut work, dims, &axes.inverse);

    let out = unsafe { host_slice_mut::<T>(odata, len) };
    for (dst, value) in out.iter_mut().zip(&work) {
        *dst = value.re;
    }
}

/// Runs one 1-D transform along every axis, last axis first.
fn transform_axes<T: FftNum>(data: &mut [Complex<T>], dims: &[usize], ffts: &[Arc<dyn Fft<T>>]) {
    let mut stride = 1;
    for (axis, fft) in ffts.iter().enumerate().rev() {
        let n = dims[axis];
        if stride == 1 {
            for line in data.chunks_exact_mut(n) {
                fft.process(line);
            }
        } else {
            // Gather/scatter strided lines
            let mut line = vec![Complex::new(T::zero(), T::zero()); n];
            for block in data.chunks_exact_mut(n * stride) {
                for offset in 0..stride {
                    for (k, value) in line.iter_mut().enumerate() {
                        *value = block[offset + k * stride];
                    }
                    fft.process(&mut line);
                    for (k, value) in line.iter().enumerate() {
                        block[offset + k * stride] = *value;
                    }
                }
            }
        }
        stride *= n;
    }
}

/// Rebuilds the full spectrum of a real signal from its half spectrum using
/// `X[k] = conj(X[-k])`.
fn hermitian_extend<T: FftNum>(spectrum: &[Complex<T>], dims: &[usize]) -> Vec<Complex<T>> {
    let rank = dims.len();
    let (len, _, half) = half_spectrum(dims);
    let mut full = Vec::with_capacity(len);
    let mut index = [0usize; 3];
    let mut mirrored = [0usize; 3];

    for _ in 0..len {
        let value = if index[rank - 1] < half {
            spectrum[half_offset(&index[..rank], dims, half)]
        } else {
            for axis in 0..rank {
                mirrored[axis] = (dims[axis] - index[axis]) % dims[axis];
            }
            spectrum[half_offset(&mirrored[..rank], dims, half)].conj()
        };
        full.push(value);

        for axis in (0..rank).rev() {
            index[axis] += 1;
            if index[axis] < dims[axis] {
                break;
            }
            index[axis] = 0;
        }
    }
    full
}

/// Row-major offset into a half spectrum whose last extent is `half`.
fn half_offset(index: &[usize], dims: &[usize], half: usize) -> usize {
    let last = dims.len() - 1;
    index.iter().enumerate().fold(0, |offset, (axis, &k)| {
        let extent = if axis == last { half } else { dims[axis] };
        offset * extent + k
    })
}
