//! Validated transform execution.
//!
//! Every check runs before the engine is touched, in this order:
//!
//! 1. aliased input/output pointers are only allowed for complex-to-complex plans;
//! 2. complex -> real plans only run inverse;
//! 3. real -> complex plans only run forward;
//! 4. buffer dtypes match the plan's dtypes;
//! 5. buffer element counts match what the engine reads and writes;
//! 6. a scale factor, if any, is finite and non-zero once cast to the
//!    output's precision.
//!
//! After the engine call returns, an optional scale factor divides the output
//! buffer in place, in the output's own precision.

use log::trace;

use crate::buffer::{BufferDescriptor, DeviceBuffer};
use crate::dtype::ScaleFactor;
use crate::engine::FftEngine;
use crate::error::{BufferRole, FftError};
use crate::kind::Direction;
use crate::plan::TransformPlan;

/// Runs one transform from `input` into `output`.
///
/// `scale`, when present, divides every output element after the transform.
pub fn execute<E, I, O>(
    plan: &mut TransformPlan<E>,
    input: &I,
    output: &mut O,
    direction: Direction,
    scale: Option<f64>,
) -> Result<(), FftError>
where
    E: FftEngine,
    I: DeviceBuffer<E> + ?Sized,
    O: DeviceBuffer<E> + ?Sized,
{
    let src = input.descriptor();
    let dst = output.descriptor_mut();
    run(plan, src, dst, output, direction, scale)
}

/// Runs one transform that reads and writes the same buffer.
///
/// Only complex-to-complex plans accept this.
pub fn execute_in_place<E, B>(
    plan: &mut TransformPlan<E>,
    buffer: &mut B,
    direction: Direction,
    scale: Option<f64>,
) -> Result<(), FftError>
where
    E: FftEngine,
    B: DeviceBuffer<E> + ?Sized,
{
    let desc = buffer.descriptor_mut();
    run(plan, desc, desc, buffer, direction, scale)
}

/// Forward transform, optionally normalized by the input element count.
pub fn forward_transform<E, I, O>(
    plan: &mut TransformPlan<E>,
    input: &I,
    output: &mut O,
    normalize: bool,
) -> Result<(), FftError>
where
    E: FftEngine,
    I: DeviceBuffer<E> + ?Sized,
    O: DeviceBuffer<E> + ?Sized,
{
    let scale = normalize.then(|| input.descriptor().len as f64);
    execute(plan, input, output, Direction::Forward, scale)
}

/// Inverse transform, optionally normalized by the output element count.
pub fn inverse_transform<E, I, O>(
    plan: &mut TransformPlan<E>,
    input: &I,
    output: &mut O,
    normalize: bool,
) -> Result<(), FftError>
where
    E: FftEngine,
    I: DeviceBuffer<E> + ?Sized,
    O: DeviceBuffer<E> + ?Sized,
{
    let scale = normalize.then(|| output.descriptor().len as f64);
    execute(plan, input, output, Direction::Inverse, scale)
}

fn run<E, O>(
    plan: &mut TransformPlan<E>,
    src: BufferDescriptor,
    dst: BufferDescriptor,
    output: &mut O,
    direction: Direction,
    scale: Option<f64>,
) -> Result<(), FftError>
where
    E: FftEngine,
    O: DeviceBuffer<E> + ?Sized,
{
    let divisor = validate(plan, &src, &dst, direction, scale)?;

    trace!(
        "{} {} transform over {} ({} -> {} elements)",
        direction,
        plan.kind(),
        plan.shape(),
        src.len,
        dst.len
    );
    // SAFETY: `validate` checked both descriptors against the plan's dtypes
    // and element counts, and `DeviceBuffer` guarantees they address live
    // memory in `E`'s address space while borrowed.
    unsafe { plan.launch(src.ptr, dst.ptr, direction) }?;

    if let Some(divisor) = divisor {
        trace!("dividing {} output elements by {divisor:?}", dst.len);
        output
            .divide_in_place(divisor)
            .map_err(FftError::ScalingFailed)?;
    }
    Ok(())
}

/// Checks a call against the plan; returns the divisor cast to the output's
/// precision.
fn validate<E: FftEngine>(
    plan: &TransformPlan<E>,
    src: &BufferDescriptor,
    dst: &BufferDescriptor,
    direction: Direction,
    scale: Option<f64>,
) -> Result<Option<ScaleFactor>, FftError> {
    let kind = plan.kind();
    let input = plan.input_dtype();
    let output = plan.output_dtype();

    if src.ptr == dst.ptr && !kind.is_complex_to_complex() {
        return Err(FftError::IllegalInPlaceTransform(kind));
    }

    let illegal_direction = match direction {
        Direction::Forward => input.is_complex() && output.is_real(),
        Direction::Inverse => input.is_real() && output.is_complex(),
    };
    if illegal_direction {
        return Err(FftError::IllegalDirectionForKind {
            direction,
            input,
            output,
        });
    }

    for (role, desc, expected) in [
        (BufferRole::Input, src, input),
        (BufferRole::Output, dst, output),
    ] {
        if desc.dtype != expected {
            return Err(FftError::BufferDtypeMismatch {
                role,
                expected,
                actual: desc.dtype,
            });
        }
    }

    for (role, desc, expected) in [
        (BufferRole::Input, src, plan.input_len()),
        (BufferRole::Output, dst, plan.output_len()),
    ] {
        if desc.len != expected {
            return Err(FftError::BufferLengthMismatch {
                role,
                expected,
                actual: desc.len,
            });
        }
    }

    let Some(value) = scale else {
        return Ok(None);
    };
    // Checked after the cast: 1e300 overflows and 1e-50 underflows in f32.
    let divisor = output.cast_scale(value);
    if !divisor.is_finite_nonzero() {
        return Err(FftError::InvalidScaleFactor(value));
    }
    Ok(Some(divisor))
}
