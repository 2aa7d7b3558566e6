//! Device tests. Each one returns early when no CUDA device is present.

#![cfg(test)]

use std::sync::Arc;

use gpufft_backend_cpu::{HostBuffer, HostEngine};
use gpufft_core::{
    DeviceBuffer, Direction, Dtype, FftError, ScaleFactor, TransformKind, TransformPlan, execute, execute_in_place,
    forward_transform, inverse_transform,
};
use num_complex::{Complex32, Complex64};

use crate::{CudaBackend, CudaBackendError, CudaBuffer};

fn backend(test: &str) -> Option<Arc<CudaBackend>> {
    let backend = CudaBackend::try_new();
    if backend.is_none() {
        eprintln!("Skipping {test}: CUDA not available");
    }
    backend
}

fn signal(len: usize) -> Vec<f64> {
    (0..len).map(|i| 0.5 + 0.25 * (0.41 * i as f64).sin() - 0.1 * (2.3 * i as f64).cos()).collect()
}

#[test]
fn r2c_matches_host_engine() {
    let Some(backend) = backend("r2c_matches_host_engine") else {
        return;
    };
    let x: Vec<f32> = signal(128).into_iter().map(|v| v as f32).collect();

    let mut gpu_plan = TransformPlan::create(backend.engine(), &[128], Dtype::Real32, Dtype::Complex64).unwrap();
    let input = CudaBuffer::from_host(&backend, &x).unwrap();
    let mut output = CudaBuffer::<Complex32>::zeros(&backend, 65).unwrap();
    forward_transform(&mut gpu_plan, &input, &mut output, false).unwrap();
    let gpu = output.to_host().unwrap();

    let mut host_plan =
        TransformPlan::create(Arc::new(HostEngine::new()), &[128], Dtype::Real32, Dtype::Complex64).unwrap();
    let host_input = HostBuffer::from_vec(x);
    let mut host_output = HostBuffer::<Complex32>::zeros(65);
    forward_transform(&mut host_plan, &host_input, &mut host_output, false).unwrap();

    assert_eq!(gpu.len(), 65);
    for (k, (g, h)) in gpu.iter().zip(host_output.as_slice()).enumerate() {
        assert!((g - h).norm() < 1e-3, "bin {k}: gpu {g} vs host {h}");
    }
}

#[test]
fn z2z_in_place_roundtrip_normalizes() {
    let Some(backend) = backend("z2z_in_place_roundtrip_normalizes") else {
        return;
    };
    let dims = [8, 4, 6];
    let data: Vec<Complex64> = signal(192)
        .into_iter()
        .enumerate()
        .map(|(i, v)| Complex64::new(v, (i % 7) as f64))
        .collect();

    let mut plan = TransformPlan::create(backend.engine(), &dims, Dtype::Complex128, Dtype::Complex128).unwrap();
    let mut buffer = CudaBuffer::from_host(&backend, &data).unwrap();
    execute_in_place(&mut plan, &mut buffer, Direction::Forward, None).unwrap();
    execute_in_place(&mut plan, &mut buffer, Direction::Inverse, Some(192.0)).unwrap();

    for (got, want) in buffer.to_host().unwrap().iter().zip(&data) {
        assert!((got - want).norm() < 1e-10, "got {got}, want {want}");
    }
}

#[test]
fn d2z_z2d_roundtrip_on_odd_2d_shape() {
    let Some(backend) = backend("d2z_z2d_roundtrip_on_odd_2d_shape") else {
        return;
    };
    let dims = [9, 15];
    let engine = backend.engine();
    let mut forward = TransformPlan::create(Arc::clone(&engine), &dims, Dtype::Real64, Dtype::Complex128).unwrap();
    let mut inverse = TransformPlan::create(Arc::clone(&engine), &dims, Dtype::Complex128, Dtype::Real64).unwrap();
    assert_eq!(forward.output_len(), 9 * 8);

    let x = signal(135);
    let input = CudaBuffer::from_host(&backend, &x).unwrap();
    let mut spectrum = CudaBuffer::<Complex64>::zeros(&backend, forward.output_len()).unwrap();
    let mut recovered = CudaBuffer::<f64>::zeros(&backend, 135).unwrap();
    forward_transform(&mut forward, &input, &mut spectrum, false).unwrap();
    inverse_transform(&mut inverse, &spectrum, &mut recovered, true).unwrap();

    for (got, want) in recovered.to_host().unwrap().iter().zip(&x) {
        assert!((got - want).abs() < 1e-12, "got {got}, want {want}");
    }
}

#[test]
fn c2c_scaling_matches_unscaled_output() {
    let Some(backend) = backend("c2c_scaling_matches_unscaled_output") else {
        return;
    };
    let data: Vec<Complex32> = signal(64).into_iter().map(|v| Complex32::new(v as f32, 1.0)).collect();
    let mut plan = TransformPlan::create(backend.engine(), &[64], Dtype::Complex64, Dtype::Complex64).unwrap();
    let input = CudaBuffer::from_host(&backend, &data).unwrap();

    let mut unscaled = CudaBuffer::<Complex32>::zeros(&backend, 64).unwrap();
    execute(&mut plan, &input, &mut unscaled, Direction::Forward, None).unwrap();
    let mut scaled = CudaBuffer::<Complex32>::zeros(&backend, 64).unwrap();
    execute(&mut plan, &input, &mut scaled, Direction::Forward, Some(4.0)).unwrap();

    for (u, s) in unscaled.to_host().unwrap().iter().zip(scaled.to_host().unwrap()) {
        assert!((u / 4.0 - s).norm() < 1e-4);
    }
}

#[test]
fn divide_kernel_covers_both_components() {
    let Some(backend) = backend("divide_kernel_covers_both_components") else {
        return;
    };
    let mut buffer = CudaBuffer::from_host(&backend, &[Complex64::new(2.0, -4.0), Complex64::new(6.0, 8.0)]).unwrap();

    buffer.divide_in_place(ScaleFactor::Double(2.0)).unwrap();
    assert_eq!(
        buffer.to_host().unwrap(),
        vec![Complex64::new(1.0, -2.0), Complex64::new(3.0, 4.0)]
    );

    let err = buffer.divide_in_place(ScaleFactor::Single(2.0)).unwrap_err();
    assert!(err.downcast_ref::<CudaBackendError>().is_some_and(|e| matches!(e, CudaBackendError::PrecisionMismatch { .. })));
}

#[test]
fn in_place_r2c_is_rejected_before_cufft_runs() {
    let Some(backend) = backend("in_place_r2c_is_rejected_before_cufft_runs") else {
        return;
    };
    let mut plan = TransformPlan::create(backend.engine(), &[32], Dtype::Real32, Dtype::Complex64).unwrap();
    let mut buffer = CudaBuffer::<f32>::zeros(&backend, 32).unwrap();

    let err = execute_in_place(&mut plan, &mut buffer, Direction::Forward, None).unwrap_err();

    assert!(matches!(err, FftError::IllegalInPlaceTransform(TransformKind::R2C)));
}

#[test]
fn plans_of_every_kind_and_rank_dispose_cleanly() {
    let Some(backend) = backend("plans_of_every_kind_and_rank_dispose_cleanly") else {
        return;
    };
    let engine = backend.engine();
    for kind in TransformKind::ALL {
        for dims in [&[64][..], &[48, 48], &[16, 8, 4]] {
            let plan = TransformPlan::create(Arc::clone(&engine), dims, kind.input_dtype(), kind.output_dtype())
                .unwrap_or_else(|err| panic!("{kind} {dims:?}: {err}"));
            let copy = plan.try_clone().unwrap();
            plan.dispose().unwrap();
            copy.dispose().unwrap();
        }
    }
    backend.synchronize().unwrap();
}

#[test]
fn write_descriptor_matches_read_descriptor() {
    let Some(backend) = backend("write_descriptor_matches_read_descriptor") else {
        return;
    };
    let mut buffer = CudaBuffer::<f64>::zeros(&backend, 16).unwrap();

    let read = buffer.descriptor();
    let write = buffer.descriptor_mut();

    assert_eq!(read, write);
    assert_eq!(write.dtype, Dtype::Real64);
}
