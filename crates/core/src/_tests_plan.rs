#![cfg(test)]

use std::sync::Arc;

use super::_tests_support::{Call, RecordingEngine};
use super::config::PlanConfig;
use super::dispatch::ExecPrimitive;
use super::dtype::Dtype;
use super::error::FftError;
use super::kind::TransformKind;
use super::plan::TransformPlan;
use super::shape::Shape;

fn engine() -> Arc<RecordingEngine> {
    Arc::new(RecordingEngine::default())
}

#[test]
fn every_supported_pair_builds_a_plan_at_every_rank() {
    for kind in TransformKind::ALL {
        for dims in [&[16][..], &[8, 4], &[4, 4, 2]] {
            let engine = engine();
            let plan = TransformPlan::create(Arc::clone(&engine), dims, kind.input_dtype(), kind.output_dtype())
                .unwrap_or_else(|err| panic!("{kind} {dims:?}: {err}"));
            assert_eq!(plan.kind(), kind);
            assert_eq!(plan.shape().dims(), dims);
            assert_eq!(plan.input_dtype(), kind.input_dtype());
            assert_eq!(plan.output_dtype(), kind.output_dtype());
        }
    }
}

#[test]
fn creation_call_follows_rank_with_dims_in_order() {
    let engine = engine();
    let _a = TransformPlan::create(Arc::clone(&engine), &[32], Dtype::Real32, Dtype::Complex64).unwrap();
    let _b = TransformPlan::create(Arc::clone(&engine), &[8, 6], Dtype::Complex128, Dtype::Complex128).unwrap();
    let _c = TransformPlan::create(Arc::clone(&engine), &[5, 4, 3], Dtype::Complex64, Dtype::Real32).unwrap();

    assert_eq!(
        engine.calls(),
        vec![
            Call::Plan1d(32, TransformKind::R2C),
            Call::Plan2d(8, 6, TransformKind::Z2Z),
            Call::Plan3d(5, 4, 3, TransformKind::C2R),
        ]
    );
}

#[test]
fn unsupported_pairs_are_rejected_before_allocation() {
    let engine = engine();
    let mut rejected = 0;
    for input in Dtype::ALL {
        for output in Dtype::ALL {
            let supported = TransformKind::ALL
                .iter()
                .any(|kind| kind.input_dtype() == input && kind.output_dtype() == output);
            if supported {
                continue;
            }
            let err = TransformPlan::create(Arc::clone(&engine), &[8], input, output).unwrap_err();
            assert!(
                matches!(err, FftError::UnsupportedTypeCombination { input: i, output: o } if i == input && o == output),
                "{input} -> {output}: {err}"
            );
            rejected += 1;
        }
    }
    assert_eq!(rejected, 10);
    assert!(engine.calls().is_empty());
}

#[test]
fn bad_rank_is_reported_whatever_the_dtypes() {
    let engine = engine();
    for dims in [&[][..], &[2, 2, 2, 2], &[1, 2, 3, 4, 5]] {
        for (input, output) in [
            (Dtype::Real32, Dtype::Complex64),
            (Dtype::Real32, Dtype::Real64),
        ] {
            let err = TransformPlan::create(Arc::clone(&engine), dims, input, output).unwrap_err();
            assert!(
                matches!(err, FftError::UnsupportedRank(rank) if rank == dims.len()),
                "{dims:?}: {err}"
            );
        }
    }
    assert!(engine.calls().is_empty());
}

#[test]
fn allocation_failure_fails_construction() {
    let engine = engine();
    engine.fail_alloc.set(true);

    let err = TransformPlan::create(Arc::clone(&engine), &[64, 64], Dtype::Complex64, Dtype::Complex64).unwrap_err();

    assert!(matches!(
        err,
        FftError::PlanAllocationFailed {
            kind: TransformKind::C2C,
            ..
        }
    ));
    assert!(engine.destroyed().is_empty());
}

#[test]
fn dropping_a_plan_releases_its_handle_once() {
    let engine = engine();
    {
        let _plan = TransformPlan::create(Arc::clone(&engine), &[16], Dtype::Real64, Dtype::Complex128).unwrap();
        assert!(engine.destroyed().is_empty());
    }
    assert_eq!(engine.destroyed(), vec![0]);
}

#[test]
fn dispose_releases_once_and_drop_does_not_repeat_it() {
    let engine = engine();
    let plan = TransformPlan::create(Arc::clone(&engine), &[16], Dtype::Real64, Dtype::Complex128).unwrap();

    plan.dispose().unwrap();

    assert_eq!(engine.destroyed(), vec![0]);
}

#[test]
fn dispose_reports_release_failure() {
    let engine = engine();
    let plan = TransformPlan::create(Arc::clone(&engine), &[16], Dtype::Complex64, Dtype::Real32).unwrap();
    engine.fail_destroy.set(true);

    let err = plan.dispose().unwrap_err();

    assert!(matches!(
        err,
        FftError::PlanReleaseFailed {
            kind: TransformKind::C2R,
            ..
        }
    ));
    assert_eq!(engine.destroyed(), vec![0]);
}

#[test]
fn drop_swallows_release_failure() {
    let engine = engine();
    let plan = TransformPlan::create(Arc::clone(&engine), &[16], Dtype::Complex64, Dtype::Real32).unwrap();
    engine.fail_destroy.set(true);

    drop(plan);

    assert_eq!(engine.destroyed(), vec![0]);
}

#[test]
fn try_clone_allocates_an_independent_handle() {
    let engine = engine();
    let plan = TransformPlan::create(Arc::clone(&engine), &[8, 8], Dtype::Complex128, Dtype::Complex128).unwrap();

    let copy = plan.try_clone().unwrap();
    assert_eq!(copy.kind(), plan.kind());
    assert_eq!(copy.shape(), plan.shape());

    drop(plan);
    assert_eq!(engine.destroyed(), vec![0]);
    drop(copy);
    assert_eq!(engine.destroyed(), vec![0, 1]);
}

#[test]
fn plan_reports_engine_element_counts() {
    let engine = engine();

    let r2c = TransformPlan::create(Arc::clone(&engine), &[8, 6], Dtype::Real32, Dtype::Complex64).unwrap();
    assert_eq!((r2c.input_len(), r2c.output_len()), (48, 32));
    assert_eq!(r2c.primitive(), ExecPrimitive::ExecR2C);

    let z2d = TransformPlan::create(Arc::clone(&engine), &[128], Dtype::Complex128, Dtype::Real64).unwrap();
    assert_eq!((z2d.input_len(), z2d.output_len()), (65, 128));

    let c2c = TransformPlan::create(Arc::clone(&engine), &[3, 5, 7], Dtype::Complex64, Dtype::Complex64).unwrap();
    assert_eq!((c2c.input_len(), c2c.output_len()), (105, 105));
}

#[test]
fn plan_from_config() {
    let engine = engine();
    let config = PlanConfig {
        shape: vec![32, 16],
        input: Dtype::Real64,
        output: Dtype::Complex128,
    };

    let plan = TransformPlan::from_config(Arc::clone(&engine), &config).unwrap();

    assert_eq!(plan.kind(), TransformKind::D2Z);
    assert_eq!(plan.shape(), &Shape::new(&[32, 16]).unwrap());
    assert_eq!(engine.calls(), vec![Call::Plan2d(32, 16, TransformKind::D2Z)]);
}
