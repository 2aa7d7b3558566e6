#![cfg(test)]

use super::dispatch::{ExecPrimitive, resolve};
use super::dtype::Dtype;
use super::error::FftError;
use super::kind::TransformKind;

#[test]
fn dispatch_table_covers_the_six_supported_pairs() {
    let table = [
        (Dtype::Real32, Dtype::Complex64, TransformKind::R2C, ExecPrimitive::ExecR2C),
        (Dtype::Complex64, Dtype::Real32, TransformKind::C2R, ExecPrimitive::ExecC2R),
        (Dtype::Complex64, Dtype::Complex64, TransformKind::C2C, ExecPrimitive::ExecC2C),
        (Dtype::Real64, Dtype::Complex128, TransformKind::D2Z, ExecPrimitive::ExecD2Z),
        (Dtype::Complex128, Dtype::Real64, TransformKind::Z2D, ExecPrimitive::ExecZ2D),
        (Dtype::Complex128, Dtype::Complex128, TransformKind::Z2Z, ExecPrimitive::ExecZ2Z),
    ];

    for (input, output, kind, primitive) in table {
        assert_eq!(resolve(input, output).unwrap(), (kind, primitive));
        assert_eq!(kind.input_dtype(), input);
        assert_eq!(kind.output_dtype(), output);
    }
}

#[test]
fn mixed_precision_and_real_to_real_pairs_are_unsupported() {
    for (input, output) in [
        (Dtype::Real32, Dtype::Complex128),
        (Dtype::Complex64, Dtype::Complex128),
        (Dtype::Real64, Dtype::Real64),
        (Dtype::Real32, Dtype::Real32),
        (Dtype::Complex128, Dtype::Real32),
    ] {
        assert!(matches!(
            resolve(input, output),
            Err(FftError::UnsupportedTypeCombination { .. })
        ));
    }
}

#[test]
fn only_complex_to_complex_primitives_take_a_direction() {
    for kind in TransformKind::ALL {
        let (_, primitive) = resolve(kind.input_dtype(), kind.output_dtype()).unwrap();
        assert_eq!(primitive.takes_direction(), kind.is_complex_to_complex());
    }
}

#[test]
fn scale_casts_follow_component_precision() {
    use super::dtype::ScaleFactor;

    assert_eq!(Dtype::Complex64.cast_scale(128.0), ScaleFactor::Single(128.0));
    assert_eq!(Dtype::Real32.cast_scale(0.1), ScaleFactor::Single(0.1f32));
    assert_eq!(Dtype::Complex128.cast_scale(0.1), ScaleFactor::Double(0.1));
}

#[test]
fn scale_factor_range_is_judged_in_its_own_precision() {
    assert!(Dtype::Real32.cast_scale(64.0).is_finite_nonzero());
    assert!(!Dtype::Real32.cast_scale(1e300).is_finite_nonzero());
    assert!(!Dtype::Complex64.cast_scale(1e-50).is_finite_nonzero());
    assert!(Dtype::Complex128.cast_scale(1e-50).is_finite_nonzero());
    assert!(!Dtype::Real64.cast_scale(f64::NAN).is_finite_nonzero());
}

#[test]
fn byte_widths_count_both_complex_components() {
    let widths: Vec<_> = Dtype::ALL.iter().map(|d| d.byte_width()).collect();
    assert_eq!(widths, vec![4, 8, 8, 16]);
}
