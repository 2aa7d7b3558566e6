#![cfg(test)]

use super::error::FftError;
use super::shape::Shape;

#[test]
fn shape_accepts_one_to_three_axes() {
    let shape = Shape::new(&[128]).unwrap();
    assert_eq!(shape.rank(), 1);
    assert_eq!(shape.len(), 128);

    let shape = Shape::new(&[4, 6, 8]).unwrap();
    assert_eq!(shape.dims(), &[4, 6, 8]);
    assert_eq!(shape.len(), 192);
    assert_eq!(shape.to_string(), "4x6x8");
}

#[test]
fn shape_rejects_empty_and_high_rank() {
    assert!(matches!(Shape::new(&[]), Err(FftError::UnsupportedRank(0))));
    assert!(matches!(Shape::new(&[2, 2, 2, 2]), Err(FftError::UnsupportedRank(4))));
}

#[test]
fn shape_rejects_zero_and_oversized_extents() {
    assert!(matches!(
        Shape::new(&[8, 0]),
        Err(FftError::InvalidDimension { axis: 1, extent: 0 })
    ));
    let too_big = i32::MAX as usize + 1;
    assert!(matches!(
        Shape::new(&[too_big]),
        Err(FftError::InvalidDimension { axis: 0, .. })
    ));
}

#[test]
fn shape_rejects_element_count_overflow() {
    let extent = i32::MAX as usize;
    let err = Shape::new(&[extent; 3]).unwrap_err();
    assert!(
        matches!(&err, FftError::ShapeOverflow(dims) if dims == &vec![extent; 3]),
        "{err}"
    );
}

#[test]
fn half_spectrum_halves_the_last_axis_only() {
    assert_eq!(Shape::new(&[128]).unwrap().half_spectrum_len(), 65);
    assert_eq!(Shape::new(&[127]).unwrap().half_spectrum_len(), 64);
    assert_eq!(Shape::new(&[4, 6]).unwrap().half_spectrum_len(), 16);
    assert_eq!(Shape::new(&[3, 5, 1]).unwrap().half_spectrum_len(), 15);
}

#[test]
fn scalar_extent_builds_a_one_dimensional_shape() {
    let shape = Shape::try_from(64usize).unwrap();
    assert_eq!(shape.dims(), &[64]);

    let shape = Shape::try_from([8, 8]).unwrap();
    assert_eq!(shape.rank(), 2);
}
