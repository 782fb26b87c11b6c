//! Tests for scalar field adapters.

use super::*;
use approx::assert_relative_eq;
use std::cell::Cell;

fn unit_sphere(p: DVec3) -> f64 {
    p.length() - 1.0
}

#[test]
fn test_closure_is_scalar_field() {
    let plane = |p: DVec3| p.z - 0.5;
    assert_eq!(plane.eval(DVec3::new(3.0, 4.0, 0.5)), 0.0);
}

#[test]
fn test_polygonizer_field_rejects_null() {
    let err = PolygonizerField::<fn(DVec3) -> f64>::new(None).unwrap_err();
    assert!(matches!(err, MesherError::NullEvaluator));
}

#[test]
fn test_refinement_field_rejects_null() {
    let err = RefinementField::<fn(DVec3) -> f64>::new(None).unwrap_err();
    assert!(matches!(err, MesherError::NullEvaluator));
}

#[test]
fn test_polygonizer_field_casts_to_f32() {
    let field = unit_sphere;
    let adapter = PolygonizerField::new(Some(&field)).unwrap();
    assert_eq!(adapter.eval(0.0, 0.0, 0.0), -1.0f32);
    assert_relative_eq!(adapter.eval(2.0, 0.0, 0.0), 1.0f32);
}

#[test]
fn test_refinement_field_forwards() {
    let field = unit_sphere;
    let adapter = RefinementField::new(Some(&field)).unwrap();
    assert_eq!(adapter.eval(DVec3::new(0.0, 3.0, 0.0)), 2.0);
}

#[test]
fn test_adapters_do_not_cache() {
    let calls = Cell::new(0usize);
    let field = |p: DVec3| {
        calls.set(calls.get() + 1);
        p.x
    };
    let adapter = RefinementField::new(Some(&field)).unwrap();
    for _ in 0..5 {
        adapter.eval(DVec3::ONE);
    }
    assert_eq!(calls.get(), 5);
}

#[test]
fn test_normal_points_along_gradient() {
    let field = unit_sphere;
    let adapter = PolygonizerField::new(Some(&field)).unwrap();
    let n = adapter.normal(Vec3::new(0.0, 1.0, 0.0), 1e-3);
    assert_relative_eq!(n.length(), 1.0, epsilon = 1e-5);
    assert!(n.y > 0.99);
}

#[test]
fn test_normal_of_flat_field_is_zero() {
    let field = |_: DVec3| 1.0;
    let adapter = PolygonizerField::new(Some(&field)).unwrap();
    assert_eq!(adapter.normal(Vec3::ZERO, 1e-3), Vec3::ZERO);
}

#[test]
fn test_unsized_field() {
    let boxed: Box<dyn Fn(DVec3) -> f64> = Box::new(unit_sphere);
    let adapter = RefinementField::new(Some(boxed.as_ref())).unwrap();
    assert_eq!(adapter.eval(DVec3::ZERO), -1.0);
}
