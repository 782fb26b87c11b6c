//! Tests for the continuation polygonizer.

use super::*;
use approx::assert_relative_eq;
use glam::DVec3;

fn unit_sphere(p: DVec3) -> f64 {
    p.length() - 1.0
}

fn march_sphere(tetrahedralize: bool) -> Polygonization {
    let field = unit_sphere;
    let adapter = PolygonizerField::new(Some(&field)).unwrap();
    Polygonizer::new(adapter, 0.2, 10)
        .march(tetrahedralize, Vec3::X)
        .unwrap()
}

/// Every directed edge must be matched by exactly one opposite edge.
fn assert_closed_and_oriented(result: &Polygonization) {
    let mut directed = HashMap::new();
    for tri in result.triangles() {
        for k in 0..3 {
            let edge = (tri[k], tri[(k + 1) % 3]);
            *directed.entry(edge).or_insert(0usize) += 1;
        }
    }
    for (&(a, b), &count) in &directed {
        assert_eq!(count, 1, "edge ({a}, {b}) used {count} times");
        assert_eq!(directed.get(&(b, a)), Some(&1), "edge ({a}, {b}) has no twin");
    }
}

#[test]
fn test_sphere_vertices_lie_on_surface() {
    for tetrahedralize in [false, true] {
        let result = march_sphere(tetrahedralize);
        assert!(result.triangle_count() > 0);
        for v in result.vertices() {
            assert_relative_eq!(v.length(), 1.0, epsilon = 1e-2);
        }
    }
}

#[test]
fn test_normals_are_unit_and_radial() {
    let result = march_sphere(false);
    assert_eq!(result.normals().len(), result.vertex_count());
    for (v, n) in result.vertices().iter().zip(result.normals()) {
        assert_relative_eq!(n.length(), 1.0, epsilon = 1e-4);
        assert!(n.dot(v.normalize()) > 0.9);
    }
}

#[test]
fn test_triangles_face_positive_side() {
    for tetrahedralize in [false, true] {
        let result = march_sphere(tetrahedralize);
        let v = result.vertices();
        for tri in result.triangles() {
            let (a, b, c) = (v[tri[0] as usize], v[tri[1] as usize], v[tri[2] as usize]);
            let normal = (b - a).cross(c - a);
            let centroid = (a + b + c) / 3.0;
            assert!(normal.dot(centroid) > 0.0, "triangle {tri:?} faces inward");
        }
    }
}

#[test]
fn test_sphere_is_closed() {
    assert_closed_and_oriented(&march_sphere(false));
    assert_closed_and_oriented(&march_sphere(true));
}

#[test]
fn test_sphere_euler_characteristic() {
    let result = march_sphere(true);
    let v = result.vertex_count() as i64;
    let f = result.triangle_count() as i64;
    // Closed triangle mesh: E = 3F / 2.
    let e = 3 * f / 2;
    assert_eq!(v - e + f, 2);
}

#[test]
fn test_tetrahedral_mode_yields_more_triangles() {
    let cubes = march_sphere(false);
    let tets = march_sphere(true);
    assert!(tets.triangle_count() > cubes.triangle_count());
}

#[test]
fn test_indices_in_range() {
    let result = march_sphere(true);
    let count = result.vertex_count() as u32;
    assert!(result.triangles().iter().flatten().all(|&i| i < count));
}

#[test]
fn test_march_is_deterministic() {
    assert_eq!(march_sphere(false), march_sphere(false));
    assert_eq!(march_sphere(true), march_sphere(true));
}

#[test]
fn test_no_sign_change_fails() {
    let field = |_: DVec3| 1.0;
    let adapter = PolygonizerField::new(Some(&field)).unwrap();
    let err = Polygonizer::new(adapter, 0.2, 10)
        .march(false, Vec3::X)
        .unwrap_err();
    assert!(matches!(err, MesherError::StartNotFound { .. }));
}

#[test]
fn test_bounds_limit_traversal() {
    let plane = |p: DVec3| p.z;
    let adapter = PolygonizerField::new(Some(&plane)).unwrap();
    let size = 0.1;
    let bounds = 3;
    let result = Polygonizer::new(adapter, size, bounds)
        .march(false, Vec3::ZERO)
        .unwrap();
    assert!(result.triangle_count() > 0);
    // The start point lies within a few cells of the seed.
    let reach = (bounds as f32 + 4.0) * size;
    for v in result.vertices() {
        assert!(v.x.abs() <= reach && v.y.abs() <= reach, "{v} escaped the bounds");
    }
}

#[test]
fn test_only_seed_component_is_meshed() {
    let spheres = |p: DVec3| {
        let left = (p - DVec3::new(-3.0, 0.0, 0.0)).length() - 1.0;
        let right = (p - DVec3::new(3.0, 0.0, 0.0)).length() - 1.0;
        left.min(right)
    };
    let adapter = PolygonizerField::new(Some(&spheres)).unwrap();
    let result = Polygonizer::new(adapter, 0.25, 40)
        .march(false, Vec3::new(4.0, 0.0, 0.0))
        .unwrap();
    assert!(result.triangle_count() > 0);
    assert!(result.vertices().iter().all(|v| v.x > 1.0));
}

#[test]
fn test_from_raw_accessors() {
    let result = Polygonization::from_raw(
        vec![Vec3::ZERO, Vec3::X, Vec3::Y],
        vec![Vec3::Z; 3],
        vec![[0, 1, 2]],
    );
    assert_eq!(result.vertex_count(), 3);
    assert_eq!(result.triangle_count(), 1);
    assert!(!result.is_empty());
}
