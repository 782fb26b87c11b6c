//! Geometric predicates and constructions.
//!
//! Orientation and in-sphere tests are exact (adaptive precision via
//! `robust`); constructions are plain floating point.

use glam::DVec3;
use robust::Coord3D;

#[inline]
fn coord(p: DVec3) -> Coord3D<f64> {
    Coord3D {
        x: p.x,
        y: p.y,
        z: p.z,
    }
}

/// Positive if `d` lies below the plane through `a`, `b`, `c`, where "below"
/// means the side from which `a`, `b`, `c` appear clockwise. Zero when the
/// four points are coplanar.
#[inline]
pub(crate) fn orient3d(a: DVec3, b: DVec3, c: DVec3, d: DVec3) -> f64 {
    robust::orient3d(coord(a), coord(b), coord(c), coord(d))
}

/// Positive if `e` lies inside the sphere through `a`, `b`, `c`, `d`, which
/// must be positively oriented. Zero when cospherical.
#[inline]
pub(crate) fn insphere(a: DVec3, b: DVec3, c: DVec3, d: DVec3, e: DVec3) -> f64 {
    robust::insphere(coord(a), coord(b), coord(c), coord(d), coord(e))
}

/// Circumcenter of a tetrahedron.
///
/// Falls back to the centroid when the tetrahedron is too flat for the
/// construction to be finite.
pub(crate) fn circumcenter(a: DVec3, b: DVec3, c: DVec3, d: DVec3) -> DVec3 {
    let (ab, ac, ad) = (b - a, c - a, d - a);
    let denominator = 2.0 * ab.dot(ac.cross(ad));
    let numerator = ab.length_squared() * ac.cross(ad)
        + ac.length_squared() * ad.cross(ab)
        + ad.length_squared() * ab.cross(ac);
    let center = a + numerator / denominator;
    if center.is_finite() {
        center
    } else {
        (a + b + c + d) / 4.0
    }
}

/// Circumcenter of a triangle in space.
pub(crate) fn triangle_circumcenter(a: DVec3, b: DVec3, c: DVec3) -> DVec3 {
    let (ab, ac) = (b - a, c - a);
    let normal = ab.cross(ac);
    let denominator = 2.0 * normal.length_squared();
    let center = a
        + (ac.length_squared() * normal.cross(ab) + ab.length_squared() * ac.cross(normal))
            / denominator;
    if center.is_finite() {
        center
    } else {
        (a + b + c) / 3.0
    }
}

/// Smallest interior angle of a triangle, in degrees.
pub(crate) fn min_angle_degrees(a: DVec3, b: DVec3, c: DVec3) -> f64 {
    let angle = |p: DVec3, q: DVec3, r: DVec3| (q - p).angle_between(r - p);
    let smallest = angle(a, b, c).min(angle(b, c, a)).min(angle(c, a, b));
    if smallest.is_nan() {
        0.0
    } else {
        smallest.to_degrees()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_orient3d_sign() {
        let (a, b, c) = (DVec3::ZERO, DVec3::X, DVec3::Y);
        assert!(orient3d(a, b, c, DVec3::NEG_Z) > 0.0);
        assert!(orient3d(a, b, c, DVec3::Z) < 0.0);
        assert_eq!(orient3d(a, b, c, DVec3::new(3.0, 4.0, 0.0)), 0.0);
    }

    #[test]
    fn test_insphere_sign() {
        let (a, b, c, d) = (DVec3::ZERO, DVec3::X, DVec3::Y, DVec3::NEG_Z);
        assert!(orient3d(a, b, c, d) > 0.0);
        assert!(insphere(a, b, c, d, DVec3::splat(0.25) * DVec3::new(1.0, 1.0, -1.0)) > 0.0);
        assert!(insphere(a, b, c, d, DVec3::splat(5.0)) < 0.0);
    }

    #[test]
    fn test_circumcenter_equidistant() {
        let (a, b, c, d) = (
            DVec3::new(0.1, 0.0, 0.0),
            DVec3::new(1.0, 0.2, 0.0),
            DVec3::new(0.0, 1.0, 0.3),
            DVec3::new(0.2, 0.1, 1.0),
        );
        let center = circumcenter(a, b, c, d);
        let r = center.distance(a);
        for p in [b, c, d] {
            assert_relative_eq!(center.distance(p), r, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_triangle_circumcenter_equidistant_and_coplanar() {
        let (a, b, c) = (
            DVec3::new(0.0, 0.0, 1.0),
            DVec3::new(2.0, 0.0, 1.0),
            DVec3::new(0.5, 1.5, 1.0),
        );
        let center = triangle_circumcenter(a, b, c);
        assert_relative_eq!(center.z, 1.0, epsilon = 1e-12);
        assert_relative_eq!(center.distance(a), center.distance(b), epsilon = 1e-12);
        assert_relative_eq!(center.distance(a), center.distance(c), epsilon = 1e-12);
    }

    #[test]
    fn test_min_angle() {
        let equilateral = min_angle_degrees(
            DVec3::ZERO,
            DVec3::X,
            DVec3::new(0.5, 3.0f64.sqrt() / 2.0, 0.0),
        );
        assert_relative_eq!(equilateral, 60.0, epsilon = 1e-9);

        let right = min_angle_degrees(DVec3::ZERO, DVec3::X, DVec3::Y);
        assert_relative_eq!(right, 45.0, epsilon = 1e-9);
    }

    #[test]
    fn test_degenerate_constructions_stay_finite() {
        let flat = circumcenter(DVec3::ZERO, DVec3::X, DVec3::Y, DVec3::new(1.0, 1.0, 0.0));
        assert!(flat.is_finite());
        let line = triangle_circumcenter(DVec3::ZERO, DVec3::X, DVec3::X * 2.0);
        assert!(line.is_finite());
        assert_eq!(min_angle_degrees(DVec3::ZERO, DVec3::ZERO, DVec3::X), 0.0);
    }
}
