//! Labeled domain bounded by the zero level set of a field.

use config::constants::INITIAL_POINT_ATTEMPTS;
use glam::DVec3;

use crate::ball::Ball3;
use crate::field::{RefinementField, ScalarField};
use crate::rng::Lcg;

/// Label of points outside the domain.
pub const OUTSIDE: u8 = 0;

/// Label of points inside the domain.
pub const INSIDE: u8 = 1;

/// Hard cap on bisection steps, reached only for degenerate tolerances.
const MAX_BISECTION_STEPS: usize = 256;

/// The region where the field is negative, clipped to a bounding sphere.
///
/// # Example
///
/// ```rust
/// use implicit_mesher::{Ball3, ImplicitDomain, RefinementField};
/// use implicit_mesher::refinement::domain::{INSIDE, OUTSIDE};
/// use glam::DVec3;
///
/// let sphere = |p: DVec3| p.length() - 1.0;
/// let field = RefinementField::new(Some(&sphere)).unwrap();
/// let domain = ImplicitDomain::new(field, Ball3::new(DVec3::ZERO, 2.0), 1.0e-6);
/// assert_eq!(domain.label(DVec3::ZERO), INSIDE);
/// assert_eq!(domain.label(DVec3::new(1.5, 0.0, 0.0)), OUTSIDE);
/// ```
#[derive(Debug)]
pub struct ImplicitDomain<'a, F: ?Sized> {
    field: RefinementField<'a, F>,
    bounding_sphere: Ball3,
    error_bound: f64,
}

impl<'a, F: ScalarField + ?Sized> ImplicitDomain<'a, F> {
    /// Creates the domain. Intersections are bisected until the bracket is
    /// shorter than `relative_error_bound` times the sphere radius.
    pub fn new(
        field: RefinementField<'a, F>,
        bounding_sphere: Ball3,
        relative_error_bound: f64,
    ) -> Self {
        Self {
            field,
            bounding_sphere,
            error_bound: relative_error_bound * bounding_sphere.radius(),
        }
    }

    /// The sphere the domain is clipped to.
    pub fn bounding_sphere(&self) -> &Ball3 {
        &self.bounding_sphere
    }

    /// [`INSIDE`] if `p` is strictly inside the bounding sphere and the field
    /// is negative there, else [`OUTSIDE`].
    pub fn label(&self, p: DVec3) -> u8 {
        if self.bounding_sphere.contains(p) && self.field.eval(p) < 0.0 {
            INSIDE
        } else {
            OUTSIDE
        }
    }

    /// A point where the label changes along segment `a b`, or `None` if
    /// both endpoints carry the same label.
    pub fn intersect(&self, a: DVec3, b: DVec3) -> Option<DVec3> {
        let label_a = self.label(a);
        if label_a == self.label(b) {
            return None;
        }

        let (mut a, mut b) = (a, b);
        for _ in 0..MAX_BISECTION_STEPS {
            if a.distance(b) <= self.error_bound {
                break;
            }
            let mid = (a + b) * 0.5;
            if self.label(mid) == label_a {
                a = mid;
            } else {
                b = mid;
            }
        }
        Some((a + b) * 0.5)
    }

    /// Up to `count` boundary points found on segments from the sphere
    /// center to pseudo-random points of the sphere.
    ///
    /// Returns fewer points (possibly none) when the center is not inside
    /// the domain or the attempts run out.
    pub(crate) fn initial_points(&self, count: usize, rng: &mut Lcg) -> Vec<DVec3> {
        let center = self.bounding_sphere.center();
        let radius = self.bounding_sphere.radius();
        let mut points = Vec::with_capacity(count);

        for _ in 0..INITIAL_POINT_ATTEMPTS {
            if points.len() >= count {
                break;
            }
            let target = center + rng.next_unit_vector() * radius;
            if let Some(p) = self.intersect(center, target) {
                points.push(p);
            }
        }
        points
    }
}
