//! Quality criteria for restricted facets and domain cells.

use config::constants::{
    CELL_RADIUS_EDGE_RATIO, DEFAULT_FACET_ANGLE_DEGREES, DEFAULT_FACET_DISTANCE,
    DEFAULT_FACET_SIZE,
};
use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::delaunay::{min_angle_degrees, triangle_circumcenter};

/// Bounds on the shape of surface facets. A bound of zero is not checked.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FacetCriteria {
    /// Lower bound on facet angles, in degrees.
    pub angle: f64,
    /// Upper bound on the radius of surface Delaunay balls.
    pub size: f64,
    /// Upper bound on the distance between a facet's circumcenter and the
    /// center of its surface Delaunay ball.
    pub distance: f64,
}

impl FacetCriteria {
    /// Returns true if the facet with the given corners and surface center
    /// violates any bound.
    pub fn is_bad(&self, corners: [DVec3; 3], surface_center: DVec3) -> bool {
        let [a, b, c] = corners;
        if self.angle > 0.0 && min_angle_degrees(a, b, c) < self.angle {
            return true;
        }
        if self.size > 0.0 && surface_center.distance(a) > self.size {
            return true;
        }
        self.distance > 0.0
            && triangle_circumcenter(a, b, c).distance(surface_center) > self.distance
    }
}

impl Default for FacetCriteria {
    fn default() -> Self {
        Self {
            angle: DEFAULT_FACET_ANGLE_DEGREES,
            size: DEFAULT_FACET_SIZE,
            distance: DEFAULT_FACET_DISTANCE,
        }
    }
}

/// Bound on the shape of cells inside the domain.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CellCriteria {
    /// Upper bound on circumradius over shortest edge.
    pub radius_edge_ratio: f64,
}

impl CellCriteria {
    /// Returns true if the cell with the given corners and circumradius
    /// exceeds the radius-edge bound.
    pub fn is_bad(&self, corners: [DVec3; 4], circumradius: f64) -> bool {
        let mut shortest = f64::INFINITY;
        for i in 0..4 {
            for j in (i + 1)..4 {
                shortest = shortest.min(corners[i].distance(corners[j]));
            }
        }
        circumradius > self.radius_edge_ratio * shortest
    }
}

impl Default for CellCriteria {
    fn default() -> Self {
        Self {
            radius_edge_ratio: CELL_RADIUS_EDGE_RATIO,
        }
    }
}

/// Facet and cell criteria driving refinement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MeshCriteria {
    /// Facet bounds
    pub facet: FacetCriteria,
    /// Cell bound
    pub cell: CellCriteria,
}

impl MeshCriteria {
    /// Criteria with the given facet bounds (angle in degrees) and the fixed
    /// cell radius-edge ratio.
    pub fn new(facet_angle: f64, facet_size: f64, facet_distance: f64) -> Self {
        Self {
            facet: FacetCriteria {
                angle: facet_angle,
                size: facet_size,
                distance: facet_distance,
            },
            cell: CellCriteria::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn equilateral(scale: f64) -> [DVec3; 3] {
        [
            DVec3::ZERO,
            DVec3::X * scale,
            DVec3::new(0.5, 3.0f64.sqrt() / 2.0, 0.0) * scale,
        ]
    }

    #[test]
    fn test_good_facet() {
        let criteria = FacetCriteria::default();
        let corners = equilateral(0.1);
        let center = triangle_circumcenter(corners[0], corners[1], corners[2]);
        assert!(!criteria.is_bad(corners, center));
    }

    #[test]
    fn test_sharp_facet_is_bad() {
        let criteria = FacetCriteria::default();
        let corners = [DVec3::ZERO, DVec3::X * 0.1, DVec3::new(0.05, 0.005, 0.0)];
        let center = triangle_circumcenter(corners[0], corners[1], corners[2]);
        assert!(criteria.is_bad(corners, center));
    }

    #[test]
    fn test_large_facet_is_bad() {
        let criteria = FacetCriteria::default();
        let corners = equilateral(1.0);
        let center = triangle_circumcenter(corners[0], corners[1], corners[2]);
        assert!(criteria.is_bad(corners, center));
    }

    #[test]
    fn test_distant_surface_center_is_bad() {
        let criteria = FacetCriteria::default();
        let corners = equilateral(0.1);
        let center = triangle_circumcenter(corners[0], corners[1], corners[2]);
        assert!(criteria.is_bad(corners, center + DVec3::Z * 0.2));
    }

    #[test]
    fn test_zero_bounds_are_disabled() {
        let sharp_large = [DVec3::ZERO, DVec3::X * 2.0, DVec3::new(1.0, 0.01, 0.0)];
        let center = triangle_circumcenter(sharp_large[0], sharp_large[1], sharp_large[2]);
        let off_surface = center + DVec3::Z * 0.5;

        let disabled = FacetCriteria {
            angle: 0.0,
            size: 0.0,
            distance: 0.0,
        };
        assert!(!disabled.is_bad(sharp_large, off_surface));

        let only_size = FacetCriteria {
            size: 0.1,
            ..disabled
        };
        assert!(only_size.is_bad(sharp_large, center));

        let only_distance = FacetCriteria {
            distance: 0.1,
            ..disabled
        };
        assert!(!only_distance.is_bad(sharp_large, center));
        assert!(only_distance.is_bad(sharp_large, off_surface));
    }

    #[test]
    fn test_cell_radius_edge() {
        let criteria = CellCriteria::default();
        let regular = [
            DVec3::new(1.0, 1.0, 1.0),
            DVec3::new(1.0, -1.0, -1.0),
            DVec3::new(-1.0, 1.0, -1.0),
            DVec3::new(-1.0, -1.0, 1.0),
        ];
        // Regular tetrahedron: R / edge = sqrt(3/8) ~ 0.61.
        assert!(!criteria.is_bad(regular, 3.0f64.sqrt()));

        let needle = [
            DVec3::ZERO,
            DVec3::X * 0.01,
            DVec3::Y,
            DVec3::Z,
        ];
        assert!(criteria.is_bad(needle, 0.9));
    }

    #[test]
    fn test_mesh_criteria_new() {
        let criteria = MeshCriteria::new(25.0, 0.2, 0.05);
        assert_eq!(criteria.facet.angle, 25.0);
        assert_eq!(criteria.cell.radius_edge_ratio, CELL_RADIUS_EDGE_RATIO);
    }
}
