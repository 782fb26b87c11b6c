//! Tests for mesh export.

use super::*;
use crate::mesh::IndexedMesh;
use glam::{DVec3, Vec3};

/// Builder that refuses the n-th vertex or face and records its bracket.
#[derive(Default)]
struct PickyMesh {
    inner: IndexedMesh,
    reject_vertex: Option<usize>,
    reject_face: Option<usize>,
    vertices_seen: usize,
    faces_seen: usize,
    begins: usize,
    ends: usize,
}

impl MeshBuilder for PickyMesh {
    type VertexHandle = Option<u32>;
    type FaceHandle = Option<usize>;

    fn begin(&mut self) {
        self.begins += 1;
    }

    fn end(&mut self) {
        self.ends += 1;
    }

    fn add_vertex(
        &mut self,
        position: DVec3,
        index: Option<usize>,
        normal: Option<DVec3>,
    ) -> Option<u32> {
        let n = self.vertices_seen;
        self.vertices_seen += 1;
        if self.reject_vertex == Some(n) {
            return None;
        }
        self.inner.add_vertex(position, index, normal)
    }

    fn is_valid_vertex_handle(&self, handle: &Option<u32>) -> bool {
        self.inner.is_valid_vertex_handle(handle)
    }

    fn add_face(&mut self, vertices: [Option<u32>; 3]) -> Option<usize> {
        let n = self.faces_seen;
        self.faces_seen += 1;
        if self.reject_face == Some(n) {
            return None;
        }
        self.inner.add_face(vertices)
    }

    fn is_valid_face_handle(&self, handle: &Option<usize>) -> bool {
        self.inner.is_valid_face_handle(handle)
    }
}

fn quad() -> Polygonization {
    Polygonization::from_raw(
        vec![Vec3::ZERO, Vec3::X, Vec3::new(1.0, 1.0, 0.0), Vec3::Y],
        vec![Vec3::Z; 4],
        vec![[0, 1, 2], [0, 2, 3]],
    )
}

#[test]
fn test_polygonization_exported_index_for_index() {
    let mut mesh = IndexedMesh::new();
    let count = from_polygonization(&quad(), &mut mesh).unwrap();
    assert_eq!(count, 2);
    assert_eq!(mesh.vertex_count(), 4);
    assert_eq!(mesh.triangles(), &[[0, 1, 2], [0, 2, 3]]);
    for i in 0..4u32 {
        assert_eq!(mesh.source_index(i), Some(i as usize));
        assert_eq!(mesh.normal(i), Some(DVec3::Z));
    }
    assert_eq!(mesh.vertex(2), DVec3::new(1.0, 1.0, 0.0));
    assert!(!mesh.is_building());
}

#[test]
fn test_export_appends_to_existing_content() {
    let mut mesh = IndexedMesh::new();
    mesh.add_vertex(DVec3::splat(9.0), None, None);
    from_polygonization(&quad(), &mut mesh).unwrap();
    assert_eq!(mesh.vertex_count(), 5);
    assert_eq!(mesh.triangles(), &[[1, 2, 3], [1, 3, 4]]);
}

#[test]
fn test_out_of_range_index_is_fatal() {
    let broken = Polygonization::from_raw(
        vec![Vec3::ZERO, Vec3::X, Vec3::Y],
        vec![Vec3::Z; 3],
        vec![[0, 1, 2], [0, 1, 3]],
    );
    let mut mesh = PickyMesh::default();
    let err = from_polygonization(&broken, &mut mesh).unwrap_err();
    assert!(matches!(
        err,
        MesherError::TriangleIndexOutOfBounds {
            triangle: 1,
            index: 3,
            vertex_count: 3
        }
    ));
    // The first triangle went in; nothing is rolled back.
    assert_eq!(mesh.inner.triangle_count(), 1);
    assert_eq!((mesh.begins, mesh.ends), (1, 1));
}

#[test]
fn test_rejected_vertex_is_fatal() {
    let mut mesh = PickyMesh {
        reject_vertex: Some(2),
        ..PickyMesh::default()
    };
    let err = from_polygonization(&quad(), &mut mesh).unwrap_err();
    assert!(matches!(
        err,
        MesherError::VertexRejected {
            algorithm: Reconstruction::Continuation,
            index: 2
        }
    ));
    assert_eq!(mesh.faces_seen, 0);
    assert_eq!((mesh.begins, mesh.ends), (1, 1));
}

#[test]
fn test_rejected_face_is_fatal() {
    let mut mesh = PickyMesh {
        reject_face: Some(0),
        ..PickyMesh::default()
    };
    let err = from_polygonization(&quad(), &mut mesh).unwrap_err();
    assert!(matches!(
        err,
        MesherError::FaceRejected {
            algorithm: Reconstruction::Continuation,
            index: 0
        }
    ));
    assert_eq!(mesh.faces_seen, 1);
    assert_eq!(mesh.ends, 1);
}

#[test]
fn test_empty_polygonization() {
    let mut mesh = PickyMesh::default();
    assert_eq!(from_polygonization(&Polygonization::default(), &mut mesh).unwrap(), 0);
    assert_eq!((mesh.begins, mesh.ends), (1, 1));
}

#[cfg(feature = "refinement")]
mod complex {
    use super::*;
    use crate::ball::Ball3;
    use crate::delaunay::Tetrahedralization;
    use crate::refinement::Facet;

    fn tetrahedron() -> Tetrahedralization {
        let mut tds = Tetrahedralization::new(&Ball3::new(DVec3::ZERO, 2.0));
        for p in [DVec3::ZERO, DVec3::X, DVec3::Y, DVec3::Z] {
            tds.insert(p).unwrap();
        }
        tds
    }

    /// All four facets of the single finite cell.
    fn boundary_complex() -> SurfaceComplex {
        let tds = tetrahedron();
        let cell = tds.finite_cells().next().unwrap();
        let facets = (0..4).map(|index| Facet { cell, index }).collect();
        SurfaceComplex::from_parts(tds, facets)
    }

    #[test]
    fn test_complex_exports_all_vertices_then_facets() {
        let complex = boundary_complex();
        let mut mesh = IndexedMesh::new();
        assert_eq!(from_complex(&complex, &mut mesh).unwrap(), 4);
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.triangle_count(), 4);
        assert!(mesh.validate());
        for i in 0..4u32 {
            assert_eq!(mesh.normal(i), None);
            assert_eq!(mesh.source_index(i), None);
        }
    }

    #[test]
    fn test_complex_faces_point_outward() {
        let complex = boundary_complex();
        let mut mesh = IndexedMesh::new();
        from_complex(&complex, &mut mesh).unwrap();
        let centroid = DVec3::splat(0.25);
        for tri in mesh.triangles() {
            let [a, b, c] = tri.map(|i| mesh.vertex(i));
            let normal = (b - a).cross(c - a);
            assert!(normal.dot((a + b + c) / 3.0 - centroid) > 0.0);
        }
    }

    #[test]
    fn test_unmapped_vertex_is_fatal() {
        let tds = tetrahedron();
        // A cell touching the enclosing super-tetrahedron.
        let cell = tds.cells().find(|&c| !tds.is_finite_cell(c)).unwrap();
        let index = (0..4)
            .find(|&i| {
                tds.facet_vertices(cell, i)
                    .iter()
                    .any(|&v| !tds.is_finite_vertex(v))
            })
            .unwrap();
        let complex = SurfaceComplex::from_parts(tds, vec![Facet { cell, index }]);

        let mut mesh = PickyMesh::default();
        let err = from_complex(&complex, &mut mesh).unwrap_err();
        assert!(matches!(err, MesherError::UnmappedVertex { facet: 0, .. }));
        assert_eq!(mesh.faces_seen, 0);
        assert_eq!((mesh.begins, mesh.ends), (1, 1));
    }

    #[test]
    fn test_complex_rejected_vertex_is_fatal() {
        let mut mesh = PickyMesh {
            reject_vertex: Some(3),
            ..PickyMesh::default()
        };
        let err = from_complex(&boundary_complex(), &mut mesh).unwrap_err();
        assert!(matches!(
            err,
            MesherError::VertexRejected {
                algorithm: Reconstruction::Refinement,
                index: 3
            }
        ));
    }

    #[test]
    fn test_complex_rejected_face_is_fatal() {
        let mut mesh = PickyMesh {
            reject_face: Some(1),
            ..PickyMesh::default()
        };
        let err = from_complex(&boundary_complex(), &mut mesh).unwrap_err();
        assert!(matches!(
            err,
            MesherError::FaceRejected {
                algorithm: Reconstruction::Refinement,
                index: 1
            }
        ));
        assert_eq!(mesh.inner.triangle_count(), 1);
    }
}
