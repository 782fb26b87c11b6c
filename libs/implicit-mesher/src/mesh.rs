//! # Indexed Mesh
//!
//! Reference [`MeshBuilder`] target: an indexed triangle mesh with optional
//! per-vertex normals.

use config::constants::{EPSILON, MAX_TRIANGLES, MAX_VERTICES};
use glam::DVec3;

use crate::builder::MeshBuilder;

/// A triangle mesh with vertices and indices.
///
/// Insertions beyond the configured limits, and faces over unknown vertices,
/// are refused with invalid (`None`) handles.
///
/// # Example
///
/// ```rust
/// use implicit_mesher::{IndexedMesh, MeshBuilder};
/// use glam::DVec3;
///
/// let mut mesh = IndexedMesh::new();
/// let a = mesh.add_vertex(DVec3::new(0.0, 0.0, 0.0), None, None);
/// let b = mesh.add_vertex(DVec3::new(1.0, 0.0, 0.0), None, None);
/// let c = mesh.add_vertex(DVec3::new(0.0, 1.0, 0.0), None, None);
/// mesh.add_face([a, b, c]);
/// assert_eq!(mesh.triangle_count(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct IndexedMesh {
    /// Vertex positions (f64 for precision)
    vertices: Vec<DVec3>,
    /// Optional vertex normals, parallel to `vertices`
    normals: Vec<Option<DVec3>>,
    /// Position of each vertex in the reconstruction that produced it
    source_indices: Vec<Option<usize>>,
    /// Triangle indices (3 indices per triangle)
    triangles: Vec<[u32; 3]>,
    max_vertices: usize,
    max_triangles: usize,
    building: bool,
}

impl Default for IndexedMesh {
    fn default() -> Self {
        Self::new()
    }
}

impl IndexedMesh {
    /// Creates an empty mesh with the workspace-wide size limits.
    pub fn new() -> Self {
        Self::with_limits(MAX_VERTICES, MAX_TRIANGLES)
    }

    /// Creates an empty mesh refusing more than the given number of
    /// vertices or triangles.
    pub fn with_limits(max_vertices: usize, max_triangles: usize) -> Self {
        Self {
            vertices: Vec::new(),
            normals: Vec::new(),
            source_indices: Vec::new(),
            triangles: Vec::new(),
            max_vertices: max_vertices.min(u32::MAX as usize),
            max_triangles,
            building: false,
        }
    }

    /// Returns the number of vertices.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Returns the number of triangles.
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Returns true if the mesh is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Returns true between `begin` and `end`.
    #[inline]
    pub fn is_building(&self) -> bool {
        self.building
    }

    /// Returns a reference to the vertices.
    #[inline]
    pub fn vertices(&self) -> &[DVec3] {
        &self.vertices
    }

    /// Returns a reference to the triangles.
    #[inline]
    pub fn triangles(&self) -> &[[u32; 3]] {
        &self.triangles
    }

    /// Returns the vertex at the given index.
    #[inline]
    pub fn vertex(&self, index: u32) -> DVec3 {
        self.vertices[index as usize]
    }

    /// Returns the triangle at the given index.
    #[inline]
    pub fn triangle(&self, index: usize) -> [u32; 3] {
        self.triangles[index]
    }

    /// Returns the normal supplied with the vertex, if any.
    #[inline]
    pub fn normal(&self, index: u32) -> Option<DVec3> {
        self.normals[index as usize]
    }

    /// Returns the reconstruction index supplied with the vertex, if any.
    #[inline]
    pub fn source_index(&self, index: u32) -> Option<usize> {
        self.source_indices[index as usize]
    }

    /// Validates the mesh for correctness.
    ///
    /// Checks:
    /// - All triangle indices are valid
    /// - No triangle repeats a vertex
    /// - No zero-area triangles
    pub fn validate(&self) -> bool {
        let vertex_count = self.vertices.len() as u32;

        for tri in &self.triangles {
            if tri[0] >= vertex_count || tri[1] >= vertex_count || tri[2] >= vertex_count {
                return false;
            }

            if tri[0] == tri[1] || tri[1] == tri[2] || tri[0] == tri[2] {
                return false;
            }

            let v0 = self.vertices[tri[0] as usize];
            let v1 = self.vertices[tri[1] as usize];
            let v2 = self.vertices[tri[2] as usize];
            let area = (v1 - v0).cross(v2 - v0).length();
            if area < EPSILON {
                return false;
            }
        }

        true
    }
}

impl MeshBuilder for IndexedMesh {
    type VertexHandle = Option<u32>;
    type FaceHandle = Option<usize>;

    fn begin(&mut self) {
        self.building = true;
    }

    fn end(&mut self) {
        self.building = false;
    }

    fn add_vertex(
        &mut self,
        position: DVec3,
        index: Option<usize>,
        normal: Option<DVec3>,
    ) -> Option<u32> {
        if self.vertices.len() >= self.max_vertices || !position.is_finite() {
            return None;
        }
        let handle = self.vertices.len() as u32;
        self.vertices.push(position);
        self.normals.push(normal);
        self.source_indices.push(index);
        Some(handle)
    }

    fn is_valid_vertex_handle(&self, handle: &Option<u32>) -> bool {
        matches!(handle, Some(index) if (*index as usize) < self.vertices.len())
    }

    fn add_face(&mut self, vertices: [Option<u32>; 3]) -> Option<usize> {
        if self.triangles.len() >= self.max_triangles {
            return None;
        }
        let [a, b, c] = vertices;
        let triangle = [a?, b?, c?];
        if triangle
            .iter()
            .any(|&index| index as usize >= self.vertices.len())
        {
            return None;
        }
        self.triangles.push(triangle);
        Some(self.triangles.len() - 1)
    }

    fn is_valid_face_handle(&self, handle: &Option<usize>) -> bool {
        matches!(handle, Some(index) if *index < self.triangles.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle_mesh() -> IndexedMesh {
        let mut mesh = IndexedMesh::new();
        let a = mesh.add_vertex(DVec3::ZERO, Some(0), None);
        let b = mesh.add_vertex(DVec3::X, Some(1), None);
        let c = mesh.add_vertex(DVec3::Y, Some(2), Some(DVec3::Z));
        mesh.add_face([a, b, c]);
        mesh
    }

    #[test]
    fn test_mesh_new() {
        let mesh = IndexedMesh::new();
        assert!(mesh.is_empty());
        assert_eq!(mesh.vertex_count(), 0);
        assert_eq!(mesh.triangle_count(), 0);
    }

    #[test]
    fn test_mesh_add_vertex() {
        let mut mesh = IndexedMesh::new();
        let handle = mesh.add_vertex(DVec3::new(1.0, 2.0, 3.0), Some(4), Some(DVec3::Y));
        assert_eq!(handle, Some(0));
        assert!(mesh.is_valid_vertex_handle(&handle));
        assert_eq!(mesh.vertex(0), DVec3::new(1.0, 2.0, 3.0));
        assert_eq!(mesh.normal(0), Some(DVec3::Y));
        assert_eq!(mesh.source_index(0), Some(4));
    }

    #[test]
    fn test_mesh_add_face() {
        let mesh = triangle_mesh();
        assert_eq!(mesh.triangle_count(), 1);
        assert_eq!(mesh.triangle(0), [0, 1, 2]);
        assert!(mesh.validate());
    }

    #[test]
    fn test_face_over_unknown_vertex_is_rejected() {
        let mut mesh = triangle_mesh();
        let face = mesh.add_face([Some(0), Some(1), Some(9)]);
        assert!(!mesh.is_valid_face_handle(&face));
        let face = mesh.add_face([Some(0), None, Some(2)]);
        assert!(!mesh.is_valid_face_handle(&face));
        assert_eq!(mesh.triangle_count(), 1);
    }

    #[test]
    fn test_vertex_limit() {
        let mut mesh = IndexedMesh::with_limits(1, 10);
        assert!(mesh.add_vertex(DVec3::ZERO, None, None).is_some());
        let rejected = mesh.add_vertex(DVec3::X, None, None);
        assert!(!mesh.is_valid_vertex_handle(&rejected));
    }

    #[test]
    fn test_non_finite_vertex_is_rejected() {
        let mut mesh = IndexedMesh::new();
        let rejected = mesh.add_vertex(DVec3::new(f64::NAN, 0.0, 0.0), None, None);
        assert!(!mesh.is_valid_vertex_handle(&rejected));
    }

    #[test]
    fn test_begin_end_bracket() {
        let mut mesh = IndexedMesh::new();
        mesh.begin();
        assert!(mesh.is_building());
        mesh.end();
        assert!(!mesh.is_building());
    }
}
