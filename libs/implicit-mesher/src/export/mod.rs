//! # Mesh Export
//!
//! Feeds reconstruction results into any [`MeshBuilder`].
//!
//! Each export brackets its insertions between `begin` and `end` (`end` also
//! runs when the export fails) and stops at the first rejected insertion.
//! Content inserted before a failure is not rolled back.

use crate::builder::{BuildScope, MeshBuilder};
use crate::error::{MesherError, MesherResult, Reconstruction};
use crate::polygonizer::Polygonization;

#[cfg(feature = "refinement")]
use std::collections::HashMap;

#[cfg(feature = "refinement")]
use crate::{delaunay::VertexId, refinement::SurfaceComplex};

/// Exports a polygonization index-for-index: vertex `i` of the result is
/// the `i`-th vertex added, with its normal; triangles follow in order.
///
/// Returns the number of faces added.
///
/// # Errors
///
/// - [`MesherError::VertexRejected`] / [`MesherError::FaceRejected`] when the
///   builder returns an invalid handle
/// - [`MesherError::TriangleIndexOutOfBounds`] when a triangle refers past
///   the vertex list
///
/// # Example
///
/// ```rust
/// use implicit_mesher::{export, IndexedMesh, Polygonization};
/// use glam::Vec3;
///
/// let result = Polygonization::from_raw(
///     vec![Vec3::ZERO, Vec3::X, Vec3::Y],
///     vec![Vec3::Z; 3],
///     vec![[0, 1, 2]],
/// );
/// let mut mesh = IndexedMesh::new();
/// assert_eq!(export::from_polygonization(&result, &mut mesh).unwrap(), 1);
/// assert_eq!(mesh.vertex_count(), 3);
/// ```
pub fn from_polygonization<B: MeshBuilder + ?Sized>(
    result: &Polygonization,
    mesh: &mut B,
) -> MesherResult<usize> {
    let mut mesh = BuildScope::open(mesh);

    let mut handles = Vec::with_capacity(result.vertices.len());
    for (index, position) in result.vertices.iter().enumerate() {
        let normal = result.normals.get(index).map(|n| n.as_dvec3());
        let handle = mesh.add_vertex(position.as_dvec3(), Some(index), normal);
        if !mesh.is_valid_vertex_handle(&handle) {
            return Err(MesherError::VertexRejected {
                algorithm: Reconstruction::Continuation,
                index,
            });
        }
        handles.push(handle);
    }

    for (index, &[a, b, c]) in result.triangles.iter().enumerate() {
        let resolve = |vertex: u32| {
            handles
                .get(vertex as usize)
                .copied()
                .ok_or(MesherError::TriangleIndexOutOfBounds {
                    triangle: index,
                    index: vertex,
                    vertex_count: handles.len(),
                })
        };
        let face = mesh.add_face([resolve(a)?, resolve(b)?, resolve(c)?]);
        if !mesh.is_valid_face_handle(&face) {
            return Err(MesherError::FaceRejected {
                algorithm: Reconstruction::Continuation,
                index,
            });
        }
    }

    Ok(result.triangles.len())
}

/// Exports the surface of a refined complex.
///
/// Every finite vertex of the triangulation is added first, without index
/// or normal; then each facet in the complex becomes a face over the three
/// corners of its cell other than the facet index, ordered to face out of
/// the domain.
///
/// Returns the number of faces added.
///
/// # Errors
///
/// - [`MesherError::VertexRejected`] / [`MesherError::FaceRejected`] when the
///   builder returns an invalid handle
/// - [`MesherError::UnmappedVertex`] when a facet refers to a vertex that
///   was not added
#[cfg(feature = "refinement")]
pub fn from_complex<B: MeshBuilder + ?Sized>(
    complex: &SurfaceComplex,
    mesh: &mut B,
) -> MesherResult<usize> {
    let mut mesh = BuildScope::open(mesh);
    let tds = complex.triangulation();

    let mut vertex_map: HashMap<VertexId, B::VertexHandle> =
        HashMap::with_capacity(tds.number_of_finite_vertices());
    for (index, (vertex, position)) in tds.finite_vertices().enumerate() {
        let handle = mesh.add_vertex(position, None, None);
        if !mesh.is_valid_vertex_handle(&handle) {
            return Err(MesherError::VertexRejected {
                algorithm: Reconstruction::Refinement,
                index,
            });
        }
        vertex_map.insert(vertex, handle);
    }

    for (index, facet) in complex.facets_in_complex().iter().enumerate() {
        let [a, b, c] = tds.facet_vertices(facet.cell, facet.index);
        let resolve = |vertex: VertexId| {
            vertex_map
                .get(&vertex)
                .copied()
                .ok_or(MesherError::UnmappedVertex {
                    facet: index,
                    vertex,
                })
        };
        let face = mesh.add_face([resolve(a)?, resolve(b)?, resolve(c)?]);
        if !mesh.is_valid_face_handle(&face) {
            return Err(MesherError::FaceRejected {
                algorithm: Reconstruction::Refinement,
                index,
            });
        }
    }

    Ok(complex.number_of_facets_in_complex())
}

#[cfg(test)]
mod tests;
