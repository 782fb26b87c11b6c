//! # Mesh Builder Contract
//!
//! The meshers never assume a mesh storage layout. They feed vertices and
//! triangles into any type implementing [`MeshBuilder`], bracketed by
//! [`MeshBuilder::begin`] and [`MeshBuilder::end`] so the target can batch
//! its own bookkeeping.
//!
//! Insertion reports failure through invalid handles rather than `Result`,
//! so existing mesh types can implement the contract without adopting this
//! crate's error type.

use std::ops::{Deref, DerefMut};

use glam::DVec3;

/// Incremental, additive mesh construction.
///
/// # Example
///
/// ```rust
/// use implicit_mesher::{IndexedMesh, MeshBuilder};
/// use glam::DVec3;
///
/// let mut mesh = IndexedMesh::new();
/// mesh.begin();
/// let a = mesh.add_vertex(DVec3::ZERO, None, None);
/// let b = mesh.add_vertex(DVec3::X, None, None);
/// let c = mesh.add_vertex(DVec3::Y, None, Some(DVec3::Z));
/// let face = mesh.add_face([a, b, c]);
/// mesh.end();
/// assert!(mesh.is_valid_face_handle(&face));
/// ```
pub trait MeshBuilder {
    /// Handle returned for an inserted vertex.
    type VertexHandle: Copy;
    /// Handle returned for an inserted face.
    type FaceHandle;

    /// Opens a batch of insertions.
    fn begin(&mut self) {}

    /// Closes the batch opened by [`MeshBuilder::begin`].
    fn end(&mut self) {}

    /// Inserts a vertex. `index` is the vertex's position in the
    /// reconstruction output, when it has one.
    fn add_vertex(
        &mut self,
        position: DVec3,
        index: Option<usize>,
        normal: Option<DVec3>,
    ) -> Self::VertexHandle;

    /// Returns true if `handle` denotes a successfully inserted vertex.
    fn is_valid_vertex_handle(&self, handle: &Self::VertexHandle) -> bool;

    /// Inserts a triangle over three previously inserted vertices.
    fn add_face(&mut self, vertices: [Self::VertexHandle; 3]) -> Self::FaceHandle;

    /// Returns true if `handle` denotes a successfully inserted face.
    fn is_valid_face_handle(&self, handle: &Self::FaceHandle) -> bool;
}

/// Calls `begin` on creation and `end` on drop, so the bracket closes on
/// every exit path of an export.
pub(crate) struct BuildScope<'a, B: MeshBuilder + ?Sized> {
    builder: &'a mut B,
}

impl<'a, B: MeshBuilder + ?Sized> BuildScope<'a, B> {
    pub(crate) fn open(builder: &'a mut B) -> Self {
        builder.begin();
        Self { builder }
    }
}

impl<B: MeshBuilder + ?Sized> Deref for BuildScope<'_, B> {
    type Target = B;

    fn deref(&self) -> &B {
        self.builder
    }
}

impl<B: MeshBuilder + ?Sized> DerefMut for BuildScope<'_, B> {
    fn deref_mut(&mut self) -> &mut B {
        self.builder
    }
}

impl<B: MeshBuilder + ?Sized> Drop for BuildScope<'_, B> {
    fn drop(&mut self) {
        self.builder.end();
    }
}
