//! # Implicit Mesher
//!
//! Triangle meshes of implicit surfaces: the zero level set of a scalar
//! field, negative inside.
//!
//! ## Architecture
//!
//! ```text
//! ScalarField ─► PolygonizerField ─► Polygonizer ─► Polygonization ──┐
//!             └► RefinementField ─► ImplicitDomain ─► SurfaceComplex ┤
//!                                                                    ▼
//!                                                  export ─► MeshBuilder
//! ```
//!
//! ## Algorithms
//!
//! - **Continuation**: Bloomenthal's cube-marching polygonizer, started from
//!   a seed point and following the surface through sign-changing cubes
//! - **Delaunay refinement** (feature `refinement`, on by default): surface
//!   Delaunay refinement with facet and cell quality criteria over exact
//!   predicates
//!
//! Both write into any [`MeshBuilder`]; [`IndexedMesh`] is a ready-made one.
//!
//! ## Usage
//!
//! ```rust
//! use implicit_mesher::{mesh_continuation, Ball3, ContinuationOptions, IndexedMesh};
//! use glam::DVec3;
//!
//! let sphere = |p: DVec3| p.length() - 1.0;
//! let mut mesh = IndexedMesh::new();
//! let stats = mesh_continuation(
//!     &sphere,
//!     &Ball3::new(DVec3::ZERO, 2.0),
//!     DVec3::X,
//!     &ContinuationOptions::default(),
//!     &mut mesh,
//! )?;
//! assert_eq!(stats.triangles, mesh.triangle_count());
//! # Ok::<(), implicit_mesher::MesherError>(())
//! ```

pub mod ball;
pub mod builder;
pub mod config;
pub mod error;
pub mod export;
pub mod field;
pub mod mesh;
pub mod mesher;
pub mod options;
pub mod polygonizer;
mod rng;

#[cfg(feature = "refinement")]
pub mod delaunay;
#[cfg(feature = "refinement")]
pub mod refinement;

pub use ball::Ball3;
pub use builder::MeshBuilder;
pub use error::{MesherError, MesherResult, Reconstruction};
pub use field::{PolygonizerField, RefinementField, ScalarField};
pub use mesh::IndexedMesh;
pub use mesher::{mesh_continuation, ImplicitSurfaceMesher, MeshStats};
pub use options::{ContinuationOptions, ContinuationParameters, RefinementOptions};
pub use polygonizer::{Polygonization, Polygonizer};

#[cfg(feature = "refinement")]
pub use delaunay::{CellId, InsertOutcome, Tetrahedralization, VertexId};
#[cfg(feature = "refinement")]
pub use mesher::mesh_refinement;
#[cfg(feature = "refinement")]
pub use refinement::{
    criteria::{CellCriteria, FacetCriteria, MeshCriteria},
    domain::ImplicitDomain,
    Facet, SurfaceComplex,
};
