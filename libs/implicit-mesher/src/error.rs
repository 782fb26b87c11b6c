//! # Error Types
//!
//! Error types for implicit surface meshing. All failures are explicit and
//! terminate the current meshing call.
//!
//! ## Error Policy
//!
//! - NO retries: reconstruction and export run exactly once per call
//! - Integrity violations from a reconstruction are never masked
//! - A partially exported mesh is not rolled back

use std::fmt;

use config::constants::ConfigError;
use glam::DVec3;
use thiserror::Error;

// =============================================================================
// ERROR TYPES
// =============================================================================

/// The reconstruction algorithm an export error originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconstruction {
    /// Cell-marching continuation polygonizer.
    Continuation,
    /// Delaunay-refinement mesher.
    Refinement,
}

impl fmt::Display for Reconstruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reconstruction::Continuation => f.write_str("continuation polygonizer"),
            Reconstruction::Refinement => f.write_str("Delaunay refinement"),
        }
    }
}

/// Errors that can occur while meshing an implicit surface.
///
/// ## Example
///
/// ```rust
/// use implicit_mesher::{mesh_continuation, Ball3, ContinuationOptions, IndexedMesh, MesherError};
/// use glam::DVec3;
///
/// let sphere = |p: DVec3| p.length() - 1.0;
/// let bounds = Ball3::new(DVec3::ZERO, 2.0);
/// let mut mesh = IndexedMesh::new();
///
/// match mesh_continuation(&sphere, &bounds, DVec3::X, &ContinuationOptions::default(), &mut mesh) {
///     Ok(stats) => println!("{} triangles", stats.triangles),
///     Err(MesherError::StartNotFound { seed }) => eprintln!("no surface near {seed}"),
///     Err(e) => eprintln!("meshing failed: {e}"),
/// }
/// ```
#[derive(Error, Debug)]
pub enum MesherError {
    /// The scalar field evaluator was absent.
    #[error("Surface evaluator function cannot be null")]
    NullEvaluator,

    /// A meshing option was supplied with an unusable value.
    #[error("Invalid option '{name}': {value}")]
    InvalidOption {
        /// Name of the option
        name: &'static str,
        /// Rejected value
        value: f64,
    },

    /// The polygonizer found no sign change around the seed point.
    #[error("Could not find a starting point on the surface near {seed}")]
    StartNotFound {
        /// Seed point the search started from
        seed: DVec3,
    },

    /// A polygonizer triangle referenced a vertex that does not exist.
    #[error(
        "Vertex index {index} in triangle {triangle} from continuation polygonizer is out of bounds \
         (vertex count {vertex_count})"
    )]
    TriangleIndexOutOfBounds {
        /// Triangle position in the polygonization
        triangle: usize,
        /// Offending vertex index
        index: u32,
        /// Number of vertices in the polygonization
        vertex_count: usize,
    },

    /// A facet in the surface complex referenced a vertex that was never
    /// inserted into the target mesh.
    #[error("Mesh created by Delaunay refinement refers to unmapped vertex {vertex} (facet {facet})")]
    UnmappedVertex {
        /// Facet position in the complex
        facet: usize,
        /// Triangulation vertex id
        vertex: usize,
    },

    /// The target mesh returned an invalid vertex handle.
    #[error("Could not add vertex {index} from {algorithm} to mesh")]
    VertexRejected {
        /// Algorithm that produced the vertex
        algorithm: Reconstruction,
        /// Vertex position in the reconstruction output
        index: usize,
    },

    /// The target mesh returned an invalid face handle.
    #[error("Could not add triangle {index} from {algorithm} to mesh")]
    FaceRejected {
        /// Algorithm that produced the triangle
        algorithm: Reconstruction,
        /// Triangle position in the reconstruction output
        index: usize,
    },

    /// Point location left the enclosing super-tetrahedron.
    #[error("Point {point} lies outside the triangulation")]
    PointOutsideTriangulation {
        /// Point being located
        point: DVec3,
    },

    /// A Delaunay cavity produced a flat or inverted cell.
    #[error("Degenerate cavity while inserting {point}")]
    DegenerateCavity {
        /// Point being inserted
        point: DVec3,
    },

    /// Invalid mesher configuration.
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
}

impl MesherError {
    /// Creates an invalid option error.
    pub fn invalid_option(name: &'static str, value: f64) -> Self {
        Self::InvalidOption { name, value }
    }
}

// =============================================================================
// RESULT TYPE ALIAS
// =============================================================================

/// Result type alias for meshing operations.
pub type MesherResult<T> = Result<T, MesherError>;

// =============================================================================
// TESTS
// =============================================================================
