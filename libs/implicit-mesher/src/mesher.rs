//! # Meshing Entry Points
//!
//! Each entry point resolves its options, runs one reconstruction, logs the
//! size of the result and exports it into the caller's mesh.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::ball::Ball3;
use crate::builder::MeshBuilder;
use crate::config::MesherConfig;
use crate::error::{MesherError, MesherResult};
use crate::export;
use crate::field::{PolygonizerField, ScalarField};
use crate::options::ContinuationOptions;
use crate::polygonizer::Polygonizer;

#[cfg(feature = "refinement")]
use crate::{
    field::RefinementField,
    options::RefinementOptions,
    refinement::{self, domain::ImplicitDomain},
};

/// Size of the mesh produced by one meshing call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeshStats {
    /// Vertices added to the target mesh
    pub vertices: usize,
    /// Triangles added to the target mesh
    pub triangles: usize,
}

/// Meshes implicit surfaces under a fixed [`MesherConfig`].
///
/// # Example
///
/// ```rust
/// use implicit_mesher::{Ball3, ContinuationOptions, ImplicitSurfaceMesher, IndexedMesh};
/// use implicit_mesher::config::MesherConfig;
/// use glam::DVec3;
///
/// let mesher = ImplicitSurfaceMesher::new(MesherConfig::default());
/// let torus = |p: DVec3| {
///     let q = glam::DVec2::new(p.truncate().length() - 1.0, p.z);
///     q.length() - 0.3
/// };
/// let mut mesh = IndexedMesh::new();
/// let stats = mesher
///     .mesh_continuation(
///         &torus,
///         &Ball3::new(DVec3::ZERO, 2.0),
///         DVec3::new(1.3, 0.0, 0.0),
///         &ContinuationOptions::default().with_cell_size(0.1),
///         &mut mesh,
///     )
///     .unwrap();
/// assert_eq!(stats.triangles, mesh.triangle_count());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ImplicitSurfaceMesher {
    config: MesherConfig,
}

impl ImplicitSurfaceMesher {
    /// Creates a mesher.
    pub fn new(config: MesherConfig) -> Self {
        Self { config }
    }

    /// The mesher's configuration.
    pub fn config(&self) -> &MesherConfig {
        &self.config
    }

    /// Polygonizes the surface component reachable from `seed` and appends
    /// it to `mesh`.
    ///
    /// Components not reachable from the seed within the step budget are
    /// not meshed.
    ///
    /// # Errors
    ///
    /// - [`MesherError::InvalidOption`] for unusable options or bounds
    /// - [`MesherError::StartNotFound`] if there is no surface near `seed`
    /// - export errors (see [`export::from_polygonization`])
    pub fn mesh_continuation<F, B>(
        &self,
        field: &F,
        bounds: &Ball3,
        seed: DVec3,
        options: &ContinuationOptions,
        mesh: &mut B,
    ) -> MesherResult<MeshStats>
    where
        F: ScalarField + ?Sized,
        B: MeshBuilder + ?Sized,
    {
        check_bounds(bounds)?;
        let params = options.resolve(bounds)?;
        let cell_size = params.cell_size as f32;
        if !(cell_size.is_finite() && cell_size > 0.0) {
            return Err(MesherError::invalid_option("cell_size", params.cell_size));
        }

        let field = PolygonizerField::new(Some(field))?;
        let polygonizer = Polygonizer::new(field, cell_size, params.max_search_steps);
        let result = polygonizer.march(params.tetrahedralize_cubes, seed.as_vec3())?;
        log::info!(
            "ImplicitSurfaceMesher: {} triangles generated via continuation polygonizer",
            result.triangle_count()
        );

        let triangles = export::from_polygonization(&result, mesh)?;
        Ok(MeshStats {
            vertices: result.vertex_count(),
            triangles,
        })
    }

    /// Meshes the boundary of the region where the field is negative inside
    /// `bounds` by Delaunay refinement and appends it to `mesh`.
    ///
    /// The field should be negative at the center of `bounds`. If it is not,
    /// a warning is logged and the result is usually empty.
    ///
    /// # Errors
    ///
    /// - [`MesherError::InvalidOption`] for unusable options or bounds
    /// - triangulation integrity errors
    /// - export errors (see [`export::from_complex`])
    #[cfg(feature = "refinement")]
    pub fn mesh_refinement<F, B>(
        &self,
        field: &F,
        bounds: &Ball3,
        options: &RefinementOptions,
        mesh: &mut B,
    ) -> MesherResult<MeshStats>
    where
        F: ScalarField + ?Sized,
        B: MeshBuilder + ?Sized,
    {
        check_bounds(bounds)?;
        let criteria = options.criteria()?;
        let field = RefinementField::new(Some(field))?;

        let center = bounds.center();
        if field.eval(center) >= 0.0 {
            log::warn!(
                "ImplicitSurfaceMesher: field is not negative at the bounding sphere center {center}"
            );
        }

        let domain = ImplicitDomain::new(field, *bounds, self.config.relative_error_bound);
        let complex = refinement::refine(&domain, &criteria, &self.config)?;
        log::info!(
            "ImplicitSurfaceMesher: {} triangles generated via Delaunay refinement",
            complex.number_of_facets_in_complex()
        );

        let triangles = export::from_complex(&complex, mesh)?;
        Ok(MeshStats {
            vertices: complex.triangulation().number_of_finite_vertices(),
            triangles,
        })
    }
}

fn check_bounds(bounds: &Ball3) -> MesherResult<()> {
    let radius = bounds.radius();
    if !(radius.is_finite() && radius > 0.0) {
        return Err(MesherError::invalid_option("bounds.radius", radius));
    }
    if let Some(&bad) = bounds.center().to_array().iter().find(|c| !c.is_finite()) {
        return Err(MesherError::invalid_option("bounds.center", bad));
    }
    Ok(())
}

/// Polygonizes the surface near `seed` with the default configuration.
///
/// See [`ImplicitSurfaceMesher::mesh_continuation`].
pub fn mesh_continuation<F, B>(
    field: &F,
    bounds: &Ball3,
    seed: DVec3,
    options: &ContinuationOptions,
    mesh: &mut B,
) -> MesherResult<MeshStats>
where
    F: ScalarField + ?Sized,
    B: MeshBuilder + ?Sized,
{
    ImplicitSurfaceMesher::default().mesh_continuation(field, bounds, seed, options, mesh)
}

/// Meshes the surface by Delaunay refinement with the default
/// configuration.
///
/// See [`ImplicitSurfaceMesher::mesh_refinement`].
#[cfg(feature = "refinement")]
pub fn mesh_refinement<F, B>(
    field: &F,
    bounds: &Ball3,
    options: &RefinementOptions,
    mesh: &mut B,
) -> MesherResult<MeshStats>
where
    F: ScalarField + ?Sized,
    B: MeshBuilder + ?Sized,
{
    ImplicitSurfaceMesher::default().mesh_refinement(field, bounds, options, mesh)
}
