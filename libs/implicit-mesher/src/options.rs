//! # Meshing Options
//!
//! Per-algorithm parameter bundles. Unset fields take defaults when the
//! options are resolved at the start of a meshing call. An explicit cell
//! size must be finite and positive; explicit refinement bounds must be
//! finite and non-negative, where zero disables the bound.

use config::constants::{
    DEFAULT_CELL_SIZE_FRACTION, DEFAULT_FACET_ANGLE_DEGREES, DEFAULT_FACET_DISTANCE,
    DEFAULT_FACET_SIZE, DEFAULT_MAX_SEARCH_STEPS,
};
use serde::{Deserialize, Serialize};

use crate::ball::Ball3;
use crate::error::{MesherError, MesherResult};

#[cfg(feature = "refinement")]
use crate::refinement::criteria::MeshCriteria;

/// Options for the continuation polygonizer.
///
/// # Example
///
/// ```rust
/// use implicit_mesher::{Ball3, ContinuationOptions};
/// use glam::DVec3;
///
/// let bounds = Ball3::new(DVec3::ZERO, 2.0);
/// let resolved = ContinuationOptions::default().resolve(&bounds).unwrap();
/// assert_eq!(resolved.cell_size, 0.2);
/// assert_eq!(resolved.max_search_steps, 10);
///
/// let tuned = ContinuationOptions::default().with_cell_size(0.05).with_tetrahedra(true);
/// assert_eq!(tuned.resolve(&bounds).unwrap().cell_size, 0.05);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContinuationOptions {
    /// Lattice edge length; defaults to a tenth of the bounding radius.
    pub cell_size: Option<f64>,
    /// Cubes visited at most this many steps from the start cube along each
    /// axis; defaults to 10. Zero polygonizes the start cube only.
    pub max_search_steps: Option<u32>,
    /// Split each cube into six tetrahedra before polygonizing.
    pub tetrahedralize_cubes: bool,
}

/// [`ContinuationOptions`] with every default applied.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContinuationParameters {
    /// Lattice edge length
    pub cell_size: f64,
    /// Step budget per axis
    pub max_search_steps: u32,
    /// Tetrahedral decomposition
    pub tetrahedralize_cubes: bool,
}

impl ContinuationOptions {
    /// Sets the lattice edge length.
    pub fn with_cell_size(mut self, cell_size: f64) -> Self {
        self.cell_size = Some(cell_size);
        self
    }

    /// Sets the step budget.
    pub fn with_max_search_steps(mut self, steps: u32) -> Self {
        self.max_search_steps = Some(steps);
        self
    }

    /// Selects tetrahedral decomposition.
    pub fn with_tetrahedra(mut self, tetrahedralize: bool) -> Self {
        self.tetrahedralize_cubes = tetrahedralize;
        self
    }

    /// Applies defaults relative to `bounds`.
    ///
    /// # Errors
    ///
    /// [`MesherError::InvalidOption`] for a set cell size that is not finite
    /// and positive.
    pub fn resolve(&self, bounds: &Ball3) -> MesherResult<ContinuationParameters> {
        let cell_size = match self.cell_size {
            Some(size) => positive("cell_size", size)?,
            None => DEFAULT_CELL_SIZE_FRACTION * bounds.radius(),
        };
        let max_search_steps = self.max_search_steps.unwrap_or(DEFAULT_MAX_SEARCH_STEPS);
        Ok(ContinuationParameters {
            cell_size,
            max_search_steps,
            tetrahedralize_cubes: self.tetrahedralize_cubes,
        })
    }
}

/// Options for Delaunay refinement. A bound set to zero is disabled.
///
/// # Example
///
/// ```rust
/// use implicit_mesher::RefinementOptions;
///
/// let options = RefinementOptions::default().with_min_facet_angle(std::f64::consts::FRAC_PI_6);
/// assert_eq!(options.min_facet_angle, Some(std::f64::consts::FRAC_PI_6));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RefinementOptions {
    /// Lower bound on surface facet angles, in radians; defaults to 30°.
    pub min_facet_angle: Option<f64>,
    /// Upper bound on surface Delaunay ball radii; defaults to 0.1.
    pub min_delaunay_radius: Option<f64>,
    /// Upper bound on the distance between a facet's circumcenter and its
    /// surface Delaunay ball center; defaults to 0.1.
    pub min_center_separation: Option<f64>,
}

impl RefinementOptions {
    /// Sets the facet angle bound, in radians.
    pub fn with_min_facet_angle(mut self, radians: f64) -> Self {
        self.min_facet_angle = Some(radians);
        self
    }

    /// Sets the surface Delaunay ball radius bound.
    pub fn with_min_delaunay_radius(mut self, radius: f64) -> Self {
        self.min_delaunay_radius = Some(radius);
        self
    }

    /// Sets the center separation bound.
    pub fn with_min_center_separation(mut self, distance: f64) -> Self {
        self.min_center_separation = Some(distance);
        self
    }

    /// Facet angle bound in degrees, after defaults.
    pub fn facet_angle_degrees(&self) -> MesherResult<f64> {
        match self.min_facet_angle {
            Some(angle) => non_negative("min_facet_angle", angle).map(config::constants::degrees),
            None => Ok(DEFAULT_FACET_ANGLE_DEGREES),
        }
    }

    /// Builds refinement criteria, applying defaults. The cell radius-edge
    /// ratio is fixed.
    ///
    /// # Errors
    ///
    /// [`MesherError::InvalidOption`] for a set value that is negative or
    /// not finite.
    #[cfg(feature = "refinement")]
    pub fn criteria(&self) -> MesherResult<MeshCriteria> {
        let facet_size = match self.min_delaunay_radius {
            Some(radius) => non_negative("min_delaunay_radius", radius)?,
            None => DEFAULT_FACET_SIZE,
        };
        let facet_distance = match self.min_center_separation {
            Some(distance) => non_negative("min_center_separation", distance)?,
            None => DEFAULT_FACET_DISTANCE,
        };
        Ok(MeshCriteria::new(
            self.facet_angle_degrees()?,
            facet_size,
            facet_distance,
        ))
    }
}

fn positive(name: &'static str, value: f64) -> MesherResult<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(MesherError::invalid_option(name, value))
    }
}

fn non_negative(name: &'static str, value: f64) -> MesherResult<f64> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(MesherError::invalid_option(name, value))
    }
}
