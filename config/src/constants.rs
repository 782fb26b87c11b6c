//! # Configuration Constants
//!
//! Centralized constants for the implicit surface meshing pipeline. All
//! default meshing parameters, numerical tolerances and safety limits are
//! defined here.
//!
//! ## Categories
//!
//! - **Precision**: Floating-point comparison tolerances
//! - **Continuation**: Defaults for the cell-marching polygonizer
//! - **Refinement**: Defaults for the Delaunay-refinement mesher
//! - **Limits**: Maximum values for safety bounds

use std::fmt;

// =============================================================================
// PRECISION CONSTANTS
// =============================================================================

/// Epsilon for floating-point comparisons.
///
/// # Example
///
/// ```rust
/// use config::constants::EPSILON;
///
/// fn approximately_equal(a: f64, b: f64) -> bool {
///     (a - b).abs() < EPSILON
/// }
///
/// assert!(approximately_equal(1.0, 1.0 + 1e-11));
/// ```
pub const EPSILON: f64 = 1e-10;

/// Bisection tolerance for surface intersections, relative to the radius of
/// the bounding sphere.
///
/// A dual segment crossing the surface is bisected until its bracket is
/// shorter than `RELATIVE_ERROR_BOUND * radius`.
///
/// # Example
///
/// ```rust
/// use config::constants::RELATIVE_ERROR_BOUND;
///
/// let radius = 2.0;
/// let error_bound = RELATIVE_ERROR_BOUND * radius;
/// assert!(error_bound < 1e-5);
/// ```
pub const RELATIVE_ERROR_BOUND: f64 = 1e-6;

// =============================================================================
// CONTINUATION POLYGONIZER CONSTANTS
// =============================================================================

/// Default cell size as a fraction of the bounding ball radius.
///
/// # Example
///
/// ```rust
/// use config::constants::DEFAULT_CELL_SIZE_FRACTION;
///
/// let user_cell_size: Option<f64> = None;
/// let radius = 2.0;
/// let cell_size = user_cell_size.unwrap_or(radius * DEFAULT_CELL_SIZE_FRACTION);
/// assert!((cell_size - 0.2).abs() < 1e-12);
/// ```
pub const DEFAULT_CELL_SIZE_FRACTION: f64 = 0.1;

/// Default limit on how many cells away from the starting cube the
/// polygonizer may travel along each lattice axis.
pub const DEFAULT_MAX_SEARCH_STEPS: u32 = 10;

/// Number of bisection steps used to converge onto a zero crossing.
pub const CONVERGE_ITERATIONS: u32 = 10;

/// Divisor of the cell size giving the finite-difference step for normals.
///
/// The normal step is `cell_size / NORMAL_DELTA_DIVISOR`, i.e. `size / RES²`.
pub const NORMAL_DELTA_DIVISOR: f32 = (CONVERGE_ITERATIONS * CONVERGE_ITERATIONS) as f32;

/// Maximum number of random probes when searching for a sample of a given
/// sign around the seed point.
pub const START_SEARCH_ATTEMPTS: u32 = 10_000;

/// Growth factor of the start search radius after each failed probe.
pub const START_SEARCH_GROWTH: f32 = 1.0005;

/// Seed of the deterministic generator used for start searches and initial
/// surface sampling.
pub const RANDOM_SEED: u64 = 1;

// =============================================================================
// DELAUNAY REFINEMENT CONSTANTS
// =============================================================================

/// Default lower bound on facet angles, in degrees.
///
/// # Example
///
/// ```rust
/// use config::constants::{degrees, DEFAULT_FACET_ANGLE_DEGREES};
///
/// let user_angle: Option<f64> = Some(std::f64::consts::FRAC_PI_6);
/// let angle = user_angle.map(degrees).unwrap_or(DEFAULT_FACET_ANGLE_DEGREES);
/// assert!((angle - 30.0).abs() < 1e-9);
/// ```
pub const DEFAULT_FACET_ANGLE_DEGREES: f64 = 30.0;

/// Default upper bound on the radius of surface Delaunay balls.
pub const DEFAULT_FACET_SIZE: f64 = 0.1;

/// Default upper bound on the distance between a facet circumcenter and the
/// center of its surface Delaunay ball.
pub const DEFAULT_FACET_DISTANCE: f64 = 0.1;

/// Upper bound on the circumradius to shortest edge ratio of cells inside the
/// domain. Not user-tunable.
pub const CELL_RADIUS_EDGE_RATIO: f64 = 2.0;

/// Number of surface points sampled before refinement starts.
pub const INITIAL_SURFACE_POINTS: usize = 20;

/// Maximum number of center-to-boundary probes used to find the initial
/// surface points.
pub const INITIAL_POINT_ATTEMPTS: usize = 1_000;

/// Maximum number of point insertions performed by a single refinement.
pub const MAX_REFINEMENT_STEPS: usize = 200_000;

/// Distance of the enclosing super-tetrahedron vertices from the domain
/// center, in bounding radii.
pub const SUPER_TETRAHEDRON_SCALE: f64 = 50.0;

// =============================================================================
// LIMIT CONSTANTS
// =============================================================================

/// Maximum number of vertices in a single mesh.
///
/// # Example
///
/// ```rust
/// use config::constants::MAX_VERTICES;
///
/// let vertex_count = 1000;
/// assert!(vertex_count < MAX_VERTICES);
/// ```
pub const MAX_VERTICES: usize = 10_000_000;

/// Maximum number of triangles in a single mesh.
pub const MAX_TRIANGLES: usize = 10_000_000;

// =============================================================================
// GLOBAL CONFIGURATION
// =============================================================================

/// Immutable snapshot of the tunable meshing settings shared between crates.
///
/// # Examples
/// ```
/// use config::constants::GlobalConfig;
/// let config = GlobalConfig::default();
/// assert!(config.relative_error_bound > 0.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlobalConfig {
    /// Bisection tolerance relative to the bounding radius.
    pub relative_error_bound: f64,
    /// Cap on refinement insertions.
    pub max_refinement_steps: usize,
    /// Number of surface points sampled before refinement.
    pub initial_surface_points: usize,
}

impl GlobalConfig {
    /// Builds a configuration, rejecting values the meshers cannot work with.
    ///
    /// # Examples
    /// ```
    /// use config::constants::GlobalConfig;
    /// let cfg = GlobalConfig::new(1.0e-4, 5_000, 12).expect("valid config");
    /// assert_eq!(cfg.initial_surface_points, 12);
    /// ```
    pub fn new(
        relative_error_bound: f64,
        max_refinement_steps: usize,
        initial_surface_points: usize,
    ) -> Result<Self, ConfigError> {
        if !(relative_error_bound > 0.0 && relative_error_bound < 1.0) {
            return Err(ConfigError::InvalidErrorBound(relative_error_bound));
        }
        if initial_surface_points == 0 {
            return Err(ConfigError::InvalidInitialPoints(initial_surface_points));
        }
        Ok(Self {
            relative_error_bound,
            max_refinement_steps,
            initial_surface_points,
        })
    }
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            relative_error_bound: RELATIVE_ERROR_BOUND,
            max_refinement_steps: MAX_REFINEMENT_STEPS,
            initial_surface_points: INITIAL_SURFACE_POINTS,
        }
    }
}

/// Error returned when invalid configuration values are provided.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigError {
    /// Raised when the relative error bound is not in `(0, 1)`.
    InvalidErrorBound(f64),
    /// Raised when no initial surface points are requested.
    InvalidInitialPoints(usize),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidErrorBound(value) => {
                write!(f, "relative_error_bound must be in (0, 1): {value}")
            }
            ConfigError::InvalidInitialPoints(value) => {
                write!(f, "initial_surface_points must be >= 1: {value}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

/// Converts an angle from radians to degrees.
///
/// # Example
///
/// ```rust
/// use config::constants::degrees;
///
/// assert!((degrees(std::f64::consts::PI) - 180.0).abs() < 1e-12);
/// ```
#[inline]
pub fn degrees(radians: f64) -> f64 {
    radians.to_degrees()
}
