//! Mesher-level configuration building on the shared `config` crate.
//!
//! These settings are not meshing *options* (those belong to the caller's
//! request); they bound the numerical work the kernels are allowed to do.

use config::constants::{
    GlobalConfig, INITIAL_SURFACE_POINTS, MAX_REFINEMENT_STEPS, RELATIVE_ERROR_BOUND,
};

use crate::error::MesherResult;

/// Kernel configuration wrapper.
///
/// # Examples
/// ```
/// use implicit_mesher::config::MesherConfig;
/// let cfg = MesherConfig::default();
/// assert!(cfg.relative_error_bound > 0.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MesherConfig {
    /// Bisection tolerance for surface intersections, relative to the
    /// bounding radius.
    pub relative_error_bound: f64,
    /// Maximum number of refinement insertions per call.
    pub max_refinement_steps: usize,
    /// Number of surface points sampled before refinement starts.
    pub initial_surface_points: usize,
}

impl MesherConfig {
    /// Creates a new configuration from explicit values.
    ///
    /// # Examples
    /// ```
    /// use implicit_mesher::config::MesherConfig;
    /// let cfg = MesherConfig::new(1.0e-5, 10_000, 8).unwrap();
    /// assert_eq!(cfg.max_refinement_steps, 10_000);
    /// ```
    pub fn new(
        relative_error_bound: f64,
        max_refinement_steps: usize,
        initial_surface_points: usize,
    ) -> MesherResult<Self> {
        let cfg = GlobalConfig::new(
            relative_error_bound,
            max_refinement_steps,
            initial_surface_points,
        )?;
        Ok(Self {
            relative_error_bound: cfg.relative_error_bound,
            max_refinement_steps: cfg.max_refinement_steps,
            initial_surface_points: cfg.initial_surface_points,
        })
    }
}

impl Default for MesherConfig {
    fn default() -> Self {
        Self {
            relative_error_bound: RELATIVE_ERROR_BOUND,
            max_refinement_steps: MAX_REFINEMENT_STEPS,
            initial_surface_points: INITIAL_SURFACE_POINTS,
        }
    }
}
