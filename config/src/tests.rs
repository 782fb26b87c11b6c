//! # Tests for Config Constants
//!
//! Unit tests verifying the correctness of configuration constants
//! and helper functions.

use crate::constants::*;

// =============================================================================
// PRECISION TESTS
// =============================================================================

#[test]
fn test_epsilon_is_small_and_positive() {
    assert!(EPSILON > 0.0, "EPSILON must be positive");
    assert!(EPSILON < 1e-6, "EPSILON should be small for precision");
}

#[test]
fn test_relative_error_bound_in_range() {
    assert!(RELATIVE_ERROR_BOUND > 0.0);
    assert!(RELATIVE_ERROR_BOUND < 1e-3);
}

// =============================================================================
// CONTINUATION DEFAULT TESTS
// =============================================================================

#[test]
fn test_default_cell_size_is_tenth_of_radius() {
    assert_eq!(DEFAULT_CELL_SIZE_FRACTION, 0.1);
}

#[test]
fn test_default_search_steps() {
    assert_eq!(DEFAULT_MAX_SEARCH_STEPS, 10);
}

#[test]
fn test_normal_delta_divisor_is_res_squared() {
    assert_eq!(NORMAL_DELTA_DIVISOR, 100.0);
}

#[test]
fn test_start_search_growth_expands() {
    assert!(START_SEARCH_GROWTH > 1.0);
    assert!(START_SEARCH_ATTEMPTS > 0);
}

// =============================================================================
// REFINEMENT DEFAULT TESTS
// =============================================================================

#[test]
fn test_refinement_defaults() {
    assert_eq!(DEFAULT_FACET_ANGLE_DEGREES, 30.0);
    assert_eq!(DEFAULT_FACET_SIZE, 0.1);
    assert_eq!(DEFAULT_FACET_DISTANCE, 0.1);
    assert_eq!(CELL_RADIUS_EDGE_RATIO, 2.0);
}

#[test]
fn test_super_tetrahedron_encloses_bounding_ball() {
    // The super-tetrahedron's inscribed sphere has a third of its
    // circumradius, which must still cover the bounding ball.
    assert!(SUPER_TETRAHEDRON_SCALE / 3.0 > 1.0);
}

// =============================================================================
// GLOBAL CONFIG TESTS
// =============================================================================

#[test]
fn test_default_global_config_is_valid() {
    let cfg = GlobalConfig::default();
    assert_eq!(
        GlobalConfig::new(
            cfg.relative_error_bound,
            cfg.max_refinement_steps,
            cfg.initial_surface_points
        ),
        Ok(cfg)
    );
}

#[test]
fn test_global_config_rejects_invalid_values() {
    assert_eq!(
        GlobalConfig::new(0.0, 10, 10).unwrap_err(),
        ConfigError::InvalidErrorBound(0.0)
    );
    assert_eq!(
        GlobalConfig::new(1.5, 10, 10).unwrap_err(),
        ConfigError::InvalidErrorBound(1.5)
    );
    assert_eq!(
        GlobalConfig::new(1e-6, 10, 0).unwrap_err(),
        ConfigError::InvalidInitialPoints(0)
    );
}

#[test]
fn test_config_error_display() {
    let message = ConfigError::InvalidInitialPoints(0).to_string();
    assert!(message.contains("initial_surface_points"));
}

// =============================================================================
// HELPER TESTS
// =============================================================================

#[test]
fn test_degrees_conversion() {
    assert!((degrees(std::f64::consts::FRAC_PI_2) - 90.0).abs() < EPSILON);
    assert_eq!(degrees(0.0), 0.0);
}

// =============================================================================
// LIMIT TESTS
// =============================================================================

#[test]
fn test_mesh_limits_reasonable() {
    assert!(MAX_VERTICES >= 1_000_000);
    assert!(MAX_TRIANGLES >= 1_000_000);
    assert!(MAX_REFINEMENT_STEPS >= 10_000);
}
