//! # Config Crate
//!
//! Centralized configuration constants for the implicit surface meshing
//! workspace. Default meshing parameters, tolerances and safety limits are
//! defined here so the meshing kernels never scatter literals.
//!
//! ## Usage
//!
//! ```rust
//! use config::constants::{DEFAULT_CELL_SIZE_FRACTION, DEFAULT_MAX_SEARCH_STEPS};
//!
//! let radius = 2.0;
//! let user_cell_size: Option<f64> = None;
//! let cell_size = user_cell_size.unwrap_or(radius * DEFAULT_CELL_SIZE_FRACTION);
//! assert!((cell_size - 0.2).abs() < 1e-12);
//!
//! let user_steps: Option<u32> = None;
//! assert_eq!(user_steps.unwrap_or(DEFAULT_MAX_SEARCH_STEPS), 10);
//! ```
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All constants defined once, used everywhere
//! - **Dependency-Free**: Pure values and validation, no external crates

pub mod constants;

#[cfg(test)]
mod tests;
