//! # Bounding Ball
//!
//! Spherical bounding region handed to both meshers. The continuation path
//! derives its default cell size from the radius; the refinement path clips
//! its domain to the ball.

use glam::DVec3;
use serde::{Deserialize, Serialize};

/// A ball in 3D space.
///
/// # Example
///
/// ```rust
/// use implicit_mesher::Ball3;
/// use glam::DVec3;
///
/// let ball = Ball3::new(DVec3::ZERO, 2.0);
/// assert!(ball.contains(DVec3::new(1.0, 1.0, 1.0)));
/// assert_eq!(ball.squared_radius(), 4.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ball3 {
    center: DVec3,
    radius: f64,
}

impl Ball3 {
    /// Creates a ball from its center and radius.
    pub fn new(center: DVec3, radius: f64) -> Self {
        Self { center, radius }
    }

    /// Returns the center.
    #[inline]
    pub fn center(&self) -> DVec3 {
        self.center
    }

    /// Returns the radius.
    #[inline]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Returns the squared radius.
    #[inline]
    pub fn squared_radius(&self) -> f64 {
        self.radius * self.radius
    }

    /// Returns true if `point` lies strictly inside the ball.
    #[inline]
    pub fn contains(&self, point: DVec3) -> bool {
        self.center.distance_squared(point) < self.squared_radius()
    }
}
