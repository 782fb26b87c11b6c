//! # Scalar Fields
//!
//! The caller describes a surface as the zero level set of a [`ScalarField`].
//! Each mesher sees the field through a thin adapter matching its own calling
//! convention:
//!
//! - [`PolygonizerField`]: three single-precision coordinates in, `f32` out
//! - [`RefinementField`]: a double-precision point in, `f64` out
//!
//! Adapters forward and cast only. They never cache, clamp or bound-check,
//! and may be called any number of times.

use glam::{DVec3, Vec3};

use crate::error::{MesherError, MesherResult};

// =============================================================================
// SCALAR FIELD
// =============================================================================

/// A function `ℝ³ → ℝ` whose zero level set is the surface to mesh.
///
/// Negative values are inside the surface. Any `Fn(DVec3) -> f64` closure is
/// a scalar field.
///
/// # Example
///
/// ```rust
/// use implicit_mesher::ScalarField;
/// use glam::DVec3;
///
/// let sphere = |p: DVec3| p.length() - 1.0;
/// assert_eq!(sphere.eval(DVec3::ZERO), -1.0);
/// ```
pub trait ScalarField {
    /// Evaluates the field at `p`.
    fn eval(&self, p: DVec3) -> f64;
}

impl<F> ScalarField for F
where
    F: Fn(DVec3) -> f64 + ?Sized,
{
    #[inline]
    fn eval(&self, p: DVec3) -> f64 {
        self(p)
    }
}

// =============================================================================
// POLYGONIZER ADAPTER
// =============================================================================

/// Evaluates a field as required by the continuation polygonizer.
#[derive(Debug)]
pub struct PolygonizerField<'a, F: ?Sized> {
    field: &'a F,
}

impl<F: ?Sized> Clone for PolygonizerField<'_, F> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<F: ?Sized> Copy for PolygonizerField<'_, F> {}

impl<'a, F: ScalarField + ?Sized> PolygonizerField<'a, F> {
    /// Wraps `field`; `None` is rejected with [`MesherError::NullEvaluator`].
    pub fn new(field: Option<&'a F>) -> MesherResult<Self> {
        field
            .map(|field| Self { field })
            .ok_or(MesherError::NullEvaluator)
    }

    /// Evaluates the field at `(x, y, z)`.
    #[inline]
    pub fn eval(&self, x: f32, y: f32, z: f32) -> f32 {
        self.field
            .eval(DVec3::new(f64::from(x), f64::from(y), f64::from(z))) as f32
    }

    /// Evaluates the field at `p`.
    #[inline]
    pub fn eval_at(&self, p: Vec3) -> f32 {
        self.eval(p.x, p.y, p.z)
    }

    /// Unit forward-difference gradient at `p` with step `delta`.
    ///
    /// Returns the raw (zero) difference when the field is flat at `p`.
    pub fn normal(&self, p: Vec3, delta: f32) -> Vec3 {
        let f = self.eval_at(p);
        let gradient = Vec3::new(
            self.eval(p.x + delta, p.y, p.z) - f,
            self.eval(p.x, p.y + delta, p.z) - f,
            self.eval(p.x, p.y, p.z + delta) - f,
        );
        let length = gradient.length();
        if length != 0.0 {
            gradient / length
        } else {
            gradient
        }
    }
}

// =============================================================================
// REFINEMENT ADAPTER
// =============================================================================

/// Evaluates a field as required by the Delaunay-refinement domain.
#[derive(Debug)]
pub struct RefinementField<'a, F: ?Sized> {
    field: &'a F,
}

impl<F: ?Sized> Clone for RefinementField<'_, F> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<F: ?Sized> Copy for RefinementField<'_, F> {}

impl<'a, F: ScalarField + ?Sized> RefinementField<'a, F> {
    /// Wraps `field`; `None` is rejected with [`MesherError::NullEvaluator`].
    pub fn new(field: Option<&'a F>) -> MesherResult<Self> {
        field
            .map(|field| Self { field })
            .ok_or(MesherError::NullEvaluator)
    }

    /// Evaluates the field at `p`.
    #[inline]
    pub fn eval(&self, p: DVec3) -> f64 {
        self.field.eval(p)
    }
}

#[cfg(test)]
mod tests;
