//! Deterministic pseudo-random numbers.
//!
//! Both meshers probe space randomly (start search, initial surface
//! sampling). A fixed-seed linear congruential generator keeps two runs with
//! identical inputs producing identical meshes.

use glam::DVec3;

/// 64-bit linear congruential generator.
#[derive(Debug, Clone)]
pub(crate) struct Lcg {
    state: u64,
}

impl Lcg {
    pub(crate) fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    pub(crate) fn next_u32(&mut self) -> u32 {
        self.state = self
            .state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (self.state >> 32) as u32
    }

    /// Uniform value in `[0, 1]`.
    pub(crate) fn next_f64(&mut self) -> f64 {
        self.next_u32() as f64 / u32::MAX as f64
    }

    /// Uniform value in `[0, 1]`.
    pub(crate) fn next_f32(&mut self) -> f32 {
        self.next_f64() as f32
    }

    /// Uniformly distributed unit vector.
    pub(crate) fn next_unit_vector(&mut self) -> DVec3 {
        // Archimedes: uniform z and azimuth give a uniform sphere sample.
        let z = 2.0 * self.next_f64() - 1.0;
        let phi = std::f64::consts::TAU * self.next_f64();
        let r = (1.0 - z * z).max(0.0).sqrt();
        DVec3::new(r * phi.cos(), r * phi.sin(), z)
    }
}
