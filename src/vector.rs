use std::ops::{Add, Sub};

/// Values that can be blended as a single vector: summed, subtracted and scaled.
///
/// The animator treats a whole [`ControlPoint`](crate::ControlPoint) as one
/// point in this space, which is what lets it ease every field at once.
pub trait VectorArithmetic: Sized + Add<Output = Self> + Sub<Output = Self> {
    /// The additive identity.
    fn zero() -> Self;

    /// Multiplies every component by `factor`.
    fn scale(&mut self, factor: f64);

    /// Sum of the squared components.
    fn magnitude_squared(&self) -> f64;

    /// Returns a scaled copy.
    fn scaled(mut self, factor: f64) -> Self {
        self.scale(factor);
        self
    }
}

impl VectorArithmetic for glam::Vec2 {
    fn zero() -> Self {
        glam::Vec2::ZERO
    }

    fn scale(&mut self, factor: f64) {
        *self *= factor as f32;
    }

    fn magnitude_squared(&self) -> f64 {
        self.length_squared() as f64
    }
}

impl VectorArithmetic for glam::Vec3 {
    fn zero() -> Self {
        glam::Vec3::ZERO
    }

    fn scale(&mut self, factor: f64) {
        *self *= factor as f32;
    }

    fn magnitude_squared(&self) -> f64 {
        self.length_squared() as f64
    }
}
