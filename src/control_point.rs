use crate::vector::VectorArithmetic;
use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};
use std::ops::{Add, Sub};

/// Linear RGB color, each channel in `0.0..=1.0`.
pub type Color = Vec3;

/// One node of a mesh gradient.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ControlPoint {
    /// Color of the node.
    pub color: Color,
    /// Position in the `[-1, 1]²` canonical space. Moving nodes past their
    /// neighbours makes patches overlap.
    pub location: Vec2,
    /// Derivative of the surface along the grid's x axis.
    /// Larger or skewed tangents give a more "sinusoidal" look.
    pub u_tangent: Vec2,
    /// Derivative of the surface along the grid's y axis.
    pub v_tangent: Vec2,
}

impl ControlPoint {
    pub fn new(color: Color, location: Vec2, u_tangent: Vec2, v_tangent: Vec2) -> Self {
        Self {
            color,
            location,
            u_tangent,
            v_tangent,
        }
    }
}

impl Add for ControlPoint {
    type Output = ControlPoint;

    fn add(self, rhs: Self) -> Self {
        Self {
            color: self.color + rhs.color,
            location: self.location + rhs.location,
            u_tangent: self.u_tangent + rhs.u_tangent,
            v_tangent: self.v_tangent + rhs.v_tangent,
        }
    }
}

impl Sub for ControlPoint {
    type Output = ControlPoint;

    fn sub(self, rhs: Self) -> Self {
        Self {
            color: self.color - rhs.color,
            location: self.location - rhs.location,
            u_tangent: self.u_tangent - rhs.u_tangent,
            v_tangent: self.v_tangent - rhs.v_tangent,
        }
    }
}

impl VectorArithmetic for ControlPoint {
    fn zero() -> Self {
        Self::default()
    }

    fn scale(&mut self, factor: f64) {
        self.color.scale(factor);
        self.location.scale(factor);
        self.u_tangent.scale(factor);
        self.v_tangent.scale(factor);
    }

    fn magnitude_squared(&self) -> f64 {
        self.color.magnitude_squared()
            + self.location.magnitude_squared()
            + self.u_tangent.magnitude_squared()
            + self.v_tangent.magnitude_squared()
    }
}
