//! Integer grid vectors and the angular math used for spatial reasoning
//! between actors.
//!
//! Positions are whole grid cells, so [`Vector`] carries `i32` coordinates
//! and value equality. The geometry operations live behind the
//! [`ScalarProduct`] trait so an alternate coordinate representation (3D,
//! fixed-point) can be substituted without touching call sites.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Dot-product geometry over any vector-like type.
pub trait ScalarProduct<Rhs = Self> {
    /// Standard dot product of the two coordinate pairs.
    fn dot(&self, other: &Rhs) -> f64;

    /// Cosine of the angle between the two position vectors, in [-1, 1].
    ///
    /// Fails with [`CoreError::UndefinedAngle`] when either operand has zero
    /// magnitude - callers must be able to distinguish "undefined angle"
    /// from "angle is 0".
    fn cos(&self, other: &Rhs) -> Result<f64, CoreError>;

    /// Inverse cosine of [`ScalarProduct::cos`]. Radians in [0, π] by
    /// default; converted to degrees ([0, 180]) when `degrees` is set.
    fn arc_cos(&self, other: &Rhs, degrees: bool) -> Result<f64, CoreError>;
}

/// A 2D integer grid coordinate. No identity beyond value equality; replaced
/// wholesale on movement rather than mutated in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Vector {
    pub x: i32,
    pub y: i32,
}

impl Vector {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Euclidean length of this vector.
    pub fn magnitude(&self) -> f64 {
        let x = f64::from(self.x);
        let y = f64::from(self.y);
        (x * x + y * y).sqrt()
    }
}

impl ScalarProduct for Vector {
    fn dot(&self, other: &Vector) -> f64 {
        let dot = i64::from(self.x) * i64::from(other.x) + i64::from(self.y) * i64::from(other.y);
        dot as f64
    }

    fn cos(&self, other: &Vector) -> Result<f64, CoreError> {
        let denom = self.magnitude() * other.magnitude();
        if denom == 0.0 {
            return Err(CoreError::UndefinedAngle);
        }
        // Rounding in the magnitude product can push the ratio a hair outside
        // [-1, 1], which would make acos return NaN downstream.
        Ok((self.dot(other) / denom).clamp(-1.0, 1.0))
    }

    fn arc_cos(&self, other: &Vector, degrees: bool) -> Result<f64, CoreError> {
        let radians = self.cos(other)?.acos();
        Ok(if degrees { radians.to_degrees() } else { radians })
    }
}
