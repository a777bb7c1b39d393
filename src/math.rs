//! Angle helpers and nalgebra extensions used across the wayfinding core

use nalgebra::{Vector2, Vector3};

/// Mathematical constants
pub const DEG_TO_RAD: f32 = core::f32::consts::PI / 180.0;
pub const RAD_TO_DEG: f32 = 180.0 / core::f32::consts::PI;

/// Standard gravity in m/s²
pub const STANDARD_GRAVITY: f32 = 9.80665;

/// Wrap an angle in degrees into `[0, 360)`
pub fn normalize_degrees(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Wrap an angle in degrees into `(-180, 180]`
pub fn signed_degrees(angle: f32) -> f32 {
    let wrapped = normalize_degrees(angle);
    if wrapped > 180.0 { wrapped - 360.0 } else { wrapped }
}

/// Extension trait for floor-plan vectors
///
/// Floor plans use image coordinates: x grows to the right and y grows
/// downwards. Bearings are measured clockwise from plan-up (negative y).
pub trait Vector2Ext {
    /// Bearing of the vector in degrees, `[0, 360)`
    fn bearing(&self) -> f32;

    /// Signed turn from `self` to `next` in degrees, `(-180, 180]`
    ///
    /// Positive values are counter-clockwise as seen on the rendered plan
    /// (a left turn), negative values clockwise (a right turn).
    fn turn_angle_to(&self, next: &Vector2<f32>) -> f32;
}

impl Vector2Ext for Vector2<f32> {
    fn bearing(&self) -> f32 {
        normalize_degrees(self.x.atan2(-self.y) * RAD_TO_DEG)
    }

    fn turn_angle_to(&self, next: &Vector2<f32>) -> f32 {
        // In y-down coordinates the mathematical cross product has the
        // opposite sign of the on-screen rotation.
        let cross = self.x * next.y - self.y * next.x;
        let dot = self.dot(next);
        signed_degrees(-cross.atan2(dot) * RAD_TO_DEG)
    }
}

/// Extension trait for accelerometer vectors
pub trait Vector3Ext {
    /// Absolute deviation of the vector magnitude from standard gravity
    fn gravity_deviation(&self) -> f32;

    /// Whether every component is finite
    fn all_finite(&self) -> bool;
}

impl Vector3Ext for Vector3<f32> {
    fn gravity_deviation(&self) -> f32 {
        (self.magnitude() - STANDARD_GRAVITY).abs()
    }

    fn all_finite(&self) -> bool {
        self.iter().all(|c| c.is_finite())
    }
}
