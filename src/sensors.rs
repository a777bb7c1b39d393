//! Sensor adapters
//!
//! Platform motion and orientation payloads differ in which fields they
//! fill in. These adapters normalise them into [`MotionSample`] and
//! [`HeadingSample`] before anything reaches the position engine.

use nalgebra::Vector3;

use crate::math::{STANDARD_GRAVITY, normalize_degrees};
use crate::types::{HeadingSample, MotionSample};

/// Availability of a sensor as reported by the host platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SensorStatus {
    /// Nothing reported yet
    #[default]
    Unknown,
    Available,
    /// The user refused the permission prompt
    Denied,
    /// The device has no such sensor
    Unavailable,
}

impl SensorStatus {
    /// Whether samples can still be expected from this sensor
    pub fn is_usable(&self) -> bool {
        matches!(self, SensorStatus::Unknown | SensorStatus::Available)
    }
}

/// Orientation event as delivered by the platform
///
/// Some platforms report a clockwise compass heading directly, others only
/// an `alpha` rotation measured counter-clockwise about the vertical axis.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RawOrientation {
    /// Clockwise degrees from North, when the platform provides it
    pub compass_heading: Option<f32>,
    /// Counter-clockwise rotation in degrees
    pub alpha: Option<f32>,
    /// Whether `alpha` is referenced to magnetic North
    pub absolute: bool,
    pub timestamp: f32,
}

/// Motion event as delivered by the platform
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RawMotion {
    /// Acceleration including gravity, m/s²
    pub x: Option<f32>,
    pub y: Option<f32>,
    pub z: Option<f32>,
    pub timestamp: f32,
}

/// Convert a platform orientation event into a heading sample
///
/// Prefers the compass heading; falls back to `360 − alpha`. Returns
/// `None` when neither field holds a finite value.
///
/// # Example
/// ```
/// use wayfind_fusion::sensors::{normalize_orientation, RawOrientation};
///
/// let raw = RawOrientation { alpha: Some(90.0), absolute: true, ..Default::default() };
/// let sample = normalize_orientation(&raw).unwrap();
/// assert_eq!(sample.heading, 270.0);
/// ```
pub fn normalize_orientation(raw: &RawOrientation) -> Option<HeadingSample> {
    let heading = match (raw.compass_heading, raw.alpha) {
        (Some(compass), _) if compass.is_finite() => compass,
        (_, Some(alpha)) if alpha.is_finite() => 360.0 - alpha,
        _ => return None,
    };

    if !raw.timestamp.is_finite() {
        return None;
    }

    Some(HeadingSample::new(normalize_degrees(heading), raw.timestamp))
}

/// Convert a platform motion event into a motion sample
///
/// Returns `None` if any axis is missing or not finite.
pub fn normalize_motion(raw: &RawMotion) -> Option<MotionSample> {
    let (x, y, z) = (raw.x?, raw.y?, raw.z?);
    if ![x, y, z, raw.timestamp].iter().all(|v| v.is_finite()) {
        return None;
    }
    Some(MotionSample::new(Vector3::new(x, y, z), raw.timestamp))
}

/// Deterministic synthetic walker
///
/// Produces accelerometer samples with one short vertical spike per step,
/// for demos, benches and tests on machines without motion sensors.
///
/// # Example
/// ```
/// use wayfind_fusion::sensors::SimulatedWalk;
///
/// let walk = SimulatedWalk::new(2.0, 50.0);
/// let samples: Vec<_> = walk.samples(0.0, 4).collect();
/// assert_eq!(samples.len(), 100);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulatedWalk {
    /// Steps per second
    pub cadence: f32,
    /// Samples per second
    pub sample_rate: f32,
    /// Peak deviation from gravity during a footfall, m/s²
    pub peak: f32,
    /// Fraction of each step spent in the spike
    pub duty: f32,
}

impl SimulatedWalk {
    pub fn new(cadence: f32, sample_rate: f32) -> Self {
        Self {
            cadence,
            sample_rate,
            peak: 3.0,
            duty: 0.2,
        }
    }

    /// Samples for `steps` footfalls starting at `start` seconds
    pub fn samples(&self, start: f32, steps: usize) -> impl Iterator<Item = MotionSample> + '_ {
        let per_step = (self.sample_rate / self.cadence).round().max(1.0) as usize;
        let spike = ((per_step as f32 * self.duty).round() as usize).max(1);

        (0..steps * per_step).map(move |i| {
            let vertical = if i % per_step < spike {
                STANDARD_GRAVITY + self.peak
            } else {
                STANDARD_GRAVITY
            };
            MotionSample::new(Vector3::new(0.0, 0.0, vertical), start + i as f32 / self.sample_rate)
        })
    }
}
