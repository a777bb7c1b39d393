//! Compass heading smoothing

use crate::math::{DEG_TO_RAD, RAD_TO_DEG, normalize_degrees};

/// Resultant vectors shorter than this carry no usable direction
const MIN_RESULTANT: f32 = 1e-6;

/// Circular mean of headings in degrees
///
/// Averages unit vectors rather than raw angles so that readings either
/// side of North average to North. Returns `None` for an empty slice or
/// when the readings cancel out.
///
/// # Example
/// ```
/// use wayfind_fusion::heading::circular_mean_degrees;
///
/// let mean = circular_mean_degrees(&[350.0, 10.0]).unwrap();
/// assert!(mean < 1.0 || mean > 359.0);
/// ```
pub fn circular_mean_degrees(headings: &[f32]) -> Option<f32> {
    let (sin_sum, cos_sum) = headings.iter().fold((0.0f32, 0.0f32), |(s, c), h| {
        let (sin, cos) = (h * DEG_TO_RAD).sin_cos();
        (s + sin, c + cos)
    });

    if headings.is_empty() || sin_sum.hypot(cos_sum) < MIN_RESULTANT * headings.len() as f32 {
        return None;
    }

    Some(normalize_degrees(sin_sum.atan2(cos_sum) * RAD_TO_DEG))
}

/// Fixed-size ring buffer of compass readings with circular averaging
#[derive(Debug, Clone)]
pub struct HeadingFilter {
    readings: Vec<f32>,
    capacity: usize,
    next: usize,
    smoothed: Option<f32>,
}

impl HeadingFilter {
    /// Create a filter averaging the last `capacity` readings
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            readings: Vec::with_capacity(capacity),
            capacity,
            next: 0,
            smoothed: None,
        }
    }

    /// Add a reading in degrees and return the smoothed heading
    ///
    /// Non-finite readings are dropped. If the buffered readings cancel out
    /// the previous smoothed value is kept.
    pub fn update(&mut self, heading: f32) -> Option<f32> {
        if !heading.is_finite() {
            return self.smoothed;
        }

        let heading = normalize_degrees(heading);
        if self.readings.len() < self.capacity {
            self.readings.push(heading);
        } else {
            self.readings[self.next] = heading;
        }
        self.next = (self.next + 1) % self.capacity;

        if let Some(mean) = circular_mean_degrees(&self.readings) {
            self.smoothed = Some(mean);
        }
        self.smoothed
    }

    /// Latest smoothed heading
    pub fn heading(&self) -> Option<f32> {
        self.smoothed
    }

    /// Number of buffered readings
    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    pub fn reset(&mut self) {
        self.readings.clear();
        self.next = 0;
        self.smoothed = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn angular_gap(a: f32, b: f32) -> f32 {
        let d = (a - b).rem_euclid(360.0);
        d.min(360.0 - d)
    }

    #[test]
    fn test_mean_straddling_north() {
        let mean = circular_mean_degrees(&[350.0, 10.0]).unwrap();
        assert!(angular_gap(mean, 0.0) < 1e-3, "expected ~0°, got {mean}");

        let mean = circular_mean_degrees(&[355.0, 359.0, 3.0, 7.0]).unwrap();
        assert!(angular_gap(mean, 1.0) < 1e-2, "expected ~1°, got {mean}");
    }

    #[test]
    fn test_mean_of_opposites_is_undefined() {
        assert_eq!(circular_mean_degrees(&[90.0, 270.0]), None);
        assert_eq!(circular_mean_degrees(&[]), None);
    }

    #[test]
    fn test_filter_window_slides() {
        let mut filter = HeadingFilter::new(3);
        filter.update(100.0);
        filter.update(100.0);
        filter.update(100.0);
        assert_eq!(filter.len(), 3);

        // Three new readings fully replace the old ones
        filter.update(200.0);
        filter.update(200.0);
        let heading = filter.update(200.0).unwrap();
        assert!(angular_gap(heading, 200.0) < 1e-3);
        assert_eq!(filter.len(), 3);
    }

    #[test]
    fn test_filter_keeps_previous_on_cancellation() {
        let mut filter = HeadingFilter::new(2);
        let first = filter.update(90.0).unwrap();
        let second = filter.update(270.0).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_filter_ignores_non_finite() {
        let mut filter = HeadingFilter::new(4);
        assert_eq!(filter.update(f32::NAN), None);
        assert!(filter.is_empty());

        filter.update(-30.0);
        assert!(angular_gap(filter.heading().unwrap(), 330.0) < 1e-3);

        filter.reset();
        assert!(filter.is_empty());
        assert_eq!(filter.heading(), None);
    }
}
