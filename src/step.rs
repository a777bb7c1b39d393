//! Step detection and adaptive step length for dead reckoning

use std::collections::VecDeque;

use crate::math::Vector3Ext;
use crate::types::{MotionSample, StepSettings};

/// A detected step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepEvent {
    /// Timestamp of the sample that completed the step, in seconds
    pub timestamp: f32,
    /// Estimated stride for this step in metres
    pub length: f32,
}

/// Threshold step detector over accelerometer magnitude
///
/// Each sample contributes `|‖a‖ − g|` to a short moving average. A step
/// is a rising edge of that average across the configured threshold, at
/// least `min_step_interval` after the previous step.
///
/// # Example
/// ```
/// use nalgebra::Vector3;
/// use wayfind_fusion::{MotionSample, StepDetector, StepSettings};
///
/// let mut detector = StepDetector::new(StepSettings::default());
///
/// // Resting phone: magnitude equals gravity, no steps
/// let resting = MotionSample::new(Vector3::new(0.0, 0.0, 9.81), 0.0);
/// assert!(detector.update(&resting).is_none());
/// ```
#[derive(Debug, Clone)]
pub struct StepDetector {
    settings: StepSettings,
    /// Recent gravity deviations for the moving average
    deviations: VecDeque<f32>,
    /// Moving average after the latest sample
    smoothed: f32,
    /// Whether the average is currently above the threshold
    above_threshold: bool,
    last_step_time: Option<f32>,
    stride: StrideEstimator,
    total_steps: u32,
}

impl StepDetector {
    pub fn new(settings: StepSettings) -> Self {
        Self {
            settings,
            deviations: VecDeque::with_capacity(settings.smoothing_window),
            smoothed: 0.0,
            above_threshold: false,
            last_step_time: None,
            stride: StrideEstimator::new(settings),
            total_steps: 0,
        }
    }

    /// Feed one accelerometer sample, returning a step if one completed
    ///
    /// Samples with non-finite components are ignored.
    pub fn update(&mut self, sample: &MotionSample) -> Option<StepEvent> {
        if !sample.acceleration.all_finite() || !sample.timestamp.is_finite() {
            return None;
        }

        if self.deviations.len() == self.settings.smoothing_window {
            self.deviations.pop_front();
        }
        self.deviations.push_back(sample.acceleration.gravity_deviation());
        self.smoothed = self.deviations.iter().sum::<f32>() / self.deviations.len() as f32;

        let was_above = self.above_threshold;
        self.above_threshold = self.smoothed >= self.settings.threshold;
        if was_above || !self.above_threshold {
            return None;
        }

        // Rising edge; debounce against the previous step
        if let Some(last) = self.last_step_time {
            let interval = sample.timestamp - last;
            if interval < self.settings.min_step_interval {
                return None;
            }
            self.stride.record_interval(interval);
        }

        self.last_step_time = Some(sample.timestamp);
        self.total_steps += 1;

        Some(StepEvent {
            timestamp: sample.timestamp,
            length: self.stride.step_length(),
        })
    }

    /// Smoothed gravity deviation after the latest sample, in m/s²
    pub fn smoothed_deviation(&self) -> f32 {
        self.smoothed
    }

    /// Current cadence in steps per second, zero until known
    pub fn cadence(&self) -> f32 {
        self.stride.cadence()
    }

    /// Step length the next step would be credited with
    pub fn step_length(&self) -> f32 {
        self.stride.step_length()
    }

    pub fn total_steps(&self) -> u32 {
        self.total_steps
    }

    /// Clear all buffers and counters
    pub fn reset(&mut self) {
        self.deviations.clear();
        self.smoothed = 0.0;
        self.above_threshold = false;
        self.last_step_time = None;
        self.stride.reset();
        self.total_steps = 0;
    }
}

/// Cadence-adaptive stride length
///
/// Keeps a rolling window of inter-step intervals. Once enough intervals
/// are known the base length is scaled by `mean_interval /
/// reference_interval`, clamped to the configured factor range, so a
/// quicker cadence yields a shorter stride.
#[derive(Debug, Clone)]
pub struct StrideEstimator {
    settings: StepSettings,
    intervals: VecDeque<f32>,
}

impl StrideEstimator {
    pub fn new(settings: StepSettings) -> Self {
        Self {
            settings,
            intervals: VecDeque::with_capacity(settings.interval_window),
        }
    }

    /// Record the time between two consecutive steps
    ///
    /// A gap longer than `max_step_interval` means the walker paused, so
    /// the window restarts.
    pub fn record_interval(&mut self, interval: f32) {
        if interval > self.settings.max_step_interval {
            self.intervals.clear();
            return;
        }

        if self.intervals.len() == self.settings.interval_window {
            self.intervals.pop_front();
        }
        self.intervals.push_back(interval);
    }

    fn mean_interval(&self) -> Option<f32> {
        if self.intervals.is_empty() || self.intervals.len() < self.settings.min_interval_samples {
            return None;
        }
        Some(self.intervals.iter().sum::<f32>() / self.intervals.len() as f32)
    }

    /// Current stride factor relative to the base length
    pub fn factor(&self) -> f32 {
        match self.mean_interval() {
            Some(mean) => (mean / self.settings.reference_interval)
                .clamp(self.settings.min_stride_factor, self.settings.max_stride_factor),
            None => 1.0,
        }
    }

    pub fn step_length(&self) -> f32 {
        self.settings.base_step_length * self.factor()
    }

    /// Steps per second, zero until enough intervals are known
    pub fn cadence(&self) -> f32 {
        match self.mean_interval() {
            Some(mean) if mean > 0.0 => 1.0 / mean,
            _ => 0.0,
        }
    }

    pub fn reset(&mut self) {
        self.intervals.clear();
    }
}
