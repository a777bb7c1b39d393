//! Core types and settings for the wayfinding core

use nalgebra::{Point2, Vector3};

/// Where the current position estimate came from
///
/// The engine centralises every transition between these sources in its
/// reset, recalibration, external-fix and step entry points.
///
/// # Sources
/// - **Accelerometer**: dead reckoning from detected steps
/// - **Beacon**: absorbed external fix (beacon, visual positioning)
/// - **Manual**: user recalibration or tap-to-set
/// - **Simulation**: timer-driven walking when no motion sensor is present
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PositionSource {
    /// Step-driven dead reckoning
    #[default]
    Accelerometer,
    /// External absolute fix
    Beacon,
    /// Manual recalibration or tap-to-set
    Manual,
    /// Simulated walking for devices without motion sensors
    Simulation,
}

/// One accelerometer sample
///
/// Acceleration includes gravity and is expressed in m/s². The timestamp
/// is in seconds on the caller's session clock.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionSample {
    pub acceleration: Vector3<f32>,
    pub timestamp: f32,
}

impl MotionSample {
    pub fn new(acceleration: Vector3<f32>, timestamp: f32) -> Self {
        Self {
            acceleration,
            timestamp,
        }
    }
}

/// One compass reading, normalised by the sensor adapters
///
/// `heading` is in degrees clockwise from North, `[0, 360)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeadingSample {
    pub heading: f32,
    pub timestamp: f32,
}

impl HeadingSample {
    pub fn new(heading: f32, timestamp: f32) -> Self {
        Self { heading, timestamp }
    }
}

/// An absolute position estimate from outside dead reckoning
///
/// # Example
/// ```
/// use nalgebra::Point2;
/// use wayfind_fusion::ExternalFix;
///
/// // Visual positioning result, good to about two metres
/// let fix = ExternalFix::new(Point2::new(120.0, 48.0), 2.0, 31.5);
/// assert_eq!(fix.accuracy, 2.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExternalFix {
    /// Floor-plan coordinate of the fix
    pub position: Point2<f32>,
    /// Stated accuracy radius in metres (smaller is better)
    pub accuracy: f32,
    pub timestamp: f32,
}

impl ExternalFix {
    pub fn new(position: Point2<f32>, accuracy: f32, timestamp: f32) -> Self {
        Self {
            position,
            accuracy,
            timestamp,
        }
    }
}

/// Live output of the position engine
///
/// Consumers only ever see copies of this state; the engine owns and
/// mutates the original.
///
/// # Example
/// ```
/// use wayfind_fusion::{PositionEngine, PositionSource};
///
/// let engine = PositionEngine::new();
/// let state = engine.state();
///
/// assert_eq!(state.step_count, 0);
/// assert_eq!(state.source, PositionSource::Accelerometer);
/// assert!(!state.off_route);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionState {
    /// Floor-plan coordinate of the estimate
    pub position: Point2<f32>,
    /// Smoothed compass heading in degrees, `None` before the first reading
    pub heading: Option<f32>,
    /// Bearing of the current route segment in degrees
    pub route_heading: Option<f32>,
    /// Index of the route segment the estimate lies on
    pub segment: usize,
    /// Distance along the route in metres
    pub distance_walked: f32,
    /// Steps counted since the route was set
    pub step_count: u32,
    /// Trust in the estimate, `(0, 1]`
    pub confidence: f32,
    /// What produced the latest estimate
    pub source: PositionSource,
    /// Walked further than the route accounts for
    pub off_route: bool,
}

impl Default for PositionState {
    fn default() -> Self {
        Self {
            position: Point2::origin(),
            heading: None,
            route_heading: None,
            segment: 0,
            distance_walked: 0.0,
            step_count: 0,
            confidence: 1.0,
            source: PositionSource::default(),
            off_route: false,
        }
    }
}

/// Step detector and stride settings
///
/// # Example
/// ```
/// use wayfind_fusion::StepSettings;
///
/// let settings = StepSettings {
///     base_step_length: 0.75,   // taller walker
///     threshold: 1.5,           // stiffer phone mount
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepSettings {
    /// Threshold on the smoothed gravity deviation in m/s²
    ///
    /// A step is a rising edge of the moving average across this value.
    pub threshold: f32,
    /// Moving-average window in samples
    pub smoothing_window: usize,
    /// Minimum time between steps in seconds
    ///
    /// Rejects double counting of a single heel strike.
    pub min_step_interval: f32,
    /// Intervals longer than this (seconds) are treated as a pause
    pub max_step_interval: f32,
    /// Number of recent inter-step intervals kept for cadence
    pub interval_window: usize,
    /// Intervals required before the stride starts adapting
    pub min_interval_samples: usize,
    /// Step length used until cadence is known, in metres
    pub base_step_length: f32,
    /// Inter-step interval (seconds) at which the base length applies
    pub reference_interval: f32,
    /// Lower clamp on the cadence factor
    pub min_stride_factor: f32,
    /// Upper clamp on the cadence factor
    pub max_stride_factor: f32,
}

impl Default for StepSettings {
    fn default() -> Self {
        Self {
            threshold: 1.2,
            smoothing_window: 5,
            min_step_interval: 0.25,
            max_step_interval: 2.0,
            interval_window: 6,
            min_interval_samples: 3,
            base_step_length: 0.7,
            reference_interval: 0.5,
            min_stride_factor: 0.7,
            max_stride_factor: 1.2,
        }
    }
}

/// Confidence decay and anchoring settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfidenceSettings {
    /// Confidence lost per elapsed second (sensor drift)
    pub decay_per_second: f32,
    /// Confidence lost per metre walked since the last anchor
    pub decay_per_metre: f32,
    /// Lowest value confidence may decay to; must be above zero
    pub floor: f32,
    /// Confidence after manual recalibration or tap-to-set
    pub manual_confidence: f32,
    /// Confidence lost per metre of stated external-fix accuracy
    pub beacon_accuracy_penalty: f32,
    /// Lower clamp for external-fix confidence
    pub beacon_min: f32,
    /// Upper clamp for external-fix confidence
    pub beacon_max: f32,
}

impl Default for ConfidenceSettings {
    fn default() -> Self {
        Self {
            decay_per_second: 0.002,
            decay_per_metre: 0.01,
            floor: 0.1,
            manual_confidence: 0.95,
            beacon_accuracy_penalty: 0.1,
            beacon_min: 0.3,
            beacon_max: 0.98,
        }
    }
}

/// Position engine settings
///
/// # Example
/// ```
/// use wayfind_fusion::{EngineSettings, PositionEngine};
///
/// let settings = EngineSettings {
///     deviation_tolerance: 8.0,  // long open atrium
///     simulation_grace: 5.0,
///     ..Default::default()
/// };
/// let engine = PositionEngine::with_settings(settings).unwrap();
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineSettings {
    pub step: StepSettings,
    pub confidence: ConfidenceSettings,
    /// Compass readings averaged by the heading filter
    pub heading_window: usize,
    /// Metres past the route end before the walker is considered off-route
    pub deviation_tolerance: f32,
    /// Seconds without motion data before simulated walking starts
    pub simulation_grace: f32,
    /// Seconds between simulated steps
    pub simulation_interval: f32,
    /// Metres advanced per simulated step
    pub simulation_step_length: f32,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            step: StepSettings::default(),
            confidence: ConfidenceSettings::default(),
            heading_window: 10,
            deviation_tolerance: 5.0,
            simulation_grace: 3.0,
            simulation_interval: 0.6,
            simulation_step_length: 0.7,
        }
    }
}

impl EngineSettings {
    /// Check that the settings describe a usable engine
    pub fn validate(&self) -> Result<(), crate::Error> {
        use crate::Error::InvalidSettings;

        let step = &self.step;
        if step.smoothing_window == 0 || step.interval_window == 0 {
            return Err(InvalidSettings("step windows must hold at least one sample"));
        }
        if step.min_interval_samples > step.interval_window {
            return Err(InvalidSettings("min_interval_samples exceeds interval_window"));
        }
        if !(step.threshold > 0.0 && step.base_step_length > 0.0 && step.reference_interval > 0.0) {
            return Err(InvalidSettings("step threshold, length and reference interval must be positive"));
        }
        if !(step.min_step_interval >= 0.0 && step.max_step_interval > step.min_step_interval) {
            return Err(InvalidSettings("step interval bounds are inconsistent"));
        }
        if !(step.min_stride_factor > 0.0 && step.min_stride_factor <= step.max_stride_factor) {
            return Err(InvalidSettings("stride factor bounds are inconsistent"));
        }

        let confidence = &self.confidence;
        if !(confidence.floor > 0.0 && confidence.floor <= 1.0) {
            return Err(InvalidSettings("confidence floor must lie in (0, 1]"));
        }
        if !(confidence.decay_per_second >= 0.0 && confidence.decay_per_metre >= 0.0) {
            return Err(InvalidSettings("confidence decay rates must be non-negative"));
        }
        if !(confidence.beacon_min <= confidence.beacon_max && confidence.beacon_max <= 1.0) {
            return Err(InvalidSettings("beacon confidence bounds are inconsistent"));
        }

        if self.heading_window == 0 {
            return Err(InvalidSettings("heading_window must hold at least one reading"));
        }
        if !(self.deviation_tolerance >= 0.0) {
            return Err(InvalidSettings("deviation_tolerance must be non-negative"));
        }
        if !(self.simulation_grace >= 0.0 && self.simulation_interval > 0.0 && self.simulation_step_length > 0.0) {
            return Err(InvalidSettings("simulation timing must be positive"));
        }

        Ok(())
    }
}
