//! Dead-reckoning position fusion along a reference route

use log::{debug, info, trace, warn};
use nalgebra::Point2;

use crate::confidence::ConfidenceModel;
use crate::error::Error;
use crate::heading::HeadingFilter;
use crate::route::{Projection, RouteGeometry};
use crate::sensors::SensorStatus;
use crate::step::StepDetector;
use crate::types::{EngineSettings, ExternalFix, HeadingSample, MotionSample, PositionSource, PositionState};

/// Callback receiving a position snapshot
pub type StateCallback = Box<dyn FnMut(&PositionState) + Send>;
/// Callback receiving the new segment index
pub type SegmentCallback = Box<dyn FnMut(usize) + Send>;

/// What currently moves the estimate forward
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DriveMode {
    /// No motion data yet; simulation starts after the grace period
    #[default]
    AwaitingSensors,
    /// Steps detected from accelerometer samples
    DeadReckoning,
    /// Fixed-rate simulated walking
    Simulated,
}

/// Engine internals exposed for monitoring and tuning
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineDiagnostics {
    pub drive_mode: DriveMode,
    /// Steps per second, zero until known
    pub cadence: f32,
    /// Length the next detected step will be credited with
    pub step_length: f32,
    /// Smoothed accelerometer deviation from gravity
    pub smoothed_deviation: f32,
    /// Metres walked since the last manual or external anchor
    pub distance_since_anchor: f32,
    /// Total route length in metres
    pub route_length: f32,
    /// Whether the current route supports position updates
    pub route_active: bool,
}

/// Position fusion engine
///
/// Turns accelerometer steps, compass readings, manual recalibration and
/// external fixes into a confidence-scored position along a route. The
/// engine is a single-owner state machine: every method takes `&mut self`,
/// runs to completion and invokes registered callbacks before returning.
/// Hosts that share it between threads wrap it in a `Mutex`, which keeps
/// a route reset atomic with respect to sample processing.
///
/// # Example
/// ```
/// use nalgebra::Point2;
/// use wayfind_fusion::{PositionEngine, PositionSource};
///
/// let mut engine = PositionEngine::new();
/// engine.set_route(
///     vec![Point2::new(0.0, 0.0), Point2::new(100.0, 0.0)],
///     vec![10.0],
/// );
///
/// engine.recalibrate_to_node(1).unwrap();
/// let state = engine.state();
/// assert_eq!(state.distance_walked, 10.0);
/// assert_eq!(state.source, PositionSource::Manual);
/// ```
pub struct PositionEngine {
    settings: EngineSettings,
    route: RouteGeometry,
    state: PositionState,
    steps: StepDetector,
    heading: HeadingFilter,
    confidence: ConfidenceModel,
    drive_mode: DriveMode,
    motion_status: SensorStatus,
    /// First timestamp seen, for the simulation grace period
    session_start: Option<f32>,
    last_timestamp: Option<f32>,
    last_simulated_step: Option<f32>,
    distance_since_anchor: f32,
    on_update: Option<StateCallback>,
    on_segment_change: Option<SegmentCallback>,
    on_off_route: Option<StateCallback>,
}

impl PositionEngine {
    /// Create an engine with default settings and no route
    pub fn new() -> Self {
        Self::build(EngineSettings::default())
    }

    /// Create an engine with validated settings
    pub fn with_settings(settings: EngineSettings) -> Result<Self, Error> {
        settings.validate()?;
        Ok(Self::build(settings))
    }

    fn build(settings: EngineSettings) -> Self {
        Self {
            settings,
            route: RouteGeometry::default(),
            state: PositionState::default(),
            steps: StepDetector::new(settings.step),
            heading: HeadingFilter::new(settings.heading_window),
            confidence: ConfidenceModel::new(settings.confidence),
            drive_mode: DriveMode::default(),
            motion_status: SensorStatus::default(),
            session_start: None,
            last_timestamp: None,
            last_simulated_step: None,
            distance_since_anchor: 0.0,
            on_update: None,
            on_segment_change: None,
            on_off_route: None,
        }
    }

    pub fn settings(&self) -> EngineSettings {
        self.settings
    }

    pub fn route(&self) -> &RouteGeometry {
        &self.route
    }

    /// Snapshot of the current position state
    pub fn state(&self) -> PositionState {
        self.state
    }

    pub fn drive_mode(&self) -> DriveMode {
        self.drive_mode
    }

    pub fn diagnostics(&self) -> EngineDiagnostics {
        EngineDiagnostics {
            drive_mode: self.drive_mode,
            cadence: self.steps.cadence(),
            step_length: self.steps.step_length(),
            smoothed_deviation: self.steps.smoothed_deviation(),
            distance_since_anchor: self.distance_since_anchor,
            route_length: self.route.total_distance(),
            route_active: self.route.is_active(),
        }
    }

    /// Called after every processed sample or control call
    pub fn on_update(&mut self, callback: impl FnMut(&PositionState) + Send + 'static) {
        self.on_update = Some(Box::new(callback));
    }

    /// Called whenever the estimate moves onto another route segment
    pub fn on_segment_change(&mut self, callback: impl FnMut(usize) + Send + 'static) {
        self.on_segment_change = Some(Box::new(callback));
    }

    /// Called once each time the walked distance passes the route end plus
    /// the deviation tolerance
    pub fn on_off_route(&mut self, callback: impl FnMut(&PositionState) + Send + 'static) {
        self.on_off_route = Some(Box::new(callback));
    }

    /// Replace the reference route and reset all position state
    ///
    /// `segment_distances` holds the real-world length in metres of each
    /// segment and must have one entry fewer than `points`. Routes that do
    /// not satisfy this disable position updates until the next route.
    pub fn set_route(&mut self, points: Vec<Point2<f32>>, segment_distances: Vec<f32>) {
        self.route = RouteGeometry::new(points, segment_distances);
        self.reset();
    }

    /// Restart the current route: segment 0, distance 0, full confidence
    ///
    /// Sensor availability and the drive mode survive a reset.
    pub fn reset(&mut self) {
        self.steps.reset();
        self.heading.reset();
        self.confidence.reset();
        self.distance_since_anchor = 0.0;
        self.last_timestamp = None;
        self.last_simulated_step = None;

        let source = match self.drive_mode {
            DriveMode::Simulated => PositionSource::Simulation,
            _ => PositionSource::Accelerometer,
        };

        self.state = PositionState {
            position: self.route.points().first().copied().unwrap_or_else(Point2::origin),
            route_heading: self.route.segment_bearing(0),
            confidence: self.confidence.value(),
            source,
            ..PositionState::default()
        };

        info!(
            "Route reset: {} points, {:.1} m, active = {}",
            self.route.points().len(),
            self.route.total_distance(),
            self.route.is_active()
        );
        self.notify_update();
    }

    /// Process one accelerometer sample
    ///
    /// The first sample switches the engine to dead reckoning, also out of
    /// simulation. A detected step advances the estimate by the adaptive
    /// step length.
    pub fn process_motion(&mut self, sample: &MotionSample) {
        self.advance_clock(sample.timestamp);
        self.enter_dead_reckoning();

        if let Some(step) = self.steps.update(sample) {
            trace!("Step at {:.2}s, length {:.2} m", step.timestamp, step.length);
            self.advance(step.length, PositionSource::Accelerometer);
        }

        self.notify_update();
    }

    /// Process one compass reading; only the smoothed heading changes
    pub fn process_heading(&mut self, sample: &HeadingSample) {
        self.advance_clock(sample.timestamp);
        self.state.heading = self.heading.update(sample.heading);
        self.notify_update();
    }

    /// Advance the engine clock without a sensor sample
    ///
    /// Applies time decay, starts simulated walking once the grace period
    /// passes without motion data, and drives simulated steps.
    pub fn tick(&mut self, timestamp: f32) {
        self.advance_clock(timestamp);

        if self.drive_mode == DriveMode::AwaitingSensors {
            let waited = self.session_start.map_or(0.0, |start| timestamp - start);
            if waited >= self.settings.simulation_grace {
                self.enter_simulation("no motion data within grace period");
            }
        }

        if self.drive_mode == DriveMode::Simulated && timestamp.is_finite() {
            let interval = self.settings.simulation_interval;
            let last = *self.last_simulated_step.get_or_insert(timestamp);
            let missed = ((timestamp - last) / interval).floor();
            if missed >= 1.0 {
                // Missed steps are credited in one advance
                self.advance_steps(
                    missed * self.settings.simulation_step_length,
                    missed as u32,
                    PositionSource::Simulation,
                );
                let next = last + missed * interval;
                self.last_simulated_step = Some(if next > last { next } else { timestamp });
            }
        }

        self.notify_update();
    }

    /// Record the motion sensor availability reported by the platform
    ///
    /// A denied or missing sensor switches to simulated walking at once.
    pub fn report_motion_status(&mut self, status: SensorStatus) {
        self.motion_status = status;
        if !status.is_usable() && self.drive_mode != DriveMode::Simulated {
            self.enter_simulation("motion sensor unavailable");
            self.notify_update();
        }
    }

    /// Snap the estimate to route node `index`
    ///
    /// Sets the walked distance to the node's cumulative distance, applies
    /// the manual confidence level and clears the off-route flag. Does
    /// nothing on an inactive route.
    pub fn recalibrate_to_node(&mut self, index: usize) -> Result<(), Error> {
        if !self.route.is_active() {
            debug!("Ignoring recalibration to node {index}: no active route");
            return Ok(());
        }

        let Some(distance) = self.route.cumulative_distance(index) else {
            return Err(Error::InvalidNodeIndex {
                index,
                len: self.route.points().len(),
            });
        };

        let point = self.route.points()[index];
        let level = self.confidence.manual_level();
        self.anchor(point, distance, level, PositionSource::Manual);
        Ok(())
    }

    /// Place the estimate at an arbitrary point with a known route distance
    ///
    /// Used for tap-to-set. Negative or non-finite distances are ignored.
    pub fn set_manual_position(&mut self, point: Point2<f32>, distance_along: f32) {
        if !self.route.is_active() {
            debug!("Ignoring manual position: no active route");
            return;
        }
        if !(distance_along.is_finite() && distance_along >= 0.0) {
            warn!("Ignoring manual position with distance {distance_along}");
            return;
        }

        let level = self.confidence.manual_level();
        self.anchor(point, distance_along, level, PositionSource::Manual);
    }

    /// Absorb an external fix by projecting it onto the route
    ///
    /// Confidence is derived from the fix accuracy. Returns the projection
    /// used, or `None` if the fix was invalid or the route inactive.
    pub fn apply_external_fix(&mut self, fix: &ExternalFix) -> Option<Projection> {
        if !(fix.accuracy.is_finite() && fix.accuracy >= 0.0) {
            warn!("Ignoring external fix with accuracy {}", fix.accuracy);
            return None;
        }
        if !(fix.position.x.is_finite() && fix.position.y.is_finite()) {
            warn!("Ignoring external fix at non-finite position");
            return None;
        }

        if !self.route.is_active() {
            debug!("Ignoring external fix: no active route");
            return None;
        }

        self.advance_clock(fix.timestamp);
        let projection = self.route.project(&fix.position)?;

        debug!(
            "External fix projected onto segment {} at {:.1} m (offset {:.1})",
            projection.segment, projection.distance_along, projection.offset
        );

        let level = self.confidence.beacon_level(fix.accuracy);
        self.anchor(projection.point, projection.distance_along, level, PositionSource::Beacon);
        Some(projection)
    }

    /// Move the clock forward and apply time decay
    fn advance_clock(&mut self, timestamp: f32) {
        if !timestamp.is_finite() {
            return;
        }

        self.session_start.get_or_insert(timestamp);
        let elapsed = match self.last_timestamp {
            // Out-of-order timestamps count as no elapsed time
            Some(last) => (timestamp - last).max(0.0),
            None => 0.0,
        };
        self.last_timestamp = Some(self.last_timestamp.map_or(timestamp, |last| last.max(timestamp)));

        self.confidence.decay_time(elapsed);
        self.state.confidence = self.confidence.value();
    }

    /// Dead-reckoning advance by one step
    fn advance(&mut self, distance: f32, source: PositionSource) {
        self.advance_steps(distance, 1, source);
    }

    /// Advance by `steps` steps covering `distance` metres in total
    fn advance_steps(&mut self, distance: f32, steps: u32, source: PositionSource) {
        if !self.route.is_active() {
            return;
        }

        self.state.distance_walked += distance;
        self.state.step_count = self.state.step_count.saturating_add(steps);
        self.distance_since_anchor += distance;
        self.confidence.decay_distance(distance);
        self.state.confidence = self.confidence.value();
        self.set_source(source);

        self.relocate();
        self.check_deviation();
    }

    /// Re-anchor to a known point and distance
    fn anchor(&mut self, point: Point2<f32>, distance: f32, level: f32, source: PositionSource) {
        self.state.distance_walked = distance;
        self.distance_since_anchor = 0.0;
        self.confidence.anchor(level);
        self.state.confidence = self.confidence.value();
        self.state.off_route = false;
        self.set_source(source);

        self.relocate();
        self.state.position = point;
        self.notify_update();
    }

    /// Interpolate the position from the walked distance
    fn relocate(&mut self) {
        let Some(location) = self.route.locate(self.state.distance_walked) else {
            return;
        };

        self.state.position = location.point;
        if location.segment != self.state.segment {
            self.state.segment = location.segment;
            self.state.route_heading = self.route.segment_bearing(location.segment);
            debug!("Advanced to segment {}", location.segment);
            if let Some(callback) = self.on_segment_change.as_mut() {
                callback(location.segment);
            }
        }
    }

    /// One-sided overshoot check against the route length
    fn check_deviation(&mut self) {
        let limit = self.route.total_distance() + self.settings.deviation_tolerance;
        if self.state.off_route || self.state.distance_walked <= limit {
            return;
        }

        self.state.off_route = true;
        warn!(
            "Off route: walked {:.1} m on a {:.1} m route",
            self.state.distance_walked,
            self.route.total_distance()
        );
        if let Some(callback) = self.on_off_route.as_mut() {
            callback(&self.state);
        }
    }

    fn set_source(&mut self, source: PositionSource) {
        if self.state.source != source {
            debug!("Position source {:?} -> {:?}", self.state.source, source);
            self.state.source = source;
        }
    }

    fn enter_dead_reckoning(&mut self) {
        if self.drive_mode == DriveMode::DeadReckoning {
            return;
        }

        info!("Motion data available, switching from {:?} to dead reckoning", self.drive_mode);
        self.drive_mode = DriveMode::DeadReckoning;
        self.motion_status = SensorStatus::Available;
        self.last_simulated_step = None;
        if self.state.source == PositionSource::Simulation {
            self.set_source(PositionSource::Accelerometer);
        }
    }

    fn enter_simulation(&mut self, reason: &str) {
        info!("Switching to simulated walking: {reason}");
        self.drive_mode = DriveMode::Simulated;
        self.last_simulated_step = self.last_timestamp;
        self.set_source(PositionSource::Simulation);
    }

    fn notify_update(&mut self) {
        if let Some(callback) = self.on_update.as_mut() {
            callback(&self.state);
        }
    }
}

impl Default for PositionEngine {
    fn default() -> Self {
        Self::new()
    }
}
