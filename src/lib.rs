//! Wayfind Fusion - indoor wayfinding core
//!
//! This library provides the computational core of an indoor wayfinding
//! application: accessible shortest-path routing over a floor-plan graph,
//! a turn-by-turn direction compiler, and a dead-reckoning position engine
//! that follows the walker along the compiled route.
//!
//! # Features
//!
//! - Dijkstra routing with an "avoid stairs" accessibility filter
//! - Turn instructions with sub-threshold bends merged into straight legs
//! - Step detection with cadence-adaptive step length
//! - Circular-mean compass smoothing (no wraparound errors at North)
//! - Confidence decay over time and distance, re-anchored by manual
//!   recalibration and external (beacon / visual positioning) fixes
//! - Overshoot detection when the walker passes the route end
//! - Simulated walking when motion sensors are missing or denied
//!
//! # Quick Start
//!
//! ```rust
//! use wayfind_fusion::{compile_directions, Edge, Graph, Language, Node, PositionEngine};
//!
//! let graph = Graph::new(
//!     vec![
//!         Node::new("entrance", 0.0, 0.0, "Entrance"),
//!         Node::new("hall", 200.0, 0.0, "Main hall"),
//!         Node::new("room-12", 200.0, -80.0, "Room 12"),
//!     ],
//!     vec![
//!         Edge::new("entrance", "hall", 200.0, false),
//!         Edge::new("hall", "room-12", 80.0, false),
//!     ],
//! ).unwrap();
//!
//! // Route and instructions (20 floor-plan units per metre)
//! let route = graph.shortest_path("entrance", "room-12", true).unwrap();
//! let directions = compile_directions(&route.path, &graph, Language::English, 20.0).unwrap();
//!
//! // Follow the route
//! let mut engine = PositionEngine::new();
//! engine.set_route(directions.points.clone(), directions.segment_distances.clone());
//!
//! let state = engine.state();
//! assert_eq!(state.segment, 0);
//! assert_eq!(directions.total_distance(), 14.0);
//! ```

pub mod confidence;
mod directions;
mod engine;
mod error;
pub mod heading;
mod math;
pub mod route;
mod router;
pub mod sensors;
pub mod step;
mod types;

// Re-export all public types and functions
pub use confidence::ConfidenceModel;
pub use directions::{CompiledRoute, Direction, Language, RouteStep, TURN_THRESHOLD_DEGREES, compile_directions};
pub use engine::{DriveMode, EngineDiagnostics, PositionEngine, SegmentCallback, StateCallback};
pub use error::Error;
pub use heading::HeadingFilter;
pub use math::{DEG_TO_RAD, RAD_TO_DEG, STANDARD_GRAVITY, Vector2Ext, Vector3Ext, normalize_degrees, signed_degrees};
pub use route::{Projection, RouteGeometry, RouteLocation};
pub use router::{Edge, Graph, Node, Route, dijkstra};
pub use sensors::{RawMotion, RawOrientation, SensorStatus, SimulatedWalk};
pub use step::{StepDetector, StepEvent, StrideEstimator};
pub use types::*;
