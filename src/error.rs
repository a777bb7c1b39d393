//! Construction and validation errors for the wayfinding core

use thiserror::Error;

/// Errors raised when building a graph, compiling directions or
/// configuring the position engine.
///
/// Steady-state outcomes such as "no path", degenerate routes, missing
/// sensors or leaving the route are never reported through this type.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Graph must contain at least one node")]
    EmptyGraph,
    #[error("Duplicate node id: {0}")]
    DuplicateNode(String),
    #[error("Unknown node id: {0}")]
    UnknownNode(String),
    #[error("Invalid scale factor {0} (expected a finite value > 0)")]
    InvalidScale(f32),
    #[error("Node index {index} out of range for route with {len} points")]
    InvalidNodeIndex { index: usize, len: usize },
    #[error("Invalid settings: {0}")]
    InvalidSettings(&'static str),
}
