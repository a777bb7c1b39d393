//! Arc-length parameterised reference route
//!
//! Route points live in floor-plan units while distances along the route
//! are real-world metres taken from the per-segment distance table, so the
//! two never need a shared scale.

use log::warn;
use nalgebra::Point2;

use crate::math::Vector2Ext;

/// Position on the route for a given distance
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteLocation {
    pub segment: usize,
    pub point: Point2<f32>,
}

/// Orthogonal projection of an arbitrary point onto the route
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    /// Segment holding the closest point
    pub segment: usize,
    /// Closest point on the route
    pub point: Point2<f32>,
    /// Distance along the route of `point`, in metres
    pub distance_along: f32,
    /// Perpendicular distance from the input to `point`, in floor-plan units
    pub offset: f32,
}

/// Reference route with precomputed cumulative distances
///
/// A route with fewer than two points, or whose distance table does not
/// match its points, is inactive: every query returns `None`.
#[derive(Debug, Clone, Default)]
pub struct RouteGeometry {
    points: Vec<Point2<f32>>,
    segment_distances: Vec<f32>,
    cumulative: Vec<f32>,
}

impl RouteGeometry {
    pub fn new(points: Vec<Point2<f32>>, segment_distances: Vec<f32>) -> Self {
        let valid = points.len() >= 2
            && segment_distances.len() == points.len() - 1
            && segment_distances.iter().all(|d| d.is_finite() && *d >= 0.0);

        if !valid {
            if !points.is_empty() {
                warn!(
                    "Route with {} points and {} segment distances is unusable; position updates disabled",
                    points.len(),
                    segment_distances.len()
                );
            }
            return Self {
                points,
                segment_distances,
                cumulative: Vec::new(),
            };
        }

        let mut cumulative = Vec::with_capacity(points.len());
        let mut total = 0.0;
        cumulative.push(total);
        for d in &segment_distances {
            total += d;
            cumulative.push(total);
        }

        Self {
            points,
            segment_distances,
            cumulative,
        }
    }

    /// Whether the route supports interpolation
    pub fn is_active(&self) -> bool {
        !self.cumulative.is_empty()
    }

    pub fn points(&self) -> &[Point2<f32>] {
        &self.points
    }

    pub fn segment_distances(&self) -> &[f32] {
        &self.segment_distances
    }

    /// Total length in metres, zero for an inactive route
    pub fn total_distance(&self) -> f32 {
        self.cumulative.last().copied().unwrap_or(0.0)
    }

    /// Distance from the route start to node `index`
    pub fn cumulative_distance(&self, index: usize) -> Option<f32> {
        self.cumulative.get(index).copied()
    }

    /// Point and segment for a distance along the route
    ///
    /// The distance is clamped to the route, so overshooting parks the
    /// result on the final point.
    pub fn locate(&self, distance: f32) -> Option<RouteLocation> {
        if !self.is_active() {
            return None;
        }

        let last_segment = self.segment_distances.len() - 1;
        let distance = if distance.is_finite() {
            distance.clamp(0.0, self.total_distance())
        } else {
            0.0
        };

        // First segment whose span reaches the distance, skipping empty ones
        let segment = (0..=last_segment)
            .find(|&i| self.segment_distances[i] > 0.0 && distance < self.cumulative[i + 1])
            .unwrap_or(last_segment);

        let length = self.segment_distances[segment];
        let t = if length > 0.0 {
            ((distance - self.cumulative[segment]) / length).clamp(0.0, 1.0)
        } else {
            1.0
        };

        let start = self.points[segment];
        let end = self.points[segment + 1];
        Some(RouteLocation {
            segment,
            point: start + (end - start) * t,
        })
    }

    /// Closest point on the route to `point`
    pub fn project(&self, point: &Point2<f32>) -> Option<Projection> {
        if !self.is_active() {
            return None;
        }

        let mut best: Option<Projection> = None;
        for segment in 0..self.segment_distances.len() {
            let start = self.points[segment];
            let along = self.points[segment + 1] - start;
            let length_squared = along.magnitude_squared();

            let t = if length_squared > 0.0 {
                ((point - &start).dot(&along) / length_squared).clamp(0.0, 1.0)
            } else {
                0.0
            };

            let closest = start + along * t;
            let offset = nalgebra::distance(point, &closest);

            if best.is_none_or(|b| offset < b.offset) {
                best = Some(Projection {
                    segment,
                    point: closest,
                    distance_along: self.cumulative[segment] + t * self.segment_distances[segment],
                    offset,
                });
            }
        }

        best
    }

    /// Bearing of a segment in degrees clockwise from plan-up
    pub fn segment_bearing(&self, segment: usize) -> Option<f32> {
        if !self.is_active() || segment >= self.segment_distances.len() {
            return None;
        }
        Some((self.points[segment + 1] - self.points[segment]).bearing())
    }
}
