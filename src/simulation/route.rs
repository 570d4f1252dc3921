//! Piecewise-linear routes and distance-based sampling
//!
//! A route is built once from a polyline and never mutated. Sampling by
//! progress (meters from the start) binary-searches the cumulative length
//! table, so lookups stay O(log n) on long roads.

use super::rng::seeded_random;
use super::types::{Direction, Position};

/// A route an agent travels along
#[derive(Debug, Clone)]
pub struct RouteSegment {
    pub points: Vec<Position>,
    /// Length of each segment, `points.len() - 1` entries
    pub segment_lengths: Vec<f32>,
    /// Prefix sums of `segment_lengths`; index 0 is 0, last equals `total_length`
    pub cumulative: Vec<f32>,
    pub total_length: f32,
    pub width: f32,
    pub oneway: bool,
}

impl RouteSegment {
    pub fn start(&self) -> Position {
        self.points[0]
    }

    pub fn end(&self) -> Position {
        self.points[self.points.len() - 1]
    }

    /// Point halfway along the route
    pub fn midpoint(&self) -> Position {
        let sample = sample_route(self, self.total_length * 0.5);
        Position::flat(sample.x, sample.z)
    }
}

/// A sampled point on a route
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteSample {
    pub x: f32,
    pub z: f32,
    /// Heading of the containing segment, measured from the +z axis
    pub heading: f32,
}

/// Build a route from a polyline. Callers must drop polylines with fewer than two points.
pub fn build_route(points: Vec<Position>, width: f32, oneway: bool) -> RouteSegment {
    let mut segment_lengths = Vec::with_capacity(points.len().saturating_sub(1));
    let mut cumulative = Vec::with_capacity(points.len());
    cumulative.push(0.0);

    let mut total = 0.0;
    for pair in points.windows(2) {
        let length = pair[0].distance_xz(&pair[1]);
        segment_lengths.push(length);
        total += length;
        cumulative.push(total);
    }

    RouteSegment {
        points,
        segment_lengths,
        cumulative,
        total_length: total,
        width,
        oneway,
    }
}

/// Index of the segment containing `progress`, which must already be clamped
fn segment_at(route: &RouteSegment, progress: f32) -> usize {
    // First cumulative entry strictly past `progress`, minus one
    let upper = route.cumulative.partition_point(|&c| c <= progress);
    upper
        .saturating_sub(1)
        .min(route.segment_lengths.len().saturating_sub(1))
}

/// Position and heading at `progress` meters along the route
pub fn sample_route(route: &RouteSegment, progress: f32) -> RouteSample {
    sample_route_offset(route, progress, 0.0)
}

/// Like [`sample_route`], displaced `offset` meters along the segment's unit perpendicular
pub fn sample_route_offset(route: &RouteSegment, progress: f32, offset: f32) -> RouteSample {
    if route.segment_lengths.is_empty() {
        let p = route.points.first().copied().unwrap_or_default();
        return RouteSample {
            x: p.x,
            z: p.z,
            heading: 0.0,
        };
    }

    let progress = progress.clamp(0.0, route.total_length);
    let index = segment_at(route, progress);
    let a = route.points[index];
    let b = route.points[index + 1];
    let length = route.segment_lengths[index];

    let t = if length > 0.0 {
        ((progress - route.cumulative[index]) / length).clamp(0.0, 1.0)
    } else {
        0.0
    };

    let Position { mut x, mut z, .. } = a.lerp(&b, t);

    if offset != 0.0 && length > 0.0 {
        // Perpendicular: rotate 90 degrees
        let dx = b.x - a.x;
        let dz = b.z - a.z;
        x += -dz / length * offset;
        z += dx / length * offset;
    }

    RouteSample {
        x,
        z,
        heading: a.heading_to(&b),
    }
}

/// Lane offset for a car travelling `direction` on `route` (right-hand traffic).
///
/// One-way roads keep every car on the right half, choosing between an inner
/// and an outer lane by `seed`.
pub fn compute_lane_offset(route: &RouteSegment, direction: Direction, seed: u64) -> f32 {
    if route.oneway {
        let half_width = route.width * 0.5;
        let lane = if seeded_random(seed) < 0.5 { 0.15 } else { 0.30 };
        -direction.sign() * half_width * lane
    } else {
        -direction.sign() * route.width * 0.25
    }
}
