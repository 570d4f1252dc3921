//! Car movement logic for the ambient simulation
//!
//! Cars follow the route graph from road to road and keep a minimum gap to the
//! car ahead in their lane.

use std::collections::HashMap;

use log::trace;
use ordered_float::OrderedFloat;

use super::route::{sample_route_offset, RouteSegment};
use super::route_graph::{transition_car, RouteGraph};
use super::terrain::TerrainHeight;
use super::types::Direction;

/// Result of a car update indicating what happened this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CarUpdateResult {
    Continue,                 // Car stayed on its route
    Transitioned(usize),      // Car moved onto the given route
    Despawn,                  // Car should be recycled
}

/// A car in the simulation
#[derive(Debug, Clone, Default)]
pub struct SimCar {
    pub route: usize,
    /// Meters from the route start
    pub progress: f32,
    pub speed: f32,
    pub direction: Direction,
    /// Perpendicular displacement from the centerline
    pub lane_offset: f32,
    pub variant: usize,
    pub alive: bool,
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub rotation: f32,
}

impl SimCar {
    /// Advance along the route, moving to a connected route when running off either end
    pub fn update(
        &mut self,
        delta_secs: f32,
        routes: &[RouteSegment],
        graph: &RouteGraph,
        terrain: &dyn TerrainHeight,
    ) -> CarUpdateResult {
        if !self.alive {
            return CarUpdateResult::Continue;
        }
        let Some(route) = routes.get(self.route) else {
            self.alive = false;
            return CarUpdateResult::Despawn;
        };

        self.progress += self.speed * self.direction.sign() * delta_secs;

        let mut result = CarUpdateResult::Continue;
        if self.progress < 0.0 || self.progress > route.total_length {
            if !transition_car(self, routes, graph) {
                trace!("car on route {} reached a dead end", self.route);
                self.alive = false;
                return CarUpdateResult::Despawn;
            }
            result = CarUpdateResult::Transitioned(self.route);
        }

        self.refresh_pose(routes, terrain);
        result
    }

    /// Recompute the cached world transform from route, progress and lane
    pub fn refresh_pose(&mut self, routes: &[RouteSegment], terrain: &dyn TerrainHeight) {
        let Some(route) = routes.get(self.route) else {
            self.alive = false;
            return;
        };
        let sample = sample_route_offset(route, self.progress, self.lane_offset);
        self.x = sample.x;
        self.z = sample.z;
        self.y = terrain.height_at(sample.x, sample.z);
        self.rotation = sample.heading + self.direction.heading_flip();
    }
}

/// Keep every car at least `min_gap` meters of progress behind the car ahead.
///
/// Cars are grouped by `(route, direction)` and walked from leader to tail. A
/// follower that is too close is pulled back and slowed to its leader's speed;
/// if pulling it back would leave the route it is killed instead. Returns the
/// number of cars killed.
pub fn enforce_following_distance(
    cars: &mut [SimCar],
    routes: &[RouteSegment],
    min_gap: f32,
    terrain: &dyn TerrainHeight,
) -> usize {
    let mut groups: HashMap<(usize, Direction), Vec<usize>> = HashMap::new();
    for (index, car) in cars.iter().enumerate() {
        if car.alive {
            groups.entry((car.route, car.direction)).or_default().push(index);
        }
    }

    let mut killed = 0;
    for ((route_index, direction), mut members) in groups {
        if members.len() < 2 {
            continue;
        }
        let Some(route) = routes.get(route_index) else {
            continue;
        };
        let sign = direction.sign();

        // Leader first: furthest along in the direction of travel
        members.sort_by_key(|&i| std::cmp::Reverse(OrderedFloat(cars[i].progress * sign)));

        let mut leader = members[0];
        for &follower in &members[1..] {
            let gap = (cars[leader].progress - cars[follower].progress) * sign;
            if gap >= min_gap {
                leader = follower;
                continue;
            }

            let clamped = cars[leader].progress - min_gap * sign;
            if clamped < 0.0 || clamped > route.total_length {
                cars[follower].alive = false;
                killed += 1;
                continue;
            }

            let leader_speed = cars[leader].speed;
            let car = &mut cars[follower];
            car.progress = clamped;
            car.speed = car.speed.min(leader_speed);
            car.refresh_pose(routes, terrain);
            leader = follower;
        }
    }

    killed
}
