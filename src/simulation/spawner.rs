//! Route filtering and agent spawning
//!
//! Every spawn claims steps from the shared [`SpawnCounter`], so the same
//! network and the same call sequence always produce the same agents. An empty
//! route pool, or one with nothing inside the cull radius, yields `None`: the
//! caller leaves the slot empty and retries on a later tick.

use std::f32::consts::TAU;

use log::trace;

use super::bird::SimBird;
use super::boat::SimBoat;
use super::car::SimCar;
use super::config::SimConfig;
use super::pedestrian::SimPedestrian;
use super::pigeon::PigeonGroup;
use super::route::{build_route, compute_lane_offset, sample_route, RouteSegment};
use super::rng::{seeded_index, seeded_random, seeded_range, SpawnCounter};
use super::terrain::TerrainHeight;
use super::types::{
    Direction, Position, RoadInput, WaterwayInput, BIRD_ALTITUDE_MAX, BIRD_ALTITUDE_MIN,
    BIRD_ANGULAR_SPEED_MAX, BIRD_ANGULAR_SPEED_MIN, BIRD_CENTER_JITTER, BIRD_OBSERVER_SPREAD,
    BIRD_RADIUS_MAX, BIRD_RADIUS_MIN, BIRD_VARIANTS, BOAT_SPEED_MAX, BOAT_SPEED_MIN,
    BOAT_VARIANTS, CAR_SPEED_MAX, CAR_SPEED_MIN, CAR_VARIANTS, PEDESTRIAN_SPEED_MAX,
    PEDESTRIAN_SPEED_MIN, PEDESTRIAN_VARIANTS,
};

/// Random route picks tried before giving up on finding a nearby route
const ROUTE_PICK_ATTEMPTS: u64 = 8;

pub fn build_car_routes(roads: &[RoadInput]) -> Vec<RouteSegment> {
    roads
        .iter()
        .filter(|road| road.kind.allows_cars() && road.points.len() >= 2)
        .map(|road| build_route(road.points.clone(), road.width, road.oneway))
        .collect()
}

/// Waterways are navigable in both directions
pub fn build_boat_routes(waterways: &[WaterwayInput]) -> Vec<RouteSegment> {
    waterways
        .iter()
        .filter(|water| water.points.len() >= 2)
        .map(|water| build_route(water.points.clone(), water.width, false))
        .collect()
}

/// Footpaths ignore one-way restrictions
pub fn build_ped_routes(roads: &[RoadInput]) -> Vec<RouteSegment> {
    roads
        .iter()
        .filter(|road| road.kind.allows_pedestrians() && road.points.len() >= 2)
        .map(|road| build_route(road.points.clone(), road.width, false))
        .collect()
}

fn is_near(route: &RouteSegment, observer: &Position, radius: f32) -> bool {
    route.midpoint().distance_sq_xz(observer) <= radius * radius
}

fn within_radius(x: f32, z: f32, observer: &Position, radius: f32) -> bool {
    Position::flat(x, z).distance_sq_xz(observer) <= radius * radius
}

/// Pick a route whose midpoint is within `radius` of the observer from a few
/// random draws. `None` when every draw lands on a distant route.
fn pick_route(
    routes: &[RouteSegment],
    counter: &mut SpawnCounter,
    observer: &Position,
    radius: f32,
) -> Option<usize> {
    if routes.is_empty() {
        return None;
    }
    let seed = counter.advance();
    (0..ROUTE_PICK_ATTEMPTS)
        .map(|attempt| seeded_index(seed + attempt, routes.len()))
        .find(|&index| is_near(&routes[index], observer, radius))
}

fn pick_direction(route: &RouteSegment, seed: u64) -> Direction {
    if route.oneway || seeded_random(seed) < 0.5 {
        Direction::Forward
    } else {
        Direction::Backward
    }
}

pub fn spawn_car(
    routes: &[RouteSegment],
    counter: &mut SpawnCounter,
    observer: Position,
    config: &SimConfig,
    terrain: &dyn TerrainHeight,
) -> Option<SimCar> {
    let radius = config.car_cull_radius;
    let route_index = match pick_route(routes, counter, &observer, radius) {
        Some(index) => index,
        None => {
            // Scan for any nearby route before accepting none
            let start = seeded_index(counter.advance(), routes.len());
            (0..routes.len())
                .map(|i| (start + i) % routes.len())
                .find(|&i| is_near(&routes[i], &observer, radius))?
        }
    };

    let route = &routes[route_index];
    let seed = counter.advance();
    let direction = pick_direction(route, seed + 2);
    let mut car = SimCar {
        route: route_index,
        progress: seeded_random(seed) * route.total_length,
        speed: seeded_range(seed + 1, CAR_SPEED_MIN, CAR_SPEED_MAX),
        direction,
        lane_offset: compute_lane_offset(route, direction, seed + 3),
        variant: seeded_index(seed + 4, CAR_VARIANTS),
        alive: true,
        ..SimCar::default()
    };
    car.refresh_pose(routes, terrain);
    if !within_radius(car.x, car.z, &observer, radius) {
        trace!("car sample on route {} fell outside the cull radius", route_index);
        return None;
    }
    trace!("spawned car on route {} at {:.1}m", route_index, car.progress);
    Some(car)
}

pub fn spawn_boat(
    routes: &[RouteSegment],
    counter: &mut SpawnCounter,
    observer: Position,
    config: &SimConfig,
    terrain: &dyn TerrainHeight,
) -> Option<SimBoat> {
    let radius = config.boat_cull_radius;
    let route_index = pick_route(routes, counter, &observer, radius)?;
    let route = &routes[route_index];
    let seed = counter.advance();
    let mut boat = SimBoat {
        route: route_index,
        progress: seeded_random(seed) * route.total_length,
        speed: seeded_range(seed + 1, BOAT_SPEED_MIN, BOAT_SPEED_MAX),
        direction: pick_direction(route, seed + 2),
        variant: seeded_index(seed + 3, BOAT_VARIANTS),
        alive: true,
        ..SimBoat::default()
    };
    boat.refresh_pose(route, terrain);
    within_radius(boat.x, boat.z, &observer, radius).then_some(boat)
}

pub fn spawn_pedestrian(
    routes: &[RouteSegment],
    counter: &mut SpawnCounter,
    observer: Position,
    config: &SimConfig,
    terrain: &dyn TerrainHeight,
) -> Option<SimPedestrian> {
    let radius = config.pedestrian_cull_radius;
    let route_index = pick_route(routes, counter, &observer, radius)?;
    let route = &routes[route_index];
    let seed = counter.advance();
    let mut pedestrian = SimPedestrian {
        route: route_index,
        progress: seeded_random(seed) * route.total_length,
        speed: seeded_range(seed + 1, PEDESTRIAN_SPEED_MIN, PEDESTRIAN_SPEED_MAX),
        direction: pick_direction(route, seed + 2),
        variant: seeded_index(seed + 3, PEDESTRIAN_VARIANTS),
        stride_phase: seeded_range(seed + 4, 0.0, TAU),
        alive: true,
        ..SimPedestrian::default()
    };
    pedestrian.refresh_pose(route, terrain);
    within_radius(pedestrian.x, pedestrian.z, &observer, radius).then_some(pedestrian)
}

/// Birds circle near a random waterway point, or near the observer when there is no water
pub fn spawn_bird(
    water_routes: &[RouteSegment],
    counter: &mut SpawnCounter,
    observer: Position,
    terrain: &dyn TerrainHeight,
) -> SimBird {
    let seed = counter.advance();
    let (anchor_x, anchor_z, spread) = if water_routes.is_empty() {
        (observer.x, observer.z, BIRD_OBSERVER_SPREAD)
    } else {
        let route = &water_routes[seeded_index(seed, water_routes.len())];
        let sample = sample_route(route, seeded_random(seed + 1) * route.total_length);
        (sample.x, sample.z, BIRD_CENTER_JITTER)
    };

    let cx = anchor_x + seeded_range(seed + 2, -spread, spread);
    let cz = anchor_z + seeded_range(seed + 3, -spread, spread);
    let speed = seeded_range(seed + 4, BIRD_ANGULAR_SPEED_MIN, BIRD_ANGULAR_SPEED_MAX);
    let clockwise = seeded_random(seed + 5) < 0.5;

    let mut bird = SimBird {
        center: Position::new(cx, terrain.height_at(cx, cz), cz),
        radius: seeded_range(seed + 6, BIRD_RADIUS_MIN, BIRD_RADIUS_MAX),
        altitude: seeded_range(seed + 7, BIRD_ALTITUDE_MIN, BIRD_ALTITUDE_MAX),
        angle: seeded_range(seed + 8, 0.0, TAU),
        angular_speed: if clockwise { -speed } else { speed },
        flap_phase: seeded_range(seed + 9, 0.0, TAU),
        variant: seeded_index(seed + 10, BIRD_VARIANTS),
        alive: true,
        ..SimBird::default()
    };
    bird.refresh_pose();
    bird
}

/// Place a new pigeon group: on a footpath within spawn radius of the observer
/// if one is found, else at a random offset. Never inside the scatter radius.
pub fn spawn_pigeon_group(
    ped_routes: &[RouteSegment],
    counter: &mut SpawnCounter,
    observer: Position,
    config: &SimConfig,
    terrain: &dyn TerrainHeight,
) -> PigeonGroup {
    let min_distance = config.pigeon_scatter_radius * 2.0;
    let spawn_sq = config.pigeon_spawn_radius * config.pigeon_spawn_radius;
    let min_sq = min_distance * min_distance;

    let seed = counter.advance();
    let on_route = (!ped_routes.is_empty())
        .then(|| {
            (0..ROUTE_PICK_ATTEMPTS).find_map(|attempt| {
                let s = seed + attempt * 2;
                let route = &ped_routes[seeded_index(s, ped_routes.len())];
                let sample = sample_route(route, seeded_random(s + 1) * route.total_length);
                let point = Position::flat(sample.x, sample.z);
                let distance_sq = point.distance_sq_xz(&observer);
                (distance_sq <= spawn_sq && distance_sq >= min_sq).then_some(point)
            })
        })
        .flatten();

    let center = on_route.unwrap_or_else(|| {
        let seed = counter.advance();
        let angle = seeded_range(seed, 0.0, TAU);
        let distance = seeded_range(seed + 1, min_distance, config.pigeon_spawn_radius);
        Position::flat(
            observer.x + angle.sin() * distance,
            observer.z + angle.cos() * distance,
        )
    });

    let ground = terrain.height_at(center.x, center.z);
    PigeonGroup::new(center, ground, counter)
}
