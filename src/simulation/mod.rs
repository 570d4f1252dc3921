//! Ambient traffic and crowd simulation
//!
//! Cars, boats, birds, pedestrians and pigeon flocks, advanced once per frame
//! by `SimWorld::tick`. Nothing in here renders, blocks or performs I/O.

mod bird;
mod boat;
mod car;
mod config;
mod demo;
mod pedestrian;
mod pigeon;
mod rng;
mod route;
mod route_graph;
mod spawner;
mod terrain;
mod types;
mod world;

// Re-export public types for external use
pub use bird::SimBird;
pub use boat::SimBoat;
pub use car::{enforce_following_distance, CarUpdateResult, SimCar};
pub use config::SimConfig;
pub use demo::{demo_roads, demo_waterways, DEMO_BLOCK};
pub use pedestrian::SimPedestrian;
pub use pigeon::{
    FlockState, Pigeon, PigeonGroup, PIGEON_MEMBERS_MAX, PIGEON_MEMBERS_MIN,
    PIGEON_SCATTER_DURATION, PIGEON_WALK_RADIUS,
};
pub use rng::{position_seed, seeded_index, seeded_random, seeded_range, SpawnCounter};
pub use route::{
    build_route, compute_lane_offset, sample_route, sample_route_offset, RouteSample,
    RouteSegment,
};
pub use route_graph::{
    build_route_graph, transition_car, Endpoint, RouteEdge, RouteEndpoints, RouteGraph,
    RouteLink,
};
pub use spawner::{
    build_boat_routes, build_car_routes, build_ped_routes, spawn_bird, spawn_boat, spawn_car,
    spawn_pedestrian, spawn_pigeon_group,
};
pub use terrain::{FlatTerrain, NoTerrain, TerrainHeight, HEIGHT_UNAVAILABLE};
pub use types::{
    Direction, Position, RoadInput, RoadKind, WaterwayInput, CAR_SPEED_MAX, CAR_SPEED_MIN,
    CAR_VARIANTS, CONNECT_DISTANCE, ROUTE_ENTRY_INSET,
};
pub use world::{SimStats, SimWorld};
