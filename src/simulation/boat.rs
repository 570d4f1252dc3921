//! Boats shuttle back and forth along waterways.

use super::route::{sample_route, RouteSegment};
use super::terrain::TerrainHeight;
use super::types::{
    Direction, BOAT_ROCK_AMPLITUDE, BOAT_ROCK_FREQUENCY, BOAT_WOBBLE_AMPLITUDE,
    BOAT_WOBBLE_FREQUENCY,
};

/// A boat on a waterway
#[derive(Debug, Clone, Default)]
pub struct SimBoat {
    pub route: usize,
    pub progress: f32,
    pub speed: f32,
    pub direction: Direction,
    pub variant: usize,
    pub alive: bool,
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub rotation: f32,
    /// Roll angle in radians
    pub rock: f32,
    /// Pitch angle in radians
    pub wobble: f32,
}

impl SimBoat {
    /// Advance and reflect at either end of the waterway.
    /// `time` is the accumulated simulation time that drives rocking.
    pub fn update(
        &mut self,
        delta_secs: f32,
        time: f32,
        routes: &[RouteSegment],
        terrain: &dyn TerrainHeight,
    ) {
        if !self.alive {
            return;
        }
        let Some(route) = routes.get(self.route) else {
            self.alive = false;
            return;
        };

        self.progress += self.speed * self.direction.sign() * delta_secs;
        if self.progress > route.total_length {
            self.progress = route.total_length;
            self.direction = Direction::Backward;
        } else if self.progress < 0.0 {
            self.progress = 0.0;
            self.direction = Direction::Forward;
        }

        self.refresh_pose(route, terrain);
        self.rock = (time * BOAT_ROCK_FREQUENCY).sin() * BOAT_ROCK_AMPLITUDE;
        self.wobble = (time * BOAT_WOBBLE_FREQUENCY).sin() * BOAT_WOBBLE_AMPLITUDE;
    }

    pub fn refresh_pose(&mut self, route: &RouteSegment, terrain: &dyn TerrainHeight) {
        let sample = sample_route(route, self.progress);
        self.x = sample.x;
        self.z = sample.z;
        self.y = terrain.height_at(sample.x, sample.z);
        self.rotation = sample.heading + self.direction.heading_flip();
    }
}
