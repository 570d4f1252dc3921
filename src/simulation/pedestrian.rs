//! Pedestrians walk a footpath once and are recycled at its end.

use super::route::{sample_route, RouteSegment};
use super::terrain::TerrainHeight;
use super::types::{Direction, PEDESTRIAN_LEG_AMPLITUDE, PEDESTRIAN_STRIDE_RATE};

#[derive(Debug, Clone, Default)]
pub struct SimPedestrian {
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
    /// Stride phase accumulator
    pub stride_phase: f32,
    /// Current leg swing angle in radians
    pub leg_angle: f32,
}

impl SimPedestrian {
    pub fn update(
        &mut self,
        delta_secs: f32,
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

        let step = self.speed * delta_secs;
        self.progress += step * self.direction.sign();
        if self.progress < 0.0 || self.progress > route.total_length {
            self.alive = false;
            return;
        }

        self.stride_phase += step * PEDESTRIAN_STRIDE_RATE;
        self.leg_angle = self.stride_phase.sin() * PEDESTRIAN_LEG_AMPLITUDE;
        self.refresh_pose(route, terrain);
    }

    pub fn refresh_pose(&mut self, route: &RouteSegment, terrain: &dyn TerrainHeight) {
        let sample = sample_route(route, self.progress);
        self.x = sample.x;
        self.z = sample.z;
        self.y = terrain.height_at(sample.x, sample.z);
        self.rotation = sample.heading + self.direction.heading_flip();
    }
}
