//! Simulation configuration
//!
//! Population caps and the radii that decide where agents live relative to the
//! observer. Kinematic tuning constants live in `types.rs`.

use anyhow::{ensure, Result};

/// Tunable simulation parameters
#[derive(Debug, Clone, PartialEq)]
pub struct SimConfig {
    /// Population caps per agent kind
    pub max_cars: usize,
    pub max_boats: usize,
    pub max_birds: usize,
    pub max_pedestrians: usize,
    pub pigeon_groups: usize,

    /// Agents beyond these distances from the observer are recycled (meters)
    pub car_cull_radius: f32,
    pub boat_cull_radius: f32,
    pub bird_cull_radius: f32,
    pub pedestrian_cull_radius: f32,
    pub pigeon_cull_radius: f32,

    /// Minimum progress gap between consecutive cars on the same route and direction
    pub following_distance: f32,

    /// Pigeons scatter when the observer comes this close to a group center
    pub pigeon_scatter_radius: f32,
    /// Pigeon groups respawn within this distance of the observer
    pub pigeon_spawn_radius: f32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            max_cars: 60,
            max_boats: 8,
            max_birds: 20,
            max_pedestrians: 40,
            pigeon_groups: 4,
            car_cull_radius: 350.0,
            boat_cull_radius: 500.0,
            bird_cull_radius: 400.0,
            pedestrian_cull_radius: 150.0,
            pigeon_cull_radius: 120.0,
            following_distance: 8.0,
            pigeon_scatter_radius: 7.0,
            pigeon_spawn_radius: 60.0,
        }
    }
}

impl SimConfig {
    /// Check that radii and distances are usable
    pub fn validate(&self) -> Result<()> {
        let radii = [
            ("car_cull_radius", self.car_cull_radius),
            ("boat_cull_radius", self.boat_cull_radius),
            ("bird_cull_radius", self.bird_cull_radius),
            ("pedestrian_cull_radius", self.pedestrian_cull_radius),
            ("pigeon_cull_radius", self.pigeon_cull_radius),
            ("pigeon_scatter_radius", self.pigeon_scatter_radius),
            ("pigeon_spawn_radius", self.pigeon_spawn_radius),
        ];
        for (name, value) in radii {
            ensure!(
                value.is_finite() && value > 0.0,
                "{name} must be a positive distance, got {value}"
            );
        }
        ensure!(
            self.following_distance.is_finite() && self.following_distance >= 0.0,
            "following_distance must be non-negative, got {}",
            self.following_distance
        );
        // New groups are placed at least twice the scatter radius out
        ensure!(
            self.pigeon_spawn_radius > self.pigeon_scatter_radius * 2.0,
            "pigeon_spawn_radius ({}) must exceed twice pigeon_scatter_radius ({})",
            self.pigeon_spawn_radius,
            self.pigeon_scatter_radius
        );
        ensure!(
            self.pigeon_cull_radius >= self.pigeon_spawn_radius,
            "pigeon_cull_radius ({}) must not be smaller than pigeon_spawn_radius ({})",
            self.pigeon_cull_radius,
            self.pigeon_spawn_radius
        );
        Ok(())
    }
}
