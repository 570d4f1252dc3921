//! Ground-dwelling pigeon flocks
//!
//! A group pecks around its center until the observer walks into it, then
//! every member flies off away from the observer. Once the flight is over (or
//! the group drifted out of range) it is `Gone`, and the world respawns it
//! somewhere else on the next tick.

use std::f32::consts::{PI, TAU};

use super::config::SimConfig;
use super::rng::{seeded_range, SpawnCounter};
use super::types::Position;

/// Members per group
pub const PIGEON_MEMBERS_MIN: usize = 5;
pub const PIGEON_MEMBERS_MAX: usize = 9;
/// Members wander inside this radius around the group center (meters)
pub const PIGEON_WALK_RADIUS: f32 = 2.5;
pub const PIGEON_WALK_SPEED: f32 = 0.4;
/// Seconds between heading changes while wandering
pub const PIGEON_WANDER_MIN: f32 = 1.0;
pub const PIGEON_WANDER_MAX: f32 = 3.0;
/// Phase rates in rad/s
pub const PIGEON_PECK_RATE: f32 = 7.0;
pub const PIGEON_FIDGET_RATE: f32 = 2.0;
pub const PIGEON_FLAP_RATE: f32 = 18.0;
/// Horizontal flee speed, upward lift and per-axis jitter (m/s)
pub const PIGEON_SCATTER_SPEED: f32 = 6.0;
pub const PIGEON_SCATTER_LIFT: f32 = 3.0;
pub const PIGEON_SCATTER_JITTER: f32 = 1.0;
/// Seconds a scatter lasts before the group is gone
pub const PIGEON_SCATTER_DURATION: f32 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlockState {
    #[default]
    Pecking,
    Scattering,
    Gone,
}

/// A single bird in a group
#[derive(Debug, Clone, Default)]
pub struct Pigeon {
    /// Offset from the group center on the ground plane
    pub offset_x: f32,
    pub offset_z: f32,
    /// Height above the group's ground level
    pub altitude: f32,
    pub heading: f32,
    pub wander_timer: f32,
    pub peck_phase: f32,
    pub wing_phase: f32,
    pub scatter_velocity: [f32; 3],
}

#[derive(Debug, Clone, Default)]
pub struct PigeonGroup {
    pub center: Position,
    pub state: FlockState,
    pub timer: f32,
    /// Terrain height under the center, captured at spawn
    pub ground_height: f32,
    pub members: Vec<Pigeon>,
}

impl PigeonGroup {
    /// A fresh pecking group with a randomised roster
    pub fn new(center: Position, ground_height: f32, counter: &mut SpawnCounter) -> Self {
        let seed = counter.advance();
        let count = seeded_range(
            seed,
            PIGEON_MEMBERS_MIN as f32,
            (PIGEON_MEMBERS_MAX + 1) as f32,
        ) as usize;

        let members = (0..count.clamp(PIGEON_MEMBERS_MIN, PIGEON_MEMBERS_MAX))
            .map(|_| {
                let seed = counter.advance();
                let angle = seeded_range(seed, 0.0, TAU);
                let distance = seeded_range(seed + 1, 0.0, PIGEON_WALK_RADIUS * 0.8);
                Pigeon {
                    offset_x: angle.sin() * distance,
                    offset_z: angle.cos() * distance,
                    altitude: 0.0,
                    heading: seeded_range(seed + 2, 0.0, TAU),
                    wander_timer: seeded_range(seed + 3, 0.0, PIGEON_WANDER_MAX),
                    peck_phase: seeded_range(seed + 4, 0.0, TAU),
                    wing_phase: 0.0,
                    scatter_velocity: [0.0; 3],
                }
            })
            .collect();

        Self {
            center: Position::new(center.x, ground_height, center.z),
            state: FlockState::Pecking,
            timer: 0.0,
            ground_height,
            members,
        }
    }

    /// World position of a member
    pub fn member_position(&self, member: &Pigeon) -> Position {
        Position::new(
            self.center.x + member.offset_x,
            self.ground_height + member.altitude,
            self.center.z + member.offset_z,
        )
    }

    /// Advance the state machine by one tick. A `Gone` group is left untouched;
    /// respawning it is the owner's job.
    pub fn update(
        &mut self,
        delta_secs: f32,
        observer: Position,
        counter: &mut SpawnCounter,
        config: &SimConfig,
    ) {
        match self.state {
            FlockState::Pecking => self.update_pecking(delta_secs, observer, counter, config),
            FlockState::Scattering => self.update_scattering(delta_secs),
            FlockState::Gone => {}
        }
    }

    fn update_pecking(
        &mut self,
        delta_secs: f32,
        observer: Position,
        counter: &mut SpawnCounter,
        config: &SimConfig,
    ) {
        let distance_sq = self.center.distance_sq_xz(&observer);
        if distance_sq < config.pigeon_scatter_radius * config.pigeon_scatter_radius {
            self.scatter(observer, counter);
            return;
        }
        if distance_sq > config.pigeon_cull_radius * config.pigeon_cull_radius {
            self.state = FlockState::Gone;
            return;
        }

        for member in &mut self.members {
            member.wander_timer -= delta_secs;
            if member.wander_timer <= 0.0 {
                let seed = counter.advance();
                member.heading = seeded_range(seed, 0.0, TAU);
                member.wander_timer = seeded_range(seed + 1, PIGEON_WANDER_MIN, PIGEON_WANDER_MAX);
            }

            member.offset_x += member.heading.sin() * PIGEON_WALK_SPEED * delta_secs;
            member.offset_z += member.heading.cos() * PIGEON_WALK_SPEED * delta_secs;

            let radius = member.offset_x.hypot(member.offset_z);
            if radius > PIGEON_WALK_RADIUS {
                let scale = PIGEON_WALK_RADIUS / radius;
                member.offset_x *= scale;
                member.offset_z *= scale;
                member.heading = (member.heading + PI) % TAU;
            }

            member.peck_phase += PIGEON_PECK_RATE * delta_secs;
            member.wing_phase += PIGEON_FIDGET_RATE * delta_secs;
        }
    }

    /// Switch to `Scattering`, aiming every member away from the observer
    fn scatter(&mut self, observer: Position, counter: &mut SpawnCounter) {
        let center = self.center;
        for member in &mut self.members {
            let seed = counter.advance();
            let mut dx = center.x + member.offset_x - observer.x;
            let mut dz = center.z + member.offset_z - observer.z;
            let length = (dx * dx + dz * dz).sqrt();
            if length > f32::EPSILON {
                dx /= length;
                dz /= length;
            } else {
                // Observer standing on the bird: pick any direction
                let angle = seeded_range(seed + 3, 0.0, TAU);
                dx = angle.sin();
                dz = angle.cos();
            }

            let jitter = |offset: u64| {
                seeded_range(seed + offset, -PIGEON_SCATTER_JITTER, PIGEON_SCATTER_JITTER) * 0.5
            };
            member.scatter_velocity = [
                dx * PIGEON_SCATTER_SPEED + jitter(0),
                PIGEON_SCATTER_LIFT + jitter(1),
                dz * PIGEON_SCATTER_SPEED + jitter(2),
            ];
            member.heading = dx.atan2(dz);
        }
        self.state = FlockState::Scattering;
        self.timer = 0.0;
    }

    fn update_scattering(&mut self, delta_secs: f32) {
        for member in &mut self.members {
            let [vx, vy, vz] = member.scatter_velocity;
            member.offset_x += vx * delta_secs;
            member.altitude += vy * delta_secs;
            member.offset_z += vz * delta_secs;
            member.wing_phase += PIGEON_FLAP_RATE * delta_secs;
        }

        self.timer += delta_secs;
        if self.timer >= PIGEON_SCATTER_DURATION {
            self.state = FlockState::Gone;
        }
    }
}
