//! Birds circling overhead. Purely kinematic, not bound to any route.

use std::f32::consts::PI;

use super::types::{Position, BIRD_FLAP_RATE, BIRD_WING_AMPLITUDE};

#[derive(Debug, Clone, Default)]
pub struct SimBird {
    pub center: Position,
    pub radius: f32,
    /// Height above the center's ground level
    pub altitude: f32,
    pub angle: f32,
    /// Signed, radians per second
    pub angular_speed: f32,
    pub flap_phase: f32,
    pub variant: usize,
    pub alive: bool,
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub rotation: f32,
    pub wing_angle: f32,
}

impl SimBird {
    pub fn update(&mut self, delta_secs: f32) {
        if !self.alive {
            return;
        }
        self.angle += self.angular_speed * delta_secs;
        self.flap_phase += BIRD_FLAP_RATE * delta_secs;
        self.refresh_pose();
    }

    pub fn refresh_pose(&mut self) {
        self.x = self.center.x + self.angle.cos() * self.radius;
        self.z = self.center.z + self.angle.sin() * self.radius;
        self.y = self.center.y + self.altitude;

        // Tangent of the circle in the direction of travel
        let (dx, dz) = (-self.angle.sin(), self.angle.cos());
        let tangent = dx.atan2(dz);
        self.rotation = if self.angular_speed >= 0.0 {
            tangent
        } else {
            tangent + PI
        };
        self.wing_angle = self.flap_phase.sin() * BIRD_WING_AMPLITUDE;
    }
}
