//! Core types for the ambient simulation
//!
//! These are plain data types shared by every agent kind.

use std::f32::consts::PI;

/// A position in the simulation. Routes live on the ground plane (`x`, `z`);
/// `y` carries terrain height or flight altitude where it matters.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Position {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// A point on the ground plane
    pub fn flat(x: f32, z: f32) -> Self {
        Self { x, y: 0.0, z }
    }

    /// Squared distance on the ground plane, ignoring height
    pub fn distance_sq_xz(&self, other: &Position) -> f32 {
        let dx = self.x - other.x;
        let dz = self.z - other.z;
        dx * dx + dz * dz
    }

    pub fn distance_xz(&self, other: &Position) -> f32 {
        self.distance_sq_xz(other).sqrt()
    }

    pub fn lerp(&self, other: &Position, t: f32) -> Position {
        Position {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
            z: self.z + (other.z - self.z) * t,
        }
    }

    /// Heading from this position to another, measured from the +z axis
    pub fn heading_to(&self, other: &Position) -> f32 {
        let dx = other.x - self.x;
        let dz = other.z - self.z;
        dx.atan2(dz)
    }
}

/// Travel direction along a route
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Direction {
    /// Increasing progress, start towards end
    #[default]
    Forward,
    /// Decreasing progress, end towards start
    Backward,
}

impl Direction {
    /// +1.0 or -1.0
    pub fn sign(self) -> f32 {
        match self {
            Direction::Forward => 1.0,
            Direction::Backward => -1.0,
        }
    }

    /// Rotation added to a segment heading so the agent faces its travel direction
    pub fn heading_flip(self) -> f32 {
        match self {
            Direction::Forward => 0.0,
            Direction::Backward => PI,
        }
    }
}

/// Road classification, following OSM `highway=*` tag values
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoadKind {
    Motorway,
    Trunk,
    Primary,
    Secondary,
    Tertiary,
    Unclassified,
    Residential,
    LivingStreet,
    Service,
    Footway,
    Path,
    Pedestrian,
    Steps,
    Cycleway,
    Other(String),
}

impl RoadKind {
    /// Map a raw `highway` tag onto a road kind. `_link` ramps count as their parent class.
    pub fn from_tag(tag: &str) -> Self {
        let base = tag.strip_suffix("_link").unwrap_or(tag);
        match base {
            "motorway" => RoadKind::Motorway,
            "trunk" => RoadKind::Trunk,
            "primary" => RoadKind::Primary,
            "secondary" => RoadKind::Secondary,
            "tertiary" => RoadKind::Tertiary,
            "unclassified" => RoadKind::Unclassified,
            "residential" => RoadKind::Residential,
            "living_street" => RoadKind::LivingStreet,
            "service" => RoadKind::Service,
            "footway" | "sidewalk" => RoadKind::Footway,
            "path" | "track" => RoadKind::Path,
            "pedestrian" => RoadKind::Pedestrian,
            "steps" => RoadKind::Steps,
            "cycleway" => RoadKind::Cycleway,
            other => RoadKind::Other(other.to_string()),
        }
    }

    pub fn allows_cars(&self) -> bool {
        matches!(
            self,
            RoadKind::Motorway
                | RoadKind::Trunk
                | RoadKind::Primary
                | RoadKind::Secondary
                | RoadKind::Tertiary
                | RoadKind::Unclassified
                | RoadKind::Residential
                | RoadKind::LivingStreet
                | RoadKind::Service
        )
    }

    pub fn allows_pedestrians(&self) -> bool {
        matches!(
            self,
            RoadKind::Footway
                | RoadKind::Path
                | RoadKind::Pedestrian
                | RoadKind::Steps
                | RoadKind::LivingStreet
                | RoadKind::Residential
        )
    }
}

/// A road as handed over by the geographic data collaborator
#[derive(Debug, Clone)]
pub struct RoadInput {
    pub kind: RoadKind,
    pub points: Vec<Position>,
    pub width: f32,
    pub oneway: bool,
}

impl RoadInput {
    pub fn new(kind: RoadKind, points: Vec<Position>, width: f32, oneway: bool) -> Self {
        Self {
            kind,
            points,
            width,
            oneway,
        }
    }
}

/// A navigable waterway (river, canal) polyline
#[derive(Debug, Clone)]
pub struct WaterwayInput {
    pub points: Vec<Position>,
    pub width: f32,
}

impl WaterwayInput {
    pub fn new(points: Vec<Position>, width: f32) -> Self {
        Self { points, width }
    }
}

/// Route endpoints closer than this are considered connected (meters)
pub const CONNECT_DISTANCE: f32 = 5.0;

/// How far inside a new route a car is placed after a transition (meters)
pub const ROUTE_ENTRY_INSET: f32 = 0.5;

/// Car speed range in m/s
pub const CAR_SPEED_MIN: f32 = 8.0;
pub const CAR_SPEED_MAX: f32 = 14.0;

/// Boat speed range in m/s
pub const BOAT_SPEED_MIN: f32 = 2.0;
pub const BOAT_SPEED_MAX: f32 = 5.0;

/// Pedestrian walking speed range in m/s
pub const PEDESTRIAN_SPEED_MIN: f32 = 1.0;
pub const PEDESTRIAN_SPEED_MAX: f32 = 1.8;

/// Number of visual variants per agent kind
pub const CAR_VARIANTS: usize = 6;
pub const BOAT_VARIANTS: usize = 3;
pub const PEDESTRIAN_VARIANTS: usize = 4;
pub const BIRD_VARIANTS: usize = 2;

/// Boat rocking: roll amplitude (radians) and angular frequency (rad/s)
pub const BOAT_ROCK_AMPLITUDE: f32 = 0.05;
pub const BOAT_ROCK_FREQUENCY: f32 = 1.3;
/// Boat pitch wobble, a second slower sinusoid
pub const BOAT_WOBBLE_AMPLITUDE: f32 = 0.02;
pub const BOAT_WOBBLE_FREQUENCY: f32 = 0.7;

/// Leg swing amplitude (radians) and stride phase gained per meter walked
pub const PEDESTRIAN_LEG_AMPLITUDE: f32 = 0.5;
pub const PEDESTRIAN_STRIDE_RATE: f32 = 4.0;

/// Bird circling parameters
pub const BIRD_RADIUS_MIN: f32 = 8.0;
pub const BIRD_RADIUS_MAX: f32 = 30.0;
pub const BIRD_ALTITUDE_MIN: f32 = 12.0;
pub const BIRD_ALTITUDE_MAX: f32 = 35.0;
pub const BIRD_ANGULAR_SPEED_MIN: f32 = 0.3;
pub const BIRD_ANGULAR_SPEED_MAX: f32 = 0.8;
/// Flap phase advance in rad/s and wing amplitude in radians
pub const BIRD_FLAP_RATE: f32 = 9.0;
pub const BIRD_WING_AMPLITUDE: f32 = 0.6;
/// Horizontal jitter around the chosen circle center (meters)
pub const BIRD_CENTER_JITTER: f32 = 20.0;
/// Max distance from the observer when no waterway is available (meters)
pub const BIRD_OBSERVER_SPREAD: f32 = 80.0;
