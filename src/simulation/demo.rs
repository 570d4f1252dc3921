//! Built-in demo network
//!
//! A small town used by the headless binary and by tests: a 3x3 street grid,
//! a one-way ring segment, footpaths and a river crossing the map.

use super::types::{Position, RoadInput, RoadKind, WaterwayInput};
use super::world::SimWorld;

/// Street spacing of the demo grid in meters
pub const DEMO_BLOCK: f32 = 80.0;

pub fn demo_roads() -> Vec<RoadInput> {
    let mut roads = Vec::new();
    let coord = |i: usize| (i as f32 - 1.0) * DEMO_BLOCK;

    // Connect grid horizontally
    for row in 0..3 {
        for col in 0..2 {
            let kind = if row == 1 { RoadKind::Primary } else { RoadKind::Residential };
            let width = if row == 1 { 10.0 } else { 6.0 };
            roads.push(RoadInput::new(
                kind,
                vec![
                    Position::flat(coord(col), coord(row)),
                    Position::flat(coord(col + 1), coord(row)),
                ],
                width,
                false,
            ));
        }
    }

    // Connect grid vertically
    for row in 0..2 {
        for col in 0..3 {
            roads.push(RoadInput::new(
                RoadKind::Residential,
                vec![
                    Position::flat(coord(col), coord(row)),
                    Position::flat(coord(col), coord(row) + DEMO_BLOCK * 0.5),
                    Position::flat(coord(col), coord(row + 1)),
                ],
                6.0,
                false,
            ));
        }
    }

    // One-way bend off the north-east corner and back into the grid
    roads.push(RoadInput::new(
        RoadKind::from_tag("tertiary"),
        vec![
            Position::flat(coord(2), coord(2)),
            Position::flat(coord(2) + 40.0, coord(2) + 20.0),
            Position::flat(coord(2) + 40.0, coord(1)),
            Position::flat(coord(2), coord(1)),
        ],
        7.0,
        true,
    ));

    // Footpaths through the blocks
    for offset in [-0.5, 0.5] {
        roads.push(RoadInput::new(
            RoadKind::Footway,
            vec![
                Position::flat(coord(0), offset * DEMO_BLOCK),
                Position::flat(0.0, offset * DEMO_BLOCK + 6.0),
                Position::flat(coord(2), offset * DEMO_BLOCK),
            ],
            2.5,
            false,
        ));
    }
    roads.push(RoadInput::new(
        RoadKind::from_tag("pedestrian"),
        vec![Position::flat(-20.0, -20.0), Position::flat(20.0, 20.0)],
        8.0,
        false,
    ));

    // Not eligible for anything
    roads.push(RoadInput::new(
        RoadKind::from_tag("construction"),
        vec![Position::flat(-100.0, 0.0), Position::flat(-140.0, 0.0)],
        6.0,
        false,
    ));

    roads
}

pub fn demo_waterways() -> Vec<WaterwayInput> {
    vec![WaterwayInput::new(
        vec![
            Position::flat(-140.0, -110.0),
            Position::flat(-60.0, -100.0),
            Position::flat(20.0, -115.0),
            Position::flat(140.0, -105.0),
        ],
        18.0,
    )]
}

impl SimWorld {
    /// Create a world populated with the demo network, observer at the origin
    pub fn create_demo_world() -> Self {
        let mut world = SimWorld::new();
        world.load_network(&demo_roads(), &demo_waterways(), Position::default());
        world
    }
}
