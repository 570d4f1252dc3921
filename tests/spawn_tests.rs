//! Route filtering and spawn factory tests

use ambient_traffic::simulation::{
    build_boat_routes, build_car_routes, build_ped_routes, build_route, spawn_bird, spawn_boat,
    spawn_car, spawn_pedestrian, spawn_pigeon_group, Direction, FlatTerrain, NoTerrain, Position,
    RoadInput, RoadKind, RouteSegment, SimConfig, SpawnCounter, WaterwayInput, CAR_SPEED_MAX,
    CAR_SPEED_MIN, CAR_VARIANTS, PIGEON_MEMBERS_MAX, PIGEON_MEMBERS_MIN,
};

fn line(x0: f32, z0: f32, x1: f32, z1: f32) -> Vec<Position> {
    vec![Position::flat(x0, z0), Position::flat(x1, z1)]
}

fn residential_routes() -> Vec<RouteSegment> {
    build_car_routes(&[RoadInput::new(
        RoadKind::from_tag("residential"),
        line(0.0, 0.0, 100.0, 0.0),
        6.0,
        false,
    )])
}

#[test]
fn test_route_filters() {
    let roads = vec![
        RoadInput::new(RoadKind::from_tag("primary"), line(0.0, 0.0, 10.0, 0.0), 10.0, false),
        RoadInput::new(RoadKind::from_tag("motorway_link"), line(0.0, 0.0, 0.0, 10.0), 8.0, true),
        RoadInput::new(RoadKind::from_tag("residential"), line(5.0, 5.0, 9.0, 9.0), 6.0, false),
        RoadInput::new(RoadKind::from_tag("footway"), line(1.0, 1.0, 2.0, 2.0), 2.0, true),
        RoadInput::new(RoadKind::from_tag("cycleway"), line(3.0, 3.0, 4.0, 4.0), 2.0, false),
        // Too short to be a route
        RoadInput::new(RoadKind::Primary, vec![Position::flat(0.0, 0.0)], 10.0, false),
    ];

    let car_routes = build_car_routes(&roads);
    assert_eq!(car_routes.len(), 3);
    assert!(car_routes[1].oneway);

    let ped_routes = build_ped_routes(&roads);
    assert_eq!(ped_routes.len(), 2);
    assert!(ped_routes.iter().all(|route| !route.oneway));

    let water = build_boat_routes(&[
        WaterwayInput::new(line(0.0, 0.0, 50.0, 0.0), 12.0),
        WaterwayInput::new(vec![], 12.0),
    ]);
    assert_eq!(water.len(), 1);
}

#[test]
fn test_sole_route_always_chosen() {
    let routes = residential_routes();
    let config = SimConfig::default();
    let mut counter = SpawnCounter::new();

    for observer in [Position::flat(50.0, 10.0), Position::flat(-120.0, 200.0)] {
        for _ in 0..50 {
            let car = spawn_car(&routes, &mut counter, observer, &config, &NoTerrain)
                .expect("a car should spawn on the only route");
            assert_eq!(car.route, 0);
        }
    }
}

#[test]
fn test_no_spawn_without_a_nearby_route() {
    let routes = residential_routes();
    let paths = build_ped_routes(&[RoadInput::new(
        RoadKind::Footway,
        line(0.0, 0.0, 0.0, 60.0),
        2.0,
        false,
    )]);
    let water = build_boat_routes(&[WaterwayInput::new(line(0.0, 0.0, 300.0, 0.0), 20.0)]);
    let config = SimConfig::default();
    let mut counter = SpawnCounter::new();
    let observer = Position::flat(10_000.0, 10_000.0);

    for _ in 0..20 {
        assert!(spawn_car(&routes, &mut counter, observer, &config, &NoTerrain).is_none());
        assert!(spawn_boat(&water, &mut counter, observer, &config, &NoTerrain).is_none());
        assert!(spawn_pedestrian(&paths, &mut counter, observer, &config, &NoTerrain).is_none());
    }
}

#[test]
fn test_spawned_agents_start_inside_cull_radius() {
    // Midpoint is in range but most of the road is not
    let routes = vec![build_route(line(-2000.0, 0.0, 2000.0, 0.0), 6.0, false)];
    let config = SimConfig::default();
    let mut counter = SpawnCounter::new();
    let observer = Position::default();

    let mut spawned = 0;
    for _ in 0..400 {
        if let Some(car) = spawn_car(&routes, &mut counter, observer, &config, &NoTerrain) {
            let distance = Position::flat(car.x, car.z).distance_xz(&observer);
            assert!(distance <= config.car_cull_radius);
            spawned += 1;
        }
    }
    assert!(spawned > 0);
}

#[test]
fn test_spawned_car_fields_are_in_range() {
    let routes = residential_routes();
    let config = SimConfig::default();
    let mut counter = SpawnCounter::new();

    for _ in 0..100 {
        let car = spawn_car(
            &routes,
            &mut counter,
            Position::flat(50.0, 0.0),
            &config,
            &FlatTerrain(3.0),
        )
        .unwrap();
        assert!(car.alive);
        assert!(car.progress >= 0.0 && car.progress <= routes[0].total_length);
        assert!(car.speed >= CAR_SPEED_MIN && car.speed <= CAR_SPEED_MAX);
        assert!(car.variant < CAR_VARIANTS);
        assert!((car.lane_offset.abs() - 1.5).abs() < 1e-3);
        assert_eq!(car.y, 3.0);
        // Right-hand traffic: forward cars sit on the negative side of this road
        let expected_z = -car.direction.sign() * 1.5;
        assert!((car.z - expected_z).abs() < 1e-3);
    }
}

#[test]
fn test_spawning_is_reproducible() {
    let routes = build_car_routes(&ambient_traffic::simulation::demo_roads());
    let config = SimConfig::default();
    let observer = Position::flat(10.0, -20.0);

    let mut first = SpawnCounter::new();
    let mut second = SpawnCounter::new();
    for _ in 0..30 {
        let a = spawn_car(&routes, &mut first, observer, &config, &NoTerrain).unwrap();
        let b = spawn_car(&routes, &mut second, observer, &config, &NoTerrain).unwrap();
        assert_eq!(
            (a.route, a.progress, a.speed, a.direction, a.lane_offset, a.variant),
            (b.route, b.progress, b.speed, b.direction, b.lane_offset, b.variant)
        );
    }
    assert_eq!(first.steps(), second.steps());
}

#[test]
fn test_empty_pools_spawn_nothing() {
    let config = SimConfig::default();
    let mut counter = SpawnCounter::new();
    let observer = Position::default();

    assert!(spawn_car(&[], &mut counter, observer, &config, &NoTerrain).is_none());
    assert!(spawn_boat(&[], &mut counter, observer, &config, &NoTerrain).is_none());
    assert!(spawn_pedestrian(&[], &mut counter, observer, &config, &NoTerrain).is_none());
}

#[test]
fn test_one_way_cars_drive_forward() {
    let routes = vec![build_route(line(0.0, 0.0, 0.0, 200.0), 8.0, true)];
    let config = SimConfig::default();
    let mut counter = SpawnCounter::new();
    for _ in 0..40 {
        let car = spawn_car(&routes, &mut counter, Position::default(), &config, &NoTerrain)
            .unwrap();
        assert_eq!(car.direction, Direction::Forward);
    }
}

#[test]
fn test_cars_prefer_routes_near_the_observer() {
    let routes = vec![
        build_route(line(10_000.0, 0.0, 10_100.0, 0.0), 6.0, false),
        build_route(line(-10_000.0, 0.0, -10_100.0, 0.0), 6.0, false),
        build_route(line(0.0, 0.0, 100.0, 0.0), 6.0, false),
        build_route(line(0.0, 10_000.0, 0.0, 10_100.0), 6.0, false),
    ];
    let config = SimConfig::default();
    let mut counter = SpawnCounter::new();
    for _ in 0..60 {
        let car = spawn_car(&routes, &mut counter, Position::default(), &config, &NoTerrain)
            .unwrap();
        assert_eq!(car.route, 2);
    }
}

#[test]
fn test_boats_and_pedestrians_spawn_on_their_routes() {
    let water = build_boat_routes(&[WaterwayInput::new(line(0.0, 0.0, 300.0, 0.0), 20.0)]);
    let paths = build_ped_routes(&[RoadInput::new(
        RoadKind::Footway,
        line(0.0, 0.0, 0.0, 60.0),
        2.0,
        false,
    )]);
    let config = SimConfig::default();
    let mut counter = SpawnCounter::new();

    let boat = spawn_boat(&water, &mut counter, Position::default(), &config, &NoTerrain).unwrap();
    assert!(boat.alive);
    assert_eq!(boat.route, 0);
    assert!(boat.z.abs() < 1e-3);

    let walker =
        spawn_pedestrian(&paths, &mut counter, Position::default(), &config, &NoTerrain).unwrap();
    assert!(walker.alive);
    assert!(walker.x.abs() < 1e-3);
    assert!(walker.z >= 0.0 && walker.z <= 60.0);
}

#[test]
fn test_birds_circle_near_water_or_observer() {
    let mut counter = SpawnCounter::new();

    let observer = Position::flat(500.0, -500.0);
    for _ in 0..20 {
        let bird = spawn_bird(&[], &mut counter, observer, &NoTerrain);
        assert!(bird.alive);
        assert!((bird.center.x - observer.x).abs() <= 80.0);
        assert!((bird.center.z - observer.z).abs() <= 80.0);
        assert!(bird.radius > 0.0 && bird.altitude > 0.0);
        let r = ((bird.x - bird.center.x).powi(2) + (bird.z - bird.center.z).powi(2)).sqrt();
        assert!((r - bird.radius).abs() < 1e-2);
    }

    let water = build_boat_routes(&[WaterwayInput::new(line(0.0, 0.0, 100.0, 0.0), 15.0)]);
    for _ in 0..20 {
        let bird = spawn_bird(&water, &mut counter, observer, &NoTerrain);
        assert!(bird.center.x >= -20.0 && bird.center.x <= 120.0);
        assert!(bird.center.z.abs() <= 20.0);
    }
}

#[test]
fn test_pigeon_group_on_nearby_footpath() {
    let paths = build_ped_routes(&[RoadInput::new(
        RoadKind::Footway,
        line(-40.0, 30.0, 40.0, 30.0),
        2.0,
        false,
    )]);
    let config = SimConfig::default();
    let mut counter = SpawnCounter::new();

    let group = spawn_pigeon_group(&paths, &mut counter, Position::default(), &config, &NoTerrain);
    assert!((group.center.z - 30.0).abs() < 1e-3);
    assert!(group.center.x.abs() <= 40.0);
    assert!(group.members.len() >= PIGEON_MEMBERS_MIN && group.members.len() <= PIGEON_MEMBERS_MAX);
    assert_eq!(group.timer, 0.0);
}

#[test]
fn test_pigeon_group_falls_back_to_random_offset() {
    let paths = build_ped_routes(&[RoadInput::new(
        RoadKind::Footway,
        line(5000.0, 0.0, 5100.0, 0.0),
        2.0,
        false,
    )]);
    let config = SimConfig::default();
    let mut counter = SpawnCounter::new();
    let observer = Position::flat(-30.0, 12.0);

    for _ in 0..20 {
        let group = spawn_pigeon_group(&paths, &mut counter, observer, &config, &FlatTerrain(1.5));
        let distance = group.center.distance_xz(&observer);
        assert!(distance >= config.pigeon_scatter_radius * 2.0 - 1e-3);
        assert!(distance <= config.pigeon_spawn_radius + 1e-3);
        assert_eq!(group.ground_height, 1.5);
    }
}
