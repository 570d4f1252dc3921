//! Route construction, sampling and lane offset tests

use std::f32::consts::FRAC_PI_2;

use ambient_traffic::simulation::{
    build_route, compute_lane_offset, sample_route, sample_route_offset, seeded_random,
    Direction, Position,
};

const EPS: f32 = 1e-3;

fn residential_road() -> ambient_traffic::simulation::RouteSegment {
    build_route(
        vec![Position::flat(0.0, 0.0), Position::flat(100.0, 0.0)],
        6.0,
        false,
    )
}

fn bent_road() -> ambient_traffic::simulation::RouteSegment {
    build_route(
        vec![
            Position::flat(0.0, 0.0),
            Position::flat(30.0, 0.0),
            Position::flat(30.0, 0.0), // duplicate point
            Position::flat(30.0, 40.0),
            Position::flat(-10.0, 40.0),
        ],
        8.0,
        false,
    )
}

#[test]
fn test_residential_road_scenario() {
    let route = residential_road();
    assert!((route.total_length - 100.0).abs() < EPS);
    assert_eq!(route.segment_lengths.len(), 1);
    assert!((route.segment_lengths[0] - 100.0).abs() < EPS);

    let sample = sample_route(&route, 25.0);
    assert!((sample.x - 25.0).abs() < EPS);
    assert!(sample.z.abs() < EPS);
    assert!((sample.heading - FRAC_PI_2).abs() < EPS);
}

#[test]
fn test_cumulative_lengths_are_monotonic() {
    let route = bent_road();
    assert_eq!(route.cumulative.len(), route.points.len());
    assert_eq!(route.cumulative[0], 0.0);
    for pair in route.cumulative.windows(2) {
        assert!(pair[1] >= pair[0], "cumulative lengths decreased: {:?}", route.cumulative);
    }
    let last = *route.cumulative.last().unwrap();
    assert!((last - route.total_length).abs() < EPS);
    assert!((route.total_length - 110.0).abs() < EPS);
}

#[test]
fn test_sample_endpoints_and_clamping() {
    let route = bent_road();

    let start = sample_route(&route, 0.0);
    assert!((start.x - 0.0).abs() < EPS && (start.z - 0.0).abs() < EPS);

    let end = sample_route(&route, route.total_length);
    assert!((end.x + 10.0).abs() < EPS && (end.z - 40.0).abs() < EPS);

    // Out-of-range progress clamps to the ends
    assert_eq!(sample_route(&route, -50.0), start);
    assert_eq!(sample_route(&route, route.total_length + 50.0), end);
}

#[test]
fn test_sample_picks_the_right_segment() {
    let route = bent_road();

    // 50m in: 30m along x, then 20m along z
    let sample = sample_route(&route, 50.0);
    assert!((sample.x - 30.0).abs() < EPS);
    assert!((sample.z - 20.0).abs() < EPS);
    assert!(sample.heading.abs() < EPS, "heading along +z should be 0");

    // Last segment runs towards -x
    let sample = sample_route(&route, 100.0);
    assert!((sample.x - 0.0).abs() < EPS);
    assert!((sample.z - 40.0).abs() < EPS);
    assert!((sample.heading + FRAC_PI_2).abs() < EPS);
}

#[test]
fn test_sampling_is_continuous() {
    let route = bent_road();
    let mut previous = sample_route(&route, 0.0);
    let mut progress = 0.0;
    while progress < route.total_length {
        progress += 0.25;
        let next = sample_route(&route, progress);
        let jump = ((next.x - previous.x).powi(2) + (next.z - previous.z).powi(2)).sqrt();
        assert!(jump <= 0.25 + EPS, "jump of {jump} at progress {progress}");
        previous = next;
    }
}

#[test]
fn test_zero_offset_matches_centerline() {
    let route = bent_road();
    for progress in [0.0, 12.5, 30.0, 55.0, 99.0, route.total_length] {
        assert_eq!(
            sample_route_offset(&route, progress, 0.0),
            sample_route(&route, progress)
        );
    }
}

#[test]
fn test_offset_is_perpendicular() {
    let route = residential_road();
    let center = sample_route(&route, 50.0);
    let shifted = sample_route_offset(&route, 50.0, 2.0);

    assert!((shifted.x - center.x).abs() < EPS, "offset must not move along the road");
    assert!(((shifted.z - center.z).abs() - 2.0).abs() < EPS);
    assert_eq!(shifted.heading, center.heading);

    let opposite = sample_route_offset(&route, 50.0, -2.0);
    assert!(((opposite.z - center.z) + (shifted.z - center.z)).abs() < EPS);
}

#[test]
fn test_two_way_lane_offset() {
    let route = residential_road();
    assert!((compute_lane_offset(&route, Direction::Forward, 7) + 1.5).abs() < EPS);
    assert!((compute_lane_offset(&route, Direction::Backward, 7) - 1.5).abs() < EPS);
}

#[test]
fn test_one_way_lane_offset_stays_right_biased() {
    let route = build_route(
        vec![Position::flat(0.0, 0.0), Position::flat(0.0, 50.0)],
        10.0,
        true,
    );

    let mut seen_inner = false;
    let mut seen_outer = false;
    for seed in 0..64 {
        let offset = compute_lane_offset(&route, Direction::Forward, seed);
        assert_eq!(offset, compute_lane_offset(&route, Direction::Forward, seed));
        if (offset + 0.75).abs() < EPS {
            seen_inner = true;
        } else if (offset + 1.5).abs() < EPS {
            seen_outer = true;
        } else {
            panic!("unexpected one-way lane offset {offset}");
        }
    }
    assert!(seen_inner && seen_outer, "both lanes should be used");
}

#[test]
fn test_seeded_random_is_deterministic_and_bounded() {
    for seed in 0..1000u64 {
        let value = seeded_random(seed);
        assert!((0.0..1.0).contains(&value));
        assert_eq!(value, seeded_random(seed));
    }
    assert_ne!(seeded_random(1), seeded_random(2));
}

#[test]
fn test_midpoint() {
    let route = bent_road();
    let mid = route.midpoint();
    assert!((mid.x - 30.0).abs() < EPS);
    assert!((mid.z - 25.0).abs() < EPS);
}
