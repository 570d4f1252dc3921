//! Endpoint connectivity between car routes
//!
//! Routes whose endpoints lie within [`CONNECT_DISTANCE`] of each other are
//! linked. The graph is built once per network load and only read afterwards.

use petgraph::algo::connected_components;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;

use super::car::SimCar;
use super::route::{compute_lane_offset, RouteSegment};
use super::rng::{position_seed, seeded_index};
use super::types::{Direction, CONNECT_DISTANCE, ROUTE_ENTRY_INSET};

/// Which end of a route
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Start,
    End,
}

impl Endpoint {
    /// The endpoint an agent leaves through when travelling `direction`
    pub fn exit_for(direction: Direction) -> Self {
        match direction {
            Direction::Forward => Endpoint::End,
            Direction::Backward => Endpoint::Start,
        }
    }
}

/// Edge data: the endpoint of the source route and how the target is entered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteEdge {
    pub from: Endpoint,
    pub enter_at_start: bool,
}

/// A continuation from one route onto another
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteLink {
    pub target: usize,
    /// Enter the target at its start (travel forward) or at its end (travel backward)
    pub enter_at_start: bool,
}

/// Adjacency record for a single route
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteEndpoints {
    pub at_start: Vec<RouteLink>,
    pub at_end: Vec<RouteLink>,
}

/// Route adjacency graph. Node `i` is route `i`.
#[derive(Debug, Clone, Default)]
pub struct RouteGraph {
    graph: DiGraph<usize, RouteEdge>,
}

/// Build the graph for `routes`, testing all four endpoint pairings of every ordered pair
pub fn build_route_graph(routes: &[RouteSegment]) -> RouteGraph {
    let threshold_sq = CONNECT_DISTANCE * CONNECT_DISTANCE;
    let mut graph = DiGraph::with_capacity(routes.len(), routes.len() * 2);
    for index in 0..routes.len() {
        graph.add_node(index);
    }

    for (i, from) in routes.iter().enumerate() {
        let (from_start, from_end) = (from.start(), from.end());
        for (j, to) in routes.iter().enumerate() {
            if i == j {
                continue;
            }
            let (to_start, to_end) = (to.start(), to.end());
            let (a, b) = (NodeIndex::new(i), NodeIndex::new(j));

            let checks = [
                (Endpoint::End, from_end, to_start, true, true),
                (Endpoint::End, from_end, to_end, false, !to.oneway),
                (Endpoint::Start, from_start, to_end, false, !to.oneway),
                (Endpoint::Start, from_start, to_start, true, true),
            ];
            for (endpoint, p, q, enter_at_start, allowed) in checks {
                if allowed && p.distance_sq_xz(&q) < threshold_sq {
                    graph.add_edge(
                        a,
                        b,
                        RouteEdge {
                            from: endpoint,
                            enter_at_start,
                        },
                    );
                }
            }
        }
    }

    RouteGraph { graph }
}

impl RouteGraph {
    /// Continuations available at one endpoint of `route`, in insertion order
    pub fn connections(&self, route: usize, endpoint: Endpoint) -> Vec<RouteLink> {
        if route >= self.graph.node_count() {
            return Vec::new();
        }
        let mut edges: Vec<_> = self
            .graph
            .edges(NodeIndex::new(route))
            .filter(|edge| edge.weight().from == endpoint)
            .map(|edge| {
                (
                    edge.id(),
                    RouteLink {
                        target: edge.target().index(),
                        enter_at_start: edge.weight().enter_at_start,
                    },
                )
            })
            .collect();
        edges.sort_by_key(|(id, _)| *id);
        edges.into_iter().map(|(_, link)| link).collect()
    }

    /// Both endpoint lists for `route`
    pub fn endpoints(&self, route: usize) -> RouteEndpoints {
        RouteEndpoints {
            at_start: self.connections(route, Endpoint::Start),
            at_end: self.connections(route, Endpoint::End),
        }
    }

    pub fn route_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn link_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Endpoints with no continuation, counted over all routes
    pub fn dead_end_count(&self) -> usize {
        (0..self.route_count())
            .map(|route| {
                let ends = self.endpoints(route);
                usize::from(ends.at_start.is_empty()) + usize::from(ends.at_end.is_empty())
            })
            .sum()
    }

    /// Weakly connected components of the road network
    pub fn component_count(&self) -> usize {
        connected_components(&self.graph)
    }
}

/// Move a car that ran off its route onto a connected route.
///
/// Returns `false` when the exit endpoint has no continuation; the caller must then
/// mark the car dead. The choice among candidates is seeded from the car's current
/// world position, so every car reaching the same spot takes the same turn.
pub fn transition_car(car: &mut SimCar, routes: &[RouteSegment], graph: &RouteGraph) -> bool {
    let candidates = graph.connections(car.route, Endpoint::exit_for(car.direction));
    if candidates.is_empty() {
        return false;
    }

    let seed = position_seed(car.x, car.z);
    let link = candidates[seeded_index(seed, candidates.len())];
    let Some(next) = routes.get(link.target) else {
        return false;
    };

    let inset = ROUTE_ENTRY_INSET.min(next.total_length);
    car.route = link.target;
    if link.enter_at_start {
        car.direction = Direction::Forward;
        car.progress = inset;
    } else {
        car.direction = Direction::Backward;
        car.progress = next.total_length - inset;
    }
    car.lane_offset = compute_lane_offset(next, car.direction, seed.wrapping_add(1));
    true
}
