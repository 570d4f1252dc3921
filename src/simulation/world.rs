//! Main simulation world that ties everything together
//!
//! `SimWorld` is the single context a host owns: routes, the route graph, every
//! agent pool and the spawn counter. Pools have fixed capacity equal to their
//! population cap; a dead agent keeps its slot until a later spawn overwrites it.

use anyhow::{Context, Result};
use log::{debug, warn};

use super::bird::SimBird;
use super::boat::SimBoat;
use super::car::{enforce_following_distance, CarUpdateResult, SimCar};
use super::config::SimConfig;
use super::pedestrian::SimPedestrian;
use super::pigeon::{FlockState, PigeonGroup};
use super::rng::SpawnCounter;
use super::route::{sample_route, RouteSegment};
use super::route_graph::{build_route_graph, RouteGraph};
use super::spawner::{
    build_boat_routes, build_car_routes, build_ped_routes, spawn_bird, spawn_boat, spawn_car,
    spawn_pedestrian, spawn_pigeon_group,
};
use super::terrain::{NoTerrain, TerrainHeight};
use super::types::{Position, RoadInput, WaterwayInput};

/// Running counters, reset with the network
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SimStats {
    pub ticks: u64,
    pub cars_spawned: usize,
    pub car_transitions: usize,
    pub car_dead_ends: usize,
    pub cars_spacing_kills: usize,
    pub pedestrians_spawned: usize,
    pub boats_spawned: usize,
    pub birds_spawned: usize,
    pub pigeon_scatters: usize,
    pub pigeon_respawns: usize,
}

/// The main simulation world
pub struct SimWorld {
    config: SimConfig,
    terrain: Box<dyn TerrainHeight>,

    car_routes: Vec<RouteSegment>,
    boat_routes: Vec<RouteSegment>,
    ped_routes: Vec<RouteSegment>,
    car_graph: RouteGraph,

    cars: Vec<SimCar>,
    boats: Vec<SimBoat>,
    birds: Vec<SimBird>,
    pedestrians: Vec<SimPedestrian>,
    pigeon_groups: Vec<PigeonGroup>,

    counter: SpawnCounter,
    observer: Position,

    /// Simulation time
    pub time: f32,
    pub stats: SimStats,
}

impl Default for SimWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl SimWorld {
    fn new_internal(config: SimConfig) -> Self {
        Self {
            config,
            terrain: Box::new(NoTerrain),
            car_routes: Vec::new(),
            boat_routes: Vec::new(),
            ped_routes: Vec::new(),
            car_graph: RouteGraph::default(),
            cars: Vec::new(),
            boats: Vec::new(),
            birds: Vec::new(),
            pedestrians: Vec::new(),
            pigeon_groups: Vec::new(),
            counter: SpawnCounter::new(),
            observer: Position::default(),
            time: 0.0,
            stats: SimStats::default(),
        }
    }

    /// An empty world with the default configuration
    pub fn new() -> Self {
        Self::new_internal(SimConfig::default())
    }

    /// An empty world with a custom configuration
    pub fn with_config(config: SimConfig) -> Result<Self> {
        config.validate().context("Invalid simulation config")?;
        Ok(Self::new_internal(config))
    }

    /// Replace the terrain height source. Takes effect from the next pose update.
    pub fn set_terrain(&mut self, terrain: impl TerrainHeight + 'static) {
        self.terrain = Box::new(terrain);
    }

    /// Discard everything and rebuild routes, graph and all agent pools from new
    /// geographic data. The spawn counter restarts, so the same input replays the
    /// same world.
    pub fn load_network(
        &mut self,
        roads: &[RoadInput],
        waterways: &[WaterwayInput],
        observer: Position,
    ) {
        self.car_routes = build_car_routes(roads);
        self.boat_routes = build_boat_routes(waterways);
        self.ped_routes = build_ped_routes(roads);
        self.car_graph = build_route_graph(&self.car_routes);

        self.counter.reset();
        self.observer = observer;
        self.time = 0.0;
        self.stats = SimStats::default();

        debug!(
            "Loaded network: {} car routes, {} boat routes, {} pedestrian routes",
            self.car_routes.len(),
            self.boat_routes.len(),
            self.ped_routes.len()
        );
        debug!(
            "Route graph: {} links, {} dead ends, {} components",
            self.car_graph.link_count(),
            self.car_graph.dead_end_count(),
            self.car_graph.component_count()
        );
        if self.car_routes.is_empty() && !roads.is_empty() {
            warn!("None of the {} roads are drivable; no cars will spawn", roads.len());
        }

        self.cars = vec![SimCar::default(); self.config.max_cars];
        self.boats = vec![SimBoat::default(); self.config.max_boats];
        self.birds = vec![SimBird::default(); self.config.max_birds];
        self.pedestrians = vec![SimPedestrian::default(); self.config.max_pedestrians];
        self.top_up_cars();
        self.top_up_boats();
        self.top_up_birds();
        self.top_up_pedestrians();

        self.pigeon_groups = (0..self.config.pigeon_groups)
            .map(|_| {
                spawn_pigeon_group(
                    &self.ped_routes,
                    &mut self.counter,
                    observer,
                    &self.config,
                    &*self.terrain,
                )
            })
            .collect();
    }

    /// Main simulation tick
    pub fn tick(&mut self, delta_secs: f32, observer: Position) {
        self.time += delta_secs;
        self.stats.ticks += 1;
        self.observer = observer;

        self.update_cars(delta_secs);
        self.update_boats(delta_secs);
        self.update_birds(delta_secs);
        self.update_pedestrians(delta_secs);
        self.update_pigeons(delta_secs);
    }

    fn update_cars(&mut self, delta_secs: f32) {
        let terrain = &*self.terrain;
        let cull_sq = self.config.car_cull_radius * self.config.car_cull_radius;

        for car in &mut self.cars {
            match car.update(delta_secs, &self.car_routes, &self.car_graph, terrain) {
                CarUpdateResult::Transitioned(_) => self.stats.car_transitions += 1,
                CarUpdateResult::Despawn => self.stats.car_dead_ends += 1,
                CarUpdateResult::Continue => {}
            }
        }

        self.stats.cars_spacing_kills += enforce_following_distance(
            &mut self.cars,
            &self.car_routes,
            self.config.following_distance,
            terrain,
        );

        // Clamping moves cars, so cull on the final poses
        for car in self.cars.iter_mut().filter(|car| car.alive) {
            if Position::flat(car.x, car.z).distance_sq_xz(&self.observer) > cull_sq {
                car.alive = false;
            }
        }
        self.top_up_cars();
    }

    fn update_boats(&mut self, delta_secs: f32) {
        let cull_sq = self.config.boat_cull_radius * self.config.boat_cull_radius;
        for boat in &mut self.boats {
            boat.update(delta_secs, self.time, &self.boat_routes, &*self.terrain);
            if boat.alive && Position::flat(boat.x, boat.z).distance_sq_xz(&self.observer) > cull_sq
            {
                boat.alive = false;
            }
        }
        self.top_up_boats();
    }

    fn update_birds(&mut self, delta_secs: f32) {
        let cull_sq = self.config.bird_cull_radius * self.config.bird_cull_radius;
        for bird in &mut self.birds {
            bird.update(delta_secs);
            if bird.alive && bird.center.distance_sq_xz(&self.observer) > cull_sq {
                bird.alive = false;
            }
        }
        self.top_up_birds();
    }

    fn update_pedestrians(&mut self, delta_secs: f32) {
        let cull_sq = self.config.pedestrian_cull_radius * self.config.pedestrian_cull_radius;
        for pedestrian in &mut self.pedestrians {
            pedestrian.update(delta_secs, &self.ped_routes, &*self.terrain);
            if pedestrian.alive
                && Position::flat(pedestrian.x, pedestrian.z).distance_sq_xz(&self.observer)
                    > cull_sq
            {
                pedestrian.alive = false;
            }
        }
        self.top_up_pedestrians();
    }

    fn update_pigeons(&mut self, delta_secs: f32) {
        for group in &mut self.pigeon_groups {
            match group.state {
                FlockState::Gone => {
                    *group = spawn_pigeon_group(
                        &self.ped_routes,
                        &mut self.counter,
                        self.observer,
                        &self.config,
                        &*self.terrain,
                    );
                    self.stats.pigeon_respawns += 1;
                }
                FlockState::Pecking => {
                    group.update(delta_secs, self.observer, &mut self.counter, &self.config);
                    if group.state == FlockState::Scattering {
                        self.stats.pigeon_scatters += 1;
                    }
                }
                FlockState::Scattering => {
                    group.update(delta_secs, self.observer, &mut self.counter, &self.config);
                }
            }
        }
    }

    // Top-up passes only write into dead slots, so a pool never holds more live
    // agents than its length, which is the cap.

    fn top_up_cars(&mut self) {
        for slot in self.cars.iter_mut().filter(|car| !car.alive) {
            let spawned = spawn_car(
                &self.car_routes,
                &mut self.counter,
                self.observer,
                &self.config,
                &*self.terrain,
            );
            match spawned {
                Some(car) => {
                    *slot = car;
                    self.stats.cars_spawned += 1;
                }
                None => break,
            }
        }
    }

    fn top_up_boats(&mut self) {
        for slot in self.boats.iter_mut().filter(|boat| !boat.alive) {
            let spawned = spawn_boat(
                &self.boat_routes,
                &mut self.counter,
                self.observer,
                &self.config,
                &*self.terrain,
            );
            match spawned {
                Some(boat) => {
                    *slot = boat;
                    self.stats.boats_spawned += 1;
                }
                None => break,
            }
        }
    }

    fn top_up_birds(&mut self) {
        for slot in self.birds.iter_mut().filter(|bird| !bird.alive) {
            *slot = spawn_bird(
                &self.boat_routes,
                &mut self.counter,
                self.observer,
                &*self.terrain,
            );
            self.stats.birds_spawned += 1;
        }
    }

    fn top_up_pedestrians(&mut self) {
        for slot in self.pedestrians.iter_mut().filter(|p| !p.alive) {
            let spawned = spawn_pedestrian(
                &self.ped_routes,
                &mut self.counter,
                self.observer,
                &self.config,
                &*self.terrain,
            );
            match spawned {
                Some(pedestrian) => {
                    *slot = pedestrian;
                    self.stats.pedestrians_spawned += 1;
                }
                None => break,
            }
        }
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn observer(&self) -> Position {
        self.observer
    }

    pub fn car_routes(&self) -> &[RouteSegment] {
        &self.car_routes
    }

    pub fn boat_routes(&self) -> &[RouteSegment] {
        &self.boat_routes
    }

    pub fn ped_routes(&self) -> &[RouteSegment] {
        &self.ped_routes
    }

    pub fn car_graph(&self) -> &RouteGraph {
        &self.car_graph
    }

    /// All car slots, dead ones included. Indices are stable between ticks.
    pub fn cars(&self) -> &[SimCar] {
        &self.cars
    }

    pub fn boats(&self) -> &[SimBoat] {
        &self.boats
    }

    pub fn birds(&self) -> &[SimBird] {
        &self.birds
    }

    pub fn pedestrians(&self) -> &[SimPedestrian] {
        &self.pedestrians
    }

    pub fn pigeon_groups(&self) -> &[PigeonGroup] {
        &self.pigeon_groups
    }

    /// Steps claimed from the spawn counter since the last load
    pub fn spawn_steps(&self) -> u64 {
        self.counter.steps()
    }

    pub fn alive_cars(&self) -> usize {
        self.cars.iter().filter(|c| c.alive).count()
    }

    pub fn alive_boats(&self) -> usize {
        self.boats.iter().filter(|b| b.alive).count()
    }

    pub fn alive_birds(&self) -> usize {
        self.birds.iter().filter(|b| b.alive).count()
    }

    pub fn alive_pedestrians(&self) -> usize {
        self.pedestrians.iter().filter(|p| p.alive).count()
    }

    /// Print a summary of the world state
    pub fn print_summary(&self) {
        println!("=== Ambient Simulation Summary ===");
        println!("Time: {:.2}s", self.time);
        println!("Observer: ({:.1}, {:.1})", self.observer.x, self.observer.z);
        println!(
            "Routes: {} car, {} boat, {} pedestrian ({} graph links)",
            self.car_routes.len(),
            self.boat_routes.len(),
            self.ped_routes.len(),
            self.car_graph.link_count()
        );
        println!("Cars: {}/{}", self.alive_cars(), self.cars.len());
        println!("Boats: {}/{}", self.alive_boats(), self.boats.len());
        println!("Birds: {}/{}", self.alive_birds(), self.birds.len());
        println!(
            "Pedestrians: {}/{}",
            self.alive_pedestrians(),
            self.pedestrians.len()
        );

        println!("--- Pigeon groups ---");
        for (index, group) in self.pigeon_groups.iter().enumerate() {
            println!(
                "  Group {}: {:?} at ({:.1}, {:.1}), {} birds, timer {:.1}s",
                index,
                group.state,
                group.center.x,
                group.center.z,
                group.members.len(),
                group.timer
            );
        }
        println!();
    }

    /// Draw a visual map of the world in the terminal
    pub fn draw_map(&self) {
        let all_points = self
            .car_routes
            .iter()
            .chain(&self.boat_routes)
            .chain(&self.ped_routes)
            .flat_map(|route| route.points.iter());

        // Find bounds of the world
        let mut min_x = f32::INFINITY;
        let mut max_x = f32::NEG_INFINITY;
        let mut min_z = f32::INFINITY;
        let mut max_z = f32::NEG_INFINITY;
        for pos in all_points {
            min_x = min_x.min(pos.x);
            max_x = max_x.max(pos.x);
            min_z = min_z.min(pos.z);
            max_z = max_z.max(pos.z);
        }
        if !min_x.is_finite() || !min_z.is_finite() {
            println!("(empty map)");
            return;
        }

        // One character per 4 meters
        let scale = 0.25;
        let width = ((max_x - min_x) * scale) as usize + 1;
        let height = ((max_z - min_z) * scale) as usize + 1;
        let mut grid = vec![vec![' '; width]; height];

        let to_grid = |x: f32, z: f32| -> Option<(usize, usize)> {
            if x < min_x || x > max_x || z < min_z || z > max_z {
                return None;
            }
            let col = ((x - min_x) * scale) as usize;
            // Flip the Z-axis so +z points up
            let row = ((max_z - z) * scale) as usize;
            Some((row.min(height - 1), col.min(width - 1)))
        };

        let mut plot = |route: &RouteSegment, glyph: char| {
            let steps = (route.total_length / 2.0).ceil().max(1.0) as usize;
            for step in 0..=steps {
                let progress = route.total_length * step as f32 / steps as f32;
                let sample = sample_route(route, progress);
                if let Some((row, col)) = to_grid(sample.x, sample.z) {
                    if grid[row][col] == ' ' {
                        grid[row][col] = glyph;
                    }
                }
            }
        };
        for route in &self.boat_routes {
            plot(route, '~');
        }
        for route in &self.car_routes {
            plot(route, '#');
        }
        for route in &self.ped_routes {
            plot(route, '.');
        }

        let mut mark = |x: f32, z: f32, glyph: char| {
            if let Some((row, col)) = to_grid(x, z) {
                grid[row][col] = glyph;
            }
        };
        for pedestrian in self.pedestrians.iter().filter(|p| p.alive) {
            mark(pedestrian.x, pedestrian.z, 'p');
        }
        for boat in self.boats.iter().filter(|b| b.alive) {
            mark(boat.x, boat.z, 'B');
        }
        for car in self.cars.iter().filter(|c| c.alive) {
            mark(car.x, car.z, 'C');
        }
        for group in &self.pigeon_groups {
            mark(group.center.x, group.center.z, 'P');
        }
        mark(self.observer.x, self.observer.z, '@');

        println!("\n=== World Map ===");
        println!("Legend: #=Road, .=Footpath, ~=Water, C=Car, B=Boat, p=Pedestrian, P=Pigeons, @=Observer");
        println!();
        for row in &grid {
            let line: String = row.iter().collect();
            println!("{}", line);
        }
        println!();
    }
}
