use anyhow::Result;
use clap::Parser;
use log::info;

use ambient_traffic::simulation::{demo_roads, demo_waterways, Position, SimConfig, SimWorld};

#[derive(Parser)]
#[command(name = "ambient_traffic")]
#[command(about = "Headless ambient traffic and crowd simulation over a demo town")]
struct Cli {
    /// Number of simulation ticks to run
    #[arg(long, default_value = "600")]
    ticks: u32,

    /// Time delta per tick in seconds
    #[arg(long, default_value = "0.1")]
    delta: f32,

    /// Car population cap
    #[arg(long, default_value = "60")]
    cars: usize,

    /// Pedestrian population cap
    #[arg(long, default_value = "40")]
    pedestrians: usize,

    /// Pigeon groups kept alive
    #[arg(long, default_value = "4")]
    pigeon_groups: usize,

    /// Radius of the observer's walking circle in meters (0 = stand still)
    #[arg(long, default_value = "30")]
    walk_radius: f32,

    /// Print the ASCII map after every simulated second
    #[arg(long)]
    map: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config = SimConfig {
        max_cars: cli.cars,
        max_pedestrians: cli.pedestrians,
        pigeon_groups: cli.pigeon_groups,
        ..SimConfig::default()
    };
    let mut world = SimWorld::with_config(config)?;
    world.set_terrain(|x: f32, z: f32| ((x * 0.01).sin() + (z * 0.013).cos()) * 2.0);

    let start = observer_at(cli.walk_radius, 0.0);
    world.load_network(&demo_roads(), &demo_waterways(), start);

    info!("Running ambient simulation in headless mode...");
    info!("Ticks: {}, Delta: {}s", cli.ticks, cli.delta);

    println!("Initial state:");
    world.print_summary();
    if cli.map {
        world.draw_map();
    }

    // Calculate how many ticks equal 1 second of simulation time
    let ticks_per_second = (1.0 / cli.delta).ceil().max(1.0) as u32;

    let mut tick = 0;
    while tick < cli.ticks {
        let ticks_to_run = ticks_per_second.min(cli.ticks - tick);
        for _ in 0..ticks_to_run {
            tick += 1;
            let observer = observer_at(cli.walk_radius, tick as f32 * cli.delta);
            world.tick(cli.delta, observer);
        }

        println!(
            "--- After tick {} ({:.1}s simulated time) ---",
            tick,
            tick as f32 * cli.delta
        );
        world.print_summary();
        if cli.map {
            world.draw_map();
        }
    }

    let stats = &world.stats;
    info!("SIMULATION COMPLETE");
    info!("Total cars spawned: {}", stats.cars_spawned);
    info!("Car route transitions: {}", stats.car_transitions);
    info!("Car dead ends: {}", stats.car_dead_ends);
    info!("Cars removed by spacing: {}", stats.cars_spacing_kills);
    info!("Pedestrians spawned: {}", stats.pedestrians_spawned);
    info!("Pigeon scatters: {}", stats.pigeon_scatters);
    info!("Pigeon respawns: {}", stats.pigeon_respawns);
    info!("Active cars: {}", world.alive_cars());
    Ok(())
}

/// The observer strolls around the town center at 1.2 m/s
fn observer_at(radius: f32, time: f32) -> Position {
    if radius <= 0.0 {
        return Position::default();
    }
    let angle = time * 1.2 / radius;
    Position::flat(angle.cos() * radius, angle.sin() * radius)
}
