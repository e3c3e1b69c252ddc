use astar_maze::algorithm::{AStar, ClosePolicy, SearchOutcome, SearchStatus};
use astar_maze::common::Coordinate;
use astar_maze::config::{Cli, Config};
use astar_maze::heuristic::HeuristicKind;
use astar_maze::map::{resolve_endpoints, Grid};
use astar_maze::playback::Playback;

use anyhow::Context;
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Serialize)]
struct Report<'a> {
    start: Coordinate,
    goal: Coordinate,
    heuristic: HeuristicKind,
    close_policy: ClosePolicy,
    outcome: &'a SearchOutcome,
}

/// Load or create the grid, settle the endpoints, then scatter obstacles.
fn build_grid(config: &Config) -> anyhow::Result<(Grid, Coordinate, Coordinate)> {
    let mut grid = if let Some(map_path) = config.map_path.as_ref() {
        Grid::from_file(map_path).with_context(|| format!("error with map file: {map_path}"))?
    } else {
        info!(
            "No map file specified, using a {}x{} empty grid",
            config.width, config.height
        );
        Grid::new(config.width, config.height)
    };

    let (start, goal) = resolve_endpoints(&mut grid, config.start, config.goal)?;

    if let Some(density) = config.obstacle_density {
        let mut rng = StdRng::seed_from_u64(config.seed);
        let blocked = grid.scatter_blocked(density, &mut rng);
        info!("Scattered {blocked} blocked cell(s) with seed {}", config.seed);
    }

    Ok((grid, start, goal))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = if let Some(config_file) = cli.config.as_ref() {
        let config_str = std::fs::read_to_string(config_file)
            .with_context(|| format!("cannot read config file: {config_file}"))?;
        Config::from_yaml_str(&config_str)
            .with_context(|| format!("error with config file: {config_file}"))?
    } else {
        Config::default()
    }
    .override_from_command_line(&cli)?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
    if cli.config.is_none() {
        info!("No config file specified, using default config");
    }

    let (mut grid, start, goal) = build_grid(&config)?;

    info!("RUNNING A*");
    info!("Goal position:   {goal}");
    info!("Start position:  {start}");
    info!("Using heuristic: {}", config.heuristic);

    let outcome = {
        let mut engine = AStar::new(&grid, start, goal, config.heuristic, config.close_policy)?;
        loop {
            match engine.run(config.slice_budget)? {
                SearchStatus::Running => debug!("slice finished, search continues"),
                SearchStatus::Done(outcome) => break outcome,
            }
        }
    };
    outcome.stats().print();

    match &outcome {
        SearchOutcome::Found { path, .. } => {
            let steps: Vec<String> = path.iter().map(ToString::to_string).collect();
            info!("Path ({} step(s)): {}", path.len(), steps.join(" -> "));
        }
        SearchOutcome::NoPath { .. } => info!("Failed to solve maze."),
    }

    if let Some(output_path) = config.output_path.as_ref() {
        let report = Report {
            start,
            goal,
            heuristic: config.heuristic,
            close_policy: config.close_policy,
            outcome: &outcome,
        };
        let json = serde_json::to_string_pretty(&report)?;
        std::fs::write(output_path, json)
            .with_context(|| format!("cannot write report: {output_path}"))?;
        info!("Report written to {output_path}");
    }

    if config.playback {
        if let Some(path) = outcome.path() {
            let mut playback = Playback::new(path.to_vec());
            println!("{grid}\n");
            while playback.tick(&mut grid).is_some() {
                println!("{grid}\n");
            }
        }
    }

    Ok(())
}
