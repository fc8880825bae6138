//! # Burrow Main Entry Point
//!
//! Generates a dungeon from command line parameters, optionally replays a list of actions
//! against it, and prints the resulting world as JSON.

use burrow::{
    Action, BurrowError, BurrowResult, GameState, GenerationConfig, RandomSource, SeededRandom,
};
use clap::Parser;
use log::{error, info, LevelFilter};
use std::path::PathBuf;

/// Command line arguments for the Burrow dungeon engine.
#[derive(Parser, Debug)]
#[command(name = "burrow")]
#[command(about = "A grid maze dungeon of caves, tunnels, pits and monsters")]
#[command(version)]
struct Args {
    /// Number of grid rows
    #[arg(long, default_value_t = 6)]
    rows: usize,

    /// Number of grid columns
    #[arg(long, default_value_t = 8)]
    cols: usize,

    /// Let passages wrap around the grid edges
    #[arg(long)]
    wrap: bool,

    /// Extra passages carved beyond the spanning tree
    #[arg(short, long, default_value_t = 0)]
    interconnectivity: usize,

    /// Fraction of caves stocked with treasure and with arrows
    #[arg(long, default_value_t = 0.3)]
    coverage: f64,

    /// Monsters, including the one guarding the goal
    #[arg(short, long, default_value_t = 4)]
    monsters: usize,

    /// Bottomless pits
    #[arg(short, long, default_value_t = 3)]
    pits: usize,

    /// Start/goal samplings tried before giving up on the minimum path length
    #[arg(long, default_value_t = 100)]
    spawn_attempts: usize,

    /// Random seed for dungeon generation
    #[arg(short, long)]
    seed: Option<u64>,

    /// JSON configuration file, overriding the size and population flags
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// JSON file holding a list of actions to apply after generation
    #[arg(short, long)]
    actions: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl Args {
    fn generation_config(&self) -> BurrowResult<GenerationConfig> {
        if let Some(path) = &self.config {
            info!("Loading configuration from {}", path.display());
            return GenerationConfig::load_from_file(path);
        }
        Ok(GenerationConfig {
            rows: self.rows,
            cols: self.cols,
            wrapping: self.wrap,
            interconnectivity: self.interconnectivity,
            treasure_coverage: self.coverage,
            monsters: self.monsters,
            pits: self.pits,
            spawn_attempts: self.spawn_attempts,
        })
    }

    fn random_source(&self) -> Box<dyn RandomSource> {
        match self.seed {
            Some(seed) => Box::new(SeededRandom::new(seed)),
            None => Box::new(SeededRandom::from_entropy()),
        }
    }
}

fn main() {
    let args = Args::parse();
    initialize_logging(&args.log_level);

    if let Err(e) = run(&args) {
        error!("{}", e);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> BurrowResult<()> {
    info!("Starting Burrow v{}", burrow::VERSION);

    let config = args.generation_config()?;
    let mut game = GameState::new(config, args.random_source())?;

    if let Some(path) = &args.actions {
        let actions: Vec<Action> = serde_json::from_str(&std::fs::read_to_string(path)?)?;
        info!("Applying {} actions from {}", actions.len(), path.display());
        for action in actions {
            if game.is_game_over() {
                return Err(BurrowError::InvalidState(format!(
                    "game ended before {:?} could be applied",
                    action
                )));
            }
            let result = game.execute(action);
            info!("{:?} -> {:?}", action, result);
        }
        for event in game.drain_events() {
            info!("{:?}", event);
        }
    }

    println!("{}", serde_json::to_string_pretty(&game.view())?);
    Ok(())
}

fn initialize_logging(log_level: &str) {
    let level = match log_level.to_lowercase().as_str() {
        "error" => LevelFilter::Error,
        "warn" => LevelFilter::Warn,
        "info" => LevelFilter::Info,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        _ => LevelFilter::Info,
    };

    env_logger::Builder::new()
        .filter_level(level)
        .format_target(false)
        .init();
}
