//! # Burrow
//!
//! A grid maze dungeon engine: procedurally carved caves and tunnels, scattered treasure and
//! arrows, bottomless pits, and monsters that guard the way out.
//!
//! ## Architecture Overview
//!
//! - **Generation**: randomized-Kruskal maze carving over an R×C grid with optional edge
//!   wrapping, followed by item, pit, spawn and monster placement
//! - **Game State**: the single owner of the grid and the player, exposing move, pickup and
//!   shoot commands that report explicit outcomes
//! - **Random Sources**: every random draw goes through [`RandomSource`], so the whole
//!   pipeline can be replayed with scripted values
//!
//! Presentation layers read the world through [`GameState::view`] and drive it through
//! [`GameState::execute`] or the individual command methods.

pub mod game;
pub mod generation;
pub mod utils;

pub use game::*;
pub use generation::*;
pub use utils::*;

pub use game::{
    Action, ActionResult, CellKind, CellView, DeathCause, Direction, DungeonBuilder,
    GameCompletionState, GameEvent, GameState, GameStatistics, Grid, ItemKind, Location,
    Monster, MoveOutcome, PickupOutcome, Player, PlayerSnapshot, Position, ShotOutcome, Smell,
    Treasure, WorldView,
};

pub use generation::{GenerationConfig, Generator, KruskalMazeGenerator, MazeLayout};

pub use utils::{PlacementKind, RandomSource, ScriptedRandom, SeededRandom};

/// Core error type for the Burrow engine.
#[derive(thiserror::Error, Debug)]
pub enum BurrowError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Construction parameters are invalid
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The requested hazards or monsters cannot fit into the generated caves
    #[error("Placement impossible: {0}")]
    PlacementImpossible(String),

    /// Start and goal are too close together
    #[error("Goal is {length} moves from the start, at least {required} are required")]
    UnreachableGoal { length: usize, required: usize },

    /// Game state is invalid
    #[error("Invalid game state: {0}")]
    InvalidState(String),
}

/// Result type used throughout the Burrow codebase.
pub type BurrowResult<T> = Result<T, BurrowError>;

/// Version information for the engine.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Game rule constants.
pub mod config {
    /// Arrows the player carries when entering the dungeon
    pub const PLAYER_STARTING_ARROWS: usize = 3;

    /// Lives of a freshly placed monster
    pub const MONSTER_STARTING_LIVES: u8 = 2;

    /// Minimum number of moves between start and goal
    pub const MIN_PATH_LENGTH: usize = 5;

    /// Exclusive upper bound of the escape roll against a wounded monster
    pub const ESCAPE_ROLL_BOUND: usize = 100;

    /// Escape rolls at or above this value survive a wounded monster
    pub const ESCAPE_THRESHOLD: usize = 50;

    /// Lowest accepted treasure coverage fraction
    pub const MIN_TREASURE_COVERAGE: f64 = 0.2;

    /// Highest accepted treasure coverage fraction
    pub const MAX_TREASURE_COVERAGE: f64 = 1.0;

    /// Random draws allowed per grid cell before a placement loop gives up
    pub const PLACEMENT_ATTEMPTS_PER_CELL: usize = 1_000;

    /// Start/goal samplings tried before the minimum path check is reported as failed
    pub const DEFAULT_SPAWN_ATTEMPTS: usize = 1;
}
