//! # Generation Module
//!
//! Procedural generation of Burrow dungeons.
//!
//! Generation runs in a fixed order, and every random draw goes through a
//! [`RandomSource`] so the whole pipeline can be replayed:
//! 1. Carve a maze with randomized Kruskal ([`KruskalMazeGenerator`])
//! 2. Classify cells into caves and tunnels
//! 3. Drop pits, treasure and arrows into caves ([`ItemPlacer`])
//! 4. Pick the start and goal caves, then place monsters ([`EncounterPlacer`])

pub mod dungeon;
pub mod encounters;
pub mod items;
pub mod maze;

pub use dungeon::*;
pub use encounters::*;
pub use items::*;
pub use maze::*;

use crate::{config, BurrowError, BurrowResult, RandomSource};
use log::debug;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

fn default_spawn_attempts() -> usize {
    config::DEFAULT_SPAWN_ATTEMPTS
}

/// Construction parameters for a dungeon.
///
/// # Examples
///
/// ```
/// use burrow::GenerationConfig;
///
/// let config = GenerationConfig::new(6, 8);
/// assert!(config.validate().is_ok());
///
/// let mut bad = config.clone();
/// bad.treasure_coverage = 0.1;
/// assert!(bad.validate().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Number of grid rows
    pub rows: usize,
    /// Number of grid columns
    pub cols: usize,
    /// Whether passages may wrap from one edge of the grid to the opposite edge
    pub wrapping: bool,
    /// Extra passages carved beyond the spanning tree, each one closing a loop
    pub interconnectivity: usize,
    /// Fraction of caves stocked with treasure, and separately with arrows (0.2 to 1.0)
    pub treasure_coverage: f64,
    /// Monsters in the dungeon, including the one guarding the goal
    pub monsters: usize,
    /// Bottomless pits
    pub pits: usize,
    /// Start/goal samplings tried before giving up on the minimum path length
    #[serde(default = "default_spawn_attempts")]
    pub spawn_attempts: usize,
}

impl GenerationConfig {
    /// Creates a non-wrapping configuration with default populations.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            wrapping: false,
            interconnectivity: 0,
            treasure_coverage: 0.3,
            monsters: 4,
            pits: 3,
            spawn_attempts: config::DEFAULT_SPAWN_ATTEMPTS,
        }
    }

    /// Creates a configuration for tests: a small loopy maze that reliably yields a valid
    /// start and goal.
    pub fn for_testing() -> Self {
        Self {
            rows: 8,
            cols: 8,
            wrapping: false,
            interconnectivity: 2,
            treasure_coverage: 0.3,
            monsters: 2,
            pits: 1,
            spawn_attempts: 100,
        }
    }

    /// Total number of grid cells.
    pub fn cell_count(&self) -> usize {
        self.rows * self.cols
    }

    /// Checks the parameters that can be judged before any maze exists.
    ///
    /// Limits that depend on the carved maze, such as the number of caves, are checked
    /// during generation.
    pub fn validate(&self) -> BurrowResult<()> {
        if self.rows == 0 || self.cols == 0 {
            return Err(BurrowError::InvalidConfig(format!(
                "grid must have at least one row and one column, got {}x{}",
                self.rows, self.cols
            )));
        }

        let coverage = config::MIN_TREASURE_COVERAGE..=config::MAX_TREASURE_COVERAGE;
        if !coverage.contains(&self.treasure_coverage) {
            return Err(BurrowError::InvalidConfig(format!(
                "treasure coverage must be between {} and {}, got {}",
                config::MIN_TREASURE_COVERAGE,
                config::MAX_TREASURE_COVERAGE,
                self.treasure_coverage
            )));
        }

        if self.monsters == 0 {
            return Err(BurrowError::InvalidConfig(
                "at least one monster is required to guard the goal".to_string(),
            ));
        }

        if self.pits >= self.cell_count() {
            return Err(BurrowError::InvalidConfig(format!(
                "{} pits do not fit in {} cells",
                self.pits,
                self.cell_count()
            )));
        }

        let spare = candidate_edge_count(self.rows, self.cols, self.wrapping)
            .saturating_sub(self.cell_count() - 1);
        if self.interconnectivity > spare {
            return Err(BurrowError::InvalidConfig(format!(
                "interconnectivity {} exceeds the {} passages left after carving",
                self.interconnectivity, spare
            )));
        }

        if self.spawn_attempts == 0 {
            return Err(BurrowError::InvalidConfig(
                "spawn attempts must be at least 1".to_string(),
            ));
        }

        Ok(())
    }

    /// Parses a configuration from JSON.
    pub fn from_json(json: &str) -> BurrowResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config)
    }

    /// Loads a configuration from a JSON file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> BurrowResult<Self> {
        let path = path.as_ref();
        debug!("Loading generation config from {}", path.display());
        let contents = fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Serializes the configuration as pretty-printed JSON.
    pub fn to_json(&self) -> BurrowResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self::new(6, 8)
    }
}

/// Trait for procedural generators.
///
/// Every stage that builds something from scratch implements this trait, so stages can be
/// run, checked and logged the same way.
pub trait Generator<T> {
    /// Generates content from the configuration, drawing randomness from `rng`.
    fn generate(&self, config: &GenerationConfig, rng: &mut dyn RandomSource) -> BurrowResult<T>;

    /// Validates that generated content meets the structural requirements.
    fn validate(&self, content: &T, config: &GenerationConfig) -> BurrowResult<()>;

    /// Gets the generator type name for logging and debugging.
    fn generator_type(&self) -> &'static str;
}
