//! # Dungeon Generation
//!
//! Runs the full generation pipeline: carve, classify, stock, spawn, populate.
//!
//! The order of stages is fixed because scripted random sources replay values in call
//! order: maze carving, pits, treasure, arrows, start and goal selection, then monsters.

use crate::{
    config, path_length, BurrowError, BurrowResult, EncounterPlacer, GenerationConfig,
    Generator, Grid, ItemPlacer, KruskalMazeGenerator, MazeLayout, Player, Position,
    RandomSource,
};
use log::{debug, info};

/// A freshly generated dungeon, ready to be played.
#[derive(Debug, Clone, PartialEq)]
pub struct Dungeon {
    pub grid: Grid,
    pub player: Player,
    /// Passages carved into the maze
    pub edge_count: usize,
}

/// Full dungeon generator.
///
/// # Examples
///
/// ```
/// use burrow::{DungeonGenerator, GenerationConfig, Generator, SeededRandom};
///
/// let config = GenerationConfig::for_testing();
/// let generator = DungeonGenerator::new();
/// let dungeon = generator.generate(&config, &mut SeededRandom::new(11)).unwrap();
/// assert!(generator.validate(&dungeon, &config).is_ok());
/// ```
#[derive(Debug, Clone, Default)]
pub struct DungeonGenerator {
    pub maze: KruskalMazeGenerator,
    pub items: ItemPlacer,
    pub encounters: EncounterPlacer,
}

impl DungeonGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks that the carved maze has room for the requested hazards and monsters.
    ///
    /// The start and the goal each need a pit-free cave, and every monster besides the
    /// goal's needs a cave other than the start.
    fn check_capacity(&self, grid: &Grid, config: &GenerationConfig) -> BurrowResult<()> {
        let caves = grid.cave_count();
        if config.pits + 2 > caves {
            return Err(BurrowError::PlacementImpossible(format!(
                "{} pits leave fewer than two free caves out of {}",
                config.pits, caves
            )));
        }
        if config.monsters > caves - 1 {
            return Err(BurrowError::PlacementImpossible(format!(
                "{} monsters need more than the {} caves besides the start",
                config.monsters,
                caves - 1
            )));
        }
        Ok(())
    }

    /// Draws start and goal pairs until one is far enough apart.
    fn spawn(
        &self,
        grid: &Grid,
        config: &GenerationConfig,
        rng: &mut dyn RandomSource,
    ) -> BurrowResult<(Position, Position)> {
        let mut shortest = 0;
        for attempt in 1..=config.spawn_attempts {
            let (start, goal) = self.encounters.select_spawn(grid, rng)?;
            let length = path_length(grid, start, goal)?.ok_or_else(|| {
                BurrowError::InvalidState(format!("goal {} is cut off from {}", goal, start))
            })?;
            if length >= config::MIN_PATH_LENGTH {
                return Ok((start, goal));
            }
            debug!(
                "Spawn attempt {}: goal {} only {} moves from {}",
                attempt, goal, length, start
            );
            shortest = length;
        }

        Err(BurrowError::UnreachableGoal {
            length: shortest,
            required: config::MIN_PATH_LENGTH,
        })
    }
}

impl Generator<Dungeon> for DungeonGenerator {
    fn generate(&self, config: &GenerationConfig, rng: &mut dyn RandomSource) -> BurrowResult<Dungeon> {
        let layout = self.maze.generate(config, rng)?;
        let mut grid = layout.grid;
        self.check_capacity(&grid, config)?;

        self.items.place_pits(&mut grid, config.pits, rng)?;
        self.items
            .place_treasure(&mut grid, config.treasure_coverage, rng)?;
        self.items
            .place_arrows(&mut grid, config.treasure_coverage, rng)?;

        let (start, goal) = self.spawn(&grid, config, rng)?;
        self.encounters
            .place_monsters(&mut grid, start, goal, config.monsters, rng)?;

        if let Some(cell) = grid.get_mut(start) {
            cell.set_start(true);
            cell.set_has_player(true);
        }
        if let Some(cell) = grid.get_mut(goal) {
            cell.set_goal(true);
        }

        info!(
            "Generated {}x{} dungeon: {} passages, {} caves, start {} goal {}",
            config.rows,
            config.cols,
            layout.edge_count,
            grid.cave_count(),
            start,
            goal
        );

        Ok(Dungeon {
            grid,
            player: Player::new(start, goal),
            edge_count: layout.edge_count,
        })
    }

    fn validate(&self, dungeon: &Dungeon, config: &GenerationConfig) -> BurrowResult<()> {
        let grid = &dungeon.grid;

        if let Some(cell) = grid.cells().find(|cell| {
            cell.is_tunnel()
                && (cell.is_pit()
                    || cell.arrows() > 0
                    || !cell.treasure().is_empty()
                    || cell.monster().is_some())
        }) {
            return Err(BurrowError::InvalidState(format!(
                "tunnel {} holds an item, hazard or monster",
                cell.position()
            )));
        }

        let goal = dungeon.player.goal();
        let guarded = grid
            .get(goal)
            .and_then(|cell| cell.living_monster())
            .is_some_and(|monster| monster.lives() == config::MONSTER_STARTING_LIVES);
        if !guarded {
            return Err(BurrowError::InvalidState(format!(
                "goal {} is not guarded by a healthy monster",
                goal
            )));
        }

        let start = dungeon.player.start();
        if grid.get(start).and_then(|cell| cell.monster()).is_some() {
            return Err(BurrowError::InvalidState(format!(
                "start {} holds a monster",
                start
            )));
        }

        let monsters = grid.cells().filter(|cell| cell.monster().is_some()).count();
        if monsters != config.monsters {
            return Err(BurrowError::InvalidState(format!(
                "{} monsters placed, {} requested",
                monsters, config.monsters
            )));
        }

        let length = path_length(grid, start, goal)?.unwrap_or(0);
        if length < config::MIN_PATH_LENGTH {
            return Err(BurrowError::UnreachableGoal {
                length,
                required: config::MIN_PATH_LENGTH,
            });
        }

        self.maze.validate(
            &MazeLayout {
                grid: grid.clone(),
                edge_count: dungeon.edge_count,
                unused_edges: 0,
            },
            config,
        )
    }

    fn generator_type(&self) -> &'static str {
        "DungeonGenerator"
    }
}
