//! # Game State Module
//!
//! Central game state management and the rules of play.
//!
//! [`GameState`] owns the dungeon grid, the player and the random source. Controllers
//! mutate it only through the move, pickup and shoot commands, each of which reports its
//! outcome as plain data, and read it through [`GameState::view`].

use crate::{
    optimal_paths, resolve_encounter, resolve_shot, scan_for_monsters, Action, ActionResult,
    BurrowError, BurrowResult, CellView, Direction, Dungeon, DungeonGenerator, Encounter,
    GameEvent, GenerationConfig, Generator, Grid, ItemKind, MoveOutcome, PickupOutcome,
    Player, PlayerSnapshot, Position, RandomSource, ShotOutcome, Smell,
};
use crate::{config, MonsterProximity};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fmt;

/// What killed the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeathCause {
    Pit,
    Monster,
}

impl fmt::Display for DeathCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeathCause::Pit => f.write_str("fell into a bottomless pit"),
            DeathCause::Monster => f.write_str("was eaten by a monster"),
        }
    }
}

/// Game completion state for handling endings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameCompletionState {
    /// Game is still in progress
    Playing,
    /// Player reached the goal alive
    Escaped,
    /// Player died
    Died(DeathCause),
}

/// Game statistics tracking player progress.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameStatistics {
    /// Passages walked through
    pub moves_made: u32,
    /// Arrows that left the quiver
    pub arrows_fired: u32,
    /// Arrows that struck a living monster
    pub monsters_hit: u32,
    /// Monsters killed
    pub monsters_killed: u32,
    /// Wounded monsters the player got away from
    pub monsters_escaped: u32,
    /// Treasure units collected
    pub treasure_collected: u32,
    /// Arrows picked up from caves
    pub arrows_collected: u32,
}

impl GameStatistics {
    /// Creates new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Updates statistics based on a game event.
    pub fn update_from_event(&mut self, event: &GameEvent) {
        match event {
            GameEvent::PlayerMoved { .. } => {
                self.moves_made += 1;
            }
            GameEvent::ArrowFired { .. } => {
                self.arrows_fired += 1;
            }
            GameEvent::MonsterHit { .. } => {
                self.monsters_hit += 1;
            }
            GameEvent::MonsterKilled { .. } => {
                self.monsters_hit += 1;
                self.monsters_killed += 1;
            }
            GameEvent::EscapedMonster { .. } => {
                self.monsters_escaped += 1;
            }
            GameEvent::TreasureCollected { treasure, .. } => {
                self.treasure_collected += treasure.len() as u32;
            }
            GameEvent::ArrowsCollected { count, .. } => {
                self.arrows_collected += *count as u32;
            }
            _ => {}
        }
    }
}

/// Read-only snapshot of the whole world for presentation layers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldView {
    pub rows: usize,
    pub cols: usize,
    pub wrapping: bool,
    pub interconnectivity: usize,
    pub treasure_coverage: f64,
    pub monsters: usize,
    pub pits: usize,
    pub edge_count: usize,
    /// Cells in row-major order
    pub cells: Vec<CellView>,
    pub player: PlayerSnapshot,
    pub game_over: bool,
    pub completion: GameCompletionState,
    /// Monster smell where the player stands
    pub smell: Smell,
}

impl WorldView {
    /// Gets the cell view at a position.
    pub fn cell(&self, position: Position) -> Option<&CellView> {
        if position.row < self.rows && position.col < self.cols {
            self.cells.get(position.row * self.cols + position.col)
        } else {
            None
        }
    }
}

/// The dungeon as it was right after generation, kept for restarts.
#[derive(Debug, Clone)]
struct Snapshot {
    grid: Grid,
    player: Player,
}

/// Central game state: the dungeon, the player and the rules that connect them.
///
/// # Examples
///
/// ```
/// use burrow::{Direction, GameState, GenerationConfig, SeededRandom};
///
/// let mut game = GameState::new(GenerationConfig::for_testing(), Box::new(SeededRandom::new(5)))
///     .unwrap();
/// assert!(!game.is_game_over());
/// assert_eq!(game.player().arrows(), 3);
///
/// let directions = game.grid().get(game.player().position()).unwrap().open_directions();
/// let outcome = game.move_player(directions[0]);
/// assert!(outcome.succeeded || outcome.died());
/// ```
#[derive(Debug)]
pub struct GameState {
    config: GenerationConfig,
    grid: Grid,
    player: Player,
    edge_count: usize,
    completion_state: GameCompletionState,
    statistics: GameStatistics,
    events: Vec<GameEvent>,
    initial: Snapshot,
    rng: Box<dyn RandomSource>,
}

impl GameState {
    /// Generates a dungeon and places the player at its start.
    ///
    /// Fails without building anything if the configuration is invalid, if the maze cannot
    /// hold the requested pits and monsters, or if no start and goal at least
    /// [`config::MIN_PATH_LENGTH`] moves apart were found.
    pub fn new(config: GenerationConfig, mut rng: Box<dyn RandomSource>) -> BurrowResult<Self> {
        let dungeon = DungeonGenerator::new().generate(&config, rng.as_mut())?;
        Ok(Self::from_dungeon(config, dungeon, rng))
    }

    /// Starts a [`DungeonBuilder`].
    pub fn builder() -> DungeonBuilder {
        DungeonBuilder::new()
    }

    fn from_dungeon(
        config: GenerationConfig,
        dungeon: Dungeon,
        rng: Box<dyn RandomSource>,
    ) -> Self {
        let Dungeon {
            grid,
            player,
            edge_count,
        } = dungeon;
        Self {
            config,
            initial: Snapshot {
                grid: grid.clone(),
                player: player.clone(),
            },
            grid,
            player,
            edge_count,
            completion_state: GameCompletionState::Playing,
            statistics: GameStatistics::new(),
            events: Vec::new(),
            rng,
        }
    }

    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    /// Passages carved into the maze.
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    pub fn statistics(&self) -> &GameStatistics {
        &self.statistics
    }

    /// Gets the current completion state.
    pub fn completion_state(&self) -> GameCompletionState {
        self.completion_state
    }

    /// Checks if the game has ended, by escape or by death.
    pub fn is_game_over(&self) -> bool {
        self.completion_state != GameCompletionState::Playing
    }

    /// Moves the player through the passage leading `direction`.
    ///
    /// Entering a pit kills the player before any monster is considered. Entering a cave
    /// with a healthy monster kills the player; a wounded monster costs an escape roll.
    /// Reaching the goal alive ends the game as an escape.
    pub fn move_player(&mut self, direction: Direction) -> MoveOutcome {
        let mut outcome = MoveOutcome::default();
        if self.is_game_over() {
            debug!("Ignoring move {}: the game is over", direction);
            return outcome;
        }

        let from = self.player.position();
        let Some(to) = self.grid.neighbor(from, direction) else {
            debug!("No passage {} of {}", direction, from);
            return outcome;
        };

        if let Some(cell) = self.grid.get_mut(from) {
            cell.set_has_player(false);
        }
        if let Some(cell) = self.grid.get_mut(to) {
            cell.set_has_player(true);
        }
        self.player.set_position(to);
        self.record(GameEvent::PlayerMoved { from, to });

        let Some(cell) = self.grid.get(to) else {
            return outcome;
        };

        if cell.is_pit() {
            self.kill_player(DeathCause::Pit);
            outcome.died_in_pit = true;
            return outcome;
        }

        match resolve_encounter(cell.monster(), self.rng.as_mut()) {
            Encounter::Eaten => {
                self.kill_player(DeathCause::Monster);
                outcome.died_to_monster = true;
                return outcome;
            }
            Encounter::Escaped { roll } => {
                info!("Escaped the wounded monster at {} (rolled {})", to, roll);
                self.record(GameEvent::EscapedMonster { position: to, roll });
            }
            Encounter::NoMonster => {}
        }

        outcome.succeeded = true;
        if to == self.player.goal() {
            info!("Player reached the goal at {}", to);
            self.completion_state = GameCompletionState::Escaped;
            self.record(GameEvent::ReachedGoal { position: to });
            outcome.reached_goal = true;
        }
        outcome
    }

    fn kill_player(&mut self, cause: DeathCause) {
        let position = self.player.position();
        info!("Player {} at {}", cause, position);
        self.player.kill();
        self.completion_state = GameCompletionState::Died(cause);
        self.record(GameEvent::PlayerDied { position, cause });
    }

    /// Picks up everything of one kind lying in the player's cell.
    pub fn pickup(&mut self, item: ItemKind) -> PickupOutcome {
        let mut outcome = PickupOutcome::default();
        if self.is_game_over() {
            return outcome;
        }

        let position = self.player.position();
        let Some(cell) = self.grid.get_mut(position) else {
            return outcome;
        };

        match item {
            ItemKind::Treasure if !cell.treasure().is_empty() => {
                let treasure = cell.take_treasure();
                self.player.add_treasure(treasure.clone());
                outcome.collected = true;
                outcome.treasure = treasure.clone();
                self.record(GameEvent::TreasureCollected { position, treasure });
            }
            ItemKind::Arrows if cell.arrows() > 0 => {
                let count = cell.take_arrows();
                self.player.add_arrows(count);
                outcome.collected = true;
                outcome.arrows = count;
                self.record(GameEvent::ArrowsCollected { position, count });
            }
            _ => {
                debug!("Nothing to pick up at {}", position);
            }
        }
        outcome
    }

    /// Shoots an arrow `distance` caves away in `direction`.
    ///
    /// Costs one arrow whatever the result. With an empty quiver nothing happens.
    pub fn shoot(&mut self, direction: Direction, distance: usize) -> ShotOutcome {
        let mut outcome = ShotOutcome::default();
        if self.is_game_over() || !self.player.take_arrow() {
            debug!("Cannot shoot: no arrows or the game is over");
            return outcome;
        }
        outcome.arrow_spent = true;

        let from = self.player.position();
        self.record(GameEvent::ArrowFired {
            from,
            direction,
            distance,
        });

        let Ok(origin) = self.grid.index_of(from) else {
            return outcome;
        };
        let impact = resolve_shot(&mut self.grid, origin, direction, distance);
        outcome.hit = impact.hit;
        outcome.killed = impact.killed;

        if let Some(position) = impact.landed.filter(|_| impact.hit) {
            if impact.killed {
                self.record(GameEvent::MonsterKilled { position });
            } else {
                let lives_left = self
                    .grid
                    .get(position)
                    .and_then(|cell| cell.monster())
                    .map_or(0, |monster| monster.lives());
                self.record(GameEvent::MonsterHit {
                    position,
                    lives_left,
                });
            }
        }
        outcome
    }

    /// Monster smell where the player stands.
    pub fn smell(&self) -> Smell {
        self.smell_at(self.player.position()).unwrap_or(Smell::None)
    }

    /// Monster smell at any cell.
    pub fn smell_at(&self, position: Position) -> BurrowResult<Smell> {
        Ok(Smell::from_proximity(self.proximity_at(position)?))
    }

    /// Living monsters one and two moves away from a cell.
    pub fn proximity_at(&self, position: Position) -> BurrowResult<MonsterProximity> {
        let index = self.grid.index_of(position)?;
        Ok(scan_for_monsters(&self.grid, index))
    }

    /// Finds a shortest path from the player's cell to the goal, both ends included.
    ///
    /// Fails with [`BurrowError::UnreachableGoal`] when that path is shorter than
    /// [`config::MIN_PATH_LENGTH`] moves.
    pub fn search_for_optimal_paths(&self) -> BurrowResult<Vec<Position>> {
        let goal = self.player.goal();
        let mut paths = optimal_paths(&self.grid, self.player.position())?;
        let path = paths.remove(&goal).ok_or_else(|| {
            BurrowError::InvalidState(format!("goal {} cannot be reached", goal))
        })?;

        let length = path.len().saturating_sub(1);
        if length < config::MIN_PATH_LENGTH {
            return Err(BurrowError::UnreachableGoal {
                length,
                required: config::MIN_PATH_LENGTH,
            });
        }
        Ok(path)
    }

    /// Builds a read-only snapshot of the world.
    pub fn view(&self) -> WorldView {
        WorldView {
            rows: self.grid.rows(),
            cols: self.grid.cols(),
            wrapping: self.config.wrapping,
            interconnectivity: self.config.interconnectivity,
            treasure_coverage: self.config.treasure_coverage,
            monsters: self.config.monsters,
            pits: self.config.pits,
            edge_count: self.edge_count,
            cells: self.grid.views(),
            player: self.player.snapshot(),
            game_over: self.is_game_over(),
            completion: self.completion_state,
            smell: self.smell(),
        }
    }

    /// Applies an action and reports its outcome.
    pub fn execute(&mut self, action: Action) -> ActionResult {
        match action {
            Action::Move { direction } => ActionResult::Moved(self.move_player(direction)),
            Action::Pickup { item } => ActionResult::PickedUp(self.pickup(item)),
            Action::Shoot {
                direction,
                distance,
            } => ActionResult::Shot(self.shoot(direction, distance)),
        }
    }

    /// Takes every event recorded since the last drain.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Puts the dungeon back the way it was generated, with the player at the start.
    pub fn restart(&mut self) {
        info!("Restarting the current dungeon");
        self.grid = self.initial.grid.clone();
        self.player = self.initial.player.clone();
        self.completion_state = GameCompletionState::Playing;
        self.statistics = GameStatistics::new();
        self.events.clear();
    }

    /// Generates a brand-new dungeon from the same configuration and random source.
    ///
    /// On failure the current game is left untouched.
    pub fn regenerate(&mut self) -> BurrowResult<()> {
        let dungeon = DungeonGenerator::new().generate(&self.config, self.rng.as_mut())?;
        info!("Generated a new dungeon");
        let Dungeon {
            grid,
            player,
            edge_count,
        } = dungeon;
        self.initial = Snapshot {
            grid: grid.clone(),
            player: player.clone(),
        };
        self.grid = grid;
        self.player = player;
        self.edge_count = edge_count;
        self.completion_state = GameCompletionState::Playing;
        self.statistics = GameStatistics::new();
        self.events.clear();
        Ok(())
    }

    fn record(&mut self, event: GameEvent) {
        self.statistics.update_from_event(&event);
        self.events.push(event);
    }
}

/// Step-by-step construction of a [`GameState`].
///
/// The grid size, the wrap flag and the random source have no defaults; leaving any of
/// them out is a configuration error. Everything else falls back to
/// [`GenerationConfig::default`].
///
/// # Examples
///
/// ```
/// use burrow::{GameState, SeededRandom};
///
/// let game = GameState::builder()
///     .rows(8)
///     .cols(8)
///     .wrapping(true)
///     .interconnectivity(3)
///     .monsters(2)
///     .pits(1)
///     .spawn_attempts(100)
///     .random_source(SeededRandom::new(9))
///     .build()
///     .unwrap();
/// assert_eq!(game.edge_count(), 63 + 3);
///
/// assert!(GameState::builder().rows(8).cols(8).build().is_err());
/// ```
#[derive(Debug, Default)]
pub struct DungeonBuilder {
    rows: Option<usize>,
    cols: Option<usize>,
    wrapping: Option<bool>,
    interconnectivity: Option<usize>,
    treasure_coverage: Option<f64>,
    monsters: Option<usize>,
    pits: Option<usize>,
    spawn_attempts: Option<usize>,
    rng: Option<Box<dyn RandomSource>>,
}

impl DungeonBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copies every parameter from an existing configuration.
    pub fn config(mut self, config: &GenerationConfig) -> Self {
        self.rows = Some(config.rows);
        self.cols = Some(config.cols);
        self.wrapping = Some(config.wrapping);
        self.interconnectivity = Some(config.interconnectivity);
        self.treasure_coverage = Some(config.treasure_coverage);
        self.monsters = Some(config.monsters);
        self.pits = Some(config.pits);
        self.spawn_attempts = Some(config.spawn_attempts);
        self
    }

    pub fn rows(mut self, rows: usize) -> Self {
        self.rows = Some(rows);
        self
    }

    pub fn cols(mut self, cols: usize) -> Self {
        self.cols = Some(cols);
        self
    }

    pub fn wrapping(mut self, wrapping: bool) -> Self {
        self.wrapping = Some(wrapping);
        self
    }

    pub fn interconnectivity(mut self, interconnectivity: usize) -> Self {
        self.interconnectivity = Some(interconnectivity);
        self
    }

    pub fn treasure_coverage(mut self, coverage: f64) -> Self {
        self.treasure_coverage = Some(coverage);
        self
    }

    pub fn monsters(mut self, monsters: usize) -> Self {
        self.monsters = Some(monsters);
        self
    }

    pub fn pits(mut self, pits: usize) -> Self {
        self.pits = Some(pits);
        self
    }

    pub fn spawn_attempts(mut self, attempts: usize) -> Self {
        self.spawn_attempts = Some(attempts);
        self
    }

    pub fn random_source<R: RandomSource + 'static>(mut self, rng: R) -> Self {
        self.rng = Some(Box::new(rng));
        self
    }

    pub fn boxed_random_source(mut self, rng: Box<dyn RandomSource>) -> Self {
        self.rng = Some(rng);
        self
    }

    /// Resolves the configuration without generating anything.
    pub fn to_config(&self) -> BurrowResult<GenerationConfig> {
        let missing = |name: &str| BurrowError::InvalidConfig(format!("{} is required", name));
        let defaults = GenerationConfig::default();
        let config = GenerationConfig {
            rows: self.rows.ok_or_else(|| missing("rows"))?,
            cols: self.cols.ok_or_else(|| missing("cols"))?,
            wrapping: self.wrapping.ok_or_else(|| missing("wrapping"))?,
            interconnectivity: self.interconnectivity.unwrap_or(defaults.interconnectivity),
            treasure_coverage: self.treasure_coverage.unwrap_or(defaults.treasure_coverage),
            monsters: self.monsters.unwrap_or(defaults.monsters),
            pits: self.pits.unwrap_or(defaults.pits),
            spawn_attempts: self.spawn_attempts.unwrap_or(defaults.spawn_attempts),
        };
        config.validate()?;
        Ok(config)
    }

    /// Validates the parameters and generates the dungeon.
    pub fn build(self) -> BurrowResult<GameState> {
        let config = self.to_config()?;
        let rng = self
            .rng
            .ok_or_else(|| BurrowError::InvalidConfig("random source is required".to_string()))?;
        GameState::new(config, rng)
    }
}
