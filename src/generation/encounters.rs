//! # Encounter Placement
//!
//! Chooses where the player starts and where they must go, and puts monsters in the
//! player's way. One monster always guards the goal.

use crate::{
    config, BurrowError, BurrowResult, Grid, Monster, PlacementKind, Position, RandomSource,
};
use log::{debug, warn};

/// Picks the start and goal caves and places monsters.
#[derive(Debug, Clone)]
pub struct EncounterPlacer {
    /// Random draws allowed per grid cell before a selection loop gives up
    pub attempts_per_cell: usize,
}

impl EncounterPlacer {
    pub fn new() -> Self {
        Self {
            attempts_per_cell: config::PLACEMENT_ATTEMPTS_PER_CELL,
        }
    }

    /// Draws a start and a goal.
    ///
    /// Each round draws the start row and column, then the goal row and column. A start on
    /// a tunnel or a pit ends the round before the goal is drawn. A goal on a tunnel, a
    /// pit or the start itself throws the whole pair away, so the next round draws a new
    /// start as well.
    pub fn select_spawn(
        &self,
        grid: &Grid,
        rng: &mut dyn RandomSource,
    ) -> BurrowResult<(Position, Position)> {
        let limit = self.attempts_per_cell * grid.len();
        for _ in 0..limit {
            let start = Self::draw(grid, rng, false);
            if !Self::is_open_cave(grid, start)? {
                continue;
            }
            let goal = Self::draw(grid, rng, true);
            if goal == start || !Self::is_open_cave(grid, goal)? {
                continue;
            }
            debug!("Selected start {} and goal {}", start, goal);
            return Ok((start, goal));
        }

        warn!("Gave up drawing a start and goal after {} rounds", limit);
        Err(BurrowError::PlacementImpossible(
            "no pair of distinct pit-free caves found for the start and goal".to_string(),
        ))
    }

    fn draw(grid: &Grid, rng: &mut dyn RandomSource, goal_end: bool) -> Position {
        let row = rng.row_bound(grid.rows(), goal_end);
        let col = rng.col_bound(grid.cols(), goal_end);
        Position::new(row, col)
    }

    fn is_open_cave(grid: &Grid, position: Position) -> BurrowResult<bool> {
        let cell = grid
            .get(position)
            .ok_or_else(|| BurrowError::InvalidState(format!("{} is off the grid", position)))?;
        Ok(cell.is_cave() && !cell.is_pit())
    }

    /// Puts a fresh monster on the goal, then `count - 1` more on caves that are neither
    /// the start nor already guarded.
    pub fn place_monsters(
        &self,
        grid: &mut Grid,
        start: Position,
        goal: Position,
        count: usize,
        rng: &mut dyn RandomSource,
    ) -> BurrowResult<()> {
        if count == 0 {
            return Err(BurrowError::InvalidConfig(
                "at least one monster is required to guard the goal".to_string(),
            ));
        }
        let caves = grid.cave_count();
        if count > caves.saturating_sub(1) {
            return Err(BurrowError::PlacementImpossible(format!(
                "{} monsters requested but only {} caves besides the start",
                count,
                caves.saturating_sub(1)
            )));
        }

        let goal_index = grid.index_of(goal)?;
        if let Some(cell) = grid.cell_mut(goal_index) {
            cell.set_monster(Monster::new());
        }

        let mut remaining = count - 1;
        let mut attempts = 0;
        let limit = self.attempts_per_cell * grid.len();
        while remaining > 0 {
            attempts += 1;
            if attempts > limit {
                warn!("Gave up placing monsters with {} left", remaining);
                return Err(BurrowError::PlacementImpossible(format!(
                    "random source never produced a free cave for {} monsters",
                    remaining
                )));
            }

            let position = rng.placement(PlacementKind::Monster, grid.rows(), grid.cols());
            let index = grid.index_of(position)?;
            let Some(cell) = grid.cell_mut(index) else {
                continue;
            };
            if cell.is_tunnel() || position == start || cell.monster().is_some() {
                continue;
            }
            cell.set_monster(Monster::new());
            remaining -= 1;
        }

        debug!("Placed {} monsters", count);
        Ok(())
    }
}

impl Default for EncounterPlacer {
    fn default() -> Self {
        Self::new()
    }
}
