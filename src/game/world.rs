//! # World Representation
//!
//! The dungeon grid: a row-major array of [`Location`]s whose passages are stored as
//! neighbor indices into the same array.

use crate::{
    tally_treasure, BurrowError, BurrowResult, Direction, Monster, Position, Treasure,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Whether a cell is a cave or a tunnel.
///
/// A cell with exactly two passages is a tunnel; every other cell (dead ends and junctions)
/// is a cave. Only caves receive treasure, arrows, pits and monsters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellKind {
    Cave,
    Tunnel,
}

impl CellKind {
    /// Classifies a cell from the number of passages leaving it.
    pub fn from_passages(count: usize) -> Self {
        if count == 2 {
            CellKind::Tunnel
        } else {
            CellKind::Cave
        }
    }
}

/// One cell of the dungeon grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    position: Position,
    neighbors: [Option<usize>; 4],
    kind: CellKind,
    pit: bool,
    arrows: usize,
    treasure: Vec<Treasure>,
    monster: Option<Monster>,
    is_start: bool,
    is_goal: bool,
    has_player: bool,
}

impl Location {
    /// Creates an empty, unconnected cell.
    pub fn new(position: Position) -> Self {
        Self {
            position,
            neighbors: [None; 4],
            kind: CellKind::Cave,
            pit: false,
            arrows: 0,
            treasure: Vec::new(),
            monster: None,
            is_start: false,
            is_goal: false,
            has_player: false,
        }
    }

    pub fn position(&self) -> Position {
        self.position
    }

    /// Grid index of the cell reached by leaving in `direction`, if a passage exists.
    pub fn neighbor(&self, direction: Direction) -> Option<usize> {
        self.neighbors[direction.index()]
    }

    /// Directions with an open passage, in scan order.
    pub fn open_directions(&self) -> Vec<Direction> {
        Direction::ALL
            .into_iter()
            .filter(|direction| self.neighbor(*direction).is_some())
            .collect()
    }

    /// Number of open passages.
    pub fn passage_count(&self) -> usize {
        self.neighbors.iter().filter(|n| n.is_some()).count()
    }

    pub fn kind(&self) -> CellKind {
        self.kind
    }

    pub fn is_cave(&self) -> bool {
        self.kind == CellKind::Cave
    }

    pub fn is_tunnel(&self) -> bool {
        self.kind == CellKind::Tunnel
    }

    pub fn is_pit(&self) -> bool {
        self.pit
    }

    /// Arrows lying in this cell.
    pub fn arrows(&self) -> usize {
        self.arrows
    }

    /// Treasure units lying in this cell, in placement order.
    pub fn treasure(&self) -> &[Treasure] {
        &self.treasure
    }

    /// Treasure in this cell counted by kind.
    pub fn treasure_tally(&self) -> BTreeMap<Treasure, usize> {
        tally_treasure(&self.treasure)
    }

    /// Copy of the monster occupying this cell, dead or alive.
    pub fn monster(&self) -> Option<Monster> {
        self.monster
    }

    /// Copy of the monster occupying this cell if it is still alive.
    pub fn living_monster(&self) -> Option<Monster> {
        self.monster.filter(Monster::is_alive)
    }

    pub fn is_start(&self) -> bool {
        self.is_start
    }

    pub fn is_goal(&self) -> bool {
        self.is_goal
    }

    pub fn has_player(&self) -> bool {
        self.has_player
    }

    /// Value snapshot for presentation layers.
    pub fn view(&self) -> CellView {
        CellView {
            position: self.position,
            north: self.neighbor(Direction::North).is_some(),
            south: self.neighbor(Direction::South).is_some(),
            east: self.neighbor(Direction::East).is_some(),
            west: self.neighbor(Direction::West).is_some(),
            kind: self.kind,
            pit: self.pit,
            treasure: self.treasure.len(),
            arrows: self.arrows,
            monster: self.monster,
            is_start: self.is_start,
            is_goal: self.is_goal,
            has_player: self.has_player,
        }
    }

    pub(crate) fn set_neighbor(&mut self, direction: Direction, index: usize) {
        self.neighbors[direction.index()] = Some(index);
    }

    pub(crate) fn set_kind(&mut self, kind: CellKind) {
        self.kind = kind;
    }

    pub(crate) fn set_pit(&mut self, pit: bool) {
        self.pit = pit;
    }

    pub(crate) fn add_arrow(&mut self) {
        self.arrows += 1;
    }

    pub(crate) fn add_treasure(&mut self, treasure: Treasure) {
        self.treasure.push(treasure);
    }

    pub(crate) fn take_arrows(&mut self) -> usize {
        std::mem::take(&mut self.arrows)
    }

    pub(crate) fn take_treasure(&mut self) -> Vec<Treasure> {
        std::mem::take(&mut self.treasure)
    }

    pub(crate) fn set_monster(&mut self, monster: Monster) {
        self.monster = Some(monster);
    }

    pub(crate) fn monster_mut(&mut self) -> Option<&mut Monster> {
        self.monster.as_mut()
    }

    pub(crate) fn set_start(&mut self, value: bool) {
        self.is_start = value;
    }

    pub(crate) fn set_goal(&mut self, value: bool) {
        self.is_goal = value;
    }

    pub(crate) fn set_has_player(&mut self, value: bool) {
        self.has_player = value;
    }
}

/// Read-only copy of a cell's state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellView {
    pub position: Position,
    pub north: bool,
    pub south: bool,
    pub east: bool,
    pub west: bool,
    pub kind: CellKind,
    pub pit: bool,
    pub treasure: usize,
    pub arrows: usize,
    pub monster: Option<Monster>,
    pub is_start: bool,
    pub is_goal: bool,
    pub has_player: bool,
}

/// The rectangular dungeon grid.
///
/// # Examples
///
/// ```
/// use burrow::{Direction, Grid, Position};
///
/// let grid = Grid::new(2, 3);
/// assert_eq!(grid.len(), 6);
/// assert!(grid.neighbor(Position::new(0, 0), Direction::East).is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<Location>,
}

impl Grid {
    /// Creates a grid of empty, unconnected cells.
    pub fn new(rows: usize, cols: usize) -> Self {
        let mut cells = Vec::with_capacity(rows * cols);
        for row in 0..rows {
            for col in 0..cols {
                cells.push(Location::new(Position::new(row, col)));
            }
        }
        Self { rows, cols, cells }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Total number of cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Checks if a position lies inside the grid.
    pub fn contains(&self, position: Position) -> bool {
        position.row < self.rows && position.col < self.cols
    }

    /// Row-major index of a position.
    pub fn index_of(&self, position: Position) -> BurrowResult<usize> {
        if !self.contains(position) {
            return Err(BurrowError::InvalidState(format!(
                "position {} is outside the {}x{} grid",
                position, self.rows, self.cols
            )));
        }
        Ok(position.row * self.cols + position.col)
    }

    /// Position of a row-major index, if the index names a cell.
    pub fn position_of(&self, index: usize) -> Option<Position> {
        self.cells.get(index).map(Location::position)
    }

    /// Gets the cell at a position.
    pub fn get(&self, position: Position) -> Option<&Location> {
        if self.contains(position) {
            self.cells.get(position.row * self.cols + position.col)
        } else {
            None
        }
    }

    pub(crate) fn get_mut(&mut self, position: Position) -> Option<&mut Location> {
        if self.contains(position) {
            self.cells.get_mut(position.row * self.cols + position.col)
        } else {
            None
        }
    }

    /// Gets the cell at a row-major index.
    pub fn cell(&self, index: usize) -> Option<&Location> {
        self.cells.get(index)
    }

    pub(crate) fn cell_mut(&mut self, index: usize) -> Option<&mut Location> {
        self.cells.get_mut(index)
    }

    /// Iterates over all cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = &Location> {
        self.cells.iter()
    }

    /// Position reached by leaving `position` in `direction`, if a passage exists.
    pub fn neighbor(&self, position: Position, direction: Direction) -> Option<Position> {
        self.get(position)
            .and_then(|cell| cell.neighbor(direction))
            .and_then(|index| self.position_of(index))
    }

    /// Indices of every cell reachable in one move from `index`, in scan order.
    pub fn neighbor_indices(&self, index: usize) -> Vec<usize> {
        self.cells
            .get(index)
            .map(|cell| {
                Direction::ALL
                    .into_iter()
                    .filter_map(|direction| cell.neighbor(direction))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Opens a two-way passage: `from` leads to `to` in `direction`, and back the other way.
    pub(crate) fn connect(&mut self, from: usize, direction: Direction, to: usize) {
        if let Some(cell) = self.cells.get_mut(from) {
            cell.set_neighbor(direction, to);
        }
        if let Some(cell) = self.cells.get_mut(to) {
            cell.set_neighbor(direction.opposite(), from);
        }
    }

    /// Sets every cell's cave/tunnel kind from its passage count.
    pub(crate) fn classify(&mut self) {
        for cell in &mut self.cells {
            let kind = CellKind::from_passages(cell.passage_count());
            cell.set_kind(kind);
        }
    }

    /// Number of caves.
    pub fn cave_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_cave()).count()
    }

    /// Number of tunnels.
    pub fn tunnel_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_tunnel()).count()
    }

    /// Value snapshots of every cell, in row-major order.
    pub fn views(&self) -> Vec<CellView> {
        self.cells.iter().map(Location::view).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_creation() {
        let grid = Grid::new(3, 4);
        assert_eq!(grid.rows(), 3);
        assert_eq!(grid.cols(), 4);
        assert_eq!(grid.len(), 12);
        assert!(grid.cells().all(|cell| cell.passage_count() == 0));
    }

    #[test]
    fn test_index_round_trip() {
        let grid = Grid::new(3, 4);
        let pos = Position::new(2, 1);
        let index = grid.index_of(pos).unwrap();
        assert_eq!(index, 9);
        assert_eq!(grid.position_of(index), Some(pos));
        assert_eq!(grid.position_of(12), None);
        assert!(grid.index_of(Position::new(3, 0)).is_err());
        assert!(grid.get(Position::new(0, 4)).is_none());
    }

    #[test]
    fn test_empty_grid_lookups() {
        let grid = Grid::new(3, 0);
        assert!(grid.is_empty());
        assert_eq!(grid.position_of(0), None);
        assert_eq!(grid.position_of(5), None);
        assert!(grid.index_of(Position::origin()).is_err());
        assert!(grid.neighbor_indices(0).is_empty());
    }

    #[test]
    fn test_connect_is_bidirectional() {
        let mut grid = Grid::new(2, 2);
        grid.connect(0, Direction::East, 1);

        assert_eq!(
            grid.neighbor(Position::new(0, 0), Direction::East),
            Some(Position::new(0, 1))
        );
        assert_eq!(
            grid.neighbor(Position::new(0, 1), Direction::West),
            Some(Position::new(0, 0))
        );
        assert_eq!(grid.neighbor_indices(0), vec![1]);
    }

    #[test]
    fn test_classification_by_passage_count() {
        // 0 - 1 - 2
        //     |
        //     3
        let mut grid = Grid::new(2, 3);
        grid.connect(0, Direction::East, 1);
        grid.connect(1, Direction::East, 2);
        grid.connect(1, Direction::South, 4);
        grid.classify();

        assert!(grid.cell(0).unwrap().is_cave()); // dead end
        assert!(grid.cell(1).unwrap().is_cave()); // junction
        assert!(grid.cell(5).unwrap().is_cave()); // unconnected

        let mut line = Grid::new(1, 3);
        line.connect(0, Direction::East, 1);
        line.connect(1, Direction::East, 2);
        line.classify();
        assert!(line.cell(1).unwrap().is_tunnel());
        assert_eq!(line.tunnel_count(), 1);
        assert_eq!(line.cave_count(), 2);
    }

    #[test]
    fn test_cell_view_reflects_cell() {
        let mut grid = Grid::new(1, 2);
        grid.connect(0, Direction::East, 1);
        grid.classify();
        let cell = grid.cell_mut(0).unwrap();
        cell.add_treasure(Treasure::Ruby);
        cell.add_treasure(Treasure::Ruby);
        cell.add_arrow();
        cell.set_monster(Monster::new());

        let view = grid.cell(0).unwrap().view();
        assert!(view.east);
        assert!(!view.west);
        assert_eq!(view.treasure, 2);
        assert_eq!(view.arrows, 1);
        assert_eq!(view.monster.map(|m| m.lives()), Some(2));
        assert_eq!(
            grid.cell(0).unwrap().treasure_tally().get(&Treasure::Ruby),
            Some(&2)
        );
    }

    #[test]
    fn test_taking_items_clears_cell() {
        let mut location = Location::new(Position::origin());
        location.add_arrow();
        location.add_arrow();
        location.add_treasure(Treasure::Diamond);

        assert_eq!(location.take_arrows(), 2);
        assert_eq!(location.arrows(), 0);
        assert_eq!(location.take_treasure(), vec![Treasure::Diamond]);
        assert!(location.treasure().is_empty());
    }
}
