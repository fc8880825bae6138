//! # Game Module
//!
//! Core game state management, world representation, and the rules of play.
//!
//! This module contains the fundamental building blocks of a Burrow dungeon:
//! - Grid cells, neighbor links and the cave/tunnel classification
//! - Player, monster and treasure entities
//! - The game state machine with its move, pickup and shoot commands
//! - Arrow flight resolution and monster proximity scanning

pub mod actions;
pub mod combat;
pub mod entities;
pub mod smell;
pub mod state;
pub mod world;

pub use actions::*;
pub use combat::*;
pub use entities::*;
pub use smell::*;
pub use state::*;
pub use world::*;

use serde::{Deserialize, Serialize};
use std::fmt;

/// A cell coordinate in the dungeon grid.
///
/// # Examples
///
/// ```
/// use burrow::Position;
///
/// let pos = Position::new(2, 5);
/// assert_eq!(pos.row, 2);
/// assert_eq!(pos.col, 5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    /// Creates a new position with the given coordinates.
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Returns the origin position (0, 0).
    pub fn origin() -> Self {
        Self::new(0, 0)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// The four directions a passage can lead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    /// All directions in neighbor scan order.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
    ];

    /// Order in which an arrow stuck in a tunnel looks for a way to bend.
    pub const REDIRECT_PRIORITY: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::West,
        Direction::East,
    ];

    /// Returns the direction pointing the other way.
    ///
    /// # Examples
    ///
    /// ```
    /// use burrow::Direction;
    ///
    /// assert_eq!(Direction::North.opposite(), Direction::South);
    /// assert_eq!(Direction::West.opposite(), Direction::East);
    /// ```
    pub fn opposite(self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::South => Direction::North,
            Direction::East => Direction::West,
            Direction::West => Direction::East,
        }
    }

    /// Slot of this direction in a cell's neighbor array.
    pub(crate) fn index(self) -> usize {
        match self {
            Direction::North => 0,
            Direction::South => 1,
            Direction::East => 2,
            Direction::West => 3,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::North => "north",
            Direction::South => "south",
            Direction::East => "east",
            Direction::West => "west",
        };
        f.write_str(name)
    }
}
