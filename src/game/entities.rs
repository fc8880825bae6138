//! # Entities
//!
//! The creatures and loot that live in the dungeon: the player, the monsters guarding the
//! caves, and the treasure scattered through them.

use crate::{config, Position};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Kinds of treasure found in caves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Treasure {
    Diamond,
    Ruby,
    Sapphire,
}

impl Treasure {
    /// All treasure kinds, indexed by the random draw that selects them.
    pub const ALL: [Treasure; 3] = [Treasure::Diamond, Treasure::Ruby, Treasure::Sapphire];
}

/// Counts treasure units by kind.
pub fn tally_treasure(treasure: &[Treasure]) -> BTreeMap<Treasure, usize> {
    let mut tally = BTreeMap::new();
    for kind in treasure {
        *tally.entry(*kind).or_insert(0) += 1;
    }
    tally
}

/// A monster lurking in a cave.
///
/// Monsters are plain values: reading one from the grid hands out a copy, and the only way
/// to wound a monster in play is to shoot it through [`crate::GameState::shoot`].
///
/// # Examples
///
/// ```
/// use burrow::Monster;
///
/// let monster = Monster::new();
/// assert!(monster.is_alive());
/// assert_eq!(monster.lives(), 2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Monster {
    lives: u8,
}

impl Monster {
    /// Creates a monster at full health.
    pub fn new() -> Self {
        Self {
            lives: config::MONSTER_STARTING_LIVES,
        }
    }

    /// Remaining lives.
    pub fn lives(&self) -> u8 {
        self.lives
    }

    /// Whether the monster still has lives left.
    pub fn is_alive(&self) -> bool {
        self.lives > 0
    }

    /// Takes one life away. Returns true if that was the last one.
    pub(crate) fn wound(&mut self) -> bool {
        self.lives = self.lives.saturating_sub(1);
        !self.is_alive()
    }
}

impl Default for Monster {
    fn default() -> Self {
        Self::new()
    }
}

/// The adventurer making their way from the start cave to the goal cave.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    position: Position,
    start: Position,
    goal: Position,
    arrows: usize,
    treasure: Vec<Treasure>,
    alive: bool,
}

impl Player {
    /// Creates a player standing on `start` and heading for `goal`.
    pub fn new(start: Position, goal: Position) -> Self {
        Self {
            position: start,
            start,
            goal,
            arrows: config::PLAYER_STARTING_ARROWS,
            treasure: Vec::new(),
            alive: true,
        }
    }

    /// Cell the player currently occupies.
    pub fn position(&self) -> Position {
        self.position
    }

    /// Cell the player entered the dungeon on.
    pub fn start(&self) -> Position {
        self.start
    }

    /// Cell the player must reach to escape.
    pub fn goal(&self) -> Position {
        self.goal
    }

    /// Arrows in the quiver.
    pub fn arrows(&self) -> usize {
        self.arrows
    }

    /// Every treasure unit collected so far.
    pub fn treasure(&self) -> &[Treasure] {
        &self.treasure
    }

    /// Collected treasure counted by kind.
    pub fn treasure_tally(&self) -> BTreeMap<Treasure, usize> {
        tally_treasure(&self.treasure)
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    /// Returns a value snapshot for presentation layers.
    pub fn snapshot(&self) -> PlayerSnapshot {
        PlayerSnapshot {
            position: self.position,
            start: self.start,
            goal: self.goal,
            arrows: self.arrows,
            treasure: self.treasure.clone(),
            alive: self.alive,
        }
    }

    pub(crate) fn set_position(&mut self, position: Position) {
        self.position = position;
    }

    /// Removes one arrow from the quiver, if there is one.
    pub(crate) fn take_arrow(&mut self) -> bool {
        if self.arrows == 0 {
            return false;
        }
        self.arrows -= 1;
        true
    }

    pub(crate) fn add_arrows(&mut self, count: usize) {
        self.arrows += count;
    }

    pub(crate) fn add_treasure(&mut self, treasure: Vec<Treasure>) {
        self.treasure.extend(treasure);
    }

    pub(crate) fn kill(&mut self) {
        self.alive = false;
    }
}

/// Read-only copy of the player's state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    pub position: Position,
    pub start: Position,
    pub goal: Position,
    pub arrows: usize,
    pub treasure: Vec<Treasure>,
    pub alive: bool,
}
