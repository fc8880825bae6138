//! # Actions and Events
//!
//! Player commands as data, the outcome each command reports, and the events the game emits
//! while applying them.

use crate::{DeathCause, Direction, Position, Treasure};
use serde::{Deserialize, Serialize};

/// What the player wants to pick up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemKind {
    Treasure,
    Arrows,
}

/// A command a controller can send to the game.
///
/// # Examples
///
/// ```
/// use burrow::{Action, Direction};
///
/// let action: Action = serde_json::from_str(
///     r#"{"Shoot":{"direction":"North","distance":2}}"#,
/// ).unwrap();
/// assert_eq!(action, Action::Shoot { direction: Direction::North, distance: 2 });
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    Move { direction: Direction },
    Pickup { item: ItemKind },
    Shoot { direction: Direction, distance: usize },
}

/// Result of a move command.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveOutcome {
    /// The player left the cell and is still alive
    pub succeeded: bool,
    pub died_in_pit: bool,
    pub died_to_monster: bool,
    pub reached_goal: bool,
}

impl MoveOutcome {
    /// Whether the move killed the player.
    pub fn died(&self) -> bool {
        self.died_in_pit || self.died_to_monster
    }
}

/// Result of a pickup command.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickupOutcome {
    pub collected: bool,
    /// Treasure moved into the player's collection
    pub treasure: Vec<Treasure>,
    /// Arrows moved into the player's quiver
    pub arrows: usize,
}

/// Result of a shoot command.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShotOutcome {
    /// An arrow left the quiver; false only when the quiver was empty or the game was over
    pub arrow_spent: bool,
    pub hit: bool,
    pub killed: bool,
}

/// Outcome of an [`Action`] applied through [`crate::GameState::execute`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionResult {
    Moved(MoveOutcome),
    PickedUp(PickupOutcome),
    Shot(ShotOutcome),
}

/// Something that happened during play.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// The player walked through a passage
    PlayerMoved { from: Position, to: Position },
    /// The player walked into a wounded monster and got away
    EscapedMonster { position: Position, roll: usize },
    /// The player died
    PlayerDied { position: Position, cause: DeathCause },
    /// The player reached the goal alive
    ReachedGoal { position: Position },
    /// Treasure moved from a cave into the player's collection
    TreasureCollected {
        position: Position,
        treasure: Vec<Treasure>,
    },
    /// Arrows moved from a cave into the player's quiver
    ArrowsCollected { position: Position, count: usize },
    /// An arrow left the quiver
    ArrowFired {
        from: Position,
        direction: Direction,
        distance: usize,
    },
    /// An arrow wounded a monster
    MonsterHit { position: Position, lives_left: u8 },
    /// An arrow took a monster's last life
    MonsterKilled { position: Position },
}
