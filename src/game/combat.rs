//! # Combat
//!
//! Arrow flight through the passage graph and the player's chance of surviving a monster.

use crate::{config, Direction, Grid, Monster, Position, RandomSource};
use log::{debug, info};
use serde::{Deserialize, Serialize};

/// Where an arrow ended up and what it did there.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArrowImpact {
    /// Cave where the arrow came to rest, if it got that far
    pub landed: Option<Position>,
    /// A living monster was struck
    pub hit: bool,
    /// The strike took the monster's last life
    pub killed: bool,
}

/// Flies an arrow from the cell at `origin`.
///
/// Tunnels are crossed for free and bend the arrow along their only other passage when
/// the heading runs into a wall; those bends prefer north, then south, west and east.
/// Entering a cave uses up one unit of `distance`. The arrow stops in the cave where the
/// distance reaches zero and wounds a living monster there. A living monster in a cave
/// crossed before that catches the arrow unharmed. Flying into a wall outside a tunnel is
/// a miss, and so is a zero distance.
///
/// # Examples
///
/// ```
/// use burrow::{resolve_shot, Direction, Grid};
///
/// let mut grid = Grid::new(1, 3);
/// let impact = resolve_shot(&mut grid, 0, Direction::East, 1);
/// assert!(!impact.hit);
/// assert!(impact.landed.is_none());
/// ```
pub fn resolve_shot(
    grid: &mut Grid,
    origin: usize,
    direction: Direction,
    distance: usize,
) -> ArrowImpact {
    if distance == 0 {
        return ArrowImpact::default();
    }

    let mut current = origin;
    let mut heading = direction;
    let mut remaining = distance;
    // Tunnels never use up distance, so a loop made only of tunnels needs a bound.
    let step_limit = grid.len() * 4 + 4;

    for _ in 0..step_limit {
        let Some(cell) = grid.cell(current) else {
            break;
        };

        let Some(next) = cell.neighbor(heading) else {
            if cell.is_tunnel() {
                let bend = Direction::REDIRECT_PRIORITY.into_iter().find(|candidate| {
                    *candidate != heading.opposite() && cell.neighbor(*candidate).is_some()
                });
                if let Some(bend) = bend {
                    heading = bend;
                    continue;
                }
            }
            debug!("Arrow hit a wall at {}", cell.position());
            return ArrowImpact::default();
        };

        current = next;
        let Some(entered) = grid.cell(current) else {
            break;
        };
        if entered.is_tunnel() {
            continue;
        }

        remaining -= 1;
        if remaining == 0 {
            return strike(grid, current);
        }
        if entered.living_monster().is_some() {
            debug!("Arrow stopped short by the monster at {}", entered.position());
            return ArrowImpact {
                landed: Some(entered.position()),
                ..ArrowImpact::default()
            };
        }
    }

    debug!("Arrow lost in a tunnel loop");
    ArrowImpact::default()
}

fn strike(grid: &mut Grid, index: usize) -> ArrowImpact {
    let Some(landed) = grid.position_of(index) else {
        return ArrowImpact::default();
    };
    let mut impact = ArrowImpact {
        landed: Some(landed),
        ..ArrowImpact::default()
    };

    if let Some(monster) = grid
        .cell_mut(index)
        .and_then(|cell| cell.monster_mut())
        .filter(|monster| monster.is_alive())
    {
        impact.hit = true;
        impact.killed = monster.wound();
        info!(
            "Arrow struck the monster at {} ({} lives left)",
            landed,
            monster.lives()
        );
    } else {
        debug!("Arrow landed in an empty cave at {}", landed);
    }

    impact
}

/// What happened when the player entered a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Encounter {
    /// No living monster in the cell
    NoMonster,
    /// A wounded monster was there but the escape roll succeeded
    Escaped { roll: usize },
    /// The monster ate the player
    Eaten,
}

/// Resolves the player walking into a cell guarded by `monster`.
///
/// A monster at full health always wins. A wounded one costs a roll in
/// `[0, ESCAPE_ROLL_BOUND)` and the player survives on `ESCAPE_THRESHOLD` or more. No
/// random value is drawn otherwise.
pub fn resolve_encounter(monster: Option<Monster>, rng: &mut dyn RandomSource) -> Encounter {
    let Some(monster) = monster.filter(Monster::is_alive) else {
        return Encounter::NoMonster;
    };

    if monster.lives() >= config::MONSTER_STARTING_LIVES {
        return Encounter::Eaten;
    }

    let roll = rng.uniform(config::ESCAPE_ROLL_BOUND);
    if roll >= config::ESCAPE_THRESHOLD {
        Encounter::Escaped { roll }
    } else {
        Encounter::Eaten
    }
}
