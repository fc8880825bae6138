//! # Monster Smell
//!
//! A player can smell monsters lurking up to two moves away. The scan walks the passage
//! graph ring by ring, so walls block the smell even when a monster is physically close.

use crate::Grid;
use serde::{Deserialize, Serialize};
use std::collections::{HashSet, VecDeque};
use std::fmt;

/// Strength of the monster smell at a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Smell {
    None,
    Weak,
    Strong,
}

impl Smell {
    /// Classifies a proximity count.
    ///
    /// # Examples
    ///
    /// ```
    /// use burrow::{MonsterProximity, Smell};
    ///
    /// let near = MonsterProximity { adjacent: 1, two_away: 0 };
    /// assert_eq!(Smell::from_proximity(near), Smell::Strong);
    ///
    /// let far = MonsterProximity { adjacent: 0, two_away: 1 };
    /// assert_eq!(Smell::from_proximity(far), Smell::Weak);
    ///
    /// let pack = MonsterProximity { adjacent: 0, two_away: 2 };
    /// assert_eq!(Smell::from_proximity(pack), Smell::Strong);
    /// ```
    pub fn from_proximity(proximity: MonsterProximity) -> Self {
        if proximity.adjacent > 0 || proximity.two_away > 1 {
            Smell::Strong
        } else if proximity.two_away == 1 {
            Smell::Weak
        } else {
            Smell::None
        }
    }
}

impl fmt::Display for Smell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Smell::None => "none",
            Smell::Weak => "weak",
            Smell::Strong => "strong",
        };
        f.write_str(name)
    }
}

/// Living monsters counted by passage distance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonsterProximity {
    /// Monsters one move away
    pub adjacent: usize,
    /// Monsters two moves away
    pub two_away: usize,
}

/// Counts living monsters one and two moves away from the cell at `origin`.
///
/// The breadth-first queue carries a `None` marker between rings; the scan stops when it
/// meets the third marker. A monster in the origin cell itself is not counted.
pub fn scan_for_monsters(grid: &Grid, origin: usize) -> MonsterProximity {
    let mut proximity = MonsterProximity::default();
    if grid.cell(origin).is_none() {
        return proximity;
    }

    let mut queue: VecDeque<Option<usize>> = VecDeque::new();
    let mut visited = HashSet::new();
    let mut ring = 0;

    queue.push_back(Some(origin));
    queue.push_back(None);
    visited.insert(origin);

    while let Some(entry) = queue.pop_front() {
        let Some(index) = entry else {
            ring += 1;
            if ring == 3 || queue.is_empty() {
                break;
            }
            queue.push_back(None);
            continue;
        };

        if grid.cell(index).and_then(|cell| cell.living_monster()).is_some() {
            match ring {
                1 => proximity.adjacent += 1,
                2 => proximity.two_away += 1,
                _ => {}
            }
        }

        for next in grid.neighbor_indices(index) {
            if visited.insert(next) {
                queue.push_back(Some(next));
            }
        }
    }

    proximity
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Direction, Monster};

    /// A 1x5 corridor: 0 - 1 - 2 - 3 - 4
    fn corridor() -> Grid {
        let mut grid = Grid::new(1, 5);
        for index in 0..4 {
            grid.connect(index, Direction::East, index + 1);
        }
        grid.classify();
        grid
    }

    #[test]
    fn test_no_monsters_no_smell() {
        let grid = corridor();
        let proximity = scan_for_monsters(&grid, 0);
        assert_eq!(proximity, MonsterProximity::default());
        assert_eq!(Smell::from_proximity(proximity), Smell::None);
    }

    #[test]
    fn test_adjacent_monster_smells_strong() {
        let mut grid = corridor();
        grid.cell_mut(1).unwrap().set_monster(Monster::new());
        let proximity = scan_for_monsters(&grid, 0);
        assert_eq!(proximity.adjacent, 1);
        assert_eq!(Smell::from_proximity(proximity), Smell::Strong);
    }

    #[test]
    fn test_distant_monster_smells_weak() {
        let mut grid = corridor();
        grid.cell_mut(2).unwrap().set_monster(Monster::new());
        let proximity = scan_for_monsters(&grid, 0);
        assert_eq!(proximity.two_away, 1);
        assert_eq!(Smell::from_proximity(proximity), Smell::Weak);
    }

    #[test]
    fn test_two_distant_monsters_smell_strong() {
        let mut grid = corridor();
        grid.cell_mut(0).unwrap().set_monster(Monster::new());
        grid.cell_mut(4).unwrap().set_monster(Monster::new());
        let proximity = scan_for_monsters(&grid, 2);
        assert_eq!(proximity.adjacent, 0);
        assert_eq!(proximity.two_away, 2);
        assert_eq!(Smell::from_proximity(proximity), Smell::Strong);
    }

    #[test]
    fn test_monsters_beyond_two_rings_are_ignored() {
        let mut grid = corridor();
        grid.cell_mut(3).unwrap().set_monster(Monster::new());
        grid.cell_mut(4).unwrap().set_monster(Monster::new());
        assert_eq!(
            Smell::from_proximity(scan_for_monsters(&grid, 0)),
            Smell::None
        );
    }

    #[test]
    fn test_dead_monsters_do_not_smell() {
        let mut grid = corridor();
        let mut monster = Monster::new();
        monster.wound();
        monster.wound();
        grid.cell_mut(1).unwrap().set_monster(monster);
        assert_eq!(
            Smell::from_proximity(scan_for_monsters(&grid, 0)),
            Smell::None
        );
    }

    #[test]
    fn test_walls_block_smell() {
        // Physically adjacent but with no passage between the cells.
        let mut grid = Grid::new(1, 2);
        grid.cell_mut(1).unwrap().set_monster(Monster::new());
        assert_eq!(scan_for_monsters(&grid, 0), MonsterProximity::default());
    }
}
