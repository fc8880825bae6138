//! # Path Searches
//!
//! Breadth-first searches over the passages of a [`Grid`]. Every move costs the same, so a
//! breadth-first search yields shortest paths.

use crate::{BurrowResult, Grid, Position};
use pathfinding::prelude::{bfs, bfs_reach};
use std::collections::{HashMap, VecDeque};

/// Finds a shortest path from `from` to `to`, both ends included.
///
/// Returns `Ok(None)` when no passage sequence connects the two cells.
///
/// # Examples
///
/// ```
/// use burrow::{shortest_path, GameState, GenerationConfig, SeededRandom};
///
/// let config = GenerationConfig::for_testing();
/// let game = GameState::new(config, Box::new(SeededRandom::new(3))).unwrap();
/// let player = game.player();
/// let path = shortest_path(game.grid(), player.start(), player.goal()).unwrap().unwrap();
/// assert_eq!(path.first(), Some(&player.start()));
/// assert_eq!(path.last(), Some(&player.goal()));
/// ```
pub fn shortest_path(
    grid: &Grid,
    from: Position,
    to: Position,
) -> BurrowResult<Option<Vec<Position>>> {
    let start = grid.index_of(from)?;
    let goal = grid.index_of(to)?;

    let path = bfs(&start, |&index| grid.neighbor_indices(index), |&index| index == goal);
    Ok(path.map(|indices| {
        indices
            .into_iter()
            .filter_map(|index| grid.position_of(index))
            .collect()
    }))
}

/// Number of moves on a shortest path from `from` to `to`.
pub fn path_length(grid: &Grid, from: Position, to: Position) -> BurrowResult<Option<usize>> {
    Ok(shortest_path(grid, from, to)?.map(|path| path.len().saturating_sub(1)))
}

/// Checks whether a passage sequence already links two cells.
pub fn is_connected(grid: &Grid, from: usize, to: usize) -> bool {
    bfs(&from, |&index| grid.neighbor_indices(index), |&index| index == to).is_some()
}

/// Number of cells reachable from `from`, including `from` itself.
pub fn reachable_count(grid: &Grid, from: Position) -> BurrowResult<usize> {
    let start = grid.index_of(from)?;
    Ok(bfs_reach(start, |&index| grid.neighbor_indices(index)).count())
}

/// Records, for every cell reachable from `from`, the path a breadth-first search took to
/// reach it.
///
/// Neighbors are expanded in north, south, east, west order, so ties between equally short
/// paths are broken the same way every time.
pub fn optimal_paths(grid: &Grid, from: Position) -> BurrowResult<HashMap<Position, Vec<Position>>> {
    let start = grid.index_of(from)?;
    let mut parents: HashMap<usize, Option<usize>> = HashMap::new();
    let mut queue = VecDeque::new();

    parents.insert(start, None);
    queue.push_back(start);

    while let Some(current) = queue.pop_front() {
        for next in grid.neighbor_indices(current) {
            if !parents.contains_key(&next) {
                parents.insert(next, Some(current));
                queue.push_back(next);
            }
        }
    }

    let mut paths = HashMap::with_capacity(parents.len());
    for &target in parents.keys() {
        let mut indices = vec![target];
        let mut cursor = target;
        while let Some(Some(parent)) = parents.get(&cursor) {
            indices.push(*parent);
            cursor = *parent;
        }
        indices.reverse();
        let path: Vec<Position> = indices
            .into_iter()
            .filter_map(|index| grid.position_of(index))
            .collect();
        if let Some(&end) = path.last() {
            paths.insert(end, path);
        }
    }

    Ok(paths)
}
