//! # Random Sources
//!
//! Every random decision in dungeon generation and play goes through [`RandomSource`].
//! [`SeededRandom`] is the production source backed by `rand`'s `StdRng`; [`ScriptedRandom`]
//! replays scripted values and falls back to deterministic coordinate scans, which makes whole
//! dungeons reproducible in tests.

use crate::{Edge, Position};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt::Debug;

/// What a placement draw is for.
///
/// Sources may use a different distribution per family; the default implementation treats
/// them all alike.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlacementKind {
    Treasure,
    Arrow,
    Pit,
    Monster,
}

/// Supplier of all non-determinism in the engine.
///
/// Callers rely on the exact order of calls, so implementations must not draw values
/// speculatively.
pub trait RandomSource: Debug {
    /// Returns a value in `[0, bound)`. A zero bound yields 0.
    fn uniform(&mut self, bound: usize) -> usize;

    /// Picks a cell for an item, hazard or monster.
    fn placement(&mut self, kind: PlacementKind, rows: usize, cols: usize) -> Position {
        let _ = kind;
        let row = self.uniform(rows);
        let col = self.uniform(cols);
        Position::new(row, col)
    }

    /// Picks a row for the start (`goal_end == false`) or the goal of the player.
    fn row_bound(&mut self, bound: usize, goal_end: bool) -> usize {
        let _ = goal_end;
        self.uniform(bound)
    }

    /// Picks a column for the start (`goal_end == false`) or the goal of the player.
    fn col_bound(&mut self, bound: usize, goal_end: bool) -> usize {
        let _ = goal_end;
        self.uniform(bound)
    }

    /// Reorders the candidate edges before maze carving.
    fn shuffle(&mut self, edges: &mut [Edge]);
}

/// Production random source backed by a seedable `StdRng`.
///
/// # Examples
///
/// ```
/// use burrow::{RandomSource, SeededRandom};
///
/// let mut a = SeededRandom::new(7);
/// let mut b = SeededRandom::new(7);
/// assert_eq!(a.uniform(100), b.uniform(100));
/// ```
#[derive(Debug, Clone)]
pub struct SeededRandom {
    rng: StdRng,
    seed: Option<u64>,
}

impl SeededRandom {
    /// Creates a reproducible source from a seed.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            seed: Some(seed),
        }
    }

    /// Creates a source seeded from the operating system.
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
            seed: None,
        }
    }

    /// Seed this source was created from, if any.
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }
}

impl RandomSource for SeededRandom {
    fn uniform(&mut self, bound: usize) -> usize {
        if bound == 0 {
            return 0;
        }
        self.rng.gen_range(0..bound)
    }

    fn shuffle(&mut self, edges: &mut [Edge]) {
        edges.shuffle(&mut self.rng);
    }
}

#[derive(Debug, Clone, Default)]
struct Script {
    values: Vec<usize>,
    placements: HashMap<PlacementKind, Vec<Position>>,
    bounds: Vec<usize>,
    permutation: Option<Vec<usize>>,
}

/// Deterministic random source for tests.
///
/// Scripted values are consumed first, in call order. Once a script runs dry the source
/// falls back to fixed behavior:
///
/// - `uniform(bound)` returns `bound - 1`
/// - treasure and arrow placements scan the grid top-left to bottom-right, pits and
///   monsters bottom-right to top-left, each family never repeating a cell; an exhausted
///   scan keeps returning `(0, 0)`, or the bottom-right cell for monsters
/// - start coordinates count up from 0 and goal coordinates count down from the first
///   bound seen, with rows and columns sharing one counter per end
/// - `shuffle` keeps the candidate order unless a permutation of matching length was
///   scripted
///
/// [`ScriptedRandom::reset`] rewinds the scripts and clears the fallback state between
/// test cases.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRandom {
    script: Script,
    values: VecDeque<usize>,
    placements: HashMap<PlacementKind, VecDeque<Position>>,
    bounds: VecDeque<usize>,
    issued: HashMap<PlacementKind, HashSet<Position>>,
    lower: Option<usize>,
    upper: Option<i64>,
}

impl ScriptedRandom {
    /// Creates a source with empty scripts, running purely on fallback behavior.
    pub fn new() -> Self {
        Self::default()
    }

    /// Scripts the results of `uniform` calls.
    pub fn with_values(mut self, values: impl IntoIterator<Item = usize>) -> Self {
        let values: Vec<usize> = values.into_iter().collect();
        self.values.extend(values.iter().copied());
        self.script.values.extend(values);
        self
    }

    /// Scripts the cells returned for one placement family.
    pub fn with_placements(
        mut self,
        kind: PlacementKind,
        positions: impl IntoIterator<Item = Position>,
    ) -> Self {
        let positions: Vec<Position> = positions.into_iter().collect();
        self.placements
            .entry(kind)
            .or_default()
            .extend(positions.iter().copied());
        self.script
            .placements
            .entry(kind)
            .or_default()
            .extend(positions);
        self
    }

    /// Scripts start and goal coordinates, consumed by row and column calls alike in the
    /// order start row, start column, goal row, goal column.
    pub fn with_bounds(mut self, values: impl IntoIterator<Item = usize>) -> Self {
        let values: Vec<usize> = values.into_iter().collect();
        self.bounds.extend(values.iter().copied());
        self.script.bounds.extend(values);
        self
    }

    /// Scripts the edge order: after shuffling, slot `i` holds the edge that was at
    /// `permutation[i]`.
    pub fn with_permutation(mut self, permutation: Vec<usize>) -> Self {
        self.script.permutation = Some(permutation);
        self
    }

    /// Rewinds every script and forgets the fallback scan state.
    pub fn reset(&mut self) {
        self.values = self.script.values.iter().copied().collect();
        self.placements = self
            .script
            .placements
            .iter()
            .map(|(kind, positions)| (*kind, positions.iter().copied().collect()))
            .collect();
        self.bounds = self.script.bounds.iter().copied().collect();
        self.issued.clear();
        self.lower = None;
        self.upper = None;
    }

    /// Checks whether every scripted value has been consumed.
    pub fn is_exhausted(&self) -> bool {
        self.values.is_empty()
            && self.bounds.is_empty()
            && self.placements.values().all(VecDeque::is_empty)
    }

    fn scan(&mut self, kind: PlacementKind, rows: usize, cols: usize) -> Position {
        let issued = self.issued.entry(kind).or_default();
        let ascending = matches!(kind, PlacementKind::Treasure | PlacementKind::Arrow);
        let total = rows * cols;

        for step in 0..total {
            let index = if ascending { step } else { total - 1 - step };
            let candidate = Position::new(index / cols, index % cols);
            if issued.insert(candidate) {
                return candidate;
            }
        }

        match kind {
            PlacementKind::Monster => {
                Position::new(rows.saturating_sub(1), cols.saturating_sub(1))
            }
            _ => Position::origin(),
        }
    }

    fn next_bound(&mut self, bound: usize, goal_end: bool) -> usize {
        if bound == 0 {
            return 0;
        }
        if let Some(value) = self.bounds.pop_front() {
            return value % bound;
        }
        if goal_end {
            let next = self.upper.unwrap_or(bound as i64) - 1;
            self.upper = Some(next);
            next.rem_euclid(bound as i64) as usize
        } else {
            let next = self.lower.map_or(0, |value| value + 1);
            self.lower = Some(next);
            next % bound
        }
    }
}

impl RandomSource for ScriptedRandom {
    fn uniform(&mut self, bound: usize) -> usize {
        if bound == 0 {
            return 0;
        }
        match self.values.pop_front() {
            Some(value) => value % bound,
            None => bound - 1,
        }
    }

    fn placement(&mut self, kind: PlacementKind, rows: usize, cols: usize) -> Position {
        if let Some(position) = self.placements.get_mut(&kind).and_then(VecDeque::pop_front) {
            return position;
        }
        self.scan(kind, rows, cols)
    }

    fn row_bound(&mut self, bound: usize, goal_end: bool) -> usize {
        self.next_bound(bound, goal_end)
    }

    fn col_bound(&mut self, bound: usize, goal_end: bool) -> usize {
        self.next_bound(bound, goal_end)
    }

    fn shuffle(&mut self, edges: &mut [Edge]) {
        let Some(permutation) = &self.script.permutation else {
            return;
        };
        if permutation.len() != edges.len() {
            return;
        }
        let original = edges.to_vec();
        for (slot, source) in permutation.iter().enumerate() {
            if let Some(edge) = original.get(*source) {
                edges[slot] = *edge;
            }
        }
    }
}
