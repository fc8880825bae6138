//! # Item Placement
//!
//! Scatters pits, treasure and arrows over the caves of a carved maze. Tunnels never
//! receive anything.

use crate::{
    config, BurrowError, BurrowResult, Grid, PlacementKind, RandomSource, Treasure,
};
use log::{debug, warn};
use std::collections::HashSet;

/// Places pits and collectibles into caves.
#[derive(Debug, Clone)]
pub struct ItemPlacer {
    /// Random draws allowed per grid cell before a placement loop gives up
    pub attempts_per_cell: usize,
}

impl ItemPlacer {
    pub fn new() -> Self {
        Self {
            attempts_per_cell: config::PLACEMENT_ATTEMPTS_PER_CELL,
        }
    }

    /// Number of caves to stock for a coverage fraction.
    ///
    /// # Examples
    ///
    /// ```
    /// use burrow::ItemPlacer;
    ///
    /// assert_eq!(ItemPlacer::coverage_target(14, 0.3), 4);
    /// assert_eq!(ItemPlacer::coverage_target(28, 0.3), 8);
    /// ```
    pub fn coverage_target(caves: usize, coverage: f64) -> usize {
        let target = (coverage * caves as f64).round() as usize;
        target.min(caves)
    }

    /// Flags `count` distinct caves as pits.
    ///
    /// Draws landing on a tunnel or on an existing pit are skipped.
    pub fn place_pits(
        &self,
        grid: &mut Grid,
        count: usize,
        rng: &mut dyn RandomSource,
    ) -> BurrowResult<()> {
        if count > grid.cave_count() {
            return Err(BurrowError::PlacementImpossible(format!(
                "{} pits requested but the maze has only {} caves",
                count,
                grid.cave_count()
            )));
        }

        let mut placed = 0;
        let mut attempts = 0;
        while placed < count {
            self.spend_attempt(&mut attempts, grid.len(), "pits")?;

            let position = rng.placement(PlacementKind::Pit, grid.rows(), grid.cols());
            let index = grid.index_of(position)?;
            let Some(cell) = grid.cell_mut(index) else {
                continue;
            };
            if cell.is_tunnel() || cell.is_pit() {
                continue;
            }
            cell.set_pit(true);
            placed += 1;
        }

        debug!("Placed {} pits", placed);
        Ok(())
    }

    /// Stocks caves with treasure until the coverage target of distinct caves is met.
    ///
    /// Every draw also picks a treasure kind. A draw on an already stocked cave adds
    /// another unit without counting towards the target. Returns the number of stocked
    /// caves.
    pub fn place_treasure(
        &self,
        grid: &mut Grid,
        coverage: f64,
        rng: &mut dyn RandomSource,
    ) -> BurrowResult<usize> {
        let target = Self::coverage_target(grid.cave_count(), coverage);
        let mut stocked = HashSet::new();
        let mut attempts = 0;

        while stocked.len() < target {
            self.spend_attempt(&mut attempts, grid.len(), "treasure")?;

            let position = rng.placement(PlacementKind::Treasure, grid.rows(), grid.cols());
            let kind = Treasure::ALL[rng.uniform(Treasure::ALL.len())];
            let index = grid.index_of(position)?;
            let Some(cell) = grid.cell_mut(index) else {
                continue;
            };
            if cell.is_tunnel() {
                continue;
            }
            cell.add_treasure(kind);
            stocked.insert(index);
        }

        debug!("Stocked {} caves with treasure", stocked.len());
        Ok(stocked.len())
    }

    /// Stocks caves with arrows until the coverage target of distinct caves is met.
    ///
    /// Every draw also spends a treasure-kind value, so both families consume the random
    /// source alike. A draw on an already stocked cave adds another arrow without counting
    /// towards the target. Returns the number of stocked caves.
    pub fn place_arrows(
        &self,
        grid: &mut Grid,
        coverage: f64,
        rng: &mut dyn RandomSource,
    ) -> BurrowResult<usize> {
        let target = Self::coverage_target(grid.cave_count(), coverage);
        let mut stocked = HashSet::new();
        let mut attempts = 0;

        while stocked.len() < target {
            self.spend_attempt(&mut attempts, grid.len(), "arrows")?;

            let position = rng.placement(PlacementKind::Arrow, grid.rows(), grid.cols());
            // Arrows share the treasure draw sequence; the kind is unused.
            let _ = rng.uniform(Treasure::ALL.len());
            let index = grid.index_of(position)?;
            let Some(cell) = grid.cell_mut(index) else {
                continue;
            };
            if cell.is_tunnel() {
                continue;
            }
            cell.add_arrow();
            stocked.insert(index);
        }

        debug!("Stocked {} caves with arrows", stocked.len());
        Ok(stocked.len())
    }

    fn spend_attempt(&self, attempts: &mut usize, cells: usize, what: &str) -> BurrowResult<()> {
        *attempts += 1;
        if *attempts > self.attempts_per_cell * cells {
            warn!("Gave up placing {} after {} draws", what, *attempts - 1);
            return Err(BurrowError::PlacementImpossible(format!(
                "random source never produced a usable cell for {}",
                what
            )));
        }
        Ok(())
    }
}

impl Default for ItemPlacer {
    fn default() -> Self {
        Self::new()
    }
}
