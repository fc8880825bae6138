//! # Maze Carving
//!
//! Randomized Kruskal over the grid's candidate passages. The shuffled candidates are
//! walked once: a passage joining two still separate regions is carved, any other passage
//! is set aside. The first `interconnectivity` set-aside passages are carved afterwards,
//! each one closing a loop.

use crate::{
    is_connected, reachable_count, BurrowError, BurrowResult, CellKind, Direction,
    GenerationConfig, Generator, Grid, Position, RandomSource,
};
use log::debug;
use serde::{Deserialize, Serialize};

/// A candidate passage between two cells, leading from `from` to `to` in `direction`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    pub from: usize,
    pub to: usize,
    pub direction: Direction,
}

impl Edge {
    pub fn new(from: usize, to: usize, direction: Direction) -> Self {
        Self {
            from,
            to,
            direction,
        }
    }
}

/// Lists every candidate passage in generation order.
///
/// With wrapping, the wrap-around passages come first: for each cell in row-major order, a
/// top-row cell gets a northward passage to the bottom row and a left-column cell gets a
/// westward passage to the right column. Then every cell gets an eastward and a southward
/// passage to its in-grid neighbors. A dimension of size 1 has no wrap passages.
///
/// # Examples
///
/// ```
/// use burrow::candidate_edges;
///
/// assert_eq!(candidate_edges(2, 2, false).len(), 4);
/// assert_eq!(candidate_edges(3, 3, true).len(), 18);
/// ```
pub fn candidate_edges(rows: usize, cols: usize, wrapping: bool) -> Vec<Edge> {
    let index = |row: usize, col: usize| row * cols + col;
    let mut edges = Vec::with_capacity(candidate_edge_count(rows, cols, wrapping));

    if wrapping {
        for row in 0..rows {
            for col in 0..cols {
                if row == 0 && rows > 1 {
                    edges.push(Edge::new(
                        index(row, col),
                        index(rows - 1, col),
                        Direction::North,
                    ));
                }
                if col == 0 && cols > 1 {
                    edges.push(Edge::new(
                        index(row, col),
                        index(row, cols - 1),
                        Direction::West,
                    ));
                }
            }
        }
    }

    for row in 0..rows {
        for col in 0..cols {
            if col + 1 < cols {
                edges.push(Edge::new(index(row, col), index(row, col + 1), Direction::East));
            }
            if row + 1 < rows {
                edges.push(Edge::new(index(row, col), index(row + 1, col), Direction::South));
            }
        }
    }

    edges
}

/// Number of candidate passages [`candidate_edges`] would list.
pub fn candidate_edge_count(rows: usize, cols: usize, wrapping: bool) -> usize {
    if rows == 0 || cols == 0 {
        return 0;
    }
    let mut count = rows * (cols - 1) + (rows - 1) * cols;
    if wrapping {
        if rows > 1 {
            count += cols;
        }
        if cols > 1 {
            count += rows;
        }
    }
    count
}

/// A carved and classified maze, before anything is placed in it.
#[derive(Debug, Clone, PartialEq)]
pub struct MazeLayout {
    pub grid: Grid,
    /// Passages carved, counting the spanning tree and the extra loops
    pub edge_count: usize,
    /// Candidates left uncarved
    pub unused_edges: usize,
}

/// Maze generator using randomized Kruskal with optional extra loops.
#[derive(Debug, Clone, Copy, Default)]
pub struct KruskalMazeGenerator;

impl KruskalMazeGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Carves a maze over a fresh `rows` x `cols` grid and classifies its cells.
    ///
    /// Fails when fewer than `interconnectivity` candidates are left over after the
    /// spanning tree is complete.
    pub fn carve(
        &self,
        rows: usize,
        cols: usize,
        wrapping: bool,
        interconnectivity: usize,
        rng: &mut dyn RandomSource,
    ) -> BurrowResult<MazeLayout> {
        let mut grid = Grid::new(rows, cols);
        let mut edges = candidate_edges(rows, cols, wrapping);
        rng.shuffle(&mut edges);

        let mut edge_count = 0;
        let mut redundant = Vec::new();
        for edge in edges {
            if is_connected(&grid, edge.from, edge.to) {
                redundant.push(edge);
            } else {
                grid.connect(edge.from, edge.direction, edge.to);
                edge_count += 1;
            }
        }
        debug!(
            "Spanning tree carved with {} passages, {} candidates set aside",
            edge_count,
            redundant.len()
        );

        if interconnectivity > redundant.len() {
            return Err(BurrowError::InvalidConfig(format!(
                "interconnectivity {} exceeds the {} passages left after carving",
                interconnectivity,
                redundant.len()
            )));
        }

        for edge in &redundant[..interconnectivity] {
            grid.connect(edge.from, edge.direction, edge.to);
            edge_count += 1;
        }

        grid.classify();
        debug!(
            "Maze has {} caves and {} tunnels",
            grid.cave_count(),
            grid.tunnel_count()
        );

        Ok(MazeLayout {
            grid,
            edge_count,
            unused_edges: redundant.len() - interconnectivity,
        })
    }
}

impl Generator<MazeLayout> for KruskalMazeGenerator {
    fn generate(
        &self,
        config: &GenerationConfig,
        rng: &mut dyn RandomSource,
    ) -> BurrowResult<MazeLayout> {
        config.validate()?;
        self.carve(
            config.rows,
            config.cols,
            config.wrapping,
            config.interconnectivity,
            rng,
        )
    }

    fn validate(&self, layout: &MazeLayout, config: &GenerationConfig) -> BurrowResult<()> {
        let grid = &layout.grid;
        let reachable = reachable_count(grid, Position::origin())?;
        if reachable != grid.len() {
            return Err(BurrowError::InvalidState(format!(
                "only {} of {} cells are reachable",
                reachable,
                grid.len()
            )));
        }

        let expected = grid.len() - 1 + config.interconnectivity;
        if layout.edge_count != expected {
            return Err(BurrowError::InvalidState(format!(
                "maze has {} passages, expected {}",
                layout.edge_count, expected
            )));
        }

        if let Some(cell) = grid
            .cells()
            .find(|cell| cell.kind() != CellKind::from_passages(cell.passage_count()))
        {
            return Err(BurrowError::InvalidState(format!(
                "cell {} is misclassified",
                cell.position()
            )));
        }

        Ok(())
    }

    fn generator_type(&self) -> &'static str {
        "KruskalMazeGenerator"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ScriptedRandom, SeededRandom};

    #[test]
    fn test_candidate_order() {
        let edges = candidate_edges(2, 2, true);
        assert_eq!(
            edges,
            vec![
                Edge::new(0, 2, Direction::North),
                Edge::new(0, 1, Direction::West),
                Edge::new(1, 3, Direction::North),
                Edge::new(2, 3, Direction::West),
                Edge::new(0, 1, Direction::East),
                Edge::new(0, 2, Direction::South),
                Edge::new(1, 3, Direction::South),
                Edge::new(2, 3, Direction::East),
            ]
        );
    }

    #[test]
    fn test_candidate_counts() {
        for (rows, cols, wrapping) in [(6, 8, false), (6, 8, true), (1, 5, true), (1, 1, true)] {
            assert_eq!(
                candidate_edges(rows, cols, wrapping).len(),
                candidate_edge_count(rows, cols, wrapping)
            );
        }
        assert_eq!(candidate_edge_count(6, 8, false), 82);
        assert_eq!(candidate_edge_count(6, 8, true), 96);
        // No self-loops along a single row.
        assert_eq!(candidate_edge_count(1, 5, true), 5);
    }

    #[test]
    fn test_identity_shuffle_carves_comb() {
        let generator = KruskalMazeGenerator::new();
        let mut rng = ScriptedRandom::new();
        let layout = generator.carve(6, 8, false, 0, &mut rng).unwrap();

        assert_eq!(layout.edge_count, 47);
        assert_eq!(layout.unused_edges, 35);
        // Top row is a corridor, every column hangs off it.
        assert_eq!(layout.grid.cave_count(), 14);
        assert!(layout.grid.get(Position::new(5, 3)).unwrap().is_cave());
        assert!(layout.grid.get(Position::new(2, 3)).unwrap().is_tunnel());
    }

    #[test]
    fn test_interconnectivity_adds_loops() {
        let generator = KruskalMazeGenerator::new();
        let config = GenerationConfig {
            interconnectivity: 5,
            ..GenerationConfig::new(5, 5)
        };
        let layout = generator
            .generate(&config, &mut SeededRandom::new(99))
            .unwrap();
        assert_eq!(layout.edge_count, 24 + 5);
        assert!(generator.validate(&layout, &config).is_ok());
    }

    #[test]
    fn test_too_much_interconnectivity_fails() {
        let generator = KruskalMazeGenerator::new();
        let mut rng = ScriptedRandom::new();
        let result = generator.carve(2, 2, false, 2, &mut rng);
        assert!(matches!(result, Err(BurrowError::InvalidConfig(_))));
    }

    #[test]
    fn test_seeded_mazes_are_connected() {
        let generator = KruskalMazeGenerator::new();
        for seed in 0..20 {
            let config = GenerationConfig {
                wrapping: seed % 2 == 0,
                ..GenerationConfig::new(7, 9)
            };
            let layout = generator
                .generate(&config, &mut SeededRandom::new(seed))
                .unwrap();
            assert!(generator.validate(&layout, &config).is_ok());
        }
        assert_eq!(generator.generator_type(), "KruskalMazeGenerator");
    }
}
