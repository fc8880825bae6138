//! Property tests over seeded generation and random play.

use burrow::{
    candidate_edge_count, path_length, BurrowError, BurrowResult, Direction, Dungeon,
    DungeonGenerator, GameState, GenerationConfig, Generator, ItemPlacer, KruskalMazeGenerator,
    MazeLayout, Position, SeededRandom, Smell,
};
use proptest::prelude::*;

fn direction() -> impl Strategy<Value = Direction> {
    prop_oneof![
        Just(Direction::North),
        Just(Direction::South),
        Just(Direction::East),
        Just(Direction::West),
    ]
}

fn dungeon_config() -> impl Strategy<Value = GenerationConfig> {
    (5_usize..10, 5_usize..10, any::<bool>(), 0_usize..4, 1_usize..4, 0_usize..3).prop_map(
        |(rows, cols, wrapping, interconnectivity, monsters, pits)| GenerationConfig {
            wrapping,
            interconnectivity,
            monsters,
            pits,
            spawn_attempts: 100,
            ..GenerationConfig::new(rows, cols)
        },
    )
}

/// Generation may legitimately fail on a sparse maze; everything else is a bug.
fn is_expected_failure(result: &BurrowResult<impl Sized>) -> bool {
    matches!(
        result,
        Err(BurrowError::PlacementImpossible(_)) | Err(BurrowError::UnreachableGoal { .. })
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn carved_mazes_span_the_grid(
        seed in any::<u64>(),
        rows in 2_usize..10,
        cols in 2_usize..10,
        wrapping in any::<bool>(),
        interconnectivity in 0_usize..6,
    ) {
        let spare = candidate_edge_count(rows, cols, wrapping) - (rows * cols - 1);
        prop_assume!(interconnectivity <= spare);

        let generator = KruskalMazeGenerator::new();
        let layout: MazeLayout = generator
            .carve(rows, cols, wrapping, interconnectivity, &mut SeededRandom::new(seed))
            .unwrap();
        let config = GenerationConfig {
            wrapping,
            interconnectivity,
            ..GenerationConfig::new(rows, cols)
        };

        prop_assert!(generator.validate(&layout, &config).is_ok());
        prop_assert_eq!(layout.unused_edges, spare - interconnectivity);
        prop_assert_eq!(
            layout.grid.cave_count() + layout.grid.tunnel_count(),
            rows * cols
        );
    }

    #[test]
    fn generated_dungeons_hold_their_invariants(
        seed in any::<u64>(),
        config in dungeon_config(),
    ) {
        let generator = DungeonGenerator::new();
        let result = generator.generate(&config, &mut SeededRandom::new(seed));
        prop_assume!(!is_expected_failure(&result));
        let dungeon: Dungeon = result.unwrap();
        let grid = &dungeon.grid;

        prop_assert!(generator.validate(&dungeon, &config).is_ok());

        let start = grid.get(dungeon.player.start()).unwrap();
        let goal = grid.get(dungeon.player.goal()).unwrap();
        prop_assert!(start.is_cave() && !start.is_pit() && start.is_start());
        prop_assert!(goal.is_cave() && !goal.is_pit() && goal.is_goal());
        prop_assert!(
            path_length(grid, start.position(), goal.position()).unwrap().unwrap() >= 5
        );

        prop_assert_eq!(grid.cells().filter(|cell| cell.is_pit()).count(), config.pits);
        let target = ItemPlacer::coverage_target(grid.cave_count(), config.treasure_coverage);
        prop_assert_eq!(
            grid.cells().filter(|cell| !cell.treasure().is_empty()).count(),
            target
        );
        prop_assert_eq!(grid.cells().filter(|cell| cell.arrows() > 0).count(), target);
        prop_assert_eq!(grid.cells().filter(|cell| cell.has_player()).count(), 1);
    }

    #[test]
    fn smell_matches_passage_distance(
        seed in any::<u64>(),
        config in dungeon_config(),
    ) {
        let result = GameState::new(config, Box::new(SeededRandom::new(seed)));
        prop_assume!(!is_expected_failure(&result));
        let game = result.unwrap();
        let grid = game.grid();

        for cell in grid.cells() {
            let mut adjacent = 0;
            let mut two_away = 0;
            for lair in grid.cells().filter(|other| other.living_monster().is_some()) {
                match path_length(grid, cell.position(), lair.position()).unwrap() {
                    Some(1) => adjacent += 1,
                    Some(2) => two_away += 1,
                    _ => {}
                }
            }
            let expected = if adjacent > 0 || two_away > 1 {
                Smell::Strong
            } else if two_away == 1 {
                Smell::Weak
            } else {
                Smell::None
            };
            prop_assert_eq!(game.smell_at(cell.position()).unwrap(), expected);
        }
    }

    #[test]
    fn random_play_keeps_the_world_consistent(
        seed in any::<u64>(),
        moves in prop::collection::vec((direction(), 0_usize..4, any::<bool>()), 1..40),
    ) {
        let result = GameState::new(GenerationConfig::for_testing(), Box::new(SeededRandom::new(seed)));
        prop_assume!(!is_expected_failure(&result));
        let mut game = result.unwrap();

        for (direction, distance, shoot) in moves {
            let was_over = game.is_game_over();
            let arrows = game.player().arrows();
            if shoot {
                let outcome = game.shoot(direction, distance);
                prop_assert_eq!(outcome.arrow_spent, !was_over && arrows > 0);
                if distance == 0 {
                    prop_assert!(!outcome.hit);
                }
            } else {
                let before = game.player().position();
                let outcome = game.move_player(direction);
                if was_over {
                    prop_assert_eq!(game.player().position(), before);
                }
                prop_assert_eq!(outcome.died(), !game.player().is_alive() && !was_over);
            }

            let position: Position = game.player().position();
            let flagged: Vec<Position> = game
                .grid()
                .cells()
                .filter(|cell| cell.has_player())
                .map(|cell| cell.position())
                .collect();
            prop_assert_eq!(flagged, vec![position]);
            prop_assert!(!was_over || game.is_game_over());
        }
    }
}
