//! Replays fully scripted dungeons and plays them through the public command API.

use burrow::{
    BurrowError, BurrowResult, DeathCause, Direction, GameCompletionState, GameEvent, GameState,
    GenerationConfig, ItemKind, MoveOutcome, Position, ScriptedRandom, ShotOutcome, Smell,
    Treasure,
};

/// 6x8 wrapped dungeon with the start drawn at (0, 0) and the goal at (5, 4).
///
/// The identity shuffle turns row 0 into a corridor of caves; each of them also reaches
/// the bottom row through its wrapped northern passage.
fn wrapped_game() -> BurrowResult<GameState> {
    let config = GenerationConfig {
        wrapping: true,
        ..GenerationConfig::default()
    };
    GameState::new(
        config,
        Box::new(ScriptedRandom::new().with_bounds([0, 0, 5, 4])),
    )
}

fn walk(game: &mut GameState, direction: Direction, steps: usize) -> Vec<MoveOutcome> {
    (0..steps).map(|_| game.move_player(direction)).collect()
}

#[test]
fn test_plain_comb_dungeon() -> BurrowResult<()> {
    let game = GameState::new(GenerationConfig::default(), Box::new(ScriptedRandom::new()))?;
    let grid = game.grid();

    assert_eq!(game.edge_count(), 47);
    assert_eq!(grid.cave_count(), 14);
    assert_eq!(game.player().start(), Position::new(0, 1));
    assert_eq!(game.player().goal(), Position::new(5, 4));

    for col in 5..8 {
        assert!(grid.get(Position::new(5, col)).unwrap().is_pit());
    }
    for col in 4..8 {
        let monster = grid.get(Position::new(5, col)).unwrap().monster();
        assert_eq!(monster.map(|m| m.lives()), Some(2));
    }
    for col in 1..5 {
        let cell = grid.get(Position::new(0, col)).unwrap();
        assert_eq!(cell.treasure(), &[Treasure::Sapphire]);
        assert_eq!(cell.arrows(), 1);
    }
    assert!(grid
        .cells()
        .filter(|cell| cell.is_tunnel())
        .all(|cell| cell.treasure().is_empty() && cell.arrows() == 0 && !cell.is_pit()));

    assert_eq!(game.search_for_optimal_paths()?.len(), 9);
    Ok(())
}

#[test]
fn test_wrapped_fallback_spawn_is_rejected() {
    let config = GenerationConfig {
        wrapping: true,
        ..GenerationConfig::default()
    };
    let result = GameState::new(config, Box::new(ScriptedRandom::new()));
    assert!(matches!(
        result,
        Err(BurrowError::UnreachableGoal {
            length: 4,
            required: 5
        })
    ));
}

#[test]
fn test_wrapped_dungeon_layout() -> BurrowResult<()> {
    let game = wrapped_game()?;
    let grid = game.grid();

    assert_eq!(game.edge_count(), 47);
    assert_eq!(grid.cave_count(), 28);
    assert_eq!(game.player().position(), Position::new(0, 0));
    assert_eq!(game.player().goal(), Position::new(5, 4));

    let stocked: Vec<Position> = grid
        .cells()
        .filter(|cell| !cell.treasure().is_empty())
        .map(|cell| cell.position())
        .collect();
    let mut expected: Vec<Position> = (0..7).map(|col| Position::new(0, col)).collect();
    expected.push(Position::new(1, 0));
    assert_eq!(stocked, expected);
    assert!(grid.get(Position::new(0, 7)).unwrap().is_tunnel());

    let path = game.search_for_optimal_paths()?;
    assert_eq!(path.len(), 6);
    assert_eq!(path.last(), Some(&Position::new(5, 4)));
    Ok(())
}

#[test]
fn test_smell_along_the_corridor() -> BurrowResult<()> {
    let game = wrapped_game()?;
    assert_eq!(game.smell(), Smell::Weak);
    assert_eq!(game.smell_at(Position::new(0, 3))?, Smell::Weak);
    assert_eq!(game.smell_at(Position::new(0, 4))?, Smell::Strong);
    assert!(game.smell_at(Position::new(9, 9)).is_err());
    Ok(())
}

#[test]
fn test_walk_to_the_goal_guard() -> BurrowResult<()> {
    let mut game = wrapped_game()?;
    let outcomes = walk(&mut game, Direction::East, 4);
    assert!(outcomes.iter().all(|outcome| outcome.succeeded));
    assert_eq!(game.player().position(), Position::new(0, 4));
    assert_eq!(game.smell(), Smell::Strong);
    assert_eq!(game.statistics().moves_made, 4);

    // One move from the goal now.
    assert!(matches!(
        game.search_for_optimal_paths(),
        Err(BurrowError::UnreachableGoal {
            length: 1,
            required: 5
        })
    ));
    Ok(())
}

#[test]
fn test_healthy_monster_eats_player() -> BurrowResult<()> {
    let mut game = wrapped_game()?;
    walk(&mut game, Direction::East, 4);

    let outcome = game.move_player(Direction::North);
    assert!(outcome.died_to_monster);
    assert!(!outcome.succeeded);
    assert!(!game.player().is_alive());
    assert_eq!(
        game.completion_state(),
        GameCompletionState::Died(DeathCause::Monster)
    );
    Ok(())
}

#[test]
fn test_shoot_then_escape_to_goal() -> BurrowResult<()> {
    let mut game = wrapped_game()?;
    walk(&mut game, Direction::East, 4);

    let shot = game.shoot(Direction::North, 1);
    assert_eq!(
        shot,
        ShotOutcome {
            arrow_spent: true,
            hit: true,
            killed: false
        }
    );
    let goal = game.grid().get(Position::new(5, 4)).unwrap();
    assert_eq!(goal.monster().map(|m| m.lives()), Some(1));
    assert_eq!(game.player().arrows(), 2);

    // The wounded monster costs an escape roll; the script falls back to 99.
    let outcome = game.move_player(Direction::North);
    assert!(outcome.succeeded);
    assert!(outcome.reached_goal);
    assert_eq!(game.completion_state(), GameCompletionState::Escaped);
    assert!(game.is_game_over());

    let events = game.drain_events();
    assert!(events.contains(&GameEvent::MonsterHit {
        position: Position::new(5, 4),
        lives_left: 1
    }));
    assert!(events.contains(&GameEvent::EscapedMonster {
        position: Position::new(5, 4),
        roll: 99
    }));
    assert_eq!(
        events.last(),
        Some(&GameEvent::ReachedGoal {
            position: Position::new(5, 4)
        })
    );
    assert_eq!(game.statistics().monsters_escaped, 1);
    Ok(())
}

#[test]
fn test_two_hits_kill_the_guard() -> BurrowResult<()> {
    let mut game = wrapped_game()?;
    walk(&mut game, Direction::East, 4);

    assert!(!game.shoot(Direction::North, 1).killed);
    let second = game.shoot(Direction::North, 1);
    assert!(second.hit && second.killed);

    // A dead monster is not hit again.
    let third = game.shoot(Direction::North, 1);
    assert!(third.arrow_spent && !third.hit);
    assert_eq!(game.player().arrows(), 0);
    assert!(!game.shoot(Direction::North, 1).arrow_spent);

    let outcome = game.move_player(Direction::North);
    assert!(outcome.reached_goal);
    assert_eq!(game.statistics().monsters_killed, 1);
    assert_eq!(game.statistics().monsters_escaped, 0);
    Ok(())
}

#[test]
fn test_pit_kills_before_monster() -> BurrowResult<()> {
    let mut game = wrapped_game()?;
    walk(&mut game, Direction::East, 5);
    assert_eq!(game.player().position(), Position::new(0, 5));

    let outcome = game.move_player(Direction::North);
    assert!(outcome.died_in_pit);
    assert!(!outcome.died_to_monster);
    assert_eq!(
        game.completion_state(),
        GameCompletionState::Died(DeathCause::Pit)
    );
    Ok(())
}

#[test]
fn test_pickup_at_start() -> BurrowResult<()> {
    let mut game = wrapped_game()?;

    let treasure = game.pickup(ItemKind::Treasure);
    assert_eq!(treasure.treasure, vec![Treasure::Sapphire]);
    let arrows = game.pickup(ItemKind::Arrows);
    assert_eq!(arrows.arrows, 1);
    assert_eq!(game.player().arrows(), 4);

    let view = game.view();
    let start = view.cell(Position::new(0, 0)).unwrap();
    assert_eq!(start.treasure, 0);
    assert_eq!(start.arrows, 0);
    assert_eq!(view.player.treasure, vec![Treasure::Sapphire]);
    Ok(())
}

#[test]
fn test_commands_after_death_are_ignored() -> BurrowResult<()> {
    let mut game = wrapped_game()?;
    walk(&mut game, Direction::East, 5);
    game.move_player(Direction::North);
    assert!(game.is_game_over());
    game.drain_events();

    let position = game.player().position();
    assert_eq!(game.move_player(Direction::South), MoveOutcome::default());
    assert_eq!(game.shoot(Direction::South, 1), ShotOutcome::default());
    assert!(!game.pickup(ItemKind::Arrows).collected);
    assert_eq!(game.player().position(), position);
    assert_eq!(game.player().arrows(), 3);
    assert!(game.drain_events().is_empty());
    Ok(())
}

#[test]
fn test_restart_after_death() -> BurrowResult<()> {
    let mut game = wrapped_game()?;
    walk(&mut game, Direction::East, 4);
    game.move_player(Direction::North);
    assert!(game.is_game_over());

    game.restart();
    assert_eq!(game.completion_state(), GameCompletionState::Playing);
    assert_eq!(game.player().position(), Position::new(0, 0));
    assert!(game.player().is_alive());
    let guard = game.grid().get(Position::new(5, 4)).unwrap().monster();
    assert_eq!(guard.map(|m| m.lives()), Some(2));
    Ok(())
}
