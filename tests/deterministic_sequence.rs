use std::time::Duration;

use snake_evolution::config::{GridSize, SimulationConfig, WallPolicy};
use snake_evolution::food::Food;
use snake_evolution::game::{DeathReason, Layout, RunState, Simulation, TickOutcome};
use snake_evolution::input::{Direction, Intent};
use snake_evolution::score::{MemoryStore, ScoreStore};
use snake_evolution::session::Game;
use snake_evolution::snake::{Position, Snake};

const STEP: Duration = Duration::from_millis(125);

fn config(width: u16, height: u16, wall_policy: WallPolicy) -> SimulationConfig {
    SimulationConfig {
        grid: GridSize { width, height },
        wall_policy,
        bonus: None,
        ..SimulationConfig::default()
    }
}

fn started(config: SimulationConfig, snake: Snake, food: Position) -> Simulation {
    let mut simulation = Simulation::with_layout(
        config,
        Box::new(MemoryStore::default()),
        42,
        Layout {
            snake,
            food,
            bonus: None,
        },
    )
    .expect("layout is valid");
    simulation.start();
    simulation
}

fn three_cell_snake() -> Snake {
    Snake::from_segments(
        vec![
            Position { x: 5, y: 5 },
            Position { x: 4, y: 5 },
            Position { x: 3, y: 5 },
        ],
        Direction::Right,
    )
}

#[test]
fn plain_tick_slides_the_snake_forward() {
    let mut simulation = started(
        config(10, 10, WallPolicy::Wrapping),
        three_cell_snake(),
        Position { x: 0, y: 9 },
    );

    let result = simulation.tick(Direction::Right);

    assert_eq!(result.outcome, TickOutcome::Continued);
    assert_eq!(
        result.snapshot.snake,
        vec![
            Position { x: 6, y: 5 },
            Position { x: 5, y: 5 },
            Position { x: 4, y: 5 },
        ]
    );
}

#[test]
fn eating_keeps_the_old_tail_and_moves_the_food() {
    let mut simulation = started(
        config(10, 10, WallPolicy::Wrapping),
        three_cell_snake(),
        Position { x: 6, y: 5 },
    );

    let result = simulation.tick(Direction::Right);

    assert_eq!(result.outcome, TickOutcome::AteNormal);
    assert_eq!(
        result.snapshot.snake,
        vec![
            Position { x: 6, y: 5 },
            Position { x: 5, y: 5 },
            Position { x: 4, y: 5 },
            Position { x: 3, y: 5 },
        ]
    );
    assert_eq!(result.snapshot.score, 1);
    assert!(!result.snapshot.snake.contains(&result.snapshot.food));
}

#[test]
fn crossing_a_blocking_wall_ends_the_run() {
    let mut simulation = started(
        config(5, 5, WallPolicy::Blocking),
        Snake::new(Position { x: 4, y: 2 }, Direction::Right),
        Position { x: 0, y: 0 },
    );

    let result = simulation.tick(Direction::Right);

    assert_eq!(
        result.outcome,
        TickOutcome::GameOver(DeathReason::WallCollision)
    );
    assert_eq!(result.snapshot.run_state, RunState::GameOver);
    assert_eq!(result.snapshot.snake, vec![Position { x: 4, y: 2 }]);
}

#[test]
fn wrapping_keeps_every_head_inside_the_grid() {
    let grid = GridSize {
        width: 7,
        height: 4,
    };
    let mut simulation = started(
        config(grid.width, grid.height, WallPolicy::Wrapping),
        Snake::new(Position { x: 0, y: 0 }, Direction::Left),
        Position { x: 3, y: 2 },
    );

    for direction in [Direction::Left, Direction::Up, Direction::Up, Direction::Right] {
        for _ in 0..9 {
            let result = simulation.tick(direction);
            let head = result.snapshot.snake[0];
            assert!(head.is_within_bounds(grid), "{head:?} escaped the grid");
        }
    }
}

#[test]
fn reversal_is_rejected_through_the_game() {
    let simulation = started(
        config(10, 10, WallPolicy::Blocking),
        Snake::from_segments(
            vec![
                Position { x: 2, y: 2 },
                Position { x: 2, y: 3 },
                Position { x: 2, y: 4 },
            ],
            Direction::Up,
        ),
        Position { x: 8, y: 8 },
    );
    let mut game = Game::new(simulation);

    assert!(!game.propose(Direction::Down));
    game.frame(STEP);

    let snapshot = game.snapshot();
    assert_eq!(snapshot.direction, Direction::Up);
    assert_eq!(snapshot.snake[0], Position { x: 2, y: 1 });
}

#[test]
fn stepwise_session_collects_food_and_hits_wall() {
    let simulation = started(
        config(6, 4, WallPolicy::Blocking),
        Snake::new(Position { x: 1, y: 1 }, Direction::Right),
        Position { x: 2, y: 1 },
    );
    let mut game = Game::new(simulation);

    let results = game.frame(STEP);
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].outcome, TickOutcome::AteNormal);
    assert_eq!(game.snapshot().snake.len(), 2);

    game.handle_intent(Intent::Direction(Direction::Up));
    game.frame(STEP);
    assert_eq!(game.snapshot().snake[0], Position { x: 2, y: 0 });

    let results = game.frame(STEP);
    assert_eq!(
        results[0].outcome,
        TickOutcome::GameOver(DeathReason::WallCollision)
    );
    assert!(game.frame(STEP).is_empty());
}

#[test]
fn high_score_never_decreases_across_runs() {
    let mut simulation = Simulation::with_layout(
        config(10, 10, WallPolicy::Blocking),
        Box::new(MemoryStore::with_high_score(3)),
        8,
        Layout {
            snake: Snake::new(Position { x: 8, y: 1 }, Direction::Right),
            food: Position { x: 0, y: 0 },
            bonus: None,
        },
    )
    .expect("layout is valid");
    simulation.start();

    simulation.tick(Direction::Right);
    simulation.tick(Direction::Right);
    assert_eq!(simulation.run_state(), RunState::GameOver);
    assert_eq!(simulation.high_score(), 3);

    simulation.restart();
    assert_eq!(simulation.score(), 0);
    assert_eq!(simulation.high_score(), 3);
    assert_eq!(simulation.store_mut().high_score(), 3);
}

#[test]
fn respawned_food_never_lands_on_the_live_bonus() {
    let bonus_cell = Position { x: 2, y: 1 };
    let config = SimulationConfig {
        initial_length: 1,
        ..config(3, 2, WallPolicy::Wrapping)
    };

    for seed in 0..64 {
        let mut simulation = Simulation::with_layout(
            config,
            Box::new(MemoryStore::default()),
            seed,
            Layout {
                snake: Snake::new(Position { x: 0, y: 0 }, Direction::Right),
                food: Position { x: 1, y: 0 },
                bonus: Some(Food::bonus(bonus_cell, 5, 100)),
            },
        )
        .expect("layout is valid");
        simulation.start();

        let result = simulation.tick(Direction::Right);

        assert_eq!(result.outcome, TickOutcome::AteNormal);
        let bonus = result.snapshot.bonus.expect("bonus stays on the board");
        assert_eq!(bonus.position, bonus_cell);
        assert_ne!(result.snapshot.food, bonus.position, "seed {seed}");
        assert!(!result.snapshot.snake.contains(&result.snapshot.food));
    }
}
