use std::collections::HashSet;
use std::time::Duration;

use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;

use crate::audio::SoundCue;
use crate::config::{ConfigError, GridSize, SimulationConfig, WallPolicy};
use crate::food::{spawn_position, Food};
use crate::input::Direction;
use crate::score::ScoreStore;
use crate::snake::{Position, Snake};

/// Current high-level gameplay state.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    Idle,
    Running,
    Paused,
    GameOver,
    /// The snake filled the board.
    Victory,
}

impl RunState {
    #[must_use]
    pub fn is_finished(self) -> bool {
        matches!(self, Self::GameOver | Self::Victory)
    }
}

/// Reason the current run ended.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeathReason {
    WallCollision,
    SelfCollision,
}

/// What a single tick did.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TickOutcome {
    /// The run was not active; nothing moved.
    Skipped,
    Continued,
    AteNormal,
    AteBonus,
    GameOver(DeathReason),
}

/// Bonus food as seen by collaborators.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
pub struct BonusView {
    pub position: Position,
    pub points: u32,
    pub remaining_ticks: u64,
}

/// Read-only copy of everything a renderer or HUD needs.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct Snapshot {
    pub grid: GridSize,
    pub wall_policy: WallPolicy,
    /// Head first.
    pub snake: Vec<Position>,
    pub direction: Direction,
    pub food: Position,
    pub bonus: Option<BonusView>,
    pub score: u32,
    pub high_score: u32,
    pub level: u32,
    pub moves_per_second: u32,
    pub run_state: RunState,
    pub death_reason: Option<DeathReason>,
    pub tick_count: u64,
}

/// Result of [`Simulation::tick`].
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct TickResult {
    pub outcome: TickOutcome,
    pub bonus_spawned: bool,
    pub bonus_expired: bool,
    pub level_up: bool,
    pub snapshot: Snapshot,
}

impl TickResult {
    /// Sound effects this tick asks for, in play order.
    pub fn cues(&self) -> impl Iterator<Item = SoundCue> {
        let outcome_cue = match self.outcome {
            TickOutcome::AteNormal => Some(SoundCue::Eat),
            TickOutcome::AteBonus => Some(SoundCue::Bonus),
            TickOutcome::GameOver(_) => Some(SoundCue::Collision),
            TickOutcome::Skipped | TickOutcome::Continued => None,
        };
        let spawn_cue = self.bonus_spawned.then_some(SoundCue::BonusSpawn);

        outcome_cue.into_iter().chain(spawn_cue)
    }
}

/// Explicit starting arrangement, validated like a config.
#[derive(Debug, Clone)]
pub struct Layout {
    pub snake: Snake,
    pub food: Position,
    pub bonus: Option<Food>,
}

/// Per-run mutable state. Replaced wholesale on restart.
#[derive(Debug, Clone)]
pub struct SimulationState {
    snake: Snake,
    food: Food,
    bonus: Option<Food>,
    score: u32,
    level: u32,
    foods_eaten: u32,
    tick_count: u64,
    run_state: RunState,
    death_reason: Option<DeathReason>,
}

impl SimulationState {
    fn fresh(snake: Snake, food: Food, bonus: Option<Food>) -> Self {
        Self {
            snake,
            food,
            bonus,
            score: 0,
            level: 1,
            foods_eaten: 0,
            tick_count: 0,
            run_state: RunState::Idle,
            death_reason: None,
        }
    }
}

/// Owns one game: snake, food, scoring and the tick rules.
#[derive(Debug)]
pub struct Simulation {
    config: SimulationConfig,
    state: SimulationState,
    high_score: u32,
    rng: StdRng,
    store: Box<dyn ScoreStore>,
}

impl Simulation {
    /// Creates an idle simulation seeded from OS entropy.
    pub fn new(config: SimulationConfig, store: Box<dyn ScoreStore>) -> Result<Self, ConfigError> {
        Self::build(config, store, StdRng::from_entropy())
    }

    /// Creates a deterministic simulation for tests and replays.
    pub fn new_with_seed(
        config: SimulationConfig,
        store: Box<dyn ScoreStore>,
        seed: u64,
    ) -> Result<Self, ConfigError> {
        Self::build(config, store, StdRng::seed_from_u64(seed))
    }

    /// Creates a deterministic simulation starting from `layout` instead of
    /// the default centred snake.
    pub fn with_layout(
        config: SimulationConfig,
        store: Box<dyn ScoreStore>,
        seed: u64,
        layout: Layout,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        validate_layout(config.grid, &layout)?;

        let high_score = store.high_score();
        Ok(Self {
            config,
            state: SimulationState::fresh(layout.snake, Food::normal(layout.food), layout.bonus),
            high_score,
            rng: StdRng::seed_from_u64(seed),
            store,
        })
    }

    fn build(
        config: SimulationConfig,
        store: Box<dyn ScoreStore>,
        mut rng: StdRng,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let state = initial_state(&config, &mut rng)?;
        let high_score = store.high_score();
        Ok(Self {
            config,
            state,
            high_score,
            rng,
            store,
        })
    }

    /// Idle -> Running. Returns whether the run started.
    pub fn start(&mut self) -> bool {
        if self.state.run_state != RunState::Idle {
            return false;
        }
        self.state.run_state = RunState::Running;
        info!("run started on {:?} grid", self.config.grid);
        true
    }

    /// Running <-> Paused; other states are left alone.
    pub fn toggle_pause(&mut self) -> RunState {
        self.state.run_state = match self.state.run_state {
            RunState::Running => RunState::Paused,
            RunState::Paused => RunState::Running,
            other => other,
        };
        self.state.run_state
    }

    /// Throws the current run away and starts a new one immediately.
    pub fn restart(&mut self) {
        // Only fails for a config that never passed validation.
        match initial_state(&self.config, &mut self.rng) {
            Ok(mut state) => {
                state.run_state = RunState::Running;
                self.state = state;
                info!("run restarted, high score {}", self.high_score);
            }
            Err(error) => warn!("restart refused: {error}"),
        }
    }

    pub fn set_wall_policy(&mut self, policy: WallPolicy) {
        self.config.wall_policy = policy;
    }

    #[must_use]
    pub fn wall_policy(&self) -> WallPolicy {
        self.config.wall_policy
    }

    /// Advances the run by exactly one step in `direction`.
    pub fn tick(&mut self, direction: Direction) -> TickResult {
        if self.state.run_state != RunState::Running {
            return self.result(TickOutcome::Skipped, false, false, false);
        }

        let state = &mut self.state;
        state.tick_count += 1;

        let active = state.snake.direction();
        // A reversal would fold the head into the neck.
        let direction = if state.snake.len() > 1 && direction == active.opposite() {
            active
        } else {
            direction
        };
        state.snake.set_direction(direction);

        let bounds = self.config.grid;
        let mut new_head = state.snake.head().step(direction);
        match self.config.wall_policy {
            WallPolicy::Blocking if !new_head.is_within_bounds(bounds) => {
                return self.end_run(DeathReason::WallCollision);
            }
            WallPolicy::Blocking => {}
            WallPolicy::Wrapping => new_head = new_head.wrapped(bounds),
        }

        let eats_food = new_head == state.food.position;
        let eats_bonus = state.bonus.is_some_and(|bonus| bonus.position == new_head);
        let will_grow = eats_food || eats_bonus;

        if state.snake.would_collide(new_head, will_grow) {
            return self.end_run(DeathReason::SelfCollision);
        }

        state.snake.advance(new_head, direction, will_grow);

        let mut outcome = TickOutcome::Continued;
        let mut bonus_spawned = false;
        let mut bonus_expired = false;
        let previous_level = state.level;

        if eats_bonus {
            if let Some(bonus) = state.bonus.take() {
                state.score += bonus.points;
            }
            outcome = TickOutcome::AteBonus;
        } else if eats_food {
            state.score += state.food.points;
            state.foods_eaten += 1;
            outcome = TickOutcome::AteNormal;

            match self.spawn_item(&[]) {
                Some(position) => self.state.food = Food::normal(position),
                // The live bonus holds the last free cell: food takes it over.
                None => match self.state.bonus.take() {
                    Some(bonus) => {
                        self.state.food = Food::normal(bonus.position);
                        debug!("food replaced the bonus at {:?}", bonus.position);
                    }
                    None => {
                        self.state.run_state = RunState::Victory;
                        info!("board filled, final score {}", self.state.score);
                    }
                },
            }
            bonus_spawned = self.maybe_spawn_bonus();
        }

        let state = &mut self.state;
        if let Some(bonus) = state.bonus {
            if bonus.is_expired(state.tick_count) {
                state.bonus = None;
                bonus_expired = true;
                debug!("bonus at {:?} expired", bonus.position);
            }
        }

        state.level = 1 + state.score / self.config.points_per_level;
        let level_up = state.level != previous_level;
        if level_up {
            debug!(
                "level {} reached, {} moves/s",
                self.state.level,
                self.moves_per_second()
            );
        }

        if self.state.score > self.high_score {
            self.high_score = self.state.score;
            self.store.set_high_score(self.high_score);
        }

        self.result(outcome, bonus_spawned, bonus_expired, level_up)
    }

    fn end_run(&mut self, reason: DeathReason) -> TickResult {
        self.state.run_state = RunState::GameOver;
        self.state.death_reason = Some(reason);
        info!(
            "game over ({reason:?}) with score {} after {} ticks",
            self.state.score, self.state.tick_count
        );
        self.result(TickOutcome::GameOver(reason), false, false, false)
    }

    fn maybe_spawn_bonus(&mut self) -> bool {
        let Some(bonus_config) = self.config.bonus else {
            return false;
        };
        if self.state.run_state != RunState::Running
            || self.state.bonus.is_some()
            || self.state.foods_eaten % bonus_config.every_n_foods != 0
        {
            return false;
        }

        let food = self.state.food.position;
        let Some(position) = self.spawn_item(&[food]) else {
            return false;
        };
        let expires_at_tick = self.state.tick_count + bonus_config.lifetime_ticks;
        self.state.bonus = Some(Food::bonus(position, bonus_config.points, expires_at_tick));
        debug!("bonus spawned at {position:?} until tick {expires_at_tick}");
        true
    }

    /// Picks a free cell, avoiding the snake, the live bonus and `extra`.
    fn spawn_item(&mut self, extra: &[Position]) -> Option<Position> {
        let mut exclude: HashSet<Position> = self.state.snake.segments().copied().collect();
        exclude.extend(self.state.bonus.map(|bonus| bonus.position));
        exclude.extend(extra.iter().copied());
        spawn_position(&mut self.rng, self.config.grid, &exclude)
    }

    fn result(
        &self,
        outcome: TickOutcome,
        bonus_spawned: bool,
        bonus_expired: bool,
        level_up: bool,
    ) -> TickResult {
        TickResult {
            outcome,
            bonus_spawned,
            bonus_expired,
            level_up,
            snapshot: self.snapshot(),
        }
    }

    /// Copies out the state a renderer needs for one frame.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        let state = &self.state;
        Snapshot {
            grid: self.config.grid,
            wall_policy: self.config.wall_policy,
            snake: state.snake.segments().copied().collect(),
            direction: state.snake.direction(),
            food: state.food.position,
            bonus: state.bonus.map(|bonus| BonusView {
                position: bonus.position,
                points: bonus.points,
                remaining_ticks: bonus.remaining_ticks(state.tick_count).unwrap_or(0),
            }),
            score: state.score,
            high_score: self.high_score,
            level: state.level,
            moves_per_second: self.moves_per_second(),
            run_state: state.run_state,
            death_reason: state.death_reason,
            tick_count: state.tick_count,
        }
    }

    /// Moves per second at the current level.
    #[must_use]
    pub fn moves_per_second(&self) -> u32 {
        let bonus_speed = (self.state.level - 1).saturating_mul(self.config.moves_per_second_step);
        self.config
            .base_moves_per_second
            .saturating_add(bonus_speed)
            .min(self.config.max_moves_per_second)
    }

    /// Time between two ticks at the current level.
    #[must_use]
    pub fn step_duration(&self) -> Duration {
        Duration::from_secs(1) / self.moves_per_second()
    }

    #[must_use]
    pub fn run_state(&self) -> RunState {
        self.state.run_state
    }

    #[must_use]
    pub fn death_reason(&self) -> Option<DeathReason> {
        self.state.death_reason
    }

    #[must_use]
    pub fn direction(&self) -> Direction {
        self.state.snake.direction()
    }

    #[must_use]
    pub fn snake(&self) -> &Snake {
        &self.state.snake
    }

    #[must_use]
    pub fn food(&self) -> Food {
        self.state.food
    }

    #[must_use]
    pub fn bonus(&self) -> Option<Food> {
        self.state.bonus
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.state.score
    }

    #[must_use]
    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    #[must_use]
    pub fn level(&self) -> u32 {
        self.state.level
    }

    #[must_use]
    pub fn tick_count(&self) -> u64 {
        self.state.tick_count
    }

    #[must_use]
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Gives the persistence collaborator back, e.g. to store settings.
    pub fn store_mut(&mut self) -> &mut dyn ScoreStore {
        self.store.as_mut()
    }
}

fn initial_state(
    config: &SimulationConfig,
    rng: &mut StdRng,
) -> Result<SimulationState, ConfigError> {
    let GridSize { width, height } = config.grid;
    let head = Position {
        x: i32::from(width / 2),
        y: i32::from(height / 2),
    };
    let snake = Snake::straight(head, Direction::Right, config.initial_length);

    let exclude: HashSet<Position> = snake.segments().copied().collect();
    let food = spawn_position(rng, config.grid, &exclude)
        .ok_or(ConfigError::NoRoomForFood { width, height })?;

    Ok(SimulationState::fresh(snake, Food::normal(food), None))
}

fn validate_layout(grid: GridSize, layout: &Layout) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();
    for cell in layout.snake.segments() {
        if !cell.is_within_bounds(grid) {
            return Err(ConfigError::SnakeOutsideGrid {
                x: cell.x,
                y: cell.y,
            });
        }
        if !seen.insert(*cell) {
            return Err(ConfigError::SnakeOverlapsItself {
                x: cell.x,
                y: cell.y,
            });
        }
    }

    let items = std::iter::once(layout.food).chain(layout.bonus.map(|bonus| bonus.position));
    for item in items {
        if !item.is_within_bounds(grid) || seen.contains(&item) {
            return Err(ConfigError::FoodMisplaced {
                x: item.x,
                y: item.y,
            });
        }
        seen.insert(item);
    }
    Ok(())
}
