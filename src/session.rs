use std::time::Duration;

use log::info;

use crate::config::{ConfigError, SimulationConfig, WallPolicy};
use crate::game::{RunState, Simulation, Snapshot, TickResult};
use crate::input::{Direction, InputController, Intent};
use crate::scheduler::Scheduler;
use crate::score::ScoreStore;

/// What the front-end should do after an intent.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Control {
    Continue,
    Quit,
}

/// One playable game: simulation, input debounce and tick scheduling.
///
/// Front-ends push intents in, call [`Game::frame`] once per rendered frame
/// and draw whatever [`Game::snapshot`] returns.
#[derive(Debug)]
pub struct Game {
    simulation: Simulation,
    input: InputController,
    scheduler: Scheduler,
}

impl Game {
    /// Wraps an already configured simulation.
    #[must_use]
    pub fn new(simulation: Simulation) -> Self {
        Self {
            simulation,
            input: InputController::new(),
            scheduler: Scheduler::default(),
        }
    }

    /// Builds a game whose wall setting comes from the store when present.
    pub fn from_store(
        mut config: SimulationConfig,
        store: Box<dyn ScoreStore>,
        seed: Option<u64>,
    ) -> Result<Self, ConfigError> {
        if let Some(policy) = store.wall_policy() {
            config.wall_policy = policy;
        }
        let simulation = match seed {
            Some(seed) => Simulation::new_with_seed(config, store, seed)?,
            None => Simulation::new(config, store)?,
        };
        Ok(Self::new(simulation))
    }

    /// Routes one player intent.
    pub fn handle_intent(&mut self, intent: Intent) -> Control {
        match intent {
            Intent::Direction(direction) => {
                self.propose(direction);
            }
            Intent::PauseOrRestart => self.pause_or_restart(),
            Intent::ToggleWalls => self.toggle_walls(),
            Intent::Quit => return Control::Quit,
        }
        Control::Continue
    }

    /// Buffers a direction change for the next tick. Returns whether it was
    /// accepted.
    pub fn propose(&mut self, direction: Direction) -> bool {
        if self.simulation.run_state() != RunState::Running {
            return false;
        }
        let snake = self.simulation.snake();
        self.input
            .propose(direction, snake.direction(), snake.len())
    }

    /// Starts, pauses, resumes or restarts depending on the run state.
    pub fn pause_or_restart(&mut self) {
        match self.simulation.run_state() {
            RunState::Idle => self.start(),
            RunState::Running | RunState::Paused => self.toggle_pause(),
            RunState::GameOver | RunState::Victory => self.restart(),
        }
    }

    pub fn start(&mut self) {
        if self.simulation.start() {
            self.scheduler.reset();
        }
    }

    pub fn toggle_pause(&mut self) {
        if self.simulation.toggle_pause() == RunState::Running {
            self.scheduler.reset();
        }
    }

    pub fn restart(&mut self) {
        self.simulation.restart();
        self.input.clear();
        self.scheduler.reset();
    }

    /// Flips the wall policy and remembers the choice.
    pub fn toggle_walls(&mut self) {
        let policy = self.simulation.wall_policy().toggled();
        self.set_wall_policy(policy);
    }

    pub fn set_wall_policy(&mut self, policy: WallPolicy) {
        self.simulation.set_wall_policy(policy);
        self.simulation.store_mut().set_wall_policy(policy);
        info!("walls {}", policy.label());
    }

    /// Feeds one frame's elapsed time and runs every tick that became due.
    pub fn frame(&mut self, frame_delta: Duration) -> Vec<TickResult> {
        let mut results = Vec::new();
        if self.simulation.run_state() != RunState::Running {
            return results;
        }

        self.scheduler.accumulate(frame_delta);
        while self.scheduler.consume_step(self.simulation.step_duration()) {
            let direction = self.input.take().unwrap_or(self.simulation.direction());
            let result = self.simulation.tick(direction);
            let finished = result.snapshot.run_state.is_finished();
            results.push(result);

            if finished {
                self.scheduler.reset();
                break;
            }
        }
        results
    }

    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        self.simulation.snapshot()
    }
}
