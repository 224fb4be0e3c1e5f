use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use serde::{Deserialize, Serialize};

/// Canonical movement directions for snake input.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Returns the opposite direction.
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Unit vector in grid coordinates, y growing downward.
    #[must_use]
    pub fn delta(self) -> (i32, i32) {
        match self {
            Self::Up => (0, -1),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
        }
    }

    /// Maps a raw vector to a direction; diagonals and the zero vector are
    /// not directions.
    #[must_use]
    pub fn from_delta(dx: i32, dy: i32) -> Option<Self> {
        match (dx, dy) {
            (0, -1) => Some(Self::Up),
            (0, 1) => Some(Self::Down),
            (-1, 0) => Some(Self::Left),
            (1, 0) => Some(Self::Right),
            _ => None,
        }
    }
}

/// Player intents arriving from keyboard or pointer sources.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Intent {
    Direction(Direction),
    PauseOrRestart,
    ToggleWalls,
    Quit,
}

/// Returns whether a direction change is legal (no immediate 180° turns).
#[must_use]
pub fn direction_change_is_valid(current: Direction, next: Direction) -> bool {
    next != current.opposite()
}

/// Accepts at most one direction change between two ticks.
///
/// Reversals are judged against the direction the snake is actually moving
/// in, never against a buffered one, so two quick turns cannot fold the head
/// back into the neck.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub struct InputController {
    pending: Option<Direction>,
}

impl InputController {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Buffers `direction` for the next tick. Returns whether it was accepted.
    pub fn propose(&mut self, direction: Direction, active: Direction, snake_len: usize) -> bool {
        if self.pending.is_some() {
            return false;
        }
        if snake_len > 1 && !direction_change_is_valid(active, direction) {
            return false;
        }

        self.pending = Some(direction);
        true
    }

    /// Takes the buffered direction at a tick boundary and unlocks input.
    pub fn take(&mut self) -> Option<Direction> {
        self.pending.take()
    }

    #[must_use]
    pub fn pending(&self) -> Option<Direction> {
        self.pending
    }

    pub fn clear(&mut self) {
        self.pending = None;
    }
}

/// Translates a terminal key press into an intent.
#[must_use]
pub fn intent_for_key(key: KeyEvent) -> Option<Intent> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Intent::Quit);
    }

    let intent = match key.code {
        KeyCode::Up | KeyCode::Char('w' | 'k') => Intent::Direction(Direction::Up),
        KeyCode::Down | KeyCode::Char('s' | 'j') => Intent::Direction(Direction::Down),
        KeyCode::Left | KeyCode::Char('a' | 'h') => Intent::Direction(Direction::Left),
        KeyCode::Right | KeyCode::Char('d' | 'l') => Intent::Direction(Direction::Right),
        KeyCode::Char(' ' | 'p') | KeyCode::Enter => Intent::PauseOrRestart,
        KeyCode::Char('t') => Intent::ToggleWalls,
        KeyCode::Char('q') | KeyCode::Esc => Intent::Quit,
        _ => return None,
    };
    Some(intent)
}
