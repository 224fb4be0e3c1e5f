use std::time::Duration;

use ratatui::style::Color;
use ratatui::symbols::border;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default board width in cells.
pub const DEFAULT_GRID_WIDTH: u16 = 24;

/// Default board height in cells.
pub const DEFAULT_GRID_HEIGHT: u16 = 24;

/// Default moves per second at level 1.
pub const DEFAULT_MOVES_PER_SECOND: u32 = 8;

/// Moves per second added for each level above 1.
pub const MOVES_PER_SECOND_STEP: u32 = 1;

/// Upper bound on moves per second.
pub const MAX_MOVES_PER_SECOND: u32 = 20;

/// Fastest rate whose step is still at least one nanosecond.
pub const FASTEST_SUPPORTED_MOVES_PER_SECOND: u32 = 1_000_000_000;

/// Score needed per level increase.
pub const POINTS_PER_LEVEL: u32 = 5;

/// Length of a freshly spawned snake.
pub const INITIAL_SNAKE_LENGTH: usize = 3;

/// Longest frame delta the scheduler will accept in one go.
pub const MAX_FRAME_DELTA: Duration = Duration::from_millis(250);

/// Logical grid dimensions passed through the game as a named type.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub struct GridSize {
    pub width: u16,
    pub height: u16,
}

impl GridSize {
    /// Returns the total number of cells in the grid.
    #[must_use]
    pub fn total_cells(self) -> usize {
        usize::from(self.width) * usize::from(self.height)
    }
}

/// What happens when the head crosses a board edge.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WallPolicy {
    /// Crossing an edge ends the run.
    #[default]
    Blocking,
    /// Crossing an edge re-enters on the opposite side.
    Wrapping,
}

impl WallPolicy {
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Blocking => Self::Wrapping,
            Self::Wrapping => Self::Blocking,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Blocking => "ON",
            Self::Wrapping => "OFF",
        }
    }
}

/// Time-limited bonus food settings.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct BonusConfig {
    /// A bonus appears after every N normal foods eaten.
    pub every_n_foods: u32,
    /// Ticks a bonus stays on the board before it disappears.
    pub lifetime_ticks: u64,
    pub points: u32,
}

impl Default for BonusConfig {
    fn default() -> Self {
        Self {
            every_n_foods: 5,
            lifetime_ticks: 50,
            points: 5,
        }
    }
}

/// Everything a [`crate::game::Simulation`] needs to set up a run.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct SimulationConfig {
    pub grid: GridSize,
    pub wall_policy: WallPolicy,
    pub base_moves_per_second: u32,
    pub moves_per_second_step: u32,
    pub max_moves_per_second: u32,
    pub points_per_level: u32,
    pub initial_length: usize,
    /// `None` disables bonus food entirely.
    pub bonus: Option<BonusConfig>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            grid: GridSize {
                width: DEFAULT_GRID_WIDTH,
                height: DEFAULT_GRID_HEIGHT,
            },
            wall_policy: WallPolicy::Blocking,
            base_moves_per_second: DEFAULT_MOVES_PER_SECOND,
            moves_per_second_step: MOVES_PER_SECOND_STEP,
            max_moves_per_second: MAX_MOVES_PER_SECOND,
            points_per_level: POINTS_PER_LEVEL,
            initial_length: INITIAL_SNAKE_LENGTH,
            bonus: Some(BonusConfig::default()),
        }
    }
}

/// Setup mistakes caught before a run starts.
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum ConfigError {
    #[error("grid dimensions must be positive, got {width}x{height}")]
    EmptyGrid { width: u16, height: u16 },
    #[error("a {length}-cell snake does not fit left of the centre of a {width}-wide grid")]
    SnakeDoesNotFit { length: usize, width: u16 },
    #[error("grid {width}x{height} leaves no free cell for food")]
    NoRoomForFood { width: u16, height: u16 },
    #[error("initial snake length must be at least 1")]
    EmptySnake,
    #[error("moves per second must be between 1 and 1000000000 (base {base}, max {max})")]
    InvalidSpeed { base: u32, max: u32 },
    #[error("points per level must be positive")]
    ZeroPointsPerLevel,
    #[error("bonus food needs a positive interval and lifetime")]
    InvalidBonus,
    #[error("snake cell ({x}, {y}) lies outside the grid")]
    SnakeOutsideGrid { x: i32, y: i32 },
    #[error("snake occupies cell ({x}, {y}) twice")]
    SnakeOverlapsItself { x: i32, y: i32 },
    #[error("food at ({x}, {y}) is off the board or under the snake")]
    FoodMisplaced { x: i32, y: i32 },
}

impl SimulationConfig {
    /// Checks the invariants a run relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let GridSize { width, height } = self.grid;
        if width == 0 || height == 0 {
            return Err(ConfigError::EmptyGrid { width, height });
        }
        if self.initial_length == 0 {
            return Err(ConfigError::EmptySnake);
        }
        // Body trails leftward from the centre cell.
        if usize::from(width / 2) + 1 < self.initial_length {
            return Err(ConfigError::SnakeDoesNotFit {
                length: self.initial_length,
                width,
            });
        }
        if self.grid.total_cells() <= self.initial_length {
            return Err(ConfigError::NoRoomForFood { width, height });
        }
        if self.base_moves_per_second == 0
            || self.max_moves_per_second < self.base_moves_per_second
            || self.max_moves_per_second > FASTEST_SUPPORTED_MOVES_PER_SECOND
        {
            return Err(ConfigError::InvalidSpeed {
                base: self.base_moves_per_second,
                max: self.max_moves_per_second,
            });
        }
        if self.points_per_level == 0 {
            return Err(ConfigError::ZeroPointsPerLevel);
        }
        if let Some(bonus) = self.bonus {
            if bonus.every_n_foods == 0 || bonus.lifetime_ticks == 0 {
                return Err(ConfigError::InvalidBonus);
            }
        }
        Ok(())
    }
}

/// Colors used by the terminal renderer.
#[derive(Debug)]
pub struct Palette {
    pub grid_bg: Color,
    pub snake_head: Color,
    pub snake_body: Color,
    pub food: Color,
    pub bonus: Color,
    pub border_fg: Color,
    pub border_bg: Color,
    pub hud_label: Color,
    pub hud_value: Color,
    pub menu_title: Color,
    pub menu_footer: Color,
}

pub const PALETTE: Palette = Palette {
    grid_bg: Color::Rgb(0x1b, 0x1f, 0x26),
    snake_head: Color::Rgb(0xb8, 0xff, 0x8c),
    snake_body: Color::Rgb(0x7b, 0xda, 0x5a),
    food: Color::Rgb(0xff, 0xb3, 0x4d),
    bonus: Color::Rgb(0xff, 0x5e, 0xc4),
    border_fg: Color::White,
    border_bg: Color::Rgb(0x16, 0x1a, 0x20),
    hud_label: Color::DarkGray,
    hud_value: Color::White,
    menu_title: Color::Rgb(0x7b, 0xda, 0x5a),
    menu_footer: Color::DarkGray,
};

/// Half-block border set: solid side faces the play area.
pub const BORDER_HALF_BLOCK: border::Set = border::Set {
    top_left: "▄",
    top_right: "▄",
    bottom_left: "▀",
    bottom_right: "▀",
    vertical_left: "█",
    vertical_right: "█",
    horizontal_top: "▄",
    horizontal_bottom: "▀",
};

/// Each grid cell is drawn two terminal columns wide to look square.
pub const CELL_WIDTH: u16 = 2;

pub const GLYPH_CELL: &str = "██";
pub const GLYPH_FOOD: &str = "()";
pub const GLYPH_BONUS: &str = "<>";
