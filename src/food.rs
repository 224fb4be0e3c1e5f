use std::collections::HashSet;

use rand::Rng;
use serde::Serialize;

use crate::config::GridSize;
use crate::snake::Position;

/// Rejection samples tried per board cell before scanning for free cells.
const SAMPLE_ATTEMPTS_PER_CELL: usize = 4;

/// Food type and associated metadata.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum FoodKind {
    Normal,
    Bonus { expires_at_tick: u64 },
}

/// Food item currently on the board.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
pub struct Food {
    pub position: Position,
    pub kind: FoodKind,
    pub points: u32,
}

impl Food {
    /// Creates a one-point normal food at `position`.
    #[must_use]
    pub fn normal(position: Position) -> Self {
        Self {
            position,
            kind: FoodKind::Normal,
            points: 1,
        }
    }

    /// Creates a bonus food that disappears once the tick counter reaches
    /// `expires_at_tick`.
    #[must_use]
    pub fn bonus(position: Position, points: u32, expires_at_tick: u64) -> Self {
        Self {
            position,
            kind: FoodKind::Bonus { expires_at_tick },
            points,
        }
    }

    /// Returns true once a bonus has outlived its lifetime. Normal food never
    /// expires.
    #[must_use]
    pub fn is_expired(self, tick: u64) -> bool {
        match self.kind {
            FoodKind::Normal => false,
            FoodKind::Bonus { expires_at_tick } => tick >= expires_at_tick,
        }
    }

    /// Ticks left before a bonus disappears; `None` for normal food.
    #[must_use]
    pub fn remaining_ticks(self, tick: u64) -> Option<u64> {
        match self.kind {
            FoodKind::Normal => None,
            FoodKind::Bonus { expires_at_tick } => Some(expires_at_tick.saturating_sub(tick)),
        }
    }
}

/// Picks a uniformly random cell outside `exclude`.
///
/// Samples at random first and falls back to enumerating the free cells, so
/// a nearly full board still resolves in bounded time. Returns `None` when
/// every cell is excluded.
#[must_use]
pub fn spawn_position<R: Rng + ?Sized>(
    rng: &mut R,
    bounds: GridSize,
    exclude: &HashSet<Position>,
) -> Option<Position> {
    let total = bounds.total_cells();
    if exclude.len() >= total {
        // Exclusions may include off-board cells, so confirm with a scan.
        return pick_free_cell(rng, bounds, exclude);
    }

    for _ in 0..total * SAMPLE_ATTEMPTS_PER_CELL {
        let candidate = Position {
            x: rng.gen_range(0..i32::from(bounds.width)),
            y: rng.gen_range(0..i32::from(bounds.height)),
        };
        if !exclude.contains(&candidate) {
            return Some(candidate);
        }
    }

    pick_free_cell(rng, bounds, exclude)
}

fn pick_free_cell<R: Rng + ?Sized>(
    rng: &mut R,
    bounds: GridSize,
    exclude: &HashSet<Position>,
) -> Option<Position> {
    let mut candidates = Vec::new();

    for y in 0..i32::from(bounds.height) {
        for x in 0..i32::from(bounds.width) {
            let position = Position { x, y };
            if !exclude.contains(&position) {
                candidates.push(position);
            }
        }
    }

    if candidates.is_empty() {
        return None;
    }

    let index = rng.gen_range(0..candidates.len());
    Some(candidates[index])
}
