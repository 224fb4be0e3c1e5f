use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::config::GridSize;
use crate::input::Direction;

/// Grid position in logical cell coordinates.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    /// Returns true when the position lies inside the bounds.
    #[must_use]
    pub fn is_within_bounds(self, bounds: GridSize) -> bool {
        self.x >= 0
            && self.y >= 0
            && self.x < i32::from(bounds.width)
            && self.y < i32::from(bounds.height)
    }

    /// Returns this position wrapped into bounds on both axes.
    #[must_use]
    pub fn wrapped(self, bounds: GridSize) -> Self {
        Self {
            x: wrap_axis(self.x, i32::from(bounds.width)),
            y: wrap_axis(self.y, i32::from(bounds.height)),
        }
    }

    /// Returns the neighbouring cell one step in `direction`, unwrapped.
    #[must_use]
    pub fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

fn wrap_axis(value: i32, upper_bound: i32) -> i32 {
    value.rem_euclid(upper_bound)
}

/// Ordered snake body, head first.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Snake {
    body: VecDeque<Position>,
    direction: Direction,
}

impl Snake {
    /// Creates a one-cell snake at `start` with the provided direction.
    #[must_use]
    pub fn new(start: Position, direction: Direction) -> Self {
        Self::from_segments(vec![start], direction)
    }

    /// Creates a straight snake of `length` cells with its head at `head`,
    /// the body trailing away from `direction`.
    #[must_use]
    pub fn straight(head: Position, direction: Direction, length: usize) -> Self {
        let trail = direction.opposite();
        let mut body = VecDeque::with_capacity(length);
        let mut cell = head;
        for _ in 0..length {
            body.push_back(cell);
            cell = cell.step(trail);
        }

        Self { body, direction }
    }

    /// Creates a snake from explicit body segments (front is head).
    ///
    /// # Panics
    ///
    /// Panics when `segments` is empty.
    #[must_use]
    pub fn from_segments(segments: Vec<Position>, direction: Direction) -> Self {
        assert!(!segments.is_empty(), "snake needs at least one segment");
        Self {
            body: VecDeque::from(segments),
            direction,
        }
    }

    /// Returns the current head position.
    #[must_use]
    pub fn head(&self) -> Position {
        self.body[0]
    }

    /// Returns the current tail position.
    #[must_use]
    pub fn tail(&self) -> Position {
        self.body[self.body.len() - 1]
    }

    /// Returns true if any segment occupies `position`.
    #[must_use]
    pub fn occupies(&self, position: Position) -> bool {
        self.body.contains(&position)
    }

    /// Returns true if moving the head onto `target` would hit the body.
    ///
    /// Without growth the tail leaves its cell on the same tick, so the tail
    /// cell is a legal target.
    #[must_use]
    pub fn would_collide(&self, target: Position, growing: bool) -> bool {
        let still_occupied = if growing {
            self.body.len()
        } else {
            self.body.len() - 1
        };
        self.body.iter().take(still_occupied).any(|cell| *cell == target)
    }

    /// Pushes `head` to the front and drops the tail unless `grow` is set.
    pub fn advance(&mut self, head: Position, direction: Direction, grow: bool) {
        self.direction = direction;
        self.body.push_front(head);
        if !grow {
            let _ = self.body.pop_back();
        }
    }

    pub fn set_direction(&mut self, direction: Direction) {
        self.direction = direction;
    }

    /// Returns current segment count.
    #[must_use]
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Always false; a snake keeps at least its head.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// Returns the current movement direction.
    #[must_use]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Iterates over body segments from head to tail.
    pub fn segments(&self) -> impl Iterator<Item = &Position> {
        self.body.iter()
    }
}

#[cfg(test)]
mod tests {
    use crate::config::GridSize;
    use crate::input::Direction;

    use super::{Position, Snake};

    #[test]
    fn position_wrapping_keeps_coordinates_inside_bounds() {
        let bounds = GridSize {
            width: 10,
            height: 8,
        };

        let wrapped_left = Position { x: -1, y: 3 }.wrapped(bounds);
        let wrapped_bottom = Position { x: 4, y: 8 }.wrapped(bounds);

        assert_eq!(wrapped_left, Position { x: 9, y: 3 });
        assert_eq!(wrapped_bottom, Position { x: 4, y: 0 });
    }

    #[test]
    fn straight_snake_trails_behind_head() {
        let snake = Snake::straight(Position { x: 5, y: 5 }, Direction::Right, 3);

        let cells: Vec<_> = snake.segments().copied().collect();
        assert_eq!(
            cells,
            vec![
                Position { x: 5, y: 5 },
                Position { x: 4, y: 5 },
                Position { x: 3, y: 5 },
            ]
        );
        assert_eq!(snake.tail(), Position { x: 3, y: 5 });
    }

    #[test]
    fn advance_without_growth_keeps_length() {
        let mut snake = Snake::straight(Position { x: 5, y: 5 }, Direction::Right, 3);

        snake.advance(Position { x: 6, y: 5 }, Direction::Right, false);

        assert_eq!(snake.head(), Position { x: 6, y: 5 });
        assert_eq!(snake.tail(), Position { x: 4, y: 5 });
        assert_eq!(snake.len(), 3);
    }

    #[test]
    fn advance_with_growth_keeps_previous_tail() {
        let mut snake = Snake::new(Position { x: 5, y: 5 }, Direction::Right);

        snake.advance(Position { x: 6, y: 5 }, Direction::Right, true);

        assert_eq!(snake.len(), 2);
        assert_eq!(snake.tail(), Position { x: 5, y: 5 });
    }

    #[test]
    fn tail_cell_is_free_unless_growing() {
        // Square loop: head at (1,1), tail at (1,2) directly below it.
        let snake = Snake::from_segments(
            vec![
                Position { x: 1, y: 1 },
                Position { x: 2, y: 1 },
                Position { x: 2, y: 2 },
                Position { x: 1, y: 2 },
            ],
            Direction::Left,
        );
        let tail = Position { x: 1, y: 2 };

        assert!(!snake.would_collide(tail, false));
        assert!(snake.would_collide(tail, true));
        assert!(snake.would_collide(Position { x: 2, y: 2 }, false));
    }
}
