//! Grid positions on a dungeon map

use serde::{Deserialize, Serialize};

/// A tile coordinate on the dungeon grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Chebyshev distance: diagonal steps cost the same as orthogonal ones
    pub fn distance_to(&self, other: &Position) -> i32 {
        (self.x - other.x).abs().max((self.y - other.y).abs())
    }

    /// One tile step from `self` toward `target` (diagonals allowed)
    pub fn step_toward(&self, target: &Position) -> Position {
        Position {
            x: self.x + (target.x - self.x).signum(),
            y: self.y + (target.y - self.y).signum(),
        }
    }

    pub fn is_adjacent_to(&self, other: &Position) -> bool {
        self.distance_to(other) == 1
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_toward_moves_one_tile() {
        let from = Position::new(1, 1);
        assert_eq!(from.step_toward(&Position::new(7, 2)), Position::new(2, 2));
        assert_eq!(from.step_toward(&Position::new(1, -5)), Position::new(1, 0));
        assert_eq!(from.step_toward(&from), from);
    }

    #[test]
    fn test_adjacency_includes_diagonals() {
        let origin = Position::new(4, 4);
        assert!(origin.is_adjacent_to(&Position::new(5, 5)));
        assert!(!origin.is_adjacent_to(&Position::new(6, 4)));
        assert!(!origin.is_adjacent_to(&origin));
    }
}
