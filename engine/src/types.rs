use serde::{Deserialize, Serialize};

/// Pixel-space coordinate of a cell's corner; both components are multiples of the cell size.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Left,
    Up,
    Right,
    Down,
}

impl Direction {
    pub fn is_opposite(&self, other: &Direction) -> bool {
        matches!(
            (self, other),
            (Direction::Left, Direction::Right)
                | (Direction::Right, Direction::Left)
                | (Direction::Up, Direction::Down)
                | (Direction::Down, Direction::Up)
        )
    }

    pub fn opposite(&self) -> Direction {
        match self {
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
        }
    }

    /// Unit step along the screen axes; y grows downwards.
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Direction::Left => (-1, 0),
            Direction::Up => (0, -1),
            Direction::Right => (1, 0),
            Direction::Down => (0, 1),
        }
    }

    /// Candidate directions from a heading: straight on first, then the two turns.
    /// The turn order is fixed so that search results are reproducible.
    pub fn search_order(&self) -> [Direction; 3] {
        match self {
            Direction::Up => [Direction::Up, Direction::Left, Direction::Right],
            Direction::Right => [Direction::Right, Direction::Up, Direction::Down],
            Direction::Down => [Direction::Down, Direction::Left, Direction::Right],
            Direction::Left => [Direction::Left, Direction::Up, Direction::Down],
        }
    }
}

/// Sign of the visual motion of a cell between two ticks; exactly one axis is non-zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovementVector {
    pub dx: i8,
    pub dy: i8,
}

impl MovementVector {
    pub fn new(dx: i8, dy: i8) -> Self {
        Self { dx, dy }
    }
}

impl From<Direction> for MovementVector {
    fn from(direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        Self::new(dx as i8, dy as i8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opposite_directions() {
        assert!(Direction::Left.is_opposite(&Direction::Right));
        assert!(Direction::Up.is_opposite(&Direction::Down));
        assert!(!Direction::Up.is_opposite(&Direction::Left));
        assert!(!Direction::Right.is_opposite(&Direction::Right));

        for direction in [Direction::Left, Direction::Up, Direction::Right, Direction::Down] {
            assert!(direction.is_opposite(&direction.opposite()));
        }
    }

    #[test]
    fn test_search_order_never_reverses() {
        for direction in [Direction::Left, Direction::Up, Direction::Right, Direction::Down] {
            let order = direction.search_order();
            assert_eq!(order[0], direction);
            assert!(!order.contains(&direction.opposite()));
        }
    }

    #[test]
    fn test_movement_vector_from_direction() {
        assert_eq!(MovementVector::from(Direction::Right), MovementVector::new(1, 0));
        assert_eq!(MovementVector::from(Direction::Up), MovementVector::new(0, -1));
    }
}
