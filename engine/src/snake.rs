use std::collections::HashSet;
use std::fmt;

use super::grid::Grid;
use super::pathfinder::PathFinder;
use super::types::{Direction, MovementVector, Point};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnakeError {
    EmptyInitialPositions,
    InvalidState(String),
}

impl fmt::Display for SnakeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SnakeError::EmptyInitialPositions => {
                write!(f, "At least one initial segment is needed to create the snake")
            }
            SnakeError::InvalidState(reason) => write!(f, "Invalid snake state: {}", reason),
        }
    }
}

impl std::error::Error for SnakeError {}

#[derive(Clone, Debug)]
struct Segment {
    id: u64,
    position: Point,
    next: Option<usize>,
}

/// Read-only view of one occupied cell, handed to renderers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SegmentView {
    pub id: u64,
    pub position: Point,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MoveResult {
    pub food_eaten: bool,
    pub collision: bool,
    pub head_id: u64,
    pub head_position: Point,
    /// Cell vacated by the tail; `None` when the snake grew.
    pub old_tail_position: Option<Point>,
    pub head_movement: MovementVector,
    pub tail_movement: Option<MovementVector>,
}

/// The snake as a singly linked chain running tail -> head, stored in an index arena.
///
/// Sliding re-links the tail slot as the new head instead of allocating, so a
/// move never touches the allocator unless the snake grows past every slot it
/// has owned before.
pub struct SnakeState {
    grid: Grid,
    segments: Vec<Segment>,
    free: Vec<usize>,
    head: usize,
    tail: usize,
    occupied: HashSet<Point>,
    len: usize,
    last_id: u64,
    direction: Direction,
    next_direction: Direction,
    collided: bool,
}

impl SnakeState {
    pub fn new(
        initial_positions: &[Point],
        grid: Grid,
        direction: Direction,
    ) -> Result<Self, SnakeError> {
        if initial_positions.is_empty() {
            return Err(SnakeError::EmptyInitialPositions);
        }

        let mut snake = Self {
            grid,
            segments: Vec::with_capacity(grid.cell_count()),
            free: Vec::new(),
            head: 0,
            tail: 0,
            occupied: HashSet::with_capacity(grid.cell_count()),
            len: 0,
            last_id: 0,
            direction,
            next_direction: direction,
            collided: false,
        };
        snake.reset(initial_positions, direction)?;
        Ok(snake)
    }

    /// Replaces the whole chain, returning every slot to the free list first.
    pub fn reset(
        &mut self,
        initial_positions: &[Point],
        direction: Direction,
    ) -> Result<(), SnakeError> {
        if initial_positions.is_empty() {
            return Err(SnakeError::EmptyInitialPositions);
        }

        self.free.clear();
        self.free.extend((0..self.segments.len()).rev());
        self.occupied.clear();

        let mut previous: Option<usize> = None;
        for (id, &position) in initial_positions.iter().enumerate() {
            let slot = self.allocate(Segment {
                id: id as u64,
                position,
                next: None,
            });
            match previous {
                Some(prev) => self.segments[prev].next = Some(slot),
                None => self.tail = slot,
            }
            previous = Some(slot);
            self.occupied.insert(position);
        }

        self.head = previous.unwrap_or(self.tail);
        self.len = initial_positions.len();
        self.last_id = (initial_positions.len() - 1) as u64;
        self.direction = direction;
        self.next_direction = direction;
        self.collided = false;
        Ok(())
    }

    fn allocate(&mut self, segment: Segment) -> usize {
        match self.free.pop() {
            Some(slot) => {
                self.segments[slot] = segment;
                slot
            }
            None => {
                self.segments.push(segment);
                self.segments.len() - 1
            }
        }
    }

    pub fn move_snake(
        &mut self,
        direction: Direction,
        food: Option<Point>,
    ) -> Result<MoveResult, SnakeError> {
        if self.collided {
            return Err(SnakeError::InvalidState(
                "snake cannot move after colliding with itself".to_string(),
            ));
        }

        let new_head_position = self.grid.neighbor(self.head_position(), direction);
        let food_eaten = food == Some(new_head_position);

        let (old_tail_position, tail_movement) = if food_eaten {
            self.grow(new_head_position);
            (None, None)
        } else {
            let old_tail_position = self.slide(new_head_position)?;
            let new_tail_position = self.tail_position();
            (
                Some(old_tail_position),
                Some(self.tail_movement(old_tail_position, new_tail_position)),
            )
        };

        // a position inserted over an occupied cell does not grow the set
        let collision = self.occupied.len() < self.len;
        self.collided = collision;
        self.direction = direction;
        self.next_direction = direction;

        Ok(MoveResult {
            food_eaten,
            collision,
            head_id: self.segments[self.head].id,
            head_position: new_head_position,
            old_tail_position,
            head_movement: MovementVector::from(direction),
            tail_movement,
        })
    }

    fn grow(&mut self, new_head_position: Point) {
        self.last_id += 1;
        let slot = self.allocate(Segment {
            id: self.last_id,
            position: new_head_position,
            next: None,
        });
        self.segments[self.head].next = Some(slot);
        self.head = slot;
        self.len += 1;
        self.occupied.insert(new_head_position);
    }

    /// Moves the tail slot to the front and returns the cell it vacated.
    fn slide(&mut self, new_head_position: Point) -> Result<Point, SnakeError> {
        let old_tail = self.tail;
        let old_tail_position = self.segments[old_tail].position;

        if self.len > 1 {
            let new_tail = self.segments[old_tail].next.ok_or_else(|| {
                SnakeError::InvalidState(format!(
                    "tail segment {} has no successor",
                    self.segments[old_tail].id
                ))
            })?;
            self.tail = new_tail;
            self.segments[self.head].next = Some(old_tail);
            self.head = old_tail;
            self.segments[old_tail].next = None;
        }

        self.segments[old_tail].position = new_head_position;
        self.occupied.remove(&old_tail_position);
        self.occupied.insert(new_head_position);
        Ok(old_tail_position)
    }

    fn tail_movement(&self, old_tail: Point, new_tail: Point) -> MovementVector {
        let step = self.grid.block_size;
        if old_tail.x == new_tail.x {
            let dy = if (old_tail.y + step).rem_euclid(self.grid.height) == new_tail.y {
                1
            } else {
                -1
            };
            MovementVector::new(0, dy)
        } else {
            let dx = if (old_tail.x + step).rem_euclid(self.grid.width) == new_tail.x {
                1
            } else {
                -1
            };
            MovementVector::new(dx, 0)
        }
    }

    pub fn has_block(&self, point: Point) -> bool {
        self.occupied.contains(&point)
    }

    /// Buffers the direction for the next move; reversing onto the body is refused.
    pub fn set_next_direction(&mut self, direction: Direction) -> bool {
        if direction.is_opposite(&self.direction) {
            return false;
        }
        self.next_direction = direction;
        true
    }

    pub fn next_moves(&self, food: Point) -> Vec<Direction> {
        PathFinder::next_moves(self, food)
    }

    pub fn grid(&self) -> Grid {
        self.grid
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn occupied_count(&self) -> usize {
        self.occupied.len()
    }

    pub fn has_collided(&self) -> bool {
        self.collided
    }

    pub fn last_id(&self) -> u64 {
        self.last_id
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn next_direction(&self) -> Direction {
        self.next_direction
    }

    pub fn head_position(&self) -> Point {
        self.segments[self.head].position
    }

    pub fn tail_position(&self) -> Point {
        self.segments[self.tail].position
    }

    pub fn segments(&self) -> Segments<'_> {
        Segments {
            snake: self,
            current: Some(self.tail),
            remaining: self.len,
        }
    }

    pub fn positions(&self) -> Vec<Point> {
        self.segments().map(|segment| segment.position).collect()
    }
}

/// Walks the chain from tail to head.
pub struct Segments<'a> {
    snake: &'a SnakeState,
    current: Option<usize>,
    remaining: usize,
}

impl Iterator for Segments<'_> {
    type Item = SegmentView;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let slot = self.current?;
        let segment = &self.snake.segments[slot];
        self.current = segment.next;
        self.remaining -= 1;
        Some(SegmentView {
            id: segment.id,
            position: segment.position,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SessionRng;

    fn grid() -> Grid {
        Grid::new(900, 600, 15)
    }

    fn points(raw: &[(i32, i32)]) -> Vec<Point> {
        raw.iter().map(|&(x, y)| Point::new(x, y)).collect()
    }

    fn three_segment_snake() -> SnakeState {
        SnakeState::new(&points(&[(0, 0), (15, 0), (30, 0)]), grid(), Direction::Right).unwrap()
    }

    #[test]
    fn test_empty_positions_fail() {
        let result = SnakeState::new(&[], grid(), Direction::Right);
        assert_eq!(result.err(), Some(SnakeError::EmptyInitialPositions));
    }

    #[test]
    fn test_construction_assigns_ids_tail_to_head() {
        let snake = three_segment_snake();
        let ids: Vec<u64> = snake.segments().map(|s| s.id).collect();
        assert_eq!(ids, vec![0, 1, 2]);
        assert_eq!(snake.positions(), points(&[(0, 0), (15, 0), (30, 0)]));
        assert_eq!(snake.len(), 3);
        assert_eq!(snake.occupied_count(), 3);
        assert_eq!(snake.head_position(), Point::new(30, 0));
        assert_eq!(snake.tail_position(), Point::new(0, 0));
        assert!(snake.has_block(Point::new(15, 0)));
        assert!(!snake.has_block(Point::new(45, 0)));
    }

    #[test]
    fn test_growth_exactness() {
        let mut snake = three_segment_snake();
        let previous_max_id = snake.last_id();

        let result = snake
            .move_snake(Direction::Right, Some(Point::new(45, 0)))
            .unwrap();

        assert!(result.food_eaten);
        assert!(!result.collision);
        assert_eq!(result.head_position, Point::new(45, 0));
        assert_eq!(result.head_id, previous_max_id + 1);
        assert_eq!(result.old_tail_position, None);
        assert_eq!(result.tail_movement, None);
        assert_eq!(result.head_movement, MovementVector::new(1, 0));
        assert_eq!(snake.len(), 4);
        assert_eq!(snake.occupied_count(), 4);
        assert_eq!(snake.tail_position(), Point::new(0, 0));
    }

    #[test]
    fn test_slide_reuses_tail_segment() {
        let mut snake = three_segment_snake();

        let result = snake.move_snake(Direction::Down, None).unwrap();

        assert!(!result.food_eaten);
        assert!(!result.collision);
        assert_eq!(result.head_id, 0);
        assert_eq!(result.head_position, Point::new(30, 15));
        assert_eq!(result.old_tail_position, Some(Point::new(0, 0)));
        assert_eq!(result.tail_movement, Some(MovementVector::new(1, 0)));
        assert_eq!(result.head_movement, MovementVector::new(0, 1));
        assert_eq!(snake.positions(), points(&[(15, 0), (30, 0), (30, 15)]));
        let ids: Vec<u64> = snake.segments().map(|s| s.id).collect();
        assert_eq!(ids, vec![1, 2, 0]);
        assert!(!snake.has_block(Point::new(0, 0)));
        assert_eq!(snake.len(), 3);
    }

    #[test]
    fn test_toroidal_wrap_on_move() {
        let mut snake =
            SnakeState::new(&points(&[(855, 0), (870, 0), (885, 0)]), grid(), Direction::Right)
                .unwrap();
        let result = snake.move_snake(Direction::Right, None).unwrap();
        assert_eq!(result.head_position, Point::new(0, 0));
    }

    #[test]
    fn test_tail_movement_across_seam() {
        let mut snake =
            SnakeState::new(&points(&[(885, 0), (0, 0), (15, 0)]), grid(), Direction::Right)
                .unwrap();
        let result = snake.move_snake(Direction::Right, None).unwrap();
        assert_eq!(result.tail_movement, Some(MovementVector::new(1, 0)));

        let mut snake =
            SnakeState::new(&points(&[(0, 0), (0, 585), (0, 570)]), grid(), Direction::Up)
                .unwrap();
        let result = snake.move_snake(Direction::Up, None).unwrap();
        assert_eq!(result.tail_movement, Some(MovementVector::new(0, -1)));
    }

    #[test]
    fn test_reversal_into_body_collides() {
        let mut snake = SnakeState::new(
            &points(&[(0, 0), (15, 0), (30, 0), (45, 0)]),
            grid(),
            Direction::Right,
        )
        .unwrap();

        let result = snake.move_snake(Direction::Left, None).unwrap();

        assert!(result.collision);
        assert!(snake.occupied_count() < snake.len());
        assert!(snake.has_collided());
    }

    #[test]
    fn test_u_turn_into_body_collides() {
        let mut snake = SnakeState::new(
            &points(&[(0, 0), (15, 0), (30, 0), (45, 0), (60, 0)]),
            grid(),
            Direction::Right,
        )
        .unwrap();

        assert!(!snake.move_snake(Direction::Down, None).unwrap().collision);
        assert!(!snake.move_snake(Direction::Left, None).unwrap().collision);
        let result = snake.move_snake(Direction::Up, None).unwrap();

        assert_eq!(result.head_position, Point::new(45, 0));
        assert!(result.collision);
    }

    #[test]
    fn test_moving_into_vacated_tail_is_safe() {
        let mut snake = SnakeState::new(
            &points(&[(0, 0), (15, 0), (30, 0), (45, 0)]),
            grid(),
            Direction::Right,
        )
        .unwrap();

        snake.move_snake(Direction::Down, None).unwrap();
        snake.move_snake(Direction::Left, None).unwrap();
        let result = snake.move_snake(Direction::Up, None).unwrap();

        assert_eq!(result.head_position, Point::new(30, 0));
        assert_eq!(result.old_tail_position, Some(Point::new(30, 0)));
        assert!(!result.collision);
        assert_eq!(snake.occupied_count(), snake.len());
    }

    #[test]
    fn test_move_after_collision_is_invalid() {
        let mut snake = SnakeState::new(
            &points(&[(0, 0), (15, 0), (30, 0), (45, 0)]),
            grid(),
            Direction::Right,
        )
        .unwrap();
        snake.move_snake(Direction::Left, None).unwrap();

        let result = snake.move_snake(Direction::Down, None);
        assert!(matches!(result, Err(SnakeError::InvalidState(_))));
    }

    #[test]
    fn test_occupancy_matches_length_until_collision() {
        let small = Grid::new(150, 150, 15);
        let mut snake =
            SnakeState::new(&points(&[(0, 0), (15, 0), (30, 0)]), small, Direction::Right)
                .unwrap();
        let mut rng = SessionRng::new(42);
        let directions = [Direction::Left, Direction::Up, Direction::Right, Direction::Down];

        for step in 0..500 {
            let mut direction = directions[rng.random_range(0..directions.len())];
            if direction.is_opposite(&snake.direction()) {
                direction = snake.direction();
            }
            let food = if step % 7 == 0 {
                Some(small.neighbor(snake.head_position(), direction))
            } else {
                None
            };

            let result = snake.move_snake(direction, food).unwrap();
            if result.collision {
                assert!(snake.occupied_count() < snake.len());
                break;
            }
            assert_eq!(snake.occupied_count(), snake.len());
            assert_eq!(snake.positions().len(), snake.len());
        }
    }

    #[test]
    fn test_reject_reverse_direction() {
        let mut snake = three_segment_snake();
        assert!(!snake.set_next_direction(Direction::Left));
        assert_eq!(snake.next_direction(), Direction::Right);

        assert!(snake.set_next_direction(Direction::Up));
        assert!(snake.set_next_direction(Direction::Down));
        assert_eq!(snake.next_direction(), Direction::Down);

        assert!(snake.set_next_direction(Direction::Right));
        assert_eq!(snake.next_direction(), Direction::Right);
    }

    #[test]
    fn test_single_segment_snake_slides() {
        let mut snake = SnakeState::new(&points(&[(0, 0)]), grid(), Direction::Down).unwrap();

        let result = snake.move_snake(Direction::Down, None).unwrap();

        assert!(!result.collision);
        assert_eq!(result.head_id, 0);
        assert_eq!(snake.positions(), points(&[(0, 15)]));
        assert_eq!(result.tail_movement, Some(MovementVector::new(0, 1)));
    }

    #[test]
    fn test_reset_reuses_arena() {
        let mut snake = three_segment_snake();
        snake.move_snake(Direction::Right, Some(Point::new(45, 0))).unwrap();
        snake.move_snake(Direction::Right, Some(Point::new(60, 0))).unwrap();
        assert_eq!(snake.len(), 5);

        snake
            .reset(&points(&[(0, 30), (15, 30)]), Direction::Right)
            .unwrap();

        assert_eq!(snake.len(), 2);
        assert_eq!(snake.occupied_count(), 2);
        assert_eq!(snake.last_id(), 1);
        assert_eq!(snake.positions(), points(&[(0, 30), (15, 30)]));
        assert!(!snake.has_block(Point::new(45, 0)));

        let result = snake.move_snake(Direction::Right, Some(Point::new(30, 30))).unwrap();
        assert_eq!(result.head_id, 2);
        assert_eq!(snake.len(), 3);
    }
}
