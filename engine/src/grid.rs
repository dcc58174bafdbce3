use super::types::{Direction, Point};

/// Toroidal play area measured in pixels, divided into square cells of `block_size`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Grid {
    pub width: i32,
    pub height: i32,
    pub block_size: i32,
}

impl Grid {
    pub fn new(width: i32, height: i32, block_size: i32) -> Self {
        Self {
            width,
            height,
            block_size,
        }
    }

    pub fn columns(&self) -> i32 {
        self.width / self.block_size
    }

    pub fn rows(&self) -> i32 {
        self.height / self.block_size
    }

    pub fn cell_count(&self) -> usize {
        (self.columns() as usize) * (self.rows() as usize)
    }

    pub fn wrap(&self, point: Point) -> Point {
        Point::new(point.x.rem_euclid(self.width), point.y.rem_euclid(self.height))
    }

    pub fn neighbor(&self, point: Point, direction: Direction) -> Point {
        let (dx, dy) = direction.delta();
        self.wrap(Point::new(
            point.x + dx * self.block_size,
            point.y + dy * self.block_size,
        ))
    }

    pub fn is_aligned(&self, point: Point) -> bool {
        point.x % self.block_size == 0 && point.y % self.block_size == 0
    }

    pub fn contains(&self, point: Point) -> bool {
        (0..self.width).contains(&point.x) && (0..self.height).contains(&point.y)
    }

    pub fn are_neighbors(&self, a: Point, b: Point) -> bool {
        [Direction::Left, Direction::Up, Direction::Right, Direction::Down]
            .iter()
            .any(|&direction| self.neighbor(a, direction) == b)
    }

    /// Top-left corner of the cell at `column`, `row`; indices wrap.
    pub fn cell(&self, column: i32, row: i32) -> Point {
        self.wrap(Point::new(column * self.block_size, row * self.block_size))
    }
}
