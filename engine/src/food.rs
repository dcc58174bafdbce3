use std::fmt;

use crate::log;
use super::grid::Grid;
use super::session_rng::SessionRng;
use super::snake::SnakeState;
use super::types::Point;

/// Every cell of the grid is covered by the snake.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridFull;

impl fmt::Display for GridFull {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "No free cell left for food")
    }
}

impl std::error::Error for GridFull {}

pub struct FoodPlacer;

impl FoodPlacer {
    /// Samples a cell uniformly; if the snake covers it, scans row by row from
    /// that cell, wrapping on both axes, and takes the first free one.
    pub fn pick(grid: &Grid, snake: &SnakeState, rng: &mut SessionRng) -> Result<Point, GridFull> {
        let columns = grid.columns();
        let rows = grid.rows();
        let column = rng.random_range(0..columns);
        let row = rng.random_range(0..rows);

        let sampled = grid.cell(column, row);
        if !snake.has_block(sampled) {
            log!("Food placed at ({}, {})", sampled.x, sampled.y);
            return Ok(sampled);
        }

        for dy in 0..rows {
            for dx in 0..columns {
                let candidate = grid.cell(column + dx, row + dy);
                if !snake.has_block(candidate) {
                    log!(
                        "Food placed at ({}, {}) after scanning from ({}, {})",
                        candidate.x,
                        candidate.y,
                        sampled.x,
                        sampled.y
                    );
                    return Ok(candidate);
                }
            }
        }

        log!("Grid is full, no cell left for food");
        Err(GridFull)
    }
}
