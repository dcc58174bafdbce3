use std::collections::HashSet;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::Validate;
use super::grid::Grid;
use super::types::{Direction, Point};

pub const MIN_TICK_INTERVAL_MS: u32 = 10;
pub const MAX_TICK_INTERVAL_MS: u32 = 5000;

#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub struct GameSettings {
    pub width: i32,
    pub height: i32,
    pub block_size: i32,
    pub tick_interval_ms: u32,
    /// Ordered tail to head.
    pub initial_positions: Vec<Point>,
    pub initial_direction: Direction,
    #[serde(default)]
    pub autoplay: bool,
    #[serde(default)]
    pub seed: Option<u64>,
}

impl GameSettings {
    pub fn grid(&self) -> Grid {
        Grid::new(self.width, self.height, self.block_size)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms as u64)
    }
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            width: 900,
            height: 600,
            block_size: 15,
            tick_interval_ms: 50,
            initial_positions: vec![Point::new(0, 0), Point::new(15, 0), Point::new(30, 0)],
            initial_direction: Direction::Right,
            autoplay: false,
            seed: None,
        }
    }
}

impl Validate for GameSettings {
    fn validate(&self) -> Result<(), String> {
        if self.block_size <= 0 {
            return Err("block_size must be greater than 0".to_string());
        }
        if self.width <= 0 || self.width % self.block_size != 0 {
            return Err("width must be a positive multiple of block_size".to_string());
        }
        if self.height <= 0 || self.height % self.block_size != 0 {
            return Err("height must be a positive multiple of block_size".to_string());
        }
        if !(MIN_TICK_INTERVAL_MS..=MAX_TICK_INTERVAL_MS).contains(&self.tick_interval_ms) {
            return Err(format!(
                "tick_interval_ms must be between {} and {}",
                MIN_TICK_INTERVAL_MS, MAX_TICK_INTERVAL_MS
            ));
        }
        if self.initial_positions.is_empty() {
            return Err("initial_positions must contain at least one position".to_string());
        }

        let grid = self.grid();
        if self.initial_positions.len() >= grid.cell_count() {
            return Err("initial_positions must leave at least one free cell".to_string());
        }

        let mut seen = HashSet::new();
        for &position in &self.initial_positions {
            if !grid.contains(position) || !grid.is_aligned(position) {
                return Err(format!(
                    "initial position ({}, {}) is not a cell of the grid",
                    position.x, position.y
                ));
            }
            if !seen.insert(position) {
                return Err(format!(
                    "initial position ({}, {}) is listed twice",
                    position.x, position.y
                ));
            }
        }

        for pair in self.initial_positions.windows(2) {
            if !grid.are_neighbors(pair[0], pair[1]) {
                return Err(format!(
                    "initial positions ({}, {}) and ({}, {}) are not adjacent",
                    pair[0].x, pair[0].y, pair[1].x, pair[1].y
                ));
            }
        }

        Ok(())
    }
}
