use crate::log;
use super::food::FoodPlacer;
use super::grid::Grid;
use super::pathfinder::PathFinder;
use super::session_rng::SessionRng;
use super::settings::GameSettings;
use super::snake::{MoveResult, SegmentView, SnakeError, SnakeState};
use super::types::{Direction, Point};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControlMode {
    Manual,
    Autoplay,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameOutcome {
    SelfCollision,
    /// The snake covers every cell; counted as a win.
    GridFilled,
}

/// What one tick did, for renderers and score keeping.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TickReport {
    pub tick: u64,
    pub direction: Direction,
    pub movement: MoveResult,
    pub new_food: Option<Point>,
    pub score: u32,
    pub outcome: Option<GameOutcome>,
}

/// Explicit snapshot of everything a renderer needs to draw one frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    pub tick: u64,
    pub segments: Vec<SegmentView>,
    pub food: Option<Point>,
    pub score: u32,
    pub mode: ControlMode,
    pub outcome: Option<GameOutcome>,
}

/// One game: snake, food, control mode and the autoplay plan, advanced one tick at a time.
pub struct GameSession {
    settings: GameSettings,
    grid: Grid,
    snake: SnakeState,
    food: Option<Point>,
    rng: SessionRng,
    mode: ControlMode,
    plan: Vec<Direction>,
    replan: bool,
    score: u32,
    ticks: u64,
    outcome: Option<GameOutcome>,
}

impl GameSession {
    pub fn new(settings: GameSettings) -> Result<Self, SnakeError> {
        let grid = settings.grid();
        let snake = SnakeState::new(
            &settings.initial_positions,
            grid,
            settings.initial_direction,
        )?;
        let rng = SessionRng::from_optional_seed(settings.seed);
        let mode = if settings.autoplay {
            ControlMode::Autoplay
        } else {
            ControlMode::Manual
        };

        let mut session = Self {
            settings,
            grid,
            snake,
            food: None,
            rng,
            mode,
            plan: Vec::new(),
            replan: mode == ControlMode::Autoplay,
            score: 0,
            ticks: 0,
            outcome: None,
        };
        session.place_food();
        log!("New game with seed {}", session.rng.seed());
        Ok(session)
    }

    /// Replaces the snake wholesale and starts over; the control mode is kept.
    pub fn new_game(&mut self) -> Result<(), SnakeError> {
        self.snake.reset(
            &self.settings.initial_positions,
            self.settings.initial_direction,
        )?;
        self.food = None;
        self.plan.clear();
        self.replan = self.mode == ControlMode::Autoplay;
        self.score = 0;
        self.ticks = 0;
        self.outcome = None;
        self.place_food();
        log!("New game started");
        Ok(())
    }

    /// Buffers a manual direction; only the last accepted one before a tick counts.
    pub fn set_direction(&mut self, direction: Direction) -> bool {
        if self.is_over() {
            return false;
        }
        self.snake.set_next_direction(direction)
    }

    /// Takes effect on the next tick; entering autoplay schedules a fresh plan.
    pub fn set_mode(&mut self, mode: ControlMode) {
        if self.mode == mode {
            return;
        }
        self.mode = mode;
        self.plan.clear();
        self.replan = mode == ControlMode::Autoplay;
        log!("Control mode switched to {:?}", mode);
    }

    pub fn tick(&mut self) -> Result<Option<TickReport>, SnakeError> {
        if self.is_over() {
            return Ok(None);
        }

        let direction = self.next_direction();
        let movement = self.snake.move_snake(direction, self.food)?;
        self.ticks += 1;

        let mut new_food = None;
        if movement.collision {
            log!(
                "Snake collided with itself at ({}, {}) after {} ticks, score {}",
                movement.head_position.x,
                movement.head_position.y,
                self.ticks,
                self.score
            );
            self.outcome = Some(GameOutcome::SelfCollision);
        } else if movement.food_eaten {
            self.score += 1;
            log!(
                "Food eaten at ({}, {}). Score: {}",
                movement.head_position.x,
                movement.head_position.y,
                self.score
            );
            new_food = self.place_food();
            if new_food.is_some() && self.mode == ControlMode::Autoplay {
                self.replan = true;
            }
        }

        if self.replan && !self.is_over() {
            self.recompute_plan();
        }

        Ok(Some(TickReport {
            tick: self.ticks,
            direction,
            movement,
            new_food,
            score: self.score,
            outcome: self.outcome,
        }))
    }

    fn next_direction(&mut self) -> Direction {
        match self.mode {
            ControlMode::Manual => self.snake.next_direction(),
            ControlMode::Autoplay => {
                if self.replan {
                    self.recompute_plan();
                }
                self.plan.pop().unwrap_or_else(|| self.snake.direction())
            }
        }
    }

    fn recompute_plan(&mut self) {
        self.replan = false;
        if let Some(food) = self.food {
            self.plan = PathFinder::next_moves(&self.snake, food);
        }
    }

    fn place_food(&mut self) -> Option<Point> {
        match FoodPlacer::pick(&self.grid, &self.snake, &mut self.rng) {
            Ok(food) => {
                self.food = Some(food);
                Some(food)
            }
            Err(err) => {
                log!("{}; the game is won", err);
                self.food = None;
                self.outcome = Some(GameOutcome::GridFilled);
                None
            }
        }
    }

    pub fn snapshot(&self) -> Frame {
        Frame {
            tick: self.ticks,
            segments: self.snake.segments().collect(),
            food: self.food,
            score: self.score,
            mode: self.mode,
            outcome: self.outcome,
        }
    }

    pub fn is_over(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn outcome(&self) -> Option<GameOutcome> {
        self.outcome
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn mode(&self) -> ControlMode {
        self.mode
    }

    pub fn food(&self) -> Option<Point> {
        self.food
    }

    pub fn plan(&self) -> &[Direction] {
        &self.plan
    }

    pub fn seed(&self) -> u64 {
        self.rng.seed()
    }

    pub fn snake(&self) -> &SnakeState {
        &self.snake
    }

    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }
}
