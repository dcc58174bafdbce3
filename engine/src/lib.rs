pub mod config;
pub mod logger;
mod session_rng;

pub mod food;
pub mod game;
pub mod grid;
pub mod pathfinder;
pub mod settings;
pub mod snake;
pub mod types;

pub use food::{FoodPlacer, GridFull};
pub use game::{ControlMode, Frame, GameOutcome, GameSession, TickReport};
pub use grid::Grid;
pub use pathfinder::PathFinder;
pub use session_rng::SessionRng;
pub use settings::GameSettings;
pub use snake::{MoveResult, SegmentView, SnakeError, SnakeState};
pub use types::{Direction, MovementVector, Point};
