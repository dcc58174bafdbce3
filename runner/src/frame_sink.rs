use std::future::Future;

use engine::{log, Frame, GameOutcome, TickReport};

/// Receives explicit state snapshots from the tick loop; the engine itself never
/// touches presentation state.
pub trait FrameSink: Send + Sync + Clone + 'static {
    fn publish_frame(&self, report: TickReport, frame: Frame) -> impl Future<Output = ()> + Send;

    fn publish_game_over(&self, frame: Frame) -> impl Future<Output = ()> + Send;
}

/// Headless sink: reports progress through the logger.
#[derive(Clone)]
pub struct LogFrameSink {
    log_every_ticks: u64,
}

impl LogFrameSink {
    pub fn new(log_every_ticks: u64) -> Self {
        Self {
            log_every_ticks: log_every_ticks.max(1),
        }
    }
}

impl FrameSink for LogFrameSink {
    async fn publish_frame(&self, report: TickReport, frame: Frame) {
        if let Some(food) = report.new_food {
            log!(
                "[tick {}] score {}, length {}, next food at ({}, {})",
                report.tick,
                report.score,
                frame.segments.len(),
                food.x,
                food.y
            );
        } else if report.tick % self.log_every_ticks == 0 {
            log!(
                "[tick {}] head at ({}, {}) moving {:?}, score {}, mode {:?}",
                report.tick,
                report.movement.head_position.x,
                report.movement.head_position.y,
                report.direction,
                report.score,
                frame.mode
            );
        }
    }

    async fn publish_game_over(&self, frame: Frame) {
        let reason = match frame.outcome {
            Some(GameOutcome::SelfCollision) => "the snake ran into itself",
            Some(GameOutcome::GridFilled) => "the snake fills the whole grid",
            None => "the game was interrupted",
        };
        log!(
            "Game over after {} ticks: {}. Final score {}, length {}",
            frame.tick,
            reason,
            frame.score,
            frame.segments.len()
        );
    }
}
