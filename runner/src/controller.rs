use std::sync::Arc;
use std::time::Duration;

use engine::{log, ControlMode, Direction, Frame, GameSession, SnakeError};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::interval;

use crate::frame_sink::FrameSink;

/// Drives a `GameSession` from a periodic timer and forwards every frame to a sink.
pub struct GameController<S: FrameSink> {
    session: Arc<Mutex<GameSession>>,
    sink: S,
    tick_interval: Duration,
    max_ticks: Option<u64>,
    task: Option<JoinHandle<()>>,
}

impl<S: FrameSink> GameController<S> {
    pub fn new(
        session: GameSession,
        sink: S,
        tick_interval: Duration,
        max_ticks: Option<u64>,
    ) -> Self {
        Self {
            session: Arc::new(Mutex::new(session)),
            sink,
            tick_interval,
            max_ticks,
            task: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Spawns the tick loop; returns false when one is already running.
    pub fn start(&mut self) -> bool {
        if self.is_running() {
            return false;
        }

        let session = self.session.clone();
        let sink = self.sink.clone();
        let tick_interval = self.tick_interval;
        let max_ticks = self.max_ticks;
        self.task = Some(tokio::spawn(async move {
            run_ticks(session, sink, tick_interval, max_ticks).await;
        }));
        log!("Tick loop started, interval {:?}", tick_interval);
        true
    }

    /// Aborts the tick loop; returns false when nothing was running.
    pub fn stop(&mut self) -> bool {
        match self.task.take() {
            Some(task) if !task.is_finished() => {
                task.abort();
                log!("Tick loop stopped");
                true
            }
            _ => false,
        }
    }

    /// Resolves once the tick loop ends on its own. Dropping this future leaves the
    /// loop running so that `stop` can still abort it.
    pub async fn wait(&mut self) {
        if let Some(task) = self.task.as_mut() {
            if let Err(e) = task.await
                && e.is_panic()
            {
                log!("Tick loop panicked: {}", e);
            }
            self.task = None;
        }
    }

    pub async fn set_mode(&self, mode: ControlMode) {
        self.session.lock().await.set_mode(mode);
    }

    pub async fn set_direction(&self, direction: Direction) -> bool {
        self.session.lock().await.set_direction(direction)
    }

    pub async fn new_game(&mut self) -> Result<(), SnakeError> {
        self.stop();
        self.session.lock().await.new_game()
    }

    pub async fn snapshot(&self) -> Frame {
        self.session.lock().await.snapshot()
    }

    pub async fn is_over(&self) -> bool {
        self.session.lock().await.is_over()
    }
}

async fn run_ticks<S: FrameSink>(
    session: Arc<Mutex<GameSession>>,
    sink: S,
    tick_interval: Duration,
    max_ticks: Option<u64>,
) {
    let mut timer = interval(tick_interval);

    loop {
        timer.tick().await;

        let (report, frame) = {
            let mut session = session.lock().await;
            match session.tick() {
                Ok(Some(report)) => (report, session.snapshot()),
                Ok(None) => break,
                Err(e) => {
                    log!("Tick failed: {}", e);
                    break;
                }
            }
        };

        let tick = report.tick;
        let game_over = report.outcome.is_some();
        sink.publish_frame(report, frame.clone()).await;

        if game_over {
            sink.publish_game_over(frame).await;
            break;
        }
        if max_ticks.is_some_and(|max| tick >= max) {
            log!("Reached the limit of {} ticks", tick);
            break;
        }
    }
}
