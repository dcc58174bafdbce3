pub mod controller;
pub mod frame_sink;
pub mod runner_config;

pub use controller::GameController;
pub use frame_sink::{FrameSink, LogFrameSink};
pub use runner_config::{get_config_manager, RunnerConfig};
