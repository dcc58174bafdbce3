use std::path::PathBuf;

use clap::Parser;
use engine::config::Validate;
use engine::{logger, log, GameSession};

use torus_snake_runner::{get_config_manager, GameController, LogFrameSink};

#[derive(Parser)]
#[command(name = "torus_snake")]
struct Args {
    /// YAML config file; defaults to torus_snake_config.yaml next to the executable
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long)]
    autoplay: bool,

    #[arg(long)]
    seed: Option<u64>,

    #[arg(long)]
    max_ticks: Option<u64>,

    #[arg(long)]
    use_log_prefix: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let prefix = if args.use_log_prefix {
        Some("Snake".to_string())
    } else {
        None
    };
    logger::init_logger(prefix);

    let mut config = get_config_manager(args.config.as_deref()).get_config()?;
    if args.autoplay {
        config.game.autoplay = true;
    }
    if args.seed.is_some() {
        config.game.seed = args.seed;
    }
    if args.max_ticks.is_some() {
        config.max_ticks = args.max_ticks;
    }
    config.validate()?;

    let session = GameSession::new(config.game.clone())?;
    log!(
        "Torus snake on a {}x{} grid, seed {}",
        config.game.grid().columns(),
        config.game.grid().rows(),
        session.seed()
    );

    let sink = LogFrameSink::new(config.log_every_ticks);
    let mut controller = GameController::new(
        session,
        sink,
        config.game.tick_interval(),
        config.max_ticks,
    );

    loop {
        controller.start();

        let interrupted = tokio::select! {
            _ = controller.wait() => false,
            _ = tokio::signal::ctrl_c() => true,
        };

        if interrupted {
            log!("Shutdown signal received, stopping the game...");
            controller.stop();
            break;
        }

        if config.restart_on_game_over && controller.is_over().await {
            controller.new_game().await?;
            continue;
        }
        break;
    }

    let frame = controller.snapshot().await;
    log!(
        "Finished after {} ticks with score {}",
        frame.tick,
        frame.score
    );

    Ok(())
}
