use std::io::BufRead;
use std::path::PathBuf;

use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info, trace, warn};
use tracing_subscriber::filter::{LevelFilter, Targets};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use twenty48::{
    Config, Engine, Input, JsonFileStorage, MemoryStorage, MoveOutcome, Storage, TextRenderer,
};

/// Play 2048 by typing commands: a direction (up/down/left/right, or
/// wasd/hjkl), "restart", "continue" or "quit".
#[derive(Parser)]
struct Args {
    /// Path to a JSON file with the rules of the game
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Width of a new grid, overrides the config file
    #[arg(long)]
    width: Option<usize>,

    /// Height of a new grid, overrides the config file
    #[arg(long)]
    height: Option<usize>,

    /// RNG seed
    #[arg(long)]
    seed: Option<u64>,

    /// Save the game and the best score into this directory, and resume
    /// the game saved there
    #[arg(short, long)]
    save_dir: Option<PathBuf>,

    /// A log level among "off", "error", "warn", "info", "debug", "trace"
    #[arg(short, long, default_value = "warn")]
    log_level: LevelFilter,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    initialize_logging(args.log_level);

    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(width) = args.width {
        config.size.width = width;
    }
    if let Some(height) = args.height {
        config.size.height = height;
    }
    config.validate()?;

    // Get a random seed
    let seed = args.seed.unwrap_or_else(rand::random);
    info!(seed);
    let rng = StdRng::seed_from_u64(seed);

    match args.save_dir {
        Some(dir_path) => play(config, JsonFileStorage::new(dir_path)?, rng),
        None => play(config, MemoryStorage::new(), rng),
    }
}

fn play<S: Storage>(config: Config, storage: S, rng: StdRng) -> anyhow::Result<()> {
    let renderer = TextRenderer::new(std::io::stdout());
    let mut engine = Engine::new(config, storage, renderer, rng)?;

    let stdin = std::io::stdin().lock();
    for line in stdin.lines() {
        let line = line?;
        trace!(%line, "Received input");
        let command = line.trim();
        if command.is_empty() {
            continue;
        }
        if matches!(command, "quit" | "exit" | "q") {
            break;
        }

        let input = match command.parse::<Input>() {
            Ok(input) => input,
            Err(err) => {
                warn!(%err, "Could not parse command");
                eprintln!("{}", err);
                continue;
            }
        };

        match input {
            Input::Move { direction } => match engine.move_tiles(direction)? {
                MoveOutcome::Terminated => {
                    eprintln!("The game has ended, type 'restart' or 'continue'");
                }
                MoveOutcome::Blocked => {
                    eprintln!("Nothing can move {}", direction);
                }
                MoveOutcome::Moved { points, .. } => {
                    debug!(points, score = engine.score());
                }
            },
            Input::KeepPlaying => {
                if !engine.keep_playing()? {
                    eprintln!("There is no won game to continue");
                }
            }
            Input::Restart => engine.restart()?,
        }
    }

    info!(score = engine.score(), best_score = engine.best_score()?, "Bye");
    Ok(())
}

fn initialize_logging(level: LevelFilter) {
    let format = tracing_subscriber::fmt::format()
        .with_target(false)
        .compact();

    let filter = Targets::new().with_default(level);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .event_format(format)
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}
