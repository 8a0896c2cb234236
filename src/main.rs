use anyhow::{Context, Result};
use checkers_core::engine::config::EngineConfig;
use checkers_core::engine::SearchLimit;
use checkers_core::logic::board::{Board, Color};
use checkers_core::logic::game::GameState;
use checkers_core::logic::rules::CapturePolicy;
use clap::{Parser, ValueEnum};
use log::info;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

mod app;

use app::{App, EngineSide};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Side {
    Red,
    Black,
}

impl From<Side> for Color {
    fn from(side: Side) -> Self {
        match side {
            Side::Red => Self::Red,
            Side::Black => Self::Black,
        }
    }
}

#[derive(Parser)]
#[command(
    name = "checkers",
    about = "Play 8x8 checkers in the terminal against a minimax engine",
    version
)]
struct Args {
    /// Search depth in plies (defaults to the configured max depth)
    #[arg(short, long)]
    depth: Option<u8>,

    /// Think for this many milliseconds per move instead of a fixed depth
    #[arg(long = "time-ms", conflicts_with = "depth")]
    time_ms: Option<u64>,

    /// Which side the engine plays
    #[arg(long = "engine-color", value_enum, default_value_t = EngineSide::Black)]
    engine_color: EngineSide,

    /// Allow simple moves even when a capture is available
    #[arg(long = "optional-capture")]
    optional_capture: bool,

    /// JSON file of evaluation multipliers
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Start from a board diagram instead of the standard layout
    #[arg(long, value_name = "FILE")]
    position: Option<PathBuf>,

    /// Side to move in a loaded position
    #[arg(long = "to-move", value_enum, default_value_t = Side::Red)]
    to_move: Side,

    /// Stop after this many moves
    #[arg(long = "max-moves")]
    max_moves: Option<u32>,
}

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("reading engine config {}", path.display()))?;
            EngineConfig::load_from_json(&json)
                .with_context(|| format!("loading engine config {}", path.display()))?
        }
        None => EngineConfig::default(),
    };

    let policy = if args.optional_capture {
        CapturePolicy::Optional
    } else {
        CapturePolicy::Mandatory
    };

    let game = match &args.position {
        Some(path) => {
            let diagram = std::fs::read_to_string(path)
                .with_context(|| format!("reading position {}", path.display()))?;
            let board = Board::from_diagram(&diagram)
                .with_context(|| format!("parsing position {}", path.display()))?;
            GameState::from_board(board, args.to_move.into(), policy)
        }
        None => GameState::with_policy(policy),
    };

    let limit = args.time_ms.map_or_else(
        || SearchLimit::Depth(args.depth.unwrap_or(config.max_depth)),
        SearchLimit::Time,
    );
    info!(
        "engine plays {:?} with {limit:?}, captures {:?}",
        args.engine_color, policy
    );

    let mut app = App::new(game, Arc::new(config), args.engine_color, limit);
    if let Some(max_moves) = args.max_moves {
        app = app.with_max_moves(max_moves);
    }

    let stdin = io::stdin();
    let stdout = io::stdout();
    app.run(stdin.lock(), stdout.lock())
}
