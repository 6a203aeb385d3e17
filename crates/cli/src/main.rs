//! One-shot move advisor: reads a position, runs one engine, prints its move

use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use reversi_core::{Board, Color, Coord};
use reversi_mcts::{ClassicPlayer, GuidedPlayer, MctsConfig, Player, UctConfig, UniformEvaluator};
use tracing::info;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Engine {
    /// Time-boxed UCT with random rollouts
    Classic,
    /// Prior-guided search with the uniform evaluator
    Guided,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Side {
    Black,
    White,
}

impl From<Side> for Color {
    fn from(side: Side) -> Self {
        match side {
            Side::Black => Color::Black,
            Side::White => Color::White,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "reversi", about = "Suggest a move for a Reversi position")]
struct Args {
    /// Search engine to consult
    #[arg(long, value_enum, default_value_t = Engine::Guided)]
    engine: Engine,

    /// 64 cells in row-major order: X black, O white, - or . empty (defaults to the opening)
    #[arg(long)]
    position: Option<String>,

    /// Side to move
    #[arg(long, value_enum, default_value_t = Side::Black)]
    to_move: Side,

    /// Time budget per decision in milliseconds (classic engine)
    #[arg(long, default_value_t = 3000)]
    time_ms: u64,

    /// Iterations per decision (guided engine)
    #[arg(long, default_value_t = 400)]
    iterations: u32,

    /// Sample the move from noisy visit counts (guided engine)
    #[arg(long)]
    self_play: bool,

    /// Random seed
    #[arg(long)]
    seed: Option<u64>,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn init_tracing(level: &str) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(&args.log_level);

    let board = match &args.position {
        Some(text) => text.parse::<Board>().context("invalid --position")?,
        None => Board::new(),
    };
    let color = Color::from(args.to_move);

    println!("{}", board.to_rows());
    println!(
        "black {}  white {}  {} to move",
        board.black_count(),
        board.white_count(),
        color
    );

    match args.engine {
        Engine::Classic => {
            let mut config =
                UctConfig::default().with_time_budget(Duration::from_millis(args.time_ms));
            if let Some(seed) = args.seed {
                config = config.with_seed(seed);
            }
            info!(time_ms = args.time_ms, "running classic search");

            let mut player = ClassicPlayer::new(config);
            let mv = player.get_move(&board, color)?;
            println!("move: {mv}");
        }
        Engine::Guided => {
            let mut config = MctsConfig::default()
                .with_simulations(args.iterations)
                .with_self_play(args.self_play);
            if let Some(seed) = args.seed {
                config = config.with_seed(seed);
            }
            info!(
                iterations = args.iterations,
                self_play = args.self_play,
                "running guided search"
            );

            let mut player = GuidedPlayer::new(UniformEvaluator, config);
            let result = if args.self_play {
                player.self_play_move(&board, color)?
            } else {
                player.analyze(&board, color)?
            };

            println!("move: {}", result.best_move);
            for coord in Coord::all() {
                let p = result.probability(coord);
                if p > 0.0 {
                    println!(
                        "  {coord}  {p:.3}  ({} visits)",
                        result.visit_count_for_move(coord.into())
                    );
                }
            }
        }
    }

    Ok(())
}
