use std::path::PathBuf;

use cognito_engine::{GameConfig, GameSession};
use cognito_evaluator::session_player::SessionPlayer;
use cognito_training::{
    fitness::FitnessEvaluator,
    trainer::{FINAL_CHECK_FIRST_SEED, FINAL_CHECK_GAMES, FinalCheck, TrainingParams},
};

use crate::util::{self, Output};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct EvaluateArg {
    /// Weights file (JSON array of 6 numbers) [default: baseline weights]
    #[arg(long)]
    weights: Option<PathBuf>,
    /// Number of games
    #[arg(long, default_value_t = FINAL_CHECK_GAMES)]
    games: usize,
    /// Seed of the first game; later games use consecutive seeds
    #[arg(long, default_value_t = FINAL_CHECK_FIRST_SEED)]
    first_seed: u64,
    /// Piece cap per game
    #[arg(long, default_value_t = TrainingParams::DEFAULT.max_pieces)]
    max_pieces: usize,
    /// Output file path [default: stdout]
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct SimulateArg {
    /// Weights file (JSON array of 6 numbers) [default: baseline weights]
    #[arg(long)]
    weights: Option<PathBuf>,
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Piece cap
    #[arg(long, default_value_t = TrainingParams::DEFAULT.max_pieces)]
    max_pieces: usize,
    /// Print the final board to stderr
    #[arg(long)]
    show_board: bool,
}

pub(crate) fn run_evaluate(arg: &EvaluateArg) -> anyhow::Result<()> {
    let EvaluateArg {
        weights,
        games,
        first_seed,
        max_pieces,
        output,
    } = arg;
    let weights = util::load_weights(weights.as_deref())?;
    let evaluator = FitnessEvaluator {
        game_config: GameConfig::default(),
        games: *games,
        max_pieces: *max_pieces,
    };
    let check = FinalCheck::run(&evaluator, weights, *first_seed, *games);
    eprintln!(
        "Check over {} seeds: avg lines={:.1} ± {:.1}, avg LPP={:.3}",
        check.games, check.mean_lines, check.std_dev_lines, check.mean_lines_per_piece
    );
    Output::save_json(&check, output.as_deref())
}

pub(crate) fn run_simulate(arg: &SimulateArg) -> anyhow::Result<()> {
    let SimulateArg {
        weights,
        seed,
        max_pieces,
        show_board,
    } = arg;
    let weights = util::load_weights(weights.as_deref())?;
    let player = SessionPlayer::new(weights);
    let mut session = GameSession::with_seed(GameConfig::default(), *seed);
    let outcome = player.play_session(&mut session, *max_pieces);
    eprintln!(
        "seed {seed} -> lines={}, pieces={}, LPP≈{:.3}",
        outcome.lines,
        outcome.pieces,
        outcome.lines_per_piece()
    );
    if *show_board {
        eprintln!("{:?}", session.render_board());
    }
    Output::save_json(&outcome, None)
}
