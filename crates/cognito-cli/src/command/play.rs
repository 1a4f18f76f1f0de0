use std::{collections::VecDeque, path::PathBuf};

use cognito_engine::{Action, ActionQueue, GameConfig, GameSession, TickOutcome};
use cognito_evaluator::decision::{DecisionEngine, Observation};
use serde::Serialize;
use tracing::{debug, info};

use crate::{
    command_queue::CommandQueue,
    util::{self, Output},
};

/// Host frame rate.
const FRAMES_PER_SECOND: u64 = 60;
/// The host asks its bot for an action about every 120 ms.
const DEFAULT_DECISION_INTERVAL: u64 = 7;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct PlayArg {
    /// Weights file (JSON array of 6 numbers) [default: baseline weights]
    #[arg(long)]
    weights: Option<PathBuf>,
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Frames between two decisions
    #[arg(
        long,
        default_value_t = DEFAULT_DECISION_INTERVAL,
        value_parser = clap::value_parser!(u64).range(1..),
    )]
    decision_interval: u64,
    /// Stop after this many frames
    #[arg(long, default_value_t = FRAMES_PER_SECOND * 60 * 10)]
    max_frames: u64,
    /// Take actions from the command queue file instead of the decision engine
    #[arg(long)]
    from_queue: bool,
    /// Queue file used with --from-queue [default: $COGNITO_CMD_FILE or command_queue.json]
    #[arg(long)]
    queue_file: Option<PathBuf>,
    /// Print the final board to stderr
    #[arg(long)]
    show_board: bool,
    /// Output file path [default: stdout]
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug)]
enum ActionSource<'a> {
    Engine(DecisionEngine<'a>),
    Queue(CommandQueue),
}

impl ActionSource<'_> {
    fn poll(&self, session: &GameSession, pending: &mut impl ActionQueue) -> anyhow::Result<()> {
        match self {
            ActionSource::Engine(engine) => {
                let action = engine.decide(&Observation::from_session(session));
                if action != Action::Noop {
                    pending.push(action);
                }
            }
            ActionSource::Queue(queue) => {
                for record in queue.drain(None)? {
                    match record.action() {
                        Some(action) => pending.push(action),
                        None => debug!(key = %record.key, "skipping unknown key"),
                    }
                }
            }
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
struct PlayReport {
    seed: u64,
    frames: u64,
    pieces: usize,
    lines: usize,
    level: usize,
    game_over: bool,
}

pub(crate) fn run(arg: &PlayArg) -> anyhow::Result<()> {
    let PlayArg {
        weights,
        seed,
        decision_interval,
        max_frames,
        from_queue,
        queue_file,
        show_board,
        output,
    } = arg;

    let source = if *from_queue {
        let queue = queue_file
            .as_ref()
            .map_or_else(CommandQueue::from_env, CommandQueue::new);
        info!(path = %queue.path().display(), "reading actions from command queue");
        ActionSource::Queue(queue)
    } else {
        ActionSource::Engine(DecisionEngine::new(util::load_weights(weights.as_deref())?))
    };

    let mut session = GameSession::with_seed(GameConfig::default(), *seed);
    let mut pending: VecDeque<Action> = VecDeque::new();
    while session.total_frames() < *max_frames && session.session_state().is_playing() {
        if session.total_frames() % decision_interval == 0 {
            source.poll(&session, &mut pending)?;
        }
        let action = pending.next_or_noop();
        if let TickOutcome::Locked { cleared_lines } = session.advance_frame(action) {
            debug!(
                frame = session.total_frames(),
                cleared_lines,
                level = session.level(),
                "piece locked"
            );
        }
    }

    let stats = session.stats();
    let report = PlayReport {
        seed: *seed,
        frames: session.total_frames(),
        pieces: stats.completed_pieces(),
        lines: stats.total_cleared_lines(),
        level: stats.level(),
        game_over: session.session_state().is_game_over(),
    };
    info!(
        frames = report.frames,
        pieces = report.pieces,
        lines = report.lines,
        "play finished"
    );
    if *show_board {
        eprintln!("{:?}", session.render_board());
    }
    Output::save_json(&report, output.as_deref())
}
