//! Simulated play: planning each piece once and driving it home tick by tick.
//!
//! For every piece the player searches the locked board in
//! [`SearchMode::Validated`] mode, then issues one planned action per tick
//! (shift, then rotate, then hard drop) until the piece locks. When the chosen
//! target failed the reachability check (only the fallback can), the piece is
//! left to gravity instead. Each piece gets at most `rows + 32` ticks.

use cognito_engine::{Action, GameConfig, GameSession, TickOutcome};
use serde::Serialize;
use tracing::debug;

use crate::{
    action_translator::{ActionTranslator, TranslatorConfig},
    placement_evaluator::{PlacementEvaluator, WeightedPlacementEvaluator},
    placement_search::{PlacementSearch, SearchMode},
    reachability::is_reachable,
    weights::PlacementWeights,
};

/// Ticks allowed per piece beyond the board height.
pub const TICK_GUARD_EXTRA: usize = 32;

/// Result of one simulated game.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GameOutcome {
    pub lines: usize,
    pub pieces: usize,
}

impl GameOutcome {
    /// Lines cleared per placed piece; a game without pieces counts as one piece.
    #[must_use]
    #[expect(clippy::cast_precision_loss)]
    pub fn lines_per_piece(&self) -> f32 {
        self.lines as f32 / self.pieces.max(1) as f32
    }
}

/// What happened while driving a single piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum PieceOutcome {
    Locked { cleared_lines: usize },
    /// The tick guard ran out before the piece locked.
    Stalled,
    GameOver,
}

#[derive(Debug)]
pub struct SessionPlayer<'a> {
    search: PlacementSearch<'a>,
    translator: ActionTranslator,
}

impl Default for SessionPlayer<'_> {
    fn default() -> Self {
        Self::new(PlacementWeights::BASELINE)
    }
}

impl<'a> SessionPlayer<'a> {
    #[must_use]
    pub fn new(weights: PlacementWeights) -> Self {
        Self::with_evaluator(Box::new(WeightedPlacementEvaluator::new(weights)))
    }

    #[must_use]
    pub fn with_evaluator(placement_evaluator: Box<dyn PlacementEvaluator + 'a>) -> Self {
        Self {
            search: PlacementSearch::new(placement_evaluator, SearchMode::Validated),
            translator: ActionTranslator::new(TranslatorConfig::PLANNED),
        }
    }

    /// Plans the falling piece of `session` and ticks until it locks.
    pub fn place_piece(&self, session: &mut GameSession) -> PieceOutcome {
        if session.session_state().is_game_over() {
            return PieceOutcome::GameOver;
        }
        let board = session.board().clone();
        let kind = session.falling_piece().kind();
        let target = self.search.select(&board, kind).target();
        let reachable = is_reachable(&board, kind, target.rotation, target.x);

        for _ in 0..board.row_count() + TICK_GUARD_EXTRA {
            let action = if reachable {
                let level = session.level();
                self.translator.translate(
                    session.board(),
                    session.falling_piece(),
                    target.rotation,
                    target.x,
                    level,
                )
            } else {
                Action::Noop
            };
            match session.tick(action) {
                TickOutcome::Falling => {}
                TickOutcome::Locked { cleared_lines } => {
                    return PieceOutcome::Locked { cleared_lines };
                }
                TickOutcome::GameOver => return PieceOutcome::GameOver,
            }
        }
        PieceOutcome::Stalled
    }

    /// Plays one game of up to `max_pieces` placements with the piece sequence of `seed`.
    #[must_use]
    pub fn play_game(&self, config: GameConfig, seed: u64, max_pieces: usize) -> GameOutcome {
        let mut session = GameSession::with_seed(config, seed);
        self.play_session(&mut session, max_pieces)
    }

    /// Places up to `max_pieces` pieces or until the game is over.
    ///
    /// `lines` is the session's total, so lines cleared by a lock that also
    /// ended the game are included.
    pub fn play_session(&self, session: &mut GameSession, max_pieces: usize) -> GameOutcome {
        let mut pieces = 0;
        while pieces < max_pieces && session.session_state().is_playing() {
            self.place_piece(session);
            pieces += 1;
        }
        let outcome = GameOutcome {
            lines: session.stats().total_cleared_lines(),
            pieces,
        };
        debug!(
            lines = outcome.lines,
            pieces,
            game_over = session.session_state().is_game_over(),
            "game finished"
        );
        outcome
    }
}

#[cfg(test)]
mod tests {
    use cognito_engine::Board;

    use super::*;

    #[test]
    fn test_same_seed_same_outcome() {
        let player = SessionPlayer::default();
        let config = GameConfig::default();
        let first = player.play_game(config, 42, 60);
        let second = player.play_game(config, 42, 60);
        assert_eq!(first, second);
        assert!(first.pieces > 0);
    }

    #[test]
    fn test_zero_piece_budget() {
        let outcome = SessionPlayer::default().play_game(GameConfig::default(), 0, 0);
        assert_eq!(outcome, GameOutcome::default());
        assert!(outcome.lines_per_piece().abs() < f32::EPSILON);
    }

    #[test]
    fn test_baseline_clears_lines() {
        let outcome = SessionPlayer::default().play_game(GameConfig::default(), 0, 200);
        assert!(outcome.lines > 0, "{outcome:?}");
        assert!(outcome.pieces <= 200);
    }

    #[test]
    fn test_piece_lands_on_planned_target() {
        let mut session = GameSession::with_seed(GameConfig::default(), 3);
        let player = SessionPlayer::default();
        let outcome = player.place_piece(&mut session);
        assert_eq!(outcome, PieceOutcome::Locked { cleared_lines: 0 });
        assert_eq!(session.stats().completed_pieces(), 1);
        // the first piece rests on the floor
        let board: &Board = session.board();
        assert_eq!(board.filled_count(), 4);
        assert!(board.row(board.row_count() - 1).iter().any(|&c| c != 0));
    }

    #[test]
    fn test_game_over_session_is_left_alone() {
        let config = GameConfig { rows: 2, cols: 4 };
        let mut session = GameSession::with_seed(config, 0);
        let player = SessionPlayer::default();
        for _ in 0..10 {
            player.place_piece(&mut session);
        }
        assert!(session.session_state().is_game_over());
        assert_eq!(player.place_piece(&mut session), PieceOutcome::GameOver);
        let outcome = player.play_game(config, 0, 10);
        assert!(outcome.pieces <= 10);
    }

    #[test]
    fn test_lines_per_piece() {
        let outcome = GameOutcome {
            lines: 3,
            pieces: 12,
        };
        assert!((outcome.lines_per_piece() - 0.25).abs() < f32::EPSILON);
    }
}
