use crate::{
    PieceCollisionError,
    core::{
        board::{Board, DEFAULT_COLS, DEFAULT_ROWS},
        piece::Piece,
    },
};

use super::{
    Action, GameStats,
    piece_buffer::{PieceBuffer, QueuedPiece},
};

/// Rows a soft drop descends at most.
pub const SOFT_DROP_ROWS: usize = 3;

/// Board dimensions of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameConfig {
    pub rows: usize,
    pub cols: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            cols: DEFAULT_COLS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum SessionState {
    Playing,
    GameOver,
}

/// What happened to the falling piece during one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum TickOutcome {
    /// The piece is still falling.
    Falling,
    /// The piece locked and `cleared_lines` rows were removed.
    Locked { cleared_lines: usize },
    /// The game was already over; nothing changed.
    GameOver,
}

/// Frames between gravity steps at `level` in the host's render loop.
///
/// The host steps gravity on frames where `frame % (15 / level * 1.5) == 0`
/// with a fractional modulus, which only hits zero on multiples of the
/// smallest integer multiple of that period. Levels of 16 and above are
/// clamped to one step per frame.
///
/// ```
/// use cognito_engine::gravity_frames;
///
/// assert_eq!(gravity_frames(1), 45);
/// assert_eq!(gravity_frames(2), 21);
/// assert_eq!(gravity_frames(6), 3);
/// assert_eq!(gravity_frames(20), 1);
/// ```
#[must_use]
pub const fn gravity_frames(level: usize) -> u64 {
    let level = if level == 0 { 1 } else { level as u64 };
    let base = 15 / level;
    if base == 0 {
        1
    } else if base % 2 == 0 {
        base * 3 / 2
    } else {
        base * 3
    }
}

/// One game under the host's rules.
///
/// Moves are reverted when they collide, rotation only cycles forward, soft
/// drop descends up to [`SOFT_DROP_ROWS`] rows, and hard drop locks at once.
/// A piece locks when gravity cannot move it down; after a lock, full rows are
/// cleared and the next piece spawns at `(5, 0)`. The game is over when the
/// spawned piece collides.
#[derive(Debug, Clone)]
pub struct GameSession {
    config: GameConfig,
    board: Board,
    falling_piece: Piece,
    falling_color: u8,
    pieces: PieceBuffer,
    stats: GameStats,
    session_state: SessionState,
    total_frames: u64,
    pending_hard_drop: bool,
}

impl GameSession {
    /// Starts a game with a randomly seeded piece sequence.
    #[must_use]
    pub fn new(config: GameConfig) -> Self {
        Self::with_buffer(config, PieceBuffer::new())
    }

    /// Starts a game whose piece sequence is fully determined by `seed`.
    #[must_use]
    pub fn with_seed(config: GameConfig, seed: u64) -> Self {
        Self::with_buffer(config, PieceBuffer::with_seed(seed))
    }

    fn with_buffer(config: GameConfig, mut pieces: PieceBuffer) -> Self {
        let QueuedPiece { kind, color } = pieces.pop_next();
        let board = Board::new(config.rows, config.cols);
        let falling_piece = Piece::new(kind);
        let session_state = if board.is_piece_colliding(falling_piece) {
            SessionState::GameOver
        } else {
            SessionState::Playing
        };
        Self {
            config,
            board,
            falling_piece,
            falling_color: color,
            pieces,
            stats: GameStats::new(),
            session_state,
            total_frames: 0,
            pending_hard_drop: false,
        }
    }

    #[must_use]
    pub fn config(&self) -> GameConfig {
        self.config
    }

    /// Locked cells only; the falling piece is not stamped.
    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn falling_piece(&self) -> Piece {
        self.falling_piece
    }

    #[must_use]
    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    #[must_use]
    pub fn level(&self) -> usize {
        self.stats.level()
    }

    #[must_use]
    pub fn session_state(&self) -> SessionState {
        self.session_state
    }

    #[must_use]
    pub fn total_frames(&self) -> u64 {
        self.total_frames
    }

    /// Board with the falling piece stamped in its color, as the host shows it.
    #[must_use]
    pub fn render_board(&self) -> Board {
        let mut board = self.board.clone();
        if self.session_state.is_playing() {
            board.fill_piece(self.falling_piece, self.falling_color);
        }
        board
    }

    fn try_set_falling_piece(&mut self, piece: Piece) -> Result<(), PieceCollisionError> {
        if self.board.is_piece_colliding(piece) {
            return Err(PieceCollisionError);
        }
        self.falling_piece = piece;
        Ok(())
    }

    pub fn try_move_left(&mut self) -> Result<(), PieceCollisionError> {
        self.try_set_falling_piece(self.falling_piece.left())
    }

    pub fn try_move_right(&mut self) -> Result<(), PieceCollisionError> {
        self.try_set_falling_piece(self.falling_piece.right())
    }

    /// Turns the piece to its next rotation variant in place (no wall kick).
    pub fn try_rotate(&mut self) -> Result<(), PieceCollisionError> {
        self.try_set_falling_piece(self.falling_piece.rotated())
    }

    fn try_move_down(&mut self) -> Result<(), PieceCollisionError> {
        self.try_set_falling_piece(self.falling_piece.down())
    }

    /// Moves the piece down up to [`SOFT_DROP_ROWS`] rows; returns the rows moved.
    ///
    /// Soft drop never locks the piece.
    pub fn soft_drop(&mut self) -> usize {
        let mut moved = 0;
        while moved < SOFT_DROP_ROWS && self.try_move_down().is_ok() {
            moved += 1;
        }
        moved
    }

    /// Drops the piece to rest and locks it.
    pub fn hard_drop(&mut self) -> TickOutcome {
        if self.session_state.is_game_over() {
            return TickOutcome::GameOver;
        }
        while self.try_move_down().is_ok() {}
        self.lock_falling_piece()
    }

    /// Moves the piece down one row, locking it if it cannot move.
    pub fn gravity(&mut self) -> TickOutcome {
        if self.session_state.is_game_over() {
            return TickOutcome::GameOver;
        }
        if self.try_move_down().is_ok() {
            return TickOutcome::Falling;
        }
        self.lock_falling_piece()
    }

    /// Applies a single action without gravity.
    pub fn apply(&mut self, action: Action) -> TickOutcome {
        if self.session_state.is_game_over() {
            return TickOutcome::GameOver;
        }
        match action {
            Action::ShiftLeft => {
                let _ = self.try_move_left();
            }
            Action::ShiftRight => {
                let _ = self.try_move_right();
            }
            Action::Rotate => {
                let _ = self.try_rotate();
            }
            Action::SoftDrop => {
                self.soft_drop();
            }
            Action::HardDrop => return self.hard_drop(),
            Action::Noop => {}
        }
        TickOutcome::Falling
    }

    /// Applies `action` and then one gravity step.
    ///
    /// Gravity also runs after a hard drop; it then acts on the freshly spawned
    /// piece. The returned outcome reports the first lock of the tick.
    pub fn tick(&mut self, action: Action) -> TickOutcome {
        let outcome = self.apply(action);
        let after_gravity = self.gravity();
        match outcome {
            TickOutcome::Falling => after_gravity,
            locked_or_over => locked_or_over,
        }
    }

    /// Advances the host's render loop by one frame.
    ///
    /// Shifts, rotation and soft drop take effect immediately. A hard drop is
    /// held until the next gravity frame and replaces that frame's gravity
    /// step. Gravity runs every [`gravity_frames`] frames of the current level.
    pub fn advance_frame(&mut self, input: Action) -> TickOutcome {
        if self.session_state.is_game_over() {
            return TickOutcome::GameOver;
        }
        if input == Action::HardDrop {
            self.pending_hard_drop = true;
        } else {
            self.apply(input);
        }
        self.total_frames += 1;
        if self.total_frames % gravity_frames(self.level()) != 0 {
            return TickOutcome::Falling;
        }
        if std::mem::take(&mut self.pending_hard_drop) {
            self.hard_drop()
        } else {
            self.gravity()
        }
    }

    fn lock_falling_piece(&mut self) -> TickOutcome {
        self.board
            .fill_piece(self.falling_piece, self.falling_color);
        let cleared_lines = self.board.clear_lines();
        self.stats.complete_piece_drop(cleared_lines);

        let QueuedPiece { kind, color } = self.pieces.pop_next();
        self.falling_piece = Piece::new(kind);
        self.falling_color = color;
        if self.board.is_piece_colliding(self.falling_piece) {
            self.session_state = SessionState::GameOver;
        }
        TickOutcome::Locked { cleared_lines }
    }
}

#[cfg(test)]
mod tests {
    use crate::{PIECE_SPAWN_X, PieceKind};

    use super::*;

    fn session_with(board: Board, kind: PieceKind) -> GameSession {
        let config = GameConfig {
            rows: board.row_count(),
            cols: board.col_count(),
        };
        let mut session = GameSession::with_seed(config, 0);
        session.board = board;
        session.falling_piece = Piece::new(kind);
        session.falling_color = 2;
        session
    }

    #[test]
    fn test_shift_reverts_on_wall() {
        let mut session = session_with(Board::new(19, 15), PieceKind::O);
        // O occupies column offsets 1..=2, so the anchor can reach -1
        for _ in 0..6 {
            assert!(session.try_move_left().is_ok());
        }
        assert_eq!(session.falling_piece().x(), -1);
        assert!(session.try_move_left().is_err());
        assert_eq!(session.falling_piece().x(), -1);
    }

    #[test]
    fn test_rotate_cycles_and_reverts_on_collision() {
        let mut session = session_with(Board::new(19, 15), PieceKind::I);
        assert!(session.try_rotate().is_ok());
        assert_eq!(session.falling_piece().rotation(), 1);
        assert!(session.try_rotate().is_ok());
        assert_eq!(session.falling_piece().rotation(), 0);

        // vertical I pressed against the left wall cannot turn horizontal
        let mut session = session_with(Board::new(19, 15), PieceKind::I);
        session.falling_piece = session.falling_piece.with_x(-1);
        assert!(session.try_rotate().is_err());
        assert_eq!(session.falling_piece().rotation(), 0);
    }

    #[test]
    fn test_soft_drop_moves_at_most_three_rows() {
        let mut session = session_with(Board::new(6, 6), PieceKind::O);
        session.falling_piece = session.falling_piece.with_x(1);
        assert_eq!(session.soft_drop(), 3);
        assert_eq!(session.falling_piece().y(), 3);
        assert_eq!(session.soft_drop(), 1);
        assert_eq!(session.soft_drop(), 0);
        assert_eq!(session.stats().completed_pieces(), 0);
    }

    #[test]
    fn test_hard_drop_locks_and_clears() {
        let board = Board::from_ascii(
            19,
            "
            ######...######
            ######...######
            ",
        );
        let mut session = session_with(board, PieceKind::O);
        // spawned O covers columns 6..=7 and leaves column 8 open
        assert_eq!(session.falling_piece().x(), PIECE_SPAWN_X);
        let outcome = session.tick(Action::HardDrop);
        assert_eq!(outcome, TickOutcome::Locked { cleared_lines: 0 });
        assert_eq!(session.stats().completed_pieces(), 1);
        assert!(session.board().is_filled(17, 6));
        assert!(session.board().is_filled(18, 7));
        assert_eq!(session.board().cell(18, 7), 2);
        assert!(!session.board().is_filled(18, 8));
    }

    #[test]
    fn test_line_clear_updates_stats() {
        let board = Board::from_ascii(
            19,
            "
            ######..#######
            ######..#######
            ",
        );
        let mut session = session_with(board, PieceKind::O);
        assert_eq!(
            session.apply(Action::HardDrop),
            TickOutcome::Locked { cleared_lines: 2 }
        );
        assert_eq!(session.stats().total_cleared_lines(), 2);
        assert_eq!(session.stats().score(), 2);
        assert_eq!(session.board().filled_count(), 0);
    }

    #[test]
    fn test_gravity_locks_when_blocked() {
        let mut session = session_with(Board::new(4, 8), PieceKind::O);
        assert_eq!(session.tick(Action::Noop), TickOutcome::Falling);
        assert_eq!(session.tick(Action::Noop), TickOutcome::Falling);
        assert!(session.tick(Action::Noop).is_locked());
        assert_eq!(session.stats().completed_pieces(), 1);
    }

    #[test]
    fn test_top_out_ends_game() {
        let mut board = Board::new(4, 8);
        for row in 2..4 {
            for col in 0..8 {
                if col != 0 {
                    board.set_cell(row, col, 1);
                }
            }
        }
        let mut session = session_with(board, PieceKind::O);
        assert!(session.tick(Action::Noop).is_locked());
        assert!(session.session_state().is_game_over());
        assert_eq!(session.tick(Action::ShiftLeft), TickOutcome::GameOver);
        assert_eq!(session.stats().completed_pieces(), 1);
    }

    #[test]
    fn test_hard_drop_waits_for_gravity_frame() {
        let mut session = session_with(Board::new(19, 15), PieceKind::T);
        let period = gravity_frames(1);
        assert_eq!(
            session.advance_frame(Action::HardDrop),
            TickOutcome::Falling
        );
        for _ in 1..period - 1 {
            assert_eq!(session.advance_frame(Action::Noop), TickOutcome::Falling);
        }
        assert_eq!(session.stats().completed_pieces(), 0);
        assert!(session.advance_frame(Action::Noop).is_locked());
        assert_eq!(session.stats().completed_pieces(), 1);
    }

    #[test]
    fn test_same_seed_same_game() {
        let run = |seed| {
            let mut session = GameSession::with_seed(GameConfig::default(), seed);
            let mut kinds = vec![];
            for _ in 0..30 {
                kinds.push(session.falling_piece().kind());
                session.tick(Action::HardDrop);
            }
            (kinds, session.board().clone())
        };
        assert_eq!(run(9), run(9));
    }
}
