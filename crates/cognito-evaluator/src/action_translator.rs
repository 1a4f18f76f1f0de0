//! Turns a target placement and the live piece pose into one per-tick action.
//!
//! Evaluation order:
//!
//! 1. At speedy levels, pull a far-away target closer when the piece is about
//!    to land, so it moves as far as it can instead of locking mid-way.
//! 2. If the column differs, shift toward the target. When that shift is
//!    blocked, soft-drop (outside speedy levels) or wait.
//! 3. If the rotation differs, rotate when the next rotation fits. Otherwise
//!    nudge one column toward, then away from, the target to make room, and
//!    fall back to soft drop or waiting.
//! 4. Once aligned, hard-drop.

use cognito_engine::{Action, Board, Piece};

/// Level at which the live engine starts shortening far targets.
pub const DEFAULT_SPEEDY_LEVEL: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TranslatorConfig {
    /// Level from which targets are shortened and soft drop is suppressed; `None` disables it.
    pub speedy_level: Option<usize>,
    pub allow_soft_drop: bool,
    /// Shift sideways to free space when a rotation is blocked.
    pub nudge_for_rotation: bool,
}

impl TranslatorConfig {
    /// Settings of the live decision engine.
    pub const LIVE: Self = Self {
        speedy_level: Some(DEFAULT_SPEEDY_LEVEL),
        allow_soft_drop: true,
        nudge_for_rotation: true,
    };

    /// Settings of simulated planned play: shift, else rotate, else hard-drop.
    pub const PLANNED: Self = Self {
        speedy_level: None,
        allow_soft_drop: false,
        nudge_for_rotation: false,
    };
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self::LIVE
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ActionTranslator {
    config: TranslatorConfig,
}

impl ActionTranslator {
    #[must_use]
    pub const fn new(config: TranslatorConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub const fn config(&self) -> &TranslatorConfig {
        &self.config
    }

    fn is_speedy(&self, level: usize) -> bool {
        self.config.speedy_level.is_some_and(|s| level >= s)
    }

    /// Target column after speedy shortening.
    ///
    /// When the horizontal distance exceeds the remaining fall plus one, the
    /// target moves to `x ± min(distance, max(1, fall / 2))`.
    #[must_use]
    pub fn effective_target_x(
        &self,
        board: &Board,
        current: Piece,
        target_x: i32,
        level: usize,
    ) -> i32 {
        if !self.is_speedy(level) {
            return target_x;
        }
        let remaining = board.fall_distance(current).unsigned_abs();
        let distance = target_x.abs_diff(current.x());
        if distance <= remaining + 1 {
            return target_x;
        }
        let step = i32::try_from(distance.min((remaining / 2).max(1))).unwrap_or(i32::MAX);
        if target_x > current.x() {
            current.x() + step
        } else {
            current.x() - step
        }
    }

    /// Picks the action that moves `current` toward `(target_rotation, target_x)`.
    ///
    /// `board` must not contain the falling piece's own cells.
    #[must_use]
    pub fn translate(
        &self,
        board: &Board,
        current: Piece,
        target_rotation: usize,
        target_x: i32,
        level: usize,
    ) -> Action {
        let target_rotation = target_rotation % current.kind().rotation_count();
        let target_x = self.effective_target_x(board, current, target_x, level);
        let fits = |piece: Piece| !board.is_piece_colliding(piece);
        let can_soft_drop =
            self.config.allow_soft_drop && !self.is_speedy(level) && fits(current.down());
        let fallback = if can_soft_drop {
            Action::SoftDrop
        } else {
            Action::Noop
        };

        if current.x() != target_x {
            let (moved, action) = toward(current, target_x);
            return if fits(moved) { action } else { fallback };
        }

        if current.rotation() != target_rotation {
            if fits(current.rotated()) {
                return Action::Rotate;
            }
            if self.config.nudge_for_rotation {
                let (moved, action) = toward(current, target_x);
                if fits(moved) {
                    return action;
                }
                let (moved, action) = away(current, target_x);
                if fits(moved) {
                    return action;
                }
            }
            return fallback;
        }

        Action::HardDrop
    }
}

/// One column toward `target_x`: right when the target is to the right, left otherwise.
fn toward(piece: Piece, target_x: i32) -> (Piece, Action) {
    if target_x > piece.x() {
        (piece.right(), Action::ShiftRight)
    } else {
        (piece.left(), Action::ShiftLeft)
    }
}

fn away(piece: Piece, target_x: i32) -> (Piece, Action) {
    if target_x > piece.x() {
        (piece.left(), Action::ShiftLeft)
    } else {
        (piece.right(), Action::ShiftRight)
    }
}
