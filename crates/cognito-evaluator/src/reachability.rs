//! Reachability check for a target placement under the host's tick rules.
//!
//! The check replays the host's movement automaton from the spawn pose. Each
//! tick takes at most one action and then applies gravity:
//!
//! 1. While `x` differs from the target, shift one column toward it.
//! 2. Once `x` matches, turn straight to the target rotation.
//! 3. If the shift was blocked and both `x` and rotation still differ, turn to
//!    the target rotation instead when that pose is free.
//!
//! Gravity then moves the piece down one row, or locks it if the row below is
//! occupied. The target is reachable iff the piece locks with exactly the
//! target rotation and column.

use cognito_engine::{Board, Piece, PieceKind};

/// Ticks simulated beyond the board height before giving up.
pub const EXTRA_TICKS: usize = 16;

/// Returns whether `kind`, spawned at `(5, 0)` with rotation 0, can lock at
/// `(target_rotation, target_x)`.
///
/// `target_rotation` is reduced modulo the kind's rotation count. Returns
/// `false` when the spawn pose already collides, when the piece locks
/// anywhere else, or when it does not lock within `rows + 16` ticks.
#[must_use]
pub fn is_reachable(
    board: &Board,
    kind: PieceKind,
    target_rotation: usize,
    target_x: i32,
) -> bool {
    let target_rotation = target_rotation % kind.rotation_count();
    let mut piece = Piece::new(kind);
    if board.is_piece_colliding(piece) {
        return false;
    }

    for _ in 0..board.row_count() + EXTRA_TICKS {
        let mut acted = false;
        if piece.x() != target_x {
            let moved = if piece.x() < target_x {
                piece.right()
            } else {
                piece.left()
            };
            if !board.is_piece_colliding(moved) {
                piece = moved;
                acted = true;
            }
        } else if piece.rotation() != target_rotation {
            let turned = piece.with_rotation(target_rotation);
            if !board.is_piece_colliding(turned) {
                piece = turned;
                acted = true;
            }
        }

        if !acted && piece.x() != target_x && piece.rotation() != target_rotation {
            let turned = piece.with_rotation(target_rotation);
            if !board.is_piece_colliding(turned) {
                piece = turned;
            }
        }

        let fallen = piece.down();
        if board.is_piece_colliding(fallen) {
            return piece.rotation() == target_rotation && piece.x() == target_x;
        }
        piece = fallen;
    }
    false
}

#[cfg(test)]
mod tests {
    use cognito_engine::PIECE_SPAWN_X;

    use super::*;

    #[test]
    fn test_spawn_pose_reachable_on_empty_board() {
        let board = Board::new(19, 15);
        for kind in PieceKind::ALL {
            assert!(is_reachable(&board, kind, 0, PIECE_SPAWN_X), "{kind:?}");
        }
    }

    #[test]
    fn test_colliding_spawn_is_unreachable() {
        let mut board = Board::new(19, 15);
        for col in 0..15 {
            board.set_cell(1, col, 1);
        }
        for kind in PieceKind::ALL {
            assert!(!is_reachable(&board, kind, 0, PIECE_SPAWN_X), "{kind:?}");
        }
    }

    #[test]
    fn test_targets_outside_legal_range_are_unreachable() {
        let board = Board::new(19, 15);
        for kind in PieceKind::ALL {
            for (rotation, &mask) in kind.masks().iter().enumerate() {
                let (x_min, x_max) = mask.x_range(board.col_count());
                assert!(!is_reachable(&board, kind, rotation, x_min - 1));
                assert!(!is_reachable(&board, kind, rotation, x_max + 1));
            }
        }
    }

    #[test]
    fn test_every_legal_target_reachable_on_empty_board() {
        let board = Board::new(19, 15);
        for kind in PieceKind::ALL {
            for (rotation, &mask) in kind.masks().iter().enumerate() {
                let (x_min, x_max) = mask.x_range(board.col_count());
                for x in x_min..=x_max {
                    assert!(
                        is_reachable(&board, kind, rotation, x),
                        "{kind:?} rotation {rotation} x {x}",
                    );
                }
            }
        }
    }

    #[test]
    fn test_blocked_path_is_unreachable() {
        let mut board = Board::new(19, 15);
        // a tall column at 4 stops the O piece from sliding left past it
        for row in 2..19 {
            board.set_cell(row, 4, 1);
        }
        assert!(!is_reachable(&board, PieceKind::O, 0, -1));
        assert!(is_reachable(&board, PieceKind::O, 0, 12));
    }

    #[test]
    fn test_turns_early_when_shift_is_blocked() {
        let mut board = Board::new(19, 15);
        for row in 3..19 {
            board.set_cell(row, 5, 1);
        }
        // vertical I cannot enter column 5, but the horizontal one can pass above it
        assert!(is_reachable(&board, PieceKind::I, 1, 4));
        assert!(!is_reachable(&board, PieceKind::I, 0, 4));
    }
}
