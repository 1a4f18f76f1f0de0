//! Result of landing a piece: cleared lines plus the analysis of the board left behind.

use cognito_engine::{Board, PieceKind};
use serde::Serialize;

use crate::board_analysis::BoardAnalysis;

/// A resting position for a piece: rotation index, anchor column and landing row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Placement {
    pub kind: PieceKind,
    pub rotation: usize,
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Clone)]
pub struct PlacementAnalysis {
    placement: Placement,
    cleared_lines: usize,
    board: Board,
    board_analysis: BoardAnalysis,
}

impl PlacementAnalysis {
    #[must_use]
    pub fn from_board(before_placement: &Board, placement: Placement) -> Self {
        let mask = placement.kind.mask(placement.rotation);
        let (cleared_lines, board) =
            before_placement.place_and_clear(mask, placement.x, placement.y);
        let board_analysis = BoardAnalysis::from_board(&board);
        Self {
            placement,
            cleared_lines,
            board,
            board_analysis,
        }
    }

    #[must_use]
    pub fn placement(&self) -> Placement {
        self.placement
    }

    #[must_use]
    pub fn cleared_lines(&self) -> usize {
        self.cleared_lines
    }

    /// Board after the piece is stamped and full rows are cleared.
    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn board_analysis(&self) -> &BoardAnalysis {
        &self.board_analysis
    }
}
