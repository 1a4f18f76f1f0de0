//! Placement search: choosing where the current piece should land.
//!
//! Every rotation variant is tried at every anchor column its cells fit in,
//! in rotation order and then left to right. Each candidate is hard-dropped
//! from row 0, stamped, and scored by a [`PlacementEvaluator`]. The highest
//! score wins; on equal scores the first candidate in enumeration order is
//! kept.
//!
//! In [`SearchMode::Validated`] a candidate only counts if
//! [`is_reachable`] confirms the host's tick rules can bring a freshly spawned
//! piece there. [`SearchMode::Unvalidated`] skips that check; it suits a bot
//! that re-decides every tick against the live pose.
//!
//! When no candidate qualifies, the search returns a fixed fallback target.

use cognito_engine::{Board, PieceKind};
use serde::Serialize;
use tracing::debug;

use crate::{
    placement_analysis::{Placement, PlacementAnalysis},
    placement_evaluator::PlacementEvaluator,
    reachability::is_reachable,
};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    /// Only accept placements reachable from the spawn pose.
    Validated,
    #[default]
    Unvalidated,
}

/// Rotation index and anchor column to steer the piece toward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Target {
    pub rotation: usize,
    pub x: i32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub placement: Placement,
    pub score: f32,
    pub cleared_lines: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, derive_more::IsVariant)]
pub enum SearchResult {
    Best(Candidate),
    /// No candidate qualified.
    Fallback(Target),
}

impl SearchResult {
    #[must_use]
    pub fn target(&self) -> Target {
        match self {
            SearchResult::Best(candidate) => Target {
                rotation: candidate.placement.rotation,
                x: candidate.placement.x,
            },
            SearchResult::Fallback(target) => *target,
        }
    }

    #[must_use]
    pub fn candidate(&self) -> Option<&Candidate> {
        match self {
            SearchResult::Best(candidate) => Some(candidate),
            SearchResult::Fallback(_) => None,
        }
    }
}

/// Target used when no placement qualifies: rotation 0 at `max(0, min(cols - 4, cols / 2 - 2))`.
#[must_use]
pub fn fallback_target(cols: usize) -> Target {
    let cols = i32::try_from(cols).unwrap_or(i32::MAX);
    Target {
        rotation: 0,
        x: (cols - 4).min(cols / 2 - 2).max(0),
    }
}

/// Hard-drop placements of `kind` in enumeration order.
///
/// Columns where the piece already collides at row 0 are skipped.
pub fn candidate_placements(
    board: &Board,
    kind: PieceKind,
) -> impl Iterator<Item = Placement> + '_ {
    kind.masks()
        .iter()
        .enumerate()
        .flat_map(move |(rotation, &mask)| {
            let (x_min, x_max) = mask.x_range(board.col_count());
            (x_min..=x_max).filter_map(move |x| {
                let y = board.drop_y(mask, x)?;
                Some(Placement {
                    kind,
                    rotation,
                    x,
                    y,
                })
            })
        })
}

#[derive(Debug)]
pub struct PlacementSearch<'a> {
    placement_evaluator: Box<dyn PlacementEvaluator + 'a>,
    mode: SearchMode,
}

impl<'a> PlacementSearch<'a> {
    #[must_use]
    pub fn new(placement_evaluator: Box<dyn PlacementEvaluator + 'a>, mode: SearchMode) -> Self {
        Self {
            placement_evaluator,
            mode,
        }
    }

    #[must_use]
    pub fn mode(&self) -> SearchMode {
        self.mode
    }

    /// Selects the best placement of `kind` on `board`.
    ///
    /// `board` must hold locked cells only.
    #[must_use]
    pub fn select(&self, board: &Board, kind: PieceKind) -> SearchResult {
        let mut best: Option<Candidate> = None;

        for placement in candidate_placements(board, kind) {
            if self.mode == SearchMode::Validated
                && !is_reachable(board, kind, placement.rotation, placement.x)
            {
                continue;
            }
            let analysis = PlacementAnalysis::from_board(board, placement);
            let score = self.placement_evaluator.evaluate_placement(&analysis);
            if best.is_none_or(|b| score > b.score) {
                best = Some(Candidate {
                    placement,
                    score,
                    cleared_lines: analysis.cleared_lines(),
                });
            }
        }

        match best {
            Some(candidate) => SearchResult::Best(candidate),
            None => {
                let target = fallback_target(board.col_count());
                debug!(
                    ?kind,
                    ?target,
                    mode = ?self.mode,
                    "no placement qualified, using fallback"
                );
                SearchResult::Fallback(target)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        board_analysis::{BoardAnalysis, BoardFeatures},
        placement_evaluator::WeightedPlacementEvaluator,
        weights::PlacementWeights,
    };

    fn search(mode: SearchMode) -> PlacementSearch<'static> {
        PlacementSearch::new(Box::new(WeightedPlacementEvaluator::default()), mode)
    }

    fn features_after(board: &Board, placement: Placement) -> BoardFeatures {
        let analysis = PlacementAnalysis::from_board(board, placement);
        BoardAnalysis::from_board(analysis.board()).features()
    }

    #[test]
    fn test_fallback_target() {
        assert_eq!(fallback_target(15), Target { rotation: 0, x: 5 });
        assert_eq!(fallback_target(10), Target { rotation: 0, x: 3 });
        assert_eq!(fallback_target(6), Target { rotation: 0, x: 1 });
        assert_eq!(fallback_target(4), Target { rotation: 0, x: 0 });
        assert_eq!(fallback_target(2), Target { rotation: 0, x: 0 });
    }

    #[test]
    fn test_full_board_falls_back() {
        let mut board = Board::new(19, 15);
        for row in 0..4 {
            for col in 0..15 {
                board.set_cell(row, col, 1);
            }
        }
        for kind in PieceKind::ALL {
            assert_eq!(candidate_placements(&board, kind).count(), 0);
            let result = search(SearchMode::Unvalidated).select(&board, kind);
            assert_eq!(result, SearchResult::Fallback(Target { rotation: 0, x: 5 }));
        }
    }

    #[test]
    fn test_candidate_order() {
        let board = Board::new(19, 15);
        let placements: Vec<_> = candidate_placements(&board, PieceKind::I).collect();
        // 15 vertical columns then 12 horizontal ones
        assert_eq!(placements.len(), 15 + 12);
        assert_eq!((placements[0].rotation, placements[0].x), (0, -1));
        assert_eq!((placements[14].rotation, placements[14].x), (0, 13));
        assert_eq!((placements[15].rotation, placements[15].x), (1, 0));
        assert!(
            placements
                .iter()
                .all(|p| !board.is_colliding(PieceKind::I.mask(p.rotation), p.x, p.y))
        );
    }

    #[test]
    fn test_square_ties_choose_leftmost_column() {
        let board = Board::new(19, 15);
        let result = search(SearchMode::Unvalidated).select(&board, PieceKind::O);
        assert_eq!(result.target(), Target { rotation: 0, x: -1 });
        let validated = search(SearchMode::Validated).select(&board, PieceKind::O);
        assert_eq!(validated, result);
    }

    #[test]
    fn test_chooses_minimal_height_and_holes_on_empty_board() {
        let board = Board::new(19, 15);
        for kind in PieceKind::ALL {
            let features: Vec<_> = candidate_placements(&board, kind)
                .map(|p| features_after(&board, p))
                .collect();
            let min_height = features.iter().map(|f| f.aggregate_height).min().unwrap();
            let min_holes = features.iter().map(|f| f.holes).min().unwrap();

            let result = search(SearchMode::Unvalidated).select(&board, kind);
            let chosen = features_after(&board, result.candidate().unwrap().placement);
            assert_eq!(chosen.aggregate_height, min_height, "{kind:?}");
            assert_eq!(chosen.holes, min_holes, "{kind:?}");
        }
    }

    #[test]
    fn test_validated_mode_skips_unreachable_slot() {
        let mut board = Board::new(19, 15);
        for row in 17..19 {
            for col in 2..15 {
                board.set_cell(row, col, 1);
            }
        }
        for row in 2..17 {
            board.set_cell(row, 4, 1);
        }

        let unvalidated = search(SearchMode::Unvalidated).select(&board, PieceKind::O);
        let candidate = unvalidated.candidate().unwrap();
        assert_eq!(unvalidated.target(), Target { rotation: 0, x: -1 });
        assert_eq!(candidate.cleared_lines, 2);

        let validated = search(SearchMode::Validated).select(&board, PieceKind::O);
        let target = validated.target();
        assert!(target.x >= 4, "{target:?}");
        assert!(is_reachable(&board, PieceKind::O, target.rotation, target.x));
    }

    #[test]
    fn test_weights_change_choice() {
        let board = Board::from_ascii(
            19,
            "
            .##############
            .##############
            .##############
            ",
        );
        // baseline takes the three-line clear with a vertical I
        let result = search(SearchMode::Unvalidated).select(&board, PieceKind::I);
        let candidate = result.candidate().unwrap();
        assert_eq!(result.target(), Target { rotation: 0, x: -1 });
        assert_eq!(candidate.cleared_lines, 3);

        // a search that rewards height avoids the well
        let inverted = PlacementSearch::new(
            Box::new(WeightedPlacementEvaluator::new(PlacementWeights::new([
                1.0, 0.0, 0.0, 0.0, 0.0, 0.0,
            ]))),
            SearchMode::Unvalidated,
        );
        let result = inverted.select(&board, PieceKind::I);
        assert_eq!(result.candidate().unwrap().cleared_lines, 0);
    }
}
