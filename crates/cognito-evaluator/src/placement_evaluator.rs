//! Placement scoring.
//!
//! The default [`WeightedPlacementEvaluator`] scores a placement as
//!
//! ```text
//! score = Σ wᵢ·fᵢ + LINE_CLEAR_BONUS · cleared_lines
//! ```
//!
//! where `fᵢ` are the raw [`BoardFeatures`](crate::board_analysis::BoardFeatures)
//! of the board after the clear and `wᵢ` are the [`PlacementWeights`].

use std::fmt;

use crate::{
    placement_analysis::PlacementAnalysis,
    weights::{LINE_CLEAR_BONUS, PlacementWeights},
};

/// Assigns a score to a placement; higher is better.
pub trait PlacementEvaluator: fmt::Debug + Send + Sync {
    fn evaluate_placement(&self, analysis: &PlacementAnalysis) -> f32;
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightedPlacementEvaluator {
    weights: PlacementWeights,
}

impl WeightedPlacementEvaluator {
    #[must_use]
    pub const fn new(weights: PlacementWeights) -> Self {
        Self { weights }
    }

    #[must_use]
    pub const fn weights(&self) -> &PlacementWeights {
        &self.weights
    }
}

impl Default for WeightedPlacementEvaluator {
    fn default() -> Self {
        Self::new(PlacementWeights::BASELINE)
    }
}

impl PlacementEvaluator for WeightedPlacementEvaluator {
    #[inline]
    #[expect(clippy::cast_precision_loss)]
    fn evaluate_placement(&self, analysis: &PlacementAnalysis) -> f32 {
        self.weights.dot(analysis.board_analysis().features())
            + LINE_CLEAR_BONUS * analysis.cleared_lines() as f32
    }
}

#[cfg(test)]
mod tests {
    use cognito_engine::{Board, PieceKind};

    use super::*;
    use crate::placement_analysis::Placement;

    #[test]
    fn test_line_clear_bonus_applied() {
        let board = Board::from_ascii(
            4,
            "
            .###
            ",
        );
        // vertical I in column 0 completes the bottom row
        let placement = Placement {
            kind: PieceKind::I,
            rotation: 0,
            x: -1,
            y: 0,
        };
        let analysis = PlacementAnalysis::from_board(&board, placement);
        assert_eq!(analysis.cleared_lines(), 1);

        let zero = WeightedPlacementEvaluator::new(PlacementWeights::new([0.0; 6]));
        let score = zero.evaluate_placement(&analysis);
        assert!((score - LINE_CLEAR_BONUS).abs() < 1e-6);
    }

    #[test]
    fn test_baseline_prefers_flat_board() {
        let board = Board::new(6, 4);
        let evaluator = WeightedPlacementEvaluator::default();
        let flat = PlacementAnalysis::from_board(
            &board,
            Placement {
                kind: PieceKind::I,
                rotation: 1,
                x: 0,
                y: 4,
            },
        );
        let tall = PlacementAnalysis::from_board(
            &board,
            Placement {
                kind: PieceKind::I,
                rotation: 0,
                x: -1,
                y: 2,
            },
        );
        assert_eq!(flat.cleared_lines(), 1);
        assert!(evaluator.evaluate_placement(&flat) > evaluator.evaluate_placement(&tall));
    }
}
