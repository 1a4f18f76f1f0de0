//! Board features used to score placements.
//!
//! All six features are computed together by [`BoardAnalysis::from_board`]:
//! one sweep down each column yields heights, holes and column transitions,
//! and one sweep along each row yields row transitions.
//!
//! Transitions count changes between filled and empty cells, treating the
//! cells just outside the board on both ends as filled. An empty row therefore
//! contributes 2 (wall to empty, empty to wall), as does an empty column.

use std::iter;

use cognito_engine::Board;
use serde::Serialize;

/// Number of features in a [`BoardFeatures`] vector.
pub const FEATURE_COUNT: usize = 6;

/// Feature names in weight-vector order.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "aggregate_height",
    "holes",
    "bumpiness",
    "max_height",
    "row_transitions",
    "column_transitions",
];

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct BoardFeatures {
    /// Sum of column heights.
    pub aggregate_height: u32,
    /// Empty cells with a filled cell somewhere above them in the same column.
    pub holes: u32,
    /// Sum of absolute height differences between adjacent columns.
    pub bumpiness: u32,
    pub max_height: u32,
    pub row_transitions: u32,
    pub column_transitions: u32,
}

impl BoardFeatures {
    /// Feature values in weight-vector order.
    #[must_use]
    #[expect(clippy::cast_precision_loss)]
    pub fn to_array(self) -> [f32; FEATURE_COUNT] {
        [
            self.aggregate_height as f32,
            self.holes as f32,
            self.bumpiness as f32,
            self.max_height as f32,
            self.row_transitions as f32,
            self.column_transitions as f32,
        ]
    }
}

#[derive(Debug, Clone)]
pub struct BoardAnalysis {
    column_heights: Vec<u32>,
    features: BoardFeatures,
}

impl BoardAnalysis {
    #[must_use]
    pub fn from_board(board: &Board) -> Self {
        let rows = board.row_count();
        let cols = board.col_count();
        let mut column_heights = vec![0; cols];
        let mut holes = 0;
        let mut column_transitions = 0;

        for (col, height) in column_heights.iter_mut().enumerate() {
            let mut prev_filled = true;
            for row in 0..rows {
                let filled = board.is_filled(row, col);
                if filled {
                    if *height == 0 {
                        *height = to_u32(rows - row);
                    }
                } else if *height > 0 {
                    holes += 1;
                }
                if filled != prev_filled {
                    column_transitions += 1;
                }
                prev_filled = filled;
            }
            if !prev_filled {
                column_transitions += 1;
            }
        }

        let row_transitions = board
            .rows()
            .map(|row| {
                let cells = iter::once(true)
                    .chain(row.iter().map(|&c| c != 0))
                    .chain(iter::once(true));
                let mut transitions = 0;
                let mut prev = None;
                for filled in cells {
                    if prev.is_some_and(|p| p != filled) {
                        transitions += 1;
                    }
                    prev = Some(filled);
                }
                transitions
            })
            .sum();

        let aggregate_height = column_heights.iter().sum();
        let bumpiness = column_heights
            .windows(2)
            .map(|w| w[0].abs_diff(w[1]))
            .sum();
        let max_height = column_heights.iter().copied().max().unwrap_or(0);

        Self {
            column_heights,
            features: BoardFeatures {
                aggregate_height,
                holes,
                bumpiness,
                max_height,
                row_transitions,
                column_transitions,
            },
        }
    }

    /// Height of each column: rows minus the index of its topmost filled cell, 0 when empty.
    #[must_use]
    pub fn column_heights(&self) -> &[u32] {
        &self.column_heights
    }

    #[must_use]
    pub fn features(&self) -> BoardFeatures {
        self.features
    }
}

fn to_u32(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn features(rows: usize, art: &str) -> BoardFeatures {
        BoardAnalysis::from_board(&Board::from_ascii(rows, art)).features()
    }

    #[test]
    fn test_empty_board() {
        let analysis = BoardAnalysis::from_board(&Board::new(19, 15));
        assert_eq!(analysis.column_heights(), &[0; 15]);
        assert_eq!(
            analysis.features(),
            BoardFeatures {
                aggregate_height: 0,
                holes: 0,
                bumpiness: 0,
                max_height: 0,
                // every empty row and column touches two walls
                row_transitions: 2 * 19,
                column_transitions: 2 * 15,
            }
        );
    }

    #[test]
    fn test_bottom_contiguous_columns_have_no_holes() {
        let f = features(
            6,
            "
            .#...
            .##..
            ###.#
            ",
        );
        assert_eq!(f.holes, 0);
        assert_eq!(f.aggregate_height, 1 + 3 + 2 + 0 + 1);
        assert_eq!(f.max_height, 3);
        assert_eq!(f.bumpiness, 2 + 1 + 2 + 1);
    }

    #[test]
    fn test_holes_counted_below_top() {
        let f = features(
            5,
            "
            ##...
            .#...
            #....
            .....
            ",
        );
        // column 0: top at row 1, empty rows 2 and 4
        // column 1: top at row 1, empty rows 3 and 4
        assert_eq!(f.holes, 4);
        assert_eq!(f.aggregate_height, 4 + 4);
    }

    #[test]
    fn test_single_piece_on_empty_board() {
        let board = Board::new(19, 15);
        let mask = cognito_engine::PieceKind::O.mask(0);
        let (_, after) = board.place_and_clear(mask, -1, board.drop_y(mask, -1).unwrap());
        let analysis = BoardAnalysis::from_board(&after);
        assert_eq!(analysis.column_heights()[0], 2);
        assert_eq!(analysis.column_heights()[1], 2);
        assert_eq!(analysis.features().holes, 0);
    }

    #[test]
    fn test_transitions() {
        let f = features(
            2,
            "
            #.#
            ...
            ",
        );
        // row 0: |#.#| -> 2, row 1: |...| -> 2
        assert_eq!(f.row_transitions, 4);
        // col 0: top wall, #, ., bottom wall -> 2; col 1: 2; col 2: 2
        assert_eq!(f.column_transitions, 6);

        let f = features(1, "###");
        assert_eq!(f.row_transitions, 0);
        assert_eq!(f.column_transitions, 0);
    }
}
